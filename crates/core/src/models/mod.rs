pub mod address;
pub(crate) mod de;
pub mod nft;
pub mod portfolio;
pub mod price;
pub mod reputation;
pub mod settings;
pub mod snapshot;
pub mod status;
pub mod token;
