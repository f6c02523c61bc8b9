pub mod asset;
pub mod user;

pub use asset::{Asset, AssetCategory, AssetChanges, NewAsset};
pub use user::{NewUser, User, UserChanges};
