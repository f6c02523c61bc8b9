use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, AssetChanges, NewAsset, NewUser, User, UserChanges};

/// Persistence boundary seen by the HTTP handlers.
///
/// Asset operations take the owning user id; an asset that belongs to another
/// user is reported exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// Fails with `Conflict` when the email is already taken
    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError>;
    /// Removes the user and every asset they own. Returns false if absent.
    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn list_assets(&self, owner: Uuid) -> Result<Vec<Asset>, DatabaseError>;
    async fn get_asset(&self, owner: Uuid, id: Uuid) -> Result<Option<Asset>, DatabaseError>;
    /// Fails with `NotFound` when the owner does not exist
    async fn create_asset(&self, owner: Uuid, input: NewAsset) -> Result<Asset, DatabaseError>;
    async fn update_asset(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: AssetChanges,
    ) -> Result<Option<Asset>, DatabaseError>;
    async fn delete_asset(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}
