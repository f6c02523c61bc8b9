use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, AssetChanges, NewAsset, NewUser, User, UserChanges};
use crate::database::store::Store;

/// Process-local store used when no database is configured, and by tests.
///
/// Rows are kept in insertion order, which is also creation order.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    assets: Vec<Asset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.state.read().await.users.clone())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.email_taken(&input.email, None) {
            return Err(DatabaseError::Conflict(format!("Email '{}' is already registered", input.email)));
        }
        let user = User::create(input);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(DatabaseError::Conflict(format!("Email '{}' is already registered", email)));
            }
        }
        Ok(state.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.apply(changes);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        state.assets.retain(|a| a.user_id != id);
        Ok(true)
    }

    async fn list_assets(&self, owner: Uuid) -> Result<Vec<Asset>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.assets.iter().filter(|a| a.user_id == owner).cloned().collect())
    }

    async fn get_asset(&self, owner: Uuid, id: Uuid) -> Result<Option<Asset>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .assets
            .iter()
            .find(|a| a.id == id && a.user_id == owner)
            .cloned())
    }

    async fn create_asset(&self, owner: Uuid, input: NewAsset) -> Result<Asset, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.iter().any(|u| u.id == owner) {
            return Err(DatabaseError::NotFound(format!("User {} not found", owner)));
        }
        let asset = Asset::create(owner, input);
        state.assets.push(asset.clone());
        Ok(asset)
    }

    async fn update_asset(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: AssetChanges,
    ) -> Result<Option<Asset>, DatabaseError> {
        let mut state = self.state.write().await;
        Ok(state
            .assets
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|asset| {
                asset.apply(changes);
                asset.clone()
            }))
    }

    async fn delete_asset(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.assets.len();
        state.assets.retain(|a| !(a.id == id && a.user_id == owner));
        Ok(state.assets.len() != before)
    }
}
