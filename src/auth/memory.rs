use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::repo::AccountStore;
use super::repo_types::{Account, AccountSummary};
use crate::db::StoreError;

/// Account store backed by a map, with the same unique constraints as the
/// `users` table.
#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_unique(rows: &HashMap<Uuid, Account>, account: &Account) -> Result<(), StoreError> {
        for other in rows.values().filter(|o| o.user_id != account.user_id) {
            if other.username == account.username {
                return Err(StoreError::UniqueViolation("users_username_key".into()));
            }
            if other.email == account.email {
                return Err(StoreError::UniqueViolation("users_email_key".into()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn list(&self) -> Result<Vec<AccountSummary>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<&Account> = rows.values().collect();
        out.sort_by_key(|a| a.created_at);
        Ok(out.into_iter().map(AccountSummary::from).collect())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|a| a.username == username).cloned())
    }

    async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .any(|a| a.username == username || a.email == email))
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&account.user_id) {
            return Err(StoreError::UniqueViolation("users_pkey".into()));
        }
        Self::check_unique(&rows, account)?;
        rows.insert(account.user_id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&account.user_id) {
            return Ok(false);
        }
        Self::check_unique(&rows, account)?;
        rows.insert(account.user_id, account.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().remove(&user_id).is_some())
    }
}
