//! In-memory repositories
//!
//! Process-local stores with the same observable behavior as the PostgreSQL
//! repositories: sequential ids, id-ordered listings, soft-delete flags and
//! the live-email uniqueness rule. Used by `storage = "memory"` and by the
//! integration tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::application::use_cases::EMAIL_ALREADY_REGISTERED;
use crate::domain::{Finance, FinanceRepository, Lifecycle, User, UserRepository};
use crate::shared::error::AppError;

/// Rows keyed by id plus the id sequence.
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn touched(lifecycle: &Lifecycle) -> Lifecycle {
    Lifecycle {
        updated: Utc::now(),
        ..lifecycle.clone()
    }
}

#[derive(Default)]
pub struct InMemoryFinanceRepository {
    table: RwLock<Table<Finance>>,
}

impl InMemoryFinanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FinanceRepository for InMemoryFinanceRepository {
    async fn create(&self, finance: &Finance) -> Result<Finance, AppError> {
        let mut table = self.table.write();
        let id = table.allocate_id();
        let stored = Finance::restore(
            id,
            finance.owner_id(),
            finance.amount(),
            finance.description().to_string(),
            Lifecycle::new(),
        )?;
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Finance>, AppError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn find_all(&self, include_deleted: bool) -> Result<Vec<Finance>, AppError> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .filter(|f| include_deleted || !f.is_deleted())
            .cloned()
            .collect())
    }

    async fn find_by_owner(
        &self,
        owner_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<Finance>, AppError> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .filter(|f| f.owner_id() == owner_id && (include_deleted || !f.is_deleted()))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, finance: &Finance) -> Result<Finance, AppError> {
        let mut table = self.table.write();
        let current = table
            .rows
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Finance record with ID {} not found", id)))?;

        let stored = Finance::restore(
            id,
            current.owner_id(),
            finance.amount(),
            finance.description().to_string(),
            touched(current.lifecycle()),
        )?;
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        if let Some(row) = self.table.write().rows.get_mut(&id) {
            row.soft_delete();
        }
        Ok(())
    }

    async fn hard_delete(&self, id: i64) -> Result<(), AppError> {
        self.table.write().rows.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Mirrors the partial unique index on `users(email) WHERE NOT is_deleted`.
fn ensure_live_email_free(table: &Table<User>, email: &str, owner: Option<i64>) -> Result<(), AppError> {
    let taken = table
        .rows
        .values()
        .any(|u| !u.is_deleted() && u.email() == email && u.id() != owner);
    if taken {
        return Err(AppError::Conflict(EMAIL_ALREADY_REGISTERED.into()));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut table = self.table.write();
        ensure_live_email_free(&table, user.email(), None)?;

        let id = table.allocate_id();
        let stored = User::restore(
            id,
            user.name().to_string(),
            user.email().to_string(),
            user.address().clone(),
            user.status(),
            Lifecycle::new(),
        )?;
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.read();
        let mut matches: Vec<&User> = table.rows.values().filter(|u| u.email() == email).collect();
        matches.sort_by_key(|u| (u.is_deleted(), std::cmp::Reverse(u.id())));
        Ok(matches.first().map(|u| (*u).clone()))
    }

    async fn find_all(&self, include_deleted: bool) -> Result<Vec<User>, AppError> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .filter(|u| include_deleted || !u.is_deleted())
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, user: &User) -> Result<User, AppError> {
        let mut table = self.table.write();
        let lifecycle = table
            .rows
            .get(&id)
            .map(|current| touched(current.lifecycle()))
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", id)))?;
        ensure_live_email_free(&table, user.email(), Some(id))?;

        let stored = User::restore(
            id,
            user.name().to_string(),
            user.email().to_string(),
            user.address().clone(),
            user.status(),
            lifecycle,
        )?;
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        if let Some(row) = self.table.write().rows.get_mut(&id) {
            row.soft_delete();
        }
        Ok(())
    }

    async fn hard_delete(&self, id: i64) -> Result<(), AppError> {
        self.table.write().rows.remove(&id);
        Ok(())
    }
}
