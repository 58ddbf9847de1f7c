#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;

use storefront_api::services::{AuthGuard, AuthService, PasswordHasher, TokenService};
use storefront_database::{sqlx, StoreError, UserStore};
use storefront_models::auth::{NewUser, User};

pub const TEST_SECRET: &str = "test_signing_secret";

/// In-memory credential store implementing the same trait the Postgres
/// adapter does, including unique-email semantics on create.
pub struct MockUserStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn stored_hash(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.password_hash.clone())
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// A store whose every operation fails like a lost database connection.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Auth state wired against the given store, with the low bcrypt cost tests
/// want and one token service shared between issuer and guard.
pub fn auth_state(store: Arc<dyn UserStore>) -> (web::Data<AuthService>, AuthGuard, TokenService) {
    let tokens = TokenService::new(TEST_SECRET, 3600);
    let passwords = PasswordHasher::new(4);
    let auth = web::Data::new(AuthService::new(store, tokens.clone(), passwords));
    let guard = AuthGuard::new(tokens.clone());
    (auth, guard, tokens)
}
