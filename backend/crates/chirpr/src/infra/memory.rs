//! In-Memory Service Implementations
//!
//! Process-local stand-ins for the managed identity service and document
//! store. They reproduce the rejection codes and write semantics the provider
//! depends on, and are what the `memory` backend and the test-suite run on.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use platform::password::ClearTextPassword;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::document::{DocumentPath, FieldValue, Fields};
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::service::{AuthState, AuthStateStream, DocumentStore, IdentityService, StoreError};
use crate::domain::value_object::{
    auth_failure::{AuthFailure, codes},
    email::Email,
    uid::Uid,
};

/// Shortest password the managed service accepts
const MIN_PASSWORD_CHARS: usize = 6;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Identity Service
// ============================================================================

struct Account {
    identity: SessionIdentity,
    password: ClearTextPassword,
}

/// In-memory identity service
pub struct InMemoryIdentityService {
    accounts: Mutex<HashMap<Email, Account>>,
    auth: watch::Sender<AuthState>,
}

impl Default for InMemoryIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityService {
    /// Service that has already reported "signed out"
    pub fn new() -> Self {
        Self::with_state(AuthState::SignedOut)
    }

    /// Service that has not reported an auth state yet; see [`Self::resolve`]
    pub fn resolving() -> Self {
        Self::with_state(AuthState::Resolving)
    }

    fn with_state(initial: AuthState) -> Self {
        let (auth, _) = watch::channel(initial);
        Self {
            accounts: Mutex::new(HashMap::new()),
            auth,
        }
    }

    /// Publish an auth state as if it came from the service
    pub fn resolve(&self, state: AuthState) {
        self.auth.send_replace(state);
    }

    /// Seed an account without signing it in
    pub fn insert_account(&self, email: &str, password: &str) -> Result<SessionIdentity, AuthFailure> {
        let email = Email::parse(email)?;
        let password = ClearTextPassword::new(password.to_string())
            .map_err(|_| AuthFailure::new(codes::MISSING_PASSWORD))?;
        self.add_account(email, &password)
    }

    fn add_account(
        &self,
        email: Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        if password.char_count() < MIN_PASSWORD_CHARS {
            return Err(AuthFailure::new(codes::WEAK_PASSWORD)
                .with_detail(format!("Password should be at least {MIN_PASSWORD_CHARS} characters")));
        }

        let mut accounts = lock(&self.accounts);
        if accounts.contains_key(&email) {
            return Err(AuthFailure::new(codes::EMAIL_ALREADY_IN_USE));
        }

        let identity = SessionIdentity::new(Uid::new(Uuid::new_v4().simple().to_string()))
            .with_email(email.clone());
        let password = ClearTextPassword::new(password.expose().to_string())
            .map_err(|_| AuthFailure::new(codes::MISSING_PASSWORD))?;
        accounts.insert(
            email,
            Account {
                identity: identity.clone(),
                password,
            },
        );
        Ok(identity)
    }
}

impl IdentityService for InMemoryIdentityService {
    async fn create_account(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        let identity = self.add_account(email.clone(), password)?;
        self.resolve(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> Result<SessionIdentity, AuthFailure> {
        let identity = {
            let accounts = lock(&self.accounts);
            let account = accounts
                .get(email)
                .ok_or_else(|| AuthFailure::new(codes::USER_NOT_FOUND))?;
            if !account.password.matches(password) {
                return Err(AuthFailure::new(codes::WRONG_PASSWORD));
            }
            account.identity.clone()
        };

        self.resolve(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.resolve(AuthState::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> AuthStateStream {
        self.auth.subscribe()
    }
}

// ============================================================================
// Document Store
// ============================================================================

/// In-memory document store
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<DocumentPath, Fields>>,
    write_failure: Mutex<Option<StoreError>>,
    read_failure: Mutex<Option<StoreError>>,
    write_latency: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following write with `err`
    pub fn fail_writes_with(&self, err: StoreError) {
        *lock(&self.write_failure) = Some(err);
    }

    /// Reject every following read with `err`
    pub fn fail_reads_with(&self, err: StoreError) {
        *lock(&self.read_failure) = Some(err);
    }

    /// Hold every following write for `latency` before applying it
    pub fn delay_writes(&self, latency: Duration) {
        *lock(&self.write_latency) = Some(latency);
    }

    pub fn clear_failures(&self) {
        *lock(&self.write_failure) = None;
        *lock(&self.read_failure) = None;
    }

    /// Number of writes that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seed a document; not counted as a write
    pub fn insert_document(&self, path: DocumentPath, fields: Fields) {
        lock(&self.documents).insert(path, fields);
    }

    pub fn document(&self, path: &DocumentPath) -> Option<Fields> {
        lock(&self.documents).get(path).cloned()
    }

    /// `(id, fields)` of every document in a collection
    pub fn documents_in(&self, collection: &str) -> Vec<(String, Fields)> {
        lock(&self.documents)
            .iter()
            .filter(|(path, _)| path.collection == collection)
            .map(|(path, fields)| (path.id.clone(), fields.clone()))
            .collect()
    }

    async fn check_write(&self) -> Result<(), StoreError> {
        let latency = *lock(&self.write_latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.write_failure).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn commit(fields: Fields) -> Fields {
        let now = Utc::now();
        fields
            .into_iter()
            .map(|(name, mut value)| {
                value.resolve_server_timestamps(now);
                (name, value)
            })
            .collect()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Fields>, StoreError> {
        if let Some(err) = lock(&self.read_failure).clone() {
            return Err(err);
        }
        Ok(self.document(path))
    }

    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        self.check_write().await?;
        lock(&self.documents).insert(path.clone(), Self::commit(fields));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_fields(&self, path: &DocumentPath, fields: Fields) -> Result<(), StoreError> {
        self.check_write().await?;
        let mut documents = lock(&self.documents);
        let document = documents
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        document.extend(Self::commit(fields));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
