//! Credentials and identity consumed by the real-time and HTTP clients.
//!
//! - [`CredentialStore`]: where the bearer token and the stable [`ClientId`] live
//! - [`MemoryStore`]: process-local store, useful for tests and short-lived tools
//! - [`FileStore`]: JSON file on disk, the durable equivalent of browser local storage
//! - [`IdentityProvider`]: the currently signed-in user, observable through a watch channel

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
/// UUID type backing [`ClientId`].
pub use uuid::Uuid;

use crate::Result;
use crate::error::Error;

/// Identifier of a platform user, as issued by the API.
pub type UserId = String;

/// Stable identifier distinguishing one device across reconnects, independent of the
/// signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ClientId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ClientId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Persisted credentials shared between the HTTP and WebSocket clients.
///
/// Implementations must be cheap to call: the connection manager reads the token and the
/// client id on every connection attempt.
pub trait CredentialStore: Send + Sync + 'static {
    /// The bearer token of the signed-in user, if any.
    fn token(&self) -> Result<Option<SecretString>>;

    /// Replace (or clear, with `None`) the bearer token.
    fn set_token(&self, token: Option<SecretString>) -> Result<()>;

    /// The persisted client identifier, if one has been generated.
    fn client_id(&self) -> Result<Option<ClientId>>;

    /// Persist the client identifier.
    fn set_client_id(&self, client_id: ClientId) -> Result<()>;

    /// Return the persisted client identifier, generating and persisting one on first use.
    fn client_id_or_init(&self) -> Result<ClientId> {
        if let Some(client_id) = self.client_id()? {
            return Ok(client_id);
        }

        let client_id = ClientId::generate();
        self.set_client_id(client_id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%client_id, "Generated new client id");

        Ok(client_id)
    }
}

/// In-memory [`CredentialStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<SecretString>>,
    client_id: RwLock<Option<ClientId>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a bearer token.
    #[must_use]
    pub fn with_token(token: String) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token))),
            client_id: RwLock::new(None),
        }
    }
}

// Poisoned locks are recovered: both fields are plain `Option`s with no intermediate state.
impl CredentialStore for MemoryStore {
    fn token(&self) -> Result<Option<SecretString>> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set_token(&self, token: Option<SecretString>) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
        Ok(())
    }

    fn client_id(&self) -> Result<Option<ClientId>> {
        Ok(*self.client_id.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn set_client_id(&self, client_id: ClientId) -> Result<()> {
        *self.client_id.write().unwrap_or_else(PoisonError::into_inner) = Some(client_id);
        Ok(())
    }

    fn client_id_or_init(&self) -> Result<ClientId> {
        let mut client_id = self.client_id.write().unwrap_or_else(PoisonError::into_inner);
        Ok(*client_id.get_or_insert_with(ClientId::generate))
    }
}

/// On-disk layout of a [`FileStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(rename = "ws_client_id", default, skip_serializing_if = "Option::is_none")]
    client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// [`CredentialStore`] backed by a JSON file.
///
/// The file is read on every access and rewritten on every change, so several processes
/// pointing at the same path observe each other's client id. A missing file is treated
/// as an empty store.
///
/// Within one process all access goes through a single lock, and
/// [`client_id_or_init`](CredentialStore::client_id_or_init) reads, generates and writes
/// under it. Changes are written to a sibling temporary file and renamed into place, so a
/// reader never sees a partially written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // The guarded data lives on disk, so a poisoned lock leaves nothing inconsistent.
    fn locked(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the file. Callers hold [`Self::locked`].
    fn load(&self) -> Result<StoredCredentials> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                Ok(StoredCredentials::default())
            }
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoredCredentials::default()),
            Err(e) => Err(Error::storage(self.path.clone(), e)),
        }
    }

    /// Replace the file atomically. Callers hold [`Self::locked`].
    fn save(&self, stored: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::storage(parent.to_path_buf(), e))?;
        }

        let mut temp = self.path.clone().into_os_string();
        temp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let temp = PathBuf::from(temp);

        let json = serde_json::to_vec_pretty(stored)?;
        fs::write(&temp, json).map_err(|e| Error::storage(temp.clone(), e))?;
        fs::rename(&temp, &self.path).map_err(|e| {
            _ = fs::remove_file(&temp);
            Error::storage(self.path.clone(), e)
        })
    }

    fn update<F: FnOnce(&mut StoredCredentials)>(&self, f: F) -> Result<()> {
        let _guard = self.locked();

        let mut stored = self.load()?;
        f(&mut stored);
        self.save(&stored)
    }
}

impl CredentialStore for FileStore {
    fn token(&self) -> Result<Option<SecretString>> {
        let _guard = self.locked();
        Ok(self.load()?.token.map(SecretString::from))
    }

    fn set_token(&self, token: Option<SecretString>) -> Result<()> {
        let token = token.map(|t| t.expose_secret().to_owned());
        self.update(|stored| stored.token = token)
    }

    fn client_id(&self) -> Result<Option<ClientId>> {
        let _guard = self.locked();
        Ok(self.load()?.client_id)
    }

    fn set_client_id(&self, client_id: ClientId) -> Result<()> {
        self.update(|stored| stored.client_id = Some(client_id))
    }

    fn client_id_or_init(&self) -> Result<ClientId> {
        let _guard = self.locked();

        let mut stored = self.load()?;
        if let Some(client_id) = stored.client_id {
            return Ok(client_id);
        }

        let client_id = ClientId::generate();
        stored.client_id = Some(client_id);
        self.save(&stored)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%client_id, path = %self.path.display(), "Generated new client id");

        Ok(client_id)
    }
}

/// Source of the currently signed-in user.
///
/// Login, logout and user switches are published with [`IdentityProvider::set`]; observers
/// (for example [`crate::ws::ConnectionManager::follow_identity`]) hold a receiver from
/// [`IdentityProvider::subscribe`].
#[derive(Debug)]
pub struct IdentityProvider {
    tx: watch::Sender<Option<UserId>>,
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl IdentityProvider {
    #[must_use]
    pub fn new(user: Option<UserId>) -> Self {
        let (tx, _) = watch::channel(user);
        Self { tx }
    }

    /// The current user, `None` when signed out.
    #[must_use]
    pub fn current(&self) -> Option<UserId> {
        self.tx.borrow().clone()
    }

    /// Publish a new identity. Returns `true` when it differs from the previous one;
    /// receivers are only notified in that case.
    pub fn set(&self, user: Option<UserId>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        })
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.tx.subscribe()
    }
}
