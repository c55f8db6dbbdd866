//! Client repository contract shared by every backend.
//!
//! # Responsibility
//! - Define the CRUD + pagination + persisted-reorder surface.
//! - Define the error vocabulary returned by all backends.
//! - Make every repository a publisher on its own notification channel.
//!
//! # Invariants
//! - Mutations publish only after the store accepted the write.
//! - `page(k, n)` rejects `k < 1` or `n < 1` and returns an empty list past
//!   the end of the data.

use crate::db::DbError;
use crate::model::client::{Client, ClientId, ClientShort, ClientValidationError};
use crate::model::field::UnknownFieldError;
use crate::notify::{NotificationChannel, Observer, ObserverError, RepoEvent};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of the backing store itself.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode {
        format: &'static str,
        message: String,
    },
    /// Persisted row cannot be turned into a valid client.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "i/o failure on `{}`: {source}", path.display()),
            Self::Encode { format, message } => {
                write!(f, "failed to encode clients as {format}: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Encode { .. } | Self::InvalidData(_) => None,
        }
    }
}

/// Error returned by repository and decorator operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    NotFound(ClientId),
    InvalidArgument(String),
    /// The backend does not offer this operation.
    Unsupported(&'static str),
    Storage(StorageError),
    Observer(ObserverError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Unsupported(operation) => write!(f, "unsupported operation: {operation}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Observer(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Observer(err) => Some(err),
            Self::NotFound(_) | Self::InvalidArgument(_) | Self::Unsupported(_) => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(StorageError::Db(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Db(DbError::Sqlite(value)))
    }
}

impl From<ObserverError> for RepoError {
    fn from(value: ObserverError) -> Self {
        Self::Observer(value)
    }
}

impl From<UnknownFieldError> for RepoError {
    fn from(value: UnknownFieldError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

/// Half-open slice `[(k-1)*n, (k-1)*n + n)` of a full ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    /// Validates a 1-based page number `k` and page size `n`.
    pub fn new(k: u32, n: u32) -> RepoResult<Self> {
        if k < 1 {
            return Err(RepoError::InvalidArgument(format!(
                "page number must be >= 1, got {k}"
            )));
        }
        if n < 1 {
            return Err(RepoError::InvalidArgument(format!(
                "page size must be >= 1, got {n}"
            )));
        }

        let limit = n as usize;
        Ok(Self {
            offset: ((k - 1) as usize).saturating_mul(limit),
            limit,
        })
    }

    /// Applies the window to an in-memory ordering.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }

    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

/// Uniform client repository contract.
///
/// Each backend owns its entities; callers only see copies.
pub trait ClientRepository {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>>;

    /// Assigns a fresh id to `client`, persists it and publishes `Added`.
    fn add(&mut self, client: &mut Client) -> RepoResult<ClientId>;

    /// Overwrites every field except id of the client stored under `id`.
    fn replace_by_id(&mut self, id: ClientId, client: &Client) -> RepoResult<()>;

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<()>;

    /// Returns page `k` of size `n` in the repository's current ordering.
    fn page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>>;

    /// Permanently reorders the collection by ascending `field_name`.
    fn sort_by_field(&mut self, field_name: &str) -> RepoResult<()>;

    fn count(&self) -> RepoResult<usize>;

    fn channel(&self) -> &NotificationChannel;

    fn channel_mut(&mut self) -> &mut NotificationChannel;

    fn subscribe(&mut self, observer: Arc<dyn Observer>) -> bool {
        self.channel_mut().subscribe(observer)
    }

    fn unsubscribe(&mut self, observer: &Arc<dyn Observer>) -> bool {
        self.channel_mut().unsubscribe(observer)
    }

    /// Broadcasts `event` to this repository's subscribers.
    fn publish(&self, event: &RepoEvent) -> RepoResult<()> {
        self.channel().publish(event)?;
        Ok(())
    }
}
