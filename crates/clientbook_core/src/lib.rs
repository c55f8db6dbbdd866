//! Core client-record repository layer.
//! This crate owns client validation, persistence backends and query
//! composition; front-ends only call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod query;
pub mod repo;

pub use config::StoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::client::{Client, ClientId, ClientRecord, ClientShort, ClientValidationError};
pub use model::field::{ClientField, FieldKind, FieldValue, UnknownFieldError};
pub use notify::{LatestEventObserver, NotificationChannel, Observer, ObserverError, RepoEvent};
pub use query::{ClientQuery, ClientQueryDecorator, Filter, Order, QueryEvaluator, SortDirection};
pub use repo::client_repo::{ClientRepository, PageWindow, RepoError, RepoResult, StorageError};
pub use repo::file_repo::{
    FileClientRepository, FileFormat, JsonClientRepository, JsonFormat, YamlClientRepository,
    YamlFormat,
};
pub use repo::sqlite_repo::SqliteClientRepository;
pub use repo::sqlite_store::SqliteClientStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
