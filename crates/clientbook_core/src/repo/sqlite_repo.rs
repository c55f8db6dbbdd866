//! Adapter exposing `SqliteClientStore` through `ClientRepository`.
//!
//! # Responsibility
//! - Let callers treat the database exactly like the file backends.
//! - Publish mutation events, which the bare store does not do.
//!
//! # Invariants
//! - Every call goes straight to the store; nothing is cached here.
//! - The table has no persisted order, so `sort_by_field` is `Unsupported`;
//!   use a query decorator order for a per-read ordering instead.

use crate::model::client::{Client, ClientId, ClientShort};
use crate::model::field::ClientField;
use crate::notify::{NotificationChannel, RepoEvent};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};
use crate::repo::sqlite_store::SqliteClientStore;
use log::debug;
use rusqlite::Connection;

/// Database-backed `ClientRepository`.
pub struct SqliteClientRepository<'conn> {
    store: SqliteClientStore<'conn>,
    channel: NotificationChannel,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn new(store: SqliteClientStore<'conn>) -> Self {
        Self {
            store,
            channel: NotificationChannel::new(),
        }
    }

    /// Shorthand for `new(SqliteClientStore::try_new(conn)?)`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(SqliteClientStore::try_new(conn)?))
    }

    pub fn store(&self) -> &SqliteClientStore<'conn> {
        &self.store
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.store.get_by_id(id)
    }

    fn add(&mut self, client: &mut Client) -> RepoResult<ClientId> {
        let id = self.store.add(client)?;
        debug!("event=client_add module=repo status=ok format=sqlite id={id}");
        self.publish(&RepoEvent::Added(client.clone()))?;
        Ok(id)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &Client) -> RepoResult<()> {
        let updated = self.store.replace_by_id(id, client)?;
        debug!("event=client_replace module=repo status=ok format=sqlite id={id}");
        self.publish(&RepoEvent::Replaced(updated))
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<()> {
        self.store.delete_by_id(id)?;
        debug!("event=client_delete module=repo status=ok format=sqlite id={id}");
        self.publish(&RepoEvent::Deleted(id))
    }

    fn page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        self.store.page(k, n)
    }

    fn sort_by_field(&mut self, field_name: &str) -> RepoResult<()> {
        field_name.parse::<ClientField>()?;
        Err(RepoError::Unsupported(
            "sort_by_field: the database backend has no persisted order",
        ))
    }

    fn count(&self) -> RepoResult<usize> {
        self.store.count()
    }

    fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    fn channel_mut(&mut self) -> &mut NotificationChannel {
        &mut self.channel
    }
}
