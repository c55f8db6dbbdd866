//! File-backed client repositories (JSON and YAML).
//!
//! # Responsibility
//! - Load the whole client list into memory when opened.
//! - Rewrite the whole file after every mutation.
//!
//! # Invariants
//! - A missing, empty, unreadable or malformed file opens as an empty
//!   collection; the failure is logged, not returned.
//! - Records that fail validation, lack an id, or repeat an id are skipped
//!   one by one with a `record_skip` warning.
//! - `add` assigns `max(id) + 1`, or `1` for an empty collection.
//! - A mutation becomes visible in memory only after its file write
//!   succeeded; a failed write leaves both the collection and the caller's
//!   entity unchanged.
//! - Writes are not atomic; a crash mid-write can leave a truncated file.

use crate::model::client::{Client, ClientId, ClientRecord, ClientShort};
use crate::model::field::ClientField;
use crate::notify::{NotificationChannel, RepoEvent};
use crate::repo::client_repo::{ClientRepository, PageWindow, RepoError, RepoResult, StorageError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// One decoded entry: the record, or why it could not be read.
pub type DecodedRecord = Result<ClientRecord, String>;

/// Serialization used by a `FileClientRepository`.
pub trait FileFormat {
    /// Short format name used in logs and errors.
    const NAME: &'static str;

    /// Splits a whole document into per-record results.
    ///
    /// Returns `Err` only when the document itself is unreadable.
    fn decode(text: &str) -> Result<Vec<DecodedRecord>, String>;

    fn encode(records: &[ClientRecord]) -> Result<String, String>;
}

/// Pretty-printed JSON array of records.
pub struct JsonFormat;

impl FileFormat for JsonFormat {
    const NAME: &'static str = "json";

    fn decode(text: &str) -> Result<Vec<DecodedRecord>, String> {
        let document: serde_json::Value =
            serde_json::from_str(text).map_err(|err| err.to_string())?;
        let serde_json::Value::Array(items) = document else {
            return Err("top-level json value is not an array".to_string());
        };

        Ok(items
            .into_iter()
            .map(|item| serde_json::from_value::<ClientRecord>(item).map_err(|err| err.to_string()))
            .collect())
    }

    fn encode(records: &[ClientRecord]) -> Result<String, String> {
        serde_json::to_string_pretty(records).map_err(|err| err.to_string())
    }
}

/// YAML sequence of records.
pub struct YamlFormat;

impl FileFormat for YamlFormat {
    const NAME: &'static str = "yaml";

    fn decode(text: &str) -> Result<Vec<DecodedRecord>, String> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|err| err.to_string())?;
        let items = match document {
            serde_yaml::Value::Null => return Ok(Vec::new()),
            serde_yaml::Value::Sequence(items) => items,
            _ => return Err("top-level yaml value is not a sequence".to_string()),
        };

        Ok(items
            .into_iter()
            .map(|item| serde_yaml::from_value::<ClientRecord>(item).map_err(|err| err.to_string()))
            .collect())
    }

    fn encode(records: &[ClientRecord]) -> Result<String, String> {
        serde_yaml::to_string(records).map_err(|err| err.to_string())
    }
}

/// In-memory client list mirrored to one file.
pub struct FileClientRepository<F: FileFormat> {
    path: PathBuf,
    clients: Vec<Client>,
    channel: NotificationChannel,
    _format: PhantomData<F>,
}

pub type JsonClientRepository = FileClientRepository<JsonFormat>;
pub type YamlClientRepository = FileClientRepository<YamlFormat>;

impl<F: FileFormat> FileClientRepository<F> {
    /// Opens `path` and loads every valid record.
    ///
    /// The file is not created until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let clients = load_clients::<F>(&path);
        Self {
            path,
            clients,
            channel: NotificationChannel::new(),
            _format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current collection in persisted order.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    fn next_id(&self) -> ClientId {
        self.clients
            .iter()
            .filter_map(Client::id)
            .max()
            .map_or(1, |max_id| max_id.saturating_add(1))
    }

    fn position_of(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id() == Some(id))
    }

    /// Writes `staged` to disk, then makes it the live collection.
    ///
    /// On failure the live collection is left untouched.
    fn commit(&mut self, staged: Vec<Client>) -> RepoResult<()> {
        self.save(&staged)?;
        self.clients = staged;
        Ok(())
    }

    fn save(&self, clients: &[Client]) -> RepoResult<()> {
        let records = clients
            .iter()
            .map(Client::to_record)
            .collect::<Vec<_>>();
        let text = F::encode(&records).map_err(|message| StorageError::Encode {
            format: F::NAME,
            message,
        })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if let Err(source) = fs::write(&self.path, text) {
            error!(
                "event=store_save module=repo status=error format={} path={} error={}",
                F::NAME,
                self.path.display(),
                source
            );
            return Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }
            .into());
        }

        debug!(
            "event=store_save module=repo status=ok format={} records={}",
            F::NAME,
            records.len()
        );
        Ok(())
    }
}

impl<F: FileFormat> ClientRepository for FileClientRepository<F> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        Ok(self
            .clients
            .iter()
            .find(|client| client.id() == Some(id))
            .cloned())
    }

    fn add(&mut self, client: &mut Client) -> RepoResult<ClientId> {
        let id = self.next_id();
        let mut stored = client.clone();
        stored.set_id(id)?;
        let mut staged = self.clients.clone();
        staged.push(stored.clone());
        self.commit(staged)?;
        client.set_id(id)?;

        debug!(
            "event=client_add module=repo status=ok format={} id={}",
            F::NAME,
            id
        );
        self.publish(&RepoEvent::Added(stored))?;
        Ok(id)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &Client) -> RepoResult<()> {
        let index = self.position_of(id).ok_or(RepoError::NotFound(id))?;
        let mut staged = self.clients.clone();
        staged[index].overwrite_from(client);
        let updated = staged[index].clone();
        self.commit(staged)?;

        debug!(
            "event=client_replace module=repo status=ok format={} id={}",
            F::NAME,
            id
        );
        self.publish(&RepoEvent::Replaced(updated))
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<()> {
        let index = self.position_of(id).ok_or(RepoError::NotFound(id))?;
        let mut staged = self.clients.clone();
        staged.remove(index);
        self.commit(staged)?;

        debug!(
            "event=client_delete module=repo status=ok format={} id={}",
            F::NAME,
            id
        );
        self.publish(&RepoEvent::Deleted(id))
    }

    fn page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        let window = PageWindow::new(k, n)?;
        Ok(window
            .slice(&self.clients)
            .iter()
            .map(ClientShort::from)
            .collect())
    }

    fn sort_by_field(&mut self, field_name: &str) -> RepoResult<()> {
        let field = field_name.parse::<ClientField>()?;
        if self.clients.is_empty() {
            return Ok(());
        }

        let mut staged = self.clients.clone();
        staged.sort_by(|left, right| left.field_value(field).total_cmp(&right.field_value(field)));
        self.commit(staged)?;

        debug!(
            "event=client_reorder module=repo status=ok format={} field={}",
            F::NAME,
            field
        );
        self.publish(&RepoEvent::Reordered(field))
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.clients.len())
    }

    fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    fn channel_mut(&mut self) -> &mut NotificationChannel {
        &mut self.channel
    }
}

fn load_clients<F: FileFormat>(path: &Path) -> Vec<Client> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                "event=store_load module=repo status=ok format={} records=0 reason=missing_file",
                F::NAME
            );
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=store_load module=repo status=error format={} path={} error_code=read_failed error={}",
                F::NAME,
                path.display(),
                err
            );
            return Vec::new();
        }
    };

    if text.trim().is_empty() {
        return Vec::new();
    }

    let entries = match F::decode(&text) {
        Ok(entries) => entries,
        Err(err) => {
            error!(
                "event=store_load module=repo status=error format={} path={} error_code=malformed_document error={}",
                F::NAME,
                path.display(),
                err
            );
            return Vec::new();
        }
    };

    let mut clients = Vec::with_capacity(entries.len());
    let mut seen_ids = HashSet::new();
    let mut skipped = 0usize;
    for (index, entry) in entries.into_iter().enumerate() {
        match accept_record(entry, &mut seen_ids) {
            Ok(client) => clients.push(client),
            Err(reason) => {
                skipped += 1;
                warn!(
                    "event=record_skip module=repo status=skip format={} index={} error={}",
                    F::NAME,
                    index,
                    reason
                );
            }
        }
    }

    info!(
        "event=store_load module=repo status=ok format={} records={} skipped={}",
        F::NAME,
        clients.len(),
        skipped
    );
    clients
}

fn accept_record(entry: DecodedRecord, seen_ids: &mut HashSet<ClientId>) -> Result<Client, String> {
    let client = Client::new(entry?).map_err(|err| err.to_string())?;
    let id = client
        .id()
        .ok_or_else(|| "persisted record has no id".to_string())?;
    if !seen_ids.insert(id) {
        return Err(format!("duplicate id {id}"));
    }
    Ok(client)
}
