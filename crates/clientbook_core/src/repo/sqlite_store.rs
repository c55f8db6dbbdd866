//! Connection-oriented SQLite access to the `clients` table.
//!
//! # Responsibility
//! - Run parameterized statements for one borrowed connection.
//! - Turn rows into validated `Client` values.
//!
//! # Invariants
//! - The store never caches rows; every call hits the table.
//! - Ids come from the table's `AUTOINCREMENT` key and are written back into
//!   the inserted entity.
//! - Zero affected rows on update/delete is `NotFound`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::latest_version;
use crate::model::client::{Client, ClientId, ClientRecord, ClientShort};
use crate::repo::client_repo::{PageWindow, RepoError, RepoResult, StorageError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub(crate) const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    last_name,
    first_name,
    patronymic,
    phone,
    email,
    passport_series,
    passport_number,
    zip_code,
    city,
    street,
    house,
    total_spending
FROM clients";

const CLIENT_COLUMNS: [&str; 13] = [
    "id",
    "last_name",
    "first_name",
    "patronymic",
    "phone",
    "email",
    "passport_series",
    "passport_number",
    "zip_code",
    "city",
    "street",
    "house",
    "total_spending",
];

/// SQLite client table bound to one borrowed connection.
///
/// This is the narrow database interface; it does not publish events.
/// Wrap it in `SqliteClientRepository` to use it as a `ClientRepository`.
pub struct SqliteClientStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientStore<'conn> {
    /// Binds to a connection opened by `db::open_db*`.
    ///
    /// Fails with `InvalidData` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_clients_ready(conn)?;
        Ok(Self { conn })
    }

    pub fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }

        Ok(None)
    }

    /// Inserts `client` and stores the generated id back into it.
    pub fn add(&self, client: &mut Client) -> RepoResult<ClientId> {
        let id: ClientId = self.conn.query_row(
            "INSERT INTO clients (
                last_name,
                first_name,
                patronymic,
                phone,
                email,
                passport_series,
                passport_number,
                zip_code,
                city,
                street,
                house,
                total_spending
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            RETURNING id;",
            params![
                client.last_name(),
                client.first_name(),
                client.patronymic(),
                client.phone(),
                client.email(),
                client.passport_series(),
                client.passport_number(),
                client.zip_code(),
                client.city(),
                client.street(),
                client.house(),
                client.total_spending(),
            ],
            |row| row.get(0),
        )?;

        client.set_id(id)?;
        Ok(id)
    }

    /// Overwrites the row under `id` and returns the stored result.
    pub fn replace_by_id(&self, id: ClientId, client: &Client) -> RepoResult<Client> {
        let changed = self.conn.execute(
            "UPDATE clients
             SET
                last_name = ?1,
                first_name = ?2,
                patronymic = ?3,
                phone = ?4,
                email = ?5,
                passport_series = ?6,
                passport_number = ?7,
                zip_code = ?8,
                city = ?9,
                street = ?10,
                house = ?11,
                total_spending = ?12
             WHERE id = ?13;",
            params![
                client.last_name(),
                client.first_name(),
                client.patronymic(),
                client.phone(),
                client.email(),
                client.passport_series(),
                client.passport_number(),
                client.zip_code(),
                client.city(),
                client.street(),
                client.house(),
                client.total_spending(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        let mut updated = client.clone();
        updated.set_id(id)?;
        Ok(updated)
    }

    pub fn delete_by_id(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    /// Reads one page ordered by ascending id.
    pub fn page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        let window = PageWindow::new(k, n)?;
        let clients = self.select(
            &format!("{CLIENT_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"),
            &[
                Value::Integer(window.sql_limit()),
                Value::Integer(window.sql_offset()),
            ],
        )?;

        Ok(clients.iter().map(ClientShort::from).collect())
    }

    pub fn count(&self) -> RepoResult<usize> {
        self.select_count("SELECT COUNT(*) FROM clients;", &[])
    }

    /// Runs a caller-built `SELECT` over the client columns.
    pub fn select(&self, sql: &str, bind_values: &[Value]) -> RepoResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values.iter()))?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }

        Ok(clients)
    }

    /// Runs a caller-built single-value `COUNT` query.
    pub fn select_count(&self, sql: &str, bind_values: &[Value]) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row(sql, params_from_iter(bind_values.iter()), |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StorageError::InvalidData(format!("negative row count {count}")).into())
    }
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let record = ClientRecord {
        id: Some(row.get("id")?),
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        patronymic: row.get("patronymic")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        passport_series: row.get("passport_series")?,
        passport_number: row.get("passport_number")?,
        zip_code: row.get("zip_code")?,
        city: row.get("city")?,
        street: row.get("street")?,
        house: row.get("house")?,
        total_spending: row.get("total_spending")?,
    };
    let id = record.id.unwrap_or_default();

    Client::new(record).map_err(|err| {
        StorageError::InvalidData(format!("clients row {id} failed validation: {err}")).into()
    })
}

fn ensure_clients_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StorageError::InvalidData(format!(
            "connection schema version {actual_version} does not match expected {expected_version}"
        ))
        .into());
    }

    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'clients';",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(StorageError::InvalidData("missing required table `clients`".to_string()).into());
    }

    let mut stmt = conn.prepare("PRAGMA table_info(clients);")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>("name")?);
    }
    for column in CLIENT_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(StorageError::InvalidData(format!(
                "missing required column `clients.{column}`"
            ))
            .into());
        }
    }

    Ok(())
}
