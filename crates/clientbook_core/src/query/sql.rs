//! Query pushdown for the SQLite repository.
//!
//! Column names come only from `ClientField::name()`; values are always
//! bound as parameters.

use super::criteria::ClientQuery;
use super::QueryEvaluator;
use crate::model::client::Client;
use crate::model::field::{ClientField, FieldValue};
use crate::repo::client_repo::{PageWindow, RepoResult};
use crate::repo::sqlite_repo::SqliteClientRepository;
use crate::repo::sqlite_store::CLIENT_SELECT_SQL;
use rusqlite::types::Value;

/// SQL text plus its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub bind_values: Vec<Value>,
}

/// `SELECT ... [WHERE f = ?] ORDER BY ... LIMIT ? OFFSET ?`.
///
/// Without an order the page is by ascending id. With one, ties fall back
/// to ascending id so results match the in-memory stable sort.
pub fn compile_page(query: &ClientQuery, window: PageWindow) -> CompiledQuery {
    let mut sql = CLIENT_SELECT_SQL.to_string();
    let mut bind_values = Vec::new();
    push_where(query, &mut sql, &mut bind_values);

    match query.order() {
        Some(order) if order.field == ClientField::Id => {
            sql.push_str(&format!(" ORDER BY id {}", order.direction.as_sql()));
        }
        Some(order) => {
            sql.push_str(&format!(
                " ORDER BY {} {}, id ASC",
                order.field.name(),
                order.direction.as_sql()
            ));
        }
        None => sql.push_str(" ORDER BY id ASC"),
    }

    sql.push_str(" LIMIT ? OFFSET ?;");
    bind_values.push(Value::Integer(window.sql_limit()));
    bind_values.push(Value::Integer(window.sql_offset()));

    CompiledQuery { sql, bind_values }
}

/// `SELECT COUNT(*) FROM clients [WHERE f = ?]`.
pub fn compile_count(query: &ClientQuery) -> CompiledQuery {
    let mut sql = "SELECT COUNT(*) FROM clients".to_string();
    let mut bind_values = Vec::new();
    push_where(query, &mut sql, &mut bind_values);
    sql.push(';');

    CompiledQuery { sql, bind_values }
}

fn push_where(query: &ClientQuery, sql: &mut String, bind_values: &mut Vec<Value>) {
    if let Some(filter) = query.filter() {
        sql.push_str(&format!(" WHERE {} = ?", filter.field().name()));
        bind_values.push(to_sql_value(filter.value()));
    }
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
        FieldValue::Decimal(value) => Value::Real(*value),
    }
}

impl QueryEvaluator for SqliteClientRepository<'_> {
    fn evaluate_page(&self, query: &ClientQuery, window: PageWindow) -> RepoResult<Vec<Client>> {
        let compiled = compile_page(query, window);
        self.store().select(&compiled.sql, &compiled.bind_values)
    }

    fn evaluate_count(&self, query: &ClientQuery) -> RepoResult<usize> {
        let compiled = compile_count(query);
        self.store()
            .select_count(&compiled.sql, &compiled.bind_values)
    }
}
