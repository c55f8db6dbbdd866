//! In-memory evaluation for file-backed repositories.

use super::criteria::{ClientQuery, SortDirection};
use super::QueryEvaluator;
use crate::model::client::Client;
use crate::repo::client_repo::{PageWindow, RepoResult};
use crate::repo::file_repo::{FileClientRepository, FileFormat};

/// Filters, then stably orders, a full collection.
///
/// Ties keep their persisted relative order in both directions.
pub fn evaluate<'a>(clients: &'a [Client], query: &ClientQuery) -> Vec<&'a Client> {
    let mut selected = clients
        .iter()
        .filter(|client| query.filter().map_or(true, |filter| filter.matches(client)))
        .collect::<Vec<_>>();

    if let Some(order) = query.order() {
        selected.sort_by(|left, right| {
            let ordering = left
                .field_value(order.field)
                .total_cmp(&right.field_value(order.field));
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    selected
}

impl<F: FileFormat> QueryEvaluator for FileClientRepository<F> {
    fn evaluate_page(&self, query: &ClientQuery, window: PageWindow) -> RepoResult<Vec<Client>> {
        let selected = evaluate(self.clients(), query);
        Ok(window.slice(&selected).iter().map(|client| (*client).clone()).collect())
    }

    fn evaluate_count(&self, query: &ClientQuery) -> RepoResult<usize> {
        Ok(match query.filter() {
            Some(filter) => self
                .clients()
                .iter()
                .filter(|client| filter.matches(client))
                .count(),
            None => self.clients().len(),
        })
    }
}
