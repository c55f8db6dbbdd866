use super::criteria::{ClientQuery, Filter, Order};
use super::QueryEvaluator;
use crate::model::client::{Client, ClientId, ClientShort};
use crate::notify::NotificationChannel;
use crate::repo::client_repo::{ClientRepository, PageWindow, RepoResult};
use log::debug;

/// Adds filtering and per-read ordering to a borrowed repository.
///
/// Mutations, point reads and the persisted reorder pass straight through.
/// `page` and `count` apply the current criteria using the wrapped
/// repository's own evaluator.
pub struct ClientQueryDecorator<'r, R>
where
    R: ClientRepository + QueryEvaluator,
{
    repo: &'r mut R,
    query: ClientQuery,
}

impl<'r, R> ClientQueryDecorator<'r, R>
where
    R: ClientRepository + QueryEvaluator,
{
    pub fn new(repo: &'r mut R) -> Self {
        Self::with_query(repo, ClientQuery::new())
    }

    pub fn with_query(repo: &'r mut R, query: ClientQuery) -> Self {
        Self { repo, query }
    }

    /// Current criteria, detached from this decorator.
    pub fn query(&self) -> &ClientQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: ClientQuery) -> &mut Self {
        self.query = query;
        self
    }

    /// Replaces any existing filter.
    pub fn set_filter(&mut self, filter: Filter) -> &mut Self {
        self.query = self.query.with_filter(filter);
        self
    }

    pub fn clear_filter(&mut self) -> &mut Self {
        self.query = self.query.without_filter();
        self
    }

    /// Replaces any existing order.
    pub fn set_order(&mut self, order: Order) -> &mut Self {
        self.query = self.query.with_order(order);
        self
    }

    pub fn clear_order(&mut self) -> &mut Self {
        self.query = self.query.without_order();
        self
    }

    /// Reads a page under `query` without touching the stored criteria.
    pub fn page_with(&self, query: &ClientQuery, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        let window = PageWindow::new(k, n)?;
        let clients = self.repo.evaluate_page(query, window)?;
        debug!(
            "event=query_page module=query status=ok filtered={} ordered={} rows={}",
            query.filter().is_some(),
            query.order().is_some(),
            clients.len()
        );
        Ok(clients.iter().map(ClientShort::from).collect())
    }

    /// Counts matches for `query`; an unfiltered count is the plain count.
    pub fn count_with(&self, query: &ClientQuery) -> RepoResult<usize> {
        if query.filter().is_none() {
            return self.repo.count();
        }
        self.repo.evaluate_count(query)
    }
}

impl<R> ClientRepository for ClientQueryDecorator<'_, R>
where
    R: ClientRepository + QueryEvaluator,
{
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.repo.get_by_id(id)
    }

    fn add(&mut self, client: &mut Client) -> RepoResult<ClientId> {
        self.repo.add(client)
    }

    fn replace_by_id(&mut self, id: ClientId, client: &Client) -> RepoResult<()> {
        self.repo.replace_by_id(id, client)
    }

    fn delete_by_id(&mut self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    fn page(&self, k: u32, n: u32) -> RepoResult<Vec<ClientShort>> {
        self.page_with(&self.query, k, n)
    }

    fn sort_by_field(&mut self, field_name: &str) -> RepoResult<()> {
        self.repo.sort_by_field(field_name)
    }

    fn count(&self) -> RepoResult<usize> {
        self.count_with(&self.query)
    }

    fn channel(&self) -> &NotificationChannel {
        self.repo.channel()
    }

    fn channel_mut(&mut self) -> &mut NotificationChannel {
        self.repo.channel_mut()
    }
}
