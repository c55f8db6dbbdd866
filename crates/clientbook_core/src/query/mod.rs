//! Filter/order composition over any client repository.
//!
//! # Responsibility
//! - Hold query criteria as immutable `ClientQuery` values.
//! - Evaluate them in memory for file repositories and as SQL for the
//!   database repository.
//! - Expose both through one `ClientQueryDecorator`.
//!
//! # Invariants
//! - At most one filter and one order at a time; setting one replaces it.
//! - Both evaluators return the same clients in the same order for the
//!   same data and criteria (ties broken by persisted order / ascending id).
//! - Pagination is applied after filtering and ordering.

pub mod criteria;
mod decorator;
pub mod memory;
pub mod sql;

use crate::model::client::Client;
use crate::repo::client_repo::{PageWindow, RepoResult};

pub use decorator::ClientQueryDecorator;
pub use criteria::{ClientQuery, Filter, Order, SortDirection};

/// Backend hook that runs a `ClientQuery` where the data lives.
pub trait QueryEvaluator {
    /// Clients matching `query`, ordered, restricted to `window`.
    fn evaluate_page(&self, query: &ClientQuery, window: PageWindow) -> RepoResult<Vec<Client>>;

    /// Number of clients matching `query`'s filter.
    fn evaluate_count(&self, query: &ClientQuery) -> RepoResult<usize>;
}
