//! Pagination core of the job-board client: page-window math, a paginated
//! data source with last-request-wins ordering, the REST page fetcher and a
//! small list backend speaking the same wire contract.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod page_window;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod utils;
