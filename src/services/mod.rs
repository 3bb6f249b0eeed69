pub mod api_client;
pub mod catalog;
pub mod data_source;

pub use api_client::{ApiClient, AuthContext, ResourceFetcher};
pub use catalog::Catalog;
pub use data_source::{DataSourceOptions, Page, PageFetcher, PageSnapshot, PaginatedDataSource};
