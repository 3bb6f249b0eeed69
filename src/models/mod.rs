pub mod query;
pub mod resource;
pub mod schemas;

pub use query::{Predicate, QueryState, SortKey};
pub use resource::Resource;
pub use schemas::{Company, CompanyRef, Job, ListingRow, Resume, User};
