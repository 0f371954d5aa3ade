pub mod cache;
pub mod client;
pub mod pager;
pub mod queries;

pub use cache::ReferenceCache;
pub use client::{create_client, DirectusClient};
pub use pager::{fetch_paged, ErrorSink, PagedRows};
pub use queries::*;
