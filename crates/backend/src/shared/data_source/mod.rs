pub mod api_client;
pub mod cache;
pub mod error;
pub mod source;
pub mod store;

pub use api_client::SalesApiClient;
pub use error::FetchError;
pub use source::SalesSource;
pub use store::{DataStore, YearSnapshot};
