//! Data Synchronization Layer
//!
//! Pulls pair and token data from a subgraph-style indexing service:
//!
//! - Cursor pagination over the full pair and token sets
//! - Retry of responses that arrive without the expected data field
//! - Concurrent batched refresh of known pairs, optionally at a past block
//!
//! Transport failures surface immediately on full fetches and are
//! downgraded to empty batches on pair updates.

pub mod config;
pub mod fetcher;
pub mod query;
pub mod response;
pub mod transport;


pub use config::{GraphConfigRoot, GraphSyncConfig};
pub use fetcher::{CursorRecord, GraphFetcher, GraphFetcherBuilder};
pub use query::{GraphEntity, GraphQuery};
pub use response::{GraphPage, MalformedResponse, decode_page};
pub use transport::{GraphTransport, HttpTransport};
