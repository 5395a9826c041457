// Data layer: queries, transport and pagination against the indexing service
pub mod data_sync;
// In-memory pair and token collections filled by the data layer
pub mod markets;

pub mod errors;
pub mod utils;

pub use data_sync::{GraphEntity, GraphFetcher, GraphFetcherBuilder, GraphPage, GraphQuery, GraphSyncConfig, GraphTransport, HttpTransport};
pub use errors::{FetchError, FetchResult, TransportError};
pub use markets::{Pair, PairLite, Pairs, Token, TokenRef, Tokens};
pub use utils::constants::NO_BLOCK_NUM;
