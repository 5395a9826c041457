/// Block number sentinel meaning "query the latest indexed state".
pub const NO_BLOCK_NUM: i64 = -1;

/// Records requested per page when paging through a full entity set.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Pair ids sent per `id_in` update query.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Attempts made when a response comes back without the expected data field.
pub const DEFAULT_MISSING_DATA_RETRIES: u32 = 5;

/// Diagnostic response bodies and queries are cut to this many characters.
pub const LOG_TRUNCATE_LEN: usize = 1024;

#[non_exhaustive]
pub struct GraphEndpoint;

impl GraphEndpoint {
    pub const SUSHISWAP_V2: &'static str = "https://api.thegraph.com/subgraphs/name/sushiswap/exchange";
}
