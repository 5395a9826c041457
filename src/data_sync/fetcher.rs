use crate::data_sync::config::GraphSyncConfig;
use crate::data_sync::query::{GraphEntity, GraphQuery};
use crate::data_sync::response::{GraphPage, decode_page};
use crate::data_sync::transport::{GraphTransport, HttpTransport};
use crate::errors::{FetchError, FetchResult};
use crate::markets::{Pair, PairLite, Pairs, Token, Tokens};
use crate::utils::constants::{LOG_TRUNCATE_LEN, NO_BLOCK_NUM};
use crate::utils::truncate_chars;
use eyre::Result;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::BuildHasher;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Records that can be paged through with an `id_gt` cursor.
pub trait CursorRecord {
    fn cursor_id(&self) -> &str;
}

impl CursorRecord for Pair {
    fn cursor_id(&self) -> &str {
        &self.id
    }
}

impl CursorRecord for Token {
    fn cursor_id(&self) -> &str {
        &self.id
    }
}

/// Everything collected by one full pagination run.
#[derive(Debug)]
struct PagedRecords<T> {
    records: Vec<T>,
    pages: usize,
    lowest_block_number: i64,
}

/// Fetches pairs and tokens from the indexing service.
///
/// Full fetches page through the whole entity set with an `id_gt` cursor and
/// fail as a whole if any page cannot be obtained. Pair updates are split into
/// batches that run concurrently; a failing batch is logged and contributes
/// nothing.
#[derive(Clone)]
pub struct GraphFetcher {
    config: GraphSyncConfig,
    transport: Arc<dyn GraphTransport>,
}

impl GraphFetcher {
    pub fn new(config: GraphSyncConfig, transport: Arc<dyn GraphTransport>) -> Self {
        Self { config, transport }
    }

    /// Fetcher talking HTTP to `config.url`.
    pub fn from_config(config: GraphSyncConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn get_config(&self) -> &GraphSyncConfig {
        &self.config
    }

    /// Post `payload` until the response carries `data.<entity>`.
    ///
    /// Transport errors abort immediately. `Ok(None)` means every attempt
    /// came back malformed.
    async fn query_with_retry<T: DeserializeOwned>(&self, payload: &GraphQuery, entity: GraphEntity) -> FetchResult<Option<GraphPage<T>>> {
        let attempts = self.config.missing_data_retries;
        for attempt in 1..=attempts {
            let response = self
                .transport
                .post_with_retry(&self.config.url, payload)
                .await
                .map_err(|source| FetchError::Transport { url: self.config.url.clone(), source })?;

            match decode_page(&response, entity) {
                Ok(page) => return Ok(Some(page)),
                Err(reason) => {
                    let response_str = response.to_string();
                    warn!("Attempt {} of {}.", attempt, attempts);
                    warn!(
                        "Response from graph is not usable: {}\n  url: {}\n  response: {}...\n  query: {} ...\n",
                        reason,
                        self.config.url,
                        truncate_chars(&response_str, LOG_TRUNCATE_LEN),
                        truncate_chars(&payload.query, LOG_TRUNCATE_LEN)
                    );
                }
            }
        }
        Ok(None)
    }

    /// One page of pairs with id greater than `last_id` (`""` for the first page).
    pub async fn fetch_pair_page(&self, first: usize, last_id: &str) -> FetchResult<Option<GraphPage<Pair>>> {
        self.query_with_retry(&GraphQuery::pair_page(first, last_id), GraphEntity::Pairs).await
    }

    /// One page of tokens with id greater than `last_id` (`""` for the first page).
    pub async fn fetch_token_page(&self, first: usize, last_id: &str) -> FetchResult<Option<GraphPage<Token>>> {
        self.query_with_retry(&GraphQuery::token_page(first, last_id), GraphEntity::Tokens).await
    }

    /// Page through an entity until a page comes back shorter than requested.
    async fn paginate<T>(&self, entity: GraphEntity, build_query: fn(usize, &str) -> GraphQuery) -> FetchResult<PagedRecords<T>>
    where
        T: CursorRecord + DeserializeOwned,
    {
        let page_size = self.config.page_size.max(1);
        let mut last_id = String::new();
        let mut collected = PagedRecords { records: Vec::new(), pages: 0, lowest_block_number: NO_BLOCK_NUM };

        loop {
            let query = build_query(page_size, &last_id);
            let Some(page) = self.query_with_retry::<T>(&query, entity).await? else {
                return Err(FetchError::NoData { entity: entity.to_string(), received: collected.records.len() });
            };
            collected.pages += 1;

            if let Some(block_number) = page.block_number.filter(|n| *n >= 0) {
                if collected.lowest_block_number == NO_BLOCK_NUM || block_number < collected.lowest_block_number {
                    collected.lowest_block_number = block_number;
                }
            }

            let received = page.records.len();
            let exhausted = received < page_size;
            if let Some(last) = page.records.last() {
                last_id = last.cursor_id().to_string();
            }

            collected.records.extend(page.records);
            debug!("Received {} {} (total received: {}) ...", received, entity, collected.records.len());

            if exhausted {
                return Ok(collected);
            }
        }
    }

    /// Fetch every pair. Nothing is returned unless all pages arrive.
    #[instrument(skip_all, fields(url = %self.config.url))]
    pub async fn fetch_all_pairs(&self) -> FetchResult<Pairs> {
        let PagedRecords { records, pages, lowest_block_number } = self.paginate::<Pair>(GraphEntity::Pairs, GraphQuery::pair_page).await?;

        let mut pairs: Pairs = records.into_iter().collect();
        pairs.set_lowest_block_number(lowest_block_number);
        pairs.clear_updated_since_lowest_block_number();

        info!("Fetched {} pairs in {} pages, lowest block {}", pairs.len(), pages, lowest_block_number);
        Ok(pairs)
    }

    /// Fetch every token. Nothing is returned unless all pages arrive.
    #[instrument(skip_all, fields(url = %self.config.url))]
    pub async fn fetch_all_tokens(&self) -> FetchResult<Tokens> {
        let PagedRecords { records, pages, .. } = self.paginate::<Token>(GraphEntity::Tokens, GraphQuery::token_page).await?;

        let tokens: Tokens = records.into_iter().collect();
        info!("Fetched {} tokens in {} pages", tokens.len(), pages);
        Ok(tokens)
    }

    /// Reserves and prices for one batch of pair ids, optionally as of
    /// `block_number` (`NO_BLOCK_NUM` for latest). The whole slice goes out in
    /// a single query; [`Self::fetch_pair_updates`] splits by `batch_size`.
    pub async fn fetch_pair_update_batch<S: AsRef<str> + Sync>(&self, pair_ids: &[S], block_number: i64) -> FetchResult<Option<Vec<PairLite>>> {
        let query = GraphQuery::pair_update(pair_ids, block_number);
        let page = self.query_with_retry::<PairLite>(&query, GraphEntity::Pairs).await?;
        Ok(page.map(|page| page.records))
    }

    /// Refresh the given pairs in concurrent batches.
    ///
    /// Batches that fail (transport error or no data after retries) are
    /// dropped with a warning, so the result may cover fewer pairs than asked
    /// for. Order across batches is not preserved.
    #[instrument(skip_all, fields(pairs = pair_ids.len(), block = block_number))]
    pub async fn fetch_pair_updates<H: BuildHasher + Sync>(&self, pair_ids: &HashSet<String, H>, block_number: i64) -> Vec<PairLite> {
        if pair_ids.is_empty() {
            return Vec::new();
        }

        let pair_ids: Vec<&String> = pair_ids.iter().collect();
        let batch_size = self.config.batch_size.max(1);

        let requests = pair_ids.chunks(batch_size).enumerate().map(|(batch_idx, batch)| async move {
            match self.fetch_pair_update_batch(batch, block_number).await {
                Ok(Some(pairs)) => Some(pairs),
                Ok(None) => {
                    warn!("Batch {} ({} pairs): no pair data after {} attempts", batch_idx + 1, batch.len(), self.config.missing_data_retries);
                    None
                }
                Err(e) => {
                    warn!("Batch {} ({} pairs): error in concurrent pair update:\n{}", batch_idx + 1, batch.len(), e);
                    None
                }
            }
        });

        let mut pairs = Vec::new();
        for batch_result in join_all(requests).await {
            match batch_result {
                Some(batch_pairs) => pairs.extend(batch_pairs),
                None => warn!("Failed to get data in one or more concurrent pair update batches. Ignoring."),
            }
        }

        debug!("Returning {} updated pairs", pairs.len());
        pairs
    }

    /// Fetch updates for `pair_ids` and apply them to `pairs`. Returns how many
    /// stored pairs were updated.
    pub async fn apply_pair_updates<H: BuildHasher + Sync>(&self, pairs: &mut Pairs, pair_ids: &HashSet<String, H>, block_number: i64) -> usize {
        let updates = self.fetch_pair_updates(pair_ids, block_number).await;
        let applied = updates.iter().filter(|update| pairs.update_pair(update)).count();
        if applied < updates.len() {
            debug!("{} updates referenced unknown pairs", updates.len() - applied);
        }
        applied
    }
}

/// Builder for [`GraphFetcher`]
pub struct GraphFetcherBuilder {
    config: Option<GraphSyncConfig>,
    transport: Option<Arc<dyn GraphTransport>>,
}

impl GraphFetcherBuilder {
    pub fn new() -> Self {
        Self { config: None, transport: None }
    }

    pub fn with_config(mut self, config: GraphSyncConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn GraphTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Falls back to [`GraphSyncConfig::from_env`] and an HTTP transport.
    pub fn build(self) -> Result<GraphFetcher> {
        let config = match self.config {
            Some(config) => config,
            None => GraphSyncConfig::from_env()?,
        };
        config.validate()?;

        match self.transport {
            Some(transport) => Ok(GraphFetcher::new(config, transport)),
            None => GraphFetcher::from_config(config),
        }
    }
}

impl Default for GraphFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
