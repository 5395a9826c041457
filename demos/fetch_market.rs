//! Market Fetch Example
//!
//! Pulls every token and pair from the configured indexing service, then
//! refreshes the largest pairs once at the latest block and once at the
//! block the snapshot is consistent with.
//!
//! GRAPH_URL selects the endpoint; a TOML file with a [graph] section can be
//! passed as the first argument instead.
use eyre::Result;
use graph_sync::utils::GraphConfigLoader;
use graph_sync::{GraphFetcherBuilder, GraphSyncConfig, NO_BLOCK_NUM};
use std::collections::HashSet;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = match std::env::args().nth(1) {
        Some(path) => GraphSyncConfig::load_section_from_file(&path).await?,
        None => GraphSyncConfig::from_env()?,
    };
    info!("Using graph endpoint {}", config.url);

    let fetcher = GraphFetcherBuilder::new().with_config(config).build()?;

    let tokens = fetcher.fetch_all_tokens().await?;
    info!("Fetched {} tokens", tokens.len());

    let mut pairs = fetcher.fetch_all_pairs().await?;
    info!("Fetched {} pairs, consistent from block {}", pairs.len(), pairs.lowest_block_number());

    let mut by_liquidity: Vec<_> = pairs.iter().filter_map(|pair| pair.reserve_usd_f64().map(|usd| (usd, pair.id.clone()))).collect();
    by_liquidity.sort_by(|a, b| b.0.total_cmp(&a.0));
    let top_pairs: HashSet<String> = by_liquidity.into_iter().take(2500).map(|(_, id)| id).collect();

    let applied = fetcher.apply_pair_updates(&mut pairs, &top_pairs, NO_BLOCK_NUM).await;
    info!("Applied {} of {} latest pair updates", applied, top_pairs.len());
    if applied < top_pairs.len() {
        warn!("{} pairs were not refreshed", top_pairs.len() - applied);
    }

    let lowest_block = pairs.lowest_block_number();
    if lowest_block != NO_BLOCK_NUM {
        let historical = fetcher.fetch_pair_updates(&top_pairs, lowest_block).await;
        info!("Fetched {} pair states as of block {}", historical.len(), lowest_block);
    }

    for pair in pairs.iter().filter(|pair| top_pairs.contains(&pair.id)).take(10) {
        info!(
            "{}/{} reserves {} / {} (USD {}) price {}",
            pair.token0.symbol, pair.token1.symbol, pair.reserve0, pair.reserve1, pair.reserve_usd, pair.token0_price
        );
    }

    Ok(())
}
