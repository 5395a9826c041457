use serde::{Deserialize, Serialize};

/// Minimal token reference nested in a pair record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Pair record from a full fetch.
///
/// Quantities are kept as the decimal strings the graph returns so no
/// precision is lost; the `*_f64` accessors parse on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub id: String,
    pub reserve0: String,
    pub reserve1: String,
    #[serde(rename = "reserveUSD")]
    pub reserve_usd: String,
    pub token0: TokenRef,
    pub token1: TokenRef,
    pub token0_price: String,
    pub token1_price: String,
    pub liquidity_provider_count: String,
}

/// Reserve and price refresh for a known pair, as returned by an `id_in` query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairLite {
    pub id: String,
    pub reserve0: String,
    pub reserve1: String,
    #[serde(rename = "reserveUSD")]
    pub reserve_usd: String,
    pub token0_price: String,
    pub token1_price: String,
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

impl Pair {
    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn reserve0_f64(&self) -> Option<f64> {
        parse_f64(&self.reserve0)
    }

    pub fn reserve1_f64(&self) -> Option<f64> {
        parse_f64(&self.reserve1)
    }

    pub fn reserve_usd_f64(&self) -> Option<f64> {
        parse_f64(&self.reserve_usd)
    }

    pub fn token0_price_f64(&self) -> Option<f64> {
        parse_f64(&self.token0_price)
    }

    pub fn token1_price_f64(&self) -> Option<f64> {
        parse_f64(&self.token1_price)
    }

    pub fn liquidity_provider_count_u64(&self) -> Option<u64> {
        self.liquidity_provider_count.trim().parse().ok()
    }

    /// Overwrite reserves and prices with a newer observation of the same pair.
    /// Returns false if the update belongs to a different pair.
    pub fn apply_update(&mut self, update: &PairLite) -> bool {
        if update.id != self.id {
            return false;
        }
        self.reserve0.clone_from(&update.reserve0);
        self.reserve1.clone_from(&update.reserve1);
        self.reserve_usd.clone_from(&update.reserve_usd);
        self.token0_price.clone_from(&update.token0_price);
        self.token1_price.clone_from(&update.token1_price);
        true
    }
}
