use crate::utils::constants::NO_BLOCK_NUM;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

/// Top-level collections queried from the graph. The string form is the
/// field name under `data` in a response.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum GraphEntity {
    Pairs,
    Tokens,
}

/// Request body sent to the graph: `{ "query": ..., "variables": {} }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphQuery {
    pub query: String,
    pub variables: Map<String, Value>,
}

impl GraphQuery {
    pub fn new(query: String) -> Self {
        Self { query, variables: Map::new() }
    }

    /// Pairs with id greater than `last_id`, plus the indexed block number.
    pub fn pair_page(first: usize, last_id: &str) -> Self {
        Self::new(format!(
            r#"{{
      pairs(first: {first},
            where: {{ id_gt: "{last_id}" }}) {{
        id
        reserve0
        reserve1
        reserveUSD
        token0 {{
          id
          symbol
          name
        }}
        token1 {{
          id
          symbol
          name
        }}
        token0Price
        token1Price
        liquidityProviderCount
      }}
      _meta {{
        block {{
          number
        }}
      }}
    }}"#
        ))
    }

    /// Current (or historical, when `block_number` is not [`NO_BLOCK_NUM`])
    /// reserves and prices for exactly the given pairs. `first` matches the
    /// id count so no requested pair is cut off.
    pub fn pair_update<S: AsRef<str>>(pair_ids: &[S], block_number: i64) -> Self {
        let first = pair_ids.len();
        let ids = pair_ids.iter().map(|id| format!("\"{}\"", id.as_ref())).collect::<Vec<_>>().join(", ");
        let time_travel = if block_number != NO_BLOCK_NUM { format!("block: {{ number: {block_number} }}") } else { String::new() };

        Self::new(format!(
            r#"{{
      pairs(first: {first}
            where: {{id_in: [{ids}]}}
            {time_travel}) {{
        id
        reserve0
        reserve1
        reserveUSD
        token0Price
        token1Price
      }}
    }}"#
        ))
    }

    /// Tokens with id greater than `last_id`.
    pub fn token_page(first: usize, last_id: &str) -> Self {
        Self::new(format!(
            r#"{{
      tokens(first: {first},
             where: {{ id_gt: "{last_id}" }}) {{
        id
        symbol
        name
        decimals
      }}
    }}"#
        ))
    }
}
