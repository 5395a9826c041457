use super::token::Token;
use ahash::HashMap;
use alloy_primitives::Address;

/// All known tokens keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Tokens {
    tokens: HashMap<String, Token>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, replacing any previous record with the same id.
    pub fn add_token(&mut self, token: Token) {
        self.tokens.insert(token.id.clone(), token);
    }

    pub fn get_token(&self, id: &str) -> Option<&Token> {
        self.tokens.get(id)
    }

    /// Look up a token by contract address. Graph ids are lower-case hex.
    pub fn get_by_address(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(&format!("{address:#x}"))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }
}

impl FromIterator<Token> for Tokens {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut tokens = Tokens::new();
        for token in iter {
            tokens.add_token(token);
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_address() {
        let tokens: Tokens = vec![
            Token::new_with_data("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "WETH", "Wrapped Ether", 18),
            Token::new_with_data("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "USDC", "USD Coin", 6),
        ]
        .into_iter()
        .collect();

        let weth: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
        assert_eq!(tokens.get_by_address(&weth).map(Token::get_symbol), Some("WETH"));
        assert!(tokens.get_by_address(&Address::ZERO).is_none());
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_add_token_replaces() {
        let mut tokens = Tokens::new();
        tokens.add_token(Token::new_with_data("0x01", "OLD", "Old", 18));
        tokens.add_token(Token::new_with_data("0x01", "NEW", "New", 18));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get_token("0x01").unwrap().get_symbol(), "NEW");
    }
}
