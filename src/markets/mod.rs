pub mod pair;
pub mod pairs;
pub mod token;
pub mod tokens;

pub use pair::{Pair, PairLite, TokenRef};
pub use pairs::Pairs;
pub use token::Token;
pub use tokens::Tokens;
