pub mod query;
pub mod token;

pub use query::{QueryCache, QueryKey};
pub use token::TokenStore;
