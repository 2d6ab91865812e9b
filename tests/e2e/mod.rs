pub mod basic;
pub mod editing;
pub mod filter;
pub mod search_replace;
