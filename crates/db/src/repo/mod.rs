pub mod kv;
pub mod watchlist;
