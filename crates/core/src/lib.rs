pub mod error;
pub mod images;
pub mod route;
pub mod slug;
pub mod sort;
pub mod types;
pub mod watchlist;
