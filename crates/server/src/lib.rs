pub mod config;
pub mod error;
pub mod live;
pub mod routes;
pub mod state;
