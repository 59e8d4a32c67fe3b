pub mod memory;
pub mod provider;
pub mod tmdb;
mod wire;

pub use provider::CatalogProvider;
pub use showfinder_core::error::CatalogError;
pub use tmdb::TmdbClient;
