pub mod tmdb;
pub mod traits;
pub mod xtream;

pub use tmdb::TmdbLookup;
pub use traits::{CatalogProvider, MetadataProvider};
pub use xtream::XtreamCatalog;
