//! Catalog and library sources for the Folio engine.
//!
//! - [`JsonCatalog`] and [`JsonLibrary`] read local JSON fixtures.
//! - [`open_library::OpenLibraryCatalog`] fetches candidate books from the
//!   Open Library search API.
//! - [`CachedCatalog`] keeps the last catalog in a
//!   [`KeyValueStore`](folio_core::KeyValueStore) so the remote service is
//!   queried at most once per TTL window.
#![forbid(unsafe_code)]

mod cached;
mod json;
pub mod open_library;

pub use cached::{CATALOG_CACHE_KEY, CATALOG_CACHE_TTL, CachedCatalog, CachedCatalogConfig};
pub use json::{JsonCatalog, JsonLibrary};
