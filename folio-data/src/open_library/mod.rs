//! Catalog backed by the Open Library search API.
//!
//! [`OpenLibraryCatalog`] implements the synchronous
//! [`folio_core::CatalogProvider`] trait by blocking on an async `reqwest`
//! call, so the engine stays usable from plain synchronous code.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use folio_core::CatalogProvider;
//! use folio_data::open_library::{OpenLibraryCatalog, OpenLibraryConfig};
//!
//! let config = OpenLibraryConfig::default()
//!     .with_query("subject:fantasy")
//!     .with_limit(20)
//!     .with_timeout(Duration::from_secs(10));
//! let catalog = OpenLibraryCatalog::with_config(config)?;
//! let books = catalog.books()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod search;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_QUERY, DEFAULT_USER_AGENT, OpenLibraryCatalog,
    OpenLibraryConfig, OpenLibraryError,
};
pub use search::{SearchDoc, SearchResponse, format_isbn};
