//! Read access to the catalog and to a user's library.
//!
//! Both sources live outside the engine. Providers report failures through
//! [`ProviderError`]; the recommendation path treats a failed read as an
//! empty collection, so callers that need to tell "nothing to recommend"
//! apart from "source failed" must call the provider themselves.

use thiserror::Error;

use crate::{BookRecord, InteractionRecord, UserKey};

/// Errors returned by [`CatalogProvider`] and [`LibraryProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Reading a local source failed.
    #[error("failed to read {origin}: {message}")]
    Io {
        /// Path or name of the source.
        origin: String,
        /// Description of the failure.
        message: String,
    },
    /// The source was readable but its payload could not be decoded.
    #[error("failed to parse {origin}: {message}")]
    Parse {
        /// Path, URL, or name of the source.
        origin: String,
        /// Description of the failure.
        message: String,
    },
    /// The request could not reach the remote service.
    #[error("network error for {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Description of the failure.
        message: String,
    },
    /// The remote service answered with an error status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The remote service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
}

/// Source of candidate books.
///
/// The order of the returned records is significant: ties in score keep
/// catalog order.
///
/// # Examples
///
/// ```rust
/// use folio_core::{BookRecord, CatalogProvider, ProviderError};
///
/// struct Fixed(Vec<BookRecord>);
///
/// impl CatalogProvider for Fixed {
///     fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let catalog = Fixed(vec![BookRecord::new("1", "Dune")]);
/// assert_eq!(catalog.books()?.len(), 1);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait CatalogProvider: Send + Sync {
    /// Return the current catalog snapshot.
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError>;
}

/// Source of a user's interaction history.
pub trait LibraryProvider: Send + Sync {
    /// Return every interaction recorded for `user`.
    fn interactions(&self, user: &UserKey) -> Result<Vec<InteractionRecord>, ProviderError>;
}

impl<P: CatalogProvider + ?Sized> CatalogProvider for Box<P> {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        (**self).books()
    }
}

impl<P: LibraryProvider + ?Sized> LibraryProvider for Box<P> {
    fn interactions(&self, user: &UserKey) -> Result<Vec<InteractionRecord>, ProviderError> {
        (**self).interactions(user)
    }
}
