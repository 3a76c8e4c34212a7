//! Search providers
//!
//! Each provider implements the [`Provider`] contract: build a request,
//! parse a response, and let the provided `fetch` drive the round trip
//! under a timeout. Raw payloads stay opaque outside the normalizer arm
//! for their provider.

mod directory;
mod places;
mod traits;
mod websearch;

pub use directory::{DirectoryBusiness, DirectoryCategory, DirectoryLocation, DirectoryProvider};
pub use places::{PlaceHit, PlacesProvider};
pub use traits::{Provider, ProviderRequest, ProviderResponse};
pub use websearch::{PageMap, WebHit, WebSearchProvider};

/// Unmodified provider-specific payload from one search call. Only the
/// normalizer inspects the inner shape, and only for its own variant.
#[derive(Debug, Clone)]
pub enum RawResult {
    Directory(DirectoryBusiness),
    Places(PlaceHit),
    Web(WebHit),
}
