//! Search API.
//!
//! Endpoint: `GET /v1/catalog/{storefront}/search`
//!
//! Query parameters:
//! - `term` — search keyword (spaces are sent as `+`)
//! - `types` — comma-separated resource groups (`songs,albums,artists,playlists`)
//! - `limit` — page size per group (max 25)
//! - `offset` — pagination offset (0-based)
//!
//! Response JSON:
//! ```json
//! {
//!   "results": {
//!     "songs":     { "href": "...", "next": "/v1/catalog/us/search?offset=10&term=...", "data": [ ... ] },
//!     "albums":    { "data": [ ... ] },
//!     "artists":   { "data": [ ... ] },
//!     "playlists": { "data": [ ... ] }
//!   }
//! }
//! ```

use crate::client::AppleMusicClient;
use crate::error::Result;
use crate::types::{SearchResponse, SearchResults, SearchType, join_params};

impl AppleMusicClient {
    /// Search the catalog for songs, albums, artists and/or playlists.
    ///
    /// Each requested group comes back as its own page with its own `next`
    /// link. An empty `types` slice lets the API pick its default groups.
    pub async fn search(
        &self,
        term: &str,
        limit: u32,
        offset: u32,
        types: &[SearchType],
    ) -> Result<SearchResults> {
        let path = self.catalog_path(&["search"]);
        let resp: SearchResponse = self
            .get_json(
                &path,
                &[
                    ("term", term.to_owned()),
                    ("offset", offset.to_string()),
                    ("limit", limit.to_string()),
                    ("types", join_params(types, SearchType::as_str)),
                ],
            )
            .await?;
        Ok(resp.results)
    }
}
