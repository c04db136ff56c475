//! Playlist lookup.
//!
//! Endpoint: `GET /v1/catalog/{storefront}/playlists/{id}`
//!
//! Catalog playlist IDs look like `pl.f4d106fed2bd41149aaacabb233eb5eb`.
//! The response embeds the first page of `tracks`; later pages are reached
//! through `relationships.tracks.next`.

use crate::client::AppleMusicClient;
use crate::error::{AppleMusicError, Result};
use crate::types::{DataResponse, Playlist, RelationshipType, join_params};

impl AppleMusicClient {
    /// Get a catalog playlist by ID.
    pub async fn playlist(&self, id: &str, include: &[RelationshipType]) -> Result<Playlist> {
        let path = self.catalog_path(&["playlists", id]);
        let resp: DataResponse<Playlist> = self
            .get_json(&path, &[("include", join_params(include, RelationshipType::as_str))])
            .await?;
        resp.data.into_iter().next().ok_or(AppleMusicError::NotFound)
    }
}
