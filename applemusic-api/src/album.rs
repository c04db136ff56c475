//! Album lookup.
//!
//! Endpoint: `GET /v1/catalog/{storefront}/albums/{id}`
//!
//! Without `include`, the response already embeds `artists` and `tracks`
//! relationships; `include=genres` adds genre objects.

use crate::client::AppleMusicClient;
use crate::error::{AppleMusicError, Result};
use crate::types::{Album, DataResponse, RelationshipType, join_params};

impl AppleMusicClient {
    /// Get an album by catalog ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppleMusicError::NotFound`] if the response holds no album.
    pub async fn album(&self, id: &str, include: &[RelationshipType]) -> Result<Album> {
        let path = self.catalog_path(&["albums", id]);
        let resp: DataResponse<Album> = self
            .get_json(&path, &[("include", join_params(include, RelationshipType::as_str))])
            .await?;
        resp.data.into_iter().next().ok_or(AppleMusicError::NotFound)
    }

    /// Re-fetch `album` with the given relationships embedded.
    pub async fn album_details(
        &self,
        album: &Album,
        include: &[RelationshipType],
    ) -> Result<Album> {
        self.album(&album.id, include).await
    }
}
