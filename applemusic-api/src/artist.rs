//! Artist lookups, relationships and views.
//!
//! # Endpoints
//!
//! ## `artists` — `GET /v1/catalog/{storefront}/artists?ids=1,2`
//!
//! ## `artist_relationship` — `GET /v1/catalog/{storefront}/artists/{id}/{relationship}`
//!
//! Query: `limit`, `offset`, `include`. Returns a data page of the related
//! resource (`songs`, `albums`, ...) with a `next` link.
//!
//! ## `artist_view` — `GET /v1/catalog/{storefront}/artists/{id}/view/{view}`
//!
//! Response:
//! ```json
//! {
//!   "next": "/v1/catalog/us/artists/159260351/view/top-songs?offset=10",
//!   "attributes": { "title": "Top Songs" },
//!   "data": [ { "id": "...", "type": "songs", "attributes": { ... } } ]
//! }
//! ```

use crate::client::AppleMusicClient;
use crate::error::{AppleMusicError, Result};
use crate::types::{
    Album, Artist, ArtistView, DataResponse, RelationshipType, Song, ViewResponse, join_params,
};
use serde::de::DeserializeOwned;

impl AppleMusicClient {
    /// Get several artists by catalog ID. No IDs means no request and an
    /// empty response.
    pub async fn artists(
        &self,
        ids: &[&str],
        include: &[RelationshipType],
    ) -> Result<DataResponse<Artist>> {
        if ids.is_empty() {
            return Ok(DataResponse::default());
        }
        let path = self.catalog_path(&["artists"]);
        self.get_json(
            &path,
            &[
                ("ids", ids.join(",")),
                ("include", join_params(include, RelationshipType::as_str)),
            ],
        )
        .await
    }

    /// Get one artist by catalog ID.
    pub async fn artist(&self, id: &str, include: &[RelationshipType]) -> Result<Artist> {
        let path = self.catalog_path(&["artists", id]);
        let resp: DataResponse<Artist> = self
            .get_json(&path, &[("include", join_params(include, RelationshipType::as_str))])
            .await?;
        resp.data.into_iter().next().ok_or(AppleMusicError::NotFound)
    }

    /// Fetch one page of an artist relationship, decoded as `T`.
    ///
    /// `T` must match the relationship: [`Song`] for `Songs`, [`Album`] for
    /// `Albums`, and so on.
    pub async fn artist_relationship<T: DeserializeOwned>(
        &self,
        relationship: RelationshipType,
        id: &str,
        include: &[RelationshipType],
        limit: u32,
        offset: u32,
    ) -> Result<DataResponse<T>> {
        let path = self.catalog_path(&["artists", id, relationship.as_str()]);
        self.get_json(
            &path,
            &[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("include", join_params(include, RelationshipType::as_str)),
            ],
        )
        .await
    }

    pub async fn artist_songs(
        &self,
        artist: &Artist,
        limit: u32,
        offset: u32,
        include: &[RelationshipType],
    ) -> Result<DataResponse<Song>> {
        self.artist_relationship(RelationshipType::Songs, &artist.id, include, limit, offset)
            .await
    }

    pub async fn artist_albums(
        &self,
        artist: &Artist,
        limit: u32,
        offset: u32,
        include: &[RelationshipType],
    ) -> Result<DataResponse<Album>> {
        self.artist_relationship(RelationshipType::Albums, &artist.id, include, limit, offset)
            .await
    }

    /// Fetch one page of the artist view `V` (e.g.
    /// [`TopSongs`](crate::types::TopSongs),
    /// [`SimilarArtists`](crate::types::SimilarArtists)).
    pub async fn artist_view<V: ArtistView>(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ViewResponse<V::Item>> {
        let path = self.catalog_path(&["artists", id, "view", V::IDENTIFIER]);
        self.get_json(
            &path,
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }
}
