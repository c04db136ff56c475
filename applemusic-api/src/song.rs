//! Song lookups.
//!
//! ## `song` — `GET /v1/catalog/{storefront}/songs/{id}`
//!
//! ## `songs` — `GET /v1/catalog/{storefront}/songs?ids=1,2,3`
//!
//! Both accept `include=albums,artists,...` to embed relationship data and
//! respond with a data page:
//!
//! ```json
//! {
//!   "data": [{
//!     "id": "1440857781", "type": "songs",
//!     "attributes": { "name": "...", "artistName": "...", "albumName": "...", ... },
//!     "relationships": { "artists": { "data": [{ "id": "487143", "type": "artists" }] } }
//!   }]
//! }
//! ```

use crate::client::AppleMusicClient;
use crate::error::{AppleMusicError, Result};
use crate::types::{DataResponse, RelationshipType, Song, join_params};

/// Most IDs the API accepts in one `songs` request.
pub const MAX_SONG_IDS: usize = 300;

impl AppleMusicClient {
    /// Get a song by catalog ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppleMusicError::NotFound`] if the response holds no song.
    pub async fn song(&self, id: &str, include: &[RelationshipType]) -> Result<Song> {
        let path = self.catalog_path(&["songs", id]);
        let resp: DataResponse<Song> = self
            .get_json(&path, &[("include", join_params(include, RelationshipType::as_str))])
            .await?;
        resp.data.into_iter().next().ok_or(AppleMusicError::NotFound)
    }

    /// Re-fetch `song` with the given relationships embedded.
    pub async fn song_details(&self, song: &Song, include: &[RelationshipType]) -> Result<Song> {
        self.song(&song.id, include).await
    }

    /// Get up to [`MAX_SONG_IDS`] songs in one request.
    ///
    /// IDs unknown to the storefront are silently missing from the result.
    pub async fn songs(&self, ids: &[&str], include: &[RelationshipType]) -> Result<Vec<Song>> {
        if ids.len() > MAX_SONG_IDS {
            return Err(AppleMusicError::InvalidArgument(format!(
                "at most {MAX_SONG_IDS} song ids per request, got {}",
                ids.len()
            )));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = self.catalog_path(&["songs"]);
        let resp: DataResponse<Song> = self
            .get_json(
                &path,
                &[
                    ("ids", ids.join(",")),
                    ("include", join_params(include, RelationshipType::as_str)),
                ],
            )
            .await?;
        Ok(resp.data)
    }

    /// Re-fetch several songs with the given relationships embedded.
    pub async fn songs_details(
        &self,
        songs: &[Song],
        include: &[RelationshipType],
    ) -> Result<Vec<Song>> {
        let ids: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
        self.songs(&ids, include).await
    }
}
