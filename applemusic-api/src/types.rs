//! Data types for Apple Music catalog API responses.
//!
//! Catalog resources share one envelope: `{ "id", "type", "href",
//! "attributes", "relationships" }`. `attributes` and `relationships` are
//! absent when a resource appears as a bare reference, so both are optional
//! here. Field names follow Rust conventions; serde maps them from the API's
//! camelCase.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::AppleMusicError;

/// A page of resources.
///
/// `next` is the path of the following page (e.g.
/// `/v1/catalog/us/artists/1/albums?offset=10`). Pass it to
/// [`AppleMusicClient::next_page`](crate::AppleMusicClient::next_page) to
/// fetch it; nothing follows it automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl<T> Default for DataResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next: None,
        }
    }
}

/// Results of [`AppleMusicClient::search`](crate::AppleMusicClient::search).
///
/// Only the groups named in the request's `types` can be `Some`, and a group
/// without matches is omitted by the API altogether.
///
/// API JSON path: `response.results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<DataResponse<Song>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<DataResponse<Album>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<DataResponse<Artist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlists: Option<DataResponse<Playlist>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: SearchResults,
}

/// Artwork template.
///
/// `url` contains `{w}` and `{h}` placeholders; use [`url_for`](Self::url_for)
/// to get a concrete image URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Maximum width available.
    pub width: u32,
    /// Maximum height available.
    pub height: u32,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color4: Option<String>,
}

impl Artwork {
    /// Fill the size placeholders of the URL template.
    pub fn url_for(&self, width: u32, height: u32) -> String {
        self.url
            .replace("{w}", &width.to_string())
            .replace("{h}", &height.to_string())
    }
}

/// Editorial notes attached to albums, artists and songs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorialNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Playlist description text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub standard: String,
}

/// Content advisory rating. Absent on unrated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRating {
    Clean,
    Explicit,
}

/// Kind of items a playlist contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackType {
    MusicVideos,
    Songs,
}

/// A genre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<GenreAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

/// A song in the catalog.
///
/// Returned by [`AppleMusicClient::song`](crate::AppleMusicClient::song),
/// inside [`SearchResults`], and as album/playlist tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    /// Catalog ID (e.g. `"1440857781"`).
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SongAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<SongRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,
    #[serde(default)]
    pub album_name: String,
    pub artist_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<ContentRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_notes: Option<EditorialNotes>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u32>,
    // Classical recordings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<DataResponse<Album>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<DataResponse<Artist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<DataResponse<Genre>>,
}

/// An album in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AlbumAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AlbumRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub name: String,
    pub artist_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<ContentRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_notes: Option<EditorialNotes>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub is_single: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub track_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<DataResponse<Artist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<DataResponse<Genre>>,
    /// Album tracks. Music videos share the song shape and decode here too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<DataResponse<Song>>,
}

/// An artist in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ArtistAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<ArtistRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_notes: Option<EditorialNotes>,
    #[serde(default)]
    pub genre_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums: Option<DataResponse<Album>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<DataResponse<Genre>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<DataResponse<Station>>,
}

/// A playlist in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Catalog ID (e.g. `"pl.f4d106fed2bd41149aaacabb233eb5eb"`).
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PlaylistAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<PlaylistRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub name: String,
    #[serde(default)]
    pub curator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionAttribute>,
    #[serde(default)]
    pub is_chart: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    pub playlist_type: PlaylistType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_types: Option<Vec<TrackType>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<DataResponse<Song>>,
}

/// Who made a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaylistType {
    /// Created by an Apple Music curator.
    Editorial,
    /// Created by a non-Apple curator or brand.
    External,
    /// Personalized mix for an Apple Music user.
    PersonalMix,
    /// Personalized Apple Music Replay playlist.
    Replay,
    /// Created and shared by an Apple Music user.
    UserShared,
}

/// A radio station (e.g. an artist's station).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<StationAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Artwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_millis: Option<u64>,
    #[serde(default)]
    pub is_live: bool,
}

/// Two-letter storefront (country) code used in every catalog path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Storefront(Cow<'static, str>);

impl Storefront {
    pub const US: Self = Self(Cow::Borrowed("us"));
    pub const DE: Self = Self(Cow::Borrowed("de"));
    pub const CH: Self = Self(Cow::Borrowed("ch"));
    pub const GB: Self = Self(Cow::Borrowed("gb"));
    pub const JP: Self = Self(Cow::Borrowed("jp"));

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self::US
    }
}

impl fmt::Display for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Storefront {
    type Err = AppleMusicError;

    /// Accepts any two ASCII letters, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(Cow::Owned(s.to_ascii_lowercase())))
        } else {
            Err(AppleMusicError::InvalidArgument(format!(
                "storefront must be a two-letter country code, got {s:?}"
            )))
        }
    }
}

/// Resource groups a search can return, mapped to the `types` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Songs,
    Albums,
    Artists,
    Playlists,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::Playlists => "playlists",
        }
    }
}

/// Relationships that can be embedded with `include` or fetched directly
/// from an artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipType {
    Songs,
    Albums,
    Artists,
    Genres,
    Station,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::Genres => "genres",
            Self::Station => "station",
        }
    }
}

/// Comma-join `as_str` values for list-valued query parameters.
pub(crate) fn join_params<T: Copy>(items: &[T], as_str: fn(T) -> &'static str) -> String {
    items.iter().map(|&i| as_str(i)).collect::<Vec<_>>().join(",")
}

/// Page of an artist view (`/artists/{id}/view/{name}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ViewAttributes>,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewAttributes {
    pub title: String,
}

/// A named artist view and the resource type it lists.
///
/// Used as a type parameter of
/// [`AppleMusicClient::artist_view`](crate::AppleMusicClient::artist_view):
///
/// ```no_run
/// # async fn demo(client: &applemusic_api::AppleMusicClient) -> applemusic_api::Result<()> {
/// use applemusic_api::types::TopSongs;
/// let page = client.artist_view::<TopSongs>("159260351", 10, 0).await?;
/// # Ok(()) }
/// ```
pub trait ArtistView {
    /// Path segment of the view.
    const IDENTIFIER: &'static str;
    type Item: DeserializeOwned;
}

macro_rules! artist_views {
    ($($(#[$doc:meta])* $name:ident => $id:literal, $item:ty;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl ArtistView for $name {
                const IDENTIFIER: &'static str = $id;
                type Item = $item;
            }
        )*

        /// Identifiers of every known artist view.
        pub const ARTIST_VIEWS: &[&str] = &[$($id),*];
    };
}

artist_views! {
    /// Other artists similar to this artist.
    SimilarArtists => "similar-artists", Artist;
    /// Albums by other artists on which this artist also appears.
    AppearsOnAlbums => "appears-on-albums", Album;
    /// Albums selected as featured for the artist.
    FeaturedAlbums => "featured-albums", Album;
    /// Playlists associated with the artist.
    FeaturedPlaylists => "featured-playlists", Playlist;
    /// Full-release albums.
    FullAlbums => "full-albums", Album;
    /// The latest release, while the catalog still considers it recent.
    LatestRelease => "latest-release", Album;
    /// Albums categorized as singles.
    Singles => "singles", Album;
    /// Songs ranked by popularity in the current storefront.
    TopSongs => "top-songs", Song;
}
