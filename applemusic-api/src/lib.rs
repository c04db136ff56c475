//! Apple Music catalog API client library.
//!
//! Provides authenticated, async access to the Apple Music catalog: search,
//! songs, albums, artists (with relationships and views) and playlists.
//!
//! # Authentication
//!
//! Every request carries a developer token. Tokens come from a
//! [`TokenIssuer`](auth::TokenIssuer) handed to the client at construction
//! and are cached per client until the lifetime the issuer reported runs
//! out. Concurrent requests on a cold or expired cache share a single
//! issuance.
//!
//! ```no_run
//! use applemusic_api::developer_token::DeveloperTokenIssuer;
//! use applemusic_api::types::SearchType;
//! use applemusic_api::AppleMusicClient;
//! use std::path::Path;
//!
//! # async fn demo() -> applemusic_api::Result<()> {
//! let issuer = DeveloperTokenIssuer::from_key_file(
//!     "TEAM_ID",
//!     "KEY_ID",
//!     Path::new("AuthKey_KEY_ID.p8"),
//! )?;
//! let client = AppleMusicClient::new(issuer)?;
//! let results = client.search("daft punk", 10, 0, &[SearchType::Songs]).await?;
//! # Ok(()) }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                                   | Endpoint (under `/v1/catalog/{storefront}`) |
//! |------------------------------------------|---------------------------------------------|
//! | [`AppleMusicClient::search`]              | `/search`                     |
//! | [`AppleMusicClient::song`]                | `/songs/{id}`                 |
//! | [`AppleMusicClient::songs`]               | `/songs?ids=`                 |
//! | [`AppleMusicClient::album`]               | `/albums/{id}`                |
//! | [`AppleMusicClient::artist`]              | `/artists/{id}`               |
//! | [`AppleMusicClient::artists`]             | `/artists?ids=`               |
//! | [`AppleMusicClient::artist_relationship`] | `/artists/{id}/{relationship}` |
//! | [`AppleMusicClient::artist_view`]         | `/artists/{id}/view/{view}`   |
//! | [`AppleMusicClient::playlist`]            | `/playlists/{id}`             |
//!
//! Paged responses expose `next`; fetch it with
//! [`AppleMusicClient::next_page`] when you want more.

mod album;
mod artist;
pub mod auth;
pub mod client;
pub mod config;
pub mod developer_token;
pub mod error;
pub mod expiring;
mod playlist;
mod search;
mod song;
pub mod types;

pub use auth::{Authenticator, StaticToken, TokenIssuance, TokenIssuer};
pub use client::{AppleMusicClient, ClientBuilder};
pub use error::{AppleMusicError, BoxError, Result};
pub use song::MAX_SONG_IDS;
