use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use applemusic_api::config::Credentials;
use applemusic_api::types::{
    Album, AppearsOnAlbums, Artist, FeaturedAlbums, FeaturedPlaylists, FullAlbums, LatestRelease,
    Playlist, RelationshipType, SearchType, SimilarArtists, Singles, Song, Storefront, TopSongs,
};
use applemusic_api::{AppleMusicClient, StaticToken};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

// Lifetime assumed for a token passed in from outside; its real expiry is unknown.
const STATIC_TOKEN_LIFETIME_SECS: i64 = 12 * 60 * 60;

#[derive(Parser)]
#[command(name = "applemusic", version, about = "Apple Music catalog CLI")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Pre-minted developer token (skips signing with saved credentials)
    #[arg(long, env = "APPLE_MUSIC_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    /// Two-letter storefront code (defaults to the saved one, then `us`)
    #[arg(short, long, env = "APPLE_MUSIC_STOREFRONT", global = true)]
    storefront: Option<String>,
    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Save MusicKit credentials used to sign developer tokens
    Login {
        /// Apple developer team ID
        #[arg(long, required_unless_present = "check")]
        team_id: Option<String>,
        /// MusicKit key ID
        #[arg(long, required_unless_present = "check")]
        key_id: Option<String>,
        /// Path to the `AuthKey_<KEY_ID>.p8` private key
        #[arg(long, value_name = "PATH", required_unless_present = "check")]
        key: Option<PathBuf>,
        /// Check that saved credentials can sign a token and reach the API
        #[arg(long)]
        check: bool,
    },
    /// Delete saved credentials
    Logout,
    /// Print a developer token freshly signed with the saved credentials
    /// (`--token` and `--storefront` do not apply)
    Token,
    /// Search the catalog
    Search {
        /// Search term
        term: String,
        /// Resource groups to search
        #[arg(short = 't', long = "type", value_delimiter = ',', default_value = "songs")]
        types: Vec<SearchKind>,
        /// Results per group
        #[arg(short, long, default_value = "10")]
        limit: u32,
        /// Pagination offset
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Show song details
    Song {
        /// Song catalog ID
        id: String,
    },
    /// Show album details and tracks
    Album {
        /// Album catalog ID
        id: String,
    },
    /// Show an artist, or one of its views
    Artist {
        /// Artist catalog ID
        id: String,
        /// Artist view to list instead of the artist itself
        #[arg(long)]
        view: Option<ViewKind>,
        /// Items per page (with --view)
        #[arg(short, long, default_value = "10")]
        limit: u32,
        /// Pagination offset (with --view)
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Show playlist details and tracks
    Playlist {
        /// Playlist catalog ID (e.g. `pl.f4d106fed2bd41149aaacabb233eb5eb`)
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    Songs,
    Albums,
    Artists,
    Playlists,
}

impl From<SearchKind> for SearchType {
    fn from(k: SearchKind) -> Self {
        match k {
            SearchKind::Songs => Self::Songs,
            SearchKind::Albums => Self::Albums,
            SearchKind::Artists => Self::Artists,
            SearchKind::Playlists => Self::Playlists,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewKind {
    SimilarArtists,
    AppearsOnAlbums,
    FeaturedAlbums,
    FeaturedPlaylists,
    FullAlbums,
    LatestRelease,
    Singles,
    TopSongs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = &cli.global;
    match cli.command {
        Command::Login {
            team_id,
            key_id,
            key,
            check,
        } => cmd_login(global, team_id, key_id, key, check).await,
        Command::Logout => cmd_logout(),
        Command::Token => cmd_token(global),
        Command::Search {
            term,
            types,
            limit,
            offset,
        } => cmd_search(global, &term, &types, limit, offset).await,
        Command::Song { id } => cmd_song(global, &id).await,
        Command::Album { id } => cmd_album(global, &id).await,
        Command::Artist {
            id,
            view,
            limit,
            offset,
        } => cmd_artist(global, &id, view, limit, offset).await,
        Command::Playlist { id } => cmd_playlist(global, &id).await,
    }
}

/// Build a client from `--token` if given, otherwise from saved credentials.
fn make_client(global: &GlobalArgs) -> Result<AppleMusicClient> {
    let creds = Credentials::load().context("failed to load credentials")?;
    let storefront: Storefront = match &global.storefront {
        Some(code) => code.parse()?,
        None => creds.storefront()?,
    };

    let builder = if let Some(token) = &global.token {
        AppleMusicClient::builder(StaticToken::new(token.as_str(), STATIC_TOKEN_LIFETIME_SECS))
    } else {
        if !creds.is_configured() {
            bail!("no credentials saved; run `applemusic login` or pass --token");
        }
        let issuer = creds.issuer().context("failed to read private key")?;
        AppleMusicClient::builder(issuer)
    };
    debug!(%storefront, static_token = global.token.is_some(), "building client");
    Ok(builder.storefront(storefront).build()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_duration(ms: u64) -> String {
    format!("{}:{:02}", ms / 60_000, (ms / 1000) % 60)
}

fn song_line(s: &Song) -> String {
    match &s.attributes {
        Some(a) => format!(
            "  [{}] {} - {} ({})",
            s.id,
            a.artist_name,
            a.name,
            a.duration_in_millis.map_or_else(|| "-".to_owned(), format_duration)
        ),
        None => format!("  [{}]", s.id),
    }
}

fn album_line(a: &Album) -> String {
    match &a.attributes {
        Some(attrs) => format!("  [{}] {} - {}", a.id, attrs.artist_name, attrs.name),
        None => format!("  [{}]", a.id),
    }
}

fn artist_line(a: &Artist) -> String {
    match &a.attributes {
        Some(attrs) => format!("  [{}] {}", a.id, attrs.name),
        None => format!("  [{}]", a.id),
    }
}

fn playlist_line(p: &Playlist) -> String {
    match &p.attributes {
        Some(attrs) => format!("  [{}] {} ({})", p.id, attrs.name, attrs.curator_name),
        None => format!("  [{}]", p.id),
    }
}

// ── login / logout / token ──

async fn cmd_login(
    global: &GlobalArgs,
    team_id: Option<String>,
    key_id: Option<String>,
    key: Option<PathBuf>,
    check: bool,
) -> Result<()> {
    if check {
        let client = make_client(global)?;
        check_credentials(&client).await?;
        println!("Credentials OK (storefront {}).", client.storefront());
        return Ok(());
    }

    let key = key.context("--key is required")?;
    let key = key
        .canonicalize()
        .with_context(|| format!("cannot access {}", key.display()))?;
    if let Some(code) = &global.storefront {
        code.parse::<Storefront>()?;
    }
    let creds = Credentials {
        team_id,
        key_id,
        private_key_path: Some(key),
        storefront: global.storefront.clone(),
    };
    creds.issuer().context("credentials cannot sign a token")?;
    creds.save()?;
    println!("Credentials saved.");
    Ok(())
}

/// One cheap authenticated request; fails if the API rejects the token.
async fn check_credentials(client: &AppleMusicClient) -> Result<()> {
    client
        .search("apple", 1, 0, &[SearchType::Songs])
        .await
        .with_context(|| format!("credential check failed (storefront {})", client.storefront()))?;
    Ok(())
}

fn cmd_logout() -> Result<()> {
    Credentials::clear()?;
    println!("Credentials cleared.");
    Ok(())
}

/// Global flags that `token` does not use.
fn flags_ignored_by_token(global: &GlobalArgs) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if global.token.is_some() {
        ignored.push("--token");
    }
    if global.storefront.is_some() {
        ignored.push("--storefront");
    }
    ignored
}

fn cmd_token(global: &GlobalArgs) -> Result<()> {
    for flag in flags_ignored_by_token(global) {
        warn!("{flag} is ignored: `token` signs with the saved credentials");
    }
    let creds = Credentials::load()?;
    let issued = creds.issuer()?.sign()?;
    println!("{}", issued.token);
    eprintln!("valid for {} seconds", issued.lifetime_secs);
    Ok(())
}

// ── search ──

async fn cmd_search(
    global: &GlobalArgs,
    term: &str,
    kinds: &[SearchKind],
    limit: u32,
    offset: u32,
) -> Result<()> {
    let client = make_client(global)?;
    let types: Vec<SearchType> = kinds.iter().copied().map(Into::into).collect();
    let results = client.search(term, limit, offset, &types).await?;
    if global.json {
        return print_json(&results);
    }

    if let Some(songs) = &results.songs {
        println!("Songs:");
        songs.data.iter().for_each(|s| println!("{}", song_line(s)));
    }
    if let Some(albums) = &results.albums {
        println!("Albums:");
        albums.data.iter().for_each(|a| println!("{}", album_line(a)));
    }
    if let Some(artists) = &results.artists {
        println!("Artists:");
        artists.data.iter().for_each(|a| println!("{}", artist_line(a)));
    }
    if let Some(playlists) = &results.playlists {
        println!("Playlists:");
        playlists.data.iter().for_each(|p| println!("{}", playlist_line(p)));
    }
    Ok(())
}

// ── song / album / artist / playlist ──

async fn cmd_song(global: &GlobalArgs, id: &str) -> Result<()> {
    let client = make_client(global)?;
    let song = client
        .song(id, &[RelationshipType::Albums, RelationshipType::Artists])
        .await?;
    if global.json {
        return print_json(&song);
    }

    let a = song.attributes.context("song has no attributes")?;
    println!("Song:     {} (id={})", a.name, song.id);
    println!("Artist:   {}", a.artist_name);
    println!("Album:    {}", a.album_name);
    if let Some(ms) = a.duration_in_millis {
        println!("Duration: {}", format_duration(ms));
    }
    if !a.genre_names.is_empty() {
        println!("Genres:   {}", a.genre_names.join(", "));
    }
    if let Some(isrc) = &a.isrc {
        println!("ISRC:     {isrc}");
    }
    if let Some(date) = &a.release_date {
        println!("Released: {date}");
    }
    Ok(())
}

async fn cmd_album(global: &GlobalArgs, id: &str) -> Result<()> {
    let client = make_client(global)?;
    let album = client.album(id, &[]).await?;
    if global.json {
        return print_json(&album);
    }

    let a = album.attributes.context("album has no attributes")?;
    println!("Album:    {} (id={})", a.name, album.id);
    println!("Artist:   {}", a.artist_name);
    println!("Tracks:   {}", a.track_count);
    if let Some(label) = &a.record_label {
        println!("Label:    {label}");
    }
    if let Some(date) = &a.release_date {
        println!("Released: {date}");
    }
    if let Some(tracks) = album.relationships.and_then(|r| r.tracks) {
        println!();
        tracks.data.iter().for_each(|s| println!("{}", song_line(s)));
    }
    Ok(())
}

async fn cmd_artist(
    global: &GlobalArgs,
    id: &str,
    view: Option<ViewKind>,
    limit: u32,
    offset: u32,
) -> Result<()> {
    let client = make_client(global)?;
    let Some(view) = view else {
        let artist = client.artist(id, &[]).await?;
        if global.json {
            return print_json(&artist);
        }
        let a = artist.attributes.context("artist has no attributes")?;
        println!("Artist:   {} (id={})", a.name, artist.id);
        if !a.genre_names.is_empty() {
            println!("Genres:   {}", a.genre_names.join(", "));
        }
        return Ok(());
    };

    macro_rules! show_view {
        ($view:ty, $line:ident) => {{
            let page = client.artist_view::<$view>(id, limit, offset).await?;
            if global.json {
                return print_json(&page);
            }
            if let Some(attrs) = &page.attributes {
                println!("{}:", attrs.title);
            }
            page.data.iter().for_each(|item| println!("{}", $line(item)));
            if let Some(next) = &page.next {
                println!("\nMore: {next}");
            }
        }};
    }

    match view {
        ViewKind::SimilarArtists => show_view!(SimilarArtists, artist_line),
        ViewKind::AppearsOnAlbums => show_view!(AppearsOnAlbums, album_line),
        ViewKind::FeaturedAlbums => show_view!(FeaturedAlbums, album_line),
        ViewKind::FeaturedPlaylists => show_view!(FeaturedPlaylists, playlist_line),
        ViewKind::FullAlbums => show_view!(FullAlbums, album_line),
        ViewKind::LatestRelease => show_view!(LatestRelease, album_line),
        ViewKind::Singles => show_view!(Singles, album_line),
        ViewKind::TopSongs => show_view!(TopSongs, song_line),
    }
    Ok(())
}

async fn cmd_playlist(global: &GlobalArgs, id: &str) -> Result<()> {
    let client = make_client(global)?;
    let playlist = client.playlist(id, &[]).await?;
    if global.json {
        return print_json(&playlist);
    }

    let a = playlist.attributes.context("playlist has no attributes")?;
    println!("Playlist: {} (id={})", a.name, playlist.id);
    println!("Curator:  {}", a.curator_name);
    if let Some(desc) = &a.description {
        println!("Desc:     {}", desc.short.as_deref().unwrap_or(&desc.standard));
    }
    if let Some(tracks) = playlist.relationships.and_then(|r| r.tracks) {
        println!();
        tracks.data.iter().for_each(|s| println!("{}", song_line(s)));
        if let Some(next) = &tracks.next {
            println!("\nMore: {next}");
        }
    }
    Ok(())
}
