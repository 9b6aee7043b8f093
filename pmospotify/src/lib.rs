//! # pmospotify - Client Spotify pour PMOMusic
//!
//! Cette crate fournit un client Rust pour l'API Web Spotify, centré sur
//! la récupération paginée des playlists et de leurs tracks, ainsi que le
//! contrôle basique de la lecture (devices, transfert, pause/reprise).
//!
//! ## Vue d'ensemble
//!
//! `pmospotify` permet d'accéder aux fonctionnalités de Spotify :
//! - Listing complet des playlists de l'utilisateur (pagination jusqu'à épuisement)
//! - Récupération par batch des tracks d'une playlist, avec annulation
//! - Normalisation des réponses en structures simples prêtes à afficher
//! - Listing et sélection des devices de lecture (indexés par id stable)
//! - Transfert de lecture préservant l'intention play/pause
//! - Bascule lecture/pause et navigation next/previous
//! - Session stockée chiffrée via `pmoconfig`
//!
//! Le flow OAuth lui-même n'est pas porté par cette crate : l'appelant
//! fournit un token d'accès (directement ou via la configuration).
//!
//! ## Architecture
//!
//! La crate suit le pattern d'extension des autres crates PMO :
//! - `SpotifyClient` : Client principal avec session et registre de devices
//! - `models` : Structures de données (Playlist, Track, Device, etc.)
//! - `api` : Couche d'accès à l'API REST Spotify
//! - `devices` : Registre des devices de lecture
//! - `config_ext` : Extension de configuration pour pmoconfig
//!
//! ## Structure des modules
//!
//! ```text
//! pmospotify/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── client.rs           # Client Spotify principal
//! │   ├── models.rs           # Structures de données
//! │   ├── api/
//! │   │   ├── mod.rs          # API client
//! │   │   ├── auth.rs         # Session et profil utilisateur
//! │   │   ├── library.rs      # Playlists et tracks
//! │   │   └── player.rs       # Devices et contrôle de la lecture
//! │   ├── devices.rs          # Registre des devices
//! │   ├── config_ext.rs       # Extension pmoconfig
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ### Exemple basique avec configuration automatique
//!
//! ```rust,no_run
//! use pmospotify::SpotifyClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Utilise la session stockée dans pmoconfig
//!     let client = SpotifyClient::from_config()?;
//!
//!     for playlist in client.fetch_playlists().await? {
//!         println!("{} ({} tracks)", playlist.name, playlist.track_count);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Exemple avec token explicite
//!
//! ```rust,no_run
//! use pmospotify::SpotifyClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SpotifyClient::new("BQC4...", None)?;
//!
//!     let playlists = client.fetch_playlists().await?;
//!     if let Some(playlist) = playlists.first() {
//!         for track in client.fetch_tracks(playlist).await? {
//!             println!("{} - {}", track.name, track.display_artist());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Contrôle de la lecture
//!
//! ```rust,no_run
//! use pmospotify::SpotifyClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SpotifyClient::from_config()?;
//!
//!     // Lister les devices et transférer la lecture
//!     let devices = client.refresh_devices().await?;
//!     if let Some(device) = devices.first() {
//!         client.select_device(&device.id).await?;
//!     }
//!
//!     // Basculer lecture/pause
//!     let state = client.toggle_playback().await?;
//!     println!("Playback is now {:?}", state);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Gestion des erreurs
//!
//! La crate utilise `thiserror` pour définir des erreurs typées. Une session
//! locale absente ou expirée produit `Unauthenticated` sans toucher au
//! réseau ; un refus distant produit `RemoteApi` avec le statut et le corps
//! de la réponse :
//!
//! ```rust,ignore
//! use pmospotify::{SpotifyClient, SpotifyError};
//!
//! match client.fetch_playlists().await {
//!     Ok(playlists) => println!("{} playlists", playlists.len()),
//!     Err(SpotifyError::Unauthenticated(_)) => println!("Login required"),
//!     Err(SpotifyError::RemoteApi { status_code, .. }) => {
//!         println!("Spotify refused the request: HTTP {}", status_code)
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! ## Voir aussi
//!
//! - [`pmoconfig`] : Configuration et chiffrement des secrets

pub mod api;
pub mod client;
pub mod config_ext;
pub mod devices;
pub mod error;
pub mod models;

pub use api::auth::Session;
pub use api::SpotifyApi;
pub use client::SpotifyClient;
pub use config_ext::SpotifyConfigExt;
pub use devices::DeviceRegistry;
pub use error::{Result, SpotifyError};
pub use models::{
    Device, DeviceId, NowPlaying, PlaybackState, Playlist, Track, UserProfile,
};
