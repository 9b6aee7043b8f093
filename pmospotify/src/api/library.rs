//! Module d'accès à la bibliothèque utilisateur (playlists et tracks)
//!
//! C'est ici que vit la logique de pagination : le plafond de page de l'API
//! distante est masqué aux appelants, qui reçoivent des séquences
//! complètement matérialisées et normalisées.

use super::SpotifyApi;
use crate::error::{Result, SpotifyError};
use crate::models::{Playlist, Track, UNKNOWN_PLAYLIST, UNKNOWN_TRACK};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Taille de page maximale acceptée par le listing de playlists
pub const MAX_PLAYLIST_PAGE_SIZE: u32 = 50;

/// Taille de batch pour le listing des tracks d'une playlist
pub(crate) const TRACK_BATCH_SIZE: u32 = 100;

/// Masque de projection des champs demandés pour les tracks
///
/// Seuls le nom, l'id, les noms d'artistes et les images de l'album sont
/// transférés : choix délibéré pour réduire la taille des réponses.
const TRACK_FIELDS: &str = "items(track(name,id,artists(name),album(images,!name,!artists)))";

/// Réponse paginée de l'API
#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Entrée du listing /me/playlists
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    images: Option<Vec<ImageResponse>>,
    #[serde(default)]
    tracks: Option<PlaylistTracksRef>,
}

/// Sous-objet `tracks` d'une playlist (référence, pas les tracks elles-mêmes)
#[derive(Debug, Deserialize)]
struct PlaylistTracksRef {
    #[serde(default)]
    total: u32,
}

/// Entrée du listing /playlists/{id}/tracks
///
/// Le champ `track` peut être absent (entrée supprimée côté distant) :
/// ces entrées sont ignorées à la normalisation.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemResponse {
    #[serde(default)]
    track: Option<TrackResponse>,
}

/// Objet track projeté par le masque de champs
#[derive(Debug, Deserialize)]
pub(crate) struct TrackResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "Vec::new")]
    artists: Vec<ArtistResponse>,
    #[serde(default)]
    album: Option<AlbumResponse>,
}

/// Réponse artiste (nom seul, conformément au masque)
#[derive(Debug, Deserialize)]
pub(crate) struct ArtistResponse {
    #[serde(default)]
    name: Option<String>,
}

/// Réponse album (images seules, conformément au masque)
#[derive(Debug, Deserialize)]
struct AlbumResponse {
    #[serde(default = "Vec::new")]
    images: Vec<ImageResponse>,
}

/// Réponse image
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Calcule le plan de batches pour `total` tracks
///
/// Retourne les paires (offset, limit) : `total / 100` batches pleins aux
/// offsets 0, 100, 200, …, puis un batch final de `total % 100` si non nul.
/// `total == 0` produit un plan vide (aucune requête émise).
pub(crate) fn track_batches(total: u32) -> Vec<(u32, u32)> {
    let full_batches = total / TRACK_BATCH_SIZE;
    let remainder = total % TRACK_BATCH_SIZE;

    let mut batches = Vec::with_capacity((full_batches + 1) as usize);
    for i in 0..full_batches {
        batches.push((i * TRACK_BATCH_SIZE, TRACK_BATCH_SIZE));
    }
    if remainder > 0 {
        batches.push((full_batches * TRACK_BATCH_SIZE, remainder));
    }
    batches
}

/// Retourne l'URL de la première image, ou une chaîne vide
fn first_image_url(images: &[ImageResponse]) -> String {
    images
        .first()
        .and_then(|img| img.url.clone())
        .unwrap_or_default()
}

impl SpotifyApi {
    /// Normalise une entrée brute du listing de playlists
    pub(crate) fn parse_playlist(raw: PlaylistResponse) -> Playlist {
        Playlist {
            id: raw.id,
            name: raw.name.unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string()),
            track_count: raw.tracks.map(|t| t.total).unwrap_or(0),
            artwork_url: first_image_url(raw.images.as_deref().unwrap_or(&[])),
        }
    }

    /// Normalise un objet track brut
    ///
    /// Les noms d'artistes sont joints par ", " ; une liste vide donne une
    /// chaîne vide (le défaut "Unknown Artist" est appliqué à l'affichage,
    /// pas ici).
    pub(crate) fn parse_track(raw: TrackResponse) -> Track {
        let artist = raw
            .artists
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        Track {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
            artist,
            artwork_url: raw
                .album
                .map(|a| first_image_url(&a.images))
                .unwrap_or_default(),
        }
    }

    /// Joint les noms d'artistes d'un objet track brut (pour la lecture courante)
    pub(crate) fn join_artists(raw: &TrackResponse) -> String {
        raw.artists
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Retourne le nom d'un objet track brut, avec défaut
    pub(crate) fn track_name(raw: &TrackResponse) -> String {
        raw.name
            .clone()
            .unwrap_or_else(|| UNKNOWN_TRACK.to_string())
    }

    /// Récupère toutes les playlists de l'utilisateur
    ///
    /// Pagine le listing distant par pages de `page_size` (1-50) jusqu'à
    /// recevoir une page courte, et retourne la séquence aplatie dans
    /// l'ordre du listing distant. Le plafond de 50 est celui de l'API.
    ///
    /// # Errors
    ///
    /// * `Configuration` - `page_size` hors de l'intervalle 1-50
    /// * `Unauthenticated` - aucune session valide (aucune requête émise)
    /// * `RemoteApi` - réponse non-2xx, propagée sans retry
    pub async fn get_user_playlists(&self, page_size: u32) -> Result<Vec<Playlist>> {
        if page_size == 0 || page_size > MAX_PLAYLIST_PAGE_SIZE {
            return Err(SpotifyError::Configuration(format!(
                "playlist page size must be between 1 and {}, got {}",
                MAX_PLAYLIST_PAGE_SIZE, page_size
            )));
        }

        self.ensure_authenticated()?;
        debug!("Fetching user playlists (page size {})", page_size);

        let limit = page_size.to_string();
        let mut playlists = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let offset_str = offset.to_string();
            let params = [("limit", limit.as_str()), ("offset", offset_str.as_str())];

            let page: PagedResponse<PlaylistResponse> =
                self.get("/me/playlists", &params).await?;
            let received = page.items.len();

            playlists.extend(page.items.into_iter().map(Self::parse_playlist));

            // Une page courte termine le listing
            if (received as u32) < page_size {
                break;
            }
            offset += page_size;
        }

        debug!("Fetched {} playlists", playlists.len());
        Ok(playlists)
    }

    /// Récupère toutes les tracks d'une playlist
    ///
    /// Voir [`SpotifyApi::get_playlist_tracks_with_cancel`].
    pub async fn get_playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<Track>> {
        self.get_playlist_tracks_with_cancel(playlist, &CancellationToken::new())
            .await
    }

    /// Récupère toutes les tracks d'une playlist, avec annulation
    ///
    /// Émet `track_count / 100` batches pleins aux offsets 0, 100, …, puis
    /// un batch final de `track_count % 100` si non nul. `track_count == 0`
    /// n'émet aucune requête. L'ordre du résultat est la concaténation des
    /// batches par offset croissant, chaque batch gardant son ordre interne.
    ///
    /// Le token d'annulation est consulté avant chaque batch : si l'appelant
    /// a navigué ailleurs, le fetch s'arrête avec `Cancelled`.
    ///
    /// # Errors
    ///
    /// Un échec en cours de séquence abandonne tout le fetch et jette les
    /// résultats partiels.
    pub async fn get_playlist_tracks_with_cancel(
        &self,
        playlist: &Playlist,
        cancel: &CancellationToken,
    ) -> Result<Vec<Track>> {
        self.ensure_authenticated()?;

        let batches = track_batches(playlist.track_count);
        debug!(
            "Fetching {} tracks for playlist {} in {} batch(es)",
            playlist.track_count,
            playlist.id,
            batches.len()
        );

        let endpoint = format!("/playlists/{}/tracks", playlist.id);
        let mut tracks = Vec::with_capacity(playlist.track_count as usize);

        for (offset, limit) in batches {
            if cancel.is_cancelled() {
                debug!("Track fetch for playlist {} cancelled", playlist.id);
                return Err(SpotifyError::Cancelled);
            }

            let offset_str = offset.to_string();
            let limit_str = limit.to_string();
            let params = [
                ("fields", TRACK_FIELDS),
                ("offset", offset_str.as_str()),
                ("limit", limit_str.as_str()),
                ("additional_types", "track"),
            ];

            let page: PagedResponse<PlaylistItemResponse> =
                self.get(&endpoint, &params).await?;

            tracks.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .map(Self::parse_track),
            );
        }

        debug!("Fetched {} tracks for playlist {}", tracks.len(), playlist.id);
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_batches_empty() {
        assert!(track_batches(0).is_empty());
    }

    #[test]
    fn test_track_batches_exact_multiple() {
        assert_eq!(track_batches(100), vec![(0, 100)]);
        assert_eq!(track_batches(200), vec![(0, 100), (100, 100)]);
    }

    #[test]
    fn test_track_batches_with_remainder() {
        assert_eq!(track_batches(37), vec![(0, 37)]);
        assert_eq!(track_batches(250), vec![(0, 100), (100, 100), (200, 50)]);
    }

    #[test]
    fn test_track_batches_request_count() {
        for n in [0u32, 1, 99, 100, 101, 250, 1000] {
            let batches = track_batches(n);
            assert_eq!(batches.len() as u32, n.div_ceil(TRACK_BATCH_SIZE));
            assert_eq!(batches.iter().map(|(_, l)| l).sum::<u32>(), n);
        }
    }

    #[test]
    fn test_parse_playlist_defaults() {
        // Playlist sans nom, sans images, zéro track
        let raw: PlaylistResponse = serde_json::from_value(json!({
            "id": "pl1",
            "name": null,
            "tracks": {"total": 0},
            "images": []
        }))
        .unwrap();

        let playlist = SpotifyApi::parse_playlist(raw);
        assert_eq!(playlist.name, UNKNOWN_PLAYLIST);
        assert_eq!(playlist.track_count, 0);
        assert_eq!(playlist.artwork_url, "");
    }

    #[test]
    fn test_parse_playlist_full() {
        let raw: PlaylistResponse = serde_json::from_value(json!({
            "id": "pl2",
            "name": "Jazz",
            "tracks": {"total": 250},
            "images": [{"url": "https://img/cover.jpg"}, {"url": "https://img/small.jpg"}]
        }))
        .unwrap();

        let playlist = SpotifyApi::parse_playlist(raw);
        assert_eq!(playlist.name, "Jazz");
        assert_eq!(playlist.track_count, 250);
        assert_eq!(playlist.artwork_url, "https://img/cover.jpg");
    }

    #[test]
    fn test_parse_track_joins_artists() {
        let raw: TrackResponse = serde_json::from_value(json!({
            "id": "t1",
            "name": "So What",
            "artists": [{"name": "Miles Davis"}, {"name": "John Coltrane"}],
            "album": {"images": [{"url": "https://img/kob.jpg"}]}
        }))
        .unwrap();

        let track = SpotifyApi::parse_track(raw);
        assert_eq!(track.artist, "Miles Davis, John Coltrane");
        assert_eq!(track.artwork_url, "https://img/kob.jpg");
    }

    #[test]
    fn test_parse_track_empty_artists_stays_empty() {
        let raw: TrackResponse = serde_json::from_value(json!({
            "id": "t2",
            "name": null,
            "artists": [],
            "album": {"images": []}
        }))
        .unwrap();

        let track = SpotifyApi::parse_track(raw);
        assert_eq!(track.name, UNKNOWN_TRACK);
        // Vide au fetch ; le défaut "Unknown Artist" n'arrive qu'au rendu
        assert_eq!(track.artist, "");
        assert_eq!(track.artwork_url, "");
    }
}
