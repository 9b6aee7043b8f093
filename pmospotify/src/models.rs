//! Structures de données pour représenter les objets Spotify

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nom par défaut d'une playlist sans nom
pub const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";

/// Nom par défaut d'une track sans nom
pub const UNKNOWN_TRACK: &str = "Unknown Track";

/// Artiste affiché quand la liste d'artistes est vide
///
/// Appliqué uniquement à l'affichage (via [`Track::display_artist`]),
/// jamais lors de la normalisation.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Représente une playlist de l'utilisateur
///
/// Construite depuis une page du listing distant ; immutable une fois créée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Identifiant unique de la playlist (unique par compte)
    pub id: String,
    /// Nom de la playlist (jamais vide, défaut "Unknown Playlist")
    pub name: String,
    /// Nombre de tracks annoncé par le listing
    pub track_count: u32,
    /// URL de la première image de couverture, ou chaîne vide
    pub artwork_url: String,
}

/// Représente une track d'une playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Identifiant de la track (unique dans sa playlist, pas globalement)
    pub id: String,
    /// Titre de la track (jamais vide, défaut "Unknown Track")
    pub name: String,
    /// Noms des artistes joints par ", " ; vide si aucun artiste listé
    pub artist: String,
    /// URL de la première image de l'album, ou chaîne vide
    pub artwork_url: String,
}

impl Track {
    /// Retourne l'artiste à afficher
    ///
    /// La normalisation laisse `artist` vide quand l'API ne liste aucun
    /// artiste ; le défaut "Unknown Artist" n'est appliqué qu'ici, au moment
    /// du rendu.
    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            UNKNOWN_ARTIST
        } else {
            &self.artist
        }
    }
}

/// Identifiant stable d'un device de lecture
///
/// Les devices sont toujours référencés par cet id, jamais par leur nom
/// d'affichage : deux devices peuvent partager le même nom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        DeviceId(s.to_string())
    }
}

/// Représente un device de lecture Spotify Connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Identifiant stable du device
    pub id: DeviceId,
    /// Nom d'affichage (présentation uniquement, non unique)
    pub display_name: String,
    /// Device actuellement actif pour la lecture
    pub is_active: bool,
    /// Device restreint (ne peut pas être contrôlé via l'API)
    pub is_restricted: bool,
    /// Volume en pourcentage (0-100)
    pub volume_percent: u8,
}

/// État de lecture, à deux valeurs
///
/// Modifié uniquement par les actions de lecture explicites ou en
/// interrogeant l'endpoint de lecture courante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// Profil de l'utilisateur connecté
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identifiant du compte
    pub id: String,
    /// Nom d'affichage (peut être absent)
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Retourne le nom à afficher, ou "Unknown" si absent
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }
}

/// Lecture en cours sur le device actif
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Titre de la track en cours
    pub name: String,
    /// Noms des artistes joints par ", "
    pub artist: String,
    /// La lecture est-elle en cours
    pub is_playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_artist_defaults_at_render_only() {
        let track = Track {
            id: "t1".to_string(),
            name: "Song".to_string(),
            artist: String::new(),
            artwork_url: String::new(),
        };
        // La donnée normalisée reste vide, seul l'affichage a un défaut
        assert_eq!(track.artist, "");
        assert_eq!(track.display_artist(), UNKNOWN_ARTIST);

        let track = Track {
            artist: "Miles Davis, John Coltrane".to_string(),
            ..track
        };
        assert_eq!(track.display_artist(), "Miles Davis, John Coltrane");
    }

    #[test]
    fn test_playback_state_default() {
        assert_eq!(PlaybackState::default(), PlaybackState::Paused);
        assert!(!PlaybackState::Paused.is_playing());
        assert!(PlaybackState::Playing.is_playing());
    }

    #[test]
    fn test_device_id_display() {
        let id = DeviceId::from("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }
}
