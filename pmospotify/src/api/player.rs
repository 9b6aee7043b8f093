//! Module de contrôle de la lecture (devices, transfert, pause/reprise)

use super::library::TrackResponse;
use super::SpotifyApi;
use crate::error::Result;
use crate::models::{Device, DeviceId, NowPlaying};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Réponse de l'endpoint /me/player/devices
#[derive(Debug, Deserialize)]
struct DevicesResponse {
    #[serde(default = "Vec::new")]
    devices: Vec<DeviceResponse>,
}

/// Entrée device brute
///
/// L'id peut être absent (device temporairement indisponible) : ces
/// entrées ne peuvent pas être ciblées et sont ignorées.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceResponse {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    is_restricted: bool,
    #[serde(default)]
    volume_percent: Option<u8>,
}

/// Réponse de l'endpoint /me/player (lecture courante)
#[derive(Debug, Deserialize)]
struct CurrentPlaybackResponse {
    #[serde(default)]
    is_playing: bool,
    #[serde(default)]
    item: Option<TrackResponse>,
}

impl SpotifyApi {
    /// Normalise une entrée device brute
    ///
    /// Retourne `None` si le device n'a pas d'id utilisable.
    pub(crate) fn parse_device(raw: DeviceResponse) -> Option<Device> {
        let Some(id) = raw.id else {
            warn!("Skipping device '{}' without id", raw.name);
            return None;
        };

        Some(Device {
            id: DeviceId(id),
            display_name: raw.name,
            is_active: raw.is_active,
            is_restricted: raw.is_restricted,
            volume_percent: raw.volume_percent.unwrap_or(0),
        })
    }

    /// Récupère la liste des devices de lecture disponibles
    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        debug!("Fetching available playback devices");
        let response: DevicesResponse = self.get("/me/player/devices", &[]).await?;
        Ok(response
            .devices
            .into_iter()
            .filter_map(Self::parse_device)
            .collect())
    }

    /// Transfère la lecture vers un device
    ///
    /// `play` porte l'intention de lecture : `false` pour qu'un transfert
    /// pendant une pause ne démarre pas la lecture, `true` pour que la
    /// lecture en cours continue sur le nouveau device.
    pub async fn transfer_playback(&self, device_id: &DeviceId, play: bool) -> Result<()> {
        debug!("Transferring playback to device {} (play: {})", device_id, play);
        let body = json!({
            "device_ids": [device_id.as_str()],
            "play": play,
        });
        self.put_json("/me/player", body).await
    }

    /// Met la lecture en pause
    pub async fn pause_playback(&self, device_id: Option<&DeviceId>) -> Result<()> {
        debug!("Pausing playback");
        match device_id {
            Some(id) => {
                self.put_empty("/me/player/pause", &[("device_id", id.as_str())])
                    .await
            }
            None => self.put_empty("/me/player/pause", &[]).await,
        }
    }

    /// Démarre ou reprend la lecture
    pub async fn start_playback(&self, device_id: Option<&DeviceId>) -> Result<()> {
        debug!("Starting playback");
        match device_id {
            Some(id) => {
                self.put_empty("/me/player/play", &[("device_id", id.as_str())])
                    .await
            }
            None => self.put_empty("/me/player/play", &[]).await,
        }
    }

    /// Passe à la track suivante
    pub async fn next_track(&self) -> Result<()> {
        debug!("Skipping to next track");
        self.post_empty("/me/player/next", &[]).await
    }

    /// Revient à la track précédente
    pub async fn previous_track(&self) -> Result<()> {
        debug!("Skipping to previous track");
        self.post_empty("/me/player/previous", &[]).await
    }

    /// Interroge la lecture courante
    ///
    /// Retourne `None` si aucune lecture n'est en cours (204 No Content).
    pub async fn get_current_playback(&self) -> Result<Option<NowPlaying>> {
        debug!("Fetching current playback state");
        let response: Option<CurrentPlaybackResponse> =
            self.get_optional("/me/player", &[]).await?;

        Ok(response.map(|playback| {
            let (name, artist) = match &playback.item {
                Some(item) => (Self::track_name(item), Self::join_artists(item)),
                None => (String::new(), String::new()),
            };
            NowPlaying {
                name,
                artist,
                is_playing: playback.is_playing,
            }
        }))
    }
}
