//! Client principal pour interagir avec l'API Spotify
//!
//! Ce module fournit un client haut-niveau qui produit des données prêtes
//! à afficher (playlists, tracks, devices) sans jamais détenir ni modifier
//! d'objet de présentation : le rendu est la responsabilité de l'appelant.

use crate::api::auth::Session;
use crate::api::library::MAX_PLAYLIST_PAGE_SIZE;
use crate::api::SpotifyApi;
use crate::config_ext::SpotifyConfigExt;
use crate::devices::DeviceRegistry;
use crate::error::{Result, SpotifyError};
use crate::models::{Device, DeviceId, NowPlaying, Playlist, PlaybackState, Track, UserProfile};
use chrono::{DateTime, Utc};
use pmoconfig::Config;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Client Spotify haut-niveau
pub struct SpotifyClient {
    /// API bas-niveau
    api: SpotifyApi,
    /// Devices connus, indexés par id
    devices: Mutex<DeviceRegistry>,
    /// Intention de lecture courante
    play_state: Mutex<PlaybackState>,
    /// Taille de page pour le listing de playlists (1-50)
    page_size: u32,
}

impl SpotifyClient {
    /// Crée un client avec un token d'accès
    ///
    /// # Arguments
    ///
    /// * `access_token` - Bearer token obtenu par le flow OAuth de l'appelant
    /// * `expires_at` - Date d'expiration du token, si connue
    pub fn new(
        access_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let mut api = SpotifyApi::new()?;
        api.set_session(Session::new(access_token, expires_at));
        Ok(Self::from_api(api))
    }

    /// Crée un client à partir d'une API déjà configurée
    ///
    /// Permet notamment de cibler une URL de base personnalisée.
    pub fn from_api(api: SpotifyApi) -> Self {
        Self {
            api,
            devices: Mutex::new(DeviceRegistry::new()),
            play_state: Mutex::new(PlaybackState::default()),
            page_size: MAX_PLAYLIST_PAGE_SIZE,
        }
    }

    /// Crée un client en utilisant la configuration de pmoconfig
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// use pmospotify::SpotifyClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let client = SpotifyClient::from_config()?;
    ///     let playlists = client.fetch_playlists().await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn from_config() -> Result<Self> {
        let config = pmoconfig::get_config();
        Self::from_config_obj(config.as_ref())
    }

    /// Crée un client depuis un objet Config spécifique
    ///
    /// # Errors
    ///
    /// Retourne `Unauthenticated` si aucun token valide n'est stocké dans
    /// la configuration : c'est à l'appelant de relancer le login.
    pub fn from_config_obj(config: &Config) -> Result<Self> {
        let token = config
            .get_spotify_auth_token()?
            .ok_or_else(|| {
                SpotifyError::Unauthenticated("no stored session, login required".to_string())
            })?;

        let expires_at = config
            .get_spotify_token_expires_at()?
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts as i64, 0));

        info!("Creating Spotify client from stored session");

        let mut client = Self::new(token, expires_at)?;
        client.set_page_size(config.get_spotify_page_size())?;
        Ok(client)
    }

    /// Définit la taille de page du listing de playlists
    ///
    /// # Errors
    ///
    /// Retourne `Configuration` si la taille est hors de l'intervalle 1-50
    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        if page_size == 0 || page_size > MAX_PLAYLIST_PAGE_SIZE {
            return Err(SpotifyError::Configuration(format!(
                "playlist page size must be between 1 and {}, got {}",
                MAX_PLAYLIST_PAGE_SIZE, page_size
            )));
        }
        self.page_size = page_size;
        Ok(())
    }

    /// Retourne la taille de page configurée
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Supprime la session courante
    pub fn logout(&mut self) {
        self.api.logout();
    }

    /// Récupère le profil de l'utilisateur connecté
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.api.get_current_user().await
    }

    // ============ Playlists et tracks ============

    /// Récupère toutes les playlists de l'utilisateur
    ///
    /// Le listing distant est paginé jusqu'à épuisement ; l'ordre retourné
    /// est celui du compte (pas alphabétique).
    pub async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        self.api.get_user_playlists(self.page_size).await
    }

    /// Récupère toutes les tracks d'une playlist
    pub async fn fetch_tracks(&self, playlist: &Playlist) -> Result<Vec<Track>> {
        self.api.get_playlist_tracks(playlist).await
    }

    /// Récupère toutes les tracks d'une playlist, avec annulation
    ///
    /// À utiliser quand l'utilisateur peut naviguer ailleurs pendant un
    /// fetch multi-batch : annuler le token abandonne le fetch au prochain
    /// batch au lieu de continuer à remplir une vue abandonnée.
    pub async fn fetch_tracks_with_cancel(
        &self,
        playlist: &Playlist,
        cancel: &CancellationToken,
    ) -> Result<Vec<Track>> {
        self.api
            .get_playlist_tracks_with_cancel(playlist, cancel)
            .await
    }

    // ============ Devices ============

    /// Interroge le listing distant des devices et met à jour le registre
    pub async fn refresh_devices(&self) -> Result<Vec<Device>> {
        let devices = self.api.get_devices().await?;
        debug!("Found {} playback device(s)", devices.len());

        let mut registry = self.devices.lock().unwrap();
        registry.replace_all(devices);
        Ok(registry.list())
    }

    /// Liste les devices connus (dernier listing)
    pub fn devices(&self) -> Vec<Device> {
        self.devices.lock().unwrap().list()
    }

    /// Retourne un device par son id
    pub fn device(&self, id: &DeviceId) -> Option<Device> {
        self.devices.lock().unwrap().get(id).cloned()
    }

    /// Transfère la lecture vers un device, en préservant l'intention de
    /// lecture
    ///
    /// Si la lecture est en pause, le transfert ne la démarre pas ; si elle
    /// est en cours, elle continue sur le nouveau device. Un transfert ne
    /// doit jamais surprendre un auditeur en pause en lançant le son.
    pub async fn select_device(&self, id: &DeviceId) -> Result<()> {
        let device = self
            .device(id)
            .ok_or_else(|| SpotifyError::NotFound(format!("device {} not in registry", id)))?;

        let keep_playing = self.playback_state().is_playing();
        self.api.transfer_playback(&device.id, keep_playing).await?;

        self.devices.lock().unwrap().set_active(id);
        info!(
            "Playback transferred to device {} ({})",
            device.display_name, device.id
        );
        Ok(())
    }

    // ============ Lecture ============

    /// Retourne l'intention de lecture courante
    pub fn playback_state(&self) -> PlaybackState {
        *self.play_state.lock().unwrap()
    }

    /// Bascule lecture/pause
    ///
    /// Interroge d'abord l'état distant, puis émet la commande inverse et
    /// met à jour l'intention locale. Retourne le nouvel état.
    pub async fn toggle_playback(&self) -> Result<PlaybackState> {
        let remote = self.api.get_current_playback().await?;
        let active = self.active_device_id();

        let new_state = match remote {
            Some(now_playing) if now_playing.is_playing => {
                self.api.pause_playback(active.as_ref()).await?;
                PlaybackState::Paused
            }
            _ => {
                self.api.start_playback(active.as_ref()).await?;
                PlaybackState::Playing
            }
        };

        *self.play_state.lock().unwrap() = new_state;
        Ok(new_state)
    }

    /// Interroge la lecture courante et synchronise l'intention locale
    ///
    /// Retourne `None` si aucune lecture n'est en cours.
    pub async fn currently_playing(&self) -> Result<Option<NowPlaying>> {
        let now_playing = self.api.get_current_playback().await?;

        if let Some(np) = &now_playing {
            let state = if np.is_playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            };
            *self.play_state.lock().unwrap() = state;
        }

        Ok(now_playing)
    }

    /// Passe à la track suivante
    pub async fn next_track(&self) -> Result<()> {
        self.api.next_track().await
    }

    /// Revient à la track précédente
    pub async fn previous_track(&self) -> Result<()> {
        self.api.previous_track().await
    }

    fn active_device_id(&self) -> Option<DeviceId> {
        self.devices.lock().unwrap().active_id().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        let mut client = SpotifyClient::new("token", None).unwrap();
        assert_eq!(client.page_size(), MAX_PLAYLIST_PAGE_SIZE);

        client.set_page_size(10).unwrap();
        assert_eq!(client.page_size(), 10);

        assert!(matches!(
            client.set_page_size(0),
            Err(SpotifyError::Configuration(_))
        ));
        assert!(matches!(
            client.set_page_size(51),
            Err(SpotifyError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config_without_session_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        match SpotifyClient::from_config_obj(&config) {
            Err(SpotifyError::Unauthenticated(_)) => {}
            Err(other) => panic!("expected Unauthenticated, got {}", other),
            Ok(_) => panic!("expected Unauthenticated, got a client"),
        }
    }

    #[test]
    fn test_initial_playback_state_is_paused() {
        let client = SpotifyClient::new("token", None).unwrap();
        assert_eq!(client.playback_state(), PlaybackState::Paused);
        assert!(client.devices().is_empty());
    }
}
