//! Gestion de la session authentifiée
//!
//! La session est un simple bearer token avec une date d'expiration
//! optionnelle. L'obtention du token (flow PKCE, refresh) est la
//! responsabilité de l'appelant ; voir `config_ext` pour la persistance.

use super::SpotifyApi;
use crate::error::{Result, SpotifyError};
use crate::models::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session authentifiée auprès de l'API Spotify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token d'accès
    pub access_token: String,
    /// Date d'expiration du token, si connue
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Crée une session avec un token et une expiration optionnelle
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Vérifie si la session est expirée
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

/// Réponse de l'endpoint /me
#[derive(Debug, Deserialize)]
struct UserProfileResponse {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl SpotifyApi {
    /// Installe une session authentifiée
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Retourne la session courante si disponible
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Vérifie si une session valide (non expirée) est disponible
    pub fn is_authenticated(&self) -> bool {
        matches!(&self.session, Some(s) if !s.is_expired())
    }

    /// Supprime la session courante
    pub fn logout(&mut self) {
        debug!("Logging out");
        self.session = None;
    }

    /// Retourne le token de la session, ou `Unauthenticated`
    ///
    /// C'est le seul chemin qui produit `Unauthenticated` : un token présent
    /// mais rejeté par l'API distante produit un `RemoteApi { 401, .. }`,
    /// les deux cas restent distinguables par l'appelant.
    pub(crate) fn ensure_authenticated(&self) -> Result<&str> {
        match &self.session {
            None => Err(SpotifyError::Unauthenticated(
                "no session, login required".to_string(),
            )),
            Some(s) if s.is_expired() => Err(SpotifyError::Unauthenticated(
                "session expired, login required".to_string(),
            )),
            Some(s) => Ok(&s.access_token),
        }
    }

    /// Récupère le profil de l'utilisateur connecté
    pub async fn get_current_user(&self) -> Result<UserProfile> {
        debug!("Fetching current user profile");
        let response: UserProfileResponse = self.get("/me", &[]).await?;
        Ok(UserProfile {
            id: response.id,
            display_name: response.display_name,
        })
    }
}
