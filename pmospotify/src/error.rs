//! Gestion des erreurs pour le client Spotify

use thiserror::Error;

/// Type Result personnalisé pour pmospotify
pub type Result<T> = std::result::Result<T, SpotifyError>;

/// Erreurs possibles lors de l'utilisation du client Spotify
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Aucune session authentifiée (token absent ou expiré)
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// Réponse non-2xx de l'API Spotify
    #[error("Spotify API error (status {status_code}): {body}")]
    RemoteApi { status_code: u16, body: String },

    /// Ressource non trouvée (playlist, device, etc.)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur de configuration Spotify (page size, client id, etc.)
    #[error("Spotify configuration error: {0}")]
    Configuration(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Fetch multi-batch annulé par l'appelant
    #[error("Fetch cancelled by caller")]
    Cancelled,

    /// Erreur générique
    #[error("Spotify error: {0}")]
    Other(String),
}

impl SpotifyError {
    /// Crée une erreur API depuis un code de statut HTTP et le corps de la réponse
    ///
    /// Toute réponse non-2xx est propagée telle quelle à l'appelant, sans retry
    /// ni backoff. Le 401 distant reste un `RemoteApi` : `Unauthenticated` est
    /// réservé à l'absence de session locale.
    pub fn from_status_code(code: u16, body: impl Into<String>) -> Self {
        Self::RemoteApi {
            status_code: code,
            body: body.into(),
        }
    }

    /// Vérifie si l'erreur indique un problème d'authentification
    /// (session locale absente/expirée, ou token rejeté par l'API)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SpotifyError::Unauthenticated(_)
                | SpotifyError::RemoteApi {
                    status_code: 401,
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_code() {
        let err = SpotifyError::from_status_code(503, "unavailable");
        match err {
            SpotifyError::RemoteApi { status_code, body } => {
                assert_eq!(status_code, 503);
                assert_eq!(body, "unavailable");
            }
            _ => panic!("expected RemoteApi"),
        }
    }

    #[test]
    fn test_is_auth_error() {
        assert!(SpotifyError::Unauthenticated("no session".to_string()).is_auth_error());
        assert!(SpotifyError::from_status_code(401, "token rejected").is_auth_error());
        assert!(!SpotifyError::from_status_code(500, "boom").is_auth_error());
        assert!(!SpotifyError::Cancelled.is_auth_error());
    }
}
