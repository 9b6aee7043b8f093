//! Extension pour intégrer la configuration Spotify dans pmoconfig
//!
//! Ce module fournit le trait `SpotifyConfigExt` qui permet d'ajouter
//! facilement des méthodes de gestion des paramètres et de la session
//! Spotify à pmoconfig::Config. Le token d'accès est chiffré au repos via
//! `pmoconfig::encryption`.

use anyhow::{anyhow, Result};
use pmoconfig::Config;
use serde_yaml::Value;

/// Taille de page par défaut pour le listing de playlists
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Trait d'extension pour gérer la configuration Spotify dans pmoconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmospotify::SpotifyConfigExt;
///
/// let config = get_config();
/// let client_id = config.get_spotify_client_id()?;
/// println!("Spotify client id: {}", client_id);
/// ```
pub trait SpotifyConfigExt {
    /// Récupère le client id de l'application Spotify
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le client id n'est pas configuré
    fn get_spotify_client_id(&self) -> Result<String>;

    /// Définit le client id de l'application Spotify
    fn set_spotify_client_id(&self, client_id: &str) -> Result<()>;

    /// Récupère l'URL de redirection OAuth configurée
    fn get_spotify_redirect_url(&self) -> Result<String>;

    /// Définit l'URL de redirection OAuth
    fn set_spotify_redirect_url(&self, url: &str) -> Result<()>;

    /// Récupère les scopes OAuth demandés
    ///
    /// Accepte une séquence YAML ou une chaîne séparée par des virgules
    /// (format du `.config` historique).
    fn get_spotify_scopes(&self) -> Result<Vec<String>>;

    /// Récupère la taille de page du listing de playlists (défaut 50)
    fn get_spotify_page_size(&self) -> u32;

    /// Définit la taille de page du listing de playlists
    fn set_spotify_page_size(&self, page_size: u32) -> Result<()>;

    /// Récupère le token d'accès stocké, déchiffré
    ///
    /// Retourne `None` si aucun token n'est stocké
    fn get_spotify_auth_token(&self) -> Result<Option<String>>;

    /// Récupère l'id utilisateur stocké
    fn get_spotify_user_id(&self) -> Result<Option<String>>;

    /// Récupère le timestamp d'expiration du token (Unix timestamp)
    fn get_spotify_token_expires_at(&self) -> Result<Option<u64>>;

    /// Sauvegarde la session dans la configuration
    ///
    /// Le token est chiffré avec la clé dérivée de la machine avant d'être
    /// écrit sur disque.
    fn set_spotify_auth_info(&self, token: &str, user_id: &str, expires_at: u64) -> Result<()>;

    /// Supprime les informations de session de la configuration
    fn clear_spotify_auth_info(&self) -> Result<()>;

    /// Vérifie si un token stocké existe et n'est pas expiré
    fn is_spotify_auth_valid(&self) -> bool;
}

impl SpotifyConfigExt for Config {
    fn get_spotify_client_id(&self) -> Result<String> {
        match self.get_value(&["accounts", "spotify", "client_id"])? {
            Value::String(s) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("Spotify client id not configured")),
        }
    }

    fn set_spotify_client_id(&self, client_id: &str) -> Result<()> {
        self.set_value(
            &["accounts", "spotify", "client_id"],
            Value::String(client_id.to_string()),
        )
    }

    fn get_spotify_redirect_url(&self) -> Result<String> {
        match self.get_value(&["accounts", "spotify", "redirect_url"])? {
            Value::String(s) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("Spotify redirect URL not configured")),
        }
    }

    fn set_spotify_redirect_url(&self, url: &str) -> Result<()> {
        self.set_value(
            &["accounts", "spotify", "redirect_url"],
            Value::String(url.to_string()),
        )
    }

    fn get_spotify_scopes(&self) -> Result<Vec<String>> {
        match self.get_value(&["accounts", "spotify", "scopes"])? {
            Value::Sequence(seq) => Ok(seq
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect()),
            Value::String(s) => Ok(s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()),
            _ => Err(anyhow!("Spotify scopes not configured")),
        }
    }

    fn get_spotify_page_size(&self) -> u32 {
        match self.get_value(&["accounts", "spotify", "page_size"]) {
            Ok(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap() as u32,
            Ok(Value::Number(n)) if n.is_i64() => n.as_i64().unwrap() as u32,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn set_spotify_page_size(&self, page_size: u32) -> Result<()> {
        self.set_value(
            &["accounts", "spotify", "page_size"],
            Value::Number(serde_yaml::Number::from(page_size)),
        )
    }

    fn get_spotify_auth_token(&self) -> Result<Option<String>> {
        match self.get_value(&["accounts", "spotify", "auth_token"]) {
            Ok(Value::String(s)) if !s.is_empty() => {
                // Déchiffrement automatique si le token est chiffré
                let token = pmoconfig::encryption::get_secret(&s)
                    .map_err(|e| anyhow!("Failed to decrypt auth token: {}", e))?;
                Ok(Some(token))
            }
            Ok(Value::String(_)) => Ok(None), // Empty string
            Ok(_) => Ok(None),  // Wrong type
            Err(_) => Ok(None), // Not configured
        }
    }

    fn get_spotify_user_id(&self) -> Result<Option<String>> {
        match self.get_value(&["accounts", "spotify", "user_id"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
            Ok(Value::String(_)) => Ok(None), // Empty string
            Ok(_) => Ok(None),  // Wrong type
            Err(_) => Ok(None), // Not configured
        }
    }

    fn get_spotify_token_expires_at(&self) -> Result<Option<u64>> {
        match self.get_value(&["accounts", "spotify", "token_expires_at"]) {
            Ok(Value::Number(n)) if n.is_u64() => {
                let ts = n.as_u64().unwrap();
                Ok((ts > 0).then_some(ts))
            }
            Ok(Value::Number(n)) if n.is_i64() => {
                let ts = n.as_i64().unwrap();
                Ok((ts > 0).then_some(ts as u64))
            }
            Ok(_) => Ok(None),  // Wrong type
            Err(_) => Ok(None), // Not configured
        }
    }

    fn set_spotify_auth_info(&self, token: &str, user_id: &str, expires_at: u64) -> Result<()> {
        let encrypted = pmoconfig::encryption::encrypt_secret(token)?;

        self.set_value(
            &["accounts", "spotify", "auth_token"],
            Value::String(encrypted),
        )?;
        self.set_value(
            &["accounts", "spotify", "user_id"],
            Value::String(user_id.to_string()),
        )?;
        self.set_value(
            &["accounts", "spotify", "token_expires_at"],
            Value::Number(serde_yaml::Number::from(expires_at)),
        )?;

        Ok(())
    }

    fn clear_spotify_auth_info(&self) -> Result<()> {
        // On ne propage pas les erreurs car les valeurs peuvent ne pas exister
        let _ = self.set_value(
            &["accounts", "spotify", "auth_token"],
            Value::String(String::new()),
        );
        let _ = self.set_value(
            &["accounts", "spotify", "user_id"],
            Value::String(String::new()),
        );
        let _ = self.set_value(
            &["accounts", "spotify", "token_expires_at"],
            Value::Number(serde_yaml::Number::from(0)),
        );
        Ok(())
    }

    fn is_spotify_auth_valid(&self) -> bool {
        // Vérifier si un token existe
        if self.get_spotify_auth_token().ok().flatten().is_none() {
            return false;
        }

        // Vérifier si le token n'est pas expiré
        if let Ok(Some(expires_at)) = self.get_spotify_token_expires_at() {
            use std::time::{SystemTime, UNIX_EPOCH};
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs();

            now < expires_at
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_client_id_roundtrip() {
        let (_dir, config) = temp_config();

        assert!(config.get_spotify_client_id().is_err());
        config.set_spotify_client_id("abc123").unwrap();
        assert_eq!(config.get_spotify_client_id().unwrap(), "abc123");
    }

    #[test]
    fn test_scopes_from_sequence_and_string() {
        let (_dir, config) = temp_config();

        // La config embarquée fournit une séquence
        let scopes = config.get_spotify_scopes().unwrap();
        assert!(scopes.contains(&"playlist-read-private".to_string()));

        // Format historique : chaîne séparée par des virgules
        config
            .set_value(
                &["accounts", "spotify", "scopes"],
                Value::String("user-read-private, playlist-read-private".to_string()),
            )
            .unwrap();
        let scopes = config.get_spotify_scopes().unwrap();
        assert_eq!(
            scopes,
            vec!["user-read-private", "playlist-read-private"]
        );
    }

    #[test]
    fn test_page_size_default() {
        let (_dir, config) = temp_config();
        assert_eq!(config.get_spotify_page_size(), 50);

        config.set_spotify_page_size(25).unwrap();
        assert_eq!(config.get_spotify_page_size(), 25);
    }

    #[test]
    fn test_auth_info_roundtrip_encrypted_at_rest() {
        let (_dir, config) = temp_config();

        assert!(config.get_spotify_auth_token().unwrap().is_none());
        assert!(!config.is_spotify_auth_valid());

        let far_future = 4_102_444_800; // 2100-01-01
        config
            .set_spotify_auth_info("secret-token", "user42", far_future)
            .unwrap();

        // Le token stocké est chiffré, mais relu en clair
        let raw = config
            .get_value(&["accounts", "spotify", "auth_token"])
            .unwrap();
        if let Value::String(stored) = raw {
            assert!(pmoconfig::encryption::is_encrypted(&stored));
        } else {
            panic!("expected string value");
        }
        assert_eq!(
            config.get_spotify_auth_token().unwrap().as_deref(),
            Some("secret-token")
        );
        assert_eq!(
            config.get_spotify_user_id().unwrap().as_deref(),
            Some("user42")
        );
        assert!(config.is_spotify_auth_valid());

        config.clear_spotify_auth_info().unwrap();
        assert!(config.get_spotify_auth_token().unwrap().is_none());
        assert!(!config.is_spotify_auth_valid());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let (_dir, config) = temp_config();

        config
            .set_spotify_auth_info("secret-token", "user42", 1_000_000)
            .unwrap();
        assert!(!config.is_spotify_auth_valid());
    }
}
