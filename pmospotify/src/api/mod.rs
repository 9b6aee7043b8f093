//! Couche d'accès à l'API REST Spotify
//!
//! Ce module fournit une interface bas-niveau pour communiquer avec l'API
//! Web Spotify. Une requête à la fois, pas de retry : les erreurs sont
//! propagées telles quelles à l'appelant.

pub mod auth;
pub mod library;
pub mod player;

use crate::error::{Result, SpotifyError};
use auth::Session;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// URL de base de l'API Web Spotify
const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Timeout par requête HTTP (l'API distante peut rester suspendue)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client API bas-niveau pour communiquer avec Spotify
pub struct SpotifyApi {
    /// Client HTTP
    client: Client,
    /// URL de base (surchargée dans les tests)
    base_url: String,
    /// Session authentifiée courante
    session: Option<Session>,
}

impl SpotifyApi {
    /// Crée une nouvelle instance de l'API
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Crée une instance pointant vers une URL de base personnalisée
    ///
    /// Utilisé par les tests pour cibler un serveur local.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("pmospotify/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            session: None,
        })
    }

    /// Retourne l'URL de base configurée
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Effectue une requête GET à l'API
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.request(Method::GET, endpoint, params, None).await?;
        self.handle_response(response).await
    }

    /// Effectue une requête GET dont la réponse peut être vide (204)
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let response = self.request(Method::GET, endpoint, params, None).await?;
        self.handle_optional_response(response).await
    }

    /// Effectue une requête PUT avec un corps JSON, sans corps de réponse attendu
    pub(crate) async fn put_json(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<()> {
        let response = self
            .request(Method::PUT, endpoint, &[], Some(body))
            .await?;
        self.handle_empty_response(response).await
    }

    /// Effectue une requête PUT sans corps, sans corps de réponse attendu
    pub(crate) async fn put_empty(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<()> {
        let response = self.request(Method::PUT, endpoint, params, None).await?;
        self.handle_empty_response(response).await
    }

    /// Effectue une requête POST sans corps, sans corps de réponse attendu
    pub(crate) async fn post_empty(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<()> {
        let response = self.request(Method::POST, endpoint, params, None).await?;
        self.handle_empty_response(response).await
    }

    /// Effectue une requête à l'API (générique)
    ///
    /// Échoue avec `Unauthenticated` avant toute requête réseau si aucune
    /// session valide n'est disponible.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let token = self.ensure_authenticated()?;
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("{} {} with {} params", method, url, params.len());

        let mut request = self.client.request(method, &url).bearer_auth(token);

        if !params.is_empty() {
            request = request.query(params);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        Ok(request.send().await?)
    }

    /// Traite une réponse HTTP dont le corps JSON est attendu
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, body);
            return Err(SpotifyError::from_status_code(status_code, body));
        }

        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            SpotifyError::JsonParse(e)
        })
    }

    /// Traite une réponse HTTP dont le corps peut être absent (204 No Content)
    async fn handle_optional_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<Option<T>> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        if status_code == 204 {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, body);
            return Err(SpotifyError::from_status_code(status_code, body));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text).map(Some).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            SpotifyError::JsonParse(e)
        })
    }

    /// Traite une réponse HTTP sans corps attendu (200/202/204)
    async fn handle_empty_response(&self, response: Response) -> Result<()> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, body);
            return Err(SpotifyError::from_status_code(status_code, body));
        }

        Ok(())
    }
}
