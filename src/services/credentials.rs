use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

use super::store::StoreError;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the cached token actually expires
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a Google service account key file that we need
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::Credentials(format!("invalid key file {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    TOKEN_LIFETIME_SECS
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    value: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

/// Source of bearer tokens for Firestore requests
pub enum TokenSource {
    /// No authentication (local emulator)
    Anonymous,
    /// Static bearer token
    Static(String),
    /// OAuth token minted from a service account JWT and cached until expiry
    ServiceAccount {
        key: ServiceAccountKey,
        client: Client,
        cached: Mutex<Option<CachedToken>>,
    },
}

impl TokenSource {
    pub fn service_account(key: ServiceAccountKey) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(TokenSource::ServiceAccount {
            key,
            client,
            cached: Mutex::new(None),
        })
    }

    /// Current bearer token, `None` for anonymous access
    pub async fn token(&self) -> Result<Option<String>, StoreError> {
        match self {
            TokenSource::Anonymous => Ok(None),
            TokenSource::Static(token) => Ok(Some(token.clone())),
            TokenSource::ServiceAccount { key, client, cached } => {
                let mut cached = cached.lock().await;
                let now = chrono::Utc::now();

                if let Some(token) = cached.as_ref() {
                    if token.expires_at - chrono::Duration::seconds(REFRESH_MARGIN_SECS) > now {
                        return Ok(Some(token.value.clone()));
                    }
                }

                let fresh = fetch_access_token(client, key).await?;
                let value = fresh.value.clone();
                *cached = Some(fresh);
                Ok(Some(value))
            }
        }
    }
}

/// Build the signed assertion for the JWT bearer grant
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, StoreError> {
    let claims = Claims {
        iss: &key.client_email,
        scope: DATASTORE_SCOPE,
        aud: &key.token_uri,
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
    };
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?)
}

async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
) -> Result<CachedToken, StoreError> {
    let now = chrono::Utc::now();
    let assertion = sign_assertion(key, now.timestamp())?;

    tracing::debug!("Requesting access token for {}", key.client_email);

    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        return Err(StoreError::Unauthorized(format!(
            "token exchange failed: {} - {}",
            status, body
        )));
    }

    let token: TokenResponse = response.json().await?;

    Ok(CachedToken {
        value: token.access_token,
        expires_at: now + chrono::Duration::seconds(token.expires_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_file_defaults_token_uri() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email": "pilot@eco.iam.gserviceaccount.com", "private_key": "---"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert!(key.project_id.is_none());
    }

    #[test]
    fn test_sign_assertion_rejects_bad_pem() {
        let key = ServiceAccountKey {
            client_email: "pilot@eco.iam.gserviceaccount.com".to_string(),
            private_key: "not a key".to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            project_id: None,
        };
        assert!(matches!(sign_assertion(&key, 0), Err(StoreError::Jwt(_))));
    }

    #[tokio::test]
    async fn test_static_and_anonymous_tokens() {
        assert_eq!(TokenSource::Anonymous.token().await.unwrap(), None);
        assert_eq!(
            TokenSource::Static("owner".to_string()).token().await.unwrap(),
            Some("owner".to_string())
        );
    }
}
