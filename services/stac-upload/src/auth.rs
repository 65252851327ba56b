//! Credentials for the transaction API.

use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::info;

/// Credentials as supplied on the command line or in the environment.
pub enum Credentials {
    Basic {
        username: String,
        password: String,
    },
    /// OAuth2 client-credentials grant
    ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
    },
}

// Secrets stay out of logs and panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::ClientCredentials {
                token_url, client_id, ..
            } => f
                .debug_struct("ClientCredentials")
                .field("token_url", token_url)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl Credentials {
    /// Basic auth wins when both username and password are set, then the
    /// client-credentials triple. Anything else is an error.
    pub fn select(
        username: Option<&str>,
        password: Option<&str>,
        token_url: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<Self> {
        if let (Some(username), Some(password)) = (present(username), present(password)) {
            return Ok(Credentials::Basic { username, password });
        }
        if let (Some(token_url), Some(client_id), Some(client_secret)) =
            (present(token_url), present(client_id), present(client_secret))
        {
            return Ok(Credentials::ClientCredentials {
                token_url,
                client_id,
                client_secret,
            });
        }
        bail!("No authentication credentials supplied")
    }

    /// Turn the credentials into a request authorisation, fetching a token
    /// once for the client-credentials grant.
    pub async fn authorize(self, client: &Client) -> Result<Auth> {
        match self {
            Credentials::Basic { username, password } => Ok(Auth::Basic { username, password }),
            Credentials::ClientCredentials {
                token_url,
                client_id,
                client_secret,
            } => {
                info!(token_url = %token_url, client_id = %client_id, "Requesting access token");
                let response = client
                    .post(&token_url)
                    .basic_auth(&client_id, Some(&client_secret))
                    .form(&[("grant_type", "client_credentials")])
                    .send()
                    .await
                    .context("Token request failed")?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(anyhow!("Token endpoint returned {}: {}", status, body));
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .context("Token endpoint returned an unexpected body")?;
                Ok(Auth::Bearer(token.access_token))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authorisation attached to every API request.
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Auth {
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }
}
