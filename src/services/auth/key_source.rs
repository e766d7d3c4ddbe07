//! Loads the PEM-encoded verification key once at startup.
//!
//! - Inline PEM (`ACCESS_JWT_PUBLIC_KEY_PEM`) wins over the remote endpoint.
//! - The remote fetch has no timeout and no retry; any failure aborts startup.
use thiserror::Error;
use url::Url;

use crate::config::AuthKeySource;

#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("failed to fetch verification key from {url}: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("key endpoint {url} answered {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },
    #[error("key endpoint {url} returned no PEM block")]
    NotPem { url: Url },
}

pub async fn load_public_key_pem(source: &AuthKeySource) -> Result<String, KeySourceError> {
    match source {
        AuthKeySource::Pem(pem) => Ok(pem.clone()),
        AuthKeySource::Url(url) => fetch_public_key_pem(url).await,
    }
}

async fn fetch_public_key_pem(url: &Url) -> Result<String, KeySourceError> {
    let fetch_err = |source| KeySourceError::Fetch {
        url: url.clone(),
        source,
    };

    let res = reqwest::get(url.clone()).await.map_err(fetch_err)?;
    let status = res.status();
    if !status.is_success() {
        return Err(KeySourceError::Status {
            url: url.clone(),
            status,
        });
    }

    let body = res.text().await.map_err(fetch_err)?;
    extract_pem(&body).ok_or_else(|| KeySourceError::NotPem { url: url.clone() })
}

// Endpoints may wrap the block in whitespace or extra text; keep only the PEM block.
fn extract_pem(body: &str) -> Option<String> {
    const END: &str = "-----END ";
    let start = body.find("-----BEGIN ")?;
    let end_label = body[start..].find(END)? + start + END.len();
    let end = body[end_label..].find("-----")? + end_label + "-----".len();
    Some(body[start..end].to_string())
}
