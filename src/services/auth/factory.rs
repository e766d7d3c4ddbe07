/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::auth::key_source::load_public_key_pem;
use crate::services::auth::{AuthOptions, AuthService, ClaimPolicy};

pub async fn build_auth_service(config: &Config) -> anyhow::Result<Arc<AuthService>> {
    let pem = load_public_key_pem(&config.auth_key).await?;

    let claim_policy = if config.auth_require_identity_claim {
        ClaimPolicy::Strict
    } else {
        ClaimPolicy::Lenient
    };

    let auth = AuthService::new(
        &pem,
        config.auth_algorithm,
        AuthOptions {
            identity_claim: config.auth_identity_claim.clone(),
            claim_policy,
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            leeway_seconds: config.access_token_leeway_seconds,
        },
    )
    .context("failed to build access token verifier")?;

    tracing::info!(
        algorithm = ?config.auth_algorithm,
        identity_claim = %config.auth_identity_claim,
        ?claim_policy,
        "access token verifier ready"
    );

    Ok(Arc::new(auth))
}
