use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw claim set of a verified access token.
pub type AccessTokenClaims = Map<String, Value>;

/// Errors returned by bearer-token verification + identity extraction.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed Authorization header")]
    MissingCredential,
    #[error("jwt verification failed: {0}")]
    InvalidCredential(#[from] jsonwebtoken::errors::Error),
    #[error("missing '{claim}' claim")]
    MalformedClaims { claim: String },
}

/// Errors raised while building the verifier at startup.
#[derive(Debug, Error)]
pub enum AuthSetupError {
    #[error("unsupported verification algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),
    #[error("invalid public key pem: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),
}

/// What to do when the identity claim is absent (or blank) in an otherwise valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPolicy {
    /// Reject with `AuthError::MalformedClaims`.
    Strict,
    /// Propagate an empty identity.
    Lenient,
}

/// Opaque per-request user identifier taken from the verified identity claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub identity_claim: String,
    pub claim_policy: ClaimPolicy,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            identity_claim: "zid".to_string(),
            claim_policy: ClaimPolicy::Strict,
            issuer: None,
            audience: None,
            leeway_seconds: 60,
        }
    }
}

/// Bearer access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
    identity_claim: String,
    claim_policy: ClaimPolicy,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .field("identity_claim", &self.identity_claim)
            .field("claim_policy", &self.claim_policy)
            .finish()
    }
}

fn decoding_key(pem: &[u8], algorithm: Algorithm) -> Result<DecodingKey, AuthSetupError> {
    let key = match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        // HMAC needs a shared secret, not a public key.
        other => return Err(AuthSetupError::UnsupportedAlgorithm(other)),
    };

    key.map_err(AuthSetupError::InvalidKey)
}

impl AuthService {
    pub fn new(
        public_key_pem: &str,
        algorithm: Algorithm,
        options: AuthOptions,
    ) -> Result<Self, AuthSetupError> {
        let decoding_key = decoding_key(public_key_pem.as_bytes(), algorithm)?;

        let mut validation = Validation::new(algorithm);
        // `exp` is checked when present, never required.
        validation.set_required_spec_claims::<&str>(&[]);
        validation.leeway = options.leeway_seconds;
        if let Some(issuer) = &options.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &options.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
            identity_claim: options.identity_claim,
            claim_policy: options.claim_policy,
        })
    }

    // Verify signature/structure (+ exp/nbf/iss/aud) and decode the claim set.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// `Authorization` header value → verified `Identity`.
    ///
    /// This is the entry-point for the access middleware.
    pub fn extract_identity(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingCredential)?;

        let claims = self.verify(token)?;

        match claim_as_identity(claims.get(&self.identity_claim)) {
            Some(identity) => Ok(identity),
            None => match self.claim_policy {
                ClaimPolicy::Strict => Err(AuthError::MalformedClaims {
                    claim: self.identity_claim.clone(),
                }),
                ClaimPolicy::Lenient => Ok(Identity::new("")),
            },
        }
    }
}

fn claim_as_identity(value: Option<&Value>) -> Option<Identity> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Identity::new(s.as_str())),
        other => Some(Identity::new(other.to_string())),
    }
}
