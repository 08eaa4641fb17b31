use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while validating a caller's identity. All of them are
/// surfaced before any data access happens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("caller does not have the {0} role")]
    WrongRole(&'static str),

    #[error("agency token carries no agency id")]
    MissingAgency,
}

/// Caller roles as issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    AgencyOwner,
}

/// Bearer-token claims. This service validates tokens, it never issues them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    #[serde(rename = "agencyId", default)]
    pub agency_id: Option<Uuid>,
    pub exp: usize,
}

/// HS256 bearer-token verifier shared across handlers.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate the request's bearer token and return its claims.
    pub fn authenticate(&self, req: &HttpRequest) -> Result<Claims, AuthError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Authenticate and require the customer role.
    pub fn authenticate_customer(&self, req: &HttpRequest) -> Result<Claims, AuthError> {
        let claims = self.authenticate(req)?;
        if claims.role != Role::Customer {
            return Err(AuthError::WrongRole("customer"));
        }
        Ok(claims)
    }

    /// Authenticate and require an agency-owner token with an agency id.
    pub fn authenticate_agency(&self, req: &HttpRequest) -> Result<(Claims, Uuid), AuthError> {
        let claims = self.authenticate(req)?;
        if claims.role != Role::AgencyOwner {
            return Err(AuthError::WrongRole("agency owner"));
        }
        let agency_id = claims.agency_id.ok_or(AuthError::MissingAgency)?;
        Ok((claims, agency_id))
    }
}
