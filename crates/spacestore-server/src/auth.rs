//! API key authentication.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spacestore_core::TenantRoot;
use tracing::warn;

use crate::AppState;
use crate::SECURITY_TARGET;
use crate::error::UploadError;

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The tenant resolved from the request's `X-API-Key` header.
///
/// Runs before the body is read, so unauthenticated uploads are rejected
/// without touching the filesystem.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantRoot);

impl FromRequestParts<AppState> for Tenant {
    type Rejection = UploadError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(API_KEY_HEADER) else {
            return Err(UploadError::MissingApiKey);
        };

        let tenant = value
            .to_str()
            .ok()
            .filter(|key| !key.is_empty())
            .and_then(|key| state.keys.resolve(key));

        match tenant {
            Some(root) => Ok(Self(root.clone())),
            None if value.is_empty() => Err(UploadError::MissingApiKey),
            None => {
                warn!(target: SECURITY_TARGET, uri = %parts.uri, "rejected unknown API key");
                Err(UploadError::UnknownApiKey)
            }
        }
    }
}
