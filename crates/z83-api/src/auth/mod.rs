//! Authentication and authorization.
//!
//! - [`password`]: bcrypt hashing and verification
//! - [`token`]: signed, time-bounded session tokens
//! - [`AuthUser`]: the verified caller, extracted from `Authorization: Bearer`
//! - [`guard`]: ownership and role rules
//!
//! Handlers that act on one account's data take an [`AuthUser`] parameter and
//! pass it to [`authorize`] before touching the store. The acting identity is
//! never read from a request body, query or path.

pub mod guard;
pub mod password;
pub mod token;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Request, Response};
use axum::middleware::Next;
use tracing::{debug, warn};

use z83_models::{AccountId, Role};

use crate::error::ApiError;
use crate::state::AppState;

pub use guard::{authorize, require_role};
pub use token::{Claims, IssuedToken, TokenError, TokenKeys};

/// Authenticated caller for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: AccountId,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Verify the bearer token in `headers`.
pub fn authenticate(headers: &HeaderMap, keys: &TokenKeys) -> Result<AuthUser, ApiError> {
    let auth_header = match headers.get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return Err(reject("missing_token", ApiError::MissingToken)),
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            reject(
                "bad_scheme",
                ApiError::InvalidToken("Invalid Authorization header format".to_string()),
            )
        })?;

    match keys.verify(token) {
        Ok(claims) => {
            debug!(account_id = %claims.id, "Token verified");
            Ok(AuthUser::from(claims))
        }
        Err(TokenError::Expired) => Err(reject("expired_token", ApiError::ExpiredToken)),
        Err(e) => Err(reject("invalid_token", ApiError::InvalidToken(e.to_string()))),
    }
}

fn reject(reason: &'static str, err: ApiError) -> ApiError {
    match &err {
        ApiError::InvalidToken(detail) => warn!(reason, detail = %detail, "Authentication rejected"),
        _ => warn!(reason, "Authentication rejected"),
    }
    crate::metrics::record_auth_failure(reason);
    err
}

/// Route layer that rejects unauthenticated requests before any handler runs
/// and stores the verified caller in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let user = authenticate(request.headers(), &state.tokens)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated caller.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already verified by `require_auth`
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        authenticate(&parts.headers, &state.tokens)
    }
}
