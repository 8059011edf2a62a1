//! Caller identity carried by the `id` cookie

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::warn;

use crate::error::ApiError;

/// Name of the cookie holding the caller's user id
pub const ID_COOKIE: &str = "id";

/// The user id of the caller, taken from the `id` cookie.
///
/// Extraction fails with 401 when the cookie is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match jar.get(ID_COOKIE).map(|cookie| cookie.value()) {
            Some(id) if !id.is_empty() => Ok(CallerId(id.to_string())),
            _ => {
                warn!("Request to {} without caller identity", parts.uri.path());
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Cookie identifying `user_id` on later requests
pub fn identity_cookie(user_id: &str) -> Cookie<'static> {
    Cookie::build((ID_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

/// Drop the identity cookie from the client
pub fn forget(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ID_COOKIE).path("/"))
}
