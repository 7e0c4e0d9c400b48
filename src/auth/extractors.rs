use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::AppError;

/// The `userName` of the caller, taken from the claims `AuthMiddleware` stored
/// in the request extensions.
///
/// Extraction fails with `AppError::Unauthorized` when no claims are present,
/// e.g. on a route the middleware does not cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    /// Checks that the caller owns the `:userName` path segment.
    pub fn authorize(&self, user_name: &str) -> Result<(), AppError> {
        if self.0 == user_name {
            Ok(())
        } else {
            log::warn!("user {} attempted to access resources of {}", self.0, user_name);
            Err(AppError::Forbidden("Access denied".into()))
        }
    }

    pub fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        req.extensions()
            .get::<Claims>()
            .map(|claims| AuthenticatedUser(claims.sub.clone()))
            .ok_or_else(|| AppError::Unauthorized("Missing token".into()))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req).map_err(ActixError::from))
    }
}
