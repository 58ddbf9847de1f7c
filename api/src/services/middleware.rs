//! Authorization guard: the request-time gate in front of protected routes.
//!
//! Extracts the `Bearer <token>` credential, validates it through the token
//! service, and attaches an [`AuthContext`] to the request on success. Every
//! rejection (missing header, wrong scheme, malformed value, bad signature,
//! expired token) produces the same 401 response; the distinction exists
//! only in server logs. The guard performs no database access.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error as ActixError, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use storefront_models::auth::AuthContext;

use crate::error::ApiError;
use crate::services::TokenService;

#[derive(Clone)]
pub struct AuthGuard {
    tokens: TokenService,
}

impl AuthGuard {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = AuthGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();

        Box::pin(async move {
            let context = admit(req.request(), &tokens);

            if let Some(context) = context {
                req.extensions_mut().insert(context);
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            // One uniform rejection for every failure mode.
            Ok(req
                .into_response(ApiError::Unauthorized.error_response())
                .map_into_right_body())
        })
    }
}

fn admit(req: &HttpRequest, tokens: &TokenService) -> Option<AuthContext> {
    let Some(token) = bearer_token(req) else {
        tracing::debug!("rejected request without bearer credentials");
        return None;
    };

    let claims = match tokens.verify(&token) {
        Ok(claims) => claims,
        Err(_) => {
            tracing::warn!("rejected request with invalid or expired token");
            return None;
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        tracing::warn!("rejected token whose subject is not a user id");
        return None;
    };

    Some(AuthContext {
        user_id,
        email: claims.email,
    })
}

/// Pull the token out of an `Authorization: Bearer <token>` header. Any other
/// shape (absent header, different scheme, non-ASCII value) is `None`.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// The identity attached by the guard, if this request passed through it.
pub fn auth_context(req: &HttpRequest) -> Option<AuthContext> {
    req.extensions().get::<AuthContext>().cloned()
}
