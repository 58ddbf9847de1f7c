use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use storefront_models::auth::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};

use crate::error::ApiError;
use crate::services::{auth_context, bearer_token, AuthService};

pub async fn register(
    request: web::Json<RegisterRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let user = auth
        .register(&request.email, &request.password, request.name.clone())
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user,
    }))
}

pub async fn login(
    request: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let access_token = auth.login(&request.email, &request.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

/// Re-issue a token for the current session. The guard has already admitted
/// the request; the refresh itself re-verifies the presented token so the
/// new expiry is derived from the exact credential the client sent.
pub async fn refresh(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&req).ok_or(ApiError::Unauthorized)?;
    let access_token = auth.refresh(&token).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

pub async fn logout(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let context = auth_context(&req).ok_or(ApiError::Unauthorized)?;
    auth.logout(context.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out successfully" })))
}

/// Fresh, authoritative record for the authenticated caller.
pub async fn me(req: HttpRequest, auth: web::Data<AuthService>) -> Result<HttpResponse, ApiError> {
    let context = auth_context(&req).ok_or(ApiError::Unauthorized)?;
    let user = auth.validate(context.user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}
