use actix_web::{web, HttpResponse};
use validator::Validate;

use storefront_database::PgUserStore;
use storefront_models::auth::PublicUser;
use storefront_models::users::{CreateUserRequest, UpdateUserRequest};

use crate::error::ApiError;
use crate::services::auth::normalize_email;
use crate::services::AuthService;

/// Create a user through the same registration path as `/api/auth/register`:
/// a user record never exists with a plaintext credential, no matter which
/// surface created it.
pub async fn create_user(
    request: web::Json<CreateUserRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let user = auth
        .register(&request.email, &request.password, request.name.clone())
        .await?;

    Ok(HttpResponse::Created().json(user))
}

pub async fn list_users(store: web::Data<PgUserStore>) -> Result<HttpResponse, ApiError> {
    let users = store.list().await?;
    let users: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();

    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    path: web::Path<i64>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let user = auth.validate(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    path: web::Path<i64>,
    request: web::Json<UpdateUserRequest>,
    store: web::Data<PgUserStore>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let mut changes = request.into_inner();
    if let Some(email) = changes.email.take() {
        changes.email = Some(normalize_email(&email));
    }

    let user = store
        .update(path.into_inner(), &changes)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

pub async fn delete_user(
    path: web::Path<i64>,
    store: web::Data<PgUserStore>,
) -> Result<HttpResponse, ApiError> {
    let user = store
        .delete(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
