use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use storefront_database::CatalogRepository;
use storefront_models::catalog::{
    CreateCategoryRequest, CreateProductRequest, ProductFilterQuery, UpdateCategoryRequest,
    UpdateProductRequest,
};

use crate::error::ApiError;

pub async fn create_product(
    request: web::Json<CreateProductRequest>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let product = catalog.create_product(&request).await?;
    Ok(HttpResponse::Created().json(product))
}

pub async fn list_products(
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let products = catalog.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(
    path: web::Path<i64>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let product = catalog
        .find_product(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(HttpResponse::Ok().json(product))
}

pub async fn filter_products(
    query: web::Query<ProductFilterQuery>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let products = catalog.filter_products(&query).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn update_product(
    path: web::Path<i64>,
    request: web::Json<UpdateProductRequest>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let product = catalog
        .update_product(path.into_inner(), &request)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product(
    path: web::Path<i64>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let product = catalog
        .delete_product(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_category(
    request: web::Json<CreateCategoryRequest>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let category = catalog.create_category(&request).await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn list_categories(
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let categories = catalog.list_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

pub async fn get_category(
    path: web::Path<i64>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let category = catalog
        .find_category(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(category))
}

pub async fn update_category(
    path: web::Path<i64>,
    request: web::Json<UpdateCategoryRequest>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let category = catalog
        .update_category(path.into_inner(), &request)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete_category(
    path: web::Path<i64>,
    catalog: web::Data<CatalogRepository>,
) -> Result<HttpResponse, ApiError> {
    let category = catalog
        .delete_category(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Category with ID {} deleted successfully", category.id)
    })))
}
