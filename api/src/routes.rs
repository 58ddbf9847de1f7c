//! Route table for the API service.
//!
//! Registration and login are the only public application routes; everything
//! else sits behind the authorization guard.

use actix_web::web;

use crate::handlers;
use crate::services::AuthGuard;

pub fn configure_routes(cfg: &mut web::ServiceConfig, guard: AuthGuard) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(handlers::auth::register))
            .route("/login", web::post().to(handlers::auth::login))
            .service(
                web::scope("")
                    .wrap(guard.clone())
                    .route("/refresh", web::post().to(handlers::auth::refresh))
                    .route("/logout", web::post().to(handlers::auth::logout))
                    .route("/me", web::get().to(handlers::auth::me)),
            ),
    );

    cfg.service(
        web::scope("/api/users")
            .wrap(guard.clone())
            .route("", web::post().to(handlers::users::create_user))
            .route("", web::get().to(handlers::users::list_users))
            .route("/{id}", web::get().to(handlers::users::get_user))
            .route("/{id}", web::patch().to(handlers::users::update_user))
            .route("/{id}", web::delete().to(handlers::users::delete_user)),
    );

    cfg.service(
        web::scope("/api/catalog")
            .wrap(guard)
            .route("/products", web::post().to(handlers::catalog::create_product))
            .route("/products", web::get().to(handlers::catalog::list_products))
            .route("/filter", web::get().to(handlers::catalog::filter_products))
            .route("/products/{id}", web::get().to(handlers::catalog::get_product))
            .route(
                "/products/{id}",
                web::patch().to(handlers::catalog::update_product),
            )
            .route(
                "/products/{id}",
                web::delete().to(handlers::catalog::delete_product),
            )
            .route(
                "/categories",
                web::post().to(handlers::catalog::create_category),
            )
            .route(
                "/categories",
                web::get().to(handlers::catalog::list_categories),
            )
            .route(
                "/categories/{id}",
                web::get().to(handlers::catalog::get_category),
            )
            .route(
                "/categories/{id}",
                web::patch().to(handlers::catalog::update_category),
            )
            .route(
                "/categories/{id}",
                web::delete().to(handlers::catalog::delete_category),
            ),
    );
}
