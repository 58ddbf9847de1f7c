mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App, HttpRequest, HttpResponse};
use serde_json::json;

use storefront_api::services::{auth_context, TokenService};

use common::{auth_state, MockUserStore, TEST_SECRET};

/// Echo back the identity the guard attached, so tests can observe the
/// request-scoped context directly.
async fn whoami(req: HttpRequest) -> HttpResponse {
    match auth_context(&req) {
        Some(ctx) => HttpResponse::Ok().json(json!({
            "user_id": ctx.user_id,
            "email": ctx.email,
        })),
        None => HttpResponse::InternalServerError().finish(),
    }
}

macro_rules! guarded_app {
    ($guard:expr) => {
        test::init_service(
            App::new().service(
                web::scope("/protected")
                    .wrap($guard)
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn requests_without_credentials_are_rejected() {
    let (_auth, guard, _tokens) = auth_state(Arc::new(MockUserStore::new()));
    let app = guarded_app!(guard);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/protected/whoami").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn every_rejection_is_indistinguishable() {
    let (_auth, guard, tokens) = auth_state(Arc::new(MockUserStore::new()));
    let app = guarded_app!(guard);

    let expired = TokenService::new(TEST_SECRET, -120).issue(1, "a@x.com").unwrap();
    let foreign = TokenService::new("some_other_secret", 3600)
        .issue(1, "a@x.com")
        .unwrap();
    let valid = tokens.issue(1, "a@x.com").unwrap();
    let mut tampered = valid.clone();
    tampered.pop();

    let cases: Vec<Option<String>> = vec![
        None,                                      // no Authorization header at all
        Some("Basic YWRtaW46YWRtaW4=".to_owned()), // wrong scheme
        Some("Bearer".to_owned()),                 // scheme without a token
        Some("Bearer not-a-jwt".to_owned()),       // well-formed header, garbage token
        Some(format!("Bearer {tampered}")),        // truncated signature
        Some(format!("Bearer {expired}")),         // past expiry
        Some(format!("Bearer {foreign}")),         // signed with another key
    ];

    let mut bodies = Vec::new();
    for header in cases {
        let mut req = test::TestRequest::get().uri("/protected/whoami");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        bodies.push(test::read_body(resp).await);
    }

    // All rejection bodies are byte-identical: no oracle for the cause.
    for body in &bodies[1..] {
        assert_eq!(body, &bodies[0]);
    }
}

#[actix_web::test]
async fn a_valid_token_is_admitted_with_its_claims_attached() {
    let (_auth, guard, tokens) = auth_state(Arc::new(MockUserStore::new()));
    let app = guarded_app!(guard);

    let token = tokens.issue(42, "a@x.com").unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["email"], "a@x.com");
}

#[actix_web::test]
async fn a_token_with_a_non_numeric_subject_is_rejected() {
    let (_auth, guard, _tokens) = auth_state(Arc::new(MockUserStore::new()));
    let app = guarded_app!(guard);

    // Correctly signed, but the subject does not name a user id.
    let claims = storefront_models::auth::Claims {
        sub: "not-a-user-id".to_owned(),
        email: "a@x.com".to_owned(),
        iat: chrono::Utc::now().timestamp() as usize,
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        iss: "storefront-auth".to_owned(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn the_context_is_not_cached_across_requests() {
    let (_auth, guard, tokens) = auth_state(Arc::new(MockUserStore::new()));
    let app = guarded_app!(guard);

    let token = tokens.issue(7, "a@x.com").unwrap();

    // An authenticated request...
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // ...grants nothing to the next anonymous one.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/protected/whoami").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
