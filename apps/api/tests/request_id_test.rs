//! Request ID 統合テスト
//!
//! `X-Request-Id` がレスポンスに付与されることを検証する。

use std::sync::Arc;

use axum::{body::Body, http::Request};
use blog_api::app_builder::{AppDependencies, build_app};
use blog_domain::clock::SystemClock;
use blog_infra::mock::{
    MockArticleRepository,
    MockPasswordChecker,
    MockTokenStore,
    MockUserRepository,
};
use tower::ServiceExt;
use uuid::Uuid;

fn create_test_app() -> axum::Router {
    let users = MockUserRepository::new();
    build_app(AppDependencies {
        user_repository:    Arc::new(users.clone()),
        article_repository: Arc::new(MockArticleRepository::new(users)),
        token_store:        Arc::new(MockTokenStore::new()),
        password_checker:   Arc::new(MockPasswordChecker),
        clock:              Arc::new(SystemClock),
        readiness_checks:   vec![],
    })
}

#[tokio::test]
async fn test_リクエストidがない場合はuuid_v7が生成される() {
    let response = create_test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    let uuid = Uuid::parse_str(request_id).unwrap();
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn test_クライアント指定のリクエストidはそのまま返る() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/articles")
                .header("x-request-id", "client-supplied-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-supplied-id"
    );
}
