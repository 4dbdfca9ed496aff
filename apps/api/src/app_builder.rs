//! # アプリケーション構築
//!
//! 依存（リポジトリ・トークンストア等）から State を組み立て、ルーターを構築する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use blog_domain::clock::Clock;
use blog_infra::{
    PasswordChecker,
    TokenStore,
    repository::{ArticleRepository, UserRepository},
};
use blog_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        ArticleState,
        AuthState,
        ReadinessCheck,
        ReadinessState,
        create_article,
        delete_article,
        get_article,
        health_check,
        list_articles,
        readiness_check,
        register,
        sign_in,
        sign_out,
        update_article,
        validate_token,
    },
    middleware::require_authentication,
    usecase::{ArticleUseCaseImpl, AuthUseCaseImpl},
};

/// ルーター構築に必要な依存
pub struct AppDependencies {
    pub user_repository:    Arc<dyn UserRepository>,
    pub article_repository: Arc<dyn ArticleRepository>,
    pub token_store:        Arc<dyn TokenStore>,
    pub password_checker:   Arc<dyn PasswordChecker>,
    pub clock:              Arc<dyn Clock>,
    pub readiness_checks:   Vec<Arc<dyn ReadinessCheck>>,
}

/// State の組み立てとルーター定義を行う
pub fn build_app(deps: AppDependencies) -> Router {
    let auth_state = Arc::new(AuthState {
        usecase: AuthUseCaseImpl::new(
            deps.user_repository,
            deps.token_store,
            deps.password_checker,
            deps.clock.clone(),
        ),
    });
    let article_state = Arc::new(ArticleState {
        usecase: ArticleUseCaseImpl::new(deps.article_repository, deps.clock),
    });
    let readiness_state = Arc::new(ReadinessState {
        checks: deps.readiness_checks,
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state)
        // 認証 API
        .route("/auth", post(register))
        .route("/auth/sign_in", post(sign_in))
        .with_state(auth_state.clone())
        .merge(
            Router::new()
                .route("/auth/sign_out", delete(sign_out))
                .route("/auth/validate_token", get(validate_token))
                .route_layer(from_fn_with_state(
                    auth_state.clone(),
                    require_authentication,
                ))
                .with_state(auth_state.clone()),
        )
        // 記事 API（参照は認証不要）
        .merge(
            Router::new()
                .route("/api/v1/articles", get(list_articles))
                .route("/api/v1/articles/{id}", get(get_article))
                .with_state(article_state.clone()),
        )
        // 記事 API（作成・更新・削除は認証必須）
        .merge(
            Router::new()
                .route("/api/v1/articles", post(create_article))
                .route(
                    "/api/v1/articles/{id}",
                    patch(update_article).delete(delete_article),
                )
                .route_layer(from_fn_with_state(auth_state, require_authentication))
                .with_state(article_state),
        )
        // Request ID レイヤー（下に書いたものが外側）
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
