//! # 認証ミドルウェア
//!
//! `Authorization: Bearer <token>` ヘッダーからトークンを取り出し、
//! 認証済みユーザーを解決してリクエスト拡張に [`CurrentUser`] として格納する。
//!
//! トークンがない、または無効な場合は後続のハンドラを実行せずに
//! 401 Unauthorized を返す。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use blog_domain::user::User;

use crate::{error::ApiError, handler::AuthState};

/// 認証済みユーザー
///
/// ハンドラは `Extension<CurrentUser>` で受け取る。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user:  User,
    /// 認証に使用したトークン（サインアウトで失効させる）
    pub token: String,
}

/// Bearer トークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// 認証ミドルウェア
pub async fn require_authentication(
    State(state): State<Arc<AuthState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError::Unauthorized("認証が必要です".to_string()).into_response();
    };

    let user = match state.usecase.authenticate(&token).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(user_id = %user.id(), "認証済みユーザーを解決しました");
    request
        .extensions_mut()
        .insert(CurrentUser { user, token });

    next.run(request).await
}
