//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /auth` - ユーザー登録（トークンを発行する）
//! - `POST /auth/sign_in` - サインイン
//! - `DELETE /auth/sign_out` - 使用中のトークンを失効させる
//! - `GET /auth/validate_token` - トークンの持ち主を返す
//!
//! `sign_out` と `validate_token` は認証ミドルウェアの内側に置く。

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use blog_domain::user::User;
use blog_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::CurrentUser,
    usecase::{AuthUseCaseImpl, IssuedToken, RegisterInput, SignInInput},
};

/// 認証 API の共有状態
///
/// 認証ミドルウェアとも共有する。
pub struct AuthState {
    pub usecase: AuthUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name:     String,
    pub email:    String,
    pub password: String,
}

/// サインインリクエスト
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email:    String,
    pub password: String,
}

/// ユーザー概要 DTO（`id`, `name`, `email` のみ）
#[derive(Debug, Serialize)]
pub struct UserSummaryDto {
    pub id:    i64,
    pub name:  String,
    pub email: String,
}

impl From<&User> for UserSummaryDto {
    fn from(user: &User) -> Self {
        Self {
            id:    user.id().as_i64(),
            name:  user.name().as_str().to_string(),
            email: user.email().as_str().to_string(),
        }
    }
}

/// トークン発行レスポンス
#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub token: String,
    pub user:  UserSummaryDto,
}

impl From<IssuedToken> for TokenDto {
    fn from(issued: IssuedToken) -> Self {
        Self {
            user:  UserSummaryDto::from(&issued.user),
            token: issued.token,
        }
    }
}

// --- ハンドラ ---

/// POST /auth
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .usecase
        .register(RegisterInput {
            name:     req.name,
            email:    req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(TokenDto::from(issued)))))
}

/// POST /auth/sign_in
pub async fn sign_in(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .usecase
        .sign_in(SignInInput {
            email:    req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(TokenDto::from(issued)))))
}

/// DELETE /auth/sign_out
pub async fn sign_out(
    State(state): State<Arc<AuthState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.usecase.sign_out(&current.token).await?;
    tracing::info!(user_id = %current.user.id(), "サインアウトしました");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/validate_token
pub async fn validate_token(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(ApiResponse::new(UserSummaryDto::from(&current.user)))
}
