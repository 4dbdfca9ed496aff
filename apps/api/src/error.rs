//! # API エラー定義
//!
//! API サーバーで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス |
//! |-------|-----------|
//! | `Validation` | 400 |
//! | `Unauthorized` | 401 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Database` / `Internal` | 500 |
//!
//! レスポンスボディは [`ErrorResponse`]（RFC 9457 Problem Details）。
//! 500 系は詳細を返さず、ログにのみ出力する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blog_domain::DomainError;
use blog_infra::InfraError;
use blog_shared::ErrorResponse;
use thiserror::Error;

/// API サーバーで発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リソースが見つからない（他人の記事に対する更新・削除を含む）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 入力値の検証失敗
    #[error("入力値が不正です: {0}")]
    Validation(String),

    /// 認証失敗
    #[error("認証に失敗しました: {0}")]
    Unauthorized(String),

    /// 一意制約違反
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// インフラ層エラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(msg) => Self::Validation(msg),
            e @ DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
            DomainError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl ApiError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            Self::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            Self::Unauthorized(msg) => ErrorResponse::unauthorized(msg.clone()),
            Self::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            Self::Database(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                ErrorResponse::internal_error()
            }
            Self::Internal(msg) => {
                tracing::error!(
                    error.category = "internal",
                    "内部エラー: {}",
                    msg
                );
                ErrorResponse::internal_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}
