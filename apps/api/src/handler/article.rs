//! # 記事ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/articles` - 記事一覧（認証不要）
//! - `GET /api/v1/articles/{id}` - 記事詳細（認証不要）
//! - `POST /api/v1/articles` - 記事作成
//! - `PATCH /api/v1/articles/{id}` - 自分の記事の更新
//! - `DELETE /api/v1/articles/{id}` - 自分の記事の削除
//!
//! 記事のレスポンスはエンベロープなしの JSON で、キー順は
//! `id`, `title`, `body`, `updated_at`, `user` に固定される。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use blog_domain::{
    DomainError,
    article::{ArticleId, ArticleWithAuthor},
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::auth::UserSummaryDto;
use crate::{
    error::ApiError,
    middleware::CurrentUser,
    usecase::{ArticleInput, ArticleUseCaseImpl},
};

/// 記事 API の共有状態
pub struct ArticleState {
    pub usecase: ArticleUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 記事作成・更新リクエスト（`{"article": {...}}`）
#[derive(Debug, Default, Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub article: ArticleAttributes,
}

/// 受け付ける記事属性
///
/// `user_id` など未知のフィールドは読み捨てる。
#[derive(Debug, Default, Deserialize)]
pub struct ArticleAttributes {
    pub title: Option<String>,
    pub body:  Option<String>,
}

impl From<ArticleAttributes> for ArticleInput {
    fn from(attrs: ArticleAttributes) -> Self {
        Self {
            title: attrs.title,
            body:  attrs.body,
        }
    }
}

/// 記事 DTO
#[derive(Debug, Serialize)]
pub struct ArticleDto {
    pub id:         i64,
    pub title:      String,
    pub body:       String,
    pub updated_at: String,
    pub user:       UserSummaryDto,
}

impl From<&ArticleWithAuthor> for ArticleDto {
    fn from(value: &ArticleWithAuthor) -> Self {
        let article = &value.article;
        Self {
            id:         article.id().as_i64(),
            title:      article.title().as_str().to_string(),
            body:       article.body().as_str().to_string(),
            updated_at: article
                .updated_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            user:       UserSummaryDto::from(&value.author),
        }
    }
}

/// パスパラメータを記事 ID に変換する
///
/// 数値として解釈できない ID は存在しない記事として扱う。
fn parse_article_id(raw: &str) -> Result<ArticleId, ApiError> {
    raw.parse::<i64>().map(ArticleId::from_i64).map_err(|_| {
        DomainError::NotFound {
            entity_type: "Article",
            id:          raw.to_string(),
        }
        .into()
    })
}

// --- ハンドラ ---

/// GET /api/v1/articles
pub async fn list_articles(
    State(state): State<Arc<ArticleState>>,
) -> Result<impl IntoResponse, ApiError> {
    let articles = state.usecase.list_articles().await?;
    let dtos: Vec<ArticleDto> = articles.iter().map(ArticleDto::from).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// GET /api/v1/articles/{id}
pub async fn get_article(
    State(state): State<Arc<ArticleState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.usecase.get_article(parse_article_id(&id)?).await?;

    Ok((StatusCode::OK, Json(ArticleDto::from(&article))))
}

/// POST /api/v1/articles
///
/// 作成成功時も 200 OK を返す。
pub async fn create_article(
    State(state): State<Arc<ArticleState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .usecase
        .create_article(&current.user, req.article.into())
        .await?;

    Ok((StatusCode::OK, Json(ArticleDto::from(&article))))
}

/// PATCH /api/v1/articles/{id}
pub async fn update_article(
    State(state): State<Arc<ArticleState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<ArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .usecase
        .update_article(&current.user, parse_article_id(&id)?, req.article.into())
        .await?;

    Ok((StatusCode::OK, Json(ArticleDto::from(&article))))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete_article(
    State(state): State<Arc<ArticleState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .usecase
        .delete_article(&current.user, parse_article_id(&id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
