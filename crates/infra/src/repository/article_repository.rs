//! # ArticleRepository
//!
//! 記事の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **所有者スコープ**: 更新・削除系のクエリは `WHERE id = $1 AND user_id = $2`
//!   で絞り込む。他人の記事と存在しない記事は区別されない
//! - **所有者の不変性**: UPDATE 文は `user_id` を書き換えない
//! - **一覧の順序**: `id` の昇順（作成順）

use async_trait::async_trait;
use blog_domain::{
    article::{
        Article,
        ArticleBody,
        ArticleId,
        ArticleRecord,
        ArticleTitle,
        ArticleWithAuthor,
        NewArticle,
    },
    user::{User, UserId},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::user_repository::UserRow;
use crate::error::InfraError;

/// articles テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id:         i64,
    user_id:    i64,
    title:      String,
    body:       String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = InfraError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Article::from_db(ArticleRecord {
            id:         ArticleId::from_i64(row.id),
            user_id:    UserId::from_i64(row.user_id),
            title:      ArticleTitle::new(row.title)?,
            body:       ArticleBody::new(row.body)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// articles と users を JOIN した行
///
/// users 側の列は `author_` プレフィックス付きで取得する。
#[derive(Debug, sqlx::FromRow)]
struct ArticleWithAuthorRow {
    #[sqlx(flatten)]
    article:           ArticleRow,
    author_name:       String,
    author_email:      String,
    author_created_at: DateTime<Utc>,
    author_updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleWithAuthorRow> for ArticleWithAuthor {
    type Error = InfraError;

    fn try_from(row: ArticleWithAuthorRow) -> Result<Self, Self::Error> {
        let author = User::try_from(UserRow {
            id:         row.article.user_id,
            name:       row.author_name,
            email:      row.author_email,
            created_at: row.author_created_at,
            updated_at: row.author_updated_at,
        })?;
        let article = Article::try_from(row.article)?;
        Ok(ArticleWithAuthor::new(article, author))
    }
}

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT
        a.id,
        a.user_id,
        a.title,
        a.body,
        a.created_at,
        a.updated_at,
        u.name AS author_name,
        u.email AS author_email,
        u.created_at AS author_created_at,
        u.updated_at AS author_updated_at
    FROM articles a
    INNER JOIN users u ON u.id = a.user_id
"#;

/// 記事リポジトリトレイト
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// 全記事を所有者情報付きで取得する（ID 昇順）
    async fn find_all_with_author(&self) -> Result<Vec<ArticleWithAuthor>, InfraError>;

    /// ID で記事を所有者情報付きで取得する
    async fn find_with_author_by_id(
        &self,
        id: ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, InfraError>;

    /// 指定ユーザーが所有する記事を ID で取得する
    ///
    /// 記事が存在しない場合と所有者が異なる場合はどちらも `None` を返す。
    async fn find_owned(
        &self,
        id: ArticleId,
        owner: UserId,
    ) -> Result<Option<Article>, InfraError>;

    /// 記事を作成し、採番された ID を含む記事を返す
    async fn insert(&self, new_article: &NewArticle) -> Result<Article, InfraError>;

    /// 記事のタイトル・本文・更新日時を保存する
    ///
    /// 所有者スコープで更新し、対象行がなければ `false` を返す。
    async fn update(&self, article: &Article) -> Result<bool, InfraError>;

    /// 指定ユーザーが所有する記事を削除する
    ///
    /// 対象行がなければ `false` を返す。
    async fn delete_owned(&self, id: ArticleId, owner: UserId) -> Result<bool, InfraError>;
}

/// PostgreSQL 実装の ArticleRepository
#[derive(Debug, Clone)]
pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all_with_author(&self) -> Result<Vec<ArticleWithAuthor>, InfraError> {
        let sql = format!("{SELECT_WITH_AUTHOR} ORDER BY a.id ASC");
        let rows = sqlx::query_as::<_, ArticleWithAuthorRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ArticleWithAuthor::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_with_author_by_id(
        &self,
        id: ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, InfraError> {
        let sql = format!("{SELECT_WITH_AUTHOR} WHERE a.id = $1");
        let row = sqlx::query_as::<_, ArticleWithAuthorRow>(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ArticleWithAuthor::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %owner))]
    async fn find_owned(
        &self,
        id: ArticleId,
        owner: UserId,
    ) -> Result<Option<Article>, InfraError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, user_id, title, body, created_at, updated_at
            FROM articles
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(owner.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Article::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %new_article.user_id))]
    async fn insert(&self, new_article: &NewArticle) -> Result<Article, InfraError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (user_id, title, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, user_id, title, body, created_at, updated_at
            "#,
        )
        .bind(new_article.user_id.as_i64())
        .bind(new_article.title.as_str())
        .bind(new_article.body.as_str())
        .bind(new_article.now)
        .fetch_one(&self.pool)
        .await?;

        Article::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %article.id()))]
    async fn update(&self, article: &Article) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = $3, body = $4, updated_at = $5
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(article.id().as_i64())
        .bind(article.user_id().as_i64())
        .bind(article.title().as_str())
        .bind(article.body().as_str())
        .bind(article.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %owner))]
    async fn delete_owned(&self, id: ArticleId, owner: UserId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND user_id = $2")
            .bind(id.as_i64())
            .bind(owner.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresArticleRepository>();
    }

    #[test]
    fn test_joinした行から所有者付き記事に変換できる() {
        let now = Utc::now();
        let row = ArticleWithAuthorRow {
            article:           ArticleRow {
                id:         5,
                user_id:    2,
                title:      "タイトル".to_string(),
                body:       "本文".to_string(),
                created_at: now,
                updated_at: now,
            },
            author_name:       "山田太郎".to_string(),
            author_email:      "taro@example.com".to_string(),
            author_created_at: now,
            author_updated_at: now,
        };

        let result = ArticleWithAuthor::try_from(row).unwrap();

        assert_eq!(result.article.id(), ArticleId::from_i64(5));
        assert_eq!(result.author.id(), UserId::from_i64(2));
        assert_eq!(result.author.email().as_str(), "taro@example.com");
    }
}
