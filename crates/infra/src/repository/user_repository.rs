//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! パスワードハッシュは [`User`] に含めず、認証時のみ
//! [`find_with_password_by_email`](UserRepository::find_with_password_by_email)
//! で取得する。

use async_trait::async_trait;
use blog_domain::{
    password::PasswordHash,
    user::{Email, NewUser, User, UserId, UserName, UserRecord},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::InfraError;

/// users テーブルの行
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub(crate) id:         i64,
    pub(crate) name:       String,
    pub(crate) email:      String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_db(UserRecord {
            id:         UserId::from_i64(row.id),
            name:       UserName::new(row.name)?,
            email:      Email::new(row.email)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// 認証用にパスワードハッシュを含む行
#[derive(Debug, sqlx::FromRow)]
struct UserWithPasswordRow {
    #[sqlx(flatten)]
    user:               UserRow,
    encrypted_password: String,
}

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ID でユーザーを検索する
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, InfraError>;

    /// メールアドレスでユーザーを検索する
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

    /// メールアドレスでユーザーとパスワードハッシュを検索する
    async fn find_with_password_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, InfraError>;

    /// ユーザーを登録し、採番された ID を含むユーザーを返す
    ///
    /// メールアドレスが重複する場合は `users_email_key` の一意制約違反になる。
    async fn insert(
        &self,
        new_user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_with_password_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, InfraError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(
            r#"
            SELECT id, name, email, encrypted_password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = User::try_from(row.user)?;
        Ok(Some((user, PasswordHash::new(row.encrypted_password))))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(
        &self,
        new_user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, encrypted_password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(new_user.name.as_str())
        .bind(new_user.email.as_str())
        .bind(password_hash.as_str())
        .bind(new_user.now)
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }
}
