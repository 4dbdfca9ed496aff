//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use blog_domain::{
    article::{Article, ArticleBody, ArticleTitle, NewArticle},
    password::PasswordHash,
    user::{Email, NewUser, User, UserName},
};
use blog_infra::repository::{
    ArticleRepository,
    PostgresArticleRepository,
    PostgresUserRepository,
    UserRepository,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// テスト用の固定時刻（ミリ秒精度）
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()
}

/// テスト用のパスワードハッシュ（password123）
pub fn test_password_hash() -> PasswordHash {
    PasswordHash::new(
        "$argon2id$v=19$m=65536,t=1,p=1$olntqw+EoVpwH4B1vUAI0A$5yCA1izLODgz8nQOInDGwbuQB/AS0sIQDwpmIilve5M",
    )
}

/// ユーザーを登録する
pub async fn insert_user(pool: &PgPool, name: &str, email: &str) -> User {
    let repo = PostgresUserRepository::new(pool.clone());
    let new_user = NewUser {
        name:  UserName::new(name).unwrap(),
        email: Email::new(email).unwrap(),
        now:   test_now(),
    };
    repo.insert(&new_user, &test_password_hash())
        .await
        .expect("ユーザー作成に失敗")
}

/// 記事を作成する
pub async fn insert_article(pool: &PgPool, owner: &User, title: &str, body: &str) -> Article {
    let repo = PostgresArticleRepository::new(pool.clone());
    let new_article = NewArticle {
        user_id: owner.id(),
        title:   ArticleTitle::new(title).unwrap(),
        body:    ArticleBody::new(body).unwrap(),
        now:     test_now(),
    };
    repo.insert(&new_article).await.expect("記事作成に失敗")
}
