//! # リポジトリ実装
//!
//! ドメインエンティティの永続化を担当する。
//!
//! - [`UserRepository`] - ユーザーの登録と検索（認証用のパスワードハッシュ取得を含む）
//! - [`ArticleRepository`] - 記事の CRUD。更新・削除は所有者スコープで行う

pub mod article_repository;
pub mod user_repository;

pub use article_repository::{ArticleRepository, PostgresArticleRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
