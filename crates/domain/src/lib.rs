//! # Blog ドメイン層
//!
//! 記事（Article）とユーザー（User）のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 永続化された識別子を持つオブジェクト（User, Article）
//! - **値オブジェクト**: 生成時に検証される不変オブジェクト（ArticleTitle, Email）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//!   ↘            ↑
//!     ──────────
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`article`] - 記事エンティティと値オブジェクト
//! - [`user`] - ユーザーエンティティと値オブジェクト
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層エラー
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use blog_domain::article::{ArticleBody, ArticleTitle};
//!
//! let title = ArticleTitle::new("  はじめての投稿  ")?;
//! assert_eq!(title.as_str(), "はじめての投稿");
//!
//! assert!(ArticleBody::new("").is_err());
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod article;
pub mod clock;
pub mod error;
pub mod password;
pub mod user;

pub use error::DomainError;
