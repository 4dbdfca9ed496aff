//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない（または所有者ではない） |
//! | `Conflict` | 409 Conflict | 一意制約の違反 |
//!
//! ## 使用例
//!
//! ```rust
//! use blog_domain::DomainError;
//!
//! fn find_article(id: i64) -> Result<(), DomainError> {
//!     Err(DomainError::NotFound {
//!         entity_type: "Article",
//!         id:          id.to_string(),
//!     })
//! }
//!
//! assert_eq!(
//!     find_article(10000).unwrap_err().to_string(),
//!     "Article が見つかりません: 10000"
//! );
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - 不正なフォーマット
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// 所有者スコープ付きの検索では、他ユーザーの所有するエンティティも
    /// 「存在しない」として扱う。呼び出し側は両者を区別できない。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Article", "User" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 競合エラー（一意制約違反など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),
}
