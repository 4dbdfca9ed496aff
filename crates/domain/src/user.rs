//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ユーザーは記事の所有者として参照されるが、記事から所有されることはない。
//! 認証情報（パスワードハッシュ）はエンティティに含めず、
//! リポジトリの認証用メソッドからのみ取得する。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use blog_domain::user::{Email, User, UserId, UserName, UserRecord};
//!
//! let now = chrono::Utc::now();
//! let user = User::from_db(UserRecord {
//!     id: UserId::from_i64(1),
//!     name: UserName::new("山田太郎")?,
//!     email: Email::new("taro@example.com")?,
//!     created_at: now,
//!     updated_at: now,
//! });
//!
//! assert_eq!(user.email().as_str(), "taro@example.com");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

define_serial_id! {
    /// ユーザー ID（DB 採番）
    pub struct UserId;
}

define_validated_string! {
    /// ユーザー名（1〜100 文字）
    pub struct UserName {
        label: "ユーザー名",
        max_length: 100,
    }
}

/// メールアドレスの最大長
const EMAIL_MAX_LENGTH: usize = 255;

/// メールアドレス（値オブジェクト）
///
/// `local@domain` の形式を要求する。ログイン ID として使用するため
/// 前後の空白は除去し、小文字に正規化する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # エラー
    ///
    /// 空、`@` を含まない、ローカル部/ドメイン部が空、255 文字超過の場合は
    /// `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > EMAIL_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{EMAIL_MAX_LENGTH}文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `email` はシステム全体で一意（DB の `users_email_key` 制約）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    name:       UserName,
    email:      Email,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// ユーザーの新規登録パラメータ
///
/// ID は INSERT 時に DB が採番する。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name:  UserName,
    pub email: Email,
    pub now:   DateTime<Utc>,
}

/// ユーザーの DB 復元パラメータ
pub struct UserRecord {
    pub id:         UserId,
    pub name:       UserName,
    pub email:      Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 既存のデータから復元する
    pub fn from_db(record: UserRecord) -> Self {
        Self {
            id:         record.id,
            name:       record.name,
            email:      record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    mod email {
        use pretty_assertions::assert_eq;

        use super::*;

        #[rstest]
        #[case("user@example.com", "user@example.com")]
        #[case("  User@Example.COM ", "user@example.com")]
        fn test_正しい形式は正規化されて成功(#[case] input: &str, #[case] expected: &str) {
            let email = Email::new(input).unwrap();
            assert_eq!(email.as_str(), expected);
        }

        #[rstest]
        #[case("")]
        #[case("   ")]
        #[case("userexample.com")]
        #[case("@example.com")]
        #[case("user@")]
        fn test_不正な形式はバリデーションエラー(#[case] input: &str) {
            let result = Email::new(input);
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn test_255文字を超えるとエラー() {
            let local = "a".repeat(250);
            let result = Email::new(format!("{local}@example.com"));
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }

    mod user_name {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn test_前後の空白が除去される() {
            let name = UserName::new("  山田太郎  ").unwrap();
            assert_eq!(name.as_str(), "山田太郎");
        }

        #[test]
        fn test_100文字ちょうどは成功し101文字はエラー() {
            assert!(UserName::new("あ".repeat(100)).is_ok());
            assert!(UserName::new("あ".repeat(101)).is_err());
        }
    }

    #[test]
    fn test_user_idはjsonで数値としてシリアライズされる() {
        let json = serde_json::to_value(UserId::from_i64(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }
}
