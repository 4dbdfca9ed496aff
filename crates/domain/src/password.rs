//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`PlainPassword`] | ログイン・登録時の入力値 |
//! | [`PasswordHash`] | 永続化用のハッシュ値（Argon2id の PHC 文字列） |
//! | [`PasswordVerifyResult`] | パスワード検証の成否 |

use crate::DomainError;

/// 登録時に要求するパスワードの最小長
const PASSWORD_MIN_LENGTH: usize = 8;

/// 登録時に許容するパスワードの最大長
const PASSWORD_MAX_LENGTH: usize = 128;

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    /// パスワードを作成する（ログイン時の入力値、検証なし）
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 新規登録用のパスワードを作成する
    ///
    /// # エラー
    ///
    /// 8 文字未満または 128 文字超過の場合は `DomainError::Validation` を返す。
    pub fn for_registration(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let length = value.chars().count();

        if length < PASSWORD_MIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "パスワードは {PASSWORD_MIN_LENGTH} 文字以上である必要があります"
            )));
        }

        if length > PASSWORD_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "パスワードは {PASSWORD_MAX_LENGTH} 文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワードハッシュ（永続化用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// ハッシュ文字列からインスタンスを作成する
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
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

/// パスワード検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
    /// パスワードが一致した
    Match,
    /// パスワードが一致しなかった
    Mismatch,
}

impl PasswordVerifyResult {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}

impl From<bool> for PasswordVerifyResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_plain_passwordのdebug出力はマスクされる() {
        let password = PlainPassword::new("secret123");
        let debug = format!("{password:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret123"));
    }

    #[rstest]
    #[case(7, false)]
    #[case(8, true)]
    #[case(128, true)]
    #[case(129, false)]
    fn test_for_registrationは長さを検証する(#[case] length: usize, #[case] ok: bool) {
        let result = PlainPassword::for_registration("p".repeat(length));
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn test_boolから検証結果に変換できる() {
        assert!(PasswordVerifyResult::from(true).is_match());
        assert!(PasswordVerifyResult::from(false).is_mismatch());
    }
}
