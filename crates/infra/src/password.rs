//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//!
//! ハッシュは PHC 文字列形式（`$argon2id$v=19$m=...`）で `users.encrypted_password`
//! に保存される。

use argon2::{
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString},
};
use blog_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};
use rand::RngCore as _;

use crate::InfraError;

/// ソルトのバイト長
const SALT_LENGTH: usize = 16;

/// パスワードのハッシュ化と検証を担当するトレイト
pub trait PasswordChecker: Send + Sync {
    /// パスワードをハッシュ化する
    ///
    /// 呼び出しごとにランダムなソルトを生成する。
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id によるパスワードハッシュの実装
///
/// OWASP 推奨パラメータ（RFC 9106）を使用:
/// - Memory: 64 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct Argon2PasswordChecker {
    argon2: Argon2<'static>,
}

impl Argon2PasswordChecker {
    pub fn new() -> Self {
        let params = Params::new(
            65536, // memory (KB) = 64 MB
            1,     // iterations
            1,     // parallelism
            None,  // output length (default: 32)
        )
        .expect("Argon2 パラメータが不正です");

        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordChecker for Argon2PasswordChecker {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| InfraError::unexpected(format!("ソルトの生成に失敗: {e}")))?;

        let hashed = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::unexpected(format!("パスワードのハッシュ化に失敗: {e}")))?;

        Ok(PasswordHash::new(hashed.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::unexpected(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn checker() -> Argon2PasswordChecker {
        Argon2PasswordChecker::new()
    }

    #[rstest]
    fn test_ハッシュ化したパスワードを検証できる(checker: Argon2PasswordChecker) {
        let password = PlainPassword::new("password123");

        let hash = checker.hash(&password).unwrap();
        let result = checker.verify(&password, &hash).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(result.is_match());
    }

    #[rstest]
    fn test_異なるパスワードは不一致になる(checker: Argon2PasswordChecker) {
        let hash = checker.hash(&PlainPassword::new("password123")).unwrap();

        let result = checker
            .verify(&PlainPassword::new("wrongpassword"), &hash)
            .unwrap();

        assert!(result.is_mismatch());
    }

    #[rstest]
    fn test_同じパスワードでもソルトによりハッシュが異なる(checker: Argon2PasswordChecker) {
        let password = PlainPassword::new("password123");

        let first = checker.hash(&password).unwrap();
        let second = checker.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー(checker: Argon2PasswordChecker) {
        let password = PlainPassword::new("password123");
        let invalid_hash = PasswordHash::new("not-a-valid-hash");

        let result = checker.verify(&password, &invalid_hash);

        assert!(result.is_err());
    }
}
