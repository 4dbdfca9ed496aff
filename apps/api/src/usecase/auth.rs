//! 認証ユースケース
//!
//! ユーザー登録、サインイン、サインアウト、トークン検証を扱う。
//!
//! サインイン失敗時は、メールアドレスが存在しない場合とパスワードが
//! 一致しない場合で同じエラーを返す。

use std::sync::Arc;

use blog_domain::{
    clock::Clock,
    password::PlainPassword,
    user::{Email, NewUser, User, UserName},
};
use blog_infra::{
    PasswordChecker,
    TokenData,
    TokenStore,
    repository::UserRepository,
};

use crate::error::ApiError;

/// メールアドレスの一意制約名
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// 認証情報の不一致メッセージ
const INVALID_CREDENTIALS: &str = "メールアドレスまたはパスワードが正しくありません";

/// 登録の入力
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name:     String,
    pub email:    String,
    pub password: String,
}

/// サインインの入力
#[derive(Debug, Clone)]
pub struct SignInInput {
    pub email:    String,
    pub password: String,
}

/// 発行されたトークンとユーザー
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user:  User,
}

/// 認証ユースケース
pub struct AuthUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    token_store:      Arc<dyn TokenStore>,
    password_checker: Arc<dyn PasswordChecker>,
    clock:            Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_store: Arc<dyn TokenStore>,
        password_checker: Arc<dyn PasswordChecker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            token_store,
            password_checker,
            clock,
        }
    }

    /// ユーザーを登録し、トークンを発行する
    ///
    /// メールアドレスが登録済みの場合は Conflict を返す。
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, input: RegisterInput) -> Result<IssuedToken, ApiError> {
        let name = UserName::new(input.name)?;
        let email = Email::new(input.email)?;
        let password = PlainPassword::for_registration(input.password)?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let hash = self.password_checker.hash(&password)?;
        let new_user = NewUser {
            name,
            email,
            now: self.clock.now(),
        };

        let user = self
            .user_repository
            .insert(&new_user, &hash)
            .await
            .map_err(|e| {
                // 事前確認と INSERT の間に同じメールアドレスが登録された場合
                if e.unique_violation() == Some(EMAIL_UNIQUE_CONSTRAINT) {
                    return email_taken();
                }
                ApiError::Database(e)
            })?;
        tracing::info!(user_id = %user.id(), "ユーザーを登録しました");

        self.issue_token(user).await
    }

    /// メールアドレスとパスワードでサインインする
    #[tracing::instrument(skip_all)]
    pub async fn sign_in(&self, input: SignInInput) -> Result<IssuedToken, ApiError> {
        let invalid = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let email = Email::new(input.email).map_err(|_| invalid())?;
        let Some((user, hash)) = self
            .user_repository
            .find_with_password_by_email(&email)
            .await?
        else {
            return Err(invalid());
        };

        let result = self
            .password_checker
            .verify(&PlainPassword::new(input.password), &hash)?;
        if result.is_mismatch() {
            tracing::info!(user_id = %user.id(), "パスワード不一致によりサインインを拒否しました");
            return Err(invalid());
        }

        self.issue_token(user).await
    }

    /// トークンを失効させる
    #[tracing::instrument(skip_all)]
    pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
        self.token_store.revoke(token).await?;
        Ok(())
    }

    /// トークンから認証済みユーザーを解決する
    ///
    /// トークンが存在しない・期限切れ・ユーザー削除済みの場合は Unauthorized。
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        let unauthorized = || ApiError::Unauthorized("認証が必要です".to_string());

        let data = self
            .token_store
            .find(token)
            .await?
            .ok_or_else(unauthorized)?;

        self.user_repository
            .find_by_id(data.user_id())
            .await?
            .ok_or_else(unauthorized)
    }

    async fn issue_token(&self, user: User) -> Result<IssuedToken, ApiError> {
        let data = TokenData::new(user.id(), self.clock.now());
        let token = self.token_store.issue(&data).await?;
        Ok(IssuedToken { token, user })
    }
}

fn email_taken() -> ApiError {
    ApiError::Conflict("このメールアドレスは既に登録されています".to_string())
}

#[cfg(test)]
mod tests {
    use blog_domain::clock::FixedClock;
    use blog_infra::mock::{MockPasswordChecker, MockTokenStore, MockUserRepository};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        sut:    AuthUseCaseImpl,
        users:  MockUserRepository,
        tokens: MockTokenStore,
    }

    fn setup() -> Fixture {
        let users = MockUserRepository::new();
        let tokens = MockTokenStore::new();
        let clock = FixedClock::new(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap());
        let sut = AuthUseCaseImpl::new(
            Arc::new(users.clone()),
            Arc::new(tokens.clone()),
            Arc::new(MockPasswordChecker),
            Arc::new(clock),
        );
        Fixture { sut, users, tokens }
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name:     "山田太郎".to_string(),
            email:    email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_登録するとトークンが発行され認証できる() {
        let f = setup();

        let issued = f
            .sut
            .register(register_input("taro@example.com"))
            .await
            .unwrap();
        let user = f.sut.authenticate(&issued.token).await.unwrap();

        assert_eq!(user, issued.user);
        assert_eq!(f.tokens.count(), 1);
    }

    #[tokio::test]
    async fn test_登録済みメールアドレスはconflict() {
        let f = setup();
        f.sut
            .register(register_input("taro@example.com"))
            .await
            .unwrap();

        let result = f.sut.register(register_input("TARO@example.com")).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(f.users.count(), 1);
    }

    #[tokio::test]
    async fn test_短いパスワードでの登録はバリデーションエラー() {
        let f = setup();
        let input = RegisterInput {
            password: "short".to_string(),
            ..register_input("taro@example.com")
        };

        let result = f.sut.register(input).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(f.users.count(), 0);
    }

    #[tokio::test]
    async fn test_正しい認証情報でサインインできる() {
        let f = setup();
        let registered = f
            .sut
            .register(register_input("taro@example.com"))
            .await
            .unwrap();

        let issued = f
            .sut
            .sign_in(SignInInput {
                email:    "taro@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(issued.user, registered.user);
        assert_ne!(issued.token, registered.token);
    }

    #[tokio::test]
    async fn test_パスワード不一致と未登録は同じエラーになる() {
        let f = setup();
        f.sut
            .register(register_input("taro@example.com"))
            .await
            .unwrap();

        let wrong_password = f
            .sut
            .sign_in(SignInInput {
                email:    "taro@example.com".to_string(),
                password: "wrongpassword".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = f
            .sut
            .sign_in(SignInInput {
                email:    "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_サインアウト後のトークンは認証できない() {
        let f = setup();
        let issued = f
            .sut
            .register(register_input("taro@example.com"))
            .await
            .unwrap();

        f.sut.sign_out(&issued.token).await.unwrap();
        let result = f.sut.authenticate(&issued.token).await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_ユーザーが存在しないトークンは認証できない() {
        let f = setup();
        f.tokens.insert(
            "orphan-token",
            TokenData::new(
                blog_domain::user::UserId::from_i64(99),
                DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            ),
        );

        let result = f.sut.authenticate("orphan-token").await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
