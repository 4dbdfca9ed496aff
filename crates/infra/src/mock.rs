//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! blog-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use blog_domain::{
    article::{Article, ArticleId, ArticleRecord, ArticleWithAuthor, NewArticle},
    password::{PasswordHash, PasswordVerifyResult, PlainPassword},
    user::{Email, NewUser, User, UserId, UserRecord},
};
use uuid::Uuid;

use crate::{
    error::InfraError,
    password::PasswordChecker,
    repository::{ArticleRepository, UserRepository},
    token::{TokenData, TokenStore},
};

// ===== MockUserRepository =====

/// インメモリのユーザーリポジトリ
///
/// Clone したインスタンス間でデータを共有する。
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<(User, PasswordHash)>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスワードハッシュなしでユーザーを追加する（ID は自動採番）
    pub fn add_user(&self, new_user: NewUser) -> User {
        let mut users = self.users.lock().unwrap();
        let user = build_user(users.len(), new_user);
        users.push((user.clone(), PasswordHash::new("")));
        user
    }

    /// 登録済みユーザー数
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn find_author(&self, id: UserId) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id() == id)
            .map(|(u, _)| u.clone())
    }
}

fn build_user(existing: usize, new_user: NewUser) -> User {
    User::from_db(UserRecord {
        id:         UserId::from_i64(existing as i64 + 1),
        name:       new_user.name,
        email:      new_user.email,
        created_at: new_user.now,
        updated_at: new_user.now,
    })
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, InfraError> {
        Ok(self.find_author(id))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email() == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_with_password_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email() == email)
            .cloned())
    }

    async fn insert(
        &self,
        new_user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, InfraError> {
        let mut users = self.users.lock().unwrap();
        let user = build_user(users.len(), new_user.clone());
        users.push((user.clone(), password_hash.clone()));
        Ok(user)
    }
}

// ===== MockArticleRepository =====

/// インメモリの記事リポジトリ
///
/// 所有者情報の取得には共有した [`MockUserRepository`] を参照する。
#[derive(Clone)]
pub struct MockArticleRepository {
    articles: Arc<Mutex<Vec<Article>>>,
    next_id:  Arc<Mutex<i64>>,
    users:    MockUserRepository,
}

impl MockArticleRepository {
    pub fn new(users: MockUserRepository) -> Self {
        Self {
            articles: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
            users,
        }
    }

    /// 保存されている記事数
    pub fn count(&self) -> usize {
        self.articles.lock().unwrap().len()
    }

    /// ID で記事を取得する（検証用）
    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id() == id)
            .cloned()
    }

    fn with_author(&self, article: Article) -> Result<ArticleWithAuthor, InfraError> {
        let author = self
            .users
            .find_author(article.user_id())
            .ok_or_else(|| InfraError::unexpected("所有者が存在しません"))?;
        Ok(ArticleWithAuthor::new(article, author))
    }
}

#[async_trait]
impl ArticleRepository for MockArticleRepository {
    async fn find_all_with_author(&self) -> Result<Vec<ArticleWithAuthor>, InfraError> {
        let mut articles = self.articles.lock().unwrap().clone();
        articles.sort_by_key(Article::id);
        articles.into_iter().map(|a| self.with_author(a)).collect()
    }

    async fn find_with_author_by_id(
        &self,
        id: ArticleId,
    ) -> Result<Option<ArticleWithAuthor>, InfraError> {
        self.get(id).map(|a| self.with_author(a)).transpose()
    }

    async fn find_owned(
        &self,
        id: ArticleId,
        owner: UserId,
    ) -> Result<Option<Article>, InfraError> {
        Ok(self.get(id).filter(|a| a.is_owned_by(owner)))
    }

    async fn insert(&self, new_article: &NewArticle) -> Result<Article, InfraError> {
        let mut next_id = self.next_id.lock().unwrap();
        let article = Article::from_db(ArticleRecord {
            id:         ArticleId::from_i64(*next_id),
            user_id:    new_article.user_id,
            title:      new_article.title.clone(),
            body:       new_article.body.clone(),
            created_at: new_article.now,
            updated_at: new_article.now,
        });
        *next_id += 1;
        self.articles.lock().unwrap().push(article.clone());
        Ok(article)
    }

    async fn update(&self, article: &Article) -> Result<bool, InfraError> {
        let mut articles = self.articles.lock().unwrap();
        let Some(stored) = articles
            .iter_mut()
            .find(|a| a.id() == article.id() && a.is_owned_by(article.user_id()))
        else {
            return Ok(false);
        };
        *stored = article.clone();
        Ok(true)
    }

    async fn delete_owned(&self, id: ArticleId, owner: UserId) -> Result<bool, InfraError> {
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.id() != id || !a.is_owned_by(owner));
        Ok(articles.len() < before)
    }
}

// ===== MockTokenStore =====

/// インメモリのトークンストア
#[derive(Clone, Default)]
pub struct MockTokenStore {
    tokens: Arc<Mutex<HashMap<String, TokenData>>>,
}

impl MockTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定したトークン文字列で直接登録する
    pub fn insert(&self, token: impl Into<String>, data: TokenData) {
        self.tokens.lock().unwrap().insert(token.into(), data);
    }

    /// 有効なトークン数
    pub fn count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn issue(&self, data: &TokenData) -> Result<String, InfraError> {
        let token = Uuid::new_v4().to_string();
        self.insert(token.clone(), data.clone());
        Ok(token)
    }

    async fn find(&self, token: &str) -> Result<Option<TokenData>, InfraError> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<(), InfraError> {
        self.tokens.lock().unwrap().remove(token);
        Ok(())
    }
}

// ===== MockPasswordChecker =====

/// 平文に固定のプレフィックスを付けるだけのパスワードチェッカー
///
/// Argon2 の計算コストを避けるためにテストで使用する。
#[derive(Clone, Copy, Default)]
pub struct MockPasswordChecker;

impl MockPasswordChecker {
    const PREFIX: &'static str = "mock$";
}

impl PasswordChecker for MockPasswordChecker {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        Ok(PasswordHash::new(format!(
            "{}{}",
            Self::PREFIX,
            password.as_str()
        )))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let Some(stored) = hash.as_str().strip_prefix(Self::PREFIX) else {
            return Err(InfraError::unexpected("不正なハッシュ形式"));
        };
        Ok(PasswordVerifyResult::from(stored == password.as_str()))
    }
}
