//! 記事ユースケース
//!
//! 読み取り（一覧・詳細）は所有者を問わない。更新・削除は
//! 所有者スコープの検索で対象を絞り込み、見つからなければ NotFound とする。

use std::sync::Arc;

use blog_domain::{
    DomainError,
    article::{
        ArticleBody,
        ArticleChanges,
        ArticleId,
        ArticleTitle,
        ArticleWithAuthor,
        NewArticle,
    },
    clock::Clock,
    user::User,
};
use blog_infra::repository::ArticleRepository;

use crate::error::ApiError;

/// 記事作成・更新の入力
///
/// 受け付けるのは `title` と `body` のみ。所有者は入力から設定できない。
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub body:  Option<String>,
}

/// 記事ユースケース
pub struct ArticleUseCaseImpl {
    article_repository: Arc<dyn ArticleRepository>,
    clock:              Arc<dyn Clock>,
}

fn not_found(id: ArticleId) -> ApiError {
    DomainError::NotFound {
        entity_type: "Article",
        id:          id.to_string(),
    }
    .into()
}

impl ArticleUseCaseImpl {
    pub fn new(article_repository: Arc<dyn ArticleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            article_repository,
            clock,
        }
    }

    /// 全記事を取得する
    #[tracing::instrument(skip_all)]
    pub async fn list_articles(&self) -> Result<Vec<ArticleWithAuthor>, ApiError> {
        Ok(self.article_repository.find_all_with_author().await?)
    }

    /// 記事を取得する（所有者を問わない）
    #[tracing::instrument(skip_all, fields(%id))]
    pub async fn get_article(&self, id: ArticleId) -> Result<ArticleWithAuthor, ApiError> {
        self.article_repository
            .find_with_author_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// 記事を作成する
    ///
    /// 所有者は常に `author`（認証済みユーザー）になる。
    #[tracing::instrument(skip_all, fields(user_id = %author.id()))]
    pub async fn create_article(
        &self,
        author: &User,
        input: ArticleInput,
    ) -> Result<ArticleWithAuthor, ApiError> {
        let new_article = NewArticle {
            user_id: author.id(),
            title:   ArticleTitle::new(input.title.unwrap_or_default())?,
            body:    ArticleBody::new(input.body.unwrap_or_default())?,
            now:     self.clock.now(),
        };

        let article = self.article_repository.insert(&new_article).await?;
        tracing::info!(article_id = %article.id(), "記事を作成しました");

        Ok(ArticleWithAuthor::new(article, author.clone()))
    }

    /// 自分の記事を更新する
    ///
    /// 1. 所有者スコープで記事を検索（他人の記事は存在しない扱い）
    /// 2. 指定されたフィールドのみ検証して適用、`updated_at` は常に更新
    /// 3. 所有者スコープで保存
    #[tracing::instrument(skip_all, fields(%id, user_id = %owner.id()))]
    pub async fn update_article(
        &self,
        owner: &User,
        id: ArticleId,
        input: ArticleInput,
    ) -> Result<ArticleWithAuthor, ApiError> {
        let article = self
            .article_repository
            .find_owned(id, owner.id())
            .await?
            .ok_or_else(|| not_found(id))?;

        let changes = ArticleChanges {
            title: input.title.map(ArticleTitle::new).transpose()?,
            body:  input.body.map(ArticleBody::new).transpose()?,
        };
        let article = article.edited(changes, self.clock.now());

        // 検索後に削除された場合も NotFound
        if !self.article_repository.update(&article).await? {
            return Err(not_found(id));
        }

        Ok(ArticleWithAuthor::new(article, owner.clone()))
    }

    /// 自分の記事を削除する
    #[tracing::instrument(skip_all, fields(%id, user_id = %owner.id()))]
    pub async fn delete_article(&self, owner: &User, id: ArticleId) -> Result<(), ApiError> {
        if !self.article_repository.delete_owned(id, owner.id()).await? {
            return Err(not_found(id));
        }

        tracing::info!("記事を削除しました");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use blog_domain::{
        clock::FixedClock,
        user::{Email, NewUser, UserName},
    };
    use blog_infra::mock::{MockArticleRepository, MockUserRepository};
    use chrono::{DateTime, Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        sut:      ArticleUseCaseImpl,
        articles: MockArticleRepository,
        clock:    Arc<FixedClock>,
        alice:    User,
        bob:      User,
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn setup() -> Fixture {
        let users = MockUserRepository::new();
        let alice = users.add_user(NewUser {
            name:  UserName::new("Alice").unwrap(),
            email: Email::new("alice@example.com").unwrap(),
            now:   fixed_now(),
        });
        let bob = users.add_user(NewUser {
            name:  UserName::new("Bob").unwrap(),
            email: Email::new("bob@example.com").unwrap(),
            now:   fixed_now(),
        });
        let articles = MockArticleRepository::new(users);
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let sut = ArticleUseCaseImpl::new(Arc::new(articles.clone()), clock.clone());

        Fixture {
            sut,
            articles,
            clock,
            alice,
            bob,
        }
    }

    fn input(title: &str, body: &str) -> ArticleInput {
        ArticleInput {
            title: Some(title.to_string()),
            body:  Some(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_作成した記事の所有者は認証済みユーザーになる() {
        let f = setup();

        let created = f
            .sut
            .create_article(&f.alice, input("タイトル", "本文"))
            .await
            .unwrap();

        assert_eq!(created.article.user_id(), f.alice.id());
        assert_eq!(created.author, f.alice);
        assert_eq!(f.articles.count(), 1);
    }

    #[tokio::test]
    async fn test_タイトル未指定の作成はバリデーションエラー() {
        let f = setup();

        let result = f
            .sut
            .create_article(
                &f.alice,
                ArticleInput {
                    title: None,
                    body:  Some("本文".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(f.articles.count(), 0);
    }

    #[tokio::test]
    async fn test_存在しない記事の取得はnot_found() {
        let f = setup();

        let result = f.sut.get_article(ArticleId::from_i64(10000)).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_自分の記事を更新するとupdated_atが進む() {
        let f = setup();
        let created = f
            .sut
            .create_article(&f.alice, input("元のタイトル", "元の本文"))
            .await
            .unwrap();
        f.clock.advance(Duration::minutes(3));

        let updated = f
            .sut
            .update_article(
                &f.alice,
                created.article.id(),
                ArticleInput {
                    title: Some("新しいタイトル".to_string()),
                    body:  None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.article.title().as_str(), "新しいタイトル");
        assert_eq!(updated.article.body().as_str(), "元の本文");
        assert_eq!(updated.article.updated_at(), fixed_now() + Duration::minutes(3));
        let stored = f.articles.get(created.article.id()).unwrap();
        assert_eq!(stored, updated.article);
    }

    #[tokio::test]
    async fn test_他人の記事の更新はnot_foundで内容は変わらない() {
        let f = setup();
        let created = f
            .sut
            .create_article(&f.alice, input("タイトル", "本文"))
            .await
            .unwrap();

        let result = f
            .sut
            .update_article(&f.bob, created.article.id(), input("乗っ取り", "乗っ取り"))
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(
            f.articles.get(created.article.id()).unwrap(),
            created.article
        );
    }

    #[tokio::test]
    async fn test_他人の記事の更新は入力が不正でもnot_found() {
        let f = setup();
        let created = f
            .sut
            .create_article(&f.alice, input("タイトル", "本文"))
            .await
            .unwrap();

        let result = f
            .sut
            .update_article(&f.bob, created.article.id(), input("", ""))
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_自分の記事の削除で件数が1減る() {
        let f = setup();
        let created = f
            .sut
            .create_article(&f.alice, input("タイトル", "本文"))
            .await
            .unwrap();

        f.sut
            .delete_article(&f.alice, created.article.id())
            .await
            .unwrap();

        assert_eq!(f.articles.count(), 0);
    }

    #[tokio::test]
    async fn test_他人の記事の削除はnot_foundで件数は変わらない() {
        let f = setup();
        let created = f
            .sut
            .create_article(&f.alice, input("タイトル", "本文"))
            .await
            .unwrap();

        let result = f.sut.delete_article(&f.bob, created.article.id()).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(f.articles.count(), 1);
    }

    #[tokio::test]
    async fn test_一覧は作成順に返る() {
        let f = setup();
        for title in ["一つ目", "二つ目", "三つ目"] {
            f.sut
                .create_article(&f.bob, input(title, "本文"))
                .await
                .unwrap();
        }

        let articles = f.sut.list_articles().await.unwrap();

        let titles: Vec<_> = articles
            .iter()
            .map(|a| a.article.title().as_str().to_string())
            .collect();
        assert_eq!(titles, vec!["一つ目", "二つ目", "三つ目"]);
    }
}
