//! # 記事
//!
//! 記事エンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## 不変条件
//!
//! - 記事は必ず 1 人の所有者（[`UserId`]）を持つ
//! - 所有者は作成時に認証済みユーザーから設定され、以後変更されない
//! - 変更可能なフィールドは `title` と `body` のみ
//!
//! 所有者の変更手段はこの型に存在しない。[`Article::edited`] は
//! [`ArticleChanges`] で許可されたフィールドだけを受け付ける。

use chrono::{DateTime, Utc};

use crate::user::{User, UserId};

define_serial_id! {
    /// 記事 ID（DB 採番）
    pub struct ArticleId;
}

define_validated_string! {
    /// 記事タイトル（1〜255 文字、前後の空白は除去）
    pub struct ArticleTitle {
        label: "タイトル",
        max_length: 255,
    }
}

define_validated_string! {
    /// 記事本文（1〜65,535 文字、空白は保持）
    pub struct ArticleBody {
        label: "本文",
        max_length: 65_535,
        trim: false,
    }
}

/// 記事エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id:         ArticleId,
    user_id:    UserId,
    title:      ArticleTitle,
    body:       ArticleBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// 記事の新規作成パラメータ
///
/// `user_id` は認証済みユーザーから設定する。ID は INSERT 時に DB が採番する。
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub user_id: UserId,
    pub title:   ArticleTitle,
    pub body:    ArticleBody,
    pub now:     DateTime<Utc>,
}

/// 記事の DB 復元パラメータ
pub struct ArticleRecord {
    pub id:         ArticleId,
    pub user_id:    UserId,
    pub title:      ArticleTitle,
    pub body:       ArticleBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 記事の更新内容
///
/// `None` のフィールドは変更しない。
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<ArticleTitle>,
    pub body:  Option<ArticleBody>,
}

impl Article {
    /// 既存のデータから復元する
    pub fn from_db(record: ArticleRecord) -> Self {
        Self {
            id:         record.id,
            user_id:    record.user_id,
            title:      record.title,
            body:       record.body,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// 変更を適用した記事を返す
    ///
    /// 変更内容の有無にかかわらず `updated_at` は `now` に更新される。
    pub fn edited(self, changes: ArticleChanges, now: DateTime<Utc>) -> Self {
        Self {
            title: changes.title.unwrap_or(self.title),
            body: changes.body.unwrap_or(self.body),
            updated_at: now,
            ..self
        }
    }

    /// 指定ユーザーが所有者かどうか
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    // Getter メソッド

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn title(&self) -> &ArticleTitle {
        &self.title
    }

    pub fn body(&self) -> &ArticleBody {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 所有者情報付きの記事
///
/// 一覧・詳細の読み取りモデル。所有者はシリアライズ時に
/// `{id, name, email}` の要約として埋め込まれる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleWithAuthor {
    pub article: Article,
    pub author:  User,
}

impl ArticleWithAuthor {
    pub fn new(article: Article, author: User) -> Self {
        debug_assert!(article.is_owned_by(author.id()));
        Self { article, author }
    }
}
