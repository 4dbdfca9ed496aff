//! # Blog API サーバー
//!
//! ユーザーと記事の CRUD を提供する REST API。
//!
//! ## レイヤー構成
//!
//! ```text
//! handler ──▶ usecase ──▶ blog_infra（PostgreSQL / Redis）
//!    │           │
//!    └───────────┴──▶ blog_domain（エンティティ・値オブジェクト）
//! ```
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - State の組み立てとルーター定義
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - API エラーと HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - 認証ミドルウェア
//! - [`usecase`] - ユースケース

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
