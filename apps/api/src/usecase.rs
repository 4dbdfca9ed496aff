//! # ユースケース層
//!
//! ハンドラから呼び出されるアプリケーションロジック。
//! リポジトリと時刻プロバイダはトレイトオブジェクトで受け取る。

pub mod article;
pub mod auth;

pub use article::{ArticleInput, ArticleUseCaseImpl};
pub use auth::{AuthUseCaseImpl, IssuedToken, RegisterInput, SignInInput};
