//! # ミドルウェア
//!
//! - [`authn`] - Bearer トークンによる認証

pub mod authn;

pub use authn::{CurrentUser, require_authentication};
