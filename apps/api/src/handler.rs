//! # HTTP リクエストハンドラ
//!
//! 各ハンドラはサブモジュールに配置し、ここで re-export する。
//! ハンドラは DTO との変換のみを担い、処理はユースケースに委譲する。

pub mod article;
pub mod auth;
pub mod health;

pub use article::{
    ArticleState,
    create_article,
    delete_article,
    get_article,
    list_articles,
    update_article,
};
pub use auth::{AuthState, register, sign_in, sign_out, validate_token};
pub use health::{
    PostgresCheck,
    ReadinessCheck,
    ReadinessState,
    RedisCheck,
    health_check,
    readiness_check,
};
