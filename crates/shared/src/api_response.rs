//! # API レスポンスエンベロープ
//!
//! 認証 API のレスポンス形式 `{ "data": T }` を提供する。
//!
//! 記事 API は既存クライアントとの互換性のためエンベロープなしで返す。

use serde::{Deserialize, Serialize};

/// `{ "data": T }` 形式のレスポンス型
///
/// ```
/// use blog_shared::ApiResponse;
///
/// let response = ApiResponse::new("hello");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serializeでdataキーに包まれる() {
        let response = ApiResponse::new(serde_json::json!({ "id": 1 }));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "data": { "id": 1 } }));
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let response: ApiResponse<String> = serde_json::from_str(r#"{"data": "world"}"#).unwrap();

        assert_eq!(response.data, "world");
    }
}
