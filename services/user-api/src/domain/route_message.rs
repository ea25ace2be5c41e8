// /user ルートの定型レスポンスボディ
//
// `{"message": ..., "route": ...}` 形式のJSONを表す。

use serde::Serialize;

/// 定型レスポンスのメッセージ（固定値）
pub const ROUTE_MESSAGE: &str =
    "Hello from the user API Lambda! This is our first serverless function GET ROUTE.";

/// ルート応答ボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMessage {
    pub message: String,
    /// `"<method> <path>"` 形式
    pub route: String,
}

impl RouteMessage {
    /// メソッドとパスからルート応答を作成
    pub fn for_route(method: &str, path: &str) -> Self {
        Self {
            message: ROUTE_MESSAGE.to_string(),
            route: format!("{} {}", method, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_route_joins_method_and_path_with_space() {
        let msg = RouteMessage::for_route("GET", "/user");

        assert_eq!(msg.route, "GET /user");
        assert!(!msg.message.is_empty());
    }

    #[test]
    fn test_serializes_message_and_route_only() {
        let json = serde_json::to_value(RouteMessage::for_route("POST", "/user")).unwrap();

        assert_eq!(json["message"], ROUTE_MESSAGE);
        assert_eq!(json["route"], "POST /user");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
