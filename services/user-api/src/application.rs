// アプリケーション層モジュール
pub mod router;

// 再エクスポート
pub use router::{internal_error_response, RouteRequest, Router, RouterError, USER_PATH};
