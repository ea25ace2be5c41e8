/// ルーティングモード設定
///
/// `/user` ルートを定型レスポンスで返すか、ユーザーテーブルに接続するかを
/// 環境変数`USER_API_ROUTE_MODE`で切り替える。
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

/// ルーティングモードを指定する環境変数
pub const ROUTE_MODE_ENV: &str = "USER_API_ROUTE_MODE";

/// ルーティングモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteMode {
    /// GET/POST /user は定型の`{message, route}`を返し、ストアにはアクセスしない
    #[default]
    Canned,
    /// GET /user は一覧取得、POST /user はユーザー作成にルーティングする
    Store,
}

/// ルーティングモード文字列のパースエラー
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown route mode: {0}")]
pub struct UnknownRouteMode(pub String);

impl FromStr for RouteMode {
    type Err = UnknownRouteMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canned" => Ok(RouteMode::Canned),
            "store" => Ok(RouteMode::Store),
            _ => Err(UnknownRouteMode(s.to_string())),
        }
    }
}

/// ルーティング設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteConfig {
    mode: RouteMode,
}

impl RouteConfig {
    pub fn new(mode: RouteMode) -> Self {
        Self { mode }
    }

    /// 環境変数からルーティング設定を読み込む
    ///
    /// 未設定または不正な値の場合は`RouteMode::Canned`を使用する。
    pub fn from_env() -> Self {
        let mode = match std::env::var(ROUTE_MODE_ENV) {
            Ok(value) => match value.parse::<RouteMode>() {
                Ok(mode) => {
                    info!(key = ROUTE_MODE_ENV, mode = ?mode, "Environment variable loaded");
                    mode
                }
                Err(err) => {
                    warn!(
                        key = ROUTE_MODE_ENV,
                        value = %value,
                        error = %err,
                        "Environment variable parse error, using default"
                    );
                    RouteMode::default()
                }
            },
            Err(_) => RouteMode::default(),
        };

        Self { mode }
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }
}
