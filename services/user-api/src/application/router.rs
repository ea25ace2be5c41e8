// /user ルーター
//
// リクエストのパスとメソッド（大文字小文字を区別）でディスパッチし、
// JSONレスポンスまたは405レスポンスを返す。
// RouteMode::Storeの場合のみユーザーリポジトリにアクセスする。

use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{NewUser, RouteMessage};
use crate::infrastructure::{RouteMode, UserRepository};

/// ルーティング対象のパス
pub const USER_PATH: &str = "/user";

/// 500レスポンスのボディ
const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// ルーター内部のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouterError {
    /// レスポンスボディのJSONシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// ルーターへの入力
///
/// ルーティングに必要なメソッド・パスとPOST用のボディ（生バイト列）のみを保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub body: Option<&'a [u8]>,
}

impl<'a> RouteRequest<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            body: None,
        }
    }

    pub fn with_body(mut self, body: &'a str) -> Self {
        self.body = Some(body.as_bytes());
        self
    }

    /// Lambda HTTPリクエストから変換
    ///
    /// API Gatewayが受け取った生のパス（ステージ名を含まない）を優先し、
    /// 取得できない場合はURIのパスを使用する。
    pub fn from_http(request: &'a Request) -> Self {
        let path = match request.raw_http_path() {
            "" => request.uri().path(),
            raw => raw,
        };

        let bytes: &[u8] = request.body();
        let body = Some(bytes).filter(|b| !b.is_empty());

        Self {
            method: request.method().as_str(),
            path,
            body,
        }
    }
}

/// /user ルーター
pub struct Router<R>
where
    R: UserRepository,
{
    /// ユーザーリポジトリ（RouteMode::Storeでのみ使用）
    repo: R,
    /// ルーティングモード
    mode: RouteMode,
}

impl<R> Router<R>
where
    R: UserRepository,
{
    /// 新しいRouterを作成
    pub fn new(repo: R, mode: RouteMode) -> Self {
        Self { repo, mode }
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    /// リクエストを処理してレスポンスを返す
    ///
    /// | path    | method | 結果                                    |
    /// |---------|--------|-----------------------------------------|
    /// | `/user` | `GET`  | 200 `{message, route}`（Store: 一覧）   |
    /// | `/user` | `POST` | 200 `{message, route}`（Store: 201作成）|
    /// | その他  | その他 | 405 `"<method>\n <path>"`               |
    pub async fn route(&self, request: &RouteRequest<'_>) -> Response<Body> {
        let result = self.dispatch(request).await;
        Self::into_response(result, request)
    }

    async fn dispatch(&self, request: &RouteRequest<'_>) -> Result<Response<Body>, RouterError> {
        match (request.path, request.method, self.mode) {
            (USER_PATH, "GET" | "POST", RouteMode::Canned) => {
                json_response(StatusCode::OK, &RouteMessage::for_route(request.method, request.path))
            }
            (USER_PATH, "GET", RouteMode::Store) => self.list_users().await,
            (USER_PATH, "POST", RouteMode::Store) => self.create_user(request).await,
            _ => Ok(method_not_allowed_response(request)),
        }
    }

    async fn list_users(&self) -> Result<Response<Body>, RouterError> {
        match self.repo.list().await {
            Ok(users) => {
                info!(count = users.len(), "ユーザー一覧を取得");
                json_response(StatusCode::OK, &users)
            }
            Err(err) => {
                error!(error = %err, "ユーザー一覧の取得に失敗");
                Ok(internal_error_response())
            }
        }
    }

    async fn create_user(&self, request: &RouteRequest<'_>) -> Result<Response<Body>, RouterError> {
        let Some(body) = request.body else {
            return Ok(text_response(
                StatusCode::BAD_REQUEST,
                "Request body is required".to_string(),
            ));
        };

        let new_user = match serde_json::from_slice::<NewUser>(body) {
            Ok(new_user) => new_user,
            Err(err) => {
                info!(error = %err, "不正なリクエストボディ");
                return Ok(text_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid request body: {}", err),
                ));
            }
        };

        match self.repo.create(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, "ユーザーを作成");
                json_response(StatusCode::CREATED, &user)
            }
            Err(err) => {
                error!(error = %err, "ユーザーの作成に失敗");
                Ok(internal_error_response())
            }
        }
    }

    /// ルーターのエラーを500レスポンスに変換
    fn into_response(
        result: Result<Response<Body>, RouterError>,
        request: &RouteRequest<'_>,
    ) -> Response<Body> {
        match result {
            Ok(response) => response,
            Err(err) => {
                error!(
                    error = %err,
                    method = request.method,
                    path = request.path,
                    "レスポンスの生成に失敗"
                );
                internal_error_response()
            }
        }
    }
}

/// JSONレスポンスを生成
fn json_response<T>(status: StatusCode, value: &T) -> Result<Response<Body>, RouterError>
where
    T: Serialize + ?Sized,
{
    let json =
        serde_json::to_string(value).map_err(|e| RouterError::SerializationError(e.to_string()))?;

    let mut response = Response::new(Body::Text(json));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(response)
}

/// プレーンテキストのレスポンスを生成
fn text_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::Text(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// 405レスポンスを生成
///
/// ボディは`"<method>\n <path>"`（改行の後に半角スペース1つ）。ヘッダーは付与しない。
pub fn method_not_allowed_response(request: &RouteRequest<'_>) -> Response<Body> {
    let mut response = Response::new(Body::Text(format!(
        "{}\n {}",
        request.method, request.path
    )));
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    response
}

/// 500レスポンスを生成
pub fn internal_error_response() -> Response<Body> {
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_BODY.to_string(),
    )
}
