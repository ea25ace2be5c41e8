/// ユーザーAPI Lambdaエントリポイント
///
/// API Gateway経由のHTTPリクエストを受け取り、`/user` ルーターに委譲する。
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use user_api::application::{internal_error_response, RouteRequest, Router};
use user_api::infrastructure::config::{DEFAULT_REGION, DEFAULT_USERS_TABLE};
use user_api::infrastructure::{
    init_logging, DynamoDbConfig, DynamoDbConfigError, DynamoUserRepository, RouteConfig,
    RouteMode, UserRepository,
};

/// Routerの静的インスタンス
///
/// DynamoDBクライアントはプロセス内で一度だけ構築し、
/// warm start時の呼び出しでは読み取り専用で共有する。
static ROUTER: OnceCell<Router<DynamoUserRepository>> = OnceCell::const_new();

/// Routerを取得（初期化されていなければ初期化）
async fn get_router() -> Result<&'static Router<DynamoUserRepository>, DynamoDbConfigError> {
    ROUTER
        .get_or_try_init(|| build_router(RouteConfig::from_env()))
        .await
}

/// ルーティング設定に応じてRouterを構築
///
/// DynamoDB設定の誤りはStoreモードでのみエラーとする。
/// Cannedモードではストアを使わないため、警告を出してデフォルト値で続行する。
async fn build_router(
    route_config: RouteConfig,
) -> Result<Router<DynamoUserRepository>, DynamoDbConfigError> {
    let config = match DynamoDbConfig::from_env().await {
        Ok(config) => config,
        Err(err) if route_config.mode() == RouteMode::Canned => {
            warn!(error = %err, "DynamoDB設定が不正なためデフォルト値を使用");
            DynamoDbConfig::load(DEFAULT_USERS_TABLE.to_string(), DEFAULT_REGION.to_string()).await
        }
        Err(err) => return Err(err),
    };

    let repo = DynamoUserRepository::new(config.client().clone(), config.users_table().to_string());

    info!(mode = ?route_config.mode(), "Routerを初期化");
    Ok(Router::new(repo, route_config.mode()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("ユーザーAPI Lambda関数を初期化");

    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let router = match get_router().await {
        Ok(router) => router,
        Err(err) => {
            error!(error = %err, "Routerの初期化に失敗");
            return Ok(internal_error_response());
        }
    };

    Ok(handle_request(router, &request).await)
}

/// 1リクエストを処理
async fn handle_request<R>(router: &Router<R>, request: &Request) -> Response<Body>
where
    R: UserRepository,
{
    let route_request = RouteRequest::from_http(request);

    info!(
        method = route_request.method,
        path = route_request.path,
        "リクエスト受信"
    );

    let response = router.route(&route_request).await;

    info!(status = response.status().as_u16(), "レスポンス送信");

    response
}
