/// DynamoDB接続設定
///
/// クライアントはプロセス起動時に一度だけ構築し、
/// 以降の呼び出しでは読み取り専用で共有する。
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;
use tracing::info;

/// ユーザーテーブル名を指定する環境変数
pub const USERS_TABLE_ENV: &str = "USERS_TABLE";

/// リージョンを上書きする環境変数
///
/// Lambdaが設定する`AWS_REGION`は参照しない。
pub const REGION_ENV: &str = "USER_API_REGION";

/// ユーザーテーブル名のデフォルト値
pub const DEFAULT_USERS_TABLE: &str = "go-serverless";

/// ユーザーテーブルのリージョン（デフォルト値）
pub const DEFAULT_REGION: &str = "sa-east-1";

/// DynamoDB設定のエラー型
#[derive(Debug, Error)]
pub enum DynamoDbConfigError {
    #[error("Invalid environment variable: {0}")]
    InvalidEnvVar(String),
}

/// テーブル名とクライアントを持つDynamoDB設定
///
/// 環境変数:
/// - USERS_TABLE: ユーザーテーブル名（省略時は`go-serverless`）
/// - USER_API_REGION: リージョン（省略時は`sa-east-1`）
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// ユーザーテーブル名
    users_table: String,
}

impl DynamoDbConfig {
    /// 環境変数からテーブル名とリージョンを読み込んでDynamoDbConfigを作成
    pub async fn from_env() -> Result<Self, DynamoDbConfigError> {
        let users_table = users_table_from_env()?;
        let region = region_from_env()?;

        Ok(Self::load(users_table, region).await)
    }

    /// 指定したテーブル名・リージョンでAWS設定を読み込んでDynamoDbConfigを作成
    ///
    /// 認証情報はaws-configのデフォルトチェーンで解決する。
    /// 失敗した呼び出しは再試行せずに呼び出し元へ返す。
    pub async fn load(users_table: String, region: String) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        info!(
            users_table = %users_table,
            region = ?aws_config.region(),
            "DynamoDB設定を読み込み"
        );

        Self {
            client: DynamoDbClient::new(&aws_config),
            users_table,
        }
    }

    /// 明示的な値で新しいDynamoDbConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, users_table: String) -> Self {
        Self {
            client,
            users_table,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// ユーザーテーブル名を取得
    pub fn users_table(&self) -> &str {
        &self.users_table
    }
}

/// 環境変数から値を取得
///
/// 未設定ならデフォルト値、空文字列ならエラー。
fn env_or_default(key: &str, default: &str) -> Result<String, DynamoDbConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => {
            Err(DynamoDbConfigError::InvalidEnvVar(key.to_string()))
        }
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

fn users_table_from_env() -> Result<String, DynamoDbConfigError> {
    env_or_default(USERS_TABLE_ENV, DEFAULT_USERS_TABLE)
}

fn region_from_env() -> Result<String, DynamoDbConfigError> {
    env_or_default(REGION_ENV, DEFAULT_REGION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user_repository::tests::offline_client;
    use serial_test::serial;

    // テストで環境変数を安全に設定/削除するヘルパー
    // 注: Rust 2024エディションでset_var/remove_varはunsafe
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn test_invalid_env_var_error_display() {
        let error = DynamoDbConfigError::InvalidEnvVar("USERS_TABLE".to_string());
        assert_eq!(error.to_string(), "Invalid environment variable: USERS_TABLE");
    }

    #[test]
    fn test_dynamodb_config_new() {
        let config = DynamoDbConfig::new(offline_client(), "test-users".to_string());

        assert_eq!(config.users_table(), "test-users");
        let _client_ref = config.client();
    }

    #[test]
    #[serial(users_table_env)]
    fn test_users_table_defaults_when_unset() {
        unsafe { remove_env(USERS_TABLE_ENV) };

        assert_eq!(users_table_from_env().unwrap(), DEFAULT_USERS_TABLE);
    }

    #[test]
    #[serial(users_table_env)]
    fn test_users_table_from_env() {
        unsafe { set_env(USERS_TABLE_ENV, "prod-users") };

        let result = users_table_from_env();

        unsafe { remove_env(USERS_TABLE_ENV) };
        assert_eq!(result.unwrap(), "prod-users");
    }

    #[test]
    #[serial(users_table_env)]
    fn test_users_table_rejects_empty_value() {
        unsafe { set_env(USERS_TABLE_ENV, "  ") };

        let result = users_table_from_env();

        unsafe { remove_env(USERS_TABLE_ENV) };
        match result.unwrap_err() {
            DynamoDbConfigError::InvalidEnvVar(var) => assert_eq!(var, USERS_TABLE_ENV),
        }
    }

    #[test]
    fn test_defaults_are_fixed_table_and_region() {
        assert_eq!(DEFAULT_USERS_TABLE, "go-serverless");
        assert_eq!(DEFAULT_REGION, "sa-east-1");
    }

    /// AWS_REGIONが設定されていてもデフォルトのリージョンを使う
    #[test]
    #[serial(region_env)]
    fn test_region_ignores_aws_region() {
        unsafe {
            remove_env(REGION_ENV);
            set_env("AWS_REGION", "us-east-1");
        }

        let result = region_from_env();

        unsafe { remove_env("AWS_REGION") };
        assert_eq!(result.unwrap(), DEFAULT_REGION);
    }

    #[test]
    #[serial(region_env)]
    fn test_region_override() {
        unsafe { set_env(REGION_ENV, "ap-northeast-1") };

        let result = region_from_env();

        unsafe { remove_env(REGION_ENV) };
        assert_eq!(result.unwrap(), "ap-northeast-1");
    }

    #[test]
    #[serial(region_env)]
    fn test_region_rejects_empty_value() {
        unsafe { set_env(REGION_ENV, "") };

        let result = region_from_env();

        unsafe { remove_env(REGION_ENV) };
        match result.unwrap_err() {
            DynamoDbConfigError::InvalidEnvVar(var) => assert_eq!(var, REGION_ENV),
        }
    }

    #[tokio::test]
    #[serial(region_env)]
    async fn test_load_uses_given_region() {
        let config = DynamoDbConfig::load(
            DEFAULT_USERS_TABLE.to_string(),
            DEFAULT_REGION.to_string(),
        )
        .await;

        assert_eq!(config.users_table(), "go-serverless");
        assert_eq!(
            config.client().config().region(),
            Some(&Region::new(DEFAULT_REGION))
        );
        assert_eq!(
            config.client().config().retry_config().map(|r| r.max_attempts()),
            Some(1)
        );
    }
}
