/// DynamoDBのusersテーブルにアクセスするユーザーリポジトリ
///
/// 全件スキャンによる一覧取得と、サーバー側で生成したIDでの作成のみを提供する。
/// 更新・削除操作は存在しない。
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;
use tracing::debug;

use crate::domain::{NewUser, User};
use crate::infrastructure::id_generator::{IdGenerationError, IdGenerator, UuidV4Generator};

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserRepositoryError {
    /// ユーザーIDの生成に失敗
    #[error("Identifier generation error: {0}")]
    IdentifierGenerationError(String),

    /// DynamoDBからの読み取り（Scan）に失敗
    #[error("Store read error: {0}")]
    StoreReadError(String),

    /// DynamoDBへの書き込み（PutItem）に失敗
    #[error("Store write error: {0}")]
    StoreWriteError(String),

    /// スキャン結果のアイテムをUserに変換できない
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<IdGenerationError> for UserRepositoryError {
    fn from(err: IdGenerationError) -> Self {
        UserRepositoryError::IdentifierGenerationError(err.to_string())
    }
}

/// ユーザー永続化用トレイト
///
/// 実際のDynamoDB実装とテスト用モックを差し替えるための抽象化。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// テーブルを全件スキャンしてユーザー一覧を返す
    ///
    /// # 戻り値
    /// * 成功時は`Ok(Vec<User>)`（テーブルが空なら空のVec、順序は不定）
    /// * 失敗時は`Err(UserRepositoryError::StoreReadError)`
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// 新しいIDを生成してユーザーを作成
    ///
    /// 同名のユーザーが存在しても常に新しいレコードを書き込む。
    /// 再試行は行わない。
    ///
    /// # 戻り値
    /// * 成功時は作成した`User`
    /// * ID生成失敗時は`Err(UserRepositoryError::IdentifierGenerationError)`
    /// * 書き込み失敗時は`Err(UserRepositoryError::StoreWriteError)`
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError>;
}

/// UserRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoUserRepository<G = UuidV4Generator> {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// ユーザーテーブル名
    table_name: String,
    /// ユーザーID生成器
    id_generator: G,
}

impl DynamoUserRepository<UuidV4Generator> {
    /// 新しいDynamoUserRepositoryを作成
    ///
    /// # 引数
    /// * `client` - DynamoDBクライアント
    /// * `table_name` - ユーザーテーブルの名前
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self::with_id_generator(client, table_name, UuidV4Generator)
    }
}

impl<G: IdGenerator> DynamoUserRepository<G> {
    /// ID生成器を指定してDynamoUserRepositoryを作成
    pub fn with_id_generator(client: DynamoDbClient, table_name: String, id_generator: G) -> Self {
        Self {
            client,
            table_name,
            id_generator,
        }
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// スキャン結果のアイテムをUserに変換
    fn item_to_user(item: &HashMap<String, AttributeValue>) -> Result<User, UserRepositoryError> {
        let id = Self::string_attribute(item, "id")?;
        let name = Self::string_attribute(item, "name")?;

        Ok(User { id, name })
    }

    /// 文字列属性を取得
    ///
    /// 属性が存在しない場合は空文字列、文字列以外の型の場合はエラー。
    fn string_attribute(
        item: &HashMap<String, AttributeValue>,
        key: &str,
    ) -> Result<String, UserRepositoryError> {
        match item.get(key) {
            None => Ok(String::new()),
            Some(value) => value.as_s().cloned().map_err(|_| {
                UserRepositoryError::SerializationError(format!("{} field is not a string", key))
            }),
        }
    }
}

#[async_trait]
impl<G: IdGenerator> UserRepository for DynamoUserRepository<G> {
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        // ページネーションは行わず、1回のScan結果のみを返す
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| UserRepositoryError::StoreReadError(DisplayErrorContext(&e).to_string()))?;

        let items = result.items.unwrap_or_default();
        debug!(table = %self.table_name, count = items.len(), "ユーザーテーブルをスキャン");

        items.iter().map(Self::item_to_user).collect()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let id = self.id_generator.generate()?;
        let user = new_user.into_user(id);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(user.id.clone()))
            .item("name", AttributeValue::S(user.name.clone()))
            .send()
            .await
            .map_err(|e| UserRepositoryError::StoreWriteError(DisplayErrorContext(&e).to_string()))?;

        debug!(table = %self.table_name, user_id = %user.id, "ユーザーを作成");

        Ok(user)
    }
}
