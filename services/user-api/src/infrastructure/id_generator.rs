/// ユーザーID生成
///
/// OSの乱数ソースから16バイトを取得し、UUID v4文字列を生成する。
/// 乱数ソースが利用できない場合はゼロ値のIDを返さずエラーにする。
use thiserror::Error;
use uuid::Builder;

/// ID生成のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdGenerationError {
    /// 乱数ソースから値を取得できなかった
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

/// ユーザーID生成用トレイト
///
/// 実際の乱数ソースとテスト用の失敗する実装を差し替えるための抽象化。
pub trait IdGenerator: Send + Sync {
    /// 新しい一意なIDを生成
    fn generate(&self) -> Result<String, IdGenerationError>;
}

/// 乱数ベースのUUID v4生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> Result<String, IdGenerationError> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| IdGenerationError::RandomSourceUnavailable(e.to_string()))?;

        // バージョン・バリアントビットはBuilderが設定する
        Ok(Builder::from_random_bytes(bytes).into_uuid().to_string())
    }
}
