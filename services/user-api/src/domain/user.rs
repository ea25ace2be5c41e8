// ユーザーエンティティ
//
// usersテーブルに保存される単一エンティティを定義する。
// idはサーバー側で生成され、呼び出し元から受け取ることはない。

use serde::{Deserialize, Serialize};

/// 保存済みのユーザーレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// サーバー側で生成したUUID v4文字列（作成後は不変）
    pub id: String,
    /// 呼び出し元が指定した名前（一意性・形式の制約なし）
    pub name: String,
}

/// ユーザー作成リクエスト
///
/// 呼び出し元が指定できるのは`name`のみ。
/// リクエストボディに`id`が含まれていても無視される。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 生成済みIDを割り当てて保存用のUserに変換
    pub fn into_user(self, id: String) -> User {
        User {
            id,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_id_and_name() {
        let user = User {
            id: "0b9c2f3e-6a51-4f0b-9d7c-1f7e0e2a9a10".to_string(),
            name: "alice".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "0b9c2f3e-6a51-4f0b-9d7c-1f7e0e2a9a10");
        assert_eq!(json["name"], "alice");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    /// リクエストボディのidは無視される
    #[test]
    fn test_new_user_ignores_caller_supplied_id() {
        let new_user: NewUser =
            serde_json::from_str(r#"{"id":"caller-chosen","name":"alice"}"#).unwrap();

        assert_eq!(new_user, NewUser::new("alice"));
    }

    #[test]
    fn test_new_user_requires_string_name() {
        assert!(serde_json::from_str::<NewUser>(r#"{}"#).is_err());
        assert!(serde_json::from_str::<NewUser>(r#"{"name":42}"#).is_err());
    }

    #[test]
    fn test_into_user_assigns_generated_id() {
        let user = NewUser::new("bob").into_user("generated-id".to_string());

        assert_eq!(user.id, "generated-id");
        assert_eq!(user.name, "bob");
    }
}
