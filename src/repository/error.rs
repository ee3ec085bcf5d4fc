// ==========================================
// 산후조리원 디렉터리 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 构造 NotFound 错误
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_failure_is_mapped() {
        let conn = crate::db::open_in_memory_connection().unwrap();
        crate::db::init_schema(&conn).unwrap();

        let err = conn
            .execute(
                "INSERT INTO region_second_layer (name, region_first_layer_id) VALUES ('x', 42)",
                [],
            )
            .unwrap_err();

        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::ForeignKeyViolation(_)
        ));
    }

    #[test]
    fn test_other_sqlite_failure_is_query_error() {
        let conn = crate::db::open_in_memory_connection().unwrap();
        crate::db::init_schema(&conn).unwrap();

        let err = conn
            .execute("INSERT INTO center (name) VALUES ('x')", [])
            .unwrap_err();

        // NOT NULL 约束不属于外键错误
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::DatabaseQueryError(_)
        ));
    }
}
