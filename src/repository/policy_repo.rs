// ==========================================
// 산후조리원 디렉터리 - 政策数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 对齐: policy 表（is_available 存储为 0/1）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::center::Policy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn map_policy(row: &Row) -> rusqlite::Result<Policy> {
    Ok(Policy {
        id: row.get(0)?,
        center_id: row.get(1)?,
        name: row.get(2)?,
        is_available: row.get(3)?,
    })
}

// ==========================================
// PolicyRepository - 政策仓储
// ==========================================
pub struct PolicyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PolicyRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开数据库文件创建仓储实例
    pub fn from_path(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建政策，返回新ID
    ///
    /// # 返回
    /// - Ok(id): 成功
    /// - Err(ForeignKeyViolation): 조리원 不存在
    pub fn create(&self, center_id: i64, name: &str, is_available: bool) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO policy (center_id, name, is_available) VALUES (?1, ?2, ?3)",
            params![center_id, name, is_available],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Policy>> {
        let conn = self.get_conn()?;
        let policy = conn
            .query_row(
                "SELECT id, center_id, name, is_available FROM policy WHERE id = ?1",
                params![id],
                map_policy,
            )
            .optional()?;
        Ok(policy)
    }

    /// 查询 조리원 的全部政策（按ID升序）
    pub fn find_by_center(&self, center_id: i64) -> RepositoryResult<Vec<Policy>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, center_id, name, is_available
            FROM policy
            WHERE center_id = ?1
            ORDER BY id ASC
            "#,
        )?;
        let policies = stmt
            .query_map(params![center_id], map_policy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(policies)
    }

    /// 查询 조리원 的可用政策（is_available = true）
    pub fn find_available_by_center(&self, center_id: i64) -> RepositoryResult<Vec<Policy>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, center_id, name, is_available
            FROM policy
            WHERE center_id = ?1 AND is_available = 1
            ORDER BY id ASC
            "#,
        )?;
        let policies = stmt
            .query_map(params![center_id], map_policy)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(policies)
    }

    /// 更新可用标志
    pub fn set_availability(&self, id: i64, is_available: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE policy SET is_available = ?2 WHERE id = ?1",
            params![id, is_available],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Policy", id));
        }
        Ok(())
    }

    /// 更新名称
    pub fn update_name(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE policy SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Policy", id));
        }
        Ok(())
    }

    /// 删除政策
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM policy WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Policy", id));
        }
        Ok(())
    }

    /// 统计 조리원 的政策数量
    pub fn count_by_center(&self, center_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row(
            "SELECT COUNT(*) FROM policy WHERE center_id = ?1",
            params![center_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
