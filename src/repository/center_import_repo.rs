// ==========================================
// 산후조리원 디렉터리 - 조리원目录导入仓储
// ==========================================
// 职责: 在单个事务内写入 地区路径(get-or-create) + 조리원 + 政策
// 红线: 任意一行失败则整批回滚
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// 导入行（已完成字段映射与清洗）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterImportRow {
    pub row_no: usize,
    pub region_first_layer: String,
    pub region_second_layer: String,
    pub region_third_layer: String,
    pub center: String,
    pub policies: Vec<(String, bool)>,
}

/// 导入写入统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    pub region_first_layers_created: usize,
    pub region_second_layers_created: usize,
    pub region_third_layers_created: usize,
    pub centers_created: usize,
    pub policies_created: usize,
}

// ==========================================
// CenterImportRepository
// ==========================================
pub struct CenterImportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CenterImportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn from_path(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量导入
    ///
    /// 同一父级下同名地区视为同一地区（复用已有行，取最小ID）；조리원 总是新建。
    pub fn import_rows(&self, rows: &[CenterImportRow]) -> RepositoryResult<ImportCounts> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut counts = ImportCounts::default();

        for row in rows {
            if let Err(e) = import_one(&tx, row, &mut counts) {
                tracing::warn!(row = row.row_no, error = %e, "导入行写入失败，整批回滚");
                return Err(e);
            }
        }

        tx.commit()?;
        Ok(counts)
    }
}

fn import_one(
    tx: &Connection,
    row: &CenterImportRow,
    counts: &mut ImportCounts,
) -> RepositoryResult<()> {
    let first_id = get_or_create(
        tx,
        "SELECT id FROM region_first_layer WHERE name = ?1 ORDER BY id ASC LIMIT 1",
        "INSERT INTO region_first_layer (name) VALUES (?1)",
        &row.region_first_layer,
        None,
        &mut counts.region_first_layers_created,
    )?;

    let second_id = get_or_create(
        tx,
        "SELECT id FROM region_second_layer WHERE name = ?1 AND region_first_layer_id = ?2 ORDER BY id ASC LIMIT 1",
        "INSERT INTO region_second_layer (name, region_first_layer_id) VALUES (?1, ?2)",
        &row.region_second_layer,
        Some(first_id),
        &mut counts.region_second_layers_created,
    )?;

    let third_id = get_or_create(
        tx,
        "SELECT id FROM region_third_layer WHERE name = ?1 AND region_second_layer_id = ?2 ORDER BY id ASC LIMIT 1",
        "INSERT INTO region_third_layer (name, region_second_layer_id) VALUES (?1, ?2)",
        &row.region_third_layer,
        Some(second_id),
        &mut counts.region_third_layers_created,
    )?;

    tx.execute(
        "INSERT INTO center (name, region_third_layer_id) VALUES (?1, ?2)",
        params![row.center, third_id],
    )?;
    let center_id = tx.last_insert_rowid();
    counts.centers_created += 1;

    for (policy_name, is_available) in &row.policies {
        tx.execute(
            "INSERT INTO policy (center_id, name, is_available) VALUES (?1, ?2, ?3)",
            params![center_id, policy_name, is_available],
        )?;
        counts.policies_created += 1;
    }

    Ok(())
}

fn get_or_create(
    conn: &Connection,
    select_sql: &str,
    insert_sql: &str,
    name: &str,
    parent_id: Option<i64>,
    created: &mut usize,
) -> RepositoryResult<i64> {
    let existing: Option<i64> = match parent_id {
        Some(parent) => conn
            .query_row(select_sql, params![name, parent], |row| row.get(0))
            .optional()?,
        None => conn
            .query_row(select_sql, params![name], |row| row.get(0))
            .optional()?,
    };

    if let Some(id) = existing {
        return Ok(id);
    }

    match parent_id {
        Some(parent) => conn.execute(insert_sql, params![name, parent])?,
        None => conn.execute(insert_sql, params![name])?,
    };
    *created += 1;
    Ok(conn.last_insert_rowid())
}
