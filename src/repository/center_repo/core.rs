use super::query::CenterQuery;
use crate::db::open_sqlite_connection;
use crate::domain::center::Center;
use crate::domain::region::{RegionFirstLayer, RegionPath, RegionSecondLayer, RegionThirdLayer};
use crate::domain::types::RegionLayer;
use crate::repository::cascade::{center_scope_sql, delete_with_cascade, CascadeSummary, CascadeTarget};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::build_placeholders;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

fn map_center(row: &Row) -> rusqlite::Result<Center> {
    Ok(Center {
        id: row.get(0)?,
        name: row.get(1)?,
        region_third_layer_id: row.get(2)?,
    })
}

// ==========================================
// CenterRepository - 조리원仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct CenterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CenterRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开数据库文件创建仓储实例
    pub fn from_path(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 创建 조리원，返回新ID
    ///
    /// # 返回
    /// - `Ok(id)`: 成功
    /// - `Err(ForeignKeyViolation)`: 三级地区不存在
    pub fn create(&self, name: &str, region_third_layer_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO center (name, region_third_layer_id) VALUES (?1, ?2)",
            params![name, region_third_layer_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新名称
    pub fn update_name(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE center SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Center", id));
        }
        Ok(())
    }

    /// 迁移到另一个三级地区
    pub fn move_to_region(&self, id: i64, region_third_layer_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE center SET region_third_layer_id = ?2 WHERE id = ?1",
            params![id, region_third_layer_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Center", id));
        }
        Ok(())
    }

    /// 删除 조리원（级联删除政策）
    pub fn delete(&self, id: i64) -> RepositoryResult<CascadeSummary> {
        let conn = self.get_conn()?;
        delete_with_cascade(&conn, CascadeTarget::Center, id)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Center>> {
        let conn = self.get_conn()?;
        let center = conn
            .query_row(
                "SELECT id, name, region_third_layer_id FROM center WHERE id = ?1",
                params![id],
                map_center,
            )
            .optional()?;
        Ok(center)
    }

    /// 查询全部 조리원（按ID升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Center>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, region_third_layer_id FROM center ORDER BY id ASC")?;
        let centers = stmt
            .query_map([], map_center)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(centers)
    }

    /// 查询某个地区下的全部 조리원
    ///
    /// 一级/二级地区的结果是其下所有三级地区 조리원 的并集。
    /// 地区不存在或没有 조리원 时返回空列表。
    pub fn find_by_region(&self, layer: RegionLayer, region_id: i64) -> RepositoryResult<Vec<Center>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT c.id, c.name, c.region_third_layer_id {} ORDER BY c.id ASC",
            center_scope_sql(layer)
        );
        let mut stmt = conn.prepare(&sql)?;
        let centers = stmt
            .query_map(params![region_id], map_center)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(centers)
    }

    /// 查询属于任一指定三级地区的 조리원（IN 过滤）
    pub fn find_by_region_third_layers(&self, region_third_layer_ids: &[i64]) -> RepositoryResult<Vec<Center>> {
        if region_third_layer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, name, region_third_layer_id FROM center \
             WHERE region_third_layer_id IN ({}) ORDER BY id ASC",
            build_placeholders(region_third_layer_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let centers = stmt
            .query_map(params_from_iter(region_third_layer_ids.iter()), map_center)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(centers)
    }

    /// 统计某个地区下的 조리원 数量
    pub fn count_by_region(&self, layer: RegionLayer, region_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) {}", center_scope_sql(layer));
        let n = conn.query_row(&sql, params![region_id], |row| row.get(0))?;
        Ok(n)
    }

    /// 按三级地区分组统计 조리원 数量（没有 조리원 的地区不出现在结果中）
    pub fn count_grouped_by_third_layer(&self) -> RepositoryResult<HashMap<i64, i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT region_third_layer_id, COUNT(*) FROM center GROUP BY region_third_layer_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

        let mut counts = HashMap::new();
        for row in rows {
            let (region_id, n) = row?;
            counts.insert(region_id, n);
        }
        Ok(counts)
    }

    /// 组合条件查询
    pub fn query(&self, query: &CenterQuery) -> RepositoryResult<Vec<Center>> {
        let (sql, values) = query.to_sql();
        tracing::debug!(sql = %sql, "center query");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let centers = stmt
            .query_map(params_from_iter(values), map_center)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(centers)
    }

    /// 查询 조리원 所在的完整地区路径
    pub fn find_region_path(&self, center_id: i64) -> RepositoryResult<Option<RegionPath>> {
        let conn = self.get_conn()?;
        let path = conn
            .query_row(
                r#"
                SELECT
                    f.id, f.name,
                    s.id, s.name, s.region_first_layer_id,
                    t.id, t.name, t.region_second_layer_id
                FROM center c
                JOIN region_third_layer t ON t.id = c.region_third_layer_id
                JOIN region_second_layer s ON s.id = t.region_second_layer_id
                JOIN region_first_layer f ON f.id = s.region_first_layer_id
                WHERE c.id = ?1
                "#,
                params![center_id],
                |row| {
                    Ok(RegionPath {
                        first: RegionFirstLayer {
                            id: row.get(0)?,
                            name: row.get(1)?,
                        },
                        second: RegionSecondLayer {
                            id: row.get(2)?,
                            name: row.get(3)?,
                            region_first_layer_id: row.get(4)?,
                        },
                        third: RegionThirdLayer {
                            id: row.get(5)?,
                            name: row.get(6)?,
                            region_second_layer_id: row.get(7)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(path)
    }

    /// 조리원 总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM center", [], |row| row.get(0))?;
        Ok(n)
    }
}
