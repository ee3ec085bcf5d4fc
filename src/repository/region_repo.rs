// ==========================================
// 산후조리원 디렉터리 - 地区数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 对齐: region_first_layer / region_second_layer / region_third_layer 表
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::region::{RegionFirstLayer, RegionSecondLayer, RegionThirdLayer};
use crate::domain::types::RegionLayer;
use crate::repository::cascade::{delete_with_cascade, CascadeSummary, CascadeTarget};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

fn map_first_layer(row: &Row) -> rusqlite::Result<RegionFirstLayer> {
    Ok(RegionFirstLayer {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn map_second_layer(row: &Row) -> rusqlite::Result<RegionSecondLayer> {
    Ok(RegionSecondLayer {
        id: row.get(0)?,
        name: row.get(1)?,
        region_first_layer_id: row.get(2)?,
    })
}

fn map_third_layer(row: &Row) -> rusqlite::Result<RegionThirdLayer> {
    Ok(RegionThirdLayer {
        id: row.get(0)?,
        name: row.get(1)?,
        region_second_layer_id: row.get(2)?,
    })
}

// ==========================================
// RegionFirstLayerRepository - 一级地区仓储
// ==========================================
pub struct RegionFirstLayerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RegionFirstLayerRepository {
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
        lock(&self.conn)
    }

    /// 创建一级地区，返回新ID
    pub fn create(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO region_first_layer (name) VALUES (?1)",
            params![name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RegionFirstLayer>> {
        let conn = self.get_conn()?;
        let region = conn
            .query_row(
                "SELECT id, name FROM region_first_layer WHERE id = ?1",
                params![id],
                map_first_layer,
            )
            .optional()?;
        Ok(region)
    }

    /// 查询全部一级地区（按ID升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<RegionFirstLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM region_first_layer ORDER BY id ASC")?;
        let regions = stmt
            .query_map([], map_first_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 按名称查询（名称不唯一）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<RegionFirstLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name FROM region_first_layer WHERE name = ?1 ORDER BY id ASC",
        )?;
        let regions = stmt
            .query_map(params![name], map_first_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 更新名称
    pub fn update_name(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE region_first_layer SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("RegionFirstLayer", id));
        }
        Ok(())
    }

    /// 删除一级地区（级联删除下属所有地区、조리원、政策）
    pub fn delete(&self, id: i64) -> RepositoryResult<CascadeSummary> {
        let conn = self.get_conn()?;
        delete_with_cascade(&conn, CascadeTarget::Region(RegionLayer::First), id)
    }

    /// 一级地区总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM region_first_layer", [], |row| row.get(0))?;
        Ok(n)
    }
}

// ==========================================
// RegionSecondLayerRepository - 二级地区仓储
// ==========================================
pub struct RegionSecondLayerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RegionSecondLayerRepository {
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
        lock(&self.conn)
    }

    /// 创建二级地区，返回新ID
    ///
    /// 父级不存在时返回 ForeignKeyViolation
    pub fn create(&self, region_first_layer_id: i64, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO region_second_layer (name, region_first_layer_id) VALUES (?1, ?2)",
            params![name, region_first_layer_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RegionSecondLayer>> {
        let conn = self.get_conn()?;
        let region = conn
            .query_row(
                "SELECT id, name, region_first_layer_id FROM region_second_layer WHERE id = ?1",
                params![id],
                map_second_layer,
            )
            .optional()?;
        Ok(region)
    }

    /// 查询全部二级地区（按ID升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<RegionSecondLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, region_first_layer_id FROM region_second_layer ORDER BY id ASC",
        )?;
        let regions = stmt
            .query_map([], map_second_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 按名称查询（名称不唯一）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<RegionSecondLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, region_first_layer_id
            FROM region_second_layer
            WHERE name = ?1
            ORDER BY id ASC
            "#,
        )?;
        let regions = stmt
            .query_map(params![name], map_second_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 查询一级地区下的二级地区
    pub fn find_by_first_layer(
        &self,
        region_first_layer_id: i64,
    ) -> RepositoryResult<Vec<RegionSecondLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, region_first_layer_id
            FROM region_second_layer
            WHERE region_first_layer_id = ?1
            ORDER BY id ASC
            "#,
        )?;
        let regions = stmt
            .query_map(params![region_first_layer_id], map_second_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 更新名称
    pub fn update_name(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE region_second_layer SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("RegionSecondLayer", id));
        }
        Ok(())
    }

    /// 挂到另一个一级地区下
    pub fn move_to_first_layer(&self, id: i64, region_first_layer_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE region_second_layer SET region_first_layer_id = ?2 WHERE id = ?1",
            params![id, region_first_layer_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("RegionSecondLayer", id));
        }
        Ok(())
    }

    /// 删除二级地区（级联）
    pub fn delete(&self, id: i64) -> RepositoryResult<CascadeSummary> {
        let conn = self.get_conn()?;
        delete_with_cascade(&conn, CascadeTarget::Region(RegionLayer::Second), id)
    }

    /// 二级地区总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM region_second_layer", [], |row| row.get(0))?;
        Ok(n)
    }
}

// ==========================================
// RegionThirdLayerRepository - 三级地区仓储
// ==========================================
pub struct RegionThirdLayerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RegionThirdLayerRepository {
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
        lock(&self.conn)
    }

    /// 创建三级地区，返回新ID
    pub fn create(&self, region_second_layer_id: i64, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO region_third_layer (name, region_second_layer_id) VALUES (?1, ?2)",
            params![name, region_second_layer_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<RegionThirdLayer>> {
        let conn = self.get_conn()?;
        let region = conn
            .query_row(
                "SELECT id, name, region_second_layer_id FROM region_third_layer WHERE id = ?1",
                params![id],
                map_third_layer,
            )
            .optional()?;
        Ok(region)
    }

    /// 查询全部三级地区（按ID升序）
    pub fn find_all(&self) -> RepositoryResult<Vec<RegionThirdLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, region_second_layer_id FROM region_third_layer ORDER BY id ASC",
        )?;
        let regions = stmt
            .query_map([], map_third_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 按名称查询（名称不唯一）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<RegionThirdLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, region_second_layer_id
            FROM region_third_layer
            WHERE name = ?1
            ORDER BY id ASC
            "#,
        )?;
        let regions = stmt
            .query_map(params![name], map_third_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 查询二级地区下的三级地区
    pub fn find_by_second_layer(
        &self,
        region_second_layer_id: i64,
    ) -> RepositoryResult<Vec<RegionThirdLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, region_second_layer_id
            FROM region_third_layer
            WHERE region_second_layer_id = ?1
            ORDER BY id ASC
            "#,
        )?;
        let regions = stmt
            .query_map(params![region_second_layer_id], map_third_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 查询一级地区下（经由二级地区）的全部三级地区
    pub fn find_by_first_layer(
        &self,
        region_first_layer_id: i64,
    ) -> RepositoryResult<Vec<RegionThirdLayer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.region_second_layer_id
            FROM region_third_layer t
            JOIN region_second_layer s ON s.id = t.region_second_layer_id
            WHERE s.region_first_layer_id = ?1
            ORDER BY t.id ASC
            "#,
        )?;
        let regions = stmt
            .query_map(params![region_first_layer_id], map_third_layer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// 更新名称
    pub fn update_name(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE region_third_layer SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("RegionThirdLayer", id));
        }
        Ok(())
    }

    /// 挂到另一个二级地区下
    pub fn move_to_second_layer(
        &self,
        id: i64,
        region_second_layer_id: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE region_third_layer SET region_second_layer_id = ?2 WHERE id = ?1",
            params![id, region_second_layer_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("RegionThirdLayer", id));
        }
        Ok(())
    }

    /// 删除三级地区（级联删除 조리원 与政策）
    pub fn delete(&self, id: i64) -> RepositoryResult<CascadeSummary> {
        let conn = self.get_conn()?;
        delete_with_cascade(&conn, CascadeTarget::Region(RegionLayer::Third), id)
    }

    /// 三级地区总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM region_third_layer", [], |row| row.get(0))?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = crate::db::open_in_memory_connection().unwrap();
        crate::db::init_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    #[test]
    fn test_create_and_find_first_layer() {
        let repo = RegionFirstLayerRepository::new(setup_test_db());

        let id = repo.create("서울특별시").unwrap();
        let found = repo.find_by_id(id).unwrap().unwrap();

        assert_eq!(found.name, "서울특별시");
        assert!(repo.find_by_id(id + 100).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_find_all_is_ordered_by_id() {
        let repo = RegionFirstLayerRepository::new(setup_test_db());
        let a = repo.create("RFL_0").unwrap();
        let b = repo.create("RFL_1").unwrap();

        let ids: Vec<i64> = repo.find_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_second_layer_requires_parent() {
        let repo = RegionSecondLayerRepository::new(setup_test_db());
        let result = repo.create(999, "강남구");
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    fn test_children_lookup() {
        let conn = setup_test_db();
        let first_repo = RegionFirstLayerRepository::new(conn.clone());
        let second_repo = RegionSecondLayerRepository::new(conn.clone());
        let third_repo = RegionThirdLayerRepository::new(conn);

        let rfl = first_repo.create("RFL_0").unwrap();
        let rsl_0 = second_repo.create(rfl, "RSL_0").unwrap();
        let rsl_1 = second_repo.create(rfl, "RSL_1").unwrap();
        let rtl_0 = third_repo.create(rsl_0, "RTL_0").unwrap();
        let rtl_1 = third_repo.create(rsl_1, "RTL_1").unwrap();

        let seconds = second_repo.find_by_first_layer(rfl).unwrap();
        assert_eq!(seconds.len(), 2);

        let thirds = third_repo.find_by_second_layer(rsl_0).unwrap();
        assert_eq!(thirds.iter().map(|r| r.id).collect::<Vec<_>>(), vec![rtl_0]);

        let all_thirds = third_repo.find_by_first_layer(rfl).unwrap();
        assert_eq!(
            all_thirds.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![rtl_0, rtl_1]
        );
    }

    #[test]
    fn test_update_name_missing_row() {
        let repo = RegionThirdLayerRepository::new(setup_test_db());
        assert!(matches!(
            repo.update_name(1, "x"),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_move_third_layer() {
        let conn = setup_test_db();
        let first_repo = RegionFirstLayerRepository::new(conn.clone());
        let second_repo = RegionSecondLayerRepository::new(conn.clone());
        let third_repo = RegionThirdLayerRepository::new(conn);

        let rfl = first_repo.create("RFL").unwrap();
        let from = second_repo.create(rfl, "from").unwrap();
        let to = second_repo.create(rfl, "to").unwrap();
        let rtl = third_repo.create(from, "RTL").unwrap();

        third_repo.move_to_second_layer(rtl, to).unwrap();

        assert!(third_repo.find_by_second_layer(from).unwrap().is_empty());
        assert_eq!(third_repo.find_by_second_layer(to).unwrap().len(), 1);
        assert!(matches!(
            third_repo.move_to_second_layer(rtl, 999),
            Err(RepositoryError::ForeignKeyViolation(_))
        ));
    }

    #[test]
    fn test_delete_first_layer_cascades() {
        let conn = setup_test_db();
        let first_repo = RegionFirstLayerRepository::new(conn.clone());
        let second_repo = RegionSecondLayerRepository::new(conn.clone());
        let third_repo = RegionThirdLayerRepository::new(conn);

        let rfl = first_repo.create("RFL").unwrap();
        let rsl = second_repo.create(rfl, "RSL").unwrap();
        third_repo.create(rsl, "RTL_0").unwrap();
        third_repo.create(rsl, "RTL_1").unwrap();

        let summary = first_repo.delete(rfl).unwrap();

        assert_eq!(summary.region_first_layers, 1);
        assert_eq!(summary.region_second_layers, 1);
        assert_eq!(summary.region_third_layers, 2);
        assert_eq!(summary.total(), 4);
        assert_eq!(second_repo.count().unwrap(), 0);
        assert_eq!(third_repo.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_region() {
        let repo = RegionSecondLayerRepository::new(setup_test_db());
        assert!(matches!(repo.delete(42), Err(RepositoryError::NotFound { .. })));
    }
}
