// ==========================================
// 산후조리원 디렉터리 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，级联删除依赖 foreign_keys
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表脚本幂等，可在每次启动时执行
// ==========================================

use chrono::Local;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表脚本（五张业务表 + 外键索引）
///
/// 说明：
/// - 所有外键均为 NOT NULL + ON DELETE CASCADE，删除父级时由 SQLite 级联删除子级
/// - 级联只有在 `PRAGMA foreign_keys = ON` 时生效，见 [`configure_sqlite_connection`]
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS region_first_layer (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS region_second_layer (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    region_first_layer_id INTEGER NOT NULL
        REFERENCES region_first_layer(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS region_third_layer (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    region_second_layer_id INTEGER NOT NULL
        REFERENCES region_second_layer(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS center (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    region_third_layer_id INTEGER NOT NULL
        REFERENCES region_third_layer(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS policy (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    center_id INTEGER NOT NULL
        REFERENCES center(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    is_available INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_region_second_layer_parent ON region_second_layer(region_first_layer_id);
CREATE INDEX IF NOT EXISTS idx_region_third_layer_parent ON region_third_layer(region_second_layer_id);
CREATE INDEX IF NOT EXISTS idx_center_region ON center(region_third_layer_id);
CREATE INDEX IF NOT EXISTS idx_policy_center ON policy(center_id);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试/临时场景）
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化 schema（幂等）
///
/// 首次执行时写入 `CURRENT_SCHEMA_VERSION`，已存在的版本记录不会被覆盖。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    if read_schema_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![
                CURRENT_SCHEMA_VERSION,
                Local::now().naive_local()
            ],
        )?;
        tracing::info!(version = CURRENT_SCHEMA_VERSION, "schema 初始化完成");
    }

    Ok(())
}

/// 读取 schema_version（若表不存在或为空则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_schema_version_without_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_schema_version_records_applied_at() {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();

        let applied_at: chrono::NaiveDateTime = conn
            .query_row("SELECT applied_at FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert!(applied_at <= Local::now().naive_local());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory_connection().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_center_requires_existing_region() {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO center (name, region_third_layer_id) VALUES ('orphan', 999)",
            [],
        );
        assert!(result.is_err());
    }
}
