// ==========================================
// 산후조리원 디렉터리 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、Repository 与 API 实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::api::{CenterApi, PolicyApi, RegionApi};
use crate::db::{self, CURRENT_SCHEMA_VERSION};
use crate::importer::CenterDirectoryImporter;
use crate::repository::{
    CenterImportRepository, CenterRepository, PolicyRepository, RegionFirstLayerRepository,
    RegionSecondLayerRepository, RegionThirdLayerRepository,
};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "POSTPARTUM_CENTERS_DB_PATH";

/// 应用状态
///
/// 所有 Repository 共享同一个 `Arc<Mutex<Connection>>`
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    /// 地区API
    pub region_api: Arc<RegionApi>,

    /// 조리원 API
    pub center_api: Arc<CenterApi>,

    /// 政策API
    pub policy_api: Arc<PolicyApi>,

    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 打开数据库、初始化表结构，并装配所有 API
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = db::open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        Self::from_connection(db_path, conn)
    }

    /// 基于内存数据库创建（测试用）
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = db::open_in_memory_connection().context("无法打开内存数据库")?;
        Self::from_connection(":memory:".to_string(), conn)
    }

    fn from_connection(db_path: String, conn: Connection) -> anyhow::Result<Self> {
        db::init_schema(&conn).context("数据库表结构初始化失败")?;

        match db::read_schema_version(&conn)? {
            Some(version) if version == CURRENT_SCHEMA_VERSION => {}
            other => tracing::warn!(
                found = ?other,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本不一致"
            ),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let first_repo = Arc::new(RegionFirstLayerRepository::new(conn.clone()));
        let second_repo = Arc::new(RegionSecondLayerRepository::new(conn.clone()));
        let third_repo = Arc::new(RegionThirdLayerRepository::new(conn.clone()));
        let center_repo = Arc::new(CenterRepository::new(conn.clone()));
        let policy_repo = Arc::new(PolicyRepository::new(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let region_api = Arc::new(RegionApi::new(
            first_repo,
            second_repo,
            third_repo.clone(),
            center_repo.clone(),
        ));
        let center_api = Arc::new(CenterApi::new(
            center_repo.clone(),
            third_repo,
            policy_repo.clone(),
        ));
        let policy_api = Arc::new(PolicyApi::new(policy_repo, center_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            region_api,
            center_api,
            policy_api,
            conn,
        })
    }

    /// 创建共享同一连接的 조리원 目录导入器
    pub fn importer(&self) -> CenterDirectoryImporter {
        CenterDirectoryImporter::new(CenterImportRepository::new(self.conn.clone()))
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./postpartum_centers.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let app_dir = data_dir.join("postpartum-centers-dev");

        #[cfg(not(debug_assertions))]
        let app_dir = data_dir.join("postpartum-centers");

        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join("postpartum_centers.db");
        }
    }

    path.to_string_lossy().to_string()
}
