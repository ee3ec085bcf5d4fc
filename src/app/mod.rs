// ==========================================
// 산후조리원 디렉터리 - 应用层
// ==========================================
// 职责: 装配共享连接与 API，解析数据库路径
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
