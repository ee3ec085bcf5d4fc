// ==========================================
// 산후조리원 디렉터리 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 数据模型: 一级地区 → 二级地区 → 三级地区 → 조리원 → 政策
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 目录导入
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::RegionLayer;

// 领域实体
pub use domain::{Center, Policy, Region, RegionFirstLayer, RegionPath, RegionSecondLayer, RegionThirdLayer};

// API
pub use api::{CenterApi, PolicyApi, RegionApi};

// 应用状态
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "산후조리원 디렉터리";
