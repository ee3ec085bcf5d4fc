// ==========================================
// 산후조리원 디렉터리 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod cascade;
pub mod center_import_repo;
pub mod center_repo;
pub mod error;
pub mod policy_repo;
pub mod region_repo;
pub mod sql_builder;

// 重导出核心仓储
pub use cascade::{CascadeSummary, CascadeTarget};
pub use center_import_repo::{CenterImportRepository, CenterImportRow, ImportCounts};
pub use center_repo::{CenterQuery, CenterRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use policy_repo::PolicyRepository;
pub use region_repo::{
    RegionFirstLayerRepository, RegionSecondLayerRepository, RegionThirdLayerRepository,
};
