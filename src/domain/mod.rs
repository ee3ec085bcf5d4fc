// ==========================================
// 산후조리원 디렉터리 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod center;
pub mod region;
pub mod types;

// 重导出核心类型
pub use center::{Center, Policy};
pub use region::{Region, RegionFirstLayer, RegionPath, RegionSecondLayer, RegionThirdLayer};
pub use types::{
    validate_name, NameValidationError, RegionLayer, CENTER_NAME_MAX_LEN, POLICY_NAME_MAX_LEN,
    REGION_NAME_MAX_LEN,
};
