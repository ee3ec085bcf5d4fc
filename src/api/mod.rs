// ==========================================
// 산후조리원 디렉터리 - API 层
// ==========================================
// 职责: 输入校验 + DTO 转换，对外提供业务 API
// ==========================================

pub mod center_api;
pub mod error;
pub mod policy_api;
pub mod region_api;

// 重导出核心类型
pub use center_api::{CenterApi, CenterDetail, CenterInfo, CenterSearchRequest};
pub use error::{ApiError, ApiResult};
pub use policy_api::{PolicyApi, PolicyInfo};
pub use region_api::{RegionApi, RegionInfo, RegionTreeNode};
