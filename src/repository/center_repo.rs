// ==========================================
// 산후조리원 디렉터리 - 조리원数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 对齐: center 表（地区层级的叶子）
// ==========================================

mod core;
mod query;


pub use core::CenterRepository;
pub use query::CenterQuery;
