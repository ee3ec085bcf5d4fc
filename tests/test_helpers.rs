// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库创建 + 标准地区层级样例数据
// ==========================================
#![allow(dead_code)]

use postpartum_centers::app::AppState;
use postpartum_centers::db::{init_schema, open_sqlite_connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 基于临时数据库创建 AppState
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::new(db_path)?;
    Ok((temp_file, state))
}

/// 标准层级样例
///
/// ```text
/// └── RFL_0
///     └── RSL_0
///         └── RTL_0 → center_0, center_1
///         └── RTL_1 → center_2, center_3
///     └── RSL_1
///         └── RTL_2
/// └── RFL_1
/// ```
pub struct SampleHierarchy {
    pub rfl: [i64; 2],
    pub rsl: [i64; 2],
    pub rtl: [i64; 3],
    pub centers: [i64; 4],
}

pub fn build_sample_hierarchy(state: &AppState) -> Result<SampleHierarchy, Box<dyn Error>> {
    let regions = &state.region_api;

    let rfl_0 = regions.create_first_layer("RFL_0")?.id;
    let rfl_1 = regions.create_first_layer("RFL_1")?.id;

    let rsl_0 = regions.create_second_layer(rfl_0, "RSL_0")?.id;
    let rsl_1 = regions.create_second_layer(rfl_0, "RSL_1")?.id;

    let rtl_0 = regions.create_third_layer(rsl_0, "RTL_0")?.id;
    let rtl_1 = regions.create_third_layer(rsl_0, "RTL_1")?.id;
    let rtl_2 = regions.create_third_layer(rsl_1, "RTL_2")?.id;

    let centers = &state.center_api;
    let center_0 = centers.create_center(rtl_0, "center_0")?.id;
    let center_1 = centers.create_center(rtl_0, "center_1")?.id;
    let center_2 = centers.create_center(rtl_1, "center_2")?.id;
    let center_3 = centers.create_center(rtl_1, "center_3")?.id;

    Ok(SampleHierarchy {
        rfl: [rfl_0, rfl_1],
        rsl: [rsl_0, rsl_1],
        rtl: [rtl_0, rtl_1, rtl_2],
        centers: [center_0, center_1, center_2, center_3],
    })
}
