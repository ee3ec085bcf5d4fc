// ==========================================
// 산후조리원 디렉터리 - 级联删除
// ==========================================
// 删除由 SQLite 外键 ON DELETE CASCADE 完成
// 这里只负责: 同一事务内先统计受影响行数，再删除目标行
// ==========================================

use crate::domain::types::RegionLayer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// 级联删除的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeTarget {
    Region(RegionLayer),
    Center,
}

impl CascadeTarget {
    fn table_name(&self) -> &'static str {
        match self {
            CascadeTarget::Region(layer) => layer.table_name(),
            CascadeTarget::Center => "center",
        }
    }

    fn entity_name(&self) -> &'static str {
        match self {
            CascadeTarget::Region(RegionLayer::First) => "RegionFirstLayer",
            CascadeTarget::Region(RegionLayer::Second) => "RegionSecondLayer",
            CascadeTarget::Region(RegionLayer::Third) => "RegionThirdLayer",
            CascadeTarget::Center => "Center",
        }
    }
}

/// 级联删除结果（含目标行本身）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub region_first_layers: usize,
    pub region_second_layers: usize,
    pub region_third_layers: usize,
    pub centers: usize,
    pub policies: usize,
}

impl CascadeSummary {
    /// 删除的总行数
    pub fn total(&self) -> usize {
        self.region_first_layers
            + self.region_second_layers
            + self.region_third_layers
            + self.centers
            + self.policies
    }
}

/// 某个地区下全部 조리원 的 FROM/WHERE 片段（别名 c，参数 ?1 为地区ID）
///
/// 一级/二级地区通过 JOIN 向下穿透到三级地区。
pub(crate) fn center_scope_sql(layer: RegionLayer) -> &'static str {
    match layer {
        RegionLayer::Third => "FROM center c WHERE c.region_third_layer_id = ?1",
        RegionLayer::Second => {
            "FROM center c \
             JOIN region_third_layer t ON t.id = c.region_third_layer_id \
             WHERE t.region_second_layer_id = ?1"
        }
        RegionLayer::First => {
            "FROM center c \
             JOIN region_third_layer t ON t.id = c.region_third_layer_id \
             JOIN region_second_layer s ON s.id = t.region_second_layer_id \
             WHERE s.region_first_layer_id = ?1"
        }
    }
}

fn count(conn: &Connection, sql: &str, id: i64) -> RepositoryResult<usize> {
    let n: i64 = conn.query_row(sql, params![id], |row| row.get(0))?;
    Ok(n as usize)
}

fn count_centers_and_policies(
    conn: &Connection,
    layer: RegionLayer,
    id: i64,
) -> RepositoryResult<(usize, usize)> {
    let scope = center_scope_sql(layer);
    let centers = count(conn, &format!("SELECT COUNT(*) {}", scope), id)?;
    let policies = count(
        conn,
        &format!(
            "SELECT COUNT(*) FROM policy WHERE center_id IN (SELECT c.id {})",
            scope
        ),
        id,
    )?;
    Ok((centers, policies))
}

/// 统计删除目标会级联影响的行数（不含存在性检查）
pub(crate) fn count_cascade(
    conn: &Connection,
    target: CascadeTarget,
    id: i64,
) -> RepositoryResult<CascadeSummary> {
    let mut summary = CascadeSummary::default();

    match target {
        CascadeTarget::Region(RegionLayer::First) => {
            summary.region_first_layers = 1;
            summary.region_second_layers = count(
                conn,
                "SELECT COUNT(*) FROM region_second_layer WHERE region_first_layer_id = ?1",
                id,
            )?;
            summary.region_third_layers = count(
                conn,
                "SELECT COUNT(*) FROM region_third_layer t \
                 JOIN region_second_layer s ON s.id = t.region_second_layer_id \
                 WHERE s.region_first_layer_id = ?1",
                id,
            )?;
            let (centers, policies) = count_centers_and_policies(conn, RegionLayer::First, id)?;
            summary.centers = centers;
            summary.policies = policies;
        }
        CascadeTarget::Region(RegionLayer::Second) => {
            summary.region_second_layers = 1;
            summary.region_third_layers = count(
                conn,
                "SELECT COUNT(*) FROM region_third_layer WHERE region_second_layer_id = ?1",
                id,
            )?;
            let (centers, policies) = count_centers_and_policies(conn, RegionLayer::Second, id)?;
            summary.centers = centers;
            summary.policies = policies;
        }
        CascadeTarget::Region(RegionLayer::Third) => {
            summary.region_third_layers = 1;
            let (centers, policies) = count_centers_and_policies(conn, RegionLayer::Third, id)?;
            summary.centers = centers;
            summary.policies = policies;
        }
        CascadeTarget::Center => {
            summary.centers = 1;
            summary.policies = count(conn, "SELECT COUNT(*) FROM policy WHERE center_id = ?1", id)?;
        }
    }

    Ok(summary)
}

/// 删除目标行并返回级联统计
///
/// # 返回
/// - Ok(CascadeSummary): 删除成功
/// - Err(NotFound): 目标不存在（事务回滚，不产生任何修改）
pub(crate) fn delete_with_cascade(
    conn: &Connection,
    target: CascadeTarget,
    id: i64,
) -> RepositoryResult<CascadeSummary> {
    let tx = conn.unchecked_transaction()?;

    let summary = count_cascade(&tx, target, id)?;
    let affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", target.table_name()),
        params![id],
    )?;

    if affected == 0 {
        return Err(RepositoryError::not_found(target.entity_name(), id));
    }

    tx.commit()?;

    tracing::info!(
        entity = target.entity_name(),
        id,
        total = summary.total(),
        "级联删除完成"
    );
    Ok(summary)
}
