// ==========================================
// 산후조리원 디렉터리 - 조리원管理 API
// ==========================================
// 职责: 조리원 创建/详情/改名/迁移/删除/组合检索
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::policy_api::PolicyInfo;
use crate::domain::center::Center;
use crate::domain::region::RegionPath;
use crate::domain::types::{validate_name, RegionLayer, CENTER_NAME_MAX_LEN, POLICY_NAME_MAX_LEN};
use crate::repository::cascade::CascadeSummary;
use crate::repository::center_repo::{CenterQuery, CenterRepository};
use crate::repository::policy_repo::PolicyRepository;
use crate::repository::region_repo::RegionThirdLayerRepository;

/// 检索结果上限（未指定 limit 时不截断）
pub const MAX_SEARCH_LIMIT: usize = 500;

// ==========================================
// CenterApi - 조리원管理 API
// ==========================================
pub struct CenterApi {
    center_repo: Arc<CenterRepository>,
    third_repo: Arc<RegionThirdLayerRepository>,
    policy_repo: Arc<PolicyRepository>,
}

impl CenterApi {
    /// 创建新的CenterApi实例
    pub fn new(
        center_repo: Arc<CenterRepository>,
        third_repo: Arc<RegionThirdLayerRepository>,
        policy_repo: Arc<PolicyRepository>,
    ) -> Self {
        Self {
            center_repo,
            third_repo,
            policy_repo,
        }
    }

    /// 在三级地区下创建 조리원
    ///
    /// # 返回
    /// - Ok(CenterInfo): 新建的 조리원
    /// - Err(NotFound): 三级地区不存在
    /// - Err(InvalidInput): 名称为空或超长
    pub fn create_center(&self, region_third_layer_id: i64, name: &str) -> ApiResult<CenterInfo> {
        let name = validate_name("center.name", name, CENTER_NAME_MAX_LEN)?;
        self.ensure_third_layer_exists(region_third_layer_id)?;

        let id = self.center_repo.create(&name, region_third_layer_id)?;

        tracing::info!(id, region_third_layer_id, name = %name, "创建 조리원");
        Ok(CenterInfo {
            id,
            name,
            region_third_layer_id,
        })
    }

    /// 查询 조리원 详情（含地区路径与政策）
    pub fn get_center(&self, id: i64) -> ApiResult<CenterDetail> {
        let center = self
            .center_repo
            .find_by_id(id)?
            .ok_or_else(|| center_not_found(id))?;

        let region_path = self
            .center_repo
            .find_region_path(id)?
            .ok_or_else(|| ApiError::InternalError(format!("조리원(id={})的地区路径不完整", id)))?;

        let policies = self
            .policy_repo
            .find_by_center(id)?
            .into_iter()
            .map(PolicyInfo::from)
            .collect();

        Ok(CenterDetail {
            center: CenterInfo::from(center),
            region_path,
            policies,
        })
    }

    /// 조리원 改名
    pub fn rename_center(&self, id: i64, name: &str) -> ApiResult<()> {
        let name = validate_name("center.name", name, CENTER_NAME_MAX_LEN)?;
        self.center_repo.update_name(id, &name)?;

        tracing::info!(id, name = %name, "조리원 改名");
        Ok(())
    }

    /// 迁移 조리원 到另一个三级地区
    pub fn move_center(&self, id: i64, region_third_layer_id: i64) -> ApiResult<()> {
        self.ensure_third_layer_exists(region_third_layer_id)?;
        self.center_repo.move_to_region(id, region_third_layer_id)?;

        tracing::info!(id, region_third_layer_id, "조리원 迁移");
        Ok(())
    }

    /// 删除 조리원（级联删除其政策）
    pub fn delete_center(&self, id: i64) -> ApiResult<CascadeSummary> {
        let summary = self.center_repo.delete(id)?;

        tracing::info!(id, policies = summary.policies, "删除 조리원");
        Ok(summary)
    }

    /// 组合条件检索 조리원
    pub fn search_centers(&self, request: &CenterSearchRequest) -> ApiResult<Vec<CenterInfo>> {
        let query = request.to_query()?;
        let centers = self.center_repo.query(&query)?;
        Ok(centers.into_iter().map(CenterInfo::from).collect())
    }

    fn ensure_third_layer_exists(&self, region_third_layer_id: i64) -> ApiResult<()> {
        if self.third_repo.find_by_id(region_third_layer_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "THIRD级地区(id={})不存在",
                region_third_layer_id
            )));
        }
        Ok(())
    }
}

fn center_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("조리원(id={})不存在", id))
}

// ==========================================
// 请求类型定义
// ==========================================

/// 조리원 检索请求
///
/// region_layer 与 region_id 必须同时提供或同时省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CenterSearchRequest {
    pub region_layer: Option<RegionLayer>,
    pub region_id: Option<i64>,
    pub name_contains: Option<String>,
    pub available_policy: Option<String>,
    pub limit: Option<usize>,
}

impl CenterSearchRequest {
    fn to_query(&self) -> ApiResult<CenterQuery> {
        let mut query = CenterQuery::new();

        match (self.region_layer, self.region_id) {
            (Some(layer), Some(id)) => query = query.in_region(layer, id),
            (None, None) => {}
            _ => {
                return Err(ApiError::InvalidInput(
                    "region_layer 与 region_id 必须同时提供".to_string(),
                ))
            }
        }

        if let Some(pattern) = self.name_contains.as_deref().map(str::trim) {
            if !pattern.is_empty() {
                query = query.name_contains(pattern);
            }
        }

        if let Some(policy_name) = &self.available_policy {
            let policy_name = validate_name("available_policy", policy_name, POLICY_NAME_MAX_LEN)?;
            query = query.with_available_policy(&policy_name);
        }

        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_SEARCH_LIMIT {
                return Err(ApiError::InvalidInput(format!(
                    "limit 必须在 1..={} 之间",
                    MAX_SEARCH_LIMIT
                )));
            }
            query = query.limit(limit);
        }

        Ok(query)
    }
}

// ==========================================
// DTO 类型定义
// ==========================================

/// 조리원 信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterInfo {
    pub id: i64,
    pub name: String,
    pub region_third_layer_id: i64,
}

impl From<Center> for CenterInfo {
    fn from(center: Center) -> Self {
        Self {
            id: center.id,
            name: center.name,
            region_third_layer_id: center.region_third_layer_id,
        }
    }
}

/// 조리원 详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterDetail {
    pub center: CenterInfo,
    pub region_path: RegionPath,
    pub policies: Vec<PolicyInfo>,
}
