// ==========================================
// 산후조리원 디렉터리 - 地区管理 API
// ==========================================
// 职责: 三级地区的创建/查询/改名/迁移/删除，地区下 조리원 查询，层级树
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::center_api::CenterInfo;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::region::{Region, RegionSecondLayer, RegionThirdLayer};
use crate::domain::types::{validate_name, RegionLayer, REGION_NAME_MAX_LEN};
use crate::repository::cascade::CascadeSummary;
use crate::repository::center_repo::CenterRepository;
use crate::repository::region_repo::{
    RegionFirstLayerRepository, RegionSecondLayerRepository, RegionThirdLayerRepository,
};

// ==========================================
// RegionApi - 地区管理 API
// ==========================================

/// 地区管理API
///
/// 职责：
/// 1. 各层级地区的 CRUD
/// 2. 任意层级地区下的 조리원 列表（向下穿透）
/// 3. 完整层级树（附 조리원 数量）
pub struct RegionApi {
    first_repo: Arc<RegionFirstLayerRepository>,
    second_repo: Arc<RegionSecondLayerRepository>,
    third_repo: Arc<RegionThirdLayerRepository>,
    center_repo: Arc<CenterRepository>,
}

impl RegionApi {
    /// 创建新的RegionApi实例
    pub fn new(
        first_repo: Arc<RegionFirstLayerRepository>,
        second_repo: Arc<RegionSecondLayerRepository>,
        third_repo: Arc<RegionThirdLayerRepository>,
        center_repo: Arc<CenterRepository>,
    ) -> Self {
        Self {
            first_repo,
            second_repo,
            third_repo,
            center_repo,
        }
    }

    // ==========================================
    // 创建
    // ==========================================

    /// 创建一级地区
    pub fn create_first_layer(&self, name: &str) -> ApiResult<RegionInfo> {
        let name = validate_name("region.name", name, REGION_NAME_MAX_LEN)?;
        let id = self.first_repo.create(&name)?;

        tracing::info!(id, name = %name, "创建一级地区");
        Ok(RegionInfo {
            id,
            name,
            layer: RegionLayer::First,
            parent_id: None,
        })
    }

    /// 创建二级地区
    ///
    /// # 返回
    /// - Err(NotFound): 一级地区不存在
    pub fn create_second_layer(&self, region_first_layer_id: i64, name: &str) -> ApiResult<RegionInfo> {
        let name = validate_name("region.name", name, REGION_NAME_MAX_LEN)?;
        self.ensure_region_exists(RegionLayer::First, region_first_layer_id)?;

        let id = self.second_repo.create(region_first_layer_id, &name)?;

        tracing::info!(id, parent_id = region_first_layer_id, name = %name, "创建二级地区");
        Ok(RegionInfo {
            id,
            name,
            layer: RegionLayer::Second,
            parent_id: Some(region_first_layer_id),
        })
    }

    /// 创建三级地区
    ///
    /// # 返回
    /// - Err(NotFound): 二级地区不存在
    pub fn create_third_layer(&self, region_second_layer_id: i64, name: &str) -> ApiResult<RegionInfo> {
        let name = validate_name("region.name", name, REGION_NAME_MAX_LEN)?;
        self.ensure_region_exists(RegionLayer::Second, region_second_layer_id)?;

        let id = self.third_repo.create(region_second_layer_id, &name)?;

        tracing::info!(id, parent_id = region_second_layer_id, name = %name, "创建三级地区");
        Ok(RegionInfo {
            id,
            name,
            layer: RegionLayer::Third,
            parent_id: Some(region_second_layer_id),
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 查询单个地区
    pub fn get_region(&self, layer: RegionLayer, id: i64) -> ApiResult<RegionInfo> {
        let found = match layer {
            RegionLayer::First => self.first_repo.find_by_id(id)?.map(|r| RegionInfo::from_region(&r)),
            RegionLayer::Second => self.second_repo.find_by_id(id)?.map(|r| RegionInfo::from_region(&r)),
            RegionLayer::Third => self.third_repo.find_by_id(id)?.map(|r| RegionInfo::from_region(&r)),
        };

        found.ok_or_else(|| region_not_found(layer, id))
    }

    /// 查询全部一级地区
    pub fn list_first_layers(&self) -> ApiResult<Vec<RegionInfo>> {
        let regions = self.first_repo.find_all()?;
        Ok(regions.iter().map(RegionInfo::from_region).collect())
    }

    /// 查询地区的直接下级地区
    ///
    /// 三级地区的下级是 조리원，请使用 [`RegionApi::list_centers`]。
    pub fn list_children(&self, layer: RegionLayer, id: i64) -> ApiResult<Vec<RegionInfo>> {
        self.ensure_region_exists(layer, id)?;

        match layer {
            RegionLayer::First => {
                let children = self.second_repo.find_by_first_layer(id)?;
                Ok(children.iter().map(RegionInfo::from_region).collect())
            }
            RegionLayer::Second => {
                let children = self.third_repo.find_by_second_layer(id)?;
                Ok(children.iter().map(RegionInfo::from_region).collect())
            }
            RegionLayer::Third => Err(ApiError::InvalidInput(
                "三级地区没有下级地区，请查询其 조리원 列表".to_string(),
            )),
        }
    }

    /// 查询地区下的全部 조리원（按ID升序）
    ///
    /// # 返回
    /// - Ok(vec![]): 地区存在但没有 조리원
    /// - Err(NotFound): 地区不存在
    pub fn list_centers(&self, layer: RegionLayer, id: i64) -> ApiResult<Vec<CenterInfo>> {
        self.ensure_region_exists(layer, id)?;

        let centers = self.center_repo.find_by_region(layer, id)?;
        Ok(centers.into_iter().map(CenterInfo::from).collect())
    }

    /// 构建完整地区层级树（每个节点附带其下 조리원 总数）
    pub fn region_tree(&self) -> ApiResult<Vec<RegionTreeNode>> {
        let firsts = self.first_repo.find_all()?;
        let seconds = self.second_repo.find_all()?;
        let thirds = self.third_repo.find_all()?;
        let center_counts = self.center_repo.count_grouped_by_third_layer()?;

        let mut thirds_by_parent: HashMap<i64, Vec<RegionThirdLayer>> = HashMap::new();
        for third in thirds {
            thirds_by_parent
                .entry(third.region_second_layer_id)
                .or_default()
                .push(third);
        }

        let mut seconds_by_parent: HashMap<i64, Vec<RegionSecondLayer>> = HashMap::new();
        for second in seconds {
            seconds_by_parent
                .entry(second.region_first_layer_id)
                .or_default()
                .push(second);
        }

        let tree = firsts
            .iter()
            .map(|first| {
                let children: Vec<RegionTreeNode> = seconds_by_parent
                    .remove(&first.id)
                    .unwrap_or_default()
                    .iter()
                    .map(|second| {
                        let leaves: Vec<RegionTreeNode> = thirds_by_parent
                            .remove(&second.id)
                            .unwrap_or_default()
                            .iter()
                            .map(|third| {
                                let count = center_counts.get(&third.id).copied().unwrap_or(0);
                                RegionTreeNode::new(third, count, Vec::new())
                            })
                            .collect();
                        let count = leaves.iter().map(|n| n.center_count).sum();
                        RegionTreeNode::new(second, count, leaves)
                    })
                    .collect();
                let count = children.iter().map(|n| n.center_count).sum();
                RegionTreeNode::new(first, count, children)
            })
            .collect();

        Ok(tree)
    }

    // ==========================================
    // 修改 / 删除
    // ==========================================

    /// 地区改名
    pub fn rename_region(&self, layer: RegionLayer, id: i64, name: &str) -> ApiResult<()> {
        let name = validate_name("region.name", name, REGION_NAME_MAX_LEN)?;

        match layer {
            RegionLayer::First => self.first_repo.update_name(id, &name)?,
            RegionLayer::Second => self.second_repo.update_name(id, &name)?,
            RegionLayer::Third => self.third_repo.update_name(id, &name)?,
        }

        tracing::info!(layer = %layer, id, name = %name, "地区改名");
        Ok(())
    }

    /// 将地区挂到新的上级地区下（一级地区没有上级）
    pub fn move_region(&self, layer: RegionLayer, id: i64, new_parent_id: i64) -> ApiResult<()> {
        match layer {
            RegionLayer::First => {
                return Err(ApiError::InvalidInput("一级地区没有上级地区".to_string()));
            }
            RegionLayer::Second => {
                self.ensure_region_exists(RegionLayer::First, new_parent_id)?;
                self.second_repo.move_to_first_layer(id, new_parent_id)?;
            }
            RegionLayer::Third => {
                self.ensure_region_exists(RegionLayer::Second, new_parent_id)?;
                self.third_repo.move_to_second_layer(id, new_parent_id)?;
            }
        }

        tracing::info!(layer = %layer, id, new_parent_id, "地区迁移");
        Ok(())
    }

    /// 删除地区（级联删除所有下级地区、조리원 与政策）
    pub fn delete_region(&self, layer: RegionLayer, id: i64) -> ApiResult<CascadeSummary> {
        let summary = match layer {
            RegionLayer::First => self.first_repo.delete(id)?,
            RegionLayer::Second => self.second_repo.delete(id)?,
            RegionLayer::Third => self.third_repo.delete(id)?,
        };

        tracing::info!(
            layer = %layer,
            id,
            centers = summary.centers,
            policies = summary.policies,
            "删除地区"
        );
        Ok(summary)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn ensure_region_exists(&self, layer: RegionLayer, id: i64) -> ApiResult<()> {
        let exists = match layer {
            RegionLayer::First => self.first_repo.find_by_id(id)?.is_some(),
            RegionLayer::Second => self.second_repo.find_by_id(id)?.is_some(),
            RegionLayer::Third => self.third_repo.find_by_id(id)?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(region_not_found(layer, id))
        }
    }
}

fn region_not_found(layer: RegionLayer, id: i64) -> ApiError {
    ApiError::NotFound(format!("{}级地区(id={})不存在", layer, id))
}

// ==========================================
// DTO 类型定义
// ==========================================

/// 地区信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub id: i64,
    pub name: String,
    pub layer: RegionLayer,
    /// 上级地区ID（一级地区为 None）
    pub parent_id: Option<i64>,
}

impl RegionInfo {
    pub fn from_region<R: Region>(region: &R) -> Self {
        Self {
            id: region.id(),
            name: region.name().to_string(),
            layer: region.layer(),
            parent_id: region.parent_id(),
        }
    }
}

/// 地区层级树节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTreeNode {
    pub id: i64,
    pub name: String,
    pub layer: RegionLayer,

    /// 该地区下（含全部下级）조리원 总数
    pub center_count: i64,

    pub children: Vec<RegionTreeNode>,
}

impl RegionTreeNode {
    fn new<R: Region>(region: &R, center_count: i64, children: Vec<RegionTreeNode>) -> Self {
        Self {
            id: region.id(),
            name: region.name().to_string(),
            layer: region.layer(),
            center_count,
            children,
        }
    }
}
