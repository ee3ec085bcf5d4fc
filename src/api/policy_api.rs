// ==========================================
// 산후조리원 디렉터리 - 政策管理 API
// ==========================================
// 职责: 조리원 政策（命名布尔属性）的增删改查
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::center::Policy;
use crate::domain::types::{validate_name, POLICY_NAME_MAX_LEN};
use crate::repository::center_repo::CenterRepository;
use crate::repository::policy_repo::PolicyRepository;

pub struct PolicyApi {
    policy_repo: Arc<PolicyRepository>,
    center_repo: Arc<CenterRepository>,
}

impl PolicyApi {
    pub fn new(policy_repo: Arc<PolicyRepository>, center_repo: Arc<CenterRepository>) -> Self {
        Self {
            policy_repo,
            center_repo,
        }
    }

    /// 为 조리원 添加政策
    ///
    /// # 返回
    /// - Err(NotFound): 조리원 不存在
    /// - Err(InvalidInput): 名称为空或超过 40 字符
    pub fn add_policy(&self, center_id: i64, name: &str, is_available: bool) -> ApiResult<PolicyInfo> {
        let name = validate_name("policy.name", name, POLICY_NAME_MAX_LEN)?;
        self.ensure_center_exists(center_id)?;

        let id = self.policy_repo.create(center_id, &name, is_available)?;

        tracing::info!(id, center_id, name = %name, is_available, "添加政策");
        Ok(PolicyInfo {
            id,
            center_id,
            name,
            is_available,
        })
    }

    /// 查询 조리원 的全部政策
    pub fn list_policies(&self, center_id: i64) -> ApiResult<Vec<PolicyInfo>> {
        self.ensure_center_exists(center_id)?;
        let policies = self.policy_repo.find_by_center(center_id)?;
        Ok(policies.into_iter().map(PolicyInfo::from).collect())
    }

    /// 查询 조리원 的可用政策
    pub fn list_available_policies(&self, center_id: i64) -> ApiResult<Vec<PolicyInfo>> {
        self.ensure_center_exists(center_id)?;
        let policies = self.policy_repo.find_available_by_center(center_id)?;
        Ok(policies.into_iter().map(PolicyInfo::from).collect())
    }

    /// 设置政策可用标志，返回更新后的政策
    pub fn set_policy_availability(&self, policy_id: i64, is_available: bool) -> ApiResult<PolicyInfo> {
        self.policy_repo.set_availability(policy_id, is_available)?;

        let policy = self
            .policy_repo
            .find_by_id(policy_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Policy(id={})不存在", policy_id)))?;

        tracing::info!(id = policy_id, is_available, "更新政策可用标志");
        Ok(PolicyInfo::from(policy))
    }

    /// 政策改名
    pub fn rename_policy(&self, policy_id: i64, name: &str) -> ApiResult<()> {
        let name = validate_name("policy.name", name, POLICY_NAME_MAX_LEN)?;
        self.policy_repo.update_name(policy_id, &name)?;

        tracing::info!(id = policy_id, name = %name, "政策改名");
        Ok(())
    }

    /// 删除政策
    pub fn remove_policy(&self, policy_id: i64) -> ApiResult<()> {
        self.policy_repo.delete(policy_id)?;

        tracing::info!(id = policy_id, "删除政策");
        Ok(())
    }

    fn ensure_center_exists(&self, center_id: i64) -> ApiResult<()> {
        if self.center_repo.find_by_id(center_id)?.is_none() {
            return Err(ApiError::NotFound(format!("조리원(id={})不存在", center_id)));
        }
        Ok(())
    }
}

/// 政策信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyInfo {
    pub id: i64,
    pub center_id: i64,
    pub name: String,
    pub is_available: bool,
}

impl From<Policy> for PolicyInfo {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id,
            center_id: policy.center_id,
            name: policy.name,
            is_available: policy.is_available,
        }
    }
}
