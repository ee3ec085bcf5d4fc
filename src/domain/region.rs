// ==========================================
// 산후조리원 디렉터리 - 地区领域模型
// ==========================================
// 三级包含层级: RegionFirstLayer → RegionSecondLayer → RegionThirdLayer
// 对齐: region_first_layer / region_second_layer / region_third_layer 表
// ==========================================

use crate::domain::types::RegionLayer;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RegionFirstLayer - 一级地区（层级根）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFirstLayer {
    pub id: i64,
    pub name: String,
}

// ==========================================
// RegionSecondLayer - 二级地区
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSecondLayer {
    pub id: i64,
    pub name: String,
    pub region_first_layer_id: i64, // 必填外键
}

// ==========================================
// RegionThirdLayer - 三级地区（조리원 直接挂载于此）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionThirdLayer {
    pub id: i64,
    pub name: String,
    pub region_second_layer_id: i64, // 必填外键
}

// ==========================================
// Trait: Region
// ==========================================
// 用途: 任意层级的地区都能回答 "我下面有哪些 조리원"
pub trait Region {
    fn id(&self) -> i64;

    fn name(&self) -> &str;

    fn layer(&self) -> RegionLayer;

    /// 父级地区ID（一级地区为 None）
    fn parent_id(&self) -> Option<i64>;
}

impl Region for RegionFirstLayer {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn layer(&self) -> RegionLayer {
        RegionLayer::First
    }

    fn parent_id(&self) -> Option<i64> {
        None
    }
}

impl Region for RegionSecondLayer {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn layer(&self) -> RegionLayer {
        RegionLayer::Second
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.region_first_layer_id)
    }
}

impl Region for RegionThirdLayer {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn layer(&self) -> RegionLayer {
        RegionLayer::Third
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.region_second_layer_id)
    }
}

impl fmt::Display for RegionFirstLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for RegionSecondLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for RegionThirdLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ==========================================
// RegionPath - 조리원 所在的完整地区路径
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPath {
    pub first: RegionFirstLayer,
    pub second: RegionSecondLayer,
    pub third: RegionThirdLayer,
}

impl fmt::Display for RegionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.first, self.second, self.third)
    }
}
