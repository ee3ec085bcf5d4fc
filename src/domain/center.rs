// ==========================================
// 산후조리원 디렉터리 - 조리원 / 政策领域模型
// ==========================================
// 对齐: center / policy 表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Center - 산후조리원（层级叶子节点）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    pub id: i64,
    pub name: String,
    pub region_third_layer_id: i64, // 必填外键
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ==========================================
// Policy - 조리원 的命名布尔属性
// ==========================================
// 例: "주차 가능" / is_available=true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: i64,
    pub center_id: i64, // 必填外键
    pub name: String,   // 最长 40 字符
    #[serde(default)]
    pub is_available: bool, // 默认 false
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
