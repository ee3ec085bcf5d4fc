// ==========================================
// 산후조리원 디렉터리 - 领域类型定义
// ==========================================
// 地区三级层级 + 名称校验规则
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 政策名称最大长度（字符数）
pub const POLICY_NAME_MAX_LEN: usize = 40;

/// 地区名称最大长度（字符数）
pub const REGION_NAME_MAX_LEN: usize = 50;

/// 조리원 名称最大长度（字符数）
pub const CENTER_NAME_MAX_LEN: usize = 100;

// ==========================================
// 地区层级 (Region Layer)
// ==========================================
// 顺序: First(最广) < Second < Third(最窄)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionLayer {
    First,  // 시/도
    Second, // 시/군/구
    Third,  // 읍/면/동
}

impl fmt::Display for RegionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionLayer::First => write!(f, "FIRST"),
            RegionLayer::Second => write!(f, "SECOND"),
            RegionLayer::Third => write!(f, "THIRD"),
        }
    }
}

impl FromStr for RegionLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FIRST" | "1" => Ok(RegionLayer::First),
            "SECOND" | "2" => Ok(RegionLayer::Second),
            "THIRD" | "3" => Ok(RegionLayer::Third),
            other => Err(format!("未知的地区层级: {}", other)),
        }
    }
}

impl RegionLayer {
    /// 全部层级（由广到窄）
    pub const ALL: [RegionLayer; 3] = [RegionLayer::First, RegionLayer::Second, RegionLayer::Third];

    /// 层级深度（1..=3）
    pub fn depth(&self) -> u8 {
        match self {
            RegionLayer::First => 1,
            RegionLayer::Second => 2,
            RegionLayer::Third => 3,
        }
    }

    /// 对应的表名
    pub fn table_name(&self) -> &'static str {
        match self {
            RegionLayer::First => "region_first_layer",
            RegionLayer::Second => "region_second_layer",
            RegionLayer::Third => "region_third_layer",
        }
    }

    /// 子表中指向本层的外键列名
    pub fn fk_column(&self) -> &'static str {
        match self {
            RegionLayer::First => "region_first_layer_id",
            RegionLayer::Second => "region_second_layer_id",
            RegionLayer::Third => "region_third_layer_id",
        }
    }

    /// 上一层（First 没有父级）
    pub fn parent(&self) -> Option<RegionLayer> {
        match self {
            RegionLayer::First => None,
            RegionLayer::Second => Some(RegionLayer::First),
            RegionLayer::Third => Some(RegionLayer::Second),
        }
    }

    /// 下一层（Third 的子级是 조리원，不是地区）
    pub fn child(&self) -> Option<RegionLayer> {
        match self {
            RegionLayer::First => Some(RegionLayer::Second),
            RegionLayer::Second => Some(RegionLayer::Third),
            RegionLayer::Third => None,
        }
    }
}

// ==========================================
// 名称校验
// ==========================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} 不能为空")]
    Empty { field: String },

    #[error("{field} 超出长度限制: max={max}, actual={actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },
}

/// 校验并规范化名称
///
/// # 返回
/// - Ok(String): 去除首尾空白后的名称
/// - Err: 空名称或超长（按字符计数，한글 一个字按 1 计）
pub fn validate_name(field: &str, value: &str, max_chars: usize) -> Result<String, NameValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Empty {
            field: field.to_string(),
        });
    }

    let actual = trimmed.chars().count();
    if actual > max_chars {
        return Err(NameValidationError::TooLong {
            field: field.to_string(),
            max: max_chars,
            actual,
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_layer_parse() {
        assert_eq!("first".parse::<RegionLayer>().unwrap(), RegionLayer::First);
        assert_eq!("2".parse::<RegionLayer>().unwrap(), RegionLayer::Second);
        assert_eq!(" THIRD ".parse::<RegionLayer>().unwrap(), RegionLayer::Third);
        assert!("fourth".parse::<RegionLayer>().is_err());
    }

    #[test]
    fn test_region_layer_navigation() {
        assert_eq!(RegionLayer::First.parent(), None);
        assert_eq!(RegionLayer::Third.parent(), Some(RegionLayer::Second));
        assert_eq!(RegionLayer::First.child(), Some(RegionLayer::Second));
        assert_eq!(RegionLayer::Third.child(), None);
        assert!(RegionLayer::First < RegionLayer::Third);
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("name", "  강남구 ", 10).unwrap(), "강남구");
    }

    #[test]
    fn test_validate_name_counts_chars() {
        let forty = "가".repeat(POLICY_NAME_MAX_LEN);
        assert!(validate_name("policy.name", &forty, POLICY_NAME_MAX_LEN).is_ok());

        let too_long = "가".repeat(POLICY_NAME_MAX_LEN + 1);
        assert_eq!(
            validate_name("policy.name", &too_long, POLICY_NAME_MAX_LEN),
            Err(NameValidationError::TooLong {
                field: "policy.name".to_string(),
                max: POLICY_NAME_MAX_LEN,
                actual: POLICY_NAME_MAX_LEN + 1,
            })
        );
    }

    #[test]
    fn test_validate_name_empty() {
        assert!(matches!(
            validate_name("center.name", "   ", CENTER_NAME_MAX_LEN),
            Err(NameValidationError::Empty { .. })
        ));
    }
}
