use crate::domain::types::RegionLayer;
use crate::repository::sql_builder::{escape_like, SqlQueryBuilder};
use rusqlite::types::Value;

// ==========================================
// CenterQuery - 조리원 组合查询条件
// ==========================================
// 所有条件之间为 AND；不设任何条件时等价于 find_all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterQuery {
    region: Option<(RegionLayer, i64)>,
    name_pattern: Option<String>,
    available_policy: Option<String>,
    limit: Option<usize>,
}

impl CenterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 限定在某个地区（任意层级）之下
    pub fn in_region(mut self, layer: RegionLayer, region_id: i64) -> Self {
        self.region = Some((layer, region_id));
        self
    }

    /// 名称包含子串
    pub fn name_contains(mut self, pattern: &str) -> Self {
        self.name_pattern = Some(pattern.to_string());
        self
    }

    /// 拥有指定名称且 is_available = true 的政策
    pub fn with_available_policy(mut self, policy_name: &str) -> Self {
        self.available_policy = Some(policy_name.to_string());
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// 生成 SQL 与按占位符顺序排列的参数
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut values = Vec::new();

        let (select, region_condition) = match self.region {
            None => (
                "SELECT c.id, c.name, c.region_third_layer_id FROM center c",
                None,
            ),
            Some((RegionLayer::Third, _)) => (
                "SELECT c.id, c.name, c.region_third_layer_id FROM center c",
                Some("c.region_third_layer_id = ?"),
            ),
            Some((RegionLayer::Second, _)) => (
                "SELECT c.id, c.name, c.region_third_layer_id FROM center c \
                 JOIN region_third_layer t ON t.id = c.region_third_layer_id",
                Some("t.region_second_layer_id = ?"),
            ),
            Some((RegionLayer::First, _)) => (
                "SELECT c.id, c.name, c.region_third_layer_id FROM center c \
                 JOIN region_third_layer t ON t.id = c.region_third_layer_id \
                 JOIN region_second_layer s ON s.id = t.region_second_layer_id",
                Some("s.region_first_layer_id = ?"),
            ),
        };
        if let Some((_, region_id)) = self.region {
            values.push(Value::Integer(region_id));
        }

        let name_condition = self.name_pattern.as_ref().map(|pattern| {
            values.push(Value::Text(format!("%{}%", escape_like(pattern))));
            "c.name LIKE ? ESCAPE '\\'"
        });

        let policy_condition = self.available_policy.as_ref().map(|policy_name| {
            values.push(Value::Text(policy_name.clone()));
            "EXISTS (SELECT 1 FROM policy p WHERE p.center_id = c.id AND p.name = ? AND p.is_available = 1)"
        });

        let mut builder = SqlQueryBuilder::new(select)
            .and_if(region_condition)
            .and_if(name_condition)
            .and_if(policy_condition)
            .order_by("c.id ASC");
        if let Some(n) = self.limit {
            builder = builder.limit(n);
        }

        (builder.build(), values)
    }
}
