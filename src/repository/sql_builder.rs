// ==========================================
// 산후조리원 디렉터리 - SQL 构建工具
// ==========================================
// 职责: 动态拼接 WHERE / ORDER BY / LIMIT
// 约束: 只拼接结构，值一律走参数绑定
// ==========================================

/// SQL 查询构建器（流式 API）
///
/// # 示例
/// ```
/// use postpartum_centers::repository::sql_builder::SqlQueryBuilder;
///
/// let sql = SqlQueryBuilder::new("SELECT c.id FROM center c")
///     .where_clause("c.region_third_layer_id = ?")
///     .and_if(Some("c.name LIKE ?"))
///     .order_by("c.id ASC")
///     .limit(10)
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT c.id FROM center c WHERE c.region_third_layer_id = ? AND c.name LIKE ? ORDER BY c.id ASC LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    order_by_clause: Option<String>,
    limit_clause: Option<usize>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器（select 可以包含 FROM / JOIN）
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            order_by_clause: None,
            limit_clause: None,
        }
    }

    /// 添加 WHERE 条件
    pub fn where_clause(mut self, condition: &str) -> Self {
        self.where_clauses.push(condition.to_string());
        self
    }

    /// 条件添加 AND 子句
    pub fn and_if(mut self, condition: Option<&str>) -> Self {
        if let Some(cond) = condition {
            self.where_clauses.push(cond.to_string());
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_clause = Some(n);
        self
    }

    /// 构建最终的 SQL 语句
    pub fn build(&self) -> String {
        let mut sql = self.select_clause.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(n) = self.limit_clause {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        sql
    }
}

/// 生成 `?, ?, ?` 形式的占位符列表（用于 IN 子句）
pub fn build_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// 转义 LIKE 通配符，配合 `ESCAPE '\'` 使用
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_without_conditions() {
        let sql = SqlQueryBuilder::new("SELECT * FROM center")
            .and_if(None)
            .build();
        assert_eq!(sql, "SELECT * FROM center");
    }

    #[test]
    fn test_build_placeholders() {
        assert_eq!(build_placeholders(3), "?, ?, ?");
        assert_eq!(build_placeholders(1), "?");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("조리원"), "조리원");
    }
}
