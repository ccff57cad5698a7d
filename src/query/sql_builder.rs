// ==========================================
// 电机来料检验数据服务 - SQL 查询构建器
// ==========================================
// 职责: 组合 等值过滤 / 谓词函数 / 分组 / 排序，产出参数化 SQL
// 约束: 所有值均以 `?` 占位参数传递，列名仅允许标识符字符
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::collections::BTreeMap;

/// SQL 参数值
pub type SqlParam = Value;

/// 等值过滤: 列名 -> 值（BTreeMap 保证拼接顺序稳定）
pub type EqFilters = BTreeMap<String, SqlParam>;

/// 可组合谓词函数（范围 / 模糊 / 关联条件）
pub type Predicate = Box<dyn Fn(PagedQuery) -> PagedQuery + Send + Sync>;

/// 已构建的查询计划（SQL + 参数）
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryPlan {
    /// 执行查询并逐行映射
    pub fn query_rows<T, F>(&self, conn: &Connection, mut map_row: F) -> RepositoryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = conn.prepare(&self.sql)?;
        let rows = stmt
            .query_map(params_from_iter(self.params.iter()), |row| map_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 执行单值查询（COUNT 等）
    pub fn query_scalar(&self, conn: &Connection) -> RepositoryResult<i64> {
        let value = conn.query_row(&self.sql, params_from_iter(self.params.iter()), |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(value)
    }
}

/// 列名是否为合法标识符（允许 `p.created_at` 形式）
pub fn is_valid_column(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// 分页查询构建器（流式 API）
///
/// # 示例
/// ```
/// use vmi_analytics::query::sql_builder::{PagedQuery, SqlParam};
///
/// let query = PagedQuery::new("p.sn, p.created_at", "products p")
///     .where_clause("p.has_defect = ?", [SqlParam::Integer(1)])
///     .and_if("p.batch_number = ?", Some("B01".to_string()))
///     .order_by("p.created_at DESC");
///
/// let plan = query.page_plan(Some((20, 40)));
/// assert_eq!(
///     plan.sql,
///     "SELECT p.sn, p.created_at FROM products p WHERE p.has_defect = ? AND p.batch_number = ? ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
/// );
/// assert_eq!(plan.params.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PagedQuery {
    select_clause: String,
    from_clause: String,
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    group_by_clause: Option<String>,
    order_by_clause: Option<String>,
}

impl PagedQuery {
    /// 创建新的查询构建器
    pub fn new(select: &str, from: &str) -> Self {
        Self {
            select_clause: select.trim().to_string(),
            from_clause: from.trim().to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_clause: None,
            order_by_clause: None,
        }
    }

    /// 追加 JOIN 子句
    pub fn join(mut self, clause: &str) -> Self {
        self.from_clause.push(' ');
        self.from_clause.push_str(clause.trim());
        self
    }

    /// 添加 WHERE 条件及其参数
    pub fn where_clause<I>(mut self, condition: &str, params: I) -> Self
    where
        I: IntoIterator<Item = SqlParam>,
    {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params);
        self
    }

    /// 值存在时才添加条件（单参数）
    pub fn and_if<V: Into<SqlParam>>(self, condition: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.where_clause(condition, [v.into()]),
            None => self,
        }
    }

    /// 添加等值过滤（列名非法时报错）
    pub fn with_filters(mut self, filters: &EqFilters) -> RepositoryResult<Self> {
        for (column, value) in filters {
            if !is_valid_column(column) {
                return Err(RepositoryError::ValidationError(format!(
                    "非法的过滤列名: {}",
                    column
                )));
            }
            self = self.where_clause(&format!("{} = ?", column), [value.clone()]);
        }
        Ok(self)
    }

    /// 依次应用谓词函数
    pub fn apply(self, predicates: &[Predicate]) -> Self {
        predicates.iter().fold(self, |query, predicate| predicate(query))
    }

    /// 添加 GROUP BY 子句
    pub fn group_by(mut self, columns: &str) -> Self {
        self.group_by_clause = Some(columns.to_string());
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    pub fn has_order(&self) -> bool {
        self.order_by_clause
            .as_deref()
            .map(|o| !o.trim().is_empty())
            .unwrap_or(false)
    }

    /// SELECT ... FROM ... WHERE ... GROUP BY ...（不含排序与分页）
    fn base_sql(&self, select: &str) -> String {
        let mut sql = format!("SELECT {} FROM {}", select, self.from_clause);

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(group) = &self.group_by_clause {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        sql
    }

    /// 总数查询（分组查询统计分组数）
    pub fn count_plan(&self) -> QueryPlan {
        let sql = if self.group_by_clause.is_some() {
            format!(
                "SELECT COUNT(*) FROM ({}) AS grouped",
                self.base_sql(&self.select_clause)
            )
        } else {
            self.base_sql("COUNT(*)")
        };

        QueryPlan {
            sql,
            params: self.params.clone(),
        }
    }

    /// 数据查询；`limit_offset` 为 None 时不加行数限制
    pub fn page_plan(&self, limit_offset: Option<(i64, i64)>) -> QueryPlan {
        let mut sql = self.base_sql(&self.select_clause);
        let mut params = self.params.clone();

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some((limit, offset)) = limit_offset {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(limit));
            params.push(Value::Integer(offset));
        }

        QueryPlan { sql, params }
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_select_without_where() {
        let plan = PagedQuery::new("id, name", "suppliers")
            .order_by("id ASC")
            .page_plan(None);

        assert_eq!(plan.sql, "SELECT id, name FROM suppliers ORDER BY id ASC");
        assert!(plan.params.is_empty());
    }

    #[test]
    fn test_and_if_with_none() {
        let plan = PagedQuery::new("*", "products")
            .and_if::<i64>("supplier_id = ?", None)
            .order_by("id ASC")
            .page_plan(None);

        assert!(!plan.sql.contains("WHERE"));
    }

    #[test]
    fn test_with_filters_orders_columns() {
        let mut filters = EqFilters::new();
        filters.insert("production_line".to_string(), Value::Text("L1".to_string()));
        filters.insert("manufacturer".to_string(), Value::Text("ACME".to_string()));

        let plan = PagedQuery::new("*", "production_plans")
            .with_filters(&filters)
            .unwrap()
            .order_by("id ASC")
            .page_plan(None);

        assert_eq!(
            plan.sql,
            "SELECT * FROM production_plans WHERE manufacturer = ? AND production_line = ? ORDER BY id ASC"
        );
        assert_eq!(
            plan.params,
            vec![Value::Text("ACME".to_string()), Value::Text("L1".to_string())]
        );
    }

    #[test]
    fn test_with_filters_rejects_bad_column() {
        let mut filters = EqFilters::new();
        filters.insert("id; DROP TABLE x".to_string(), Value::Integer(1));

        let result = PagedQuery::new("*", "production_plans").with_filters(&filters);
        assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    }

    #[test]
    fn test_count_plan_plain() {
        let plan = PagedQuery::new("p.sn", "products p")
            .join("LEFT JOIN product_models pm ON p.product_model_id = pm.id")
            .where_clause("p.has_defect = ?", [Value::Integer(1)])
            .order_by("p.created_at DESC")
            .count_plan();

        assert_eq!(
            plan.sql,
            "SELECT COUNT(*) FROM products p LEFT JOIN product_models pm ON p.product_model_id = pm.id WHERE p.has_defect = ?"
        );
        assert_eq!(plan.params.len(), 1);
    }

    #[test]
    fn test_count_plan_grouped_uses_subquery() {
        let plan = PagedQuery::new("pm.sn, COUNT(*)", "products p")
            .group_by("pm.sn")
            .order_by("pm.sn")
            .count_plan();

        assert_eq!(
            plan.sql,
            "SELECT COUNT(*) FROM (SELECT pm.sn, COUNT(*) FROM products p GROUP BY pm.sn) AS grouped"
        );
    }

    #[test]
    fn test_apply_predicates_in_order() {
        let predicates: Vec<Predicate> = vec![
            Box::new(|q: PagedQuery| q.where_clause("a = ?", [Value::Integer(1)])),
            Box::new(|q: PagedQuery| q.where_clause("b = ?", [Value::Integer(2)])),
        ];

        let plan = PagedQuery::new("*", "t")
            .apply(&predicates)
            .order_by("id")
            .page_plan(Some((10, 0)));

        assert_eq!(
            plan.sql,
            "SELECT * FROM t WHERE a = ? AND b = ? ORDER BY id LIMIT ? OFFSET ?"
        );
        assert_eq!(
            plan.params,
            vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(10),
                Value::Integer(0)
            ]
        );
    }

    #[test]
    fn test_is_valid_column() {
        assert!(is_valid_column("plan_date"));
        assert!(is_valid_column("p.created_at"));
        assert!(!is_valid_column(""));
        assert!(!is_valid_column("1abc"));
        assert!(!is_valid_column("a b"));
        assert!(!is_valid_column("a'--"));
    }
}
