//! SQL text for a [`QueryPlan`].

use slv_core::{QueryPlan, SchemaMap};

/// Render the `select` statement for `plan`. Conditions are joined with
/// `and` in plan order.
pub fn select_statement(schema: &SchemaMap, plan: &QueryPlan) -> String {
    let mut sql = format!(
        "select {} from {}",
        schema.columns().join(", "),
        schema.table
    );
    if !plan.conditions.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&plan.conditions.join(" and "));
    }
    if !plan.order.is_empty() {
        sql.push_str(" order by ");
        sql.push_str(&plan.order);
    }
    if let Some(limit) = plan.limit {
        sql.push_str(&format!(" limit {limit}"));
    }
    sql
}
