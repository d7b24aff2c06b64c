//! Search expression builder
//!
//! Builds the textual query expression the repository's search engine
//! consumes: a folder scope clause, a template clause, then one clause
//! per field constraint, AND-joined.
//!
//! Constraint policy:
//! - a value containing a comma is treated as a multi-value constraint
//!   and becomes an OR-combination of `>=` comparisons, one per listed
//!   item; the `>=` polarity is applied regardless of field type;
//! - a value parseable as a date becomes a `>=` lower-bound comparison;
//! - anything else becomes an `=` exact match.

use chrono::{DateTime, NaiveDate};

use crate::values::{FieldValue, FieldValues};

/// Builder for repository search expressions.
#[derive(Debug, Clone)]
pub struct SearchExpression {
    folder: String,
    template: String,
    constraints: Vec<(String, String)>,
}

impl SearchExpression {
    /// Start an expression scoped to a folder and a template.
    pub fn new(folder: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            template: template.into(),
            constraints: Vec::new(),
        }
    }

    /// Add a field constraint.
    pub fn constraint(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.push((field.into(), value.into()));
        self
    }

    /// Add one constraint per field in the bag. Null values are skipped;
    /// constraint order follows the sorted field names so the rendered
    /// expression is deterministic.
    #[must_use]
    pub fn constraints_from(mut self, fields: &FieldValues) -> Self {
        let mut pairs: Vec<(&String, &FieldValue)> =
            fields.iter().filter(|(_, v)| !v.is_null()).collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in pairs {
            self.constraints.push((name.clone(), value.render()));
        }
        self
    }

    /// Render the full expression.
    #[must_use]
    pub fn build(&self) -> String {
        let mut expr = format!(
            "{{LOOKIN=\"{}\"}} & {{TEMPLATE=\"{}\"}}",
            escape_value(&self.folder),
            escape_value(&self.template)
        );

        for (field, value) in &self.constraints {
            expr.push_str(" & ");
            expr.push_str(&clause_for(&self.template, field, value));
        }

        expr
    }
}

/// Render a single constraint clause according to the value policy.
fn clause_for(template: &str, field: &str, value: &str) -> String {
    let subject = format!("{{[{}]:[{}]}}", escape_value(template), escape_value(field));

    if value.contains(',') {
        let alternatives: Vec<String> = value
            .split(',')
            .map(|item| format!("{}>=\"{}\"", subject, escape_value(item.trim())))
            .collect();
        return format!("({})", alternatives.join(" | "));
    }

    if is_date_value(value) {
        return format!("{}>=\"{}\"", subject, escape_value(value));
    }

    format!("{}=\"{}\"", subject, escape_value(value))
}

/// Check whether a constraint value parses as a date.
fn is_date_value(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Escape quotes and braces in values embedded in the expression text.
fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('{', "\\{")
        .replace('}', "\\}")
}
