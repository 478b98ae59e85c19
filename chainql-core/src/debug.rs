//! Human-readable SQL with parameters inlined.
//!
//! Output of this module is for logs and inspection only. It must never be
//! sent to a database: the quoting here is cosmetic, not an escaping scheme.

use crate::Value;

/// Replace each `?` in `sql`, left to right, with a literal rendering of the
/// matching parameter. Placeholders without a parameter are left as `?`.
pub fn render_debug_sql(sql: &str, params: &[Value]) -> String {
    let mut rendered = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter();

    for ch in sql.chars() {
        if ch == '?' {
            match params.next() {
                Some(value) => rendered.push_str(&literal(value)),
                None => rendered.push('?'),
            }
        } else {
            rendered.push(ch);
        }
    }

    rendered
}

/// Literal form of a single value
pub fn literal(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Timestamp(_) => format!("'{}'", value),
        other => other.to_string(),
    }
}
