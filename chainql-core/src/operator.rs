//! SQL operator types and conversions

use std::borrow::Cow;
use std::fmt::{self, Display};

use crate::{Error, Result};

/// SQL comparison operator placed between a column and its operand.
///
/// Operator text is written into the statement verbatim, so only the
/// built-in constants, membership lists and [`Operator::custom`] operators are
/// accepted when a statement is composed. Anything else parsed from a string
/// fails validation instead of reaching the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    text: Cow<'static, str>,
    trusted: bool,
}

impl Operator {
    pub const GT: Self = Self::builtin(">");
    pub const LT: Self = Self::builtin("<");
    pub const EQ: Self = Self::builtin("=");
    pub const NEQ: Self = Self::builtin("!=");
    pub const GTE: Self = Self::builtin(">=");
    pub const LTE: Self = Self::builtin("<=");
    pub const LIKE: Self = Self::builtin("LIKE");
    pub const NOT_LIKE: Self = Self::builtin("NOT LIKE");
    pub const ILIKE: Self = Self::builtin("ILIKE");
    pub const IS_NULL: Self = Self::builtin("IS NULL");
    pub const IS_NOT_NULL: Self = Self::builtin("IS NOT NULL");

    const fn builtin(text: &'static str) -> Self {
        Operator {
            text: Cow::Borrowed(text),
            trusted: true,
        }
    }

    /// Create a custom operator for database-specific operations.
    ///
    /// The text must not contain `?`: the operand placeholder is appended
    /// after it, and a second marker would shift every later parameter.
    /// Such operators fail validation when the statement is composed.
    ///
    /// # Examples
    /// ```
    /// use chainql_core::Operator;
    ///
    /// // PostgreSQL full-text search
    /// let fts_op = Operator::custom("@@");
    /// assert_eq!(fts_op.as_str(), "@@");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Self::builtin(op)
    }

    /// `IN (?,?,...)` with one placeholder per value
    pub fn in_list(count: usize) -> Self {
        Self::membership("IN", count)
    }

    /// `NOT IN (?,?,...)` with one placeholder per value
    pub fn not_in_list(count: usize) -> Self {
        Self::membership("NOT IN", count)
    }

    fn membership(keyword: &str, count: usize) -> Self {
        let placeholders = vec!["?"; count].join(",");
        Operator {
            text: Cow::Owned(format!("{} ({})", keyword, placeholders)),
            trusted: true,
        }
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `IS NULL` / `IS NOT NULL`: rendered without an operand
    pub fn is_null_check(&self) -> bool {
        matches!(self.as_str(), "IS NULL" | "IS NOT NULL")
    }

    /// Membership operators carry their own placeholders
    pub fn is_membership(&self) -> bool {
        let text = self.as_str();
        (text.starts_with("IN (") || text.starts_with("NOT IN (")) && text.ends_with(')')
    }

    /// Number of `?` markers embedded in the operator text
    pub fn placeholder_count(&self) -> usize {
        self.text.matches('?').count()
    }

    /// Reject operator text that did not come from a known or custom
    /// operator, and custom text carrying its own `?` markers
    pub fn validate(&self) -> Result<()> {
        if !self.trusted {
            return Err(Error::invalid_query(format!(
                "Unknown operator '{}'. Use Operator constants, where_in/where_not_in, or Operator::custom",
                self.text
            )));
        }
        if !self.is_membership() && self.placeholder_count() > 0 {
            return Err(Error::invalid_query(format!(
                "Operator '{}' contains a '?' placeholder",
                self.text
            )));
        }
        Ok(())
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// String operators are matched case-insensitively against the known set;
/// unknown text is kept but fails [`Operator::validate`].
impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        match self.trim().to_uppercase().as_str() {
            ">" => Operator::GT,
            "<" => Operator::LT,
            "=" => Operator::EQ,
            "!=" | "<>" => Operator::NEQ,
            ">=" => Operator::GTE,
            "<=" => Operator::LTE,
            "LIKE" => Operator::LIKE,
            "NOT LIKE" => Operator::NOT_LIKE,
            "ILIKE" => Operator::ILIKE,
            "IS NULL" => Operator::IS_NULL,
            "IS NOT NULL" => Operator::IS_NOT_NULL,
            _ => Operator {
                text: Cow::Owned(self.to_string()),
                trusted: false,
            },
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const LIKE: Operator = Operator::LIKE;
    pub const NOT_LIKE: Operator = Operator::NOT_LIKE;
    pub const ILIKE: Operator = Operator::ILIKE;
    pub const IS_NULL: Operator = Operator::IS_NULL;
    pub const IS_NOT_NULL: Operator = Operator::IS_NOT_NULL;
}
