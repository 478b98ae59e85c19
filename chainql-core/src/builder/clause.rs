//! WHERE / HAVING clause serialization.
//!
//! The parameter list returned next to the clause text follows the `?`
//! markers left to right. Binding is positional, so any drift between the
//! two would bind values to the wrong columns.

use super::common::{Operand, WhereCondition};
use crate::{Error, Result, Value};

/// Render conditions as `a > ? AND b IN (?,?) OR c IS NULL` plus their
/// parameters.
///
/// Connectors apply strictly left to right and the first condition's
/// connector is ignored. No grouping parentheses are added.
pub fn serialize_conditions(conditions: &[WhereCondition]) -> Result<(String, Vec<Value>)> {
    let mut clause = String::new();
    let mut params = Vec::with_capacity(conditions.len());

    for (i, condition) in conditions.iter().enumerate() {
        condition.operator.validate()?;

        if i > 0 {
            clause.push(' ');
            clause.push_str(&condition.connector.to_string());
            clause.push(' ');
        }

        clause.push_str(&condition.column);
        clause.push(' ');
        clause.push_str(condition.operator.as_str());

        if condition.operator.is_null_check() {
            continue;
        }

        if condition.operator.is_membership() {
            let expected = condition.operator.placeholder_count();
            match &condition.operand {
                Operand::List(values) if values.len() == expected => {
                    params.extend(values.iter().cloned());
                }
                Operand::List(values) => {
                    return Err(Error::invalid_query(format!(
                        "{} on '{}' has {} placeholders but {} values",
                        condition.operator,
                        condition.column,
                        expected,
                        values.len()
                    )));
                }
                _ => {
                    return Err(Error::invalid_query(format!(
                        "{} on '{}' requires a list of values",
                        condition.operator, condition.column
                    )));
                }
            }
            continue;
        }

        match &condition.operand {
            Operand::Value(value) => {
                clause.push_str(" ?");
                params.push(value.clone());
            }
            Operand::List(_) => {
                return Err(Error::invalid_query(format!(
                    "operator '{}' on '{}' cannot take a list; use where_in",
                    condition.operator, condition.column
                )));
            }
            Operand::None => {
                return Err(Error::invalid_query(format!(
                    "operator '{}' on '{}' requires a value",
                    condition.operator, condition.column
                )));
            }
        }
    }

    Ok((clause, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::common::WhereConnector;
    use crate::operator::op;
    use crate::Operator;

    fn cond(column: &str, operator: Operator, value: impl Into<Value>) -> WhereCondition {
        WhereCondition::new(column, operator, value.into(), WhereConnector::And)
    }

    fn or_cond(column: &str, operator: Operator, value: impl Into<Value>) -> WhereCondition {
        WhereCondition::new(column, operator, value.into(), WhereConnector::Or)
    }

    #[test]
    fn test_empty_conditions() {
        let (clause, params) = serialize_conditions(&[]).unwrap();
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_first_connector_is_ignored() {
        let (clause, params) = serialize_conditions(&[
            or_cond("age", op::GT, 18),
            cond("status", op::EQ, "active"),
            or_cond("role", op::EQ, "admin"),
        ])
        .unwrap();
        assert_eq!(clause, "age > ? AND status = ? OR role = ?");
        assert_eq!(
            params,
            vec![Value::Int(18), Value::from("active"), Value::from("admin")]
        );
    }

    #[test]
    fn test_null_checks_bind_nothing() {
        let (clause, params) = serialize_conditions(&[
            WhereCondition::null_check("deleted_at", false, WhereConnector::And),
            WhereCondition::null_check("email", true, WhereConnector::And),
        ])
        .unwrap();
        assert_eq!(clause, "deleted_at IS NULL AND email IS NOT NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_membership_expands_in_order() {
        let (clause, params) = serialize_conditions(&[
            cond("age", op::GTE, 21),
            WhereCondition::membership(
                "id",
                vec![3.into(), 1.into(), 2.into()],
                false,
                WhereConnector::And,
            ),
            cond("name", op::LIKE, "J%"),
        ])
        .unwrap();
        assert_eq!(clause, "age >= ? AND id IN (?,?,?) AND name LIKE ?");
        assert_eq!(
            params,
            vec![
                Value::Int(21),
                Value::Int(3),
                Value::Int(1),
                Value::Int(2),
                Value::from("J%"),
            ]
        );
    }

    #[test]
    fn test_placeholders_match_parameter_count() {
        let cases = vec![
            vec![cond("a", op::EQ, 1)],
            vec![
                WhereCondition::null_check("a", true, WhereConnector::And),
                cond("b", op::LT, 2.5),
            ],
            vec![
                WhereCondition::membership("a", vec![1.into()], true, WhereConnector::Or),
                WhereCondition::membership(
                    "b",
                    vec!["x".into(), "y".into()],
                    false,
                    WhereConnector::And,
                ),
                or_cond("c", op::NEQ, Value::Null),
            ],
        ];

        for conditions in cases {
            let (clause, params) = serialize_conditions(&conditions).unwrap();
            assert_eq!(clause.matches('?').count(), params.len(), "{}", clause);
        }
    }

    #[test]
    fn test_membership_count_mismatch_fails() {
        let mut condition =
            WhereCondition::membership("id", vec![1.into(), 2.into()], false, WhereConnector::And);
        condition.operand = Operand::List(vec![Value::Int(1)]);

        let err = serialize_conditions(&[condition]).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert!(err.to_string().contains("2 placeholders but 1 values"));
    }

    #[test]
    fn test_membership_requires_list() {
        let condition = WhereCondition {
            column: "id".into(),
            operator: Operator::in_list(1),
            operand: Operand::Value(Value::Int(1)),
            connector: WhereConnector::And,
        };
        assert!(serialize_conditions(&[condition]).is_err());
    }

    #[test]
    fn test_unknown_operator_fails() {
        let condition = WhereCondition::new(
            "id",
            crate::IntoOperator::into_operator("= 1 OR 1 ="),
            Value::Int(1),
            WhereConnector::And,
        );
        assert!(serialize_conditions(&[condition]).is_err());
    }

    #[test]
    fn test_custom_operator_cannot_add_placeholders() {
        let condition = WhereCondition::new(
            "tags",
            crate::Operator::custom("?|"),
            Value::from("a"),
            WhereConnector::And,
        );
        let err = serialize_conditions(&[condition]).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }
}
