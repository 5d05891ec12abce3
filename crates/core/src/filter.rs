//! Query filters for vector search
//!
//! Filters are built from [`Feature`] handles with comparison methods and
//! combined into a tree with `&` and `|`:
//!
//! ```
//! use plumage_core::{Feature, FilterExpr};
//!
//! let f1 = Feature::new("f1");
//! let f2 = Feature::new("f2");
//! let expr: FilterExpr = (f1.gt(10) & f2.eq("a")) | f1.le(0);
//! ```
//!
//! The tree is purely declarative. The query engine compiles it into the
//! vector database's query language; nothing is evaluated client-side.

use crate::types::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::ops::{BitAnd, BitOr};

/// Comparison operator of a single filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOp {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Contained in a set of values
    In,
    /// Substring match
    Like,
}

/// A single comparison between a feature and a constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Feature the condition applies to
    pub feature: Feature,
    /// Comparison operator
    pub operator: FilterOp,
    /// Constant operand; an array for `In`, a string for `Like`
    pub value: JsonValue,
}

impl FilterCondition {
    /// Create a condition directly; prefer the methods on [`Feature`]
    pub fn new(feature: Feature, operator: FilterOp, value: JsonValue) -> Self {
        Self {
            feature,
            operator,
            value,
        }
    }
}

/// A tree of filter conditions
///
/// `Single` carries exactly one operand. It arises when a lone condition is
/// promoted to a composite and compiles exactly as its child does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Leaf condition
    Condition(FilterCondition),
    /// Composite with one operand
    Single(Box<FilterExpr>),
    /// Both operands must hold
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// At least one operand must hold
    Or(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    /// Promote one expression to a composite
    pub fn single(expr: impl Into<FilterExpr>) -> Self {
        FilterExpr::Single(Box::new(expr.into()))
    }

    /// Conjunction of two expressions
    pub fn and(left: impl Into<FilterExpr>, right: impl Into<FilterExpr>) -> Self {
        FilterExpr::And(Box::new(left.into()), Box::new(right.into()))
    }

    /// Disjunction of two expressions
    pub fn or(left: impl Into<FilterExpr>, right: impl Into<FilterExpr>) -> Self {
        FilterExpr::Or(Box::new(left.into()), Box::new(right.into()))
    }

    /// Iterate over every leaf condition in the tree, left to right
    pub fn conditions(&self) -> Vec<&FilterCondition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a FilterCondition>) {
        match self {
            FilterExpr::Condition(c) => out.push(c),
            FilterExpr::Single(inner) => inner.collect_conditions(out),
            FilterExpr::And(l, r) | FilterExpr::Or(l, r) => {
                l.collect_conditions(out);
                r.collect_conditions(out);
            }
        }
    }
}

impl From<FilterCondition> for FilterExpr {
    fn from(c: FilterCondition) -> Self {
        FilterExpr::Condition(c)
    }
}

// ============================================================================
// Operator overloads: `a & b` and `a | b` build the tree
// ============================================================================

impl<R: Into<FilterExpr>> BitAnd<R> for FilterCondition {
    type Output = FilterExpr;

    fn bitand(self, rhs: R) -> FilterExpr {
        FilterExpr::and(self, rhs)
    }
}

impl<R: Into<FilterExpr>> BitOr<R> for FilterCondition {
    type Output = FilterExpr;

    fn bitor(self, rhs: R) -> FilterExpr {
        FilterExpr::or(self, rhs)
    }
}

impl<R: Into<FilterExpr>> BitAnd<R> for FilterExpr {
    type Output = FilterExpr;

    fn bitand(self, rhs: R) -> FilterExpr {
        FilterExpr::and(self, rhs)
    }
}

impl<R: Into<FilterExpr>> BitOr<R> for FilterExpr {
    type Output = FilterExpr;

    fn bitor(self, rhs: R) -> FilterExpr {
        FilterExpr::or(self, rhs)
    }
}

// ============================================================================
// Condition builders on Feature
// ============================================================================

impl Feature {
    /// `feature == value`
    pub fn eq(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Eq, value.into())
    }

    /// `feature != value`
    pub fn ne(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Ne, value.into())
    }

    /// `feature > value`
    pub fn gt(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Gt, value.into())
    }

    /// `feature >= value`
    pub fn ge(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Ge, value.into())
    }

    /// `feature < value`
    pub fn lt(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Lt, value.into())
    }

    /// `feature <= value`
    pub fn le(&self, value: impl Into<JsonValue>) -> FilterCondition {
        FilterCondition::new(self.clone(), FilterOp::Le, value.into())
    }

    /// `feature` is one of `values`
    pub fn isin<V: Into<JsonValue>>(&self, values: Vec<V>) -> FilterCondition {
        let array = values.into_iter().map(Into::into).collect::<Vec<_>>();
        FilterCondition::new(self.clone(), FilterOp::In, JsonValue::Array(array))
    }

    /// `feature` contains `pattern` as a substring
    pub fn like(&self, pattern: impl Into<String>) -> FilterCondition {
        FilterCondition::new(
            self.clone(),
            FilterOp::Like,
            JsonValue::String(pattern.into()),
        )
    }
}
