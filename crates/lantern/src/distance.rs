//! Driver-agnostic distance fragments for raw SQL queries.
//!
//! The diesel DSL in [`crate::expression`] covers query-builder usage;
//! this module serves callers that assemble SQL strings themselves and
//! only need the `left <op> right` fragment rendered consistently.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Distance metric provided by the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance.
    ///
    /// The shipping extension computes the squared distance for this
    /// operator; callers ordering by it are unaffected, callers reading
    /// the value back should expect the square.
    #[default]
    L2,
    /// Max inner product.
    InnerProduct,
    /// Cosine distance.
    Cosine,
}

impl DistanceMetric {
    /// Returns the SQL operator for this metric.
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::L2 => "<->",
            Self::InnerProduct => "<#>",
            Self::Cosine => "<=>",
        }
    }
}

/// One side of a distance computation, resolved at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A column reference, rendered as given.
    Column(Cow<'static, str>),
    /// A literal vector, rendered as a typed array literal.
    Vector(Vector),
    /// A pre-rendered SQL fragment, e.g. a subexpression.
    Raw(String),
}

impl Operand {
    /// Creates a column operand.
    pub fn column(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Column(name.into())
    }

    /// Creates a literal vector operand.
    pub fn vector(value: impl Into<Vector>) -> Self {
        Self::Vector(value.into())
    }

    /// Creates a raw SQL operand.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Vector(vector) => f.write_str(&vector.sql_literal()),
            Self::Raw(sql) => f.write_str(sql),
        }
    }
}

impl From<Vector> for Operand {
    fn from(value: Vector) -> Self {
        Self::Vector(value)
    }
}

/// A `left <op> right` distance computation.
///
/// Lives only for the duration of query construction; [`to_sql`] renders
/// it to text and the value is discarded. No dimensionality validation
/// happens here, mismatches surface as database errors at execution
/// time.
///
/// [`to_sql`]: DistanceExpression::to_sql
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceExpression {
    metric: DistanceMetric,
    left: Operand,
    right: Operand,
}

impl DistanceExpression {
    /// Creates a distance expression over two operands.
    pub fn new(metric: DistanceMetric, left: Operand, right: Operand) -> Self {
        Self {
            metric,
            left,
            right,
        }
    }

    /// Euclidean distance between two operands.
    pub fn l2(left: Operand, right: Operand) -> Self {
        Self::new(DistanceMetric::L2, left, right)
    }

    /// Max inner product between two operands.
    pub fn max_inner_product(left: Operand, right: Operand) -> Self {
        Self::new(DistanceMetric::InnerProduct, left, right)
    }

    /// Cosine distance between two operands.
    pub fn cosine(left: Operand, right: Operand) -> Self {
        Self::new(DistanceMetric::Cosine, left, right)
    }

    /// Returns the metric of this expression.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Renders the expression as a SQL fragment.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DistanceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.metric.operator(), self.right)
    }
}
