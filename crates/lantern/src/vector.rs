//! Embedding values backed by Postgres `real[]` columns.

use std::fmt;
use std::str::FromStr;

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::{Array, Float4};
use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::{LanternError, LanternResult};

/// An embedding vector stored as a Postgres `real[]` value.
///
/// The extension operates on plain float arrays, so this type binds
/// against `Array<Float4>` (and its nullable variant) rather than a
/// dedicated SQL type. SQL `NULL` is modeled as `Option<Vector>` and
/// passes through both directions untouched.
///
/// Plain sequences convert infallibly; [`ndarray`] inputs are validated
/// first. One-dimensional arrays of any numeric element type are
/// accepted, a dynamic-dimensional array with `ndim != 1` is rejected
/// with [`LanternError::Shape`]. Non-numeric element types do not
/// satisfy the conversion bounds and are rejected at compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Array<Float4>)]
#[serde(transparent)]
pub struct Vector(Vec<f32>);

impl Vector {
    /// Returns the vector contents as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Consumes the vector and returns the underlying values.
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }

    /// Returns the dimensionality of the vector.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the vector against an expected column dimensionality.
    ///
    /// The query layer performs no dimensionality validation of its own
    /// (mismatches surface as database errors at execution time); this
    /// is for callers that want to fail before a round-trip.
    pub fn ensure_dimensions(&self, expected: usize) -> LanternResult<()> {
        if self.0.len() != expected {
            return Err(LanternError::dimension_mismatch(expected, self.0.len()));
        }
        Ok(())
    }

    /// Renders the vector as a typed SQL array literal, e.g. `'{1,2,3}'::real[]`.
    pub fn sql_literal(&self) -> String {
        format!("'{}'::real[]", self)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(value: Vec<f32>) -> Self {
        Self(value)
    }
}

impl From<&[f32]> for Vector {
    fn from(value: &[f32]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vector> for Vec<f32> {
    fn from(value: Vector) -> Self {
        value.0
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl FromIterator<f32> for Vector {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> From<Array1<T>> for Vector
where
    T: Into<f64> + Copy,
{
    fn from(value: Array1<T>) -> Self {
        value
            .iter()
            .map(|&element| {
                let wide: f64 = element.into();
                wide as f32
            })
            .collect()
    }
}

impl<T> TryFrom<ArrayD<T>> for Vector
where
    T: Into<f64> + Copy,
{
    type Error = LanternError;

    fn try_from(value: ArrayD<T>) -> Result<Self, Self::Error> {
        if value.ndim() != 1 {
            return Err(LanternError::shape(value.ndim()));
        }

        Ok(value
            .iter()
            .map(|&element| {
                let wide: f64 = element.into();
                wide as f32
            })
            .collect())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("}")
    }
}

impl FromStr for Vector {
    type Err = LanternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| LanternError::parse(s))?
            .trim();

        if body.is_empty() {
            return Ok(Self(Vec::new()));
        }

        body.split(',')
            .map(|element| {
                let element = element.trim();
                element
                    .parse::<f32>()
                    .map_err(|_| LanternError::parse(element))
            })
            .collect()
    }
}

impl ToSql<Array<Float4>, Pg> for Vector {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <Vec<f32> as ToSql<Array<Float4>, Pg>>::to_sql(&self.0, out)
    }
}

impl FromSql<Array<Float4>, Pg> for Vector {
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        <Vec<f32> as FromSql<Array<Float4>, Pg>>::from_sql(value).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn, arr1, arr2};

    use super::*;

    #[test]
    fn from_plain_sequences() {
        let vector = Vector::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(vector.len(), 3);

        let from_slice = Vector::from(&[1.5f32, 2.0][..]);
        assert_eq!(from_slice.as_slice(), &[1.5, 2.0]);
    }

    #[test]
    fn from_one_dimensional_array() {
        let vector = Vector::from(arr1(&[1.0f32, 2.0, 3.0]));
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_integer_array() {
        let vector = Vector::from(arr1(&[1i32, 2, 3]));
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_dynamic_array_checks_shape() {
        let one_dim = ArrayD::from_shape_vec(IxDyn(&[3]), vec![1.0f32, 2.0, 3.0]).unwrap();
        let vector = Vector::try_from(one_dim).unwrap();
        assert_eq!(vector.as_slice(), &[1.0, 2.0, 3.0]);

        let two_dim = arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn();
        let err = Vector::try_from(two_dim).unwrap_err();
        assert!(matches!(err, LanternError::Shape { ndim: 2 }));

        let zero_dim = ArrayD::from_shape_vec(IxDyn(&[]), vec![1.0f32]).unwrap();
        let err = Vector::try_from(zero_dim).unwrap_err();
        assert!(matches!(err, LanternError::Shape { ndim: 0 }));
    }

    #[test]
    fn display_and_parse_roundtrip() {
        let vector = Vector::from(vec![1.0, 1.5, -2.0]);
        assert_eq!(vector.to_string(), "{1,1.5,-2}");
        assert_eq!("{1, 1.5, -2}".parse::<Vector>().unwrap(), vector);
        assert_eq!("{}".parse::<Vector>().unwrap(), Vector::default());
    }

    #[test]
    fn parse_rejects_non_numeric_elements() {
        let err = "{1,abc,3}".parse::<Vector>().unwrap_err();
        assert!(matches!(err, LanternError::Parse { ref value } if value == "abc"));

        let err = "1,2,3".parse::<Vector>().unwrap_err();
        assert!(matches!(err, LanternError::Parse { .. }));
    }

    #[test]
    fn sql_literal_rendering() {
        let vector = Vector::from(vec![1.0, 1.0, 2.0]);
        assert_eq!(vector.sql_literal(), "'{1,1,2}'::real[]");
    }

    #[test]
    fn ensure_dimensions_checks_length() {
        let vector = Vector::from(vec![1.0, 2.0, 3.0]);
        assert!(vector.ensure_dimensions(3).is_ok());

        let err = vector.ensure_dimensions(4).unwrap_err();
        assert!(matches!(
            err,
            LanternError::DimensionMismatch {
                expected: 4,
                actual: 3,
            }
        ));
    }

    #[test]
    fn serde_transparent_representation() {
        let vector = Vector::from(vec![1.0, 2.0]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, "[1.0,2.0]");

        let back: Vector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn null_passes_through_as_option() {
        let value: Option<Vector> = None;
        assert_eq!(value.map(Vector::into_vec), None);
    }
}
