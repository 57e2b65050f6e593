use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------      Points       -----------------------------------------------------------
/// A loyalty-point amount, stored as an integer number of centipoints (hundredths of a point).
///
/// Keeping the ledger integral avoids floating-point drift in balance arithmetic. On the wire the
/// amount is a plain JSON number (e.g. `500.5`), which is the format the accrual engine and the
/// user API both speak.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Points(i64);

op!(binary Points, Add, add);
op!(binary Points, Sub, sub);
op!(inplace Points, SubAssign, sub_assign);
op!(unary Points, Neg, neg);

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in points: {0}")]
pub struct PointsConversionError(String);

impl From<i64> for Points {
    fn from(centipoints: i64) -> Self {
        Self(centipoints)
    }
}

impl PartialEq for Points {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Points {}

impl TryFrom<f64> for Points {
    type Error = PointsConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PointsConversionError(format!("{value} is not a finite number")));
        }
        let centipoints = (value * 100.0).round();
        if centipoints.abs() >= i64::MAX as f64 {
            return Err(PointsConversionError(format!("{value} is too large to represent")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(centipoints as i64))
    }
}

impl FromStr for Points {
    type Err = PointsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|e| PointsConversionError(e.to_string()))?;
        Self::try_from(value)
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl Points {
    /// The raw centipoint value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Construct from a whole number of points
    pub fn from_points(points: i64) -> Self {
        Self(points * 100)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
