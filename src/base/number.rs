use std::fmt::{Display, Formatter};

/// A PDF number, which can be integer or real.
///
/// PDF does not require particular bit widths, so `i64` and `f64` were chosen,
/// respectively.
///
/// NB that values with a decimal dot will be parsed as [`Number::Real`], even if they have no 
/// decimal part.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    Int(i64),
    Real(f64)
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(x) => x as f64,
            Number::Real(x) => x
        }
    }
}

impl From<i64> for Number {
    fn from(x: i64) -> Number {
        Number::Int(x)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Number {
        Number::Real(x)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(x) => write!(f, "{x}"),
            Number::Real(x) => write!(f, "{x}")
        }
    }
}
