use std::cmp::Ordering;
use std::fmt;

use crate::domain::range::format_float;

/// Runtime value produced by expression evaluation.
///
/// Integer arithmetic stays integral; any operand being a float promotes the
/// result to a float. Division always produces a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn as_f64(self) -> Result<f64, String> {
        match self {
            Value::Int(v) => Ok(v as f64),
            Value::Float(v) => Ok(v),
            Value::Bool(_) => Err("expected a number, found a boolean".to_string()),
        }
    }

    pub fn add(self, rhs: Value) -> Result<Value, String> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_add(b).map(Value::Int).ok_or_else(overflow)
            }
            _ => Ok(Value::Float(self.as_f64()? + rhs.as_f64()?)),
        }
    }

    pub fn sub(self, rhs: Value) -> Result<Value, String> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_sub(b).map(Value::Int).ok_or_else(overflow)
            }
            _ => Ok(Value::Float(self.as_f64()? - rhs.as_f64()?)),
        }
    }

    pub fn mul(self, rhs: Value) -> Result<Value, String> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                a.checked_mul(b).map(Value::Int).ok_or_else(overflow)
            }
            _ => Ok(Value::Float(self.as_f64()? * rhs.as_f64()?)),
        }
    }

    pub fn div(self, rhs: Value) -> Result<Value, String> {
        let denominator = rhs.as_f64()?;
        if denominator == 0.0 {
            return Err("division by zero".to_string());
        }
        Ok(Value::Float(self.as_f64()? / denominator))
    }

    pub fn rem(self, rhs: Value) -> Result<Value, String> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                if b == 0 {
                    Err("division by zero".to_string())
                } else {
                    Ok(Value::Int(a.rem_euclid(b)))
                }
            }
            _ => {
                let denominator = rhs.as_f64()?;
                if denominator == 0.0 {
                    Err("division by zero".to_string())
                } else {
                    Ok(Value::Float(self.as_f64()?.rem_euclid(denominator)))
                }
            }
        }
    }

    pub fn pow(self, rhs: Value) -> Result<Value, String> {
        match (self, rhs) {
            (Value::Int(base), Value::Int(exponent)) if exponent >= 0 => {
                let exponent = u32::try_from(exponent).map_err(|_| overflow())?;
                base.checked_pow(exponent).map(Value::Int).ok_or_else(overflow)
            }
            _ => Ok(Value::Float(self.as_f64()?.powf(rhs.as_f64()?))),
        }
    }

    pub fn neg(self) -> Result<Value, String> {
        match self {
            Value::Int(v) => v.checked_neg().map(Value::Int).ok_or_else(overflow),
            Value::Float(v) => Ok(Value::Float(-v)),
            Value::Bool(_) => Err("cannot negate a boolean".to_string()),
        }
    }

    pub fn compare(self, rhs: Value) -> Result<Ordering, String> {
        let (a, b) = (self.as_f64()?, rhs.as_f64()?);
        a.partial_cmp(&b).ok_or_else(|| "cannot order NaN".to_string())
    }

    pub fn equals(self, rhs: Value) -> Result<bool, String> {
        match (self, rhs) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Bool(_), _) | (_, Value::Bool(_)) => {
                Err("cannot compare a boolean with a number".to_string())
            }
            _ => Ok(self.as_f64()? == rhs.as_f64()?),
        }
    }
}

fn overflow() -> String {
    "integer overflow".to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Bool(v) => write!(f, "{v}"),
        }
    }
}
