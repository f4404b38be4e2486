use facet::Facet;
use std::fmt;

/// An opaque value passed to, returned from, or read off an instrumented target.
#[derive(Facet, Debug, Clone, PartialEq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Numeric sequence argument, e.g. a line dash pattern.
    Numbers(Vec<f64>),
    /// Host object that has no scalar form, identified by its kind.
    Object(String),
}

impl Value {
    /// Only numbers and strings are tracked by state snapshots.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Text(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Self::Numbers(value)
    }
}

struct Number(f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n.is_nan() {
            f.write_str("NaN")
        } else if n == f64::INFINITY {
            f.write_str("Infinity")
        } else if n == f64::NEG_INFINITY {
            f.write_str("-Infinity")
        } else if n == 0.0 {
            // -0 prints as 0
            f.write_str("0")
        } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
            // shortest digits in exponent form, with an explicit sign on the exponent
            let exp = format!("{n:e}");
            match exp.split_once('e') {
                Some((digits, power)) if !power.starts_with('-') => {
                    write!(f, "{digits}e+{power}")
                }
                _ => f.write_str(&exp),
            }
        } else {
            write!(f, "{n}")
        }
    }
}

/// Literal string conversion, as used when printing call arguments and field values.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => fmt::Display::fmt(&Number(*n), f),
            Self::Text(s) => f.write_str(s),
            Self::Numbers(items) => {
                for (i, n) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(&Number(*n), f)?;
                }
                Ok(())
            }
            Self::Object(kind) => write!(f, "[object {kind}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Value::from(10).to_string(), "10");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn very_large_and_small_numbers_use_exponent_form() {
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(-1.5e25).to_string(), "-1.5e+25");
        assert_eq!(Value::Number(1e-7).to_string(), "1e-7");
        assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Number(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn non_scalars_use_literal_conversion() {
        assert_eq!(Value::from("red").to_string(), "red");
        assert_eq!(Value::from(vec![5.0, 2.5]).to_string(), "5,2.5");
        assert_eq!(Value::Numbers(Vec::new()).to_string(), "");
        assert_eq!(Value::Object("CanvasGradient".into()).to_string(), "[object CanvasGradient]");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn only_numbers_and_text_are_scalar() {
        assert!(Value::from(1).is_scalar());
        assert!(Value::from("x").is_scalar());
        assert!(!Value::Bool(false).is_scalar());
        assert!(!Value::Null.is_scalar());
        assert!(!Value::Numbers(vec![1.0]).is_scalar());
    }
}
