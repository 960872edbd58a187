//! Typed access to raw request parameters
//!
//! Requests arrive as a JSON-like key→value mapping ([`RawParams`]).
//! [`Params`] wraps one node of that mapping and remembers its dotted path
//! so that every error names the exact offending field, for example
//! `boundary.left_condition.type`.
//!
//! Numbers may be given as JSON numbers or as numeric strings (`"0.5"`),
//! which is what form-based front ends tend to send.

use serde_json::Value;

use crate::error::EquationError;
use crate::expression::Expression;
use crate::solver::{Boundary, BoundaryCondition, BoundaryKind};

/// Raw, untyped request parameters
pub type RawParams = Value;

/// Variables visible to boundary condition functions
pub const BOUNDARY_VARIABLES: &[&str] = &["t"];

/// Variables visible to initial condition functions
pub const INITIAL_CONDITION_VARIABLES: &[&str] = &["x"];

/// One node of the raw parameter tree
#[derive(Debug, Clone)]
pub struct Params<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Params<'a> {
    /// Wrap the root of a parameter tree
    pub fn root(value: &'a Value) -> Result<Self, EquationError> {
        Self::at(value, String::new())
    }

    fn at(value: &'a Value, path: String) -> Result<Self, EquationError> {
        if !value.is_object() {
            return Err(EquationError::NotAMapping {
                field: display_path(&path),
            });
        }
        Ok(Self { value, path })
    }

    pub(crate) fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &str) -> Result<&'a Value, EquationError> {
        match self.value.get(key) {
            Some(Value::Null) | None => Err(EquationError::MissingField {
                field: self.path_of(key),
            }),
            Some(value) => Ok(value),
        }
    }

    /// Real number under `key`
    pub fn number(&self, key: &str) -> Result<f64, EquationError> {
        let value = self.get(key)?;
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        number.ok_or_else(|| EquationError::NotNumeric {
            field: self.path_of(key),
            value: value.to_string(),
        })
    }

    /// Finite, strictly positive real number under `key`
    pub fn positive(&self, key: &str) -> Result<f64, EquationError> {
        let number = self.number(key)?;
        if !number.is_finite() || number <= 0.0 {
            return Err(EquationError::InvalidValue {
                field: self.path_of(key),
                reason: format!("must be a finite number greater than 0, got {number}"),
            });
        }
        Ok(number)
    }

    /// Finite real number under `key`
    pub fn finite(&self, key: &str) -> Result<f64, EquationError> {
        let number = self.number(key)?;
        if !number.is_finite() {
            return Err(EquationError::InvalidValue {
                field: self.path_of(key),
                reason: format!("must be finite, got {number}"),
            });
        }
        Ok(number)
    }

    /// Integral sample count under `key`, at least `minimum`
    pub fn count(&self, key: &str, minimum: usize) -> Result<usize, EquationError> {
        let number = self.number(key)?;
        if !number.is_finite() || number.fract() != 0.0 || number < 0.0 || number > u32::MAX as f64 {
            return Err(EquationError::NotNumeric {
                field: self.path_of(key),
                value: number.to_string(),
            });
        }

        let count = number as usize;
        if count < minimum {
            return Err(EquationError::InvalidValue {
                field: self.path_of(key),
                reason: format!("must be at least {minimum}, got {count}"),
            });
        }
        Ok(count)
    }

    /// String under `key`
    pub fn text(&self, key: &str) -> Result<&'a str, EquationError> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| EquationError::InvalidValue {
            field: self.path_of(key),
            reason: format!("must be a string, got {value}"),
        })
    }

    /// Expression over `variables` under `key`
    pub fn expression(&self, key: &str, variables: &'static [&'static str]) -> Result<Expression, EquationError> {
        let source = self.text(key)?;
        compile(source, variables, self.path_of(key))
    }

    /// Nested mapping under `key`
    pub fn nested(&self, key: &str) -> Result<Params<'a>, EquationError> {
        let value = self.get(key)?;
        Params::at(value, self.path_of(key))
    }

    /// The `index`-th initial condition expression
    ///
    /// Accepts either a single string (index 0 only) or a list of strings.
    pub fn initial_condition(&self, key: &str, index: usize) -> Result<Expression, EquationError> {
        let field = format!("{}[{}]", self.path_of(key), index);
        let source = match self.get(key)? {
            Value::String(source) if index == 0 => source.as_str(),
            Value::Array(items) => match items.get(index) {
                Some(Value::String(source)) => source.as_str(),
                Some(other) => {
                    return Err(EquationError::InvalidValue {
                        field,
                        reason: format!("must be a string, got {other}"),
                    })
                }
                None => return Err(EquationError::MissingField { field }),
            },
            _ => return Err(EquationError::MissingField { field }),
        };

        compile(source, INITIAL_CONDITION_VARIABLES, field)
    }

    /// `boundary.left_condition` / `boundary.right_condition`
    pub fn boundary(&self) -> Result<Boundary, EquationError> {
        let boundary = self.nested("boundary")?;
        let left = boundary.nested("left_condition")?.boundary_condition()?;
        let right = boundary.nested("right_condition")?.boundary_condition()?;

        Ok(Boundary::new(left, right))
    }

    fn boundary_condition(&self) -> Result<BoundaryCondition, EquationError> {
        let kind_text = self.text("type")?;
        let kind = kind_text
            .parse::<BoundaryKind>()
            .map_err(|_| EquationError::UnknownBoundaryKind {
                field: self.path_of("type"),
                value: kind_text.to_string(),
            })?;
        let function = self.expression("function", BOUNDARY_VARIABLES)?;

        Ok(BoundaryCondition::new(kind, function))
    }
}

fn compile(source: &str, variables: &'static [&'static str], field: String) -> Result<Expression, EquationError> {
    Expression::compile(source, variables)
        .map_err(|source| EquationError::InvalidExpression { field, source })
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "parameters".to_string() } else { path.to_string() }
}

// =================================================================================================
// Tests
// =================================================================================================
