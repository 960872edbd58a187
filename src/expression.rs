//! Sandboxed expression evaluator
//!
//! User input such as `"-0.5 * x + sin(t)"` is compiled once into an
//! `evalexpr` operator tree and evaluated many times against a fixed,
//! declared set of variables.
//!
//! # Sandbox
//!
//! Evaluation goes through `Bindings`, our own `evalexpr::Context`:
//!
//! - only the declared variables plus the constants `pi` and `e` resolve,
//! - only the functions of [`VOCABULARY`] can be called,
//! - `evalexpr` builtins are disabled (no string helpers, no `if`),
//! - the context is immutable, so assignments fail.
//!
//! Nothing here can reach files, processes or host state.
//!
//! # Literals
//!
//! Integer literals are promoted to floats before parsing so that `1/2`
//! evaluates to `0.5`. `**` is accepted as an alias of `^`.
//!
//! # Example
//!
//! ```rust
//! use deq_rs::expression::Expression;
//!
//! let source = Expression::compile("-x + t^2", &["t", "x"]).unwrap();
//! assert_eq!(source.call(&[2.0, 1.0]).unwrap(), 3.0);
//! ```

use evalexpr::{build_operator_tree, Context, EvalexprError, EvalexprResult, Node, Value};
use std::fmt;
use thiserror::Error;

/// Largest number of variables an expression may declare (t, x, y)
pub const MAX_VARIABLES: usize = 3;

static PI: Value = Value::Float(std::f64::consts::PI);
static EULER: Value = Value::Float(std::f64::consts::E);

// =================================================================================================
// Errors
// =================================================================================================

/// Reasons an expression is rejected or fails to evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("syntax error: {message}")]
    Syntax { message: String },

    #[error("unknown variable '{name}' (allowed: {allowed})")]
    UnknownVariable { name: String, allowed: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("expression does not produce a number: {message}")]
    NotNumeric { message: String },

    #[error("expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("failed to evaluate '{expression}': {message}")]
    Evaluation { expression: String, message: String },
}

// =================================================================================================
// Math vocabulary
// =================================================================================================

/// A callable entry of the vocabulary
#[derive(Clone, Copy)]
pub enum MathFunction {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
}

impl MathFunction {
    fn apply(&self, argument: &Value) -> EvalexprResult<f64> {
        match self {
            MathFunction::Unary(f) => Ok(f(argument.as_number()?)),
            MathFunction::Binary(f) => {
                let arguments = argument.as_fixed_len_tuple(2)?;
                Ok(f(arguments[0].as_number()?, arguments[1].as_number()?))
            }
        }
    }

    /// Look a function up by name
    pub fn lookup(name: &str) -> Option<MathFunction> {
        VOCABULARY
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, function)| *function)
    }
}

impl fmt::Debug for MathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathFunction::Unary(_) => write!(f, "Unary"),
            MathFunction::Binary(_) => write!(f, "Binary"),
        }
    }
}

fn sign(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.signum() }
}

/// Every function an expression may call.
pub const VOCABULARY: &[(&str, MathFunction)] = &[
    ("sin", MathFunction::Unary(f64::sin)),
    ("cos", MathFunction::Unary(f64::cos)),
    ("tan", MathFunction::Unary(f64::tan)),
    ("asin", MathFunction::Unary(f64::asin)),
    ("acos", MathFunction::Unary(f64::acos)),
    ("atan", MathFunction::Unary(f64::atan)),
    ("sinh", MathFunction::Unary(f64::sinh)),
    ("cosh", MathFunction::Unary(f64::cosh)),
    ("tanh", MathFunction::Unary(f64::tanh)),
    ("exp", MathFunction::Unary(f64::exp)),
    ("ln", MathFunction::Unary(f64::ln)),
    ("log", MathFunction::Unary(f64::ln)),
    ("log10", MathFunction::Unary(f64::log10)),
    ("log2", MathFunction::Unary(f64::log2)),
    ("sqrt", MathFunction::Unary(f64::sqrt)),
    ("cbrt", MathFunction::Unary(f64::cbrt)),
    ("abs", MathFunction::Unary(f64::abs)),
    ("floor", MathFunction::Unary(f64::floor)),
    ("ceil", MathFunction::Unary(f64::ceil)),
    ("round", MathFunction::Unary(f64::round)),
    ("sign", MathFunction::Unary(sign)),
    ("atan2", MathFunction::Binary(f64::atan2)),
    ("min", MathFunction::Binary(f64::min)),
    ("max", MathFunction::Binary(f64::max)),
    ("pow", MathFunction::Binary(f64::powf)),
];

const CONSTANTS: &[&str] = &["pi", "e"];

// =================================================================================================
// Evaluation context
// =================================================================================================

/// Immutable variable bindings for one evaluation
struct Bindings<'a> {
    names: &'a [&'static str],
    values: [Value; MAX_VARIABLES],
}

impl<'a> Bindings<'a> {
    fn new(names: &'a [&'static str], arguments: &[f64]) -> Self {
        let values = std::array::from_fn(|i| Value::Float(arguments.get(i).copied().unwrap_or(0.0)));
        Self { names, values }
    }
}

impl Context for Bindings<'_> {
    fn get_value(&self, identifier: &str) -> Option<&Value> {
        if let Some(index) = self.names.iter().position(|name| *name == identifier) {
            return self.values.get(index);
        }
        match identifier {
            "pi" => Some(&PI),
            "e" => Some(&EULER),
            _ => None,
        }
    }

    fn call_function(&self, identifier: &str, argument: &Value) -> EvalexprResult<Value> {
        let function = MathFunction::lookup(identifier)
            .ok_or_else(|| EvalexprError::FunctionIdentifierNotFound(identifier.to_string()))?;
        function.apply(argument).map(Value::Float)
    }

    fn are_builtin_functions_disabled(&self) -> bool {
        true
    }

    fn set_builtin_functions_disabled(&mut self, disabled: bool) -> EvalexprResult<()> {
        if disabled {
            Ok(())
        } else {
            Err(EvalexprError::CustomMessage(
                "builtin functions are not available in solver expressions".to_string(),
            ))
        }
    }
}

// =================================================================================================
// Expression
// =================================================================================================

/// A compiled expression over a declared set of variables.
///
/// Cheap to evaluate, `Send + Sync`, and cloneable so one compiled source
/// can be shared between the parse and solve steps.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    variables: &'static [&'static str],
    tree: Node,
}

impl Expression {
    /// Compile `source` over `variables`.
    ///
    /// Fails when the text does not parse, references an undeclared
    /// variable or an unknown function, or does not evaluate to a number.
    pub fn compile(source: &str, variables: &'static [&'static str]) -> Result<Self, ExpressionError> {
        if variables.len() > MAX_VARIABLES {
            return Err(ExpressionError::ArityMismatch {
                expected: MAX_VARIABLES,
                got: variables.len(),
            });
        }

        let normalised = normalise(source);
        if normalised.trim().is_empty() {
            return Err(ExpressionError::Empty);
        }

        let tree = build_operator_tree(&normalised).map_err(|e| ExpressionError::Syntax {
            message: e.to_string(),
        })?;

        for name in tree.iter_variable_identifiers() {
            if !variables.contains(&name) && !CONSTANTS.contains(&name) {
                return Err(ExpressionError::UnknownVariable {
                    name: name.to_string(),
                    allowed: variables.join(", "),
                });
            }
        }

        for name in tree.iter_function_identifiers() {
            if MathFunction::lookup(name).is_none() {
                return Err(ExpressionError::UnknownFunction { name: name.to_string() });
            }
        }

        let expression = Self {
            source: source.to_string(),
            variables,
            tree,
        };

        // Probe once: type errors (booleans, strings, wrong arity, assignments)
        // do not depend on the argument values.
        let probe = [0.0; MAX_VARIABLES];
        expression
            .tree
            .eval_number_with_context(&Bindings::new(variables, &probe[..variables.len()]))
            .map_err(|e| ExpressionError::NotNumeric { message: e.to_string() })?;

        Ok(expression)
    }

    /// Evaluate with `arguments` bound positionally to the declared variables.
    pub fn call(&self, arguments: &[f64]) -> Result<f64, ExpressionError> {
        if arguments.len() != self.variables.len() {
            return Err(ExpressionError::ArityMismatch {
                expected: self.variables.len(),
                got: arguments.len(),
            });
        }

        self.tree
            .eval_number_with_context(&Bindings::new(self.variables, arguments))
            .map_err(|e| ExpressionError::Evaluation {
                expression: self.source.clone(),
                message: e.to_string(),
            })
    }

    /// Original source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared variables, in argument order
    pub fn variables(&self) -> &[&'static str] {
        self.variables
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f({}) = {}", self.variables.join(", "), self.source)
    }
}

// =================================================================================================
// Source normalisation
// =================================================================================================

/// Rewrite `**` to `^` and promote bare integer literals to floats.
fn normalise(source: &str) -> String {
    let source = source.replace("**", "^");
    let mut normalised = String::with_capacity(source.len() + 8);
    let mut token = String::new();

    for character in source.chars() {
        let continues_token = character.is_ascii_alphanumeric() || character == '_' || character == '.';
        let exponent_sign = (character == '+' || character == '-')
            && token.starts_with(|c: char| c.is_ascii_digit())
            && token.ends_with(['e', 'E']);

        if continues_token || exponent_sign {
            token.push(character);
        } else {
            flush_token(&mut normalised, &mut token);
            normalised.push(character);
        }
    }
    flush_token(&mut normalised, &mut token);

    normalised
}

fn flush_token(normalised: &mut String, token: &mut String) {
    normalised.push_str(token);
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        normalised.push_str(".0");
    }
    token.clear();
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TX: &[&str] = &["t", "x"];

    fn eval(source: &str, arguments: &[f64]) -> f64 {
        Expression::compile(source, TX).unwrap().call(arguments).unwrap()
    }

    #[test]
    fn test_linear_source() {
        assert_eq!(eval("x", &[0.0, 3.0]), 3.0);
        assert_eq!(eval("2*t - x", &[1.5, 1.0]), 2.0);
    }

    #[test]
    fn test_integer_division_is_real_division() {
        assert_eq!(eval("1/2", &[0.0, 0.0]), 0.5);
        assert_eq!(eval("x/4", &[0.0, 1.0]), 0.25);
    }

    #[test]
    fn test_power_aliases() {
        assert_eq!(eval("x**2", &[0.0, 3.0]), 9.0);
        assert_eq!(eval("x^2", &[0.0, 3.0]), 9.0);
        assert_eq!(eval("pow(x, 3)", &[0.0, 2.0]), 8.0);
    }

    #[test]
    fn test_vocabulary_and_constants() {
        assert!((eval("sin(pi/2)", &[0.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!((eval("exp(1) - e", &[0.0, 0.0])).abs() < 1e-12);
        assert!((eval("atan2(1, 1)", &[0.0, 0.0]) - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(eval("max(t, x)", &[1.0, 4.0]), 4.0);
        assert_eq!(eval("sign(-x)", &[0.0, 2.0]), -1.0);
    }

    #[test]
    fn test_identifiers_with_digits_are_untouched() {
        assert_eq!(normalise("x2 + 10"), "x2 + 10.0");
        assert_eq!(normalise("1.5*x"), "1.5*x");
        assert_eq!(normalise("2e-3*x"), "2e-3*x");
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        let result = Expression::compile("x + z", TX);
        assert!(matches!(result, Err(ExpressionError::UnknownVariable { ref name, .. }) if name == "z"));
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let result = Expression::compile("system(x)", TX);
        assert!(matches!(result, Err(ExpressionError::UnknownFunction { .. })));
    }

    #[test]
    fn test_evalexpr_builtins_are_not_reachable() {
        let result = Expression::compile("str::len(\"abc\")", TX);
        assert!(result.is_err());

        let result = Expression::compile("math::sin(x)", TX);
        assert!(result.is_err());
    }

    #[test]
    fn test_syntax_error() {
        assert!(Expression::compile("x +", TX).is_err());
        assert!(matches!(
            Expression::compile("(x", TX),
            Err(ExpressionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(Expression::compile("   ", TX).unwrap_err(), ExpressionError::Empty);
    }

    #[test]
    fn test_boolean_expression_is_not_numeric() {
        assert!(matches!(
            Expression::compile("x > 1", TX),
            Err(ExpressionError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_assignment_is_rejected() {
        assert!(Expression::compile("x = 3", TX).is_err());
    }

    #[test]
    fn test_wrong_arity_call() {
        let expression = Expression::compile("x", TX).unwrap();
        assert_eq!(
            expression.call(&[1.0]).unwrap_err(),
            ExpressionError::ArityMismatch { expected: 2, got: 1 }
        );
    }

    #[test]
    fn test_expression_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
    }

    #[test]
    fn test_display() {
        let expression = Expression::compile("x", TX).unwrap();
        assert_eq!(expression.to_string(), "f(t, x) = x");
    }
}
