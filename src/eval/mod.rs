//! Restricted expression evaluation for `%eval EXPR%` markers and
//! `%exec begin%` preambles.
//!
//! The grammar is deliberately closed: integer/float arithmetic,
//! comparisons, and a fixed function whitelist, over the variables `i`, `i0`,
//! `i1` and anything a preamble assigns. Templates cannot touch the
//! filesystem, the environment, or anything else in the host process.
//!
//! An `%eval%` marker ends at the first `%` after the expression, so the
//! modulo operator is only usable inside preambles.

mod lexer;
mod parser;
mod value;

pub use value::Value;

use std::collections::BTreeMap;
use std::ops::Range;

use crate::domain::AppError;
use parser::{Assignment, BinaryOp, Expr};

/// Functions callable from expressions. Closed set.
const FUNCTIONS: [&str; 8] = ["abs", "min", "max", "floor", "ceil", "round", "sqrt", "pow"];

/// Variable environment for one index of a generation run.
///
/// `i`, `i0` and `i1` are bound at construction; the preamble runs once,
/// immediately, and may add or shadow variables seen by later expressions.
#[derive(Debug)]
pub struct Evaluator {
    index: i64,
    env: BTreeMap<String, Value>,
}

impl Evaluator {
    pub fn for_index(
        i: i64,
        i0: i64,
        i1: i64,
        preamble: Option<&str>,
    ) -> Result<Self, AppError> {
        let mut env = BTreeMap::new();
        env.insert("i".to_string(), Value::Int(i));
        env.insert("i0".to_string(), Value::Int(i0));
        env.insert("i1".to_string(), Value::Int(i1));
        let mut evaluator = Evaluator { index: i, env };
        if let Some(preamble) = preamble {
            evaluator.run_preamble(preamble)?;
        }
        Ok(evaluator)
    }

    fn run_preamble(&mut self, preamble: &str) -> Result<(), AppError> {
        let statements = lexer::tokenize(preamble)
            .and_then(|tokens| parser::parse_statements(&tokens))
            .map_err(|reason| self.error(preamble.trim(), reason))?;
        for Assignment { name, expr } in statements {
            let resolved =
                self.eval(&expr).map_err(|reason| self.error(preamble.trim(), reason))?;
            self.env.insert(name, resolved);
        }
        Ok(())
    }

    /// Evaluate one expression string against the current environment.
    pub fn eval_str(&self, expression: &str) -> Result<Value, AppError> {
        lexer::tokenize(expression)
            .and_then(|tokens| parser::parse_expression(&tokens))
            .and_then(|expr| self.eval(&expr))
            .map_err(|reason| self.error(expression, reason))
    }

    /// Replace every `%eval EXPR%` marker in `text`, left to right, one
    /// occurrence per marker.
    pub fn substitute(&self, text: &str) -> Result<String, AppError> {
        let mut result = text.to_string();
        while let Some((span, expression)) = find_eval_marker(&result) {
            let resolved = self.eval_str(&expression)?;
            result.replace_range(span, &resolved.to_string());
        }
        Ok(result)
    }

    fn eval(&self, expr: &Expr) -> Result<Value, String> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Var(name) => self
                .env
                .get(name)
                .copied()
                .ok_or_else(|| format!("unknown variable '{name}'")),
            Expr::Neg(operand) => self.eval(operand)?.neg(),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                apply_binary(*op, lhs, rhs)
            }
            Expr::Call { function, args } => {
                let args: Vec<Value> =
                    args.iter().map(|arg| self.eval(arg)).collect::<Result<_, _>>()?;
                call_function(function, &args)
            }
        }
    }

    fn error(&self, expression: &str, reason: String) -> AppError {
        AppError::Expression { expression: expression.to_string(), index: self.index, reason }
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, String> {
    use std::cmp::Ordering;
    match op {
        BinaryOp::Add => lhs.add(rhs),
        BinaryOp::Sub => lhs.sub(rhs),
        BinaryOp::Mul => lhs.mul(rhs),
        BinaryOp::Div => lhs.div(rhs),
        BinaryOp::Mod => lhs.rem(rhs),
        BinaryOp::Pow => lhs.pow(rhs),
        BinaryOp::Eq => lhs.equals(rhs).map(Value::Bool),
        BinaryOp::NotEq => lhs.equals(rhs).map(|eq| Value::Bool(!eq)),
        BinaryOp::Lt => lhs.compare(rhs).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::LtEq => lhs.compare(rhs).map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => lhs.compare(rhs).map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::GtEq => lhs.compare(rhs).map(|o| Value::Bool(o != Ordering::Less)),
    }
}

fn call_function(name: &str, args: &[Value]) -> Result<Value, String> {
    let arity = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("{name}() takes {n} argument(s), got {}", args.len()))
        }
    };
    match name {
        "abs" => {
            arity(1)?;
            match args[0] {
                Value::Int(v) => v.checked_abs().map(Value::Int).ok_or_else(|| {
                    "integer overflow".to_string()
                }),
                Value::Float(v) => Ok(Value::Float(v.abs())),
                Value::Bool(_) => Err("expected a number, found a boolean".to_string()),
            }
        }
        "min" | "max" => {
            if args.is_empty() {
                return Err(format!("{name}() takes at least one argument"));
            }
            let mut best = args[0];
            for &candidate in &args[1..] {
                let ordering = candidate.compare(best)?;
                let take = if name == "min" {
                    ordering == std::cmp::Ordering::Less
                } else {
                    ordering == std::cmp::Ordering::Greater
                };
                if take {
                    best = candidate;
                }
            }
            Ok(best)
        }
        "floor" => {
            arity(1)?;
            Ok(Value::Int(args[0].as_f64()?.floor() as i64))
        }
        "ceil" => {
            arity(1)?;
            Ok(Value::Int(args[0].as_f64()?.ceil() as i64))
        }
        "round" => {
            arity(1)?;
            Ok(Value::Int(args[0].as_f64()?.round() as i64))
        }
        "sqrt" => {
            arity(1)?;
            let radicand = args[0].as_f64()?;
            if radicand < 0.0 {
                return Err("sqrt of a negative number".to_string());
            }
            Ok(Value::Float(radicand.sqrt()))
        }
        "pow" => {
            arity(2)?;
            args[0].pow(args[1])
        }
        _ => Err(format!("unknown function '{name}'. Available: {}", FUNCTIONS.join(", "))),
    }
}

/// Locate the first `%eval EXPR%` marker. The expression body runs to the
/// first `%` after the keyword.
fn find_eval_marker(text: &str) -> Option<(Range<usize>, String)> {
    let begin = text.find("%eval ")?;
    let after = begin + "%eval ".len();
    let close = after + text[after..].find('%')?;
    Some((begin..close + 1, text[after..close].to_string()))
}
