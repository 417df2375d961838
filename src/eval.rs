use std::{borrow::Cow, collections::BTreeMap, fmt::Display};

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    lex::{Token, is_identifier, is_valid_literal},
    ops::Operator,
};

/// Longest value, in characters, that survives evaluation.
pub const MAX_LEN: usize = 2022;

/// Text of the sentinel value, also a reserved identifier.
pub const UNDEFINED: &str = "undefined";

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid expression length ({len})")]
    #[diagnostic(
        code(jabberwock::malformed_expression),
        help("an expression alternates operands and operators, so it has an odd number of tokens")
    )]
    MalformedExpression {
        len: usize,
        #[label("this expression")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid operator ({operator})")]
    #[diagnostic(code(jabberwock::invalid_operator), help("use one of `&`, `||` or `#`"))]
    InvalidOperator {
        operator: String,
        #[label("this operator")]
        span: SourceSpan,
    },

    #[error("Invalid sub-expression ({value})")]
    #[diagnostic(
        code(jabberwock::invalid_sub_expression),
        help("operands must evaluate to a string of `-`, `*` and `?`")
    )]
    InvalidSubExpression {
        value: String,
        #[label("this operand")]
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'de> {
    Str(Cow<'de, str>),
    Undefined,
}

impl Value<'_> {
    /// Collapses values longer than [`MAX_LEN`] to the sentinel.
    pub fn bounded(self) -> Self {
        match self {
            Value::Str(s) if s.chars().count() > MAX_LEN => Value::Undefined,
            value => value,
        }
    }

    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Undefined => Value::Undefined,
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Undefined => write!(f, "{UNDEFINED}"),
        }
    }
}

/// Variable table of a single run, ordered by name.
#[derive(Debug, Default)]
pub struct Environment<'de> {
    values: BTreeMap<Cow<'de, str>, Value<'de>>,
}

impl<'de> Environment<'de> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value<'de>> {
        self.values.get(name)
    }

    /// Inserts or replaces `name`. Length limits are the caller's business.
    pub fn define(&mut self, name: Cow<'de, str>, value: Value<'de>) {
        self.values.insert(name, value);
    }

    /// Looks `token` up if it is an identifier, otherwise hands it back as
    /// a literal untouched.
    pub fn resolve<'a>(&'a self, token: &'a str) -> Value<'a> {
        if !is_identifier(token) {
            return Value::Str(Cow::Borrowed(token));
        }
        if token == UNDEFINED {
            return Value::Undefined;
        }
        match self.values.get(token) {
            Some(Value::Str(s)) if s.chars().count() <= MAX_LEN => {
                Value::Str(Cow::Borrowed(s.as_ref()))
            }
            _ => Value::Undefined,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'de>)> {
        self.values.iter().map(|(name, value)| (name.as_ref(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Display for Environment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}

/// Evaluates `operand (operator operand)*`, reducing the rightmost triple
/// first.
///
/// Undefined operands and over-long results quietly give
/// [`Value::Undefined`]. A lone operand is returned as resolved, without the
/// alphabet or length checks.
pub fn evaluate<'a>(
    tokens: &[Token<'a>],
    env: &'a Environment<'_>,
) -> Result<Value<'a>, EvalError> {
    let Some((last, rest)) = tokens.split_last().filter(|_| tokens.len() % 2 == 1) else {
        return Err(EvalError::MalformedExpression {
            len: tokens.len(),
            span: span_of(tokens),
        });
    };

    let mut value = env.resolve(last.literal);
    if rest.is_empty() {
        return Ok(value);
    }

    // Tokens from `start` to the end of the line produced `value`.
    let mut start = last.offset;
    let end = last.offset + last.literal.len();

    for pair in rest.rchunks_exact(2) {
        let (operand, operator) = (pair[0], pair[1]);
        let lhs = env.resolve(operand.literal);
        let (lhs, rhs) = match (lhs, value) {
            (Value::Str(lhs), Value::Str(rhs)) => (lhs, rhs),
            (lhs, rhs) => {
                debug!(%lhs, %rhs, "undefined operand");
                return Ok(Value::Undefined);
            }
        };

        if !is_valid_literal(&lhs) {
            return Err(EvalError::InvalidSubExpression {
                value: lhs.into_owned(),
                span: operand.span(),
            });
        }
        if !is_valid_literal(&rhs) {
            return Err(EvalError::InvalidSubExpression {
                value: rhs.into_owned(),
                span: SourceSpan::from(start..end),
            });
        }
        let Some(op) = Operator::from_token(operator.literal) else {
            return Err(EvalError::InvalidOperator {
                operator: operator.literal.to_string(),
                span: operator.span(),
            });
        };

        let reduced = op.apply(&lhs, &rhs);
        trace!(%lhs, %op, %rhs, %reduced, "reduce");
        value = Value::Str(Cow::Owned(reduced));
        start = operand.offset;
    }

    Ok(value.bounded())
}

fn span_of(tokens: &[Token<'_>]) -> Option<SourceSpan> {
    let (first, last) = (tokens.first()?, tokens.last()?);
    Some(SourceSpan::from(first.offset..last.offset + last.literal.len()))
}
