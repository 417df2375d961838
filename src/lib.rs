//! Interpreter for JABBERWOCK, a language of one assignment per line:
//!
//! ```text
//! name operand (operator operand)*
//! ```
//!
//! Operands are variables or literals over `-`, `*` and `?`. The operators
//! `&` (concatenate), `||` (interleave) and `#` (splice) are applied from the
//! right.

pub mod eval;
pub mod interpret;
pub mod lex;
pub mod ops;

pub use eval::{Environment, Value, evaluate};
pub use interpret::Interpreter;
pub use lex::Lexer;
pub use ops::Operator;
