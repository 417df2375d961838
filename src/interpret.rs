use std::{borrow::Cow, sync::Arc};

use miette::{NamedSource, Report};
use tracing::debug;

use crate::{
    Lexer,
    eval::{Environment, MAX_LEN, Value, evaluate},
    lex::{InvalidNameError, Lines, Token},
};

/// Runs a program one assignment line per step.
///
/// Each step yields `Ok(())` or the diagnostic for that line. A diagnostic
/// never ends the run: invalid names skip their line, evaluation errors bind
/// `undefined`.
pub struct Interpreter<'de> {
    src: Arc<NamedSource<String>>,
    lines: Lines<'de>,
    line: usize,
    environment: Environment<'de>,
}

impl<'de> Iterator for Interpreter<'de> {
    type Item = Result<(), Report>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, line) = self.lines.next()?;
        self.line += 1;
        Some(self.eval_line(line, offset))
    }
}

impl<'de> Interpreter<'de> {
    pub fn new(filename: Option<&str>, whole: &'de str) -> Self {
        Self {
            src: Arc::new(NamedSource::new(
                filename.unwrap_or("<input>"),
                whole.to_string(),
            )),
            lines: Lines::new(whole),
            line: 0,
            environment: Environment::new(),
        }
    }

    /// Number of the line most recently processed, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn environment(&self) -> &Environment<'de> {
        &self.environment
    }

    /// Processes every remaining line, handing each diagnostic to `report`.
    pub fn run(mut self, mut report: impl FnMut(usize, Report)) -> Environment<'de> {
        while let Some(step) = self.next() {
            if let Err(e) = step {
                report(self.line, e);
            }
        }
        self.environment
    }

    fn eval_line(&mut self, line: &'de str, offset: usize) -> Result<(), Report> {
        let tokens: Vec<Token<'de>> = Lexer::new(line, offset).collect();
        let Some((name, expression)) = tokens.split_first() else {
            return Ok(());
        };

        if name.literal.chars().count() > MAX_LEN {
            debug!(line = self.line, "skipping over-long variable name");
            return Ok(());
        }
        if !name.is_identifier() {
            return Err(InvalidNameError::new(Arc::clone(&self.src), *name).into());
        }

        let (value, error) = match evaluate(expression, &self.environment) {
            Ok(value) => (value.into_owned(), None),
            Err(e) => (Value::Undefined, Some(e)),
        };
        debug!(line = self.line, name = name.literal, %value, "bind");
        self.environment.define(Cow::Borrowed(name.literal), value);

        match error {
            Some(e) => Err(Report::new(e).with_source_code(Arc::clone(&self.src))),
            None => Ok(()),
        }
    }
}
