//! Aggregate of independent errors reported together.

use std::error::Error as StdError;
use std::fmt::{self, Write};

use tracing::debug;

use crate::config::RenderOptions;
use crate::error::{Error, Summary};

/// An ordered list of errors that renders as one error.
///
/// One element renders exactly like that element; two or more are joined with
/// newlines in insertion order. `add` takes `&mut self`, so callers appending
/// from several threads must serialize access themselves (e.g. a `Mutex`).
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<Error>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error. Never deduplicates or reorders.
    pub fn add(&mut self, err: impl Into<Error>) {
        self.errors.push(err.into());
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Collapse into a single reportable error.
    ///
    /// Empty yields `None`, a single element is returned as is, and two or
    /// more become [`Error::List`].
    pub fn into_error(mut self) -> Option<Error> {
        debug!(count = self.errors.len(), "collapsing error list");
        match self.errors.len() {
            0 => None,
            1 => self.errors.pop(),
            _ => Some(Error::List(self)),
        }
    }

    /// `Ok(())` when empty, otherwise the collapsed error.
    pub fn into_result(self) -> Result<(), Error> {
        match self.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Detail text rendered with custom options.
    pub fn detail_with(&self, opts: &RenderOptions) -> String {
        join(&self.errors, |err| err.detail_with(opts))
    }

    /// Detail text as a double-quoted, escaped literal.
    pub fn quoted(&self) -> String {
        format!("{:?}", self.to_string())
    }
}

fn join(errors: &[Error], render: impl Fn(&Error) -> String) -> String {
    let mut out = String::new();
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render(err));
    }
    out
}

impl Summary for ErrorList {
    fn summary(&self) -> String {
        join(&self.errors, |err| err.summary())
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&self.summary());
        }
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl StdError for ErrorList {}

impl<E: Into<Error>> FromIterator<E> for ErrorList {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: Into<Error>> Extend<E> for ErrorList {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.errors.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
