//! Structured form of an error for JSON logs.

use serde::{Deserialize, Serialize};

use crate::config::RenderOptions;
use crate::error::{Error, Summary};
use crate::frame::Frame;

/// One stack entry of a [`Frame`], with arguments already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub function: String,
    pub args: Vec<String>,
    pub file: String,
    pub line: u32,
    pub code: String,
}

impl StackEntry {
    fn from_frame(frame: &Frame, opts: &RenderOptions) -> Self {
        Self {
            function: frame.function().to_string(),
            args: frame.args().iter().map(|a| a.render_with(opts)).collect(),
            file: frame.file().to_string(),
            line: frame.line(),
            code: frame.code().to_string(),
        }
    }
}

/// Everything a log line needs about an error, in both rendering modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub summary: String,
    pub detail: String,
    /// Message of the innermost cause below all frames.
    pub root: String,
    /// Stack entries in detail order: innermost frame first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<StackEntry>,
    /// Member reports when the root cause is an aggregate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Report>,
}

impl Report {
    pub fn new(err: &Error) -> Self {
        Self::with_options(err, &RenderOptions::default())
    }

    pub fn with_options(err: &Error, opts: &RenderOptions) -> Self {
        let mut stack = Vec::new();
        let mut current = err;
        while let Error::Frame(frame) = current {
            stack.push(StackEntry::from_frame(frame, opts));
            current = frame.inner();
        }
        stack.reverse();

        let errors = match current {
            Error::List(list) => list.iter().map(|e| Self::with_options(e, opts)).collect(),
            _ => Vec::new(),
        };

        Self {
            summary: err.summary(),
            detail: err.detail_with(opts),
            root: current.detail_with(opts),
            stack,
            errors,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&Error> for Report {
    fn from(err: &Error) -> Self {
        Self::new(err)
    }
}
