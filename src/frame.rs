//! Error frames: a cause wrapped with the call that produced it.
//!
//! The detail rendering of a chain reads cause first, outermost frame last:
//!
//! ```text
//! disk full
//!
//! ===> errors stack:
//! writeBlock(42, "cache")
//! 	src/store.rs:88 ENOSPC
//! flush(nil)
//! 	src/store.rs:131 s.write_block(...)
//! ```

use std::error::Error as StdError;
use std::fmt::{self, Write};
use std::panic::Location;

use tracing::trace;

use crate::config::RenderOptions;
use crate::error::{Error, Summary};
use crate::value::{Arg, write_args};

/// Banner between the root cause message and the first stack entry.
pub const STACK_BANNER: &str = "\n\n===> errors stack:\n";

/// A single wrap of call-site context around a cause.
#[derive(Debug)]
pub struct Frame {
    cause: Error,
    func: String,
    args: Vec<Arg>,
    code: String,
    file: String,
    line: u32,
}

impl Frame {
    /// Wrap `cause`, recording the caller's file and line.
    ///
    /// Functions that forward to this one should be `#[track_caller]` too, so
    /// the recorded location is their caller's. `line_offset` is added to the
    /// captured line.
    #[track_caller]
    pub fn new(
        cause: impl Into<Error>,
        code: impl Into<String>,
        line_offset: i32,
        func: impl Into<String>,
        args: Vec<Arg>,
    ) -> Self {
        let caller = Location::caller();
        let line = caller.line().saturating_add_signed(line_offset);
        Self::at(cause, code, caller.file(), line, func, args)
    }

    /// Wrap `cause` with an explicitly known location.
    pub fn at(
        cause: impl Into<Error>,
        code: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        func: impl Into<String>,
        args: Vec<Arg>,
    ) -> Self {
        let frame = Self {
            cause: cause.into(),
            func: func.into(),
            args,
            code: code.into(),
            file: file.into(),
            line,
        };
        trace!(
            function = %frame.func,
            code = %frame.code,
            file = %frame.file,
            line = frame.line,
            "wrapped error in frame"
        );
        frame
    }

    pub fn inner(&self) -> &Error {
        &self.cause
    }

    pub fn into_inner(self) -> Error {
        self.cause
    }

    pub fn function(&self) -> &str {
        &self.func
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Detail text rendered with custom options.
    pub fn detail_with(&self, opts: &RenderOptions) -> String {
        let mut out = String::with_capacity(64);
        // Writing into a String cannot fail.
        let _ = self.write_detail(&mut out, opts);
        out
    }

    /// Detail text as a double-quoted, escaped literal.
    pub fn quoted(&self) -> String {
        format!("{:?}", self.to_string())
    }

    fn write_detail<W: Write>(&self, out: &mut W, opts: &RenderOptions) -> fmt::Result {
        match &self.cause {
            Error::Frame(inner) => inner.write_detail(out, opts)?,
            leaf => {
                out.write_str(&leaf.detail_with(opts))?;
                out.write_str(STACK_BANNER)?;
            }
        }
        self.write_entry(out, opts)
    }

    /// This frame's own stack entry: `func(args)` then `\tfile:line code`.
    fn write_entry<W: Write>(&self, out: &mut W, opts: &RenderOptions) -> fmt::Result {
        out.write_str(&self.func)?;
        out.write_char('(')?;
        write_args(out, &self.args, opts)?;
        writeln!(out, ")\n\t{}:{} {}", self.file, self.line, self.code)
    }
}

impl Summary for Frame {
    fn summary(&self) -> String {
        self.cause.summary()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&self.summary());
        }
        self.write_detail(f, &RenderOptions::default())
    }
}

impl StdError for Frame {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

/// Wrap a cause in a [`Frame`] at the invocation site.
///
/// Arguments are converted with [`ToArg`](crate::ToArg):
///
/// ```
/// use errstack::{Error, frame};
///
/// let err = frame!(Error::new("disk full"), "ENOSPC", "write_block", 42, "cache");
/// assert_eq!(format!("{err:#}"), "disk full");
/// assert!(err.to_string().contains("write_block(42, \"cache\")"));
/// ```
#[macro_export]
macro_rules! frame {
    ($cause:expr, $code:expr, $func:expr $(, $arg:expr)* $(,)?) => {
        $crate::Frame::new(
            $cause,
            $code,
            0,
            $func,
            ::std::vec![$($crate::ToArg::to_arg(&$arg)),*],
        )
    };
}

/// Wrapping the error side of a `Result` in a [`Frame`].
pub trait ResultExt<T> {
    /// Wrap an `Err` in a frame located at the caller of this method.
    #[track_caller]
    fn frame(
        self,
        code: impl Into<String>,
        func: impl Into<String>,
        args: Vec<Arg>,
    ) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn frame(
        self,
        code: impl Into<String>,
        func: impl Into<String>,
        args: Vec<Arg>,
    ) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Frame::new(err, code, 0, func, args).into()),
        }
    }
}

/// Append a short description of a call, `path::to::func(args)`, to `buf`.
pub fn call_detail<F: ?Sized>(buf: &mut String, _func: &F, args: &[Arg]) {
    buf.push_str(std::any::type_name::<F>());
    buf.push('(');
    // Writing into a String cannot fail.
    let _ = write_args(buf, args, &RenderOptions::default());
    buf.push(')');
}
