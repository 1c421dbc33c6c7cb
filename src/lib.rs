//! Errors with a traceable call stack.
//!
//! Wrap a failure in [`Frame`]s as it propagates, each recording the function,
//! its arguments, the source location and a free-form code. Collect independent
//! failures in an [`ErrorList`]. Render the result either as detail text
//! (`{}`: root cause, then every frame) or as a summary (`{:#}`: root cause only).
//!
//! ```
//! use errstack::{Error, ErrorList, NotFound, frame, is_not_found};
//!
//! fn load_user(id: u64) -> Result<String, Error> {
//!     Err(frame!(NotFound::new("user"), "db.get", "load_user", id).into())
//! }
//!
//! let err = load_user(7).unwrap_err();
//! assert_eq!(format!("{err:#}"), "user not found");
//! assert!(err.to_string().starts_with("user not found\n\n===> errors stack:\nload_user(7)\n"));
//! assert!(is_not_found(&err));
//!
//! let mut errs = ErrorList::new();
//! errs.add(err);
//! errs.add(Error::new("cache offline"));
//! let err = errs.into_error().unwrap();
//! assert_eq!(format!("{err:#}"), "user not found\ncache offline");
//! ```

mod config;
mod error;
mod frame;
mod list;
mod not_found;
mod report;
mod value;

pub use config::{ConfigError, RenderOptions};
pub use error::{BoxError, Error, Summary, SummaryError, summary};
pub use frame::{Frame, ResultExt, STACK_BANNER, call_detail};
pub use list::ErrorList;
pub use not_found::{NotFound, is_not_found};
pub use report::{Report, StackEntry};
pub use value::{Arg, ToArg};
