//! The error sum type and the base helpers over it.

use std::any::TypeId;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::config::RenderOptions;
use crate::frame::Frame;
use crate::list::ErrorList;
use crate::not_found::NotFound;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Leaf error built from text.
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// Condensed, stack-free rendering of an error.
pub trait Summary {
    fn summary(&self) -> String;
}

/// A leaf error that defines its own summary.
pub trait SummaryError: StdError + Summary + Send + Sync + 'static {
    fn as_std(&self) -> &(dyn StdError + 'static);
}

impl<T: StdError + Summary + Send + Sync + 'static> SummaryError for T {
    fn as_std(&self) -> &(dyn StdError + 'static) {
        self
    }
}

/// Any failure this crate can wrap, aggregate and render.
///
/// `{}` renders the detail text (cause plus error stack), `{:#}` renders the
/// summary, and [`Error::quoted`] gives the detail as an escaped literal.
#[derive(Debug)]
pub enum Error {
    /// Opaque base error.
    Leaf(BoxError),
    /// Base error with its own summary.
    Summarized(Box<dyn SummaryError>),
    Frame(Box<Frame>),
    List(ErrorList),
}

impl Error {
    /// Create a leaf error from text. Every call yields a distinct error.
    pub fn new(msg: impl Into<String>) -> Self {
        Error::Leaf(Box::new(Message(msg.into())))
    }

    /// Wrap an arbitrary error as an opaque leaf.
    ///
    /// A [`Frame`], [`ErrorList`] or [`Error`] passed here keeps its own variant.
    pub fn leaf<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::from_boxed(Box::new(err))
    }

    /// Wrap an error that provides its own summary.
    pub fn summarized<E: StdError + Summary + Send + Sync + 'static>(err: E) -> Self {
        if is_chain_type::<E>() {
            return Self::from_boxed(Box::new(err));
        }
        Error::Summarized(Box::new(err))
    }

    fn from_boxed(err: BoxError) -> Self {
        let err = match err.downcast::<Error>() {
            Ok(err) => return *err,
            Err(err) => err,
        };
        let err = match err.downcast::<Frame>() {
            Ok(frame) => return Error::Frame(frame),
            Err(err) => err,
        };
        match err.downcast::<ErrorList>() {
            Ok(list) => Error::List(*list),
            Err(err) => Error::Leaf(err),
        }
    }

    /// Innermost cause below any frames. Other `source()` chains are not followed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Frame(frame) => frame.inner().root(),
            _ => self,
        }
    }

    /// Owned variant of [`Error::root`].
    pub fn into_root(self) -> Error {
        match self {
            Error::Frame(frame) => frame.into_inner().into_root(),
            other => other,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Error::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ErrorList> {
        match self {
            Error::List(list) => Some(list),
            _ => None,
        }
    }

    /// Whether a [`NotFound`] sits at the end of this error's chain.
    pub fn is_not_found(&self) -> bool {
        crate::not_found::is_not_found(self)
    }

    /// Whether both values are the same error, compared by identity.
    pub fn ptr_eq(&self, other: &Error) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }

    fn addr(&self) -> *const () {
        match self {
            Error::Leaf(err) => &**err as *const (dyn StdError + Send + Sync) as *const (),
            Error::Summarized(err) => &**err as *const dyn SummaryError as *const (),
            Error::Frame(frame) => &**frame as *const Frame as *const (),
            Error::List(list) => list as *const ErrorList as *const (),
        }
    }

    /// The wrapped value as a plain `std::error::Error`.
    pub(crate) fn as_std(&self) -> &(dyn StdError + 'static) {
        match self {
            Error::Leaf(err) => &**err,
            Error::Summarized(err) => err.as_std(),
            Error::Frame(frame) => &**frame,
            Error::List(list) => list,
        }
    }

    /// Detail text rendered with custom options.
    pub fn detail_with(&self, opts: &RenderOptions) -> String {
        match self {
            Error::Frame(frame) => frame.detail_with(opts),
            Error::List(list) => list.detail_with(opts),
            other => other.to_string(),
        }
    }

    /// Detail text as a double-quoted, escaped literal for structured logs.
    pub fn quoted(&self) -> String {
        format!("{:?}", self.to_string())
    }
}

impl Summary for Error {
    fn summary(&self) -> String {
        match self {
            Error::Leaf(err) => summary(&**err),
            Error::Summarized(err) => err.summary(),
            Error::Frame(frame) => frame.summary(),
            Error::List(list) => list.summary(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&self.summary());
        }
        match self {
            Error::Leaf(err) => write!(f, "{err}"),
            Error::Summarized(err) => write!(f, "{err}"),
            Error::Frame(frame) => write!(f, "{frame}"),
            Error::List(list) => write!(f, "{list}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.as_std().source()
    }
}

fn is_chain_type<E: 'static>() -> bool {
    let id = TypeId::of::<E>();
    id == TypeId::of::<Error>() || id == TypeId::of::<Frame>() || id == TypeId::of::<ErrorList>()
}

/// Summary of any error: its own summary when it has one, else its message.
pub fn summary(err: &(dyn StdError + 'static)) -> String {
    if let Some(e) = err.downcast_ref::<Error>() {
        return e.summary();
    }
    if let Some(frame) = err.downcast_ref::<Frame>() {
        return frame.summary();
    }
    if let Some(list) = err.downcast_ref::<ErrorList>() {
        return list.summary();
    }
    err.to_string()
}

impl From<Frame> for Error {
    fn from(frame: Frame) -> Self {
        Error::Frame(Box::new(frame))
    }
}

impl From<ErrorList> for Error {
    fn from(list: ErrorList) -> Self {
        Error::List(list)
    }
}

impl From<NotFound> for Error {
    fn from(err: NotFound) -> Self {
        Error::leaf(err)
    }
}

impl From<BoxError> for Error {
    fn from(err: BoxError) -> Self {
        Error::from_boxed(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<Error>() {
            Ok(err) => return err,
            Err(err) => err,
        };
        let err = match err.downcast::<Frame>() {
            Ok(frame) => return frame.into(),
            Err(err) => err,
        };
        match err.downcast::<ErrorList>() {
            Ok(list) => list.into(),
            Err(err) => Error::Leaf(err.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::leaf(err)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new(msg)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame;

    #[derive(Debug, Error)]
    #[error("quota exceeded for tenant {tenant}: 120/100 requests in window")]
    struct QuotaError {
        tenant: String,
    }

    impl Summary for QuotaError {
        fn summary(&self) -> String {
            "quota exceeded".to_string()
        }
    }

    #[derive(Debug, Error)]
    #[error("lookup failed")]
    struct LookupError(#[source] NotFound);

    #[test]
    fn test_new_message() {
        let err = Error::new("disk full");
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(format!("{err:#}"), "disk full");
    }

    #[test]
    fn test_new_is_distinct() {
        let a = Error::new("same");
        let b = Error::new("same");
        assert_eq!(a.to_string(), b.to_string());
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a));
    }

    #[test]
    fn test_root_strips_frames() {
        let leaf = Error::new("disk full");
        let wrapped: Error = frame!(frame!(leaf, "inner", "read"), "outer", "load").into();
        assert_eq!(wrapped.root().to_string(), "disk full");
        assert_eq!(wrapped.into_root().to_string(), "disk full");
    }

    #[test]
    fn test_root_of_leaf_is_itself() {
        let leaf = Error::new("x");
        assert!(leaf.root().ptr_eq(&leaf));
    }

    #[test]
    fn test_root_does_not_follow_source_chains() {
        let err = Error::leaf(LookupError(NotFound::new("file")));
        assert!(err.root().ptr_eq(&err));
    }

    #[test]
    fn test_summary_fallback_and_capability() {
        let io = std::io::Error::other("boom");
        assert_eq!(summary(&io), "boom");

        let err = Error::summarized(QuotaError {
            tenant: "acme".to_string(),
        });
        assert_eq!(summary(&err), "quota exceeded");
        assert!(err.to_string().starts_with("quota exceeded for tenant acme"));
    }

    #[test]
    fn test_summary_of_boxed_frame() {
        let frame = frame!(Error::new("inner"), "code", "call");
        let boxed: BoxError = Box::new(frame);
        let err = Error::from(boxed);
        assert_eq!(summary(&err), "inner");
    }

    #[test]
    fn test_quoted() {
        let err = Error::new("bad \"input\"\nline");
        assert_eq!(err.quoted(), r#""bad \"input\"\nline""#);
    }

    #[test]
    fn test_from_anyhow() {
        let err = Error::from(anyhow::anyhow!("upstream failed"));
        assert_eq!(err.to_string(), "upstream failed");
        assert!(matches!(err, Error::Leaf(_)));
    }

    fn quota() -> QuotaError {
        QuotaError {
            tenant: "acme".to_string(),
        }
    }

    #[test]
    fn test_leaf_summary_survives_frames() {
        for depth in 1..5 {
            let mut err = Error::summarized(quota());
            for i in 0..depth {
                err = Frame::at(err, "c", "q.rs", i, "layer", vec![]).into();
            }
            assert_eq!(format!("{err:#}"), "quota exceeded", "depth {depth}");
            assert_eq!(summary(&err), "quota exceeded");
            assert!(err.to_string().starts_with("quota exceeded for tenant acme"));
        }
    }

    #[test]
    fn test_leaf_summary_inside_list() {
        let mut list = ErrorList::new();
        list.add(Frame::at(Error::summarized(quota()), "c", "q.rs", 1, "charge", vec![]));
        assert_eq!(format!("{list:#}"), "quota exceeded");

        list.add(Error::new("timeout"));
        let err = list.into_error().unwrap();
        assert_eq!(format!("{err:#}"), "quota exceeded\ntimeout");
        assert_eq!(summary(&err), "quota exceeded\ntimeout");
    }

    #[test]
    fn test_leaf_of_frame_keeps_single_banner() {
        let inner = Frame::at(Error::new("disk full"), "ENOSPC", "a.rs", 1, "write", vec![]);
        let err = Frame::at(Error::leaf(inner), "flush", "b.rs", 2, "flush", vec![]);
        assert_eq!(
            err.to_string(),
            "disk full\n\n===> errors stack:\nwrite()\n\ta.rs:1 ENOSPC\nflush()\n\tb.rs:2 flush\n"
        );

        let err = Error::from(err);
        assert_eq!(err.root().to_string(), "disk full");
    }

    #[test]
    fn test_chain_types_keep_their_variant() {
        let framed = || Frame::at(Error::new("disk full"), "c", "a.rs", 1, "write", vec![]);

        assert!(matches!(Error::leaf(framed()), Error::Frame(_)));
        assert!(matches!(Error::leaf(Error::from(framed())), Error::Frame(_)));
        assert!(matches!(Error::summarized(framed()), Error::Frame(_)));

        let boxed: BoxError = Box::new(framed());
        assert!(matches!(Error::from(boxed), Error::Frame(_)));

        let err = Error::from(anyhow::Error::new(framed()));
        assert!(matches!(err, Error::Frame(_)));
        assert_eq!(err.root().to_string(), "disk full");

        let list: ErrorList = ["a", "b"].into_iter().collect();
        assert!(matches!(Error::leaf(list), Error::List(_)));

        let err = Error::leaf(Error::new("plain"));
        assert!(matches!(err, Error::Leaf(_)));
        assert_eq!(err.to_string(), "plain");
    }

    #[test]
    fn test_source_forwards_through_leaf() {
        let err = Error::leaf(LookupError(NotFound::new("row")));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "row not found");
    }
}
