//! Bounded rendering of call arguments for stack entries.
//!
//! Arguments are reduced to an [`Arg`] shape up front, so rendering never runs a
//! value's own `Display`/`Debug` impl. Long text is shortened, containers are
//! replaced by a placeholder or their address.

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::RenderOptions;

/// The renderable shape of a call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Absent value, rendered as `nil`.
    Nil,
    Bool(bool),
    Int(i128),
    Uint(u128),
    Float(f64),
    /// Text, rendered quoted and shortened past the configured length.
    Text(String),
    /// Fixed-size sequence, never expanded.
    Array,
    /// Composite record, never expanded.
    Struct,
    /// Pointer-like handle, rendered as `0x` + lowercase hex.
    Addr(usize),
}

impl Arg {
    /// Shape for an arbitrary record value.
    pub fn record<T: ?Sized>(_value: &T) -> Self {
        Arg::Struct
    }

    /// Shape for a handle, identified by the address of its referent.
    pub fn address<T: ?Sized>(value: &T) -> Self {
        Arg::Addr(value as *const T as *const () as usize)
    }

    /// Render with the default options.
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    pub fn render_with(&self, opts: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, opts);
        out
    }

    pub(crate) fn write_to<W: Write>(&self, out: &mut W, opts: &RenderOptions) -> fmt::Result {
        match self {
            Arg::Nil => out.write_str("nil"),
            Arg::Bool(v) => write!(out, "{v}"),
            Arg::Int(v) => write!(out, "{v}"),
            Arg::Uint(v) => write!(out, "{v}"),
            Arg::Float(v) => write!(out, "{v}"),
            Arg::Text(s) => write!(out, "{:?}", shorten(s, opts)),
            Arg::Array => out.write_str("Array"),
            Arg::Struct => out.write_str("Struct"),
            Arg::Addr(addr) => write!(out, "0x{addr:x}"),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &RenderOptions::default())
    }
}

/// Keep the head and tail of text longer than `max_text_len` chars.
fn shorten<'a>(s: &'a str, opts: &RenderOptions) -> Cow<'a, str> {
    let len = s.chars().count();
    let edge = opts.text_edge_len;
    // Options are not required to be validated; keep text whole when the edges
    // would cover it.
    if len <= opts.max_text_len || edge.saturating_mul(2) >= len {
        return Cow::Borrowed(s);
    }
    let head: String = s.chars().take(edge).collect();
    let tail: String = s.chars().skip(len - edge).collect();
    Cow::Owned(format!("{head}...{tail}"))
}

/// Comma-and-space joined rendering of an argument list.
pub(crate) fn write_args<W: Write>(out: &mut W, args: &[Arg], opts: &RenderOptions) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        arg.write_to(out, opts)?;
    }
    Ok(())
}

/// Conversion of a value into its renderable shape.
pub trait ToArg {
    fn to_arg(&self) -> Arg;
}

impl ToArg for Arg {
    fn to_arg(&self) -> Arg {
        self.clone()
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for &mut T {
    fn to_arg(&self) -> Arg {
        (**self).to_arg()
    }
}

macro_rules! to_arg_as {
    ($variant:ident($target:ty): $($t:ty),*) => {
        $(
            impl ToArg for $t {
                fn to_arg(&self) -> Arg {
                    Arg::$variant(*self as $target)
                }
            }
        )*
    };
}

to_arg_as!(Int(i128): i8, i16, i32, i64, i128, isize);
to_arg_as!(Uint(u128): u8, u16, u32, u64, u128, usize);
to_arg_as!(Float(f64): f32, f64);

impl ToArg for bool {
    fn to_arg(&self) -> Arg {
        Arg::Bool(*self)
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Arg {
        Arg::Text(self.to_string())
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Arg {
        Arg::Text(self.clone())
    }
}

impl ToArg for Cow<'_, str> {
    fn to_arg(&self) -> Arg {
        Arg::Text(self.to_string())
    }
}

impl ToArg for char {
    fn to_arg(&self) -> Arg {
        Arg::Text(self.to_string())
    }
}

impl<T: ToArg> ToArg for Option<T> {
    fn to_arg(&self) -> Arg {
        match self {
            Some(v) => v.to_arg(),
            None => Arg::Nil,
        }
    }
}

impl<T, const N: usize> ToArg for [T; N] {
    fn to_arg(&self) -> Arg {
        Arg::Array
    }
}

impl<T> ToArg for [T] {
    fn to_arg(&self) -> Arg {
        Arg::Addr(self.as_ptr() as usize)
    }
}

impl<T> ToArg for Vec<T> {
    fn to_arg(&self) -> Arg {
        Arg::Addr(self.as_ptr() as usize)
    }
}

impl<T: ?Sized> ToArg for Box<T> {
    fn to_arg(&self) -> Arg {
        Arg::address(&**self)
    }
}

impl<T: ?Sized> ToArg for Rc<T> {
    fn to_arg(&self) -> Arg {
        Arg::address(&**self)
    }
}

impl<T: ?Sized> ToArg for Arc<T> {
    fn to_arg(&self) -> Arg {
        Arg::address(&**self)
    }
}

impl<T: ?Sized> ToArg for *const T {
    fn to_arg(&self) -> Arg {
        Arg::Addr(*self as *const () as usize)
    }
}

impl<T: ?Sized> ToArg for *mut T {
    fn to_arg(&self) -> Arg {
        Arg::Addr(*self as *const () as usize)
    }
}

impl ToArg for () {
    fn to_arg(&self) -> Arg {
        Arg::Struct
    }
}

macro_rules! to_arg_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> ToArg for ($($name,)+) {
            fn to_arg(&self) -> Arg {
                Arg::Struct
            }
        }
    };
}

to_arg_tuple!(A);
to_arg_tuple!(A, B);
to_arg_tuple!(A, B, C);
to_arg_tuple!(A, B, C, D);
to_arg_tuple!(A, B, C, D, E);
to_arg_tuple!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_and_option() {
        assert_eq!(Arg::Nil.render(), "nil");
        assert_eq!(None::<i32>.to_arg().render(), "nil");
        assert_eq!(Some(7u8).to_arg().render(), "7");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(42i32.to_arg().render(), "42");
        assert_eq!((-3i64).to_arg().render(), "-3");
        assert_eq!(u64::MAX.to_arg().render(), "18446744073709551615");
        assert_eq!(true.to_arg().render(), "true");
        assert_eq!(2.5f64.to_arg().render(), "2.5");
    }

    #[test]
    fn test_text_is_quoted() {
        assert_eq!("cache".to_arg().render(), "\"cache\"");
        assert_eq!(String::from("a\"b\n").to_arg().render(), r#""a\"b\n""#);
        assert_eq!('x'.to_arg().render(), "\"x\"");
    }

    #[test]
    fn test_text_at_limit_is_kept() {
        let s = "a".repeat(32);
        assert_eq!(s.to_arg().render(), format!("\"{s}\""));
    }

    #[test]
    fn test_long_text_is_shortened() {
        let s = format!("{}{}{}", "h".repeat(16), "m".repeat(100), "t".repeat(16));
        let rendered = s.to_arg().render();
        assert_eq!(rendered, format!("\"{}...{}\"", "h".repeat(16), "t".repeat(16)));
        assert!(rendered.len() <= 40);
    }

    #[test]
    fn test_long_multibyte_text_is_shortened_by_chars() {
        let s = "é".repeat(40);
        let rendered = s.to_arg().render();
        assert_eq!(rendered, format!("\"{}...{}\"", "é".repeat(16), "é".repeat(16)));
    }

    #[test]
    fn test_containers_are_not_expanded() {
        assert_eq!([1, 2, 3].to_arg().render(), "Array");
        assert_eq!((1, "two").to_arg().render(), "Struct");
        assert_eq!(Arg::record(&Point { _x: 1 }).render(), "Struct");
    }

    struct Point {
        _x: u32,
    }

    #[test]
    fn test_handles_render_as_address() {
        let boxed = Box::new(5u32);
        let expected = format!("0x{:x}", &*boxed as *const u32 as usize);
        assert_eq!(boxed.to_arg().render(), expected);

        let v = vec![1u8, 2, 3];
        assert_eq!(v.to_arg().render(), format!("0x{:x}", v.as_ptr() as usize));

        let null: *const u8 = std::ptr::null();
        assert_eq!(null.to_arg().render(), "0x0");
    }

    #[test]
    fn test_custom_limits() {
        let opts = RenderOptions {
            max_text_len: 4,
            text_edge_len: 2,
        };
        assert_eq!("abcdef".to_arg().render_with(&opts), "\"ab...ef\"");
        assert_eq!("abcd".to_arg().render_with(&opts), "\"abcd\"");
    }

    #[test]
    fn test_unvalidated_options_never_panic() {
        let opts = RenderOptions {
            max_text_len: 2,
            text_edge_len: 5,
        };
        assert!(opts.validate().is_err());
        assert_eq!("abc".to_arg().render_with(&opts), "\"abc\"");
        assert_eq!("abcdefghijklm".to_arg().render_with(&opts), "\"abcde...ijklm\"");

        let opts = RenderOptions {
            max_text_len: 0,
            text_edge_len: 0,
        };
        assert_eq!("abc".to_arg().render_with(&opts), "\"...\"");
        assert_eq!("".to_arg().render_with(&opts), "\"\"");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(f64::INFINITY.to_arg().render(), "inf");
        assert_eq!(f64::NEG_INFINITY.to_arg().render(), "-inf");
        assert_eq!(f64::NAN.to_arg().render(), "NaN");
        assert_eq!(f32::INFINITY.to_arg().render(), "inf");
        assert_eq!(1e21f64.to_arg().render(), "1000000000000000000000");
    }

    #[test]
    fn test_args_join() {
        let mut out = String::new();
        write_args(
            &mut out,
            &[42i32.to_arg(), "cache".to_arg(), Arg::Nil],
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "42, \"cache\", nil");
    }
}
