#![doc(html_root_url = "https://docs.rs/chainable_codegen/0.1.0-dev")]

#![warn(rust_2018_idioms)]

//! # chainable - Code Generation
//!
//! This crate implements the code generation portions of `chainable`. Its
//! macros are re-exported by `chainable` and should be used from there.

use proc_macro::TokenStream;

mod chain;

/// Member-access syntax for building chains.
///
/// The macro takes a base link, an identifier or a parenthesized expression,
/// followed by any number of segments:
///
///   * `.name` extends the path by `name` (raw identifiers are unrawed, so
///     `.r#type` extends it by `type`)
///   * `[literal]` extends the path by a string, integer, float, character,
///     or boolean literal's text
///   * `(args, ...)` invokes the link with the given arguments, each
///     converted into a `chainable::Value`
///
/// Without invocations the macro expands to a `chainable::Link`:
///
/// ```rust
/// use chainable::chain;
///
/// let root = chain("metrics");
/// let link = chain!(root.http.requests[200]);
/// assert_eq!(link.to_string(), "metrics.http.requests.200");
/// ```
///
/// With at least one invocation it expands to a
/// `Result<chainable::Link, chainable::Error>`, since invoking a link of a
/// chain that isn't invocable fails:
///
/// ```rust
/// use chainable::{chain, Options};
///
/// let root = chain(Options::new().invocable_links(true));
/// let link = chain!(root.foo(1).bar("two").baz()).unwrap();
/// assert_eq!(link.to_string(), "foo.bar.baz");
///
/// let plain = chain(());
/// assert!(chain!(plain.foo(1)).is_err());
/// ```
///
/// Using a reserved name as a segment is a compile-time error:
///
/// ```rust,compile_fail
/// use chainable::chain;
///
/// let root = chain(());
/// let link = chain!(root.a.prefix);
/// ```
#[proc_macro]
pub fn chain(input: TokenStream) -> TokenStream {
    chain::chain_impl(input)
}

/// Expands to the `&[&str]` of names `chain!` rejects as segments.
#[doc(hidden)]
#[proc_macro]
pub fn __reserved_names(input: TokenStream) -> TokenStream {
    chain::reserved_names_impl(input)
}
