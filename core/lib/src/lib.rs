#![doc(html_root_url = "https://docs.rs/chainable/0.1.0-dev")]

#![warn(rust_2018_idioms)]

//! # chainable
//!
//! Lazy path-recording chains. A chain records the names accessed on it, one
//! link at a time, and renders them into a string only when asked. Chains are
//! a convenient way to build identifier-like strings such as event names,
//! metric keys, or translation keys without spelling out string literals.
//!
//! ```rust
//! use chainable::{chain, Options};
//!
//! let events = chain(Options::new().prefix("app").separator(':'));
//! let login = events.at("user").at("login");
//!
//! assert_eq!(login.to_string(), "app:user:login");
//! assert_eq!(events.at("user").at("logout").to_string(), "app:user:logout");
//! ```
//!
//! ## Links
//!
//! Every [`Link`] is immutable. Extending a link with [`Link::at()`] (or
//! [`Link::get()`]) never modifies it: it returns a new child link whose
//! tokens are the parent's followed by the new name. A link can thus be kept
//! around and extended as many times as needed:
//!
//! ```rust
//! let user = chainable::chain("app").at("user");
//! let (login, logout) = (user.at("login"), user.at("logout"));
//!
//! assert_eq!(user.to_string(), "app.user");
//! assert_eq!(login.to_string(), "app.user.login");
//! assert_eq!(logout.to_string(), "app.user.logout");
//! ```
//!
//! The [`chain!`] macro accepts member-access syntax and expands to the
//! equivalent calls to [`Link::at()`] and [`Link::invoke()`]:
//!
//! ```rust
//! use chainable::chain;
//!
//! let keys = chain("i18n");
//! assert_eq!(chain!(keys.errors.not_found[404]).to_string(), "i18n.errors.not_found.404");
//! ```
//!
//! ## Rendering
//!
//! A link renders as its prefix, its tokens, and its suffix joined by its
//! separator. Each token is first passed through `sanitize_links`; the joined
//! string is passed through `sanitize`. See [`Options`] for all settings and
//! [`serialize()`] for the exact rules.
//!
//! ## Intrinsic Members
//!
//! The names in [`RESERVED`] and the names of a chain's extension members are
//! _intrinsic_: accessing them yields the corresponding [`Member`] and they
//! can never become path tokens.
//!
//! ## Invocable Links
//!
//! When a chain is created with `invocable_links` set, its links can be
//! invoked with [`Link::invoke()`]. Invoking a link runs the chain's
//! `handle_link_invocation` callback with a [`Snapshot`] of the link and the
//! invocation's arguments, then returns a link from which chaining continues.
//!
//! ## Configuration
//!
//! Literal options can be read from a TOML file and the environment through
//! [`Config`]; see its documentation for the sources consulted.

#[macro_use] extern crate log;

mod access;
mod config;
mod error;
mod factory;
mod invoke;
mod link;
mod options;
mod serialize;

#[doc(inline)]
pub use chainable_codegen::chain;

pub use crate::access::{Access, Key, Member, RESERVED};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::factory::{chain_factory, ChainFactory};
pub use crate::invoke::{Handler, Snapshot};
pub use crate::link::{Link, Tokens};
pub use crate::options::{Extension, IntoSetting, Options, Sanitizer, Setting, Settings};
pub use crate::serialize::serialize;

/// The type of the arguments passed to an invocable link.
pub use serde_json::Value;

/// Creates the root link of a new chain.
///
/// `options` is anything convertible into [`Options`]: `()` for the defaults,
/// a string to use as the prefix, a [`Config`], or `Options` themselves.
///
/// ```rust
/// use chainable::{chain, Options};
///
/// assert_eq!(chain(()).at("a").at("b").at("c").to_string(), "a.b.c");
/// assert_eq!(chain("foo").at("a").to_string(), "foo.a");
///
/// let root = chain(Options::new().prefix("foo").suffix("bar").separator('/'));
/// assert_eq!(root.at("a").at("b").to_string(), "foo/a/b/bar");
/// ```
pub fn chain<O: Into<Options>>(options: O) -> Link {
    Link::root(Settings::resolve(options.into()))
}
