use std::fmt;
use std::ops::Deref;

use ref_cast::RefCast;

use crate::invoke::Handler;
use crate::link::{Link, Tokens};
use crate::options::{Extension, Sanitizer, Setting};

/// Names that always resolve to a link's intrinsic members.
pub const RESERVED: &[&str] = &[
    "prefix",
    "suffix",
    "separator",
    "sanitize",
    "sanitize_links",
    "handle_link_invocation",
    "invocable_links",
    "tokens",
    "property",
    "to_string",
];

/// A name accessed on a link.
#[repr(transparent)]
#[derive(RefCast, Debug, PartialEq, Eq, Hash)]
pub struct Key(str);

impl Key {
    pub fn new<S: AsRef<str> + ?Sized>(string: &S) -> &Key {
        Key::ref_cast(string.as_ref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `self` is one of the statically [`RESERVED`] names. Extension
    /// names are reserved as well, but only within their own chain; see
    /// [`Link::is_intrinsic()`].
    pub fn is_reserved(&self) -> bool {
        RESERVED.contains(&self.as_str())
    }
}

impl Deref for Key {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self == Key::new(other)
    }
}

impl AsRef<Key> for str {
    fn as_ref(&self) -> &Key {
        Key::new(self)
    }
}

impl AsRef<Key> for String {
    fn as_ref(&self) -> &Key {
        Key::new(self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An intrinsic member of a link, returned by [`Link::get()`].
#[derive(Clone)]
pub enum Member {
    Prefix(Setting<Option<String>>),
    Suffix(Setting<Option<String>>),
    Separator(Setting<String>),
    Sanitize(Sanitizer),
    SanitizeLinks(Sanitizer),
    HandleLinkInvocation(Handler),
    InvocableLinks(bool),
    Tokens(Tokens),
    Property(Option<String>),
    /// The link's rendered path.
    ToString(String),
    Extension(Extension),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Prefix(s) => f.debug_tuple("Prefix").field(s).finish(),
            Member::Suffix(s) => f.debug_tuple("Suffix").field(s).finish(),
            Member::Separator(s) => f.debug_tuple("Separator").field(s).finish(),
            Member::Sanitize(_) => f.write_str("Sanitize(..)"),
            Member::SanitizeLinks(_) => f.write_str("SanitizeLinks(..)"),
            Member::HandleLinkInvocation(_) => f.write_str("HandleLinkInvocation(..)"),
            Member::InvocableLinks(v) => f.debug_tuple("InvocableLinks").field(v).finish(),
            Member::Tokens(t) => f.debug_tuple("Tokens").field(t).finish(),
            Member::Property(p) => f.debug_tuple("Property").field(p).finish(),
            Member::ToString(s) => f.debug_tuple("ToString").field(s).finish(),
            Member::Extension(_) => f.write_str("Extension(..)"),
        }
    }
}

/// The outcome of accessing a name on a link: either an intrinsic member or
/// the child link that extends the path by that name.
#[derive(Debug, Clone)]
pub enum Access {
    Member(Member),
    Link(Link),
}

impl Access {
    pub fn is_link(&self) -> bool {
        matches!(self, Access::Link(_))
    }

    pub fn into_link(self) -> Option<Link> {
        match self {
            Access::Link(link) => Some(link),
            Access::Member(_) => None,
        }
    }

    pub fn into_member(self) -> Option<Member> {
        match self {
            Access::Member(member) => Some(member),
            Access::Link(_) => None,
        }
    }
}

impl Link {
    /// Whether `key` resolves to an intrinsic member of this link rather than
    /// a path token: one of the [`RESERVED`] names or an extension member of
    /// this link's chain.
    pub fn is_intrinsic<K: AsRef<Key> + ?Sized>(&self, key: &K) -> bool {
        let key = key.as_ref();
        key.is_reserved() || self.settings().extension(key).is_some()
    }

    /// Accesses `key` on this link.
    ///
    /// Intrinsic names resolve to their [`Member`]; every other name yields a
    /// new child link whose tokens are this link's followed by `key`. Intrinsic
    /// names never become tokens.
    ///
    /// ```rust
    /// use chainable::{chain, Access, Member, Options};
    ///
    /// let root = chain(Options::new().prefix("app"));
    /// match root.get("prefix") {
    ///     Access::Member(Member::Prefix(prefix)) => assert_eq!(prefix.get().unwrap(), "app"),
    ///     other => panic!("unexpected access: {:?}", other),
    /// }
    ///
    /// let child = root.get("users").into_link().unwrap();
    /// assert_eq!(child.to_string(), "app.users");
    /// ```
    pub fn get<K: AsRef<Key> + ?Sized>(&self, key: &K) -> Access {
        let key = key.as_ref();
        let settings = self.settings();
        let member = match key.as_str() {
            "prefix" => Member::Prefix(settings.prefix_setting().clone()),
            "suffix" => Member::Suffix(settings.suffix_setting().clone()),
            "separator" => Member::Separator(settings.separator_setting().clone()),
            "sanitize" => Member::Sanitize(settings.sanitizer().clone()),
            "sanitize_links" => Member::SanitizeLinks(settings.link_sanitizer().clone()),
            "handle_link_invocation" => Member::HandleLinkInvocation(settings.handler().clone()),
            "invocable_links" => Member::InvocableLinks(settings.invocable_links()),
            "tokens" => Member::Tokens(self.tokens().clone()),
            "property" => Member::Property(self.property().map(|p| p.to_string())),
            "to_string" => Member::ToString(self.render()),
            name => match settings.extension(name) {
                Some(extension) => Member::Extension(extension.clone()),
                None => return Access::Link(self.child(name)),
            }
        };

        Access::Member(member)
    }

    /// Extends the path by `key`, returning the new child link.
    ///
    /// Any `Display` value is accepted, so numeric segments work directly. If
    /// `key` is [intrinsic](Link::is_intrinsic()) it can't become a token: a
    /// warning is logged and a copy of `self` with its own tokens is returned.
    ///
    /// ```rust
    /// let keys = chainable::chain("i18n");
    /// assert_eq!(keys.at("errors").at(404).to_string(), "i18n.errors.404");
    /// ```
    pub fn at<K: fmt::Display>(&self, key: K) -> Link {
        let name = key.to_string();
        if self.is_intrinsic(name.as_str()) {
            warn!("`{}` is an intrinsic chain member and can't be a path token", name);
            return self.detached();
        }

        self.child(&name)
    }
}
