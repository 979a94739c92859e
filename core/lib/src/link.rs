use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::options::Settings;
use crate::serialize::serialize;

/// The ordered token sequence of a link.
///
/// Cloning a `Tokens` yields a handle to the _same_ sequence. Links never
/// share sequences with one another: every child link receives a fresh copy
/// of its parent's tokens. The one exception is the handle exposed to an
/// invocation handler through a [`Snapshot`](crate::Snapshot), which is the
/// invoked link's live sequence.
#[derive(Clone, Default)]
pub struct Tokens(Arc<Mutex<Vec<String>>>);

impl Tokens {
    pub(crate) fn new(tokens: Vec<String>) -> Self {
        Tokens(Arc::new(Mutex::new(tokens)))
    }

    /// Returns a new, independent sequence: these tokens followed by `token`.
    pub(crate) fn appended(&self, token: &str) -> Tokens {
        let mut tokens = self.to_vec();
        tokens.push(token.to_string());
        Tokens::new(tokens)
    }

    /// Appends `token` to this sequence in place.
    pub fn push<S: Into<String>>(&self, token: S) {
        self.0.lock().push(token.into());
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Whether `self` and `other` are handles to the same sequence.
    pub fn ptr_eq(&self, other: &Tokens) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Tokens {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.to_vec() == other.to_vec()
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for Tokens {
    fn eq(&self, other: &[S]) -> bool {
        self.0.lock().iter().map(|s| s.as_str()).eq(other.iter().map(|s| s.as_ref()))
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for Tokens {
    fn eq(&self, other: &[S; N]) -> bool {
        self == &other[..]
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.lock().iter()).finish()
    }
}

/// One point on a chain's path.
///
/// A link holds the tokens accumulated so far, the name of the most recently
/// appended token, and the [`Settings`] shared by every link of its chain.
/// Links are obtained from [`chain()`](crate::chain()) (the root) and from
/// [`Link::at()`], [`Link::get()`], and [`Link::invoke()`] (everything else).
///
/// Rendering goes through [`Display`](fmt::Display), so `link.to_string()`
/// produces the formatted path:
///
/// ```rust
/// let events = chainable::chain("app");
/// let login = events.at("user").at("login");
///
/// assert_eq!(login.to_string(), "app.user.login");
/// assert_eq!(login.tokens(), &["user", "login"]);
/// assert_eq!(login.property(), Some("login"));
/// ```
#[derive(Clone)]
pub struct Link {
    tokens: Tokens,
    property: Option<String>,
    settings: Arc<Settings>,
}

impl Link {
    pub(crate) fn root(settings: Settings) -> Link {
        Link {
            tokens: Tokens::default(),
            property: None,
            settings: Arc::new(settings),
        }
    }

    /// Creates a child of `self` whose tokens are `self`'s followed by `name`.
    /// Every call allocates a new, independent token sequence.
    pub(crate) fn child(&self, name: &str) -> Link {
        let tokens = self.tokens.appended(name);
        trace!("chain link {:?} -> {:?}", self.property, tokens);
        Link {
            tokens,
            property: Some(name.to_string()),
            settings: self.settings.clone(),
        }
    }

    /// Returns a link that shares `self`'s live token sequence.
    pub(crate) fn alias(&self) -> Link {
        self.clone()
    }

    /// Returns a link equal to `self` that owns a copy of its tokens.
    pub(crate) fn detached(&self) -> Link {
        Link {
            tokens: Tokens::new(self.tokens.to_vec()),
            property: self.property.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// The most recently appended token, `None` at the root.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_root(&self) -> bool {
        self.property.is_none()
    }

    /// Whether `self` and `other` belong to the same chain, that is, share the
    /// settings resolved when the chain's root was created.
    pub fn same_chain(&self, other: &Link) -> bool {
        Arc::ptr_eq(&self.settings, &other.settings)
    }

    /// Retrieves the extension member `name` if it exists and is a `T`.
    ///
    /// ```rust
    /// use chainable::{chain, Options};
    ///
    /// let root = chain(Options::new().extend("owner", "billing"));
    /// assert_eq!(root.at("a").at("b").extension::<&str>("owner"), Some(&"billing"));
    /// assert_eq!(root.extension::<u32>("owner"), None);
    /// ```
    pub fn extension<T: Any>(&self, name: &str) -> Option<&T> {
        self.settings.extension(name)?.downcast_ref::<T>()
    }

    /// Renders this link's path. Equivalent to `self.to_string()`.
    pub fn render(&self) -> String {
        serialize(self)
    }

    pub(crate) fn shared_settings(&self) -> &Arc<Settings> {
        &self.settings
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("tokens", &self.tokens)
            .field("property", &self.property)
            .finish()
    }
}

impl serde::Serialize for Link {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        ser.serialize_str(&serialize(self))
    }
}
