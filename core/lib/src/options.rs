use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::invoke::{Handler, Snapshot};
use crate::Value;

/// A per-token or whole-string transformation applied during rendering.
pub type Sanitizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// An arbitrary value attached to every link of a chain.
pub type Extension = Arc<dyn Any + Send + Sync>;

/// A configuration value that is always read through a closure.
///
/// Settings are built once, when a chain's options are resolved. A literal
/// becomes a closure returning a clone of that literal; a closure is kept as
/// is and re-evaluated every time the setting is read.
pub struct Setting<T>(Arc<dyn Fn() -> T + Send + Sync>);

impl<T> Setting<T> {
    pub fn dynamic<F>(f: F) -> Self
        where F: Fn() -> T + Send + Sync + 'static
    {
        Setting(Arc::new(f))
    }

    pub fn constant(value: T) -> Self
        where T: Clone + Send + Sync + 'static
    {
        Setting(Arc::new(move || value.clone()))
    }

    #[inline]
    pub fn get(&self) -> T {
        (self.0)()
    }
}

impl<T> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Setting(self.0.clone())
    }
}

/// Formats as `Setting(..)`. The closure is not evaluated.
impl<T> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Setting(..)")
    }
}

/// Conversion of a literal or a zero-argument closure into a [`Setting`].
///
/// Implemented for every `Fn() -> T`, for [`Setting<T>`] itself, and for the
/// literals that make sense for each setting: strings and optional strings for
/// `prefix`/`suffix`, strings and `char` for `separator`.
///
/// ```rust
/// use chainable::Options;
///
/// let literal = Options::new().prefix("app").separator('/');
/// let dynamic = Options::new().prefix(|| Some(std::process::id().to_string()));
/// # let _ = (literal, dynamic);
/// ```
pub trait IntoSetting<T> {
    fn into_setting(self) -> Setting<T>;
}

impl<T, F> IntoSetting<T> for F
    where F: Fn() -> T + Send + Sync + 'static
{
    fn into_setting(self) -> Setting<T> {
        Setting::dynamic(self)
    }
}

impl<T> IntoSetting<T> for Setting<T> {
    fn into_setting(self) -> Setting<T> {
        self
    }
}

impl IntoSetting<Option<String>> for &str {
    fn into_setting(self) -> Setting<Option<String>> {
        Setting::constant(Some(self.to_string()))
    }
}

impl IntoSetting<Option<String>> for String {
    fn into_setting(self) -> Setting<Option<String>> {
        Setting::constant(Some(self))
    }
}

impl IntoSetting<Option<String>> for Option<&str> {
    fn into_setting(self) -> Setting<Option<String>> {
        Setting::constant(self.map(|s| s.to_string()))
    }
}

impl IntoSetting<Option<String>> for Option<String> {
    fn into_setting(self) -> Setting<Option<String>> {
        Setting::constant(self)
    }
}

impl IntoSetting<String> for &str {
    fn into_setting(self) -> Setting<String> {
        Setting::constant(self.to_string())
    }
}

impl IntoSetting<String> for String {
    fn into_setting(self) -> Setting<String> {
        Setting::constant(self)
    }
}

impl IntoSetting<String> for char {
    fn into_setting(self) -> Setting<String> {
        Setting::constant(self.to_string())
    }
}

/// User-supplied chain options.
///
/// Every recognized setting is optional; anything left unset is filled in
/// from [`Options::merge`] defaults and then from the built-in defaults when
/// the options are resolved into [`Settings`]:
///
/// | setting                  | default   |
/// |--------------------------|-----------|
/// | `prefix`                 | none      |
/// | `suffix`                 | none      |
/// | `separator`              | `"."`     |
/// | `sanitize`               | identity  |
/// | `sanitize_links`         | identity  |
/// | `handle_link_invocation` | no-op     |
/// | `invocable_links`        | `false`   |
///
/// Arbitrary values registered with [`Options::extend()`] become _extension
/// members_, reachable from every link of the chain.
#[derive(Clone, Default)]
pub struct Options {
    prefix: Option<Setting<Option<String>>>,
    suffix: Option<Setting<Option<String>>>,
    separator: Option<Setting<String>>,
    sanitize: Option<Sanitizer>,
    sanitize_links: Option<Sanitizer>,
    handle_link_invocation: Option<Handler>,
    invocable_links: Option<bool>,
    extensions: IndexMap<String, Extension>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    pub fn prefix<S: IntoSetting<Option<String>>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into_setting());
        self
    }

    pub fn suffix<S: IntoSetting<Option<String>>>(mut self, suffix: S) -> Self {
        self.suffix = Some(suffix.into_setting());
        self
    }

    pub fn separator<S: IntoSetting<String>>(mut self, separator: S) -> Self {
        self.separator = Some(separator.into_setting());
        self
    }

    /// Sets the transformation applied once to the fully joined string.
    pub fn sanitize<F>(mut self, f: F) -> Self
        where F: Fn(&str) -> String + Send + Sync + 'static
    {
        self.sanitize = Some(Arc::new(f));
        self
    }

    /// Sets a sanitizer that ignores its input and always yields `value`.
    pub fn sanitize_const<S: Into<String>>(self, value: S) -> Self {
        let value = value.into();
        self.sanitize(move |_| value.clone())
    }

    /// Sets the transformation applied to every token before joining.
    pub fn sanitize_links<F>(mut self, f: F) -> Self
        where F: Fn(&str) -> String + Send + Sync + 'static
    {
        self.sanitize_links = Some(Arc::new(f));
        self
    }

    pub fn handle_link_invocation<F>(mut self, f: F) -> Self
        where F: Fn(&Snapshot, &[Value]) + Send + Sync + 'static
    {
        self.handle_link_invocation = Some(Arc::new(f));
        self
    }

    pub fn invocable_links(mut self, invocable: bool) -> Self {
        self.invocable_links = Some(invocable);
        self
    }

    /// Attaches `value` as the extension member `name`. A later call with the
    /// same `name` replaces the earlier value.
    pub fn extend<N, T>(mut self, name: N, value: T) -> Self
        where N: Into<String>, T: Any + Send + Sync
    {
        self.extensions.insert(name.into(), Arc::new(value));
        self
    }

    /// Fills every setting and extension left unset in `self` from
    /// `defaults`. Values already present in `self` win.
    pub fn merge(mut self, defaults: Options) -> Options {
        self.prefix = self.prefix.or(defaults.prefix);
        self.suffix = self.suffix.or(defaults.suffix);
        self.separator = self.separator.or(defaults.separator);
        self.sanitize = self.sanitize.or(defaults.sanitize);
        self.sanitize_links = self.sanitize_links.or(defaults.sanitize_links);
        self.handle_link_invocation = self.handle_link_invocation.or(defaults.handle_link_invocation);
        self.invocable_links = self.invocable_links.or(defaults.invocable_links);
        for (name, value) in defaults.extensions {
            self.extensions.entry(name).or_insert(value);
        }

        self
    }
}

impl From<()> for Options {
    fn from(_: ()) -> Self {
        Options::default()
    }
}

impl From<&str> for Options {
    fn from(prefix: &str) -> Self {
        Options::new().prefix(prefix)
    }
}

impl From<String> for Options {
    fn from(prefix: String) -> Self {
        Options::new().prefix(prefix)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("separator", &self.separator)
            .field("sanitize", &self.sanitize.is_some())
            .field("sanitize_links", &self.sanitize_links.is_some())
            .field("handle_link_invocation", &self.handle_link_invocation.is_some())
            .field("invocable_links", &self.invocable_links)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fully resolved chain configuration, shared by every link of one chain.
pub struct Settings {
    prefix: Setting<Option<String>>,
    suffix: Setting<Option<String>>,
    separator: Setting<String>,
    sanitize: Sanitizer,
    sanitize_links: Sanitizer,
    handle_link_invocation: Handler,
    invocable_links: bool,
    extensions: IndexMap<String, Extension>,
}

impl Settings {
    pub const DEFAULT_SEPARATOR: &'static str = ".";

    pub fn resolve(options: Options) -> Settings {
        let identity = || -> Sanitizer { Arc::new(|s: &str| s.to_string()) };
        Settings {
            prefix: options.prefix.unwrap_or_else(|| Setting::constant(None)),
            suffix: options.suffix.unwrap_or_else(|| Setting::constant(None)),
            separator: options.separator
                .unwrap_or_else(|| Setting::constant(Self::DEFAULT_SEPARATOR.into())),
            sanitize: options.sanitize.unwrap_or_else(identity),
            sanitize_links: options.sanitize_links.unwrap_or_else(identity),
            handle_link_invocation: options.handle_link_invocation
                .unwrap_or_else(|| Arc::new(|_: &Snapshot, _: &[Value]| ())),
            invocable_links: options.invocable_links.unwrap_or(false),
            extensions: options.extensions,
        }
    }

    pub fn prefix(&self) -> Option<String> {
        self.prefix.get()
    }

    pub fn suffix(&self) -> Option<String> {
        self.suffix.get()
    }

    pub fn separator(&self) -> String {
        self.separator.get()
    }

    pub fn sanitize(&self, string: &str) -> String {
        (self.sanitize)(string)
    }

    pub fn sanitize_links(&self, token: &str) -> String {
        (self.sanitize_links)(token)
    }

    pub fn handle_link_invocation(&self, snapshot: &Snapshot, args: &[Value]) {
        (self.handle_link_invocation)(snapshot, args)
    }

    pub fn invocable_links(&self) -> bool {
        self.invocable_links
    }

    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Extension)> {
        self.extensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn prefix_setting(&self) -> &Setting<Option<String>> {
        &self.prefix
    }

    pub(crate) fn suffix_setting(&self) -> &Setting<Option<String>> {
        &self.suffix
    }

    pub(crate) fn separator_setting(&self) -> &Setting<String> {
        &self.separator
    }

    pub(crate) fn sanitizer(&self) -> &Sanitizer {
        &self.sanitize
    }

    pub(crate) fn link_sanitizer(&self) -> &Sanitizer {
        &self.sanitize_links
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handle_link_invocation
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("separator", &self.separator)
            .field("invocable_links", &self.invocable_links)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_omissions() {
        let settings = Settings::resolve(Options::new());
        assert_eq!(settings.prefix(), None);
        assert_eq!(settings.suffix(), None);
        assert_eq!(settings.separator(), ".");
        assert_eq!(settings.sanitize("a/b"), "a/b");
        assert_eq!(settings.sanitize_links("a"), "a");
        assert!(!settings.invocable_links());
        assert_eq!(settings.extensions().count(), 0);
    }

    #[test]
    fn literals_become_constant_settings() {
        let settings = Settings::resolve(Options::new().prefix("foo").suffix(None::<&str>).separator('/'));
        assert_eq!(settings.prefix().as_deref(), Some("foo"));
        assert_eq!(settings.prefix(), settings.prefix());
        assert_eq!(settings.suffix(), None);
        assert_eq!(settings.separator(), "/");
    }

    #[test]
    fn closures_are_reevaluated() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let options = Options::new()
            .suffix(move || Some(c.fetch_add(1, Ordering::SeqCst).to_string()));

        let settings = Settings::resolve(options);
        assert_eq!(settings.suffix().as_deref(), Some("0"));
        assert_eq!(settings.suffix().as_deref(), Some("1"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn formatting_does_not_evaluate_closures() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let options = Options::new()
            .prefix(move || { c.fetch_add(1, Ordering::SeqCst); Some("p".to_string()) });

        let settings = Settings::resolve(options.clone());
        let _ = format!("{:?} {:?}", options, settings);
        assert_eq!(format!("{:?}", settings.prefix_setting()), "Setting(..)");
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sanitize_const_ignores_input() {
        let settings = Settings::resolve(Options::new().sanitize_const("fixed"));
        assert_eq!(settings.sanitize("anything"), "fixed");
        assert_eq!(settings.sanitize(""), "fixed");
    }

    #[test]
    fn merge_prefers_own_values() {
        let defaults = Options::new()
            .prefix("default")
            .separator("/")
            .extend("owner", "defaults")
            .extend("team", "core");

        let options = Options::new()
            .prefix("mine")
            .extend("owner", "caller")
            .merge(defaults);

        let settings = Settings::resolve(options);
        assert_eq!(settings.prefix().as_deref(), Some("mine"));
        assert_eq!(settings.separator(), "/");

        let owner = settings.extension("owner").and_then(|e| e.downcast_ref::<&str>());
        assert_eq!(owner, Some(&"caller"));
        let team = settings.extension("team").and_then(|e| e.downcast_ref::<&str>());
        assert_eq!(team, Some(&"core"));

        let names: Vec<_> = settings.extensions().map(|(name, _)| name).collect();
        assert_eq!(names, ["owner", "team"]);
    }

    #[test]
    fn string_options_are_prefixes() {
        let settings = Settings::resolve(Options::from("foo"));
        assert_eq!(settings.prefix().as_deref(), Some("foo"));

        let settings = Settings::resolve(Options::from(String::from("bar")));
        assert_eq!(settings.prefix().as_deref(), Some("bar"));
    }
}
