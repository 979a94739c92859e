use std::any::Any;
use std::sync::Arc;

use crate::error::Error;
use crate::link::{Link, Tokens};
use crate::options::Settings;
use crate::serialize::render;
use crate::Value;

/// The callback run when an invocable link is invoked.
pub type Handler = Arc<dyn Fn(&Snapshot, &[Value]) + Send + Sync>;

/// A shallow copy of a link, taken when the link is invoked.
///
/// `tokens` is the invoked link's _live_ sequence, not a copy: tokens a handler
/// pushes onto it are part of the invoked link's path from then on, and thus of
/// every link subsequently derived from it.
#[derive(Clone)]
pub struct Snapshot {
    pub tokens: Tokens,
    pub property: Option<String>,
    settings: Arc<Settings>,
}

impl Snapshot {
    pub fn prefix(&self) -> Option<String> {
        self.settings.prefix()
    }

    pub fn suffix(&self) -> Option<String> {
        self.settings.suffix()
    }

    pub fn separator(&self) -> String {
        self.settings.separator()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn extension<T: Any>(&self, name: &str) -> Option<&T> {
        self.settings.extension(name)?.downcast_ref::<T>()
    }

    /// Renders the snapshot's current tokens the way the link would.
    pub fn render(&self) -> String {
        render(&self.tokens.to_vec(), &self.settings)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("tokens", &self.tokens)
            .field("property", &self.property)
            .finish()
    }
}

impl Link {
    pub fn is_invocable(&self) -> bool {
        self.settings().invocable_links()
    }

    /// Invokes this link with `args`.
    ///
    /// Runs the chain's `handle_link_invocation` callback with a [`Snapshot`]
    /// of this link and the arguments, then returns a link that shares this
    /// link's tokens so that chaining continues: `link.invoke(..)?.at("next")`
    /// renders like `link.at("next")`, plus whatever the handler appended.
    ///
    /// Returns [`Error::NotInvocable`] if the chain wasn't created with
    /// `invocable_links` set.
    ///
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use chainable::{chain, Options};
    ///
    /// let log = Arc::new(Mutex::new(vec![]));
    /// let sink = log.clone();
    /// let root = chain(Options::new()
    ///     .invocable_links(true)
    ///     .handle_link_invocation(move |link, args| {
    ///         sink.lock().unwrap().push(format!("{} {}", link.render(), args[0]));
    ///     }));
    ///
    /// let link = root.at("user").invoke([7]).unwrap().at("login");
    /// assert_eq!(link.to_string(), "user.login");
    /// assert_eq!(*log.lock().unwrap(), ["user 7"]);
    /// ```
    pub fn invoke<I, V>(&self, args: I) -> Result<Link, Error>
        where I: IntoIterator<Item = V>, V: Into<Value>
    {
        if !self.is_invocable() {
            return Err(Error::NotInvocable { path: self.render() });
        }

        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        let snapshot = Snapshot {
            tokens: self.tokens().clone(),
            property: self.property().map(|p| p.to_string()),
            settings: self.shared_settings().clone(),
        };

        debug!("invoking chain link {:?} with {} argument(s)", snapshot.property, args.len());
        self.settings().handle_link_invocation(&snapshot, &args);
        Ok(self.alias())
    }

    /// Invokes this link with no arguments.
    pub fn call(&self) -> Result<Link, Error> {
        self.invoke(std::iter::empty::<Value>())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::{chain, Error, Options, Value};

    #[test]
    fn non_invocable_chains_reject_calls() {
        let link = chain(()).at("a").at("b");
        assert!(!link.is_invocable());
        match link.call() {
            Err(Error::NotInvocable { path }) => assert_eq!(path, "a.b"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn call_chaining_matches_property_chaining() {
        let root = chain(Options::new().invocable_links(true));
        let called = root.at("a").call().unwrap().at("b").call().unwrap().at("c").call().unwrap();
        assert_eq!(called.to_string(), "a.b.c");

        let c = root.at("a").at("b").at("c");
        assert_eq!(c.call().unwrap().to_string(), "a.b.c");
        assert_eq!(called.tokens(), c.tokens());
    }

    #[test]
    fn handler_sees_snapshot_and_args() {
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let root = chain(Options::new()
            .invocable_links(true)
            .extend("service", "billing")
            .handle_link_invocation(move |snapshot, args| {
                assert_eq!(snapshot.prefix(), None);
                assert_eq!(snapshot.suffix(), None);
                assert_eq!(snapshot.separator(), ".");
                assert_eq!(snapshot.extension::<&str>("service"), Some(&"billing"));
                assert!(!snapshot.tokens.is_empty());
                sink.lock().push((snapshot.property.clone(), args.to_vec()));
            }));

        root.at("foo").invoke([1]).unwrap()
            .at("bar").invoke(vec![Value::from("x"), Value::from(true)]).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Some("foo".to_string()), vec![Value::from(1)]));
        assert_eq!(seen[1].0.as_deref(), Some("bar"));
        assert_eq!(seen[1].1, [Value::from("x"), Value::from(true)]);
    }

    #[test]
    fn handler_pushes_land_in_the_live_tokens() {
        let root = chain(Options::new()
            .invocable_links(true)
            .handle_link_invocation(|snapshot, _| snapshot.tokens.push("hello")));

        let link = root.at("a").call().unwrap().at("b").call().unwrap().at("c").call().unwrap();
        assert_eq!(link.to_string(), "a.hello.b.hello.c.hello");

        let link = root.at("a").call().unwrap().at("b").call().unwrap();
        assert_eq!(link.to_string(), "a.hello.b.hello");
    }

    #[test]
    fn handler_pushes_do_not_leak_into_siblings() {
        let root = chain(Options::new()
            .invocable_links(true)
            .handle_link_invocation(|snapshot, _| snapshot.tokens.push("x")));

        let a = root.at("a");
        let sibling = root.at("a");
        a.call().unwrap();

        assert_eq!(a.to_string(), "a.x");
        assert_eq!(sibling.to_string(), "a");
        assert!(root.tokens().is_empty());
    }

    #[test]
    #[should_panic(expected = "handler failed")]
    fn handler_panics_propagate() {
        let root = chain(Options::new()
            .invocable_links(true)
            .handle_link_invocation(|_, _| panic!("handler failed")));

        let _ = root.at("a").call();
    }

    #[test]
    fn snapshot_renders_like_its_link() {
        let rendered = Arc::new(Mutex::new(String::new()));
        let sink = rendered.clone();
        let root = chain(Options::new()
            .prefix("app")
            .invocable_links(true)
            .handle_link_invocation(move |snapshot, _| *sink.lock() = snapshot.render()));

        root.at("a").at("b").call().unwrap();
        assert_eq!(*rendered.lock(), "app.a.b");
    }
}
