use crate::link::Link;
use crate::options::Options;

/// A chain constructor pre-seeded with default options.
///
/// Every chain created through [`ChainFactory::chain()`] uses the options
/// given to that call, with anything they leave unset filled from the
/// factory's defaults.
///
/// ```rust
/// use chainable::{chain_factory, Options};
///
/// let metrics = chain_factory(Options::new().prefix("foo"));
/// let root = metrics.chain(Options::new().suffix("bar"));
/// assert_eq!(root.at(1).at(2).at(3).to_string(), "foo.1.2.3.bar");
///
/// // Per-call options override the defaults.
/// assert_eq!(metrics.chain("baz").at("x").to_string(), "baz.x");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChainFactory {
    defaults: Options,
}

impl ChainFactory {
    pub fn new<O: Into<Options>>(defaults: O) -> Self {
        ChainFactory { defaults: defaults.into() }
    }

    /// Creates the root link of a new chain from `options` merged over this
    /// factory's defaults.
    pub fn chain<O: Into<Options>>(&self, options: O) -> Link {
        crate::chain(options.into().merge(self.defaults.clone()))
    }
}

/// Returns a [`ChainFactory`] with `defaults` as its default options.
pub fn chain_factory<O: Into<Options>>(defaults: O) -> ChainFactory {
    ChainFactory::new(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_defaults() {
        let factory = chain_factory(());
        let root = factory.chain(Options::new().suffix("bar"));
        assert_eq!(root.at(1).at(2).at(3).to_string(), "1.2.3.bar");
    }

    #[test]
    fn defaults_and_options_combine() {
        let factory = chain_factory(Options::new().prefix("foo").separator(':'));
        let root = factory.chain(Options::new().suffix("bar"));
        assert_eq!(root.at("a").to_string(), "foo:a:bar");
    }

    #[test]
    fn each_chain_is_independent() {
        let factory = chain_factory("foo");
        let first = factory.chain(());
        let second = factory.chain(());
        assert!(!first.same_chain(&second));
        assert_eq!(first.at("a").to_string(), second.at("a").to_string());
    }

    #[test]
    fn extensions_come_from_defaults() {
        let factory = chain_factory(Options::new()
            .prefix("foo")
            .extend("hello", (|| "world!") as fn() -> &'static str));

        let root = factory.chain(Options::new().suffix("bar"));
        let hello = root.at(1).at(2).at(3).extension::<fn() -> &'static str>("hello").copied();
        assert_eq!(hello.map(|f| f()), Some("world!"));
    }
}
