use figment::{Figment, Metadata, Profile, Provider};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::{Dict, Map};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::options::{Options, Settings};

/// Literal chain options read from configuration sources.
///
/// Only the options that can be written down as plain values are
/// configurable this way; sanitizers, handlers, and extension members are
/// added in code, for instance by merging with a [`ChainFactory`]'s defaults.
///
/// # Sources
///
/// [`Config::figment()`] layers the following sources, later ones winning:
///
///   * `Config::default()`
///   * the TOML file at the path in `CHAINABLE_CONFIG`, `Chainable.toml` if
///     unset
///   * environment variables prefixed with `CHAINABLE_`, for instance
///     `CHAINABLE_PREFIX=app` or `CHAINABLE_INVOCABLE_LINKS=true`
///
/// ```rust
/// use chainable::{chain, Config};
///
/// figment::Jail::expect_with(|jail| {
///     jail.create_file("Chainable.toml", r#"
///         prefix = "app"
///         separator = "/"
///     "#)?;
///
///     jail.set_env("CHAINABLE_SUFFIX", "v1");
///
///     let config = Config::from_env().expect("valid config");
///     assert_eq!(chain(config).at("users").to_string(), "app/users/v1");
///     Ok(())
/// });
/// ```
///
/// [`ChainFactory`]: crate::ChainFactory
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub separator: String,
    pub invocable_links: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prefix: None,
            suffix: None,
            separator: Settings::DEFAULT_SEPARATOR.into(),
            invocable_links: false,
        }
    }
}

impl Config {
    /// The environment variable naming the TOML configuration file.
    pub const CONFIG_ENV: &'static str = "CHAINABLE_CONFIG";

    /// The TOML file read when `CHAINABLE_CONFIG` is unset.
    pub const DEFAULT_CONFIG_FILE: &'static str = "Chainable.toml";

    pub fn figment() -> Figment {
        Figment::from(Config::default())
            .merge(Toml::file(Env::var_or(Self::CONFIG_ENV, Self::DEFAULT_CONFIG_FILE)))
            .merge(Env::prefixed("CHAINABLE_").ignore(&["CONFIG"]))
    }

    /// Extracts a `Config` from `provider`.
    pub fn try_from<T: Provider>(provider: T) -> Result<Config, Error> {
        let figment = Figment::from(provider);
        let config = figment.extract::<Config>()?;
        debug!("chain configuration: {:?}", config);
        Ok(config)
    }

    /// Extracts a `Config` from [`Config::figment()`].
    pub fn from_env() -> Result<Config, Error> {
        Config::try_from(Config::figment())
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("chainable::Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl From<Config> for Options {
    fn from(config: Config) -> Options {
        Options::new()
            .prefix(config.prefix)
            .suffix(config.suffix)
            .separator(config.separator)
            .invocable_links(config.invocable_links)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;
    use crate::chain;

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_| {
            assert_eq!(Config::from_env().unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn toml_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file("Chainable.toml", r#"
                prefix = "app"
                separator = ":"
                invocable_links = true
            "#)?;

            let config = Config::from_env().unwrap();
            assert_eq!(config.prefix.as_deref(), Some("app"));
            assert_eq!(config.separator, ":");
            assert!(config.invocable_links);

            jail.set_env("CHAINABLE_PREFIX", "svc");
            jail.set_env("CHAINABLE_INVOCABLE_LINKS", false);
            let config = Config::from_env().unwrap();
            assert_eq!(config.prefix.as_deref(), Some("svc"));
            assert!(!config.invocable_links);
            Ok(())
        });
    }

    #[test]
    fn config_file_is_configurable() {
        Jail::expect_with(|jail| {
            jail.create_file("Other.toml", r#"suffix = "total""#)?;
            jail.set_env("CHAINABLE_CONFIG", "Other.toml");

            let config = Config::from_env().unwrap();
            assert_eq!(config.suffix.as_deref(), Some("total"));
            assert_eq!(chain(config).at("a").to_string(), "a.total");
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_config_errors() {
        Jail::expect_with(|jail| {
            jail.create_file("Chainable.toml", "invocable_links = [1, 2]")?;
            match Config::from_env() {
                Err(Error::Config(_)) => {}
                other => panic!("unexpected: {:?}", other),
            }

            Ok(())
        });
    }

    #[test]
    fn config_is_a_provider() {
        let config = Config { prefix: Some("p".into()), ..Config::default() };
        let extracted = Config::try_from(Figment::from(config.clone())).unwrap();
        assert_eq!(extracted, config);
    }

    #[test]
    fn partial_sources_fall_back_to_defaults() {
        let config = Config::try_from(Toml::string("prefix = \"a\"")).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("a"));
        assert_eq!(config.suffix, None);
        assert_eq!(config.separator, ".");
        assert!(!config.invocable_links);

        let config = Config::try_from(Toml::string("")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_becomes_options() {
        let config = Config {
            prefix: Some("p".into()),
            suffix: None,
            separator: "-".into(),
            invocable_links: true,
        };

        let link = chain(config).at("a");
        assert!(link.is_invocable());
        assert_eq!(link.to_string(), "p-a");
    }
}
