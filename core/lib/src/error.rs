use std::fmt;

/// The errors that chain operations can produce.
///
/// Building and rendering chains never fails; errors arise only from invoking
/// a link of a chain that isn't invocable and from extracting a
/// [`Config`](crate::Config) out of configuration sources.
#[derive(Debug)]
pub enum Error {
    /// A link was invoked, but its chain wasn't created with
    /// `invocable_links` set. `path` is the link's rendered path.
    NotInvocable { path: String },
    /// Extracting a configuration failed.
    Config(figment::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotInvocable { path } => {
                write!(f, "chain link `{}` is not invocable", path)
            }
            Error::Config(e) => write!(f, "invalid chain configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::NotInvocable { .. } => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(error: figment::Error) -> Self {
        Error::Config(error)
    }
}
