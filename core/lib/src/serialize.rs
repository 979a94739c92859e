use crate::link::Link;
use crate::options::Settings;

/// Renders `link`'s tokens into its formatted path.
///
/// The prefix, the tokens (each passed through `sanitize_links`), and the
/// suffix are joined by the separator, skipping an absent prefix or suffix.
/// The joined string is passed through `sanitize` exactly once. An empty
/// prefix or suffix is _not_ absent and keeps its slot.
///
/// ```rust
/// use chainable::{chain, serialize, Options};
///
/// let root = chain(Options::new().prefix("foo").suffix("bar").separator('/'));
/// assert_eq!(serialize(&root.at("a").at("b")), "foo/a/b/bar");
///
/// let root = chain(Options::new().prefix("").separator('/'));
/// assert_eq!(serialize(&root.at("a")), "/a");
/// ```
pub fn serialize(link: &Link) -> String {
    render(&link.tokens().to_vec(), link.settings())
}

pub(crate) fn render(tokens: &[String], settings: &Settings) -> String {
    let prefix = settings.prefix();
    let suffix = settings.suffix();
    let rendered = tokens.iter().map(|token| settings.sanitize_links(token));

    let parts: Vec<String> = prefix.into_iter()
        .chain(rendered)
        .chain(suffix)
        .collect();

    settings.sanitize(&parts.join(&settings.separator()))
}
