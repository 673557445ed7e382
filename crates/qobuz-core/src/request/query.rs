//! Query string builder.

/// Appends `name=value` pairs to a URL.
///
/// The first pair is introduced with `?`, every later one with `&`. The
/// builder only remembers whether it has emitted the first separator, so use
/// one builder per URL.
///
/// ```
/// use qobuz_core::QueryStringBuilder;
///
/// let mut url = String::from("https://example.com/track/get");
/// QueryStringBuilder::new()
///     .append(&mut url, "track_id", "1")
///     .append(&mut url, "app_id", "A1");
/// assert_eq!(url, "https://example.com/track/get?track_id=1&app_id=A1");
/// ```
#[derive(Debug, Clone)]
pub struct QueryStringBuilder {
    first: bool,
}

impl QueryStringBuilder {
    pub fn new() -> Self {
        Self { first: true }
    }

    /// Append one pair to `dest`. No escaping is performed.
    pub fn append(&mut self, dest: &mut String, name: &str, value: &str) -> &mut Self {
        dest.push(if self.first { '?' } else { '&' });
        self.first = false;

        dest.push_str(name);
        dest.push('=');
        dest.push_str(value);

        self
    }
}

impl Default for QueryStringBuilder {
    fn default() -> Self {
        Self::new()
    }
}
