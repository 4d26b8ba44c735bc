use tracing::debug;
use url::Url;

/// Turns any input into a URL that is safe to hand to the browser.
///
/// Fragments are dropped and anything that is not an absolute http(s) URL
/// becomes the fallback page. Sanitizing a sanitized value returns it
/// unchanged.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    fallback: String,
}

impl Sanitizer {
    pub fn new(fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        // An http(s) fallback goes through the same normalization as inputs.
        let fallback = match Url::parse(&fallback) {
            Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
                url.set_fragment(None);
                url.to_string()
            }
            _ => fallback,
        };
        Self { fallback }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn sanitize(&self, input: &str) -> String {
        let mut url = match Url::parse(input) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "unparsable url; using fallback");
                return self.fallback.clone();
            }
        };

        url.set_fragment(None);

        if !matches!(url.scheme(), "http" | "https") {
            debug!(scheme = url.scheme(), "non-http scheme; using fallback");
            return self.fallback.clone();
        }

        url.to_string()
    }
}
