use regex::RegexBuilder;

/// Whether a shortcut's domain pattern applies to `host`.
///
/// Exact match first; `*.base` matches `base` and any subdomain of it;
/// anything else is tried as a case-insensitive regular expression. An
/// invalid expression never matches.
pub fn domain_matches(pattern: &str, host: &str) -> bool {
    if pattern == host {
        return true;
    }

    if let Some(base) = pattern.strip_prefix("*.") {
        return host == base || host.ends_with(&format!(".{}", base));
    }

    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(host))
        .unwrap_or(false)
}
