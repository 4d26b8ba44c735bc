use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::warn;
use url::Url;

/// High-risk substrings rejected in a hostname or path.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "evil.com",
    "malware.com",
    "phishing.",
    "virus.",
    "trojan.",
    "account-verify.",
    "secure-login.",
    "verification-required.",
    "wallet-validate.",
    "crypto-verify.",
    "invoice-attached.",
    "secure-file.",
];

const MAX_HOSTNAME_DOTS: usize = 5;
const MAX_HOSTNAME_LEN: usize = 100;

/// Why the gate rejected a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Unparsable,
    DisallowedScheme,
    Blocklisted,
    IpLiteral,
    ExcessiveSubdomains,
    HostnameTooLong,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unparsable => "unparsable",
            Self::DisallowedScheme => "disallowed_scheme",
            Self::Blocklisted => "blocklisted",
            Self::IpLiteral => "ip_literal",
            Self::ExcessiveSubdomains => "excessive_subdomains",
            Self::HostnameTooLong => "hostname_too_long",
        }
    }

    /// Human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Unparsable => "URL could not be parsed",
            Self::DisallowedScheme => "only http and https URLs are allowed",
            Self::Blocklisted => "URL matches a high-risk pattern",
            Self::IpLiteral => "IP address hostnames are not allowed",
            Self::ExcessiveSubdomains => "hostname has too many subdomains",
            Self::HostnameTooLong => "hostname is too long",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    Safe,
    Rejected(RejectionReason),
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Safe => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Heuristic pre-navigation URL filter.
///
/// Rules apply in order and the first failing rule wins. The blocklist is
/// matched as plain, case-sensitive substrings of the hostname and path.
#[derive(Debug, Clone)]
pub struct SafetyGate {
    blocklist: Vec<String>,
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect())
    }
}

impl SafetyGate {
    pub fn new(blocklist: Vec<String>) -> Self {
        Self { blocklist }
    }

    /// Gate with a configured blocklist, or the built-in one when `None`.
    pub fn with_blocklist(blocklist: Option<Vec<String>>) -> Self {
        blocklist.map(Self::new).unwrap_or_default()
    }

    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }

    pub fn is_safe(&self, input: &str) -> bool {
        self.check(input).is_safe()
    }

    pub fn check(&self, input: &str) -> SafetyVerdict {
        let verdict = self.evaluate(input);
        if let SafetyVerdict::Rejected(reason) = verdict {
            warn!(url = input, rule = reason.as_str(), "url rejected by safety gate");
        }
        verdict
    }

    fn evaluate(&self, input: &str) -> SafetyVerdict {
        use RejectionReason::*;

        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(_) => return SafetyVerdict::Rejected(Unparsable),
        };

        if !matches!(url.scheme(), "http" | "https") {
            return SafetyVerdict::Rejected(DisallowedScheme);
        }

        let host = url.host_str().unwrap_or_default();
        let path = url.path();

        if self
            .blocklist
            .iter()
            .any(|pattern| host.contains(pattern.as_str()) || path.contains(pattern.as_str()))
        {
            return SafetyVerdict::Rejected(Blocklisted);
        }

        if ipv4_literal().is_match(host) {
            return SafetyVerdict::Rejected(IpLiteral);
        }

        if host.matches('.').count() > MAX_HOSTNAME_DOTS {
            return SafetyVerdict::Rejected(ExcessiveSubdomains);
        }

        if host.len() > MAX_HOSTNAME_LEN {
            return SafetyVerdict::Rejected(HostnameTooLong);
        }

        SafetyVerdict::Safe
    }
}

fn ipv4_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("static regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use RejectionReason::*;

    fn reason(input: &str) -> Option<RejectionReason> {
        SafetyGate::default().check(input).reason()
    }

    #[test]
    fn rejects_known_bad_urls() {
        assert_eq!(reason("javascript:alert(1)"), Some(DisallowedScheme));
        assert_eq!(reason("http://203.0.113.5/x"), Some(IpLiteral));
        assert_eq!(
            reason("https://a.b.c.d.e.f.example.com"),
            Some(ExcessiveSubdomains)
        );
        assert_eq!(
            reason(&format!("https://{}.com", "a".repeat(101))),
            Some(HostnameTooLong)
        );
        assert_eq!(reason("https://secure-login.example.com"), Some(Blocklisted));
    }

    #[test]
    fn accepts_ordinary_urls() {
        let gate = SafetyGate::default();
        assert!(gate.is_safe("https://example.com/path"));
        assert!(gate.is_safe("http://sub.example.com"));
        assert!(gate.is_safe("https://docs.rs/regex/latest/regex/?search=x#frag"));
    }

    #[test]
    fn rejects_unparsable_and_relative() {
        assert_eq!(reason(""), Some(Unparsable));
        assert_eq!(reason("example.com"), Some(Unparsable));
        assert_eq!(reason("/relative/path"), Some(Unparsable));
    }

    #[test]
    fn rejects_other_schemes() {
        for input in [
            "ftp://example.com/file",
            "file:///etc/passwd",
            "data:text/html,<b>x</b>",
            "chrome://settings",
        ] {
            assert_eq!(reason(input), Some(DisallowedScheme), "{}", input);
        }
    }

    #[test]
    fn blocklist_matches_path_too() {
        assert_eq!(
            reason("https://example.com/phishing.html"),
            Some(Blocklisted)
        );
        assert_eq!(reason("https://malware.com"), Some(Blocklisted));
    }

    #[test]
    fn blocklist_is_case_sensitive_on_path() {
        assert_eq!(reason("https://example.com/PHISHING.html"), None);
    }

    #[test]
    fn five_dots_is_allowed() {
        assert_eq!(reason("https://a.b.c.d.example.com"), None);
        assert_eq!(
            reason("https://a.b.c.d.e.example.com"),
            Some(ExcessiveSubdomains)
        );
    }

    #[test]
    fn hundred_char_hostname_is_allowed() {
        let host = format!("{}.com", "a".repeat(96));
        assert_eq!(host.len(), 100);
        assert_eq!(reason(&format!("https://{}", host)), None);
    }

    #[test]
    fn blocklist_precedes_ip_rule() {
        let gate = SafetyGate::new(vec!["10.0.".to_string()]);
        assert_eq!(gate.check("http://10.0.0.1/").reason(), Some(Blocklisted));
    }

    #[test]
    fn configured_blocklist_replaces_default() {
        let gate = SafetyGate::with_blocklist(Some(vec!["internal.".to_string()]));
        assert!(gate.is_safe("https://secure-login.example.com"));
        assert!(!gate.is_safe("https://internal.example.com"));

        let gate = SafetyGate::with_blocklist(None);
        assert_eq!(gate.blocklist().len(), DEFAULT_BLOCKLIST.len());
    }

    #[test]
    fn reason_serializes_snake_case() {
        let json = serde_json::to_string(&IpLiteral).unwrap();
        assert_eq!(json, "\"ip_literal\"");
        assert_eq!(HostnameTooLong.to_string(), "hostname_too_long");
    }
}
