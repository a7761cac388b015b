use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::config::LoggerConfig;
use crate::error::LoggerResult;

lazy_static! {
    static ref EMAIL_REGEX: Option<Regex> =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").ok();
    static ref PHONE_REGEX: Option<Regex> =
        Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").ok();
}

/// PHI redaction settings
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub salt: Option<String>,
    /// Extra `(pattern, replacement)` pairs applied to free text
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            salt: None,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Add a free-text pattern, e.g. `r"\bMRN\d+"`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LoggerError::InvalidPattern`] if `pattern` does not compile.
    pub fn with_pattern(mut self, pattern: &str, replacement: &str) -> LoggerResult<Self> {
        self.custom_patterns.push((Regex::new(pattern)?, replacement.to_string()));
        Ok(self)
    }
}

/// Redacts PHI from log output
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(RedactionConfig {
            enabled: config.redaction_enabled,
            salt: config.correlation_salt.clone(),
            ..RedactionConfig::default()
        })
    }

    /// Redaction turned off; values pass through untouched.
    pub fn disabled() -> Self {
        Self::new(RedactionConfig { enabled: false, ..RedactionConfig::default() })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Replace an identifier with a stable token: the same input always
    /// yields the same `PHI[...]` value under one salt.
    pub fn pseudonymize(&self, identifier: &str) -> String {
        if !self.config.enabled {
            return identifier.to_string();
        }
        if identifier.trim().is_empty() {
            return "PHI[-]".to_string();
        }
        format!("PHI[{}]", self.hash_value(identifier))
    }

    /// Scrub e-mail addresses, phone numbers and custom patterns from text.
    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        if let (true, Some(email)) = (self.config.redact_emails, EMAIL_REGEX.as_ref()) {
            result = email
                .replace_all(&result, |caps: &regex::Captures| {
                    let matched = caps.get(0).map_or("", |m| m.as_str());
                    format!("EMAIL[{}]", self.hash_value(matched))
                })
                .into_owned();
        }

        if let (true, Some(phone)) = (self.config.redact_phones, PHONE_REGEX.as_ref()) {
            result = phone.replace_all(&result, "PHONE[REDACTED]").into_owned();
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(salt) = &self.config.salt {
            hasher.update(salt.as_bytes());
            hasher.update(b":");
        }
        hasher.update(value.trim().as_bytes());
        let digest = hasher.finalize();
        general_purpose::URL_SAFE_NO_PAD.encode(digest.get(..8).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudonym_is_stable_and_opaque() {
        let redactor = PiiRedactor::default();
        let token = redactor.pseudonymize("P-1001");
        assert_eq!(token, redactor.pseudonymize(" P-1001 "));
        assert!(token.starts_with("PHI[") && token.ends_with(']'));
        assert!(!token.contains("1001"));
        assert_ne!(token, redactor.pseudonymize("P-1002"));
    }

    #[test]
    fn test_salt_changes_pseudonym() {
        let plain = PiiRedactor::default();
        let salted = PiiRedactor::new(RedactionConfig {
            salt: Some("site-7".to_string()),
            ..Default::default()
        });
        assert_ne!(plain.pseudonymize("P-1"), salted.pseudonymize("P-1"));
    }

    #[test]
    fn test_blank_identifier() {
        assert_eq!(PiiRedactor::default().pseudonymize("  "), "PHI[-]");
    }

    #[test]
    fn test_email_and_phone_redaction() {
        let redactor = PiiRedactor::default();
        let redacted = redactor.redact("Reach john.doe@example.com at (555) 123-4567");
        assert!(!redacted.contains("john.doe"));
        assert!(redacted.contains("EMAIL["));
        assert!(redacted.contains("PHONE[REDACTED]"));
    }

    #[test]
    fn test_custom_pattern() {
        let config = RedactionConfig::default().with_pattern(r"\bMRN\d+", "MRN[REDACTED]").unwrap();
        let redactor = PiiRedactor::new(config);
        assert_eq!(redactor.redact("chart MRN123456 updated"), "chart MRN[REDACTED] updated");
        assert!(RedactionConfig::default().with_pattern("(", "x").is_err());
    }

    #[test]
    fn test_disabled_passthrough() {
        let redactor = PiiRedactor::disabled();
        assert_eq!(redactor.pseudonymize("P-1"), "P-1");
        assert_eq!(redactor.redact("a@b.io"), "a@b.io");
    }
}
