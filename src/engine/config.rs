//! Per-engine configuration.
//!
//! `InstanceConfig` is a snapshot of the catalog defaults taken when an engine
//! is created: one enabled flag per known rule name (main or inner) and a copy
//! of each main rule's default settings. Inner-only names start enabled. Later
//! changes to the catalog are not reflected.
//!
//! ## Masks
//!
//! `enable`/`disable` accept exact names or masks. A mask contains `*`, which
//! matches any run of characters; every other character is literal. Masks are
//! matched (unanchored) against every rule name the catalog knew at snapshot
//! time. Exact names are written as-is, even when the catalog never heard of
//! them.

use super::catalog::RuleCatalog;
use crate::{Mode, Settings};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InstanceConfig {
    lang: Option<String>,
    mode: Mode,
    enabled: HashMap<String, bool>,
    settings: HashMap<String, Settings>,
    known_rules: Vec<String>,
}

impl InstanceConfig {
    /// Snapshot the catalog's defaults.
    pub fn from_catalog(catalog: &RuleCatalog, lang: Option<String>, mode: Mode) -> Self {
        let mut enabled = HashMap::new();
        let mut settings = HashMap::new();

        for rule in catalog.rules() {
            enabled.insert(rule.name().to_string(), rule.enabled_by_default());
            settings.insert(rule.name().to_string(), rule.settings().clone());
        }
        // A name owned by both kinds keeps the main rule's default.
        for rule in catalog.inner_rules() {
            enabled.entry(rule.name().to_string()).or_insert(true);
        }

        let known_rules = catalog.rule_names().into_iter().map(str::to_string).collect();

        Self { lang, mode, enabled, settings, known_rules }
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_lang(&mut self, lang: Option<String>) -> &mut Self {
        self.lang = lang;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Unknown names are disabled.
    pub fn is_enabled(&self, rule: &str) -> bool {
        self.enabled.get(rule).copied().unwrap_or(false)
    }

    pub fn is_disabled(&self, rule: &str) -> bool {
        !self.is_enabled(rule)
    }

    pub fn enable(&mut self, patterns: impl IntoPatterns) -> &mut Self {
        for pattern in patterns.into_patterns() {
            self.set_by_mask(&pattern, true);
        }
        self
    }

    pub fn disable(&mut self, patterns: impl IntoPatterns) -> &mut Self {
        for pattern in patterns.into_patterns() {
            self.set_by_mask(&pattern, false);
        }
        self
    }

    fn set_by_mask(&mut self, pattern: &str, enabled: bool) {
        if !pattern.contains('*') {
            self.enabled.insert(pattern.to_string(), enabled);
            return;
        }

        let re = match mask_to_regex(pattern) {
            Ok(re) => re,
            Err(err) => {
                tracing::warn!(pattern, %err, "skipping rule mask that does not compile");
                return;
            }
        };

        let mut matched = 0usize;
        for name in &self.known_rules {
            if re.is_match(name) {
                self.enabled.insert(name.clone(), enabled);
                matched += 1;
            }
        }
        tracing::debug!(pattern, enabled, matched, "applied rule mask");
    }

    pub fn setting(&self, rule: &str, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(rule)?.get(key)
    }

    /// Write a setting, creating the rule's settings map on first use.
    pub fn set_setting(&mut self, rule: &str, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.settings.entry(rule.to_string()).or_default().insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn settings_for(&self, rule: &str) -> Option<&Settings> {
        self.settings.get(rule)
    }
}

fn mask_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let body: Vec<String> = pattern.split('*').map(regex::escape).collect();
    Regex::new(&body.join(".*"))
}

/// One rule name or mask, or a sequence of them.
pub trait IntoPatterns {
    fn into_patterns(self) -> Vec<String>;
}

impl IntoPatterns for &str {
    fn into_patterns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPatterns for String {
    fn into_patterns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoPatterns for &String {
    fn into_patterns(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<T: AsRef<str>> IntoPatterns for &[T] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>, const N: usize> IntoPatterns for [T; N] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>> IntoPatterns for Vec<T> {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>> IntoPatterns for &Vec<T> {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.as_ref().to_string()).collect()
    }
}
