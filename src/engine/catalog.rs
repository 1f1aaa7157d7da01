//! Rule registry.
//!
//! A `RuleCatalog` is the static side of the engine: the ordered list of main
//! rules, the ordered list of inner rules, and the shared data strings rules
//! read at run time. Engines hold it behind an `Arc` and never mutate it, so
//! all registration happens on an owned catalog before it is shared.
//!
//! ## Invariants
//!
//! - Main rule names are unique; inner rules are unique by `(name, queue)`.
//!   Registering an existing key overwrites the entry in place.
//! - Both lists are sorted by `sort_index` ascending after every
//!   registration. The sort is stable, so rules with equal indexes keep
//!   registration order.

use crate::error::TypografError;
use crate::{InnerRuleDefinition, RuleDefinition};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

static BUILTIN: Lazy<Arc<RuleCatalog>> = Lazy::new(|| Arc::new(crate::rules::catalog()));

#[derive(Clone, Debug, Default)]
pub struct RuleCatalog {
    rules: Vec<RuleDefinition>,
    inner: Vec<InnerRuleDefinition>,
    data: BTreeMap<String, String>,
}

impl RuleCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide catalog with the built-in rule set.
    ///
    /// Built lazily on first use; clone it (`(*RuleCatalog::builtin()).clone()`)
    /// to extend it with more rules.
    pub fn builtin() -> Arc<RuleCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Add a main rule, or replace the rule with the same name.
    pub fn register(&mut self, rule: RuleDefinition) -> Result<&mut Self, TypografError> {
        if rule.name().is_empty() {
            return Err(TypografError::EmptyRuleName);
        }

        match self.rules.iter().position(|r| r.name() == rule.name()) {
            Some(idx) => {
                tracing::debug!(rule = rule.name(), "replacing rule");
                self.rules[idx] = rule;
            }
            None => {
                tracing::debug!(rule = rule.name(), sort_index = rule.sort_index(), "registering rule");
                self.rules.push(rule);
            }
        }
        self.rules.sort_by_key(RuleDefinition::sort_index);

        Ok(self)
    }

    /// Add an inner rule, or replace the one with the same name and queue.
    pub fn register_inner(&mut self, rule: InnerRuleDefinition) -> Result<&mut Self, TypografError> {
        if rule.name().is_empty() {
            return Err(TypografError::EmptyRuleName);
        }

        match self.inner.iter().position(|r| r.name() == rule.name() && r.queue() == rule.queue()) {
            Some(idx) => {
                tracing::debug!(rule = rule.name(), queue = ?rule.queue(), "replacing inner rule");
                self.inner[idx] = rule;
            }
            None => {
                tracing::debug!(rule = rule.name(), queue = ?rule.queue(), "registering inner rule");
                self.inner.push(rule);
            }
        }
        self.inner.sort_by_key(InnerRuleDefinition::sort_index);

        Ok(self)
    }

    /// Store a shared data string readable by handlers through `RuleContext::data`.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub(crate) fn data_map(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Main rules in execution order.
    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// Inner rules in execution order (all queues).
    pub fn inner_rules(&self) -> &[InnerRuleDefinition] {
        &self.inner
    }

    pub fn rule(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Every distinct rule name, main rules first, in execution order.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.iter().map(RuleDefinition::name).collect();
        for rule in &self.inner {
            if !names.contains(&rule.name()) {
                names.push(rule.name());
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Queue;

    fn noop(name: &str, sort_index: i32) -> RuleDefinition {
        rule! {
            name: name,
            sort_index: sort_index,
            handler: |text, _, _| { text.to_string() }
        }
    }

    fn names(catalog: &RuleCatalog) -> Vec<&str> {
        catalog.rules().iter().map(RuleDefinition::name).collect()
    }

    #[test]
    fn rejects_empty_name() {
        let mut catalog = RuleCatalog::new();
        assert_eq!(catalog.register(noop("", 0)).err(), Some(TypografError::EmptyRuleName));
        assert!(catalog.is_empty());
    }

    #[test]
    fn sorts_by_index_and_keeps_registration_order_on_ties() {
        let mut catalog = RuleCatalog::new();
        for (name, idx) in [("ru/a/one", 10), ("ru/a/two", 0), ("ru/a/three", 10), ("ru/a/four", -5), ("ru/a/five", 0)]
        {
            catalog.register(noop(name, idx)).unwrap();
        }

        assert_eq!(names(&catalog), ["ru/a/four", "ru/a/two", "ru/a/five", "ru/a/one", "ru/a/three"]);
    }

    #[test]
    fn reregistration_overwrites_in_place() {
        let mut catalog = RuleCatalog::new();
        catalog.register(noop("ru/a/one", 0)).unwrap();
        catalog.register(noop("ru/a/two", 0)).unwrap();
        catalog.register(noop("ru/a/one", 0).with_title("replaced")).unwrap();

        assert_eq!(names(&catalog), ["ru/a/one", "ru/a/two"]);
        assert_eq!(catalog.rule("ru/a/one").and_then(RuleDefinition::title), Some("replaced"));

        catalog.register(noop("ru/a/one", 5)).unwrap();
        assert_eq!(names(&catalog), ["ru/a/two", "ru/a/one"]);
    }

    #[test]
    fn inner_rules_are_keyed_by_name_and_queue() {
        let mut catalog = RuleCatalog::new();
        let start = inner_rule! { name: "ru/x/y", queue: Queue::Start, handler: |t, _, _| { t.to_string() } };
        let end = inner_rule! { name: "ru/x/y", queue: Queue::End, handler: |t, _, _| { t.to_string() } };
        catalog.register_inner(start.clone()).unwrap();
        catalog.register_inner(end).unwrap();
        catalog.register_inner(start).unwrap();

        assert_eq!(catalog.inner_rules().len(), 2);
        assert_eq!(catalog.rule_names(), ["ru/x/y"]);
    }

    #[test]
    fn derives_lang_from_name() {
        let mut catalog = RuleCatalog::new();
        catalog.register(noop("common/space/x", 0)).unwrap();
        catalog.register(noop("en/space/y", 0)).unwrap();
        let langs: Vec<&str> = catalog.rules().iter().map(RuleDefinition::lang).collect();
        assert_eq!(langs, ["common", "en"]);
    }

    #[test]
    fn builtin_catalog_has_shared_data() {
        let catalog = RuleCatalog::builtin();
        assert!(catalog.rule("ru/dash/centuries").is_some());
        assert_eq!(catalog.data("common/dash"), Some("--?|‒|–|—"));
    }
}
