//! Built-in rule set.
//!
//! Each language family exposes `get()` (main rules) and, where needed,
//! `get_inner()`; `catalog()` registers all of them into a fresh catalog
//! together with the shared data strings handlers read.

pub(crate) mod common;
pub(crate) mod helpers;
pub(crate) mod ru;


use crate::RuleCatalog;

/// Dash variants a rule should treat as "some dash".
pub(crate) const DASHES: &str = "--?|‒|–|—";

/// Letters of the supported alphabets, as a regex class body.
pub(crate) const LETTERS: &str = "а-яёa-z";

pub(crate) fn catalog() -> RuleCatalog {
    let mut catalog = RuleCatalog::new();
    catalog.set_data("common/dash", DASHES).set_data("char", LETTERS);

    for rule in common::get().into_iter().chain(ru::get()) {
        if let Err(err) = catalog.register(rule) {
            tracing::warn!(%err, "skipping built-in rule");
        }
    }
    for rule in ru::get_inner() {
        if let Err(err) = catalog.register_inner(rule) {
            tracing::warn!(%err, "skipping built-in inner rule");
        }
    }

    catalog
}
