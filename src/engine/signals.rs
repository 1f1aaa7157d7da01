//! Input pre-classification.
//!
//! Before the expensive stages run, the pipeline scans the text once for coarse
//! signals that decide whether those stages are needed at all:
//!
//! - `MARKUP`: `<` followed by a letter, `/` or `!`. Without it no markup is
//!   hidden and rules run on the raw text.
//! - `ENTITIES`: `&` followed by `#` or an ASCII letter. Without it entity
//!   decoding is skipped.
//!
//! Both are heuristics; false positives only cost a scan that finds nothing.

use super::tag_guard::TagGuard;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputSignals: u8 {
        const MARKUP   = 1 << 0;
        const ENTITIES = 1 << 1;
    }
}

impl InputSignals {
    pub fn scan(input: &str) -> Self {
        let mut signals = InputSignals::empty();

        if TagGuard::is_markup_likely(input) {
            signals |= InputSignals::MARKUP;
        }

        if regex!(r"&(?:#|[A-Za-z])").is_match(input) {
            signals |= InputSignals::ENTITIES;
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markup() {
        assert!(InputSignals::scan("<p>text</p>").contains(InputSignals::MARKUP));
        assert!(InputSignals::scan("a </B> b").contains(InputSignals::MARKUP));
        assert!(InputSignals::scan("<!-- c -->").contains(InputSignals::MARKUP));
        assert!(!InputSignals::scan("1 < 2 and 3 > 2").contains(InputSignals::MARKUP));
    }

    #[test]
    fn markup_signal_matches_tag_guard() {
        for input in ["<p>", "x </b>", "<!doctype html>", "1 < 2", "a<1", "plain"] {
            let signalled = InputSignals::scan(input).contains(InputSignals::MARKUP);
            assert_eq!(signalled, TagGuard::is_markup_likely(input), "input: {input:?}");
        }
    }

    #[test]
    fn detects_entities() {
        assert!(InputSignals::scan("a&nbsp;b").contains(InputSignals::ENTITIES));
        assert!(InputSignals::scan("&#160;").contains(InputSignals::ENTITIES));
        assert!(InputSignals::scan("&Dagger;").contains(InputSignals::ENTITIES));
        assert!(!InputSignals::scan("salt & pepper").contains(InputSignals::ENTITIES));
    }

    #[test]
    fn plain_text_has_no_signals() {
        assert_eq!(InputSignals::scan("just words"), InputSignals::empty());
    }
}
