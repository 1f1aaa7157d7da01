//! Optical alignment of opening brackets.
//!
//! The main rule wraps `(` and the space before it in marker spans so a
//! stylesheet can hang the bracket into the margin. It is off by default.
//! Two inner rules share its name and therefore its switch: the start-queue
//! one strips markers left by a previous run so the output is idempotent, the
//! end-queue one strips markers that ended up inside `title="..."` attributes.

use crate::{InnerRuleDefinition, Queue, RuleDefinition};
use regex::Captures;

const NAME: &str = "ru/optalign/bracket";

fn strip_markers(text: &str) -> String {
    regex!(r#"<span class="typograf-oa-(?:lbracket|n-lbracket|sp-lbracket)">([^<]*)</span>"#)
        .replace_all(text, "${1}")
        .into_owned()
}

pub fn rule_bracket() -> RuleDefinition {
    rule! {
        name: NAME,
        title: "Optical alignment of opening brackets",
        enabled: false,
        handler: |text, _settings, _ctx| {
            let spaced = regex!(r"([ \x{A0}])\(").replace_all(
                text,
                r#"<span class="typograf-oa-sp-lbracket">${1}</span><span class="typograf-oa-lbracket">(</span>"#,
            );
            regex!(r"(?m)^\(")
                .replace_all(&spaced, r#"<span class="typograf-oa-n-lbracket">(</span>"#)
                .into_owned()
        }
    }
}

pub fn inner_rule_strip_bracket() -> InnerRuleDefinition {
    inner_rule! {
        name: NAME,
        queue: Queue::Start,
        handler: |text, _settings, _ctx| { strip_markers(text) }
    }
}

pub fn inner_rule_strip_bracket_from_title() -> InnerRuleDefinition {
    inner_rule! {
        name: NAME,
        queue: Queue::End,
        handler: |text, _settings, _ctx| {
            regex!(r#"\stitle="(?:[^"<]|<span class="typograf-oa-(?:lbracket|n-lbracket|sp-lbracket)">|</span>)*""#)
                .replace_all(text, |caps: &Captures<'_>| strip_markers(&caps[0]))
                .into_owned()
        }
    }
}
