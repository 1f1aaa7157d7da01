use crate::RuleDefinition;
use crate::rules::DASHES;
use crate::rules::helpers::str_setting;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CENTURIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(X|I|V)[ |\x{{A0}}]?({DASHES})[ |\x{{A0}}]?(X|I|V)")).unwrap());

/// `XIX - XX` -> `XIX—XX`. The dash is the rule's `dash` setting.
pub fn rule_centuries() -> RuleDefinition {
    rule! {
        name: "ru/dash/centuries",
        title: "Dash between centuries",
        settings: { "dash" => "\u{2014}" },
        handler: |text, settings, _ctx| {
            let dash = str_setting(settings, "dash", "\u{2014}");
            CENTURIES
                .replace_all(text, |caps: &Captures<'_>| format!("{}{}{}", &caps[1], dash, &caps[3]))
                .into_owned()
        }
    }
}
