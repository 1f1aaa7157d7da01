use crate::RuleDefinition;
use crate::rules::helpers::replace_when_followed_by;

/// Add a space after `,` `;` and runs of `!?` glued to the next word.
///
/// Only fires between two letters, so numbers (`1,5`), closing quotes (`"Я!"`)
/// and punctuation clusters (`,?`) are left alone. Periods and colons are not
/// handled (`см.рис`, `12:30`).
pub fn rule_after_punctuation() -> RuleDefinition {
    rule! {
        name: "common/space/afterPunctuation",
        title: "Space after punctuation",
        handler: |text, _settings, _ctx| {
            replace_when_followed_by(
                regex!(r"\p{L}(?:[,;]|[!?]+)"),
                text,
                |next| next.is_some_and(char::is_alphabetic),
                |caps| format!("{} ", &caps[0]),
            )
        }
    }
}
