pub(crate) mod space;

use crate::RuleDefinition;

pub(crate) fn get() -> Vec<RuleDefinition> {
    vec![space::rule_after_punctuation()]
}
