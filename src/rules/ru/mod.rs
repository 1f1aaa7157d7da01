pub(crate) mod dash;
pub(crate) mod optalign;
pub(crate) mod space;

use crate::{InnerRuleDefinition, RuleDefinition};

pub(crate) fn get() -> Vec<RuleDefinition> {
    vec![dash::rule_centuries(), space::rule_year(), optalign::rule_bracket()]
}

pub(crate) fn get_inner() -> Vec<InnerRuleDefinition> {
    vec![optalign::inner_rule_strip_bracket(), optalign::inner_rule_strip_bracket_from_title()]
}
