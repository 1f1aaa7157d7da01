use crate::RuleDefinition;
use crate::rules::LETTERS;
use crate::rules::helpers::replace_when_followed_by;
use once_cell::sync::Lazy;
use regex::Regex;

static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^[{LETTERS}]")).unwrap());

fn is_letter(c: char) -> bool {
    let mut buf = [0u8; 4];
    LETTER.is_match(c.encode_utf8(&mut buf))
}

/// `1990год` -> `1990 год`, also for `года`, `году`, `годе` and `годом`.
///
/// A longer word (`1990годами`) is not a year and stays as is.
pub fn rule_year() -> RuleDefinition {
    rule! {
        name: "ru/space/year",
        title: "Space between a year and «год»",
        handler: |text, _settings, _ctx| {
            replace_when_followed_by(
                regex!(r"(^|[ \x{A0}])([0-9]{3,4})(год(?:[ауе]|ом)?)"),
                text,
                |next| !next.is_some_and(is_letter),
                |caps| format!("{}{} {}", &caps[1], &caps[2], &caps[3]),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_class_is_lowercase_cyrillic_and_latin() {
        assert!(is_letter('а'));
        assert!(is_letter('ё'));
        assert!(is_letter('z'));
        assert!(!is_letter('1'));
        assert!(!is_letter(','));
        assert!(!is_letter('Z'));
    }
}
