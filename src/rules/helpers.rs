use crate::Settings;
use regex::{Captures, Regex};

/// Replace every match of `re` whose next character satisfies `follows`.
///
/// The next character is inspected but not consumed, so a character that ends
/// one match's context can start the following match (`a,b,c`).
pub fn replace_when_followed_by<F, R>(re: &Regex, text: &str, follows: F, mut render: R) -> String
where
    F: Fn(Option<char>) -> bool,
    R: FnMut(&Captures<'_>) -> String,
{
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if !follows(text[m.end()..].chars().next()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(&render(&caps));
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

/// String setting `key`, or `default` when unset or not a string.
pub fn str_setting<'a>(settings: &'a Settings, key: &str, default: &'a str) -> &'a str {
    settings.get(key).and_then(|v| v.as_str()).unwrap_or(default)
}
