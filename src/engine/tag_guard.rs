//! Markup protection.
//!
//! Rules are plain text rewrites and would happily put a non-breaking space
//! into an attribute value or a dash into a `<script>`. Before rules run, every
//! region that must survive verbatim is replaced by a placeholder token
//! `__typograf<N>__`; after rules run, the tokens are swapped back.
//!
//! Protected regions (case-insensitive, spanning newlines):
//!
//! ```text
//! <!-- ... -->
//! <pre ...> ... </pre>        <code ...> ... </code>
//! <style ...> ... </style>    <script ...> ... </script>
//! <object> ... </object>
//! <any tag containing whitespace>
//! ```
//!
//! This is pattern matching, not parsing. An opening `<pre>` without a
//! closing tag is not protected; nested or malformed markup may be protected
//! incorrectly.

use regex::Captures;

/// Original text of each hidden region, indexed by the token's number.
///
/// Lives for one pipeline run: produced by [`TagGuard::hide`] and consumed by
/// [`TagGuard::show`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedSpans {
    originals: Vec<String>,
}

impl ProtectedSpans {
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.originals.get(index).map(String::as_str)
    }

    fn push(&mut self, original: &str) -> String {
        let token = placeholder(self.originals.len());
        self.originals.push(original.to_string());
        token
    }
}

fn placeholder(index: usize) -> String {
    format!("__typograf{index}__")
}

pub struct TagGuard;

impl TagGuard {
    /// `<` followed by a letter, `/` or `!`.
    pub fn is_markup_likely(text: &str) -> bool {
        regex!(r"(?i)<[a-z/!]").is_match(text)
    }

    /// Replace every protected region with a placeholder, left to right.
    pub fn hide(text: &str) -> (String, ProtectedSpans) {
        let re = regex!(
            r"(?is)<!--.*?-->|<pre[^>]*>.*?</pre>|<code[^>]*>.*?</code>|<style[^>]*>.*?</style>|<script[^>]*>.*?</script>|<object>.*?</object>|<[^>]*\s[^>]*>"
        );

        let mut spans = ProtectedSpans::default();
        let masked = re.replace_all(text, |caps: &Captures<'_>| spans.push(&caps[0])).into_owned();

        tracing::debug!(spans = spans.len(), "hid protected markup");
        (masked, spans)
    }

    /// Put every hidden region back.
    ///
    /// Tokens are matched case-insensitively. Restoration is a single pass, so
    /// text coming back from a span is never scanned for tokens again; tokens
    /// with no recorded span are left as they are.
    pub fn show(masked: &str, spans: ProtectedSpans) -> String {
        if spans.is_empty() {
            return masked.to_string();
        }

        regex!(r"(?i)__typograf([0-9]+)__")
            .replace_all(masked, |caps: &Captures<'_>| {
                match caps[1].parse::<usize>().ok().and_then(|idx| spans.get(idx)) {
                    Some(original) => original.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
