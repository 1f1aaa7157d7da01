//! Entity decoding ("utfication") and re-encoding ("modification").
//!
//! Decoding turns `&name;` and `&#NNN;` references known to the table into
//! literal characters so rules only ever see one representation. Encoding runs
//! after the rules and, depending on [`Mode`], turns table characters back into
//! named or numeric references.
//!
//! Both directions are single left-to-right passes with table lookups, so an
//! entity's output is never fed to another entry: `&amp;lt;` decodes to `&lt;`
//! and `&\u{a0}` encodes to `&amp;&nbsp;` regardless of table order.
//!
//! Markup characters (`<`, `>`, `"`) are not in the table, so `&lt;` survives
//! every mode untouched and tags outside protected spans are never escaped.

use crate::Mode;
use crate::entity_table::{ENTITIES, EntityRecord};
use once_cell::sync::Lazy;
use regex::Captures;
use std::borrow::Cow;
use std::collections::HashMap;

static GLOBAL: Lazy<EntityTable> = Lazy::new(|| EntityTable::new(ENTITIES));

#[derive(Debug, Clone)]
pub struct EntityTable {
    records: Vec<EntityRecord>,
    by_name: HashMap<&'static str, char>,
    by_code: HashMap<u32, char>,
    by_literal: HashMap<char, usize>,
}

impl EntityTable {
    /// Index `records`. When two rows share a name, code point or literal, the
    /// first one wins.
    pub fn new(records: &[EntityRecord]) -> Self {
        let mut by_name = HashMap::new();
        let mut by_code = HashMap::new();
        let mut by_literal = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            if let Some(name) = record.name {
                by_name.entry(name).or_insert(record.literal);
            }
            if record.numeric {
                by_code.entry(record.literal as u32).or_insert(record.literal);
            }
            by_literal.entry(record.literal).or_insert(idx);
        }

        Self { records: records.to_vec(), by_name, by_code, by_literal }
    }

    /// The built-in table.
    pub fn global() -> &'static EntityTable {
        &GLOBAL
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Replace known `&name;` / `&#NNN;` references with their characters.
    ///
    /// Callers gate this on [`crate::InputSignals::ENTITIES`]; unknown
    /// references are left untouched.
    pub fn decode_all<'t>(&self, text: &'t str) -> Cow<'t, str> {
        regex!(r"&(?:#([0-9]{1,7})|([A-Za-z][A-Za-z0-9]{0,31}));").replace_all(text, |caps: &Captures<'_>| {
            let literal = match (caps.get(1), caps.get(2)) {
                (Some(code), _) => code.as_str().parse::<u32>().ok().and_then(|c| self.by_code.get(&c)),
                (None, Some(name)) => self.by_name.get(name.as_str()),
                (None, None) => None,
            };
            match literal {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
    }

    /// Replace table characters with the form `mode` asks for.
    ///
    /// `Mode::None` is a no-op; rows lacking the requested form keep their
    /// literal character. An `&` that already starts a reference the table
    /// does not know (`&lt;`, `&#x41;`) is kept as is.
    pub fn encode_all<'t>(&self, text: &'t str, mode: Mode) -> Cow<'t, str> {
        let form = |record: &EntityRecord| match mode {
            Mode::Name => record.named_form(),
            Mode::Digit => record.numeric_form(),
            Mode::None => None,
        };

        if mode == Mode::None || !text.chars().any(|c| self.by_literal.contains_key(&c)) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for (pos, c) in text.char_indices() {
            if c == '&' && starts_reference(&text[pos..]) {
                out.push(c);
                continue;
            }
            match self.by_literal.get(&c).and_then(|&idx| form(&self.records[idx])) {
                Some(encoded) => out.push_str(&encoded),
                None => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

/// `&name;`, `&#NNN;` or `&#xHH;` at the start of `text`.
fn starts_reference(text: &str) -> bool {
    regex!(r"^&(?:#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{0,31});").is_match(text)
}
