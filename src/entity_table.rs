//! Entity data: named and numeric forms of the characters typography cares
//! about.
//!
//! Order matters only for reporting; decoding and encoding are single-pass and
//! look entries up by name, code point or literal.

/// One row of the entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    /// `nbsp` for `&nbsp;`; `None` when HTML has no name for the character.
    pub name: Option<&'static str>,
    pub literal: char,
    /// Whether `&#NNN;` is a valid form for this row.
    pub numeric: bool,
}

impl EntityRecord {
    pub const fn named(name: &'static str, literal: char) -> Self {
        Self { name: Some(name), literal, numeric: true }
    }

    pub const fn numeric_only(literal: char) -> Self {
        Self { name: None, literal, numeric: true }
    }

    /// `&nbsp;`
    pub fn named_form(&self) -> Option<String> {
        self.name.map(|name| format!("&{name};"))
    }

    /// `&#160;`
    pub fn numeric_form(&self) -> Option<String> {
        self.numeric.then(|| format!("&#{};", self.literal as u32))
    }
}

const fn e(name: &'static str, literal: char) -> EntityRecord {
    EntityRecord::named(name, literal)
}

pub(crate) const ENTITIES: &[EntityRecord] = &[
    // No `<`, `>` or `"`: markup characters are never decoded or encoded.
    e("amp", '&'),
    // spaces and joiners
    e("nbsp", '\u{00A0}'),
    e("ensp", '\u{2002}'),
    e("emsp", '\u{2003}'),
    e("thinsp", '\u{2009}'),
    EntityRecord::numeric_only('\u{202F}'),
    e("shy", '\u{00AD}'),
    e("zwnj", '\u{200C}'),
    e("zwj", '\u{200D}'),
    e("lrm", '\u{200E}'),
    e("rlm", '\u{200F}'),
    // dashes and punctuation
    e("ndash", '\u{2013}'),
    e("mdash", '\u{2014}'),
    EntityRecord::numeric_only('\u{2012}'),
    e("minus", '\u{2212}'),
    e("hellip", '\u{2026}'),
    e("bull", '\u{2022}'),
    e("middot", '\u{00B7}'),
    e("iexcl", '\u{00A1}'),
    e("iquest", '\u{00BF}'),
    e("sect", '\u{00A7}'),
    e("para", '\u{00B6}'),
    e("dagger", '\u{2020}'),
    e("Dagger", '\u{2021}'),
    e("permil", '\u{2030}'),
    e("prime", '\u{2032}'),
    e("Prime", '\u{2033}'),
    e("oline", '\u{203E}'),
    e("frasl", '\u{2044}'),
    // quotes
    e("laquo", '\u{00AB}'),
    e("raquo", '\u{00BB}'),
    e("lsaquo", '\u{2039}'),
    e("rsaquo", '\u{203A}'),
    e("lsquo", '\u{2018}'),
    e("rsquo", '\u{2019}'),
    e("sbquo", '\u{201A}'),
    e("ldquo", '\u{201C}'),
    e("rdquo", '\u{201D}'),
    e("bdquo", '\u{201E}'),
    // signs
    e("copy", '\u{00A9}'),
    e("reg", '\u{00AE}'),
    e("trade", '\u{2122}'),
    e("deg", '\u{00B0}'),
    e("plusmn", '\u{00B1}'),
    e("times", '\u{00D7}'),
    e("divide", '\u{00F7}'),
    e("micro", '\u{00B5}'),
    e("not", '\u{00AC}'),
    e("brvbar", '\u{00A6}'),
    e("uml", '\u{00A8}'),
    e("macr", '\u{00AF}'),
    e("acute", '\u{00B4}'),
    e("cedil", '\u{00B8}'),
    e("ordf", '\u{00AA}'),
    e("ordm", '\u{00BA}'),
    e("sup1", '\u{00B9}'),
    e("sup2", '\u{00B2}'),
    e("sup3", '\u{00B3}'),
    e("frac14", '\u{00BC}'),
    e("frac12", '\u{00BD}'),
    e("frac34", '\u{00BE}'),
    // currency
    e("cent", '\u{00A2}'),
    e("pound", '\u{00A3}'),
    e("curren", '\u{00A4}'),
    e("yen", '\u{00A5}'),
    e("euro", '\u{20AC}'),
    EntityRecord::numeric_only('\u{20BD}'),
    // arrows and math
    e("larr", '\u{2190}'),
    e("uarr", '\u{2191}'),
    e("rarr", '\u{2192}'),
    e("darr", '\u{2193}'),
    e("harr", '\u{2194}'),
    e("le", '\u{2264}'),
    e("ge", '\u{2265}'),
    e("ne", '\u{2260}'),
    e("asymp", '\u{2248}'),
    e("equiv", '\u{2261}'),
    e("infin", '\u{221E}'),
    e("sum", '\u{2211}'),
    e("prod", '\u{220F}'),
    e("radic", '\u{221A}'),
    e("part", '\u{2202}'),
    e("empty", '\u{2205}'),
    e("isin", '\u{2208}'),
    e("sdot", '\u{22C5}'),
    // misc
    e("loz", '\u{25CA}'),
    e("spades", '\u{2660}'),
    e("clubs", '\u{2663}'),
    e("hearts", '\u{2665}'),
    e("diams", '\u{2666}'),
];
