//! Rule-based typography engine.
//!
//! Text goes through a fixed pipeline: markup that must not be touched is
//! swapped for placeholders, HTML entities are decoded, a sorted and filterable
//! set of rules rewrites the text, entities are optionally re-encoded, and the
//! hidden markup is put back.
//!
//! ```
//! use typograf::{ExecuteParams, Mode, Prefs, Typograf};
//!
//! let tp = Typograf::with_prefs(Prefs { lang: Some("ru".into()), mode: Mode::None });
//! assert_eq!(tp.execute("X-X"), "X\u{2014}X");
//!
//! let named = ExecuteParams { mode: Some(Mode::Name), ..ExecuteParams::default() };
//! assert_eq!(tp.execute_with("&amp;", &named), "&amp;");
//! ```
extern crate self as typograf;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[macro_use]
mod macros;
mod api;
mod engine;
mod entity_table;
mod error;
mod rules;

pub use api::{ExecuteParams, Prefs, RunOutput, Typograf};
pub use engine::{
    EntityTable, InputSignals, InstanceConfig, IntoPatterns, ProtectedSpans, RuleCatalog, RuleTrace, RunDetails,
    StageTimings, TagGuard,
};
pub use entity_table::EntityRecord;
pub use error::TypografError;

/// Locale sentinel for rules that apply regardless of the active language.
pub const COMMON_LANG: &str = "common";

/// Per-rule settings (`"dash" => "—"`, ...).
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Rule body: receives the current text, the rule's settings and the run context.
pub type Handler = Arc<dyn Fn(&str, &Settings, &RuleContext<'_>) -> String + Send + Sync>;

/// Output mode for entity re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Keep literal characters.
    #[default]
    None,
    /// `&nbsp;`
    Name,
    /// `&#160;`
    Digit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::None => "none",
            Mode::Name => "name",
            Mode::Digit => "digit",
        };
        f.write_str(s)
    }
}

impl FromStr for Mode {
    type Err = TypografError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Mode::None),
            "name" => Ok(Mode::Name),
            "digit" => Ok(Mode::Digit),
            other => Err(TypografError::UnknownMode(other.to_string())),
        }
    }
}

/// Where an inner rule runs relative to the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// Before markup is hidden (right after line endings are normalized).
    Start,
    /// After markup is restored, as the very last step.
    End,
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Queue::Start => "start",
            Queue::End => "end",
        })
    }
}

/// Language scope of a rule name: everything before the first `/`.
pub(crate) fn lang_of(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

// --- Rule definitions -------------------------------------------------------

/// A main rule: a named, language-scoped, orderable text transformation.
///
/// `name` has the shape `"<lang>/<category>/<id>"`, e.g. `"ru/dash/centuries"`.
#[derive(Clone)]
pub struct RuleDefinition {
    name: String,
    lang: String,
    title: Option<String>,
    sort_index: i32,
    enabled: bool,
    settings: Settings,
    handler: Handler,
}

impl RuleDefinition {
    /// Create a rule enabled by default with sort index 0 and no settings.
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        let name = name.into();
        let lang = lang_of(&name).to_string();
        Self { name, lang, title: None, sort_index: 0, enabled: true, settings: Settings::new(), handler }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Lower runs earlier.
    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = sort_index;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a default setting; engines copy defaults when they are created.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sort_index(&self) -> i32 {
        self.sort_index
    }

    pub fn enabled_by_default(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("sort_index", &self.sort_index)
            .field("enabled", &self.enabled)
            .field("settings", &self.settings)
            .field("handler", &"<function>")
            .finish()
    }
}

/// An inner rule: structural pre/post-processing shared across main rules.
///
/// Inner rules have no default enabled flag of their own. An engine enables an
/// inner-only name when it is created; a name shared with a main rule follows
/// that rule's flag. Identity is `(name, queue)`, so one rule name can own a
/// `start` and an `end` helper.
#[derive(Clone)]
pub struct InnerRuleDefinition {
    name: String,
    lang: String,
    title: Option<String>,
    sort_index: i32,
    queue: Option<Queue>,
    handler: Handler,
}

impl InnerRuleDefinition {
    pub fn new(name: impl Into<String>, handler: Handler) -> Self {
        let name = name.into();
        let lang = lang_of(&name).to_string();
        Self { name, lang, title: None, sort_index: 0, queue: None, handler }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = sort_index;
        self
    }

    pub fn with_queue(mut self, queue: Queue) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sort_index(&self) -> i32 {
        self.sort_index
    }

    pub fn queue(&self) -> Option<Queue> {
        self.queue
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for InnerRuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerRuleDefinition")
            .field("name", &self.name)
            .field("sort_index", &self.sort_index)
            .field("queue", &self.queue)
            .field("handler", &"<function>")
            .finish()
    }
}

// --- Rule context -----------------------------------------------------------

/// Read-only view of the running engine handed to every rule handler.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    lang: Option<&'a str>,
    mode: Mode,
    config: &'a InstanceConfig,
    data: &'a BTreeMap<String, String>,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        lang: Option<&'a str>,
        mode: Mode,
        config: &'a InstanceConfig,
        data: &'a BTreeMap<String, String>,
    ) -> Self {
        Self { lang, mode, config, data }
    }

    /// Active locale for this call, if any.
    pub fn lang(&self) -> Option<&'a str> {
        self.lang
    }

    /// Entity mode the output will be encoded with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Setting of any rule, as configured on the running engine.
    pub fn setting(&self, rule: &str, key: &str) -> Option<&'a serde_json::Value> {
        self.config.setting(rule, key)
    }

    /// Shared catalog data (`"common/dash"`, `"char"`, ...).
    pub fn data(&self, key: &str) -> Option<&'a str> {
        self.data.get(key).map(String::as_str)
    }
}
