use crate::engine::{EntityTable, InstanceConfig, IntoPatterns, Pipeline, RuleCatalog, RunDetails};
use crate::Mode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Engine preferences.
///
/// `lang: None` means only `common` rules run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub lang: Option<String>,
    pub mode: Mode,
}

/// Per-call overrides. Unset fields fall back to the engine's [`Prefs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteParams {
    pub lang: Option<String>,
    pub mode: Option<Mode>,
}

impl ExecuteParams {
    pub fn lang(lang: impl Into<String>) -> Self {
        Self { lang: Some(lang.into()), mode: None }
    }

    pub fn mode(mode: Mode) -> Self {
        Self { lang: None, mode: Some(mode) }
    }
}

/// Result from [`Typograf::execute_verbose`].
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub text: String,
    pub elapsed: Duration,
    pub details: RunDetails,
}

/// A typography engine: a shared rule catalog plus this instance's
/// configuration.
///
/// `execute` takes `&self` and keeps all per-call state local, so one engine
/// can serve many threads. Configuration changes take `&mut self`.
///
/// # Example
/// ```
/// use typograf::{ExecuteParams, Prefs, Typograf};
///
/// let mut tp = Typograf::with_prefs(Prefs { lang: Some("ru".into()), ..Prefs::default() });
/// assert_eq!(tp.execute("Солнце садилось,и ветер"), "Солнце садилось, и ветер");
///
/// tp.disable("ru/dash/centuries");
/// assert_eq!(tp.execute("I-II"), "I-II");
/// ```
#[derive(Debug, Clone)]
pub struct Typograf {
    catalog: Arc<RuleCatalog>,
    config: InstanceConfig,
}

impl Typograf {
    /// Create an engine over `catalog`, snapshotting its defaults.
    pub fn new(catalog: Arc<RuleCatalog>, prefs: Prefs) -> Self {
        let config = InstanceConfig::from_catalog(&catalog, prefs.lang, prefs.mode);
        Self { catalog, config }
    }

    /// Create an engine over the built-in catalog.
    pub fn with_prefs(prefs: Prefs) -> Self {
        Self::new(RuleCatalog::builtin(), prefs)
    }

    /// Typeset `text` with the engine's stored locale and mode.
    pub fn execute(&self, text: &str) -> String {
        self.execute_with(text, &ExecuteParams::default())
    }

    /// Typeset `text`, letting `params` override locale and mode for this call.
    pub fn execute_with(&self, text: &str, params: &ExecuteParams) -> String {
        let (lang, mode) = self.resolve(params);
        Pipeline::new(&self.catalog, &self.config, EntityTable::global(), lang, mode).run(text)
    }

    /// Like [`execute_with`](Self::execute_with), also returning stage timings
    /// and a trace of every rule that ran.
    pub fn execute_verbose(&self, text: &str, params: &ExecuteParams) -> RunOutput {
        let (lang, mode) = self.resolve(params);
        let run = Pipeline::new(&self.catalog, &self.config, EntityTable::global(), lang, mode)
            .run_with_metrics(text, true);

        RunOutput { text: run.text, elapsed: run.details.total, details: run.details }
    }

    fn resolve<'p>(&'p self, params: &'p ExecuteParams) -> (Option<&'p str>, Mode) {
        let lang = params.lang.as_deref().or(self.config.lang());
        let mode = params.mode.unwrap_or(self.config.mode());
        (lang, mode)
    }

    pub fn enable(&mut self, patterns: impl IntoPatterns) -> &mut Self {
        self.config.enable(patterns);
        self
    }

    pub fn disable(&mut self, patterns: impl IntoPatterns) -> &mut Self {
        self.config.disable(patterns);
        self
    }

    pub fn is_enabled(&self, rule: &str) -> bool {
        self.config.is_enabled(rule)
    }

    pub fn is_disabled(&self, rule: &str) -> bool {
        self.config.is_disabled(rule)
    }

    pub fn setting(&self, rule: &str, key: &str) -> Option<&serde_json::Value> {
        self.config.setting(rule, key)
    }

    pub fn set_setting(&mut self, rule: &str, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.config.set_setting(rule, key, value);
        self
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }
}

impl Default for Typograf {
    fn default() -> Self {
        Self::with_prefs(Prefs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleDefinition;

    fn ru() -> Typograf {
        Typograf::with_prefs(Prefs { lang: Some("ru".into()), mode: Mode::None })
    }

    fn catalog_with(rule: RuleDefinition) -> Arc<RuleCatalog> {
        let mut catalog = (*RuleCatalog::builtin()).clone();
        catalog.register(rule).unwrap();
        Arc::new(catalog)
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Typograf>();

        let tp = Arc::new(ru());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tp = Arc::clone(&tp);
                std::thread::spawn(move || tp.execute(&format!("<pre>{i}-{i}</pre> X-X")))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("<pre>{i}-{i}</pre> X\u{2014}X"));
        }
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(ru().execute(""), "");
    }

    #[test]
    fn centuries_dash() {
        assert_eq!(ru().execute("X-X"), "X\u{2014}X");
        assert_eq!(ru().execute("I-II"), "I\u{2014}II");
    }

    #[test]
    fn disable_stops_rule() {
        let mut tp = ru();
        tp.disable("ru/dash/centuries");
        assert!(!tp.is_enabled("ru/dash/centuries"));
        assert!(tp.is_disabled("ru/dash/centuries"));
        assert_eq!(tp.execute_with("I-II", &ExecuteParams::lang("ru")), "I-II");
    }

    #[test]
    fn wildcard_disables_family() {
        let month = rule! { name: "ru/space/month", handler: |t, _, _| { t.to_string() } };
        let mut tp = Typograf::new(catalog_with(month), Prefs::default());
        assert!(tp.is_enabled("ru/space/year"));
        assert!(tp.is_enabled("ru/space/month"));

        tp.disable("ru/space/*");
        assert!(!tp.is_enabled("ru/space/year"));
        assert!(!tp.is_enabled("ru/space/month"));
        assert!(tp.is_enabled("ru/dash/centuries"));
    }

    #[test]
    fn other_locales_never_fire() {
        let shout = rule! { name: "en/case/shout", handler: |t, _, _| { t.to_uppercase() } };
        let tp = Typograf::new(catalog_with(shout), Prefs { lang: Some("ru".into()), mode: Mode::None });
        assert!(tp.is_enabled("en/case/shout"));
        assert_eq!(tp.execute("quiet"), "quiet");
        assert_eq!(tp.execute_with("quiet", &ExecuteParams::lang("en")), "QUIET");
    }

    #[test]
    fn without_lang_only_common_rules_run() {
        let tp = Typograf::default();
        assert_eq!(tp.execute("X-X,и"), "X-X, и");
    }

    #[test]
    fn entity_roundtrip_by_mode() {
        let tp = ru();
        assert_eq!(tp.execute_with("&amp;", &ExecuteParams::mode(Mode::None)), "&");
        assert_eq!(tp.execute_with("&amp;", &ExecuteParams::mode(Mode::Name)), "&amp;");
        assert_eq!(tp.execute_with("&amp;", &ExecuteParams::mode(Mode::Digit)), "&#38;");
        assert_eq!(tp.execute_with("a&nbsp;b", &ExecuteParams::mode(Mode::Digit)), "a&#160;b");
    }

    #[test]
    fn unknown_references_keep_their_ampersand() {
        let tp = Typograf::with_prefs(Prefs { lang: Some("ru".into()), mode: Mode::Name });
        assert_eq!(tp.execute("1 &lt; 2"), "1 &lt; 2");
        assert_eq!(tp.execute_with("1 &lt; 2 &amp; 3", &ExecuteParams::mode(Mode::Digit)), "1 &lt; 2 &#38; 3");
        assert_eq!(tp.execute("a &bogus; b"), "a &bogus; b");
    }

    #[test]
    fn stored_mode_applies_and_call_overrides_win() {
        let tp = Typograf::with_prefs(Prefs { lang: Some("ru".into()), mode: Mode::Name });
        assert_eq!(tp.execute("X-X"), "X&mdash;X");
        assert_eq!(tp.execute_with("X-X", &ExecuteParams::mode(Mode::None)), "X\u{2014}X");
        assert_eq!(tp.config().mode(), Mode::Name);
    }

    #[test]
    fn overrides_do_not_mutate_config() {
        let tp = Typograf::default();
        assert_eq!(tp.execute_with("X-X", &ExecuteParams::lang("ru")), "X\u{2014}X");
        assert_eq!(tp.config().lang(), None);
        assert_eq!(tp.execute("X-X"), "X-X");
    }

    #[test]
    fn pre_content_survives_byte_for_byte() {
        let body = "X-X,и\r1990год &amp; \u{a0}";
        let input = format!("I-II<pre class=\"c\">{body}</pre>I-II");
        let out = ru().execute_with(&input, &ExecuteParams::mode(Mode::Name));
        assert!(out.contains(&format!(">{}</pre>", body.replace('\r', "\n"))));
        assert!(out.starts_with("I&mdash;II<pre"));
    }

    #[test]
    fn settings_change_rule_output() {
        let mut tp = ru();
        assert_eq!(tp.setting("ru/dash/centuries", "dash").and_then(|v| v.as_str()), Some("\u{2014}"));
        tp.set_setting("ru/dash/centuries", "dash", "\u{2013}");
        assert_eq!(tp.execute("X-X"), "X\u{2013}X");
    }

    #[test]
    fn idempotent_on_mixed_input() {
        let tp = ru();
        let inputs = [
            "Солнце садилось,и ветер!Вот.",
            "В 1990году, в XIX-XX веках",
            "<p title=\"a,b\">I-V</p> <!-- X-X --> &laquo;текст&raquo;",
            "(скобка) и (ещё)",
        ];
        for input in inputs {
            let once = tp.execute(input);
            assert_eq!(tp.execute(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn verbose_run_reports_rules() {
        let out = ru().execute_verbose("X-X", &ExecuteParams::default());
        assert_eq!(out.text, "X\u{2014}X");
        assert_eq!(out.details.lang.as_deref(), Some("ru"));
        assert!(out.details.rules.iter().any(|r| r.name == "ru/dash/centuries" && r.changed));
        assert!(!out.details.rules.iter().any(|r| r.name == "ru/optalign/bracket" && !r.inner));
    }

    #[test]
    fn catalog_snapshot_is_not_retroactive() {
        let tp = Typograf::default();
        let mut extended = tp.catalog().clone();
        extended.register(rule! { name: "common/x/late", handler: |t, _, _| { t.to_uppercase() } }).unwrap();
        assert!(tp.is_disabled("common/x/late"));
        assert_eq!(tp.execute("abc"), "abc");
    }
}
