//! Ordered stage runner.
//!
//! A `Pipeline` borrows everything it needs for one call (catalog, config,
//! entity table) plus the locale and mode resolved for that call. It owns no
//! state between calls: the protected-span map is created by `hide`, threaded
//! through the rule passes as a local value and consumed by `show`.
//!
//! ```text
//! ""                    -> ""  (no rule ever sees empty text)
//! \r\n, \r              -> \n
//! inner rules           queue = start
//! InputSignals::scan    -> MARKUP? ENTITIES?
//! TagGuard::hide        if MARKUP
//! decode_all            if ENTITIES
//! inner rules           no queue
//! main rules            enabled + lang in {common, active}
//! encode_all            mode
//! TagGuard::show        if MARKUP
//! inner rules           queue = end
//! ```
//!
//! Handlers are not isolated: a panicking rule aborts the call.

use super::catalog::RuleCatalog;
use super::config::InstanceConfig;
use super::entities::EntityTable;
use super::metrics::{RuleTrace, RunDetails, RunResult};
use super::signals::InputSignals;
use super::tag_guard::TagGuard;
use crate::{COMMON_LANG, Handler, Mode, Queue, RuleContext, Settings};
use std::time::{Duration, Instant};

static NO_SETTINGS: Settings = Settings::new();

#[derive(Debug)]
pub(crate) struct Pipeline<'a> {
    catalog: &'a RuleCatalog,
    config: &'a InstanceConfig,
    entities: &'a EntityTable,
    lang: Option<&'a str>,
    mode: Mode,
}

/// Which rules a pass runs.
#[derive(Debug, Clone, Copy)]
enum Pass {
    Inner(Option<Queue>),
    Main,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        catalog: &'a RuleCatalog,
        config: &'a InstanceConfig,
        entities: &'a EntityTable,
        lang: Option<&'a str>,
        mode: Mode,
    ) -> Self {
        Self { catalog, config, entities, lang, mode }
    }

    /// Run every stage and return the text.
    pub(crate) fn run(&self, input: &str) -> String {
        self.execute(input, None).text
    }

    /// Run every stage, timing each one and optionally tracing every rule.
    pub(crate) fn run_with_metrics(&self, input: &str, trace_rules: bool) -> RunResult {
        let mut details = RunDetails::default();
        let mut result = self.execute(input, Some((&mut details, trace_rules)));
        result.details = details;
        result
    }

    fn execute(&self, input: &str, mut metrics: Option<(&mut RunDetails, bool)>) -> RunResult {
        let total_start = Instant::now();

        if input.is_empty() {
            return RunResult { text: String::new(), details: RunDetails::default() };
        }

        tracing::debug!(lang = ?self.lang, mode = %self.mode, len = input.len(), "executing");

        let mut text = normalize_line_endings(input);
        let mut rules_time = Duration::ZERO;

        text = self.timed(&mut rules_time, || self.apply_pass(text, Pass::Inner(Some(Queue::Start)), &mut metrics));

        let signals = InputSignals::scan(&text);
        let markup = signals.contains(InputSignals::MARKUP);

        let hide_start = Instant::now();
        let spans = if markup {
            let (masked, spans) = TagGuard::hide(&text);
            text = masked;
            Some(spans)
        } else {
            None
        };
        let hide = hide_start.elapsed();
        let protected_spans = spans.as_ref().map_or(0, |s| s.len());

        let decode_start = Instant::now();
        let entities_decoded = signals.contains(InputSignals::ENTITIES);
        if entities_decoded {
            text = self.entities.decode_all(&text).into_owned();
        } else {
            tracing::debug!("no entity references, skipping decode");
        }
        let decode = decode_start.elapsed();

        text = self.timed(&mut rules_time, || self.apply_pass(text, Pass::Inner(None), &mut metrics));
        text = self.timed(&mut rules_time, || self.apply_pass(text, Pass::Main, &mut metrics));

        let encode_start = Instant::now();
        text = self.entities.encode_all(&text, self.mode).into_owned();
        let encode = encode_start.elapsed();

        let show_start = Instant::now();
        if let Some(spans) = spans {
            text = TagGuard::show(&text, spans);
        }
        let show = show_start.elapsed();

        text = self.timed(&mut rules_time, || self.apply_pass(text, Pass::Inner(Some(Queue::End)), &mut metrics));

        if let Some((details, _)) = metrics.as_mut() {
            details.total = total_start.elapsed();
            details.stages.hide = hide;
            details.stages.decode = decode;
            details.stages.rules = rules_time;
            details.stages.encode = encode;
            details.stages.show = show;
            details.lang = self.lang.map(str::to_string);
            details.markup = markup;
            details.protected_spans = protected_spans;
            details.entities_decoded = entities_decoded;
        }

        RunResult { text, details: RunDetails::default() }
    }

    fn timed<T>(&self, acc: &mut Duration, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        *acc += start.elapsed();
        out
    }

    fn apply_pass(&self, mut text: String, pass: Pass, metrics: &mut Option<(&mut RunDetails, bool)>) -> String {
        match pass {
            Pass::Inner(queue) => {
                for rule in self.catalog.inner_rules().iter().filter(|r| r.queue() == queue) {
                    if self.config.is_disabled(rule.name()) {
                        continue;
                    }
                    text = self.apply_rule(rule.name(), true, queue, rule.handler(), text, metrics);
                }
            }
            Pass::Main => {
                for rule in self.catalog.rules() {
                    if self.config.is_disabled(rule.name()) || !self.lang_matches(rule.lang()) {
                        continue;
                    }
                    text = self.apply_rule(rule.name(), false, None, rule.handler(), text, metrics);
                }
            }
        }
        text
    }

    fn lang_matches(&self, rule_lang: &str) -> bool {
        rule_lang == COMMON_LANG || Some(rule_lang) == self.lang
    }

    fn apply_rule(
        &self,
        name: &str,
        inner: bool,
        queue: Option<Queue>,
        handler: &Handler,
        text: String,
        metrics: &mut Option<(&mut RunDetails, bool)>,
    ) -> String {
        let settings = self.config.settings_for(name).unwrap_or(&NO_SETTINGS);
        let ctx = RuleContext::new(self.lang, self.mode, self.config, self.catalog.data_map());

        let start = Instant::now();
        let out = handler(&text, settings, &ctx);
        let duration = start.elapsed();

        let tracing_rules = matches!(metrics, Some((_, true)));
        if tracing_rules || tracing::enabled!(tracing::Level::TRACE) {
            let changed = out != text;
            tracing::trace!(rule = name, inner, changed, ?duration, "applied rule");

            if let Some((details, true)) = metrics.as_mut() {
                details.rules.push(RuleTrace { name: name.to_string(), inner, queue, changed, duration });
            }
        }

        out
    }
}

/// `\r\n` and bare `\r` become `\n`.
fn normalize_line_endings(text: &str) -> String {
    if text.contains('\r') { text.replace("\r\n", "\n").replace('\r', "\n") } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InnerRuleDefinition, RuleDefinition};
    use std::sync::{Arc, Mutex};

    fn append(name: &str, suffix: &'static str) -> RuleDefinition {
        rule! {
            name: name,
            handler: |text, _, _| { format!("{text}{suffix}") }
        }
    }

    fn run(catalog: &RuleCatalog, config: &InstanceConfig, lang: Option<&str>, input: &str) -> String {
        Pipeline::new(catalog, config, EntityTable::global(), lang, Mode::None).run(input)
    }

    #[test]
    fn empty_input_skips_every_rule() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let mut catalog = RuleCatalog::new();
        catalog
            .register(RuleDefinition::new(
                "common/x/count",
                Arc::new(move |text: &str, _: &Settings, _: &RuleContext<'_>| {
                    *counter.lock().unwrap() += 1;
                    text.to_string()
                }),
            ))
            .unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, None, ""), "");
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        let catalog = RuleCatalog::new();
        let config = InstanceConfig::default();
        assert_eq!(run(&catalog, &config, None, "a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn runs_inner_before_main_in_sort_order() {
        let mut catalog = RuleCatalog::new();
        catalog.register(append("common/x/late", "3").with_sort_index(10)).unwrap();
        catalog.register(append("common/x/early", "2")).unwrap();
        catalog
            .register_inner(inner_rule! { name: "common/inner/x", handler: |text, _, _| { format!("{text}1") } })
            .unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, None, "t"), "t123");
    }

    #[test]
    fn filters_by_lang_and_enabled_state() {
        let mut catalog = RuleCatalog::new();
        catalog.register(append("common/x/a", "c")).unwrap();
        catalog.register(append("ru/x/a", "r")).unwrap();
        catalog.register(append("en/x/a", "e")).unwrap();
        catalog.register(append("ru/x/off", "!").with_enabled(false)).unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, Some("ru"), "t"), "tcr");
        assert_eq!(run(&catalog, &config, Some("en"), "t"), "tce");
        assert_eq!(run(&catalog, &config, None, "t"), "tc");
    }

    #[test]
    fn inner_rules_follow_explicit_disable_only() {
        let mut catalog = RuleCatalog::new();
        catalog.register_inner(inner_rule! { name: "ru/inner/x", handler: |t, _, _| { format!("{t}i") } }).unwrap();
        let mut config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert!(config.is_enabled("ru/inner/x"));
        assert_eq!(run(&catalog, &config, None, "t"), "ti");
        config.disable("ru/inner/x");
        assert_eq!(run(&catalog, &config, None, "t"), "t");
    }

    #[test]
    fn queues_bracket_the_pipeline() {
        let mut catalog = RuleCatalog::new();
        let order: Vec<InnerRuleDefinition> = vec![
            inner_rule! { name: "common/q/end", queue: Queue::End, handler: |t, _, _| { format!("{t}E") } },
            inner_rule! { name: "common/q/start", queue: Queue::Start, handler: |t, _, _| { format!("{t}S") } },
            inner_rule! { name: "common/q/mid", handler: |t, _, _| { format!("{t}M") } },
        ];
        for rule in order {
            catalog.register_inner(rule).unwrap();
        }
        catalog.register(append("common/q/main", "R")).unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, None, "t"), "tSMRE");
    }

    #[test]
    fn rules_never_see_protected_markup() {
        let mut catalog = RuleCatalog::new();
        catalog.register(rule! { name: "common/x/upper", handler: |t, _, _| { t.to_uppercase() } }).unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, None, "a<pre>b</pre>c"), "A<pre>b</pre>C");
    }

    #[test]
    fn metrics_trace_each_rule() {
        let mut catalog = RuleCatalog::new();
        catalog.register(append("common/x/a", "!")).unwrap();
        catalog.register(rule! { name: "common/x/noop", handler: |t, _, _| { t.to_string() } }).unwrap();
        let config = InstanceConfig::from_catalog(&catalog, None, Mode::None);
        let pipeline = Pipeline::new(&catalog, &config, EntityTable::global(), None, Mode::None);

        let result = pipeline.run_with_metrics("<b class=\"x\">t</b> &amp;", true);
        assert_eq!(result.text, "<b class=\"x\">t</b> &!");
        assert!(result.details.markup);
        assert!(result.details.entities_decoded);
        assert_eq!(result.details.protected_spans, 1);

        let traced: Vec<(&str, bool)> = result.details.rules.iter().map(|r| (r.name.as_str(), r.changed)).collect();
        assert_eq!(traced, [("common/x/a", true), ("common/x/noop", false)]);
    }

    #[test]
    fn settings_and_data_reach_handlers() {
        let mut catalog = RuleCatalog::new();
        catalog.set_data("greeting", "hi");
        catalog
            .register(rule! {
                name: "common/x/greet",
                settings: { "sep" => "-" },
                handler: |_, settings, ctx| {
                    let sep = settings.get("sep").and_then(|v| v.as_str()).unwrap_or("?");
                    format!("{}{}{}", ctx.data("greeting").unwrap_or(""), sep, ctx.lang().unwrap_or("none"))
                }
            })
            .unwrap();
        let mut config = InstanceConfig::from_catalog(&catalog, None, Mode::None);

        assert_eq!(run(&catalog, &config, Some("ru"), "x"), "hi-ru");
        config.set_setting("common/x/greet", "sep", "+");
        assert_eq!(run(&catalog, &config, None, "x"), "hi+none");
    }
}
