//! Run metrics.
//!
//! `Pipeline::run` is the normal path and records nothing beyond the output.
//! `Pipeline::run_with_metrics` additionally times each stage and, when asked,
//! keeps one [`RuleTrace`] per rule application. Traces compare the text
//! before and after every handler, so they are opt-in.

use crate::Queue;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunDetails {
    /// Total elapsed time for the run.
    pub total: Duration,
    pub stages: StageTimings,
    /// Locale the run resolved to.
    pub lang: Option<String>,
    /// Whether the markup heuristic fired.
    pub markup: bool,
    /// Number of regions replaced by placeholders.
    pub protected_spans: usize,
    /// Whether entity decoding ran.
    pub entities_decoded: bool,
    /// One entry per rule that ran, in execution order.
    pub rules: Vec<RuleTrace>,
}

/// Time spent in each pipeline stage.
#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    pub hide: Duration,
    pub decode: Duration,
    /// Inner rules of every queue plus main rules.
    pub rules: Duration,
    pub encode: Duration,
    pub show: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTrace {
    pub name: String,
    /// `false` for main rules.
    pub inner: bool,
    pub queue: Option<Queue>,
    /// Whether the handler returned different text.
    pub changed: bool,
    pub duration: Duration,
}

/// Pipeline output bundled with timing information.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    pub text: String,
    pub details: RunDetails,
}
