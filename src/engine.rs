//! Rule execution engine.
//!
//! The engine is split into focused submodules under `src/engine/`; the public
//! entry point is [`crate::Typograf`] in `api.rs`, which owns an
//! [`InstanceConfig`] and a shared [`RuleCatalog`] and drives a
//! [`Pipeline`] per call.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all) ── RuleCatalog::register      (catalog.rs)
//!                  - stable sort by sort_index
//!                        │
//!                        ├── InstanceConfig::from_catalog   (config.rs)
//!                        │     - enabled flags + settings snapshot
//!                        v
//! input ── Pipeline::run                     (pipeline.rs)
//!            - normalize line endings
//!            - inner rules, queue=start
//!            - InputSignals::scan            (signals.rs)
//!            - TagGuard::hide                (tag_guard.rs)
//!            - EntityTable::decode_all       (entities.rs)
//!            - inner rules, main rules
//!            - EntityTable::encode_all
//!            - TagGuard::show
//!            - inner rules, queue=end
//!                        │
//!                        v
//!                      String  (+ RunDetails, metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `catalog.rs`: the rule registry and shared rule data.
//! - `config.rs`: per-engine enabled flags, wildcard masks and settings.
//! - `signals.rs`: cheap scan of the input deciding which stages must run.
//! - `tag_guard.rs`: placeholder masking of markup regions.
//! - `entities.rs`: entity decoding and re-encoding over the entity table.
//! - `pipeline.rs`: the ordered stage runner.
//! - `metrics.rs`: optional timing and per-rule trace data.
//!
//! ## Debugging
//!
//! Stage decisions are logged at `debug` and every rule application at
//! `trace` through `tracing`; install a subscriber to see them.

#[path = "engine/catalog.rs"]
mod catalog;
#[path = "engine/config.rs"]
mod config;
#[path = "engine/entities.rs"]
mod entities;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pipeline.rs"]
mod pipeline;
#[path = "engine/signals.rs"]
mod signals;
#[path = "engine/tag_guard.rs"]
mod tag_guard;

pub use catalog::RuleCatalog;
pub use config::{InstanceConfig, IntoPatterns};
pub use entities::EntityTable;
pub use metrics::{RuleTrace, RunDetails, StageTimings};
pub(crate) use pipeline::Pipeline;
pub use signals::InputSignals;
pub use tag_guard::{ProtectedSpans, TagGuard};
