mod debug_report;

use anyhow::{Context as _, Result, bail};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use typograf::{ExecuteParams, Mode, Prefs, Settings, Typograf};

/// Typographic cleanup for plain text and HTML.
#[derive(Parser, Debug)]
#[command(name = "typograf", version, about)]
struct Cli {
    /// Locale whose rules run in addition to `common` ones (e.g. `ru`).
    #[arg(short, long)]
    lang: Option<String>,

    /// Entity output mode: none, name or digit.
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Enable rules by name or `*` pattern. Repeatable.
    #[arg(long, value_name = "PATTERN")]
    enable: Vec<String>,

    /// Disable rules by name or `*` pattern. Repeatable.
    #[arg(long, value_name = "PATTERN")]
    disable: Vec<String>,

    /// Override a rule setting, `rule:key=value`. The value is read as JSON
    /// and falls back to a plain string.
    #[arg(long = "set", value_name = "RULE:KEY=VALUE", value_parser = parse_setting)]
    settings: Vec<SettingOverride>,

    /// JSON profile with lang, mode, enable, disable and settings.
    /// Command line flags win over it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input text. Reads trailing arguments, then stdin, when omitted.
    #[arg(short, long, value_name = "TEXT")]
    input: Option<String>,

    /// Print stage timings and a trace of every rule to stderr.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Force ANSI color in the verbose report.
    #[arg(long, action = ArgAction::SetTrue)]
    color: bool,

    /// Disable ANSI color in the verbose report.
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,

    /// List every rule and whether it is enabled, then exit.
    #[arg(long, action = ArgAction::SetTrue)]
    list: bool,

    text: Vec<String>,
}

#[derive(Debug, Clone)]
struct SettingOverride {
    rule: String,
    key: String,
    value: serde_json::Value,
}

fn parse_setting(raw: &str) -> Result<SettingOverride, String> {
    let (target, value) = raw.split_once('=').ok_or_else(|| format!("expected RULE:KEY=VALUE, got '{raw}'"))?;
    let (rule, key) = target.rsplit_once(':').ok_or_else(|| format!("expected RULE:KEY before '=', got '{target}'"))?;
    if rule.is_empty() || key.is_empty() {
        return Err(format!("rule and key must not be empty in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok(SettingOverride { rule: rule.to_string(), key: key.to_string(), value })
}

/// `--config` file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Profile {
    #[serde(flatten)]
    prefs: Prefs,
    enable: Vec<String>,
    disable: Vec<String>,
    settings: BTreeMap<String, Settings>,
}

impl Profile {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid profile {}", path.display()))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let profile = match &cli.config {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    let prefs = Prefs { lang: cli.lang.clone().or(profile.prefs.lang), mode: cli.mode.unwrap_or(profile.prefs.mode) };
    let mut tp = Typograf::with_prefs(prefs);

    tp.enable(&profile.enable).disable(&profile.disable);
    for (rule, settings) in &profile.settings {
        for (key, value) in settings {
            tp.set_setting(rule, key, value.clone());
        }
    }
    tp.enable(&cli.enable).disable(&cli.disable);
    for setting in &cli.settings {
        tp.set_setting(&setting.rule, &setting.key, setting.value.clone());
    }

    if cli.list {
        print_rules(&tp);
        return Ok(());
    }

    let input = read_input(&cli)?;
    let color = if cli.no_color { false } else { cli.color || io::stderr().is_terminal() };

    if cli.verbose {
        let out = tp.execute_verbose(&input, &ExecuteParams::default());
        debug_report::print_run(&input, &out, color);
        print!("{}", out.text);
    } else {
        print!("{}", tp.execute(&input));
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    match (&cli.input, cli.text.is_empty()) {
        (Some(_), false) => bail!("input provided multiple times"),
        (Some(input), true) => Ok(input.clone()),
        (None, false) => Ok(cli.text.join(" ")),
        (None, true) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_rules(tp: &Typograf) {
    let catalog = tp.catalog();
    for rule in catalog.rules() {
        let state = if tp.is_enabled(rule.name()) { "on " } else { "off" };
        println!("{state} {:<36} {}", rule.name(), rule.title().unwrap_or(""));
    }
    for rule in catalog.inner_rules() {
        let queue = rule.queue().map_or_else(|| "-".to_string(), |q| q.to_string());
        println!("    {:<36} inner, queue {queue}", rule.name());
    }
}
