use typograf::{RuleTrace, RunOutput};

/// ANSI styles used by the run report.
#[derive(Debug, Clone, Copy)]
enum Style {
    Bold,
    Dim,
    Green,
    Yellow,
    Blue,
    Cyan,
    Gray,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "\x1b[1m",
            Style::Dim => "\x1b[2m",
            Style::Green => "\x1b[32m",
            Style::Yellow => "\x1b[33m",
            Style::Blue => "\x1b[34m",
            Style::Cyan => "\x1b[36m",
            Style::Gray => "\x1b[90m",
        }
    }
}

/// Paints text when color is on, passes it through otherwise.
#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(self, s: impl AsRef<str>, style: Style) -> String {
        if self.enabled { format!("{}{}\x1b[0m", style.code(), s.as_ref()) } else { s.as_ref().to_string() }
    }

    fn dim(self, s: impl AsRef<str>) -> String {
        self.paint(s, Style::Dim)
    }

    fn banner(self, title: &str) -> String {
        self.paint(format!("━━━ {title} ━━━"), Style::Gray)
    }

    fn flag(self, on: bool) -> String {
        if on { self.paint("yes", Style::Green) } else { self.dim("no") }
    }
}

/// Print a verbose run to stderr. Stdout stays reserved for the typeset text.
pub fn print_run(input: &str, run: &RunOutput, color: bool) {
    let palette = Palette { enabled: color };
    let details = &run.details;
    let heading = palette.paint(format!("⚙  Typesetting {} bytes", input.len()), Style::Cyan);
    eprintln!("\n{}", palette.paint(heading, Style::Bold));

    eprintln!("\n{}", palette.banner("Input"));
    eprintln!(
        "  {} {}  {} {}  {} {}",
        palette.dim("lang:"),
        palette.paint(details.lang.as_deref().unwrap_or("common only"), Style::Blue),
        palette.dim("markup:"),
        palette.flag(details.markup),
        palette.dim("entities:"),
        palette.flag(details.entities_decoded),
    );
    if details.protected_spans > 0 {
        eprintln!("  {}", palette.paint(format!("{} protected spans", details.protected_spans), Style::Yellow));
    }

    eprintln!("\n{}", palette.banner("Rules"));
    if details.rules.is_empty() {
        eprintln!("{}", palette.dim("  No rules ran"));
    } else {
        for rule in &details.rules {
            eprintln!("  {}", fmt_rule(rule, palette));
        }
        let changed = details.rules.iter().filter(|r| r.changed).count();
        eprintln!("  {}", palette.dim(format!("{} of {} changed the text", changed, details.rules.len())));
    }

    eprintln!("\n{}", palette.banner("Timing"));
    let stages = &details.stages;
    eprintln!(
        "  Total: {}  │  Rules: {}  │  Hide: {}  Decode: {}  Encode: {}  Show: {}",
        palette.paint(format!("{:?}", run.elapsed), Style::Green),
        palette.paint(format!("{:?}", stages.rules), Style::Cyan),
        palette.dim(format!("{:?}", stages.hide)),
        palette.dim(format!("{:?}", stages.decode)),
        palette.dim(format!("{:?}", stages.encode)),
        palette.dim(format!("{:?}", stages.show)),
    );
    eprintln!();
}

fn fmt_rule(rule: &RuleTrace, palette: Palette) -> String {
    let marker = if rule.changed { palette.paint("✓", Style::Green) } else { palette.dim("·") };
    let kind = match (rule.inner, rule.queue) {
        (false, _) => String::new(),
        (true, None) => palette.dim(" [inner]"),
        (true, Some(queue)) => palette.dim(format!(" [inner, {queue}]")),
    };
    format!(
        "{} {}{} {}",
        marker,
        palette.paint(&rule.name, if rule.changed { Style::Blue } else { Style::Gray }),
        kind,
        palette.dim(format!("{:?}", rule.duration)),
    )
}
