use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repopulse_core::classify::RuleSet;
use repopulse_core::config::Config;
use repopulse_core::report::{ClassificationReport, HealthReport};
use repopulse_core::types::CheckStatus;
use repopulse_core::{analyze_health, analyze_issues, classify, ClassifyOptions, HealthOptions};

#[derive(Parser, Debug)]
#[command(
    name = "repopulse",
    version,
    about = "Repository health scores and issue label suggestions"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score repository snapshots
    Health {
        #[arg(long)]
        input: PathBuf,

        /// Reference time for activity checks (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "repopulse-out")]
        out: PathBuf,

        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },
    /// Suggest labels for issues or pull requests
    Classify {
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        input: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, default_value = "")]
        body: String,

        /// Deactivate a rule for this run
        #[arg(long)]
        disable: Vec<String>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "repopulse-out")]
        out: PathBuf,

        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Md,
    All,
}

impl OutputFormat {
    fn json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }

    fn md(&self) -> bool {
        matches!(self, OutputFormat::Md | OutputFormat::All)
    }
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    cyan: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    cyan: "\x1b[36m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    cyan: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("REPOPULSE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let res = match cli.cmd {
        Commands::Health {
            input,
            now,
            min_score,
            config,
            out,
            output_format,
        } => {
            let cfg = load_config(config.as_deref());
            let opts = HealthOptions {
                min_score: min_score.or(cfg.min_score),
                ..HealthOptions::at(now.unwrap_or_else(Utc::now))
            };
            run_health(&input, opts, &out, &output_format)
        }
        Commands::Classify {
            input,
            title,
            body,
            disable,
            config,
            out,
            output_format,
        } => {
            let cfg = load_config(config.as_deref());
            let rules = resolve_rules(&cfg, &disable);
            match (input, title) {
                (Some(input), _) => run_classify_batch(&input, rules, &out, &output_format),
                (None, Some(title)) => run_classify_one(&title, &body, &rules),
                (None, None) => Err(anyhow::anyhow!("either --input or --title is required")),
            }
        }
    };

    match res {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            std::process::ExitCode::from(1)
        }
    }
}

fn print_banner() {
    let s = style();
    eprintln!(
        "\n  {bold}repo{reset}{cyan}pulse{reset}  {dim}health and triage{reset}\n",
        bold = s.bold,
        cyan = s.cyan,
        dim = s.dim,
        reset = s.reset,
    );
}

fn score_color(score: u8) -> &'static str {
    let s = style();
    if score >= 80 {
        s.green
    } else if score >= 50 {
        s.yellow
    } else {
        s.red
    }
}

fn status_color(status: CheckStatus) -> &'static str {
    let s = style();
    match status {
        CheckStatus::Pass => s.green,
        CheckStatus::Warning => s.yellow,
        CheckStatus::Fail => s.red,
    }
}

fn print_health(report: &HealthReport) {
    let s = style();

    for r in &report.repositories {
        let score = r.assessment.score;
        eprintln!(
            "  {bold}{}{reset}  {sc}{bold}{:>3}{reset}{dim}/100{reset}",
            r.full_name,
            score,
            sc = score_color(score),
            bold = s.bold,
            dim = s.dim,
            reset = s.reset
        );
        for c in r.assessment.checks.iter().filter(|c| !c.passed()) {
            eprintln!(
                "    {sc}{:?}{reset}  {}  {dim}{}{reset}",
                c.status,
                c.kind,
                c.description,
                sc = status_color(c.status),
                dim = s.dim,
                reset = s.reset
            );
        }
    }

    eprintln!();
    eprintln!(
        "  {dim}average_score {reset}{bold}{:.1}{reset}",
        report.summary.average_score(),
        dim = s.dim,
        bold = s.bold,
        reset = s.reset
    );
}

fn print_outputs(paths: &[PathBuf]) {
    let s = style();
    eprintln!();
    for p in paths {
        eprintln!(
            "  {dim}\u{2192} {}{reset}",
            p.display(),
            dim = s.dim,
            reset = s.reset
        );
    }
    eprintln!();
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!(
                "{}{}warning:{} failed to load config {}: {:#}",
                style().bold,
                style().yellow,
                style().reset,
                p.display(),
                e
            );
            Config::default()
        }),
        None => Config::discover().unwrap_or_default(),
    }
}

fn resolve_rules(cfg: &Config, disable: &[String]) -> RuleSet {
    let mut rules = cfg.rule_set();
    for label in disable {
        if !rules.set_active(label, false) {
            tracing::warn!(%label, "--disable names an unknown label");
        }
    }
    rules
}

fn write_outputs(
    out: &Path,
    stem: &str,
    format: &OutputFormat,
    json: impl FnOnce() -> anyhow::Result<Vec<u8>>,
    md: impl FnOnce() -> String,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out).with_context(|| format!("create out dir {}", out.display()))?;

    let mut written = Vec::new();
    if format.json() {
        let path = out.join(format!("{stem}.json"));
        std::fs::write(&path, json()?).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    if format.md() {
        let path = out.join(format!("{stem}.md"));
        std::fs::write(&path, md()).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn run_health(
    input: &Path,
    opts: HealthOptions,
    out: &Path,
    output_format: &OutputFormat,
) -> anyhow::Result<std::process::ExitCode> {
    let s = style();

    print_banner();

    let report = analyze_health(input, opts)?;

    let written = write_outputs(
        out,
        "report",
        output_format,
        || serde_json::to_vec_pretty(&report).context("serialize report json"),
        || report.to_markdown(),
    )?;

    // Machine-parseable line on stdout
    println!(
        "repositories={} average_score={:.1} lowest_score={}",
        report.summary.repositories,
        report.summary.average_score(),
        report
            .summary
            .min_score
            .map_or_else(|| "none".to_string(), |m| m.to_string())
    );

    print_health(&report);
    print_outputs(&written);

    let exit = match &report.gate {
        Some(g) if !g.pass => {
            eprintln!(
                "  {red}{bold}GATE FAILED{reset}  {dim}({}){reset}",
                g.reason,
                red = s.red,
                bold = s.bold,
                dim = s.dim,
                reset = s.reset,
            );
            std::process::ExitCode::from(2)
        }
        _ => {
            eprintln!(
                "  {green}{bold}PASS{reset}",
                green = s.green,
                bold = s.bold,
                reset = s.reset
            );
            std::process::ExitCode::from(0)
        }
    };

    eprintln!();

    Ok(exit)
}

fn run_classify_batch(
    input: &Path,
    rules: RuleSet,
    out: &Path,
    output_format: &OutputFormat,
) -> anyhow::Result<std::process::ExitCode> {
    print_banner();

    let opts = ClassifyOptions {
        rules,
        ..ClassifyOptions::default()
    };
    let report: ClassificationReport = analyze_issues(input, opts)?;

    let written = write_outputs(
        out,
        "labels",
        output_format,
        || serde_json::to_vec_pretty(&report).context("serialize labels json"),
        || report.to_markdown(),
    )?;

    println!(
        "issues={} average_confidence={:.1}",
        report.summary.issues,
        report.summary.average_confidence()
    );

    let s = style();
    for (label, n) in &report.summary.label_counts {
        eprintln!(
            "  {dim}{:<16}{reset}{bold}{}{reset}",
            label,
            n,
            dim = s.dim,
            bold = s.bold,
            reset = s.reset
        );
    }
    print_outputs(&written);

    Ok(std::process::ExitCode::from(0))
}

fn run_classify_one(
    title: &str,
    body: &str,
    rules: &RuleSet,
) -> anyhow::Result<std::process::ExitCode> {
    let c = classify(title, body, rules);
    println!("labels={} confidence={}", c.labels.join(","), c.confidence);
    Ok(std::process::ExitCode::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn score_color_thresholds() {
        assert_eq!(score_color(100), style().green);
        assert_eq!(score_color(57), style().yellow);
        assert_eq!(score_color(29), style().red);
    }

    #[test]
    fn status_color_thresholds() {
        assert_eq!(status_color(CheckStatus::Pass), style().green);
        assert_eq!(status_color(CheckStatus::Warning), style().yellow);
        assert_eq!(status_color(CheckStatus::Fail), style().red);
    }

    #[test]
    #[serial]
    fn style_respects_no_color() {
        std::env::set_var("NO_COLOR", "1");
        assert_eq!(style().bold, "");
        std::env::remove_var("NO_COLOR");
        assert_ne!(style().bold, "");
    }

    #[test]
    fn cli_flags_disable_rules_on_top_of_config() {
        let rules = resolve_rules(&Config::default(), &["bug".to_string(), "nope".to_string()]);
        assert_eq!(rules.active().count(), 6);
        assert!(!rules.get("bug").unwrap().active);
    }

    #[test]
    fn output_format_selects_files() {
        assert!(OutputFormat::All.json() && OutputFormat::All.md());
        assert!(!OutputFormat::Json.md());
        assert!(!OutputFormat::Md.json());
    }
}
