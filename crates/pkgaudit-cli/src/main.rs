//! CLI entry point for pkgaudit.
//!
//! This module stays thin: it handles argument parsing, logging, I/O and exit codes.
//! All business logic lives in the `pkgaudit-app` crate.

mod query;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use pkgaudit_app::{
    CheckInput, FingerprintInput, config_schema_json, detect_fingerprint, parse_report_json,
    render_markdown, report_exit_code, run_check, runtime_error_report, serialize_report,
    to_renderable,
};
use pkgaudit_domain::query::PackageQuery;
use pkgaudit_render::RenderableReport;
use pkgaudit_settings::Overrides;
use pkgaudit_types::Verdict;
use query::SystemPackageQuery;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "pkgaudit",
    version,
    about = "Audit installed packages against blacklist/whitelist policies"
)]
struct Cli {
    /// Path to pkgaudit config TOML.
    #[arg(long, default_value = "pkgaudit.toml", global = true)]
    config: Utf8PathBuf,

    /// Policy file or directory (repeatable). Replaces `policies` from the config.
    #[arg(long = "policy", global = true)]
    policies: Vec<Utf8PathBuf>,

    /// Glob selecting which tags are evaluated (e.g. `CIS-*`).
    #[arg(long, global = true)]
    tags: Option<String>,

    /// Report full rule records instead of per-tag summaries.
    #[arg(long, global = true)]
    verbose: bool,

    /// Use this host fingerprint instead of detecting it.
    #[arg(long, global = true)]
    fingerprint: Option<String>,

    /// JSON `{ "package": "version" }` file used instead of the system package manager.
    #[arg(long, global = true)]
    inventory: Option<Utf8PathBuf>,

    /// os-release file used for fingerprint detection.
    #[arg(long, default_value = "/etc/os-release", global = true)]
    os_release: Utf8PathBuf,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short = 'v', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit the host and write the report.
    Check {
        /// Where to write the JSON report (`-` for stdout).
        #[arg(long, default_value = "artifacts/pkgaudit/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/pkgaudit/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/pkgaudit/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Print the host fingerprint used to select policy buckets.
    Fingerprint,

    /// Print the JSON schema of the config file.
    ConfigSchema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match &cli.cmd {
        Commands::Check {
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_check(&cli, report_out, *write_markdown, markdown_out),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Fingerprint => cmd_fingerprint(&cli),
        Commands::ConfigSchema => {
            println!("{}", config_schema_json()?);
            Ok(())
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        tags: cli.tags.clone(),
        verbose: cli.verbose.then_some(true),
        fingerprint: cli.fingerprint.clone(),
        policies: cli.policies.clone(),
        inventory: cli.inventory.clone(),
    }
}

/// Config text, or empty when the file does not exist.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path, "no config file; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;
        let overrides = overrides(cli);
        let system = SystemPackageQuery::detect();

        let output = run_check(CheckInput {
            config_text: &cfg_text,
            overrides: &overrides,
            os_release: &cli.os_release,
            system_query: system.as_ref().map(|q| q as &dyn PackageQuery),
        })?;

        write_report(report_out, &serialize_report(&output.report)?)
            .context("write report json")?;

        if write_markdown {
            let renderable = RenderableReport::from_envelope(&output.report);
            write_text_file(markdown_out, &render_markdown(&renderable))
                .context("write markdown")?;
        }

        let results = &output.report.results;
        eprintln!(
            "pkgaudit: {} ({} failure, {} controlled, {} success)",
            match output.report.verdict {
                Verdict::Pass => "pass",
                Verdict::Fail => "fail",
            },
            results.failure.len(),
            results.controlled().len(),
            results.success.len()
        );

        Ok(report_exit_code(&output.report))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(cli.fingerprint.as_deref(), &format!("{err:#}"));
            if let Ok(data) = serialize_report(&report) {
                let _ = write_report(report_out, &data);
            }
            eprintln!("pkgaudit error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_fingerprint(cli: &Cli) -> anyhow::Result<()> {
    let cfg_text = read_config(&cli.config)?;
    let cfg = if cfg_text.trim().is_empty() {
        pkgaudit_settings::PkgauditConfigV1::default()
    } else {
        pkgaudit_settings::parse_config_toml(&cfg_text).context("parse config")?
    };
    let resolved =
        pkgaudit_settings::resolve_config(cfg, overrides(cli)).context("resolve config")?;

    let fingerprint = detect_fingerprint(FingerprintInput {
        configured: resolved.fingerprint.as_deref(),
        os_release: &cli.os_release,
    })?;
    println!("{fingerprint}");
    Ok(())
}

fn write_report(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if path.as_str() == "-" {
        use std::io::Write;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data).context("write report to stdout")?;
        stdout.write_all(b"\n").context("write report to stdout")?;
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}
