use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use cronbox_common::observability::{LogConfig, LogFormat, init_logging};
use cronbox_config::{CronboxConfig, CronboxConfigLoader, LoggingSettings};
use cronbox_recipes::{RecipesJob, reference_offset};
use std::path::PathBuf;
use std::process::ExitCode;

mod jobs;

#[derive(Parser, Debug)]
#[command(name = "cronbox")]
#[command(about = "Scheduled fetch-pick-deliver jobs", long_about = None)]
struct Cli {
    /// YAML config file; missing is fine, defaults and env apply
    #[arg(long, global = true, env = "CRONBOX_CONFIG", default_value = "cronbox.yaml")]
    config: PathBuf,

    /// Reference instant (RFC 3339) instead of the current time
    #[arg(long, global = true)]
    now: Option<DateTime<FixedOffset>>,

    /// Override the configured log format (text or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a job and print its outcome as JSON
    Run {
        /// Job id (default: first enabled job)
        job: Option<String>,
    },
    /// Build the digest and print it without delivering
    Preview {
        /// Job id (default: first enabled job)
        job: Option<String>,
    },
}

impl Command {
    fn job_id(&self) -> Option<&str> {
        match self {
            Command::Run { job } | Command::Preview { job } => job.as_deref(),
        }
    }
}

fn log_config(settings: &LoggingSettings, format: Option<LogFormat>) -> LogConfig {
    LogConfig {
        app_name: "cronbox",
        log_dir: settings.dir.clone(),
        emit_stderr: settings.stderr,
        emit_file: settings.file,
        format: format.unwrap_or(settings.format),
        default_filter: settings.filter.clone(),
    }
}

fn select_job(cfg: &CronboxConfig, id: Option<&str>) -> Result<RecipesJob> {
    let spec = cfg.job(id).ok_or_else(|| match id {
        Some(id) => anyhow!("no job with id '{id}'"),
        None => anyhow!("no enabled job configured"),
    })?;
    jobs::build_job(spec)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file)
    let cfg = CronboxConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;

    init_logging(log_config(&cfg.logging, cli.log_format))?;
    cfg.validate()?;

    let job = select_job(&cfg, cli.command.job_id())?;
    let now = match cli.now {
        Some(instant) => instant.with_timezone(&reference_offset(job.config().utc_offset_hours)?),
        None => job.reference_now()?,
    };
    tracing::info!(config = %cli.config.display(), %now, "cronbox.start");

    match cli.command {
        Command::Run { .. } => {
            let outcome = job.run(&now).await;
            println!("{}", serde_json::to_string(&outcome)?);
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Preview { .. } => {
            let digest = job.preview(&now).await;
            println!("Subject: {}\n\n{}", digest.subject, digest.body);
            for failure in &digest.report.failures {
                eprintln!("warning: {} skipped: {}", failure.url, failure.error);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "cronbox",
            "--config",
            "/etc/cronbox.yaml",
            "run",
            "weekly-recipes",
            "--now",
            "2026-10-14T09:00:00-05:00",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/cronbox.yaml"));
        assert_eq!(cli.command.job_id(), Some("weekly-recipes"));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(
            cli.now.unwrap().to_rfc3339(),
            "2026-10-14T09:00:00-05:00"
        );
    }

    #[test]
    fn preview_defaults_to_first_enabled_job() {
        let cli = Cli::try_parse_from(["cronbox", "preview"]).unwrap();
        assert!(matches!(cli.command, Command::Preview { job: None }));
        assert!(cli.now.is_none());
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["cronbox", "--log-format", "xml", "run"]).is_err());
    }

    #[test]
    fn cli_override_beats_configured_format() {
        let settings = LoggingSettings::default();
        assert_eq!(log_config(&settings, None).format, settings.format);
        assert_eq!(
            log_config(&settings, Some(LogFormat::Json)).format,
            LogFormat::Json
        );
    }

    #[test]
    fn unknown_job_id_is_reported() {
        let cfg = CronboxConfig::default();
        let err = match select_job(&cfg, Some("nightly")) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err,
        };
        assert_eq!(err.to_string(), "no job with id 'nightly'");
        assert!(select_job(&cfg, None).is_ok());
    }
}
