//! CLI entrypoint for rasa-bridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rasa_bridge_application::{
    ChatSession, ConversationLogger, NoConversationLogger, SessionConfig,
};
use rasa_bridge_domain::{ConfigIssue, OutputFormat, Severity};
use rasa_bridge_infrastructure::{
    ConfigLoader, FileConfig, HttpTransportFactory, JsonlConversationLogger,
};
use rasa_bridge_presentation::{ChatRepl, Cli, ConsolePrinter, ProgressMode, TurnRunner};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!("Starting rasa-bridge");

    // === Configuration ===
    if let Some(path) = &cli.config
        && !cli.no_config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    let file_config = apply_overrides(file_config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&file_config)?);
        return Ok(ExitCode::SUCCESS);
    }

    report_issues(&file_config.validate())?;

    if cli.no_color || !file_config.output.color {
        colored::control::set_override(false);
    }

    if !cli.chat && cli.messages.is_empty() {
        bail!("At least one message is required. Use --chat for interactive mode.");
    }

    // === Dependency Injection ===
    let session_config: SessionConfig = file_config.to_session_config();
    let wait = cli
        .wait
        .map(Duration::from_secs)
        .unwrap_or(session_config.endpoint.timeout);
    let format = file_config.output.format.unwrap_or_default();
    let logger = transcript_logger(file_config.logging.transcript.as_ref());

    let session = ChatSession::start_with_logger(
        session_config,
        &HttpTransportFactory::new(),
        Arc::new(ConsolePrinter::new(format)),
        logger,
    )
    .await
    .context("Failed to start session")?;
    let session = Arc::new(session);

    info!("Session {} in {} mode", session.sender(), session.mode());

    let progress = if cli.quiet || format != OutputFormat::Text {
        ProgressMode::Hidden
    } else if std::io::stderr().is_terminal() {
        ProgressMode::Spinner
    } else {
        ProgressMode::Lines
    };
    let runner = TurnRunner::new(Arc::clone(&session), wait).with_progress(progress);

    let failures = if cli.chat {
        let repl = ChatRepl::new(runner).with_prompt(!cli.quiet);
        repl.run().await?
    } else {
        let mut failures = 0;
        for message in &cli.messages {
            if let Err(e) = runner.run(message).await {
                failures += 1;
                eprintln!("Error: {}", e);
            }
        }
        failures
    };

    if let Err(e) = session.stop().await {
        warn!("Session did not stop cleanly: {}", e);
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize logging based on verbosity level, to stderr or `--log-file`.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Command-line flags take precedence over every config source.
fn apply_overrides(mut config: FileConfig, cli: &Cli) -> FileConfig {
    if let Some(url) = &cli.endpoint {
        config.endpoint.url = Some(url.clone());
    }
    if let Some(token) = &cli.token {
        config.endpoint.token = Some(token.clone());
    }
    if let Some(jwt) = &cli.jwt {
        config.endpoint.jwt = Some(jwt.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.endpoint.timeout_seconds = timeout;
    }
    if let Some(mode) = &cli.mode {
        config.session.mode = Some(mode.clone());
    }
    if let Some(sender) = &cli.sender {
        config.session.sender = Some(sender.clone());
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if let Some(path) = &cli.transcript {
        config.logging.transcript = Some(path.clone());
    }
    config
}

fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    if ConfigIssue::has_errors(issues) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// A transcript that cannot be opened is reported but does not stop the run.
fn transcript_logger(path: Option<&PathBuf>) -> Arc<dyn ConversationLogger> {
    let Some(path) = path else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Transcript disabled, cannot open {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_config() {
        let mut file = FileConfig::default();
        file.endpoint.url = Some("http://from-file:5005".to_string());
        file.endpoint.timeout_seconds = 12;
        file.session.mode = Some("both".to_string());

        let cli = Cli::parse_from([
            "rasa-bridge",
            "--endpoint",
            "http://from-cli:5005",
            "--mode",
            "nlu_input",
            "-o",
            "json",
            "hi",
        ]);
        let merged = apply_overrides(file, &cli);

        assert_eq!(merged.endpoint.url.as_deref(), Some("http://from-cli:5005"));
        assert_eq!(merged.endpoint.timeout_seconds, 12);
        assert_eq!(merged.session.mode.as_deref(), Some("nlu_input"));
        assert_eq!(merged.output.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_report_issues_fails_on_errors_only() {
        let mut config = FileConfig::default();
        config.endpoint.token = Some("t".to_string());
        config.endpoint.jwt = Some("j".to_string());
        assert!(report_issues(&config.validate()).is_ok());

        config.endpoint.timeout_seconds = 0;
        assert!(report_issues(&config.validate()).is_err());
    }
}
