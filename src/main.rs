//! funnel-sim - drive a URL-synchronized funnel from the command line
//!
//! Builds a funnel over an in-memory history from `FUNNEL_*` environment
//! variables and replays commands read from stdin, one per line:
//! `set <step>`, `back`, `forward`, `go <delta>`, `show`, `quit`.

use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use step_funnel::{FunnelController, FunnelOptions, Location, MemoryHistory, StepRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Set(String),
    Go(isize),
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let command = match (parts.next(), parts.next()) {
        (Some("set"), Some(step)) => Command::Set(step.to_string()),
        (Some("back"), None) => Command::Go(-1),
        (Some("forward"), None) => Command::Go(1),
        (Some("go"), Some(delta)) => Command::Go(
            delta
                .parse()
                .map_err(|_| format!("invalid delta `{delta}`"))?,
        ),
        (Some("show"), None) => Command::Show,
        (Some("quit" | "exit"), None) => Command::Quit,
        _ => return Err(format!("unrecognized command `{}`", line.trim())),
    };
    if parts.next().is_some() {
        return Err(format!("too many arguments in `{}`", line.trim()));
    }
    Ok(command)
}

/// One line of simulator output
#[derive(Debug, Serialize)]
struct Report<'a> {
    command: &'a str,
    ok: bool,
    step: String,
    url: String,
    history_len: usize,
    history_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays one report per line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "step_funnel=info,funnel_sim=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(io::stderr),
        )
        .init();

    // Configuration
    let steps = std::env::var("FUNNEL_STEPS")
        .map_err(|_| "FUNNEL_STEPS is required (comma separated)")?;
    let registry = StepRegistry::new(
        steps
            .split(',')
            .map(str::trim)
            .filter(|step| !step.is_empty()),
    )?;
    let url = std::env::var("FUNNEL_URL").unwrap_or_else(|_| "http://localhost/".to_string());
    let options = FunnelOptions::from_env()?;

    let history = Rc::new(MemoryHistory::parse(&url)?);
    let funnel = FunnelController::mount(registry, &options, history.clone());
    let _log_changes = funnel.subscribe(|step| tracing::info!(step = %step, "Step changed"));

    tracing::info!(
        steps = ?funnel.registry().steps(),
        step = %funnel.current_step(),
        query_param = ?options.query_param,
        history_mode = %options.history_mode,
        "Funnel ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Set(step)) => funnel.set_step(&step).map_err(|e| e.to_string()),
            Ok(Command::Go(delta)) => {
                if history.go(delta) {
                    Ok(())
                } else {
                    Err(format!("cannot move {delta} entries through history"))
                }
            }
            Ok(Command::Show) => Ok(()),
            Err(e) => Err(e),
        };

        let report = Report {
            command: line.trim(),
            ok: outcome.is_ok(),
            step: funnel.current_step(),
            url: history.current_url().to_string(),
            history_len: history.len(),
            history_index: history.index(),
            error: outcome.err(),
        };
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    }

    let query_value = funnel
        .sync_config()
        .and_then(|sync| history.query_param(&sync.query_param));
    funnel.dispose();
    tracing::info!(step = %funnel.current_step(), query_value = ?query_value, "Funnel closed");
    Ok(())
}
