use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use missedcall::config::{parse_base_url, SimConfig};
use missedcall::kernel::phase::Phase;
use missedcall::kernel::reactor::{Reactor, SimulatorHandle};
use missedcall::kernel::scenario::Scenario;
use missedcall::outputs::screen;
use missedcall::services::decision::client::DecisionClient;

/// Missed-call-to-text simulator.
#[derive(Debug, Parser)]
#[command(name = "missedcall", version)]
struct Args {
    /// Decision endpoint base URL (overrides MISSEDCALL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds the phone rings before the call is missed
    #[arg(long)]
    ring_secs: Option<f64>,

    /// Bound on the decision call in seconds, 0 to wait forever
    #[arg(long)]
    call_timeout_secs: Option<f64>,

    /// Scenario to select at start: business_hours, evening or vip
    #[arg(long)]
    scenario: Option<Scenario>,

    /// Run a single call and exit once the text arrives
    #[arg(long)]
    once: bool,
}

impl Args {
    fn apply(&self, mut config: SimConfig) -> Result<SimConfig> {
        if let Some(raw) = &self.api_url {
            config.api_base = parse_base_url(raw)?;
        }
        if let Some(secs) = self.ring_secs {
            config.ring_duration = Duration::try_from_secs_f64(secs).context("--ring-secs")?;
        }
        if let Some(secs) = self.call_timeout_secs {
            let limit = Duration::try_from_secs_f64(secs).context("--call-timeout-secs")?;
            config.call_timeout = (!limit.is_zero()).then_some(limit);
        }
        Ok(config)
    }
}

#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    Call,
    Reset,
    Select(Scenario),
    Status,
    Stats,
    Quit,
}

fn parse_command(line: &str) -> Result<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let command = match (words.next(), words.next()) {
        (Some("call"), None) => ConsoleCommand::Call,
        (Some("reset"), None) => ConsoleCommand::Reset,
        (Some("scenario"), Some(name)) => ConsoleCommand::Select(name.parse()?),
        (Some("status"), None) => ConsoleCommand::Status,
        (Some("stats"), None) => ConsoleCommand::Stats,
        (Some("quit" | "exit"), None) => ConsoleCommand::Quit,
        _ => bail!("unknown command '{}'", line.trim()),
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.apply(SimConfig::from_env().context("reading MISSEDCALL_* environment")?)?;
    let client = DecisionClient::from_config(&config).context("building decision client")?;
    tracing::info!("Decision endpoint: {}", client.endpoint());

    let (handle, reactor) = Reactor::spawn(&config, Arc::new(client));
    if let Some(scenario) = args.scenario {
        handle.set_scenario(scenario).await?;
    }

    let outcome = if args.once {
        run_once(&handle, &config).await
    } else {
        interactive(&handle).await
    };

    drop(handle);
    reactor.await.context("reactor task panicked")?;
    outcome
}

async fn run_once(handle: &SimulatorHandle, config: &SimConfig) -> Result<()> {
    let run = handle.trigger().await?;
    tracing::info!("Triggered {}", run);

    let deadline = config.ring_duration
        + config.call_timeout.unwrap_or(Duration::from_secs(60))
        + config.max_text_delay
        + Duration::from_secs(1);

    let mut rx = handle.subscribe();
    let settled = tokio::time::timeout(deadline, rx.wait_for(|v| v.phase == Phase::Texted || v.failure.is_some()))
        .await
        .context("simulation did not settle in time")?
        .map(|view| view.clone())
        .context("simulator stopped")?;

    println!("{}", screen::render(&settled));
    if let Some(kind) = settled.failure {
        bail!("decision call failed ({:?})", kind);
    }
    Ok(())
}

async fn interactive(handle: &SimulatorHandle) -> Result<()> {
    let mut views = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            let text = screen::render(&views.borrow_and_update());
            println!("\n{}\n", text);
            if views.changed().await.is_err() {
                break;
            }
        }
    });

    println!("Commands: call | reset | scenario <business_hours|evening|vip> | status | stats | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Call => {
                if let Err(e) = handle.trigger().await {
                    println!("{}", e);
                }
            }
            ConsoleCommand::Reset => handle.reset().await?,
            ConsoleCommand::Select(scenario) => handle.set_scenario(scenario).await?,
            ConsoleCommand::Status => println!("{}", screen::render(&handle.view())),
            ConsoleCommand::Stats => println!("{:#?}", handle.telemetry().await?),
            ConsoleCommand::Quit => break,
        }
    }

    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_console_commands() {
        assert_eq!(parse_command("call").unwrap(), ConsoleCommand::Call);
        assert_eq!(parse_command("  reset ").unwrap(), ConsoleCommand::Reset);
        assert_eq!(parse_command("scenario vip").unwrap(), ConsoleCommand::Select(Scenario::Vip));
        assert_eq!(parse_command("exit").unwrap(), ConsoleCommand::Quit);
        assert!(parse_command("scenario morning").is_err());
        assert!(parse_command("call now").is_err());
    }

    #[test]
    fn cli_overrides_config() {
        let args = Args::parse_from(["missedcall", "--api-url", "http://localhost:8000", "--call-timeout-secs", "0"]);
        let config = args.apply(SimConfig::default()).unwrap();
        assert_eq!(config.call_timeout, None);
        assert_eq!(config.endpoint().unwrap().as_str(), "http://localhost:8000/api/missed-call");
    }
}
