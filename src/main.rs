//! txcast CLI
//!
//! Opens the terminal form by default. The `broadcast` and `search`
//! subcommands run one form action without the interactive screen.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::io::Read;
use std::time::{Duration, Instant};
use txcast::{
    broadcast, form, AppConfig, BroadcastOutcome, Command, ConfigArgs, Event, FormState,
    HttpTransport, LabelTone,
};

/// txcast - broadcast raw transactions through a local relay
#[derive(Parser)]
#[command(name = "txcast")]
#[command(author = "txcast Contributors")]
#[command(version)]
#[command(about = "Transaction broadcast form", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal form (default)
    Tui,

    /// Broadcast one payload and print the resulting label
    Broadcast {
        /// Raw transaction (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true, required_unless_present = "stdin")]
        payload: Option<String>,

        /// Read the payload from standard input
        #[arg(long, conflicts_with = "payload")]
        stdin: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Run the search action and print its label
    Search {
        /// Search query
        #[arg(allow_hyphen_values = true, default_value = "")]
        query: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = cli.config.resolve().and_then(|config| {
        if let Err(e) = txcast::logging::init(&config) {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
        }
        tracing::debug!(endpoint = %config.endpoint, "Configuration loaded");
        run(cli.command.unwrap_or(Commands::Tui), &config)
    });

    txcast::logging::flush();

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Run one command. `Ok(false)` means it ran but did not succeed.
fn run(command: Commands, config: &AppConfig) -> txcast::Result<bool> {
    match command {
        Commands::Tui => txcast::tui::run(config).map(|_| true),
        Commands::Broadcast {
            payload,
            stdin,
            output,
        } => {
            let payload = match payload {
                Some(payload) if !stdin => payload,
                _ => read_stdin_payload()?,
            };
            cmd_broadcast(config, payload, &output)
        }
        Commands::Search { query } => cmd_search(config, query),
        Commands::Config => cmd_config(config),
    }
}

/// Read a payload from stdin
fn read_stdin_payload() -> txcast::Result<String> {
    let mut payload = String::new();
    std::io::stdin().read_to_string(&mut payload)?;
    Ok(strip_final_line_break(payload))
}

/// Drop one trailing `\n` or `\r\n`; earlier line breaks are kept
fn strip_final_line_break(mut payload: String) -> String {
    if payload.ends_with('\n') {
        payload.pop();
        if payload.ends_with('\r') {
            payload.pop();
        }
    }
    payload
}

fn print_label(form: &FormState) {
    let label = match form.tone {
        LabelTone::Success => style(&form.label).green().bold(),
        LabelTone::Warning => style(&form.label).yellow(),
        LabelTone::Error => style(&form.label).red(),
        LabelTone::Info | LabelTone::Neutral => style(&form.label).cyan(),
    };
    println!("{} {}", style("→").cyan().bold(), label);
}

/// Broadcast a payload
fn cmd_broadcast(config: &AppConfig, payload: String, output_format: &str) -> txcast::Result<bool> {
    let mut form = FormState::new(config.stale_policy);
    form.update(Event::PayloadEdited(payload));

    let request = match form.update(Event::BroadcastSubmitted) {
        Command::Broadcast(request) => request,
        Command::None => {
            if output_format == "json" {
                println!("{}", invalid_json(&form.label));
            } else {
                print_label(&form);
            }
            return Ok(false);
        }
    };

    let transport = HttpTransport::new(config.timeout())?;
    let start = Instant::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Broadcasting to {}", config.endpoint));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = broadcast::broadcast(&transport, &config.endpoint, &request.payload);
    spinner.finish_and_clear();

    let accepted = outcome.is_accepted();
    form.update(Event::BroadcastFinished {
        ticket: request.ticket,
        outcome: outcome.clone(),
    });

    if output_format == "json" {
        println!("{}", outcome_json(&outcome, &form.label, start.elapsed()));
    } else {
        print_label(&form);
        println!(
            "  {} in {}",
            style(&config.endpoint).dim(),
            HumanDuration(start.elapsed())
        );
    }

    Ok(accepted)
}

fn outcome_json(outcome: &BroadcastOutcome, label: &str, elapsed: Duration) -> serde_json::Value {
    let mut value = match outcome {
        BroadcastOutcome::Accepted { txid } => serde_json::json!({ "status": "success", "txid": txid }),
        BroadcastOutcome::Rejected { message } => {
            serde_json::json!({ "status": "error", "message": message })
        }
        BroadcastOutcome::Unrecognized => serde_json::json!({ "status": "unrecognized" }),
        BroadcastOutcome::Failed { reason } => serde_json::json!({ "status": "failed", "reason": reason }),
    };
    value["label"] = serde_json::Value::from(label);
    value["elapsed_seconds"] = serde_json::Value::from(elapsed.as_secs_f64());
    value
}

/// Input rejected before any request was sent
fn invalid_json(label: &str) -> serde_json::Value {
    serde_json::json!({ "status": "invalid", "label": label })
}

/// Run the search stub
fn cmd_search(config: &AppConfig, query: String) -> txcast::Result<bool> {
    let mut form = FormState::new(config.stale_policy);
    form.update(Event::SearchEdited(query));
    form.update(Event::SearchSubmitted);
    print_label(&form);
    Ok(form.label != form::SEARCH_EMPTY_MESSAGE)
}

/// Print effective configuration
fn cmd_config(config: &AppConfig) -> txcast::Result<bool> {
    match AppConfig::default_path() {
        Some(path) => println!("# default config file: {}", path.display()),
        None => println!("# no standard config directory on this platform"),
    }
    println!(
        "# log file: {}",
        txcast::logging::log_path(&config.log_directory()).display()
    );
    print!("{}", config.to_toml()?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// Config whose endpoint has nothing listening
    fn refused_config() -> AppConfig {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        AppConfig {
            endpoint,
            timeout_secs: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn stdin_payload_loses_only_final_line_break() {
        assert_eq!(strip_final_line_break("0200\n".to_string()), "0200");
        assert_eq!(strip_final_line_break("0200\r\n".to_string()), "0200");
        assert_eq!(strip_final_line_break("0200".to_string()), "0200");
        assert_eq!(strip_final_line_break("0200\n\n".to_string()), "0200\n");
        assert_eq!(strip_final_line_break("0200\r".to_string()), "0200\r");
        assert_eq!(strip_final_line_break(String::new()), "");
    }

    #[test]
    fn outcome_json_carries_status_fields_and_label() {
        let value = outcome_json(
            &BroadcastOutcome::Accepted {
                txid: "abc123".to_string(),
            },
            "Transaction ID: abc123",
            Duration::from_millis(250),
        );
        assert_eq!(value["status"], "success");
        assert_eq!(value["txid"], "abc123");
        assert_eq!(value["label"], "Transaction ID: abc123");
        assert_eq!(value["elapsed_seconds"], 0.25);

        let value = outcome_json(
            &BroadcastOutcome::Rejected {
                message: "-26".to_string(),
            },
            "Error: -26",
            Duration::ZERO,
        );
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "-26");

        let value = outcome_json(&BroadcastOutcome::Unrecognized, "x", Duration::ZERO);
        assert_eq!(value["status"], "unrecognized");

        let value = outcome_json(
            &BroadcastOutcome::Failed {
                reason: "Request failed with status code 500".to_string(),
            },
            "Error: Request failed with status code 500",
            Duration::ZERO,
        );
        assert_eq!(value["status"], "failed");
        assert_eq!(value["reason"], "Request failed with status code 500");
    }

    #[test]
    fn invalid_json_reports_validation_label() {
        let value = invalid_json(form::PAYLOAD_EMPTY_MESSAGE);
        assert_eq!(value["status"], "invalid");
        assert_eq!(value["label"], "Please enter transaction data to broadcast");
    }

    #[test]
    fn search_fails_only_on_blank_query() {
        let config = AppConfig::default();
        assert!(cmd_search(&config, "block 840000".to_string()).unwrap());
        assert!(!cmd_search(&config, "   ".to_string()).unwrap());
    }

    #[test]
    fn broadcast_of_blank_payload_fails_without_request() {
        let config = refused_config();
        assert!(!cmd_broadcast(&config, " \n".to_string(), "text").unwrap());
        assert!(!cmd_broadcast(&config, String::new(), "json").unwrap());
    }

    #[test]
    fn unreachable_relay_is_not_accepted() {
        let config = refused_config();
        assert!(!cmd_broadcast(&config, "0200".to_string(), "text").unwrap());
        assert!(!cmd_broadcast(&config, "0200".to_string(), "json").unwrap());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "txcast",
            "broadcast",
            "--stdin",
            "--endpoint",
            "http://10.0.0.5:5000",
            "--stale-policy",
            "last-response",
        ])
        .unwrap();

        assert_eq!(cli.config.endpoint.as_deref(), Some("http://10.0.0.5:5000"));
        assert_eq!(cli.config.stale_policy, Some(txcast::StalePolicy::LastResponse));
        assert!(matches!(
            cli.command,
            Some(Commands::Broadcast {
                payload: None,
                stdin: true,
                ..
            })
        ));
    }

    #[test]
    fn broadcast_needs_payload_or_stdin() {
        assert!(Cli::try_parse_from(["txcast", "broadcast"]).is_err());
        assert!(Cli::try_parse_from(["txcast", "broadcast", "0200", "--stdin"]).is_err());
    }
}
