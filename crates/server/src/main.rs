use std::future::IntoFuture;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use rulr_rules::diagram::render_with_direction;
use rulr_rules::{BoolOp, Direction, Facts, combine, evaluate_rule, parse_rule};
use rulr_server::api::AppState;
use rulr_server::config::RulrConfig;

/// Rulr rule engine HTTP server.
#[derive(Parser, Debug)]
#[command(name = "rulr-server", about = "HTTP server and CLI for the Rulr rule engine")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "rulr.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a rule and print its Mermaid diagram.
    Check {
        /// The rule text.
        rule: String,
        /// Flowchart orientation (`TD`, `LR`, `BT`, `RL`).
        #[arg(long, default_value = "TD")]
        direction: Direction,
    },
    /// Evaluate a rule against facts given as a JSON object.
    Eval {
        /// The rule text.
        rule: String,
        /// Facts, e.g. `{"age": 35, "department": "Sales"}`.
        #[arg(long)]
        facts: String,
    },
    /// Combine two or more rules and print the result with its diagram.
    Combine {
        /// Operator used to join the rules (`AND` or `OR`).
        #[arg(long, default_value = "AND")]
        operator: BoolOp,
        /// The rule texts.
        #[arg(required = true, num_args = 2..)]
        rules: Vec<String>,
    },
    /// Run store migrations for the configured backend, then exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let migrate_only = matches!(cli.command, Some(Commands::Migrate));
    match cli.command {
        Some(Commands::Check { rule, direction }) => return run_check(&rule, direction),
        Some(Commands::Eval { rule, facts }) => return run_eval(&rule, &facts),
        Some(Commands::Combine { operator, rules }) => return run_combine(&rules, operator),
        Some(Commands::Migrate) | None => {}
    }

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config = RulrConfig::load(&cli.config)?;

    // Create the rule store; SQL backends run their migrations here.
    let store = rulr_server::store_factory::create_store(&config.store).await?;
    info!(backend = %config.store.backend, "rule store initialized");

    if migrate_only {
        info!("all migrations complete");
        return Ok(());
    }

    let app = rulr_server::api::router(AppState { store });

    let host = cli.host.as_deref().unwrap_or(&config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "rulr-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM. Once a signal arrives,
    // in-flight requests get `shutdown_timeout_seconds` to finish.
    let (signalled_tx, mut signalled_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(true);
    });

    let timeout_secs = config.server.shutdown_timeout_seconds;
    let drain_deadline = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_ok() {
            tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => result?,
        () = drain_deadline => {
            warn!(timeout_secs, "shutdown timeout exceeded, dropping in-flight requests");
        }
    }

    info!("rulr-server shut down");
    Ok(())
}

/// Run the `check` subcommand: parse the rule and print its diagram.
fn run_check(rule: &str, direction: Direction) -> Result<(), Box<dyn std::error::Error>> {
    let ast = parse_rule(rule)?;
    print!("{}", render_with_direction(&ast, direction));
    Ok(())
}

/// Run the `eval` subcommand: evaluate the rule and print `true` or `false`.
fn run_eval(rule: &str, facts: &str) -> Result<(), Box<dyn std::error::Error>> {
    let facts: Facts =
        serde_json::from_str(facts).map_err(|e| format!("invalid facts JSON: {e}"))?;
    let result = evaluate_rule(rule, &facts)?;
    println!("{result}");
    Ok(())
}

/// Run the `combine` subcommand: print the combined text, then its diagram.
fn run_combine(rules: &[String], operator: BoolOp) -> Result<(), Box<dyn std::error::Error>> {
    let combined = combine(rules, operator)?;
    println!("{}", combined.text);
    print!("{}", render_with_direction(&combined.ast, Direction::default()));
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
