//! debtdesk - command-line front end for the debt-tracking admin dashboard.
//!
//! Logs in against the dashboard API, keeps the session between runs and
//! prints the dashboard summary.

mod format;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use debtdesk_core::api::{ApiClient, Navigator, Route};
use debtdesk_core::auth::{CredentialStore, SessionController, StorageBackend};
use debtdesk_core::config::Config;
use debtdesk_core::models::{Credentials, DashboardSummary, UserProfile};

use format::{fit, format_amount, format_percent};

/// Log file name prefix inside `log_dir`
const LOG_FILE_PREFIX: &str = "debtdesk.log";

/// Column width for debtor names in the recent payments table
const DEBTOR_COLUMN_WIDTH: usize = 20;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Parser, Debug)]
#[command(name = "debtdesk", version, about = "Debt tracking dashboard client")]
struct Cli {
    /// API origin, overrides DEBTDESK_API_URL and the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session storage backend: memory, file or keyring
    #[arg(long, global = true, value_parser = parse_storage)]
    storage: Option<StorageBackend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// End the session locally and notify the server
    Logout,
    /// Show the stored user profile
    Whoami,
    /// Show session state
    Status,
    /// Fetch the dashboard summary
    Summary {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
        /// Show the built-in development dataset without calling the API
        #[arg(long)]
        placeholder: bool,
    },
    /// Write the effective configuration (file, environment and flags) to the config file
    SaveConfig,
}

fn parse_storage(s: &str) -> Result<StorageBackend, String> {
    StorageBackend::parse(s).ok_or_else(|| format!("unknown storage backend '{}'", s))
}

/// Initialize the tracing subscriber for logging.
/// Returns the file writer guard, which must live until exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Terminal stand-in for the dashboard's redirect to the login page
fn cli_navigator() -> Arc<dyn Navigator> {
    Arc::new(|route: Route| {
        if route == Route::Login {
            eprintln!("Session ended. Run `debtdesk login` to sign in again.");
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = Some(url);
    }
    if let Some(storage) = cli.storage {
        config.storage = storage;
    }

    let _log_guard = init_tracing(config.log_dir.as_deref());
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    // Commands that need no API session
    match cli.command {
        Command::SaveConfig => save_config(&config),
        Command::Summary {
            json,
            placeholder: true,
        } => print_summary(&DashboardSummary::placeholder(), json),
        command => run(command, &config).await,
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let session = build_session(config)?;

    match command {
        Command::Login { email, password } => login(&session, email, password).await,
        Command::Logout => {
            session.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match session.current_user() {
                Some(user) => {
                    println!("{}", user.display());
                    println!("  id:      {}", user.id);
                    println!("  role:    {}", role_label(&user));
                    if let Some(company_id) = user.company_id {
                        println!("  company: {}", company_id);
                    }
                }
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Command::Status => {
            println!("API:           {}", session.api().base_url());
            println!("Storage:       {:?}", config.storage);
            println!("State:         {:?}", session.state());
            println!("Landing route: {}", session.landing_route().path());
            println!(
                "Refresh token: {}",
                if session.store().refresh_token().is_some() {
                    "stored (unused)"
                } else {
                    "none"
                }
            );
            Ok(())
        }
        Command::Summary { json, .. } => {
            let summary = session.api().dashboard_summary().await?;
            print_summary(&summary, json)
        }
        Command::SaveConfig => save_config(config),
    }
}

fn role_label(user: &UserProfile) -> String {
    if user.is_admin() {
        format!("{} (full access)", user.role)
    } else {
        user.role.clone()
    }
}

fn save_config(config: &Config) -> Result<()> {
    config.save()?;
    println!("Saved configuration to {}", Config::config_path()?.display());
    Ok(())
}

fn build_session(config: &Config) -> Result<SessionController> {
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let store = Arc::new(CredentialStore::new(config.storage.build(&cache_dir)));
    let api = ApiClient::from_config(config, store, cli_navigator())?;
    info!(base_url = api.base_url(), storage = ?config.storage, "Session initialised");
    Ok(SessionController::new(api))
}

async fn login(
    session: &SessionController,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let response = session.login(&Credentials::new(email, password)).await?;
    match response.user {
        Some(user) => println!("Logged in as {}.", user.display()),
        None => println!("Logged in."),
    }
    Ok(())
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn print_summary(summary: &DashboardSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Outstanding debt:  {}", format_amount(summary.total_outstanding_debt));
    println!(
        "Overdue debt:      {} ({} of outstanding)",
        format_amount(summary.total_overdue_debt),
        format_percent(summary.overdue_share())
    );
    println!("Debtors:           {}", summary.debtor_count);
    println!("Active debts:      {}", summary.active_debt_count);

    let breakdown = &summary.status_breakdown;
    println!();
    println!(
        "Status: paid {}  overdue {}  pending {}  partial {}  (recovery {})",
        breakdown.paid,
        breakdown.overdue,
        breakdown.pending,
        breakdown.partial,
        format_percent(summary.recovery_rate())
    );

    if !summary.recent_payments.is_empty() {
        println!();
        println!("Recent payments:");
        for payment in &summary.recent_payments {
            println!(
                "  {}  {}  {:>14}  {}",
                payment.date.format("%b %d, %Y"),
                fit(&payment.debtor, DEBTOR_COLUMN_WIDTH),
                format_amount(payment.amount),
                payment.status.label()
            );
        }
    }

    println!();
    println!("Monthly      payments          debts");
    let monthly = &summary.monthly_data;
    for (i, label) in MONTH_LABELS.iter().enumerate() {
        println!(
            "  {}  {:>14}  {:>14}",
            label,
            format_amount(monthly.payments[i]),
            format_amount(monthly.debts[i])
        );
    }
    println!(
        "  Sum  {:>13}  {:>14}",
        format_amount(monthly.total_payments()),
        format_amount(monthly.total_debts())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_login() {
        let cli = Cli::try_parse_from([
            "debtdesk",
            "--api-url",
            "http://localhost:8000",
            "login",
            "--email",
            "a@b.com",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
        match cli.command {
            Command::Login { email, password } => {
                assert_eq!(email.as_deref(), Some("a@b.com"));
                assert_eq!(password, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_storage_flag() {
        let cli = Cli::try_parse_from(["debtdesk", "status", "--storage", "keyring"]).unwrap();
        assert_eq!(cli.storage, Some(StorageBackend::Keyring));

        assert!(Cli::try_parse_from(["debtdesk", "status", "--storage", "cookies"]).is_err());
    }

    #[test]
    fn test_cli_summary_flags() {
        let cli = Cli::try_parse_from(["debtdesk", "summary", "--placeholder", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Summary {
                json: true,
                placeholder: true
            }
        ));
    }

    #[test]
    fn test_cli_save_config() {
        let cli =
            Cli::try_parse_from(["debtdesk", "save-config", "--api-url", "http://x"]).unwrap();
        assert!(matches!(cli.command, Command::SaveConfig));
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_role_label_marks_admins() {
        let mut user = UserProfile {
            id: 1,
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: "Admin".to_string(),
            company_id: None,
        };
        assert_eq!(role_label(&user), "Admin (full access)");

        user.role = "agent".to_string();
        assert_eq!(role_label(&user), "agent");
    }

    #[test]
    fn test_print_placeholder_summary() {
        print_summary(&DashboardSummary::placeholder(), false).unwrap();
        print_summary(&DashboardSummary::placeholder(), true).unwrap();
    }
}
