//! Policy Dashboard CLI
//!
//! Terminal host for the dashboard:
//! - Load and render files, analytics and charts
//! - Upload documents
//! - Enrich policies with web results
//! - Register, log in and comment on files

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use policy_dashboard::render::text::{
    analytics_text, bar_chart_text, comments_text, files_table, pie_chart_text,
};
use policy_dashboard::{
    cluster_bar_chart, file_type_pie_chart, logging, AuthOutcome, ClientError, CommentOutcome,
    Config, Dashboard, HttpClient, PendingUpload, RefreshReport, StorageLinks,
};

const CHART_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "policy-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the Data-Driven Policy analytics API")]
#[command(long_about = "Upload policy documents, browse extracted policies, anomalies and clusters,\nand discuss files with your team.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    /// Serialized view state after the operation
    Json,
}

#[derive(Args)]
pub struct Login {
    #[arg(short, long, env = "POLICY_DASHBOARD_USERNAME")]
    pub username: Option<String>,

    #[arg(short, long, env = "POLICY_DASHBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Login {
    fn require(&self) -> anyhow::Result<(&str, &str)> {
        let Some(username) = self.username.as_deref() else {
            bail!("Username required: pass --username or set POLICY_DASHBOARD_USERNAME");
        };
        let Some(password) = self.password.as_deref() else {
            bail!("Password required: pass --password or set POLICY_DASHBOARD_PASSWORD");
        };
        Ok((username, password))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load everything and render the full dashboard
    Dashboard,

    /// Check backend health
    Health,

    /// Upload a document, then show the refreshed file list
    Upload {
        /// Path to a PDF, DOCX, XLSX, CSV or image file
        path: PathBuf,
    },

    /// List uploaded files with their policies
    Files,

    /// Show totals, anomalies and policy clusters
    Analytics,

    /// Look up web results for a policy
    Enrich {
        /// Policy text, matched literally
        policy: String,
    },

    /// Create an account
    Register {
        #[command(flatten)]
        login: Login,
    },

    /// Log in and show the current user
    Whoami {
        #[command(flatten)]
        login: Login,
    },

    /// Show the comment thread for a file
    Comments {
        file_id: i64,
    },

    /// Log in and add a comment to a file
    Comment {
        file_id: i64,
        content: String,
        /// Policy the comment refers to
        #[arg(long)]
        policy: Option<String>,
        #[command(flatten)]
        login: Login,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = policy_dashboard::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    logging::init(&config.logging);

    let api = HttpClient::from_config(&config.api).context("Failed to build HTTP client")?;
    let links = config.links.storage_links();
    let mut dashboard = Dashboard::new(api);

    let succeeded = match run(&cli, &mut dashboard, &links).await {
        Ok(succeeded) => succeeded,
        Err(e) => {
            report_notifications(&mut dashboard);
            if let Some(ClientError::Unavailable) = e.downcast_ref::<ClientError>() {
                eprintln!("Cannot connect to the policy API at {}", config.api.base_url);
                eprintln!();
                eprintln!("Make sure the backend is running or pass --api-url.");
            } else {
                eprintln!("Error: {:#}", e);
            }
            std::process::exit(1);
        }
    };

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(dashboard.state())?);
    }

    let failed_notifications = report_notifications(&mut dashboard);

    if !succeeded || failed_notifications > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Run one command. `Ok(false)` means the server rejected the operation.
async fn run(
    cli: &Cli,
    dashboard: &mut Dashboard<HttpClient>,
    links: &StorageLinks,
) -> anyhow::Result<bool> {
    let table = cli.format == OutputFormat::Table;

    match &cli.command {
        Commands::Dashboard => {
            if let Err(e) = dashboard.check_health().await {
                tracing::warn!(error = %e, "Health check failed");
            }
            let report = dashboard.mount().await;
            report_refresh_failures(&report);

            if table {
                let state = dashboard.state();
                println!("Policy Dashboard v{}", env!("CARGO_PKG_VERSION"));
                println!("API Status: {}", status_or_unknown(&state.health));
                println!();
                println!("Files");
                print!("{}", files_table(state, links));
                println!();
                print_analytics(dashboard);
            }
            Ok(report.is_complete())
        }

        Commands::Health => {
            dashboard.check_health().await?;
            if table {
                println!("API Status: {}", dashboard.state().health);
            }
            Ok(true)
        }

        Commands::Upload { path } => {
            dashboard.select_file(read_upload(path)?);

            let report = dashboard.upload().await?;
            if let Some(report) = &report {
                report_refresh_failures(report);
            }

            if table {
                let state = dashboard.state();
                println!("Upload result: {}", state.upload_result);
                println!();
                print!("{}", files_table(state, links));
            }
            Ok(report.map(|r| r.is_complete()).unwrap_or(false))
        }

        Commands::Files => {
            let report = dashboard.mount().await;
            report_refresh_failures(&report);
            if table {
                print!("{}", files_table(dashboard.state(), links));
            }
            Ok(report.is_complete())
        }

        Commands::Analytics => {
            let report = dashboard.mount().await;
            report_refresh_failures(&report);
            if table {
                print_analytics(dashboard);
            }
            Ok(report.is_complete())
        }

        Commands::Enrich { policy } => {
            dashboard.enrich_policy(policy).await?;
            if table {
                let results = dashboard.state().enrichment_for(policy).unwrap_or(&[]);
                if results.is_empty() {
                    println!("No results for \"{}\"", policy);
                }
                for r in results {
                    println!("{}", r.name);
                    println!("  {}", r.url);
                    if !r.snippet.is_empty() {
                        println!("  {}", r.snippet);
                    }
                }
            }
            Ok(true)
        }

        Commands::Register { login } => {
            let (username, password) = login.require()?;
            let outcome = dashboard.register(username, password).await?;
            Ok(outcome == AuthOutcome::Registered)
        }

        Commands::Whoami { login } => {
            if !log_in(dashboard, login).await? {
                return Ok(false);
            }
            if table {
                match dashboard.state().user() {
                    Some(user) => {
                        println!("Username: {}", user.username);
                        println!("Role: {}", user.role.as_deref().unwrap_or("-"));
                    }
                    None => println!("Logged in, profile unavailable"),
                }
            }
            Ok(true)
        }

        Commands::Comments { file_id } => {
            dashboard.fetch_comments(*file_id).await?;
            if table {
                print!("{}", comments_text(dashboard.state().comments_for(*file_id)));
            }
            Ok(true)
        }

        Commands::Comment {
            file_id,
            content,
            policy,
            login,
        } => {
            if !log_in(dashboard, login).await? {
                return Ok(false);
            }

            dashboard.set_comment_draft(*file_id, content.as_str());
            dashboard.tag_comment_policy(*file_id, policy.clone());

            match dashboard.add_comment(*file_id).await? {
                CommentOutcome::Posted => {
                    if table {
                        print!("{}", comments_text(dashboard.state().comments_for(*file_id)));
                    }
                    Ok(true)
                }
                CommentOutcome::EmptyDraft => {
                    eprintln!("Comment is empty, nothing sent");
                    Ok(false)
                }
                CommentOutcome::LoginRequired | CommentOutcome::Rejected(_) => Ok(false),
            }
        }

        Commands::Config { .. } => Ok(true),
    }
}

async fn log_in(dashboard: &mut Dashboard<HttpClient>, login: &Login) -> anyhow::Result<bool> {
    let (username, password) = login.require()?;
    let outcome = dashboard.login(username, password).await?;
    Ok(outcome == AuthOutcome::LoggedIn)
}

fn print_analytics(dashboard: &Dashboard<HttpClient>) {
    let state = dashboard.state();

    println!("Analytics");
    print!("{}", analytics_text(state));
    println!();

    if let Some(summary) = &state.summary {
        print!("{}", pie_chart_text(&file_type_pie_chart(summary), CHART_WIDTH));
        println!();
    }
    print!(
        "{}",
        bar_chart_text(&cluster_bar_chart(&state.policy_clusters), CHART_WIDTH)
    );
}

/// Load the file named on the command line for upload
fn read_upload(path: &Path) -> anyhow::Result<PendingUpload> {
    PendingUpload::from_path(path).with_context(|| format!("Failed to read {:?}", path))
}

fn report_refresh_failures(report: &RefreshReport) {
    for (resource, error) in report.failures() {
        eprintln!("Could not load {}: {}", resource, error);
    }
}

/// Print queued notifications to stderr, returning how many were errors
fn report_notifications(dashboard: &mut Dashboard<HttpClient>) -> usize {
    let notifications = dashboard.take_notifications();
    for n in &notifications {
        eprintln!("{}", n);
    }
    notifications.iter().filter(|n| n.is_error()).count()
}

fn status_or_unknown(status: &str) -> &str {
    if status.is_empty() {
        "unknown"
    } else {
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_upload_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");

        let err = read_upload(&missing).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to read"));
    }

    #[test]
    fn test_read_upload_reads_contents() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"id,policy\n1,retention\n").unwrap();

        let upload = read_upload(file.path()).unwrap();
        assert_eq!(upload.size, 22);
        assert_eq!(upload.content_type.as_deref(), Some("text/csv"));
    }
}
