//! Command-line front end over the portal client.

use std::path::PathBuf;

use academia_auth::{Capability, Role};
use academia_client::{AcademiaClient, ClientConfig, ClientError, NavigationOutcome, Navigator};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "academia")]
#[command(about = "Academic portal client: session, navigation and dashboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Email address or username
        login: String,
        password: String,
    },
    /// Forget the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Check whether a route may be shown
    Navigate { path: String },
    /// Summary for the logged-in role
    Dashboard,
    /// Download your grades report as PDF
    Report {
        /// Where to write the PDF (defaults to the suggested file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    academia_observability::init_with(config.log_format);

    if let Err(e) = run(&config, cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(if e.is_retryable() { 75 } else { 1 });
    }
}

async fn run(config: &ClientConfig, command: Commands) -> Result<(), ClientError> {
    let client = AcademiaClient::from_config(config)?;
    let session = client.session();

    match command {
        Commands::Login { login, password } => {
            let role = session.login(&login, &password).await?;
            println!("logged in as {role}; home is {}", Navigator::home_for(role));
        }
        Commands::Logout => {
            session.logout().await;
            println!("logged out");
        }
        Commands::Whoami => match session.current_identity() {
            Some(identity) => println!("{} ({})", identity.display_name(), identity.role()),
            None => println!("not logged in"),
        },
        Commands::Navigate { path } => match client.navigator().navigate(&path) {
            NavigationOutcome::Render(path) => println!("render {path}"),
            NavigationOutcome::Redirect { to, reason } => println!("redirect {to} ({reason:?})"),
        },
        Commands::Dashboard => {
            let Some(identity) = session.current_identity() else {
                println!("not logged in");
                return Ok(());
            };
            let today = chrono::Local::now().date_naive();
            match identity.role() {
                Role::Student => {
                    let summary = client.dashboard().student_dashboard(&identity, today).await?;
                    println!(
                        "GPA {:.2}/20 ({} of {} passing), {} enrollments, {} upcoming sessions",
                        summary.gpa,
                        summary.passing_count,
                        summary.grades.len(),
                        summary.enrollments.len(),
                        summary.upcoming.len()
                    );
                }
                Role::Trainer => {
                    let summary = client.dashboard().trainer_dashboard(&identity, today).await?;
                    for course in &summary.courses {
                        println!("{} {}", course.code, course.title);
                    }
                    println!("{} upcoming sessions", summary.upcoming.len());
                }
                Role::Admin => {
                    let courses = client.courses().list_all().await?;
                    println!("{} courses in catalogue", courses.len());
                }
            }
        }
        Commands::Report { output } => {
            let identity = match session.current_identity() {
                Some(identity) if session.can(Capability::DownloadOwnReport) => identity,
                _ => {
                    println!("no report available for this session");
                    return Ok(());
                }
            };
            let Some(student) = identity.student_ref() else {
                println!("account is not linked to a student record");
                return Ok(());
            };
            let doc = client.reports().student_report_pdf(student, identity.display_name()).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&doc.filename));
            if let Err(e) = std::fs::write(&path, &doc.bytes) {
                eprintln!("failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
            println!("saved {} ({} bytes)", path.display(), doc.bytes.len());
        }
    }
    Ok(())
}
