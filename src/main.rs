//! `talent`: command-line client for the football talent marketplace.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use talent_client::api::TalentClient;
use talent_client::auth::{check_access, GuardDecision, Role};
use talent_client::config::validation::validate_config;
use talent_client::config::{load_or_default, AppConfig, ConfigError};
use talent_client::error::{ClientError, Result};
use talent_client::forms::{LoginForm, ProfileForm, SignupForm};
use talent_client::observability::logging;
use talent_client::session::Session;
use talent_client::upload::{ImageFile, UploadStatus};
use talent_client::views::{resolve, Page, ProfileView, Resolution, Toast};

#[derive(Parser)]
#[command(name = "talent")]
#[command(about = "Client for the football talent marketplace", long_about = None, version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend API base URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides config)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Fall back to local demo results when the backend is unreachable
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Render the page at a path, e.g. /dashboard/coach
    Open { path: String },
    /// Show your dashboard
    Dashboard,
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Upload images
    Upload {
        #[command(subcommand)]
        command: UploadCommand,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Fetch and show your profile
    Show,
    /// Update profile fields
    Edit {
        /// FIELD=VALUE, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },
}

#[derive(Subcommand)]
enum UploadCommand {
    /// Replace your profile picture
    Picture { file: PathBuf },
    /// Upload several images at once
    Bulk {
        /// Upload endpoint; defaults to {api_url}/upload
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn parse_role(raw: &str) -> std::result::Result<Role, String> {
    raw.parse::<Role>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    logging::init(&config.observability);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{}", Toast::from(&e));
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(path) = &cli.session {
        config.session.path = path.display().to_string();
    }
    if cli.demo {
        config.demo_mode = true;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    let session = Session::open_file(&config.session.path)?;
    let client = TalentClient::new(config, session.clone())?;

    match command {
        Commands::Signup {
            email,
            role,
            password,
            confirm_password,
        } => {
            let password = password_or_prompt(password, "Password")?;
            let confirm_password = password_or_prompt(confirm_password, "Confirm password")?;
            let form = SignupForm {
                email,
                password,
                confirm_password,
                role,
            };
            notify(&Toast::info("Creating Account", "Please wait..."));
            let outcome = client.register(&form).await?;
            if outcome.demo {
                notify(&Toast::info("Demo Mode", outcome.message));
            } else {
                notify(&Toast::success(outcome.message));
            }
            println!("Next: talent login --email {} --role <role>", form.email.trim());
        }
        Commands::Login {
            email,
            role,
            password,
        } => {
            let password = password_or_prompt(password, "Password")?;
            let form = LoginForm {
                email,
                password,
                role,
            };
            notify(&Toast::info("Signing In", "Connecting, please wait..."));
            let user = client.login(&form).await?;
            notify(&Toast::success("Logged in successfully!"));
            print_page(&format!("/dashboard/{}", user.role), &session);
        }
        Commands::Logout => {
            client.logout()?;
            notify(&Toast::success("Logged out"));
        }
        Commands::Whoami => {
            let user = session.user().ok_or(ClientError::NotAuthenticated)?;
            let name = [user.first_name.as_str(), user.last_name.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            let name = if name.is_empty() { user.display_name() } else { name };
            println!("{} <{}> ({})", name, user.email, user.role);
        }
        Commands::Open { path } => print_page(&path, &session),
        Commands::Dashboard => {
            let role = session.role().ok_or(ClientError::NotAuthenticated)?;
            print_page(&format!("/dashboard/{role}"), &session);
        }
        Commands::Profile { command } => {
            let role = require_role(&session)?;
            match command {
                ProfileCommand::Show => {
                    let loaded = client.load_profile().await?;
                    if loaded.is_cached() {
                        notify(&Toast::info("Offline", "Showing cached data"));
                    }
                    let view = ProfileView::from_user(&loaded.user).with_source(&loaded.source);
                    print!("{}", view.render());
                }
                ProfileCommand::Edit { set } => {
                    let user = session.user().ok_or(ClientError::NotAuthenticated)?;
                    let mut form = ProfileForm::for_user(&user);
                    form.apply_assignments(set.iter().map(String::as_str))?;
                    let updated = client.update_profile(&form).await?;
                    notify(&Toast::success(format!(
                        "{} profile updated successfully!",
                        role.title()
                    )));
                    print!("{}", ProfileView::from_user(&updated).render());
                }
            }
        }
        Commands::Upload { command } => {
            require_role(&session)?;
            match command {
                UploadCommand::Picture { file } => {
                    let image = ImageFile::read(&file).await?;
                    let outcome = client
                        .upload_profile_picture(&image, |p| tracing::debug!(progress = p, "Upload progress"))
                        .await?;
                    if outcome.demo {
                        notify(&Toast::info(
                            "Success",
                            "Profile picture uploaded successfully! (Demo mode)",
                        ));
                    } else {
                        notify(&Toast::success("Profile picture uploaded successfully!"));
                        println!("{}", outcome.url);
                    }
                }
                UploadCommand::Bulk { endpoint, files } => {
                    let endpoint = endpoint.unwrap_or_else(|| format!("{}/upload", client.base_url()));
                    let mut images = Vec::with_capacity(files.len());
                    for path in &files {
                        images.push(ImageFile::read(path).await?);
                    }

                    let mut bulk = client.bulk_upload(endpoint);
                    for rejection in bulk.select(images)? {
                        notify(&Toast::from(&ClientError::from(rejection)));
                    }

                    let summary = bulk
                        .upload_all_with(|item| {
                            if item.status != UploadStatus::Uploading {
                                let _ = writeln!(
                                    io::stderr(),
                                    "  {:<30} {:>3}% {}",
                                    item.file.name,
                                    item.progress,
                                    item.error.as_deref().unwrap_or(item.status.as_str())
                                );
                            }
                        })
                        .await;

                    notify(&Toast::info("Upload Complete", summary.message()));
                    for url in &summary.urls {
                        println!("{url}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Role of the signed-in user, through the same guard the pages use.
fn require_role(session: &Session) -> Result<Role> {
    match check_access(session, None) {
        GuardDecision::Allow => session.role().ok_or(ClientError::NotAuthenticated),
        GuardDecision::Redirect(_) => Err(ClientError::NotAuthenticated),
    }
}

fn print_page(path: &str, session: &Session) {
    let mut path = path.to_string();
    // redirects chain at most through login or the user's own dashboard
    for _ in 0..3 {
        match resolve(&path, session) {
            Resolution::Render(page) => {
                print!("{}", page.render());
                if matches!(page, Page::InvalidRole) {
                    println!();
                }
                return;
            }
            Resolution::Redirect(to) => {
                tracing::debug!(from = %path, to = %to, "Redirect");
                path = to.path();
            }
        }
    }
}

fn notify(toast: &Toast) {
    eprintln!("{toast}");
}

fn password_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
