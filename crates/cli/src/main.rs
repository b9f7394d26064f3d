//! Pharmacy admin CLI - the admin dashboard from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from PA_ADMIN_PASSWORD or stdin)
//! pa-cli auth login -e admin@example.com
//!
//! # Browse and manage resources
//! pa-cli pharmacies list --status active
//! pa-cli medicines search panadol
//! pa-cli users ban 65f1c0ffee
//!
//! # Statistics and exports
//! pa-cli dashboard
//! pa-cli export owners --dir ./exports
//! ```
//!
//! # Commands
//!
//! - `auth` - Login, registration, logout and the current admin
//! - `pharmacies` - Pharmacy CRUD, search and photo upload
//! - `medicines` - Medicine CRUD with package photos
//! - `users` - App users, bans and statistics
//! - `dashboard` - Counters and chart breakdowns
//! - `export` - Download spreadsheet exports
//!
//! Every command except `auth` needs a stored session.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pharmacy_admin_core::UserStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "pa-cli")]
#[command(author, version, about = "Pharmacy-locator admin dashboard CLI")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, register
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage pharmacies
    Pharmacies {
        #[command(subcommand)]
        action: PharmacyAction,
    },
    /// Manage the medicine catalogue
    Medicines {
        #[command(subcommand)]
        action: MedicineAction,
    },
    /// Manage app users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Show dashboard statistics
    Dashboard,
    /// Download a spreadsheet export
    Export {
        /// What to export: pharmacies, medicines or owners
        kind: String,

        /// Directory to save the file into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when not set)
        #[arg(long, env = "PA_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Register a new admin account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when not set)
        #[arg(long, env = "PA_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Confirmation (read from stdin when not set)
        #[arg(long, env = "PA_ADMIN_PASSWORD_CONFIRM", hide_env_values = true)]
        confirm_password: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the signed-in admin
    Whoami,
}

/// Location flags shared by pharmacy and user commands.
#[derive(Args, Debug, Default)]
pub struct LocationArgs {
    /// Latitude in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,
}

/// Working-hours flags for pharmacy commands.
#[derive(Args, Debug, Default)]
pub struct HoursArgs {
    /// Opening hours for one day, e.g. `mon=09:00-18:00` (repeatable)
    #[arg(long = "hours", value_name = "DAY=HH:MM-HH:MM")]
    pub hours: Vec<String>,

    /// Mark a day as closed, e.g. `sun` (repeatable)
    #[arg(long = "closed", value_name = "DAY")]
    pub closed: Vec<String>,
}

#[derive(Subcommand)]
enum PharmacyAction {
    /// List pharmacies
    List {
        /// Only `active` or `inactive` pharmacies
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one pharmacy with its opening hours
    Show { id: String },
    /// Search pharmacies by text
    Search { query: String },
    /// Create a pharmacy and its owner account
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Photo to upload
        #[arg(long)]
        image: Option<PathBuf>,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        hours: HoursArgs,

        #[arg(long)]
        owner_name: String,

        #[arg(long)]
        owner_email: String,

        /// Owner password (read from stdin when not set)
        #[arg(long, env = "PA_OWNER_PASSWORD", hide_env_values = true)]
        owner_password: Option<String>,

        #[arg(short, long, default_value = "active")]
        status: String,
    },
    /// Update fields of a pharmacy
    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// New photo to upload
        #[arg(long)]
        image: Option<PathBuf>,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        hours: HoursArgs,

        #[arg(short, long)]
        status: Option<String>,
    },
    /// Delete a pharmacy
    Delete { id: String },
    /// Upload a photo and print its URL
    UploadImage { path: PathBuf },
}

#[derive(Subcommand)]
enum MedicineAction {
    /// List medicines
    List {
        /// Only `available` or `unavailable` medicines
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one medicine
    Show { id: String },
    /// Search medicines by text
    Search { query: String },
    /// Create a medicine with front and back photos
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(long)]
        front: PathBuf,

        #[arg(long)]
        back: PathBuf,
    },
    /// Update fields or photos of a medicine
    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(long)]
        front: Option<PathBuf>,

        #[arg(long)]
        back: Option<PathBuf>,
    },
    /// Delete a medicine
    Delete { id: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List {
        /// Only `active` or `banned` users
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one user
    Show { id: String },
    /// Search users by text
    Search { query: String },
    /// Create a user (testing accounts)
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[command(flatten)]
        location: LocationArgs,
    },
    /// Ban a user
    Ban { id: String },
    /// Lift a ban
    Unban { id: String },
    /// Delete a user
    Delete { id: String },
    /// Show user totals
    Stats,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pharmacy_admin=info,pa_cli=info".into());

    let json = std::env::var("PA_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let out = output::Output::new(cli.json);
    let app = commands::connect()?;

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&app, &out, &email, password).await?;
            }
            AuthAction::Register {
                name,
                email,
                password,
                confirm_password,
            } => {
                commands::auth::register(&app, &out, name, email, password, confirm_password)
                    .await?;
            }
            AuthAction::Logout => commands::auth::logout(&app).await,
            AuthAction::Whoami => commands::auth::whoami(&app, &out)?,
        },
        Commands::Pharmacies { action } => {
            commands::require_session(&app, pharmacy_admin::Screen::Pharmacies)?;
            match action {
                PharmacyAction::List { status } => {
                    commands::pharmacies::list(&app, &out, status.as_deref()).await?;
                }
                PharmacyAction::Show { id } => commands::pharmacies::show(&app, &out, &id).await?,
                PharmacyAction::Search { query } => {
                    commands::pharmacies::search(&app, &out, &query).await?;
                }
                PharmacyAction::Create {
                    title,
                    description,
                    image,
                    location,
                    hours,
                    owner_name,
                    owner_email,
                    owner_password,
                    status,
                } => {
                    let input = commands::pharmacies::CreateInput {
                        title,
                        description,
                        image,
                        location,
                        hours,
                        owner_name,
                        owner_email,
                        owner_password,
                        status,
                    };
                    commands::pharmacies::create(&app, &out, input).await?;
                }
                PharmacyAction::Update {
                    id,
                    title,
                    description,
                    image,
                    location,
                    hours,
                    status,
                } => {
                    let input = commands::pharmacies::UpdateInput {
                        title,
                        description,
                        image,
                        location,
                        hours,
                        status,
                    };
                    commands::pharmacies::update(&app, &out, &id, input).await?;
                }
                PharmacyAction::Delete { id } => commands::pharmacies::delete(&app, &id).await?,
                PharmacyAction::UploadImage { path } => {
                    commands::pharmacies::upload_image(&app, &out, &path).await?;
                }
            }
        }
        Commands::Medicines { action } => {
            commands::require_session(&app, pharmacy_admin::Screen::Medicines)?;
            match action {
                MedicineAction::List { status } => {
                    commands::medicines::list(&app, &out, status.as_deref()).await?;
                }
                MedicineAction::Show { id } => commands::medicines::show(&app, &out, &id).await?,
                MedicineAction::Search { query } => {
                    commands::medicines::search(&app, &out, &query).await?;
                }
                MedicineAction::Create {
                    title,
                    description,
                    status,
                    front,
                    back,
                } => {
                    commands::medicines::create(
                        &app,
                        &out,
                        commands::medicines::CreateInput {
                            title,
                            description,
                            status,
                            front,
                            back,
                        },
                    )
                    .await?;
                }
                MedicineAction::Update {
                    id,
                    title,
                    description,
                    status,
                    front,
                    back,
                } => {
                    commands::medicines::update(
                        &app,
                        &out,
                        &id,
                        commands::medicines::UpdateInput {
                            title,
                            description,
                            status,
                            front,
                            back,
                        },
                    )
                    .await?;
                }
                MedicineAction::Delete { id } => commands::medicines::delete(&app, &id).await?,
            }
        }
        Commands::Users { action } => {
            commands::require_session(&app, pharmacy_admin::Screen::Users)?;
            match action {
                UserAction::List { status } => {
                    commands::users::list(&app, &out, status.as_deref()).await?;
                }
                UserAction::Show { id } => commands::users::show(&app, &out, &id).await?,
                UserAction::Search { query } => {
                    commands::users::search(&app, &out, &query).await?;
                }
                UserAction::Create {
                    name,
                    email,
                    location,
                } => commands::users::create(&app, &out, name, &email, &location).await?,
                UserAction::Ban { id } => {
                    commands::users::set_status(&app, &out, &id, UserStatus::Banned).await?;
                }
                UserAction::Unban { id } => {
                    commands::users::set_status(&app, &out, &id, UserStatus::Active).await?;
                }
                UserAction::Delete { id } => commands::users::delete(&app, &id).await?,
                UserAction::Stats => commands::users::stats(&app, &out).await?,
            }
        }
        Commands::Dashboard => {
            commands::require_session(&app, pharmacy_admin::Screen::Dashboard)?;
            commands::dashboard::show(&app, &out).await?;
        }
        Commands::Export { kind, dir } => {
            commands::require_session(&app, pharmacy_admin::Screen::Data)?;
            commands::export::run(&app, &out, &kind, &dir).await?;
        }
    }
    Ok(())
}
