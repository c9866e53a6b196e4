//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use corrente_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "corrente")]
#[command(version)]
#[command(about = "Corrente solidarity contribution client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Local search, tab and page selection for list screens.
#[derive(clap::Args, Debug, Clone, Default)]
struct ListArgs {
    /// Case-insensitive text filter
    #[arg(long, short)]
    search: Option<String>,

    /// Show only one tab (e.g. a status)
    #[arg(long)]
    tab: Option<String>,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page (default from config)
    #[arg(long)]
    page_size: Option<usize>,
}

impl From<&ListArgs> for commands::output::ListOptions {
    fn from(args: &ListArgs) -> Self {
        commands::output::ListOptions {
            search: args.search.clone(),
            tab: args.tab.clone(),
            page: args.page,
            page_size: args.page_size,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "CORRENTE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and remove the stored session
    Logout,

    /// Create an account with the interactive registration wizard
    Register,

    /// Show the signed-in user (revalidates the stored session)
    Profile,

    /// Confirm a verification code
    Verify {
        #[command(subcommand)]
        channel: VerifyCommands,
    },

    /// Request a new verification code
    Resend {
        #[command(subcommand)]
        channel: ResendCommands,
    },

    /// Your donations, payment proofs and level progress
    Donations {
        #[command(subcommand)]
        command: DonationCommands,
    },

    /// Administration (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

#[derive(clap::Subcommand)]
enum VerifyCommands {
    /// Confirm the code sent by email
    Email {
        #[arg(value_name = "CODE")]
        code: String,
    },
    /// Confirm the code sent by SMS
    Phone {
        #[arg(value_name = "CODE")]
        code: String,
    },
}

#[derive(clap::Subcommand)]
enum ResendCommands {
    Email,
    Phone,
}

#[derive(clap::Subcommand)]
enum DonationCommands {
    /// Donations you are due to receive
    Inbox {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Donations you are due to send
    Outbox {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Per-level progress and upgrade offers
    Progress,
    /// Accept an upgrade offered on the progress screen
    AcceptUpgrade {
        #[arg(long = "from")]
        from_level: u32,
        #[arg(long = "to")]
        to_level: u32,
    },
    /// Confirm that a payment arrived
    Confirm {
        #[arg(value_name = "DONATION_ID")]
        id: String,
    },
    /// Upload a payment proof image for a donation you sent
    UploadProof {
        #[arg(value_name = "DONATION_ID")]
        id: String,
        /// Image file (png, jpeg, gif, webp)
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Show the payment proof attached to a donation
    Proof {
        #[arg(value_name = "DONATION_ID")]
        id: String,
    },
    /// Review a received payment proof, then confirm or report it
    Review {
        #[arg(value_name = "DONATION_ID")]
        id: String,
    },
    /// Report a problem with a donation
    Report {
        #[arg(value_name = "DONATION_ID")]
        id: String,
        #[arg(long)]
        reason: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Reports you have filed (tabs pending/resolved)
    Reports {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// List users (search over name, email, CPF, phone; tabs by status)
    Users {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one user's details
    User {
        #[arg(value_name = "USER_ID")]
        id: String,
    },
    /// Activate, deactivate or block a user
    SetUserStatus {
        #[arg(value_name = "USER_ID")]
        id: String,
        /// active | inactive | blocked
        #[arg(value_name = "STATUS")]
        status: String,
    },
    /// List all donations (search over donor, receiver, kind; tabs by status)
    Donations {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Server-side donation search; filters are passed through as given
    SearchDonations {
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List reports (search over reason, description, reporter; tabs pending/resolved)
    Reports {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Resolve a report
    ResolveReport {
        #[arg(value_name = "REPORT_ID")]
        id: String,
        #[arg(long)]
        resolution: String,
    },
    /// Show the donation queue (search over user name/email)
    Queue {
        /// Only this level
        #[arg(long)]
        level: Option<u32>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Add a user to the queue
    QueueAdd {
        #[arg(long = "user")]
        user_id: String,
        #[arg(long)]
        level: u32,
        #[arg(long, default_value_t = 1)]
        donation_number: u32,
    },
    /// Move or edit a queue entry
    QueueUpdate {
        #[arg(value_name = "ENTRY_ID")]
        id: String,
        #[arg(long)]
        position: Option<u32>,
        #[arg(long)]
        level: Option<u32>,
        #[arg(long)]
        donation_number: Option<u32>,
    },
    /// Remove a queue entry
    QueueRemove {
        #[arg(value_name = "ENTRY_ID")]
        id: String,
    },
    /// Generate this month's PULL donations
    MonthlyPull,
    /// Totals for one level
    LevelStats {
        #[arg(value_name = "LEVEL")]
        level: u32,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = config::Config::load().context("load config")?;

    match cli.command {
        Commands::Config { .. } => Ok(()),

        Commands::Login { email, password } => {
            commands::auth::login(&config, &email, password).await
        }
        Commands::Logout => commands::auth::logout(&config),
        Commands::Register => commands::register::run(&config).await,
        Commands::Profile => commands::auth::profile(&config).await,
        Commands::Verify { channel } => match channel {
            VerifyCommands::Email { code } => commands::auth::verify_email(&config, &code).await,
            VerifyCommands::Phone { code } => commands::auth::verify_phone(&config, &code).await,
        },
        Commands::Resend { channel } => match channel {
            ResendCommands::Email => commands::auth::resend_email(&config).await,
            ResendCommands::Phone => commands::auth::resend_phone(&config).await,
        },

        Commands::Donations { command } => match command {
            DonationCommands::Inbox { list } => {
                commands::donations::inbox(&config, &(&list).into()).await
            }
            DonationCommands::Outbox { list } => {
                commands::donations::outbox(&config, &(&list).into()).await
            }
            DonationCommands::Progress => commands::donations::progress(&config).await,
            DonationCommands::AcceptUpgrade {
                from_level,
                to_level,
            } => commands::donations::accept_upgrade(&config, from_level, to_level).await,
            DonationCommands::Confirm { id } => commands::donations::confirm(&config, &id).await,
            DonationCommands::UploadProof { id, file } => {
                commands::donations::upload_proof(&config, &id, &file).await
            }
            DonationCommands::Proof { id } => commands::donations::proof(&config, &id).await,
            DonationCommands::Review { id } => commands::donations::review(&config, &id).await,
            DonationCommands::Report {
                id,
                reason,
                description,
            } => commands::donations::report(&config, &id, &reason, &description).await,
            DonationCommands::Reports { list } => {
                commands::donations::my_reports(&config, &(&list).into()).await
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::Users { list } => commands::admin::users(&config, &(&list).into()).await,
            AdminCommands::User { id } => commands::admin::user(&config, &id).await,
            AdminCommands::SetUserStatus { id, status } => {
                commands::admin::set_user_status(&config, &id, &status).await
            }
            AdminCommands::Donations { list } => {
                commands::admin::donations(&config, &(&list).into()).await
            }
            AdminCommands::SearchDonations {
                status,
                kind,
                page,
                limit,
            } => {
                let search = corrente_core::services::donations::DonationSearch {
                    status,
                    kind,
                    page,
                    limit,
                };
                commands::admin::search_donations(&config, &search).await
            }
            AdminCommands::Reports { list } => {
                commands::admin::reports(&config, &(&list).into()).await
            }
            AdminCommands::ResolveReport { id, resolution } => {
                commands::admin::resolve_report(&config, &id, &resolution).await
            }
            AdminCommands::Queue { level, list } => {
                commands::admin::queue(&config, level, &(&list).into()).await
            }
            AdminCommands::QueueAdd {
                user_id,
                level,
                donation_number,
            } => commands::admin::queue_add(&config, user_id, level, donation_number).await,
            AdminCommands::QueueUpdate {
                id,
                position,
                level,
                donation_number,
            } => {
                let update = corrente_types::QueueUpdate {
                    position,
                    level,
                    donation_number,
                };
                commands::admin::queue_update(&config, &id, &update).await
            }
            AdminCommands::QueueRemove { id } => commands::admin::queue_remove(&config, &id).await,
            AdminCommands::MonthlyPull => commands::admin::monthly_pull(&config).await,
            AdminCommands::LevelStats { level } => {
                commands::admin::level_stats(&config, level).await
            }
        },
    }
}
