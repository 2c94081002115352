//! mealdesk-admin - browse, add, edit and delete restaurant foods
//!
//! Terminal front-end over the list controller. Every command fetches the
//! current collection from the remote service, performs its action, and prints
//! the outcome notifications emitted by the core.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mealdesk_common::config::{load_toml_config, ClientSettings};
use mealdesk_common::events::AdminEvent;
use mealdesk_common::FoodDraft;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mealdesk_admin::render::render_page;
use mealdesk_admin::{build_controller, AdminError, LayoutMode, ListController};

#[derive(Debug, Parser)]
#[command(name = "mealdesk-admin", version, about = "Restaurant food administration")]
struct Cli {
    /// Remote service base URL (overrides MEALDESK_BASE_URL and config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file path (default: <config dir>/mealdesk/config.toml)
    #[arg(long, global = true, env = "MEALDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the restaurant food list
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
        /// Filter on the server instead of locally
        #[arg(long, requires = "search")]
        remote: bool,
        /// Page to show (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Layout: grid or list
        #[arg(long, default_value_t = LayoutMode::Grid)]
        layout: LayoutMode,
        /// Expand one record's actions in grid view
        #[arg(long)]
        expand: Option<String>,
    },
    /// Add a new food
    Add(DraftArgs),
    /// Edit an existing food; omitted fields keep their current values
    Edit {
        id: String,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete a food after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct DraftArgs {
    #[arg(long)]
    name: Option<String>,
    /// Rating between 1 and 5
    #[arg(long)]
    rating: Option<String>,
    /// Food image URL
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    restaurant_name: Option<String>,
    /// Restaurant logo URL
    #[arg(long)]
    restaurant_logo: Option<String>,
    /// "Open Now" or "Closed"
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    price: Option<String>,
}

impl DraftArgs {
    /// Overlay the provided fields onto `draft`
    fn apply(self, mut draft: FoodDraft) -> FoodDraft {
        let fields = [
            (self.name, &mut draft.name),
            (self.rating, &mut draft.rating),
            (self.image, &mut draft.image),
            (self.restaurant_name, &mut draft.restaurant_name),
            (self.restaurant_logo, &mut draft.restaurant_logo),
            (self.status, &mut draft.restaurant_status),
            (self.price, &mut draft.price),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        draft
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let toml_config = load_toml_config(cli.config.as_deref())?;
    let settings = ClientSettings::resolve(cli.base_url.as_deref(), &toml_config)?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    init_tracing(level, settings.log_file.as_deref())?;

    info!(
        "Starting mealdesk-admin v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Food service: {}", settings.base_url);

    let controller = build_controller(&settings).context("Failed to build HTTP client")?;
    let mut notifications = controller.events().subscribe();

    let outcome = run(&controller, cli.command).await;
    print_notifications(&mut notifications);

    match outcome {
        Err(AdminError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            bail!("{} field(s) failed validation", errors.len());
        }
        other => other.map_err(Into::into),
    }
}

async fn run(controller: &ListController, command: Command) -> Result<(), AdminError> {
    match command {
        Command::List {
            search,
            remote,
            page,
            layout,
            expand,
        } => {
            match search {
                Some(term) if remote => {
                    controller.search_remote(&term).await?;
                }
                Some(term) => {
                    controller.refresh().await?;
                    controller.apply_search(&term).await;
                }
                None => {
                    controller.refresh().await?;
                }
            }
            controller.set_layout(layout).await;
            if let Some(id) = expand {
                controller.toggle_expanded(&id).await;
            }

            let view = controller.page(page).await;
            print!("{}", render_page(&view, &controller.interaction().await));
        }
        Command::Add(fields) => {
            let created = controller.create(&fields.apply(FoodDraft::new())).await?;
            println!("Added {} ({})", created.name, created.id);
        }
        Command::Edit { id, fields } => {
            controller.refresh().await?;
            let existing = controller
                .get(&id)
                .await
                .ok_or_else(|| AdminError::NotFound(id.clone()))?;

            let draft = fields.apply(FoodDraft::from_food(&existing));
            let updated = controller.update(&id, &draft).await?;
            println!("Updated {} ({})", updated.name, updated.id);
        }
        Command::Delete { id, yes } => {
            controller.refresh().await?;
            controller.request_delete(&id).await?;

            let name = controller.get(&id).await.map(|f| f.name).unwrap_or_default();
            if yes || confirm(&format!("Delete '{}' ({})? [y/N] ", name, id)) {
                let deleted = controller.confirm_delete().await?;
                println!("Deleted {}", deleted);
            } else {
                controller.reject_delete().await;
                println!("Delete cancelled");
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Print every notification emitted so far
fn print_notifications(rx: &mut broadcast::Receiver<AdminEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let Some(notification) = event.notification() {
            eprintln!("{}", notification);
        }
    }
}

fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
