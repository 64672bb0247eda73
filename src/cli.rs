use std::path::PathBuf;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{info, instrument, Instrument};
use crate::app_system::CatalogSystem;
use crate::catalog::EditSession;
use crate::catalog_service::CatalogClient;
use crate::config::{AppConfig, ConfigOverrides, LoadOptions};
use crate::domain::{ProductId, Rating, RatingPolicy};
use crate::error::CatalogError;
use crate::shell::{require_review_fields, run_shell, CommandParseError};
use crate::view::{render_catalog, render_product};

#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    about = "Product catalog with ratings, favorites and reviews",
    after_help = "Examples:\n  catalog add \"Widget\" 4\n  catalog review 1700000000000 5 \"Great\"\n  catalog show 1700000000000\n  catalog shell"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Directory holding the catalog data")]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Coerce and validate every rating to 1-5")]
    strict_ratings: bool,
    #[arg(long, global = true, help = "Keep the catalog in memory only")]
    ephemeral: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Show every product")]
    List {
        #[arg(long, help = "Emit the catalog as JSON")]
        json: bool,
    },
    #[command(about = "Add a product")]
    Add {
        #[arg(allow_hyphen_values = true)]
        name: String,
        #[arg(allow_hyphen_values = true)]
        rating: String,
    },
    #[command(about = "Show one product")]
    Show { id: ProductId },
    #[command(about = "Delete a product")]
    Delete { id: ProductId },
    #[command(about = "Toggle a product's favorite flag")]
    Favorite { id: ProductId },
    #[command(about = "Attach a review to a product")]
    Review {
        id: ProductId,
        #[arg(allow_hyphen_values = true)]
        rating: String,
        content: String,
    },
    #[command(about = "Change a product's name and/or rating")]
    Edit {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        rating: Option<String>,
    },
    #[command(about = "Interactive session reading commands from stdin")]
    Shell,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                data_dir: self.data_dir.clone(),
                rating_policy: self.strict_ratings.then_some(RatingPolicy::Strict),
                log_level: None,
            },
        }
    }
}

/// Starts the catalog system, runs one command, and shuts down.
pub async fn run(cli: Cli, config: AppConfig) -> Result<(), String> {
    let system = if cli.ephemeral {
        CatalogSystem::start_ephemeral(&config).await
    } else {
        CatalogSystem::start(&config).await.map_err(|e| e.to_string())?
    };

    let span = tracing::info_span!("command");
    let result = dispatch(&system.catalog_client, cli.command)
        .instrument(span)
        .await;

    system.shutdown().await?;
    result.map_err(|e| e.to_string())
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Shell(#[from] crate::shell::ShellError),
    #[error("could not encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Invalid(#[from] CommandParseError),
    #[error("no product with id {0}")]
    NotFound(ProductId),
}

#[instrument(skip(client))]
async fn dispatch(client: &CatalogClient, command: Command) -> Result<(), CommandError> {
    match command {
        Command::List { json } => {
            let products = client.list_products().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                let session = client.get_edit_session().await?;
                print!("{}", render_catalog(&products, &session));
            }
        }
        Command::Add { name, rating } => {
            let product = client.add_product(name, Rating::from(rating)).await?;
            info!(product_id = %product.id, "Product added");
            println!("{}", product.id);
        }
        Command::Delete { id } => {
            if !client.delete_product(id).await? {
                info!(product_id = %id, "Nothing deleted");
            }
        }
        Command::Favorite { id } => match client.toggle_favorite(id).await? {
            Some(favorite) => println!("{}", favorite),
            None => info!(product_id = %id, "Nothing toggled"),
        },
        Command::Show { id } => {
            let product = client.get_product(id).await?.ok_or(CommandError::NotFound(id))?;
            let session = client.get_edit_session().await?;
            print!("{}", render_product(&product, &session));
        }
        Command::Review { id, rating, content } => {
            require_review_fields(&rating, &content)?;
            if !client.add_review(id, content, Rating::from(rating)).await? {
                info!(product_id = %id, "Nothing reviewed");
            }
        }
        Command::Edit { id, name, rating } => {
            // Seed from the stored product, then let the flags replace drafts.
            let Some(draft) = client.begin_edit(id).await? else {
                return Err(CommandError::NotFound(id));
            };
            let draft = client
                .update_edit_draft(name, rating.map(Rating::from))
                .await?
                .unwrap_or(draft);

            if let Some(product) = client.save_edit(id, draft.name, draft.rating).await? {
                print!("{}", render_product(&product, &EditSession::Idle));
            }
        }
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            run_shell(client, stdin, &mut stdout).await?;
            stdout.write_all(b"\n").await?;
        }
    }
    Ok(())
}
