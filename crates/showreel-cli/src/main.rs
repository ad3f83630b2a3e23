//! Showreel CLI: administer the portfolio document directly.
//!
//! The document path comes from `--data-file` or `PORTFOLIO_DATA_FILE` (a
//! `.env` file is honored). Every command prints JSON.

use clap::{Parser, Subcommand};
use showreel_cli::{build_patch, entry_view, init_tracing, print_json};
use showreel_core::models::NewEntry;
use showreel_core::ListFailurePolicy;
use showreel_db::PortfolioRepository;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "showreel", about = "Showreel portfolio admin CLI")]
struct Cli {
    /// Portfolio JSON document
    #[arg(long, global = true, env = "PORTFOLIO_DATA_FILE", default_value = "data/db.json")]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries in display order, with their display thumbnails
    List,
    /// Show a single entry and its display thumbnail
    Show {
        /// Entry ID
        id: String,
    },
    /// Add an entry from a YouTube URL
    Add {
        /// Watch, share or embed URL
        url: String,
        #[arg(long)]
        title: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Update fields of an entry
    Update {
        /// Entry ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Replacement tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, allow_negative_numbers = true)]
        order: Option<i64>,
        /// Thumbnail path or URL
        #[arg(long, conflicts_with = "clear_thumbnail")]
        thumbnail: Option<String>,
        /// Remove the thumbnail override
        #[arg(long)]
        clear_thumbnail: bool,
    },
    /// Delete an entry (succeeds for unknown IDs)
    Delete {
        /// Entry ID
        id: String,
    },
    /// Set display order: the listed IDs get positions 0, 1, 2, ...
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Create an empty document if none exists
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let repo = PortfolioRepository::new(cli.data_file.clone(), ListFailurePolicy::Propagate);

    match cli.command {
        Commands::List => {
            let entries = repo
                .list_strict()
                .await?
                .iter()
                .map(entry_view)
                .collect::<anyhow::Result<Vec<_>>>()?;
            print_json(&entries)?;
        }
        Commands::Show { id } => {
            let entry = repo.get(&id).await?;
            print_json(&entry_view(&entry)?)?;
        }
        Commands::Add { url, title, tags } => {
            let mut new_entry = NewEntry::external(url);
            new_entry.title = title;
            if !tags.is_empty() {
                new_entry = new_entry.with_tags(tags);
            }
            let item = repo.create(new_entry).await?;
            print_json(&serde_json::json!({ "success": true, "item": item }))?;
        }
        Commands::Update {
            id,
            title,
            tags,
            order,
            thumbnail,
            clear_thumbnail,
        } => {
            let patch = build_patch(title, tags, order, thumbnail, clear_thumbnail);
            if patch.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one of --title, --tag, --order, --thumbnail, --clear-thumbnail");
            }
            let item = repo.update(&id, patch).await?;
            print_json(&serde_json::json!({ "success": true, "item": item }))?;
        }
        Commands::Delete { id } => {
            let removed = repo.delete(&id).await?;
            print_json(&serde_json::json!({ "success": true, "removed": removed }))?;
        }
        Commands::Reorder { ids } => {
            let reordered = repo.reorder(&ids).await?;
            print_json(&serde_json::json!({ "success": true, "reordered": reordered }))?;
        }
        Commands::Init => {
            repo.init().await?;
            print_json(&serde_json::json!({
                "success": true,
                "path": cli.data_file.display().to_string(),
            }))?;
        }
    }

    Ok(())
}
