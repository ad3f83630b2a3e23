use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use showreel_core::models::{EntryPatch, PortfolioEntry};

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Stored fields of an entry plus the thumbnail the site would display for it.
pub fn entry_view(entry: &PortfolioEntry) -> anyhow::Result<Value> {
    let mut view = serde_json::to_value(entry).context("Serialize entry")?;
    if let Value::Object(fields) = &mut view {
        fields.insert(
            "displayThumbnail".to_string(),
            Value::String(entry.effective_thumbnail()),
        );
    }
    Ok(view)
}

/// Build a partial update from command-line flags. An empty tag list leaves tags untouched.
pub fn build_patch(
    title: Option<String>,
    tags: Vec<String>,
    order: Option<i64>,
    thumbnail: Option<String>,
    clear_thumbnail: bool,
) -> EntryPatch {
    let thumbnail_override = if clear_thumbnail {
        Some(None)
    } else {
        thumbnail.map(Some)
    };

    EntryPatch {
        title,
        tags: (!tags.is_empty()).then_some(tags),
        sort_order: order,
        thumbnail_override,
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays valid JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
