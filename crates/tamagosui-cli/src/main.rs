// ============================================================================
// tamagosui — CLI for the local pet gallery database and pet snapshots
// ============================================================================
// Usage:
//   tamagosui pets                               List pets with a gallery
//   tamagosui list <PET_ID>                      Show a pet's gallery
//   tamagosui add-url <PET_ID> <URL>             Add an image by URL
//   tamagosui add-file <PET_ID> <PATH>           Upload an image file as a data URL
//   tamagosui remove <PET_ID> <INDEX>            Remove the image at INDEX
//   tamagosui export                             Dump every gallery as JSON
//   tamagosui inspect --pet F --balance F        Evaluate a pet snapshot offline
// ============================================================================

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tamagosui_core::dashboard::{action_buttons, sleep_tick, DisplayStats};
use tamagosui_core::gallery::{load_images, GalleryManager, ImageFile, SharedGallery};
use tamagosui_core::{AppConfig, GalleryDb, GameBalance, Pet};
use tracing::info;

/// TAMAGOSUI local gallery and snapshot tool
#[derive(Parser)]
#[command(name = "tamagosui", version, about = "Manage TAMAGOSUI pet galleries and inspect pet snapshots")]
struct Cli {
    /// Path to the gallery database (default: ~/.tamagosui/gallery.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pet ids that have a stored gallery
    Pets,

    /// Show the images stored for a pet
    List { pet_id: String },

    /// Add an image by URL (invalid and duplicate URLs are ignored)
    AddUrl { pet_id: String, url: String },

    /// Upload an image file, stored as a data URL
    AddFile { pet_id: String, path: PathBuf },

    /// Remove the image at a zero-based index
    Remove { pet_id: String, index: usize },

    /// Export every stored gallery as JSON
    Export,

    /// Evaluate a pet snapshot against game rules without a wallet
    Inspect {
        /// JSON file with the pet snapshot
        #[arg(long)]
        pet: PathBuf,

        /// JSON file with the game balance
        #[arg(long)]
        balance: PathBuf,

        /// Project displayed stats after this many seconds asleep
        #[arg(long, default_value = "0")]
        asleep_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tamagosui_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let db_path = cli.db_path.clone().or_else(|| config.db_path.clone());
    let open_db = || -> Result<Arc<GalleryDb>> { Ok(Arc::new(GalleryDb::open(db_path.as_deref())?)) };

    match cli.command {
        Commands::Pets => {
            let db = open_db()?;
            cmd_pets(&db)
        }
        Commands::List { pet_id } => {
            let db = open_db()?;
            cmd_list(&db, &pet_id)
        }
        Commands::AddUrl { pet_id, url } => cmd_add_url(open_db()?, &pet_id, &url),
        Commands::AddFile { pet_id, path } => cmd_add_file(open_db()?, &pet_id, &path).await,
        Commands::Remove { pet_id, index } => cmd_remove(open_db()?, &pet_id, index),
        Commands::Export => {
            let db = open_db()?;
            cmd_export(&db)
        }
        Commands::Inspect {
            pet,
            balance,
            asleep_secs,
        } => cmd_inspect(&config, &pet, &balance, asleep_secs),
    }
}

fn cmd_add_url(db: Arc<GalleryDb>, pet_id: &str, url: &str) -> Result<()> {
    let mut gallery = GalleryManager::open(db, pet_id, None, &[]);
    if gallery.add_from_url(url) {
        println!("Added. {} now has {} images.", pet_id, gallery.images().len());
    } else {
        println!("Nothing added (invalid or duplicate URL).");
    }
    Ok(())
}

async fn cmd_add_file(db: Arc<GalleryDb>, pet_id: &str, path: &Path) -> Result<()> {
    let file = ImageFile::from_path(path).await?;
    info!("Uploading {} ({}, {} bytes)", file.name, file.media_type, file.bytes.len());

    let gallery = SharedGallery::new(GalleryManager::open(db, pet_id, None, &[]));
    if gallery.add_from_file(file).await {
        println!("Uploaded. {} now has {} images.", pet_id, gallery.images().await.len());
    } else {
        println!("Nothing added (not an image, empty, or duplicate).");
    }
    Ok(())
}

fn cmd_remove(db: Arc<GalleryDb>, pet_id: &str, index: usize) -> Result<()> {
    let mut gallery = GalleryManager::open(db, pet_id, None, &[]);
    if gallery.remove_at(index) {
        println!("Removed image {}. {} images left.", index, gallery.images().len());
    } else {
        println!("No image at index {} ({} images).", index, gallery.images().len());
    }
    Ok(())
}

fn cmd_pets(db: &GalleryDb) -> Result<()> {
    let pets = db.pet_ids()?;
    if pets.is_empty() {
        println!("No galleries found.");
        return Ok(());
    }

    println!("{:<66}  {}", "PET ID", "IMAGES");
    println!("{}", "-".repeat(74));
    for pet_id in &pets {
        println!("{:<66}  {}", pet_id, load_images(db, pet_id).len());
    }
    println!("\nTotal: {} pets", pets.len());
    Ok(())
}

fn cmd_list(db: &GalleryDb, pet_id: &str) -> Result<()> {
    let images = load_images(db, pet_id);
    if images.is_empty() {
        println!("No images yet for {}.", pet_id);
        return Ok(());
    }

    for (i, image) in images.iter().enumerate() {
        println!("{:>3}  {}", i, abbreviate(image, 96));
    }
    Ok(())
}

fn cmd_export(db: &GalleryDb) -> Result<()> {
    let galleries: serde_json::Map<String, serde_json::Value> = db
        .pet_ids()?
        .into_iter()
        .map(|pet_id| {
            let images = load_images(db, &pet_id);
            (pet_id, serde_json::json!(images))
        })
        .collect();

    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "database": db.path().map(|p| p.display().to_string()),
        "galleries": galleries,
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn cmd_inspect(config: &AppConfig, pet_path: &Path, balance_path: &Path, asleep_secs: u64) -> Result<()> {
    let pet: Pet = read_json(pet_path)?;
    let balance: GameBalance = read_json(balance_path)?;

    println!("=== {} (level {}) ===", pet.name, pet.game_data.level);
    println!("Pet:        {}", pet.id);
    println!("Coins:      {}", pet.game_data.coins);
    println!("Experience: {}", pet.game_data.experience);
    println!("Sleeping:   {}", pet.is_sleeping);

    let mut stats = DisplayStats::from(pet.stats);
    if pet.is_sleeping && asleep_secs > 0 {
        let tick = config.dashboard_options().tick;
        let tick_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX).max(1);
        let ticks = asleep_secs.saturating_mul(1000) / tick_ms;
        // stats move linearly toward a clamp, so whole ticks collapse into one step
        let elapsed = Duration::from_millis(ticks.saturating_mul(tick_ms));
        stats = sleep_tick(stats, &balance, elapsed);
        println!("\nProjected after {}s asleep ({} ticks):", asleep_secs, ticks);
    } else {
        println!();
    }
    println!("  Energy:    {:.1} / {}", stats.energy, balance.max_stat);
    println!("  Happiness: {:.1} / {}", stats.happiness, balance.max_stat);
    println!("  Hunger:    {:.1} / {}", stats.hunger, balance.max_stat);

    println!("\nActions:");
    for button in action_buttons(&pet, &balance, None) {
        println!(
            "  {:<10} {}",
            button.action.label(),
            if button.enabled { "available" } else { "-" }
        );
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn abbreviate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max).collect();
    format!("{}... ({} chars)", head, s.chars().count())
}
