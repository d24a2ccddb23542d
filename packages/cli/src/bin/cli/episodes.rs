use anyhow::bail;
use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use partwise_cli::{seed, Config};
use partwise_episodes::DbState;

#[derive(Subcommand)]
pub enum EpisodesCommands {
    /// Load the sample episodes and parts (skips anything already present)
    Seed,
    /// Renumber part positions to 0..N, repairing gaps and duplicates
    Reorder {
        /// Episode to repair
        #[arg(required_unless_present = "all")]
        episode_id: Option<i64>,
        /// Repair every episode
        #[arg(long, conflicts_with = "episode_id")]
        all: bool,
    },
    /// List episodes with their part counts
    List,
}

pub async fn handle_episodes_command(
    command: EpisodesCommands,
    config: &Config,
) -> anyhow::Result<()> {
    let db = DbState::init(&config.database()).await?;

    match command {
        EpisodesCommands::Seed => seed_database(&db).await,
        EpisodesCommands::Reorder { episode_id, all } => reorder(&db, episode_id, all).await,
        EpisodesCommands::List => list_episodes(&db).await,
    }
}

async fn seed_database(db: &DbState) -> anyhow::Result<()> {
    let report = seed(db).await?;

    println!(
        "{} {} episodes, {} parts created",
        "Seeded:".green().bold(),
        report.episodes_created,
        report.parts_created
    );
    if report.parts_skipped > 0 {
        println!(
            "{}",
            format!("{} parts already present", report.parts_skipped).dimmed()
        );
    }
    Ok(())
}

async fn reorder(db: &DbState, episode_id: Option<i64>, all: bool) -> anyhow::Result<()> {
    let ids = match (episode_id, all) {
        (_, true) => db
            .episode_storage
            .list_episodes()
            .await?
            .into_iter()
            .map(|episode| episode.id)
            .collect(),
        (Some(id), false) => vec![id],
        (None, false) => bail!("Specify an episode id or --all"),
    };

    if ids.is_empty() {
        println!("{}", "No episodes found".yellow());
        return Ok(());
    }

    for id in ids {
        let outcome = db.part_service.reorder_parts(id).await?;
        let summary = format!(
            "episode {}: {} of {} parts renumbered",
            id,
            outcome.changed,
            outcome.parts.len()
        );
        if outcome.changed > 0 {
            println!("{} {}", "Repaired".green().bold(), summary);
        } else {
            println!("{} {}", "Unchanged".dimmed(), summary);
        }
    }
    Ok(())
}

async fn list_episodes(db: &DbState) -> anyhow::Result<()> {
    let episodes = db.episode_service.list_episodes().await?;

    if episodes.is_empty() {
        println!("{}", "No episodes found".yellow());
        println!("{}", "Use 'partwise seed' to load sample data".dimmed());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Title", "Parts", "Positions", "Updated"]);

    for entry in &episodes {
        let positions = if db.part_service.is_contiguous(entry.episode.id).await? {
            "ok".to_string()
        } else {
            "needs reorder".to_string()
        };

        table.add_row(vec![
            entry.episode.id.to_string(),
            partwise_core::truncate(&entry.episode.title, 40),
            entry.parts.len().to_string(),
            positions,
            entry.episode.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
