// ABOUTME: Sample data for a fresh database
// ABOUTME: Two episodes with five parts each, created through the services and safe to re-run

use partwise_core::{EpisodeInput, PartInput};
use partwise_episodes::{DbState, ServiceError};
use std::collections::HashSet;
use tracing::{debug, info};

const EPISODES: i64 = 2;
const PARTS_PER_EPISODE: i64 = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub episodes_created: usize,
    pub parts_created: usize,
    pub parts_skipped: usize,
}

pub async fn seed(db: &DbState) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();

    for n in 1..=EPISODES {
        let title = format!("Episode {}", n);

        let episode_id = match db.episode_storage.get_episode_by_title(&title).await? {
            Some(existing) => {
                debug!("Seed episode '{}' already exists", title);
                existing.id
            }
            None => {
                let created = db
                    .episode_service
                    .create_episode(EpisodeInput {
                        title: Some(title.clone()),
                        description: Some(format!("This is the content for {}.", title)),
                    })
                    .await?;
                report.episodes_created += 1;
                created.episode.id
            }
        };

        let existing: HashSet<String> = db
            .part_storage
            .list_parts(episode_id)
            .await?
            .into_iter()
            .map(|part| part.title)
            .collect();

        for i in 0..PARTS_PER_EPISODE {
            let part_title = format!("{} Part {} Title", title, i);
            if existing.contains(&part_title) {
                report.parts_skipped += 1;
                continue;
            }

            db.part_service
                .add_part(
                    episode_id,
                    PartInput {
                        position: Some(i),
                        title: Some(part_title),
                        description: Some(format!("{} Part {} description.", title, i)),
                    },
                )
                .await?;
            report.parts_created += 1;
        }
    }

    info!(
        "Seeded {} episodes and {} parts ({} parts already present)",
        report.episodes_created, report.parts_created, report.parts_skipped
    );
    Ok(report)
}
