// src/feed/emit.rs

//! Handing normalized records to the package database

use tracing::{debug, info};

use super::normalize::EntryOutcome;
use super::validate::{format_error, validate};
use super::{ARCHIVE_CONTENTS, FeedData, FeedTranscoder, SyncStats};
use crate::db::{CATEGORY, PackageDb};
use crate::error::Result;

impl FeedTranscoder<'_> {
    /// Transcode the loaded repository data into `db`
    ///
    /// The category and its common data are registered once the feed has
    /// passed validation, so a rejected feed leaves `db` untouched.
    pub fn process_data<D: PackageDb + ?Sized>(
        &self,
        db: &mut D,
        data: &FeedData,
    ) -> Result<SyncStats> {
        let feed = data
            .get(ARCHIVE_CONTENTS)
            .ok_or_else(|| format_error(self.repo_uri()))?;
        let entries = validate(feed, self.repo_uri())?;

        info!(
            "Processing {} archive entries from {}",
            entries.len(),
            self.repo_uri()
        );

        db.add_category(CATEGORY)?;
        db.set_common_data(CATEGORY, &self.common_data())?;

        let mut stats = SyncStats::default();
        for entry in entries {
            match self.classify(entry) {
                EntryOutcome::Accepted {
                    record,
                    dropped_dependencies,
                } => {
                    db.add_package(&record.package, &record.properties)?;
                    stats.added += 1;
                    stats.dependencies_dropped += dropped_dependencies;
                }
                EntryOutcome::Excluded(name) => {
                    debug!("Excluding {}", name);
                    stats.excluded += 1;
                }
                EntryOutcome::Dropped { name, reason } => {
                    debug!(
                        "Skipping {}: {}",
                        name.as_deref().unwrap_or("<unnamed entry>"),
                        reason
                    );
                    stats.skipped += 1;
                }
            }
        }

        info!("Transcoded {}: {}", self.repo_uri(), stats);
        Ok(stats)
    }
}
