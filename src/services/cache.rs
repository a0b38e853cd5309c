use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::config::CacheSettings;
use crate::models::CompatibilityReport;

/// Keyed report cache
///
/// Memoizes computed reports per pair. Invalidation is explicit and has
/// exactly one trigger: any answer write touching the cached pair. TTL
/// and capacity only bound memory; staleness beyond the invalidation
/// rule is not permitted.
pub struct ReportCache {
    reports: Cache<Uuid, CompatibilityReport>,
}

impl ReportCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let reports = Cache::builder()
            .max_capacity(settings.capacity)
            .time_to_live(Duration::from_secs(settings.ttl_secs))
            .build();

        Self { reports }
    }

    pub fn get(&self, pair_id: Uuid) -> Option<CompatibilityReport> {
        let hit = self.reports.get(&pair_id);
        if hit.is_some() {
            tracing::trace!("Report cache hit: {}", pair_id);
        }
        hit
    }

    pub fn set(&self, report: CompatibilityReport) {
        tracing::trace!("Report cache set: {}", report.pair_id);
        self.reports.insert(report.pair_id, report);
    }

    /// Drop the cached report for a pair. Called on every answer write
    /// for that pair.
    pub fn invalidate(&self, pair_id: Uuid) {
        tracing::debug!("Report cache invalidated: {}", pair_id);
        self.reports.invalidate(&pair_id);
    }

    pub fn entry_count(&self) -> u64 {
        self.reports.entry_count()
    }
}
