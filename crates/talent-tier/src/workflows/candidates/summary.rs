use serde::Serialize;

use super::domain::{CandidateRecord, CandidateView};
use super::tiering::Tier;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCount {
    pub tier: Tier,
    pub title: &'static str,
    pub count: usize,
}

/// Dashboard analytics over the full candidate list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_candidates: usize,
    pub tier_distribution: Vec<TierCount>,
    pub recent_registrations: Vec<CandidateView>,
}

impl DashboardSummary {
    /// `records` must already be ordered newest first.
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        let tier_distribution = Tier::ALL
            .iter()
            .map(|tier| TierCount {
                tier: *tier,
                title: tier.definition().title,
                count: records.iter().filter(|record| record.tier() == *tier).count(),
            })
            .collect();

        Self {
            total_candidates: records.len(),
            tier_distribution,
            recent_registrations: records
                .iter()
                .take(RECENT_LIMIT)
                .map(CandidateRecord::view)
                .collect(),
        }
    }
}
