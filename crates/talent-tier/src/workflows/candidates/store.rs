use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{seed_candidates, CandidateDraft, CandidateId, CandidateRecord};
use crate::storage::{JsonCollection, Mutation, StorageBackend};

/// Candidate records, newest first.
pub struct CandidateStore {
    records: JsonCollection<CandidateRecord>,
    // Highest id ever handed out, kept beside the records so deleting the newest one
    // never recycles its id, across restarts too.
    issued: JsonCollection<IssuedId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedId {
    last_issued: u64,
}

impl CandidateStore {
    pub const COLLECTION: &'static str = "candidates";
    pub const ISSUED_IDS: &'static str = "candidate-ids";

    pub fn open(backend: StorageBackend) -> Self {
        Self::with_seed(backend, seed_candidates())
    }

    pub fn with_seed(backend: StorageBackend, seed: Vec<CandidateRecord>) -> Self {
        Self {
            records: JsonCollection::open(Self::COLLECTION, backend.clone(), seed),
            issued: JsonCollection::open(Self::ISSUED_IDS, backend, Vec::new()),
        }
    }

    pub fn is_durable(&self) -> bool {
        self.records.is_durable()
    }

    /// All records, most recently created first. Never fails.
    pub fn load(&self) -> Vec<CandidateRecord> {
        self.records.load()
    }

    /// Insert at the head and persist before returning.
    pub fn add(&self, record: CandidateRecord) {
        self.records.modify(|records| {
            self.mark_issued(record.id.0);
            records.insert(0, record);
            Mutation::Applied(())
        });
    }

    /// Assign the next id and insert the resulting record in one step.
    pub fn create(&self, draft: CandidateDraft, created_at: DateTime<Utc>) -> CandidateRecord {
        let record = self.records.modify(|records| {
            let highest = records
                .iter()
                .map(|record| record.id.0)
                .max()
                .unwrap_or(0)
                .max(self.last_issued());
            let record = CandidateRecord::new(CandidateId(highest + 1), draft, created_at);
            self.mark_issued(record.id.0);
            records.insert(0, record.clone());
            Mutation::Applied(record)
        });

        info!(id = %record.id, tier = %record.tier(), "candidate stored");
        record
    }

    /// Remove the first record with `id`. Returns `false`, writing nothing, when absent.
    pub fn remove(&self, id: CandidateId) -> bool {
        self.records.modify(|records| {
            match records.iter().position(|record| record.id == id) {
                Some(index) => {
                    records.remove(index);
                    Mutation::Applied(true)
                }
                None => Mutation::Unchanged(false),
            }
        })
    }

    pub fn get_by_id(&self, id: CandidateId) -> Option<CandidateRecord> {
        self.load().into_iter().find(|record| record.id == id)
    }

    // Called with the records lock held; the id lock is always taken second.
    fn last_issued(&self) -> u64 {
        self.issued
            .load()
            .iter()
            .map(|mark| mark.last_issued)
            .max()
            .unwrap_or(0)
    }

    fn mark_issued(&self, id: u64) {
        self.issued.modify(|marks| {
            let current = marks.iter().map(|mark| mark.last_issued).max().unwrap_or(0);
            if id <= current {
                return Mutation::Unchanged(());
            }
            *marks = vec![IssuedId { last_issued: id }];
            Mutation::Applied(())
        });
    }
}
