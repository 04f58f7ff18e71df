use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::tiering::{classify, Tier};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The eight self-declared skills. Flags are independent; none implies another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillSet {
    pub knows_html_css_js: bool,
    pub knows_react_next: bool,
    pub can_build_crud: bool,
    pub can_build_auth: bool,
    pub knows_backend_frameworks: bool,
    pub knows_golang: bool,
    pub knows_cloud_infra: bool,
    pub knows_system_design: bool,
}

impl SkillSet {
    /// Number of flags, in declaration order.
    pub const COUNT: usize = 8;

    /// Build a skill set from the low eight bits of `bits`, one flag per bit in declaration order.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            knows_html_css_js: bits & 0b0000_0001 != 0,
            knows_react_next: bits & 0b0000_0010 != 0,
            can_build_crud: bits & 0b0000_0100 != 0,
            can_build_auth: bits & 0b0000_1000 != 0,
            knows_backend_frameworks: bits & 0b0001_0000 != 0,
            knows_golang: bits & 0b0010_0000 != 0,
            knows_cloud_infra: bits & 0b0100_0000 != 0,
            knows_system_design: bits & 0b1000_0000 != 0,
        }
    }

    /// Human-readable label paired with each flag, in declaration order.
    pub fn labelled(&self) -> [(&'static str, bool); Self::COUNT] {
        [
            ("HTML, CSS, JavaScript", self.knows_html_css_js),
            ("React/Next.js", self.knows_react_next),
            ("CRUD Applications", self.can_build_crud),
            ("Authentication", self.can_build_auth),
            ("Backend Frameworks", self.knows_backend_frameworks),
            ("Golang", self.knows_golang),
            ("Cloud Infrastructure", self.knows_cloud_infra),
            ("System Design", self.knows_system_design),
        ]
    }
}

/// Raw registration form as submitted. Missing flags count as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationSubmission {
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    #[serde(flatten)]
    pub skills: SkillSet,
}

/// Registration input that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDraft {
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub skills: SkillSet,
}

/// Stored candidate. The tier is fixed when the record is built and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    tier: Tier,
    #[serde(flatten)]
    pub skills: SkillSet,
    pub created_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn new(id: CandidateId, draft: CandidateDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            contact: draft.contact,
            tier: classify(&draft.skills),
            skills: draft.skills,
            created_at,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn view(&self) -> CandidateView {
        CandidateView {
            candidate: self.clone(),
            tier_title: self.tier.definition().title,
        }
    }
}

/// API representation: the stored record plus the tier title for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    #[serde(flatten)]
    pub candidate: CandidateRecord,
    pub tier_title: &'static str,
}

/// Record shown until the first registration lands, so listings never start empty.
pub(crate) fn seed_candidates() -> Vec<CandidateRecord> {
    let draft = CandidateDraft {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        contact: Some("+1234567890".to_string()),
        skills: SkillSet {
            knows_html_css_js: true,
            knows_react_next: true,
            can_build_crud: true,
            can_build_auth: true,
            ..SkillSet::default()
        },
    };
    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    vec![CandidateRecord::new(CandidateId(1), draft, created_at)]
}

/// Listing filter used by the dashboard and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateFilter {
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub search: Option<String>,
}

impl CandidateFilter {
    pub fn matches(&self, record: &CandidateRecord) -> bool {
        if let Some(tier) = self.tier {
            if record.tier() != tier {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.name.to_lowercase().contains(&term)
                    || record.email.to_lowercase().contains(&term)
            }
        }
    }
}
