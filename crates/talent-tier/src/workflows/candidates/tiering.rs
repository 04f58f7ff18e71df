use serde::{Deserialize, Serialize};

use super::domain::SkillSet;

/// Proficiency tier, 0 (beginner) through 5 (architect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const BEGINNER: Tier = Tier(0);
    pub const CRUD: Tier = Tier(1);
    pub const FULL_STACK: Tier = Tier(2);
    pub const MULTI_FRAMEWORK: Tier = Tier(3);
    pub const ADVANCED: Tier = Tier(4);
    pub const ARCHITECT: Tier = Tier(5);

    pub const ALL: [Tier; 6] = [
        Tier::BEGINNER,
        Tier::CRUD,
        Tier::FULL_STACK,
        Tier::MULTI_FRAMEWORK,
        Tier::ADVANCED,
        Tier::ARCHITECT,
    ];

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn definition(self) -> &'static TierDefinition {
        &TIER_DEFINITIONS[self.0 as usize]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tier must be between 0 and 5 (found {0})")]
pub struct InvalidTier(pub u8);

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < TIER_DEFINITIONS.len() {
            Ok(Tier(value))
        } else {
            Err(InvalidTier(value))
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

/// Display copy for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierDefinition {
    pub tier: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub static TIER_DEFINITIONS: [TierDefinition; 6] = [
    TierDefinition {
        tier: 0,
        title: "Tier 0 - Beginner",
        description: "Knows HTML, CSS, and basic JavaScript. Has basic knowledge of Next.js or React but cannot build a CRUD app with a database.",
    },
    TierDefinition {
        tier: 1,
        title: "Tier 1 - CRUD Developer",
        description: "Can build a CRUD application with a database using server actions or API routes, but cannot add advanced authentication.",
    },
    TierDefinition {
        tier: 2,
        title: "Tier 2 - Full-Stack Next.js Developer",
        description: "Can build an authenticated (password + Google) CRUD App and deploy it, but lacks deep knowledge of other backend frameworks like Express/Hono.",
    },
    TierDefinition {
        tier: 3,
        title: "Tier 3 - Multi-Framework Developer",
        description: "Knows Next.js/React and another backend framework (like Express/Hono/Laravel) to build authenticated CRUD APIs with documentation. Does not know Golang.",
    },
    TierDefinition {
        tier: 4,
        title: "Tier 4 - Advanced Full-Stack Developer",
        description: "Proficient in Next.js, backend frameworks, and also knows Golang to build simple APIs.",
    },
    TierDefinition {
        tier: 5,
        title: "Tier 5 - Architect/Lead Developer",
        description: "Proficient in all previous tiers and has experience with cloud infrastructure, containerization (Docker), and system design.",
    },
];

/// Assign a tier, checking the highest tier first.
///
/// Lower-tier skills are not prerequisites: Golang alone reaches tier 4.
pub fn classify(skills: &SkillSet) -> Tier {
    if skills.knows_golang && (skills.knows_cloud_infra || skills.knows_system_design) {
        return Tier::ARCHITECT;
    }
    if skills.knows_golang {
        return Tier::ADVANCED;
    }
    if skills.knows_backend_frameworks {
        return Tier::MULTI_FRAMEWORK;
    }
    if skills.can_build_auth {
        return Tier::FULL_STACK;
    }
    if skills.can_build_crud {
        return Tier::CRUD;
    }
    Tier::BEGINNER
}
