use serde::{Deserialize, Serialize};

use crate::tiers::{TIER_COUNT, Tier};

/// the seven tracked challenges; declaration order is display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChallengeId {
    /// total workouts with any completed exercise
    #[serde(rename = "constanciaReal")]
    TotalWorkouts,
    /// best streak ever reached
    #[serde(rename = "sequenciasDeFogo")]
    BestStreak,
    /// total completed exercises
    #[serde(rename = "volumeBruto")]
    TotalExercises,
    /// % fully completed over the last 30 workouts
    #[serde(rename = "perfeccionista")]
    CompletionRate,
    /// 7-of-7 windows
    #[serde(rename = "semanasImpecareis")]
    PerfectWeeks,
    /// most recent run without a mandatory "wont"
    #[serde(rename = "inabalavel")]
    DaysWithoutRefusal,
    /// days since signup
    #[serde(rename = "veterania")]
    AccountAge,
}

pub const CHALLENGE_ORDER: [ChallengeId; 7] = [
    ChallengeId::TotalWorkouts,
    ChallengeId::BestStreak,
    ChallengeId::TotalExercises,
    ChallengeId::CompletionRate,
    ChallengeId::PerfectWeeks,
    ChallengeId::DaysWithoutRefusal,
    ChallengeId::AccountAge,
];

/// static challenge definition
#[derive(Debug)]
pub struct Challenge {
    pub id: ChallengeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// minimum value per tier, indexed like `TIER_ORDER`
    pub thresholds: [u32; TIER_COUNT],
    pub is_percentage: bool,
}

static CHALLENGES: [Challenge; 7] = [
    Challenge {
        id: ChallengeId::TotalWorkouts,
        name: "Constância Real",
        description: "Total de treinos completos",
        icon: "🔥",
        color: "#EF4444",
        thresholds: [0, 1, 5, 15, 30, 50, 80, 120, 200, 350, 500],
        is_percentage: false,
    },
    Challenge {
        id: ChallengeId::BestStreak,
        name: "Sequências de Fogo",
        description: "Melhor streak de dias consecutivos",
        icon: "⚡",
        color: "#F59E0B",
        thresholds: [0, 1, 3, 7, 10, 15, 25, 40, 60, 100, 150],
        is_percentage: false,
    },
    Challenge {
        id: ChallengeId::TotalExercises,
        name: "Volume Bruto",
        description: "Total de exercícios completos",
        icon: "💪",
        color: "#8B5CF6",
        thresholds: [0, 25, 100, 300, 600, 1000, 2000, 4000, 7000, 12000, 20000],
        is_percentage: false,
    },
    Challenge {
        id: ChallengeId::CompletionRate,
        name: "Perfeccionista",
        description: "Taxa de conclusão (últimos 30 treinos)",
        icon: "🎯",
        color: "#10B981",
        thresholds: [0, 40, 50, 60, 65, 70, 75, 80, 85, 90, 95],
        is_percentage: true,
    },
    Challenge {
        id: ChallengeId::PerfectWeeks,
        name: "Semanas Impecáveis",
        description: "Semanas com 7/7 dias completos",
        icon: "🌟",
        color: "#EC4899",
        thresholds: [0, 1, 2, 3, 5, 7, 10, 15, 22, 30, 50],
        is_percentage: false,
    },
    Challenge {
        id: ChallengeId::DaysWithoutRefusal,
        name: "Inabalável",
        description: "Dias consecutivos sem \"não quero\"",
        icon: "🛡️",
        color: "#3B82F6",
        thresholds: [0, 3, 7, 14, 21, 30, 50, 75, 120, 180, 365],
        is_percentage: false,
    },
    Challenge {
        id: ChallengeId::AccountAge,
        name: "Veterania",
        description: "Tempo total ativo no app",
        icon: "📅",
        color: "#14B8A6",
        thresholds: [0, 1, 7, 14, 30, 60, 90, 180, 270, 365, 730],
        is_percentage: false,
    },
];

impl ChallengeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeId::TotalWorkouts => "constanciaReal",
            ChallengeId::BestStreak => "sequenciasDeFogo",
            ChallengeId::TotalExercises => "volumeBruto",
            ChallengeId::CompletionRate => "perfeccionista",
            ChallengeId::PerfectWeeks => "semanasImpecareis",
            ChallengeId::DaysWithoutRefusal => "inabalavel",
            ChallengeId::AccountAge => "veterania",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        CHALLENGE_ORDER.into_iter().find(|id| id.as_str() == s)
    }

    pub fn definition(&self) -> &'static Challenge {
        // CHALLENGES is declared in enum order
        &CHALLENGES[*self as usize]
    }

    pub fn threshold(&self, tier: Tier) -> u32 {
        self.definition().thresholds[tier.index()]
    }

    /// display value, `%` for percentage challenges
    pub fn format_value(&self, value: u32) -> String {
        if self.definition().is_percentage {
            format!("{}%", value)
        } else {
            group_thousands(value)
        }
    }
}

/// pt-BR grouping: 12000 -> "12.000"
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
