use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// achievement rank, ordered by index
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    #[default]
    SemRanking,
    Cobre,
    Ferro,
    Bronze,
    Prata,
    Ouro,
    Platina,
    Esmeralda,
    Rubi,
    Diamante,
    DiamanteAzul,
}

pub const TIER_COUNT: usize = 11;

/// all tiers, lowest first
pub const TIER_ORDER: [Tier; TIER_COUNT] = [
    Tier::SemRanking,
    Tier::Cobre,
    Tier::Ferro,
    Tier::Bronze,
    Tier::Prata,
    Tier::Ouro,
    Tier::Platina,
    Tier::Esmeralda,
    Tier::Rubi,
    Tier::Diamante,
    Tier::DiamanteAzul,
];

impl Tier {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        TIER_ORDER.get(index).copied()
    }

    pub fn is_max(&self) -> bool {
        *self == Tier::DiamanteAzul
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Tier::SemRanking => "semRanking",
            Tier::Cobre => "cobre",
            Tier::Ferro => "ferro",
            Tier::Bronze => "bronze",
            Tier::Prata => "prata",
            Tier::Ouro => "ouro",
            Tier::Platina => "platina",
            Tier::Esmeralda => "esmeralda",
            Tier::Rubi => "rubi",
            Tier::Diamante => "diamante",
            Tier::DiamanteAzul => "diamanteAzul",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::SemRanking => "Sem Ranking",
            Tier::Cobre => "Cobre",
            Tier::Ferro => "Ferro",
            Tier::Bronze => "Bronze",
            Tier::Prata => "Prata",
            Tier::Ouro => "Ouro",
            Tier::Platina => "Platina",
            Tier::Esmeralda => "Esmeralda",
            Tier::Rubi => "Rubi",
            Tier::Diamante => "Diamante",
            Tier::DiamanteAzul => "Diamante Azul",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tier::SemRanking => "🔓",
            Tier::Cobre => "🟤",
            Tier::Ferro => "🪨",
            Tier::Bronze => "🥉",
            Tier::Prata => "🥈",
            Tier::Ouro => "🥇",
            Tier::Platina => "💎",
            Tier::Esmeralda => "💚",
            Tier::Rubi => "❤️",
            Tier::Diamante => "💎",
            Tier::DiamanteAzul => "💠",
        }
    }

    /// hex display color
    pub fn color(&self) -> &'static str {
        match self {
            Tier::SemRanking => "#6B7280",
            Tier::Cobre => "#B87333",
            Tier::Ferro => "#71717A",
            Tier::Bronze => "#CD7F32",
            Tier::Prata => "#C0C0C0",
            Tier::Ouro => "#FFD700",
            Tier::Platina => "#00D4AA",
            Tier::Esmeralda => "#50C878",
            Tier::Rubi => "#E0115F",
            Tier::Diamante => "#B9F2FF",
            Tier::DiamanteAzul => "#4169E1",
        }
    }

    /// celebration lines shown on tier-up
    pub fn messages(&self) -> &'static [&'static str] {
        match self {
            Tier::SemRanking => &["Parabéns!"],
            Tier::Cobre => &[
                "Primeira conquista!",
                "Você começou sua jornada!",
                "O primeiro passo foi dado!",
            ],
            Tier::Ferro => &[
                "Progresso sólido!",
                "Continue assim!",
                "Você está no caminho certo!",
            ],
            Tier::Bronze => &[
                "Ótimo trabalho!",
                "Sua dedicação está evidente!",
                "Continue evoluindo!",
            ],
            Tier::Prata => &["Impressionante!", "Você está brilhando!", "Constância de verdade!"],
            Tier::Ouro => &["Extraordinário!", "Você é ouro puro!", "Desempenho excepcional!"],
            Tier::Platina => &[
                "Elite absoluta!",
                "Você é imparável!",
                "Performance de alto nível!",
            ],
            Tier::Esmeralda => &[
                "Lendário!",
                "Você transcendeu!",
                "Raríssimo encontrar alguém assim!",
            ],
            Tier::Rubi => &["Mítico!", "Pouquíssimos chegam aqui!", "Você é uma inspiração!"],
            Tier::Diamante => &[
                "Diamante bruto!",
                "Absolutamente excepcional!",
                "Você redefiniu os limites!",
            ],
            Tier::DiamanteAzul => &[
                "O TOPO ABSOLUTO!",
                "LENDA VIVA!",
                "VOCÊ É O MELHOR DOS MELHORES!",
            ],
        }
    }

    /// random celebration line
    pub fn celebration_message(&self) -> &'static str {
        self.messages()
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Parabéns!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_index() {
        for (i, tier) in TIER_ORDER.iter().enumerate() {
            assert_eq!(tier.index(), i);
            assert_eq!(Tier::from_index(i), Some(*tier));
        }
        assert_eq!(Tier::from_index(TIER_COUNT), None);
    }

    #[test]
    fn test_ordering_by_index() {
        assert!(Tier::Cobre < Tier::Ferro);
        assert!(Tier::Diamante < Tier::DiamanteAzul);
        assert!(Tier::SemRanking < Tier::Cobre);
    }

    #[test]
    fn test_next_and_max() {
        assert_eq!(Tier::Bronze.next(), Some(Tier::Prata));
        assert_eq!(Tier::DiamanteAzul.next(), None);
        assert!(Tier::DiamanteAzul.is_max());
        assert!(!Tier::Diamante.is_max());
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Tier::DiamanteAzul).unwrap();
        assert_eq!(json, "\"diamanteAzul\"");
        let back: Tier = serde_json::from_str("\"semRanking\"").unwrap();
        assert_eq!(back, Tier::SemRanking);
        for tier in TIER_ORDER {
            assert_eq!(serde_json::to_string(&tier).unwrap(), format!("\"{}\"", tier.id()));
        }
    }

    #[test]
    fn test_celebration_message_comes_from_tier() {
        let msg = Tier::Ouro.celebration_message();
        assert!(Tier::Ouro.messages().contains(&msg));
    }
}
