use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One of the six fixed ranking buckets of a tier list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Tier {
    /// All tiers in display order, best first
    pub const ALL: [Tier; 6] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D, Tier::F];

    /// Bucket newly added movies land in when a list is created
    pub const DEFAULT: Tier = Tier::C;

    /// Storage representation used in the tier column
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::F => "F",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Tier::S),
            "A" => Ok(Tier::A),
            "B" => Ok(Tier::B),
            "C" => Ok(Tier::C),
            "D" => Ok(Tier::D),
            "F" => Ok(Tier::F),
            other => Err(format!("Invalid tier: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_invalid_tier_rejected() {
        assert!("E".parse::<Tier>().is_err());
        assert!("s".parse::<Tier>().is_err());
        assert!("".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_serde_uses_letter() {
        let json = serde_json::to_string(&Tier::S).unwrap();
        assert_eq!(json, "\"S\"");
        let tier: Tier = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(tier, Tier::F);
    }
}
