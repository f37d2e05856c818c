//! Score to dashboard reward conversion
//!
//! The arcade only reports a raw score; the dashboard pays out XP and coins.

use serde::{Deserialize, Serialize};

/// Points of score per XP
pub const SCORE_PER_XP: u32 = 5;

/// XP and coins granted for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub coins: u32,
}

impl Reward {
    /// One XP per 5 points, one coin per 2 XP (both rounded down)
    pub fn for_score(score: u32) -> Self {
        let xp = score / SCORE_PER_XP;
        Self { xp, coins: xp / 2 }
    }

    /// Runs scoring under 5 points pay nothing
    pub fn is_empty(&self) -> bool {
        self.xp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_score() {
        assert_eq!(Reward::for_score(47), Reward { xp: 9, coins: 4 });
        assert_eq!(Reward::for_score(100), Reward { xp: 20, coins: 10 });
        assert_eq!(Reward::for_score(5), Reward { xp: 1, coins: 0 });
    }

    #[test]
    fn test_empty() {
        assert!(Reward::for_score(0).is_empty());
        assert!(Reward::for_score(4).is_empty());
        assert!(!Reward::for_score(10).is_empty());
    }
}
