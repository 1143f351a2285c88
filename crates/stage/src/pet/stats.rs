use serde::Serialize;

use crate::config::InitialStats;

pub const STAT_MIN: u8 = 0;
pub const STAT_MAX: u8 = 100;

/// Pet well-being. Hunger counts up towards starving; the others count down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PetStats {
    pub hunger: u8,
    pub cleanliness: u8,
    pub happiness: u8,
    pub energy: u8,
}

impl Default for PetStats {
    fn default() -> Self {
        Self::from_initial(InitialStats::default())
    }
}

impl PetStats {
    pub fn from_initial(initial: InitialStats) -> Self {
        Self {
            hunger: clamp_stat(i32::from(initial.hunger)),
            cleanliness: clamp_stat(i32::from(initial.cleanliness)),
            happiness: clamp_stat(i32::from(initial.happiness)),
            energy: clamp_stat(i32::from(initial.energy)),
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        [self.hunger, self.cleanliness, self.happiness, self.energy]
            .iter()
            .all(|value| *value <= STAT_MAX)
    }
}

pub fn clamp_stat(value: i32) -> u8 {
    value.clamp(i32::from(STAT_MIN), i32::from(STAT_MAX)) as u8
}

pub(crate) fn adjust(stat: &mut u8, delta: i32) {
    *stat = clamp_stat(i32::from(*stat) + delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_both_ends() {
        assert_eq!(clamp_stat(-5), 0);
        assert_eq!(clamp_stat(42), 42);
        assert_eq!(clamp_stat(130), 100);
    }

    #[test]
    fn adjust_never_leaves_range() {
        let mut stat = 98;
        adjust(&mut stat, 30);
        assert_eq!(stat, 100);
        adjust(&mut stat, -250);
        assert_eq!(stat, 0);
    }

    #[test]
    fn defaults_match_fresh_pet() {
        let stats = PetStats::default();
        assert_eq!(stats.hunger, 50);
        assert_eq!(stats.cleanliness, 100);
        assert_eq!(stats.happiness, 50);
        assert_eq!(stats.energy, 100);
        assert!(stats.is_within_bounds());
    }
}
