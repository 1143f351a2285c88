use serde::Serialize;

use super::stats::PetStats;

/// Threshold complaints, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PetNeed {
    Starving,
    Hungry,
    Filthy,
    Dirty,
    Miserable,
    Down,
    Exhausted,
    Tired,
}

impl PetNeed {
    /// First match wins; the order of the checks is the priority order.
    pub fn evaluate(stats: &PetStats) -> Option<PetNeed> {
        if stats.hunger > 80 {
            Some(PetNeed::Starving)
        } else if stats.hunger > 60 {
            Some(PetNeed::Hungry)
        } else if stats.cleanliness < 30 {
            Some(PetNeed::Filthy)
        } else if stats.cleanliness < 50 {
            Some(PetNeed::Dirty)
        } else if stats.happiness < 30 {
            Some(PetNeed::Miserable)
        } else if stats.happiness < 50 {
            Some(PetNeed::Down)
        } else if stats.energy < 30 {
            Some(PetNeed::Exhausted)
        } else if stats.energy < 50 {
            Some(PetNeed::Tired)
        } else {
            None
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PetNeed::Starving => "I'm starving! 😫",
            PetNeed::Hungry => "I'm getting hungry... 🍽️",
            PetNeed::Filthy => "I feel so dirty! 🛁",
            PetNeed::Dirty => "I could use a bath... 🧼",
            PetNeed::Miserable => "I'm so sad... 😢",
            PetNeed::Down => "I'm feeling down... 😔",
            PetNeed::Exhausted => "I'm so tired... 😴",
            PetNeed::Tired => "I need some rest... 💤",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reaction {
    Fed,
    NoFood,
    Played,
    Cleaned,
    FellAsleep,
    WasteCleared,
}

impl Reaction {
    pub fn message(self) -> &'static str {
        match self {
            Reaction::Fed => "Yum! Thank you! 😋",
            Reaction::NoFood => "No food collected! Find food in the field first! 🍽️",
            Reaction::Played => "Yay! That was fun! 😺🎉",
            Reaction::Cleaned => "So fresh! 🛁✨",
            Reaction::FellAsleep => "Zzz... 💤",
            Reaction::WasteCleared => "Thanks for cleaning! ✨",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hunger: u8, cleanliness: u8, happiness: u8, energy: u8) -> PetStats {
        PetStats {
            hunger,
            cleanliness,
            happiness,
            energy,
        }
    }

    #[test]
    fn hunger_outranks_dirt() {
        let need = PetNeed::evaluate(&stats(85, 20, 100, 100));
        assert_eq!(need, Some(PetNeed::Starving));
        assert_eq!(need.map(PetNeed::message), Some("I'm starving! 😫"));
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(PetNeed::evaluate(&stats(60, 50, 50, 50)), None);
        assert_eq!(PetNeed::evaluate(&stats(61, 50, 50, 50)), Some(PetNeed::Hungry));
        assert_eq!(PetNeed::evaluate(&stats(0, 49, 50, 50)), Some(PetNeed::Dirty));
    }

    #[test]
    fn walks_down_the_priority_list() {
        assert_eq!(PetNeed::evaluate(&stats(0, 29, 0, 0)), Some(PetNeed::Filthy));
        assert_eq!(PetNeed::evaluate(&stats(0, 100, 29, 0)), Some(PetNeed::Miserable));
        assert_eq!(PetNeed::evaluate(&stats(0, 100, 49, 0)), Some(PetNeed::Down));
        assert_eq!(PetNeed::evaluate(&stats(0, 100, 100, 29)), Some(PetNeed::Exhausted));
        assert_eq!(PetNeed::evaluate(&stats(0, 100, 100, 49)), Some(PetNeed::Tired));
    }
}
