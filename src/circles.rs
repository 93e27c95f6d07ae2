use std::cmp::Ordering;
use std::fmt;

/// Character levels at or above this are epic; every progression table yields
/// the Epic circle there, no matter the class.
pub const EPIC_LEVEL: u32 = 21;

/// A spell-access tier. Numbered circles start at 1; Epic sorts after every
/// numbered circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Circle {
    Numbered(u32),
    Epic,
}

impl Circle {
    pub fn is_epic(&self) -> bool {
        matches!(self, Circle::Epic)
    }

    /// Sort rank: numbered circles by value, Epic after all of them.
    pub fn rank(&self) -> u32 {
        match self {
            Circle::Numbered(value) => *value,
            Circle::Epic => 999,
        }
    }
}

impl Ord for Circle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Circle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Circle::Numbered(value) => write!(f, "{}", value),
            Circle::Epic => write!(f, "Epic"),
        }
    }
}

/// Spell progression families. Each class maps onto exactly one of these;
/// adding a family is a local change and the match below stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFamily {
    /// Full nine-circle casters: new circle every other level from 3.
    FullCaster,
    /// Nine circles, but the second circle waits until level 4.
    DelayedCaster,
    /// Six-circle casters: new circle every third level from 4.
    SixCircle,
    /// Four-circle half casters with fixed level thresholds.
    FourCircle,
    /// Anything unrecognized: circle equals level.
    Unknown,
}

pub fn family_of(class_name: &str) -> ClassFamily {
    match class_name {
        "Wizard" | "Cleric" | "Druid" => ClassFamily::FullCaster,
        "Sorcerer" => ClassFamily::DelayedCaster,
        "Bard" => ClassFamily::SixCircle,
        "Paladin" | "Ranger" => ClassFamily::FourCircle,
        _ => ClassFamily::Unknown,
    }
}

/// Derives the circle a class reaches at a character level. `None` means the
/// level opens no new tier for that class and the assignment is dropped from
/// the rendered list.
pub fn resolve_circle(class_name: &str, level: u32) -> Option<Circle> {
    if level >= EPIC_LEVEL {
        return Some(Circle::Epic);
    }
    let numbered = match family_of(class_name) {
        ClassFamily::FullCaster => match level {
            1 => Some(1),
            level if level >= 3 => Some((2 + (level - 3) / 2).min(9)),
            _ => None,
        },
        ClassFamily::DelayedCaster => match level {
            1 => Some(1),
            level if level >= 4 => Some((2 + (level - 4) / 2).min(9)),
            _ => None,
        },
        ClassFamily::SixCircle => match level {
            1 => Some(1),
            level if level >= 4 => Some((2 + (level - 4) / 3).min(6)),
            _ => None,
        },
        ClassFamily::FourCircle => match level {
            level if level >= 15 => Some(4),
            level if level >= 12 => Some(3),
            level if level >= 10 => Some(2),
            // level 9 sits in the dead band between the first two tiers
            level if (6..=8).contains(&level) => Some(1),
            _ => None,
        },
        ClassFamily::Unknown => Some(level),
    };
    numbered.map(Circle::Numbered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epic_overrides_every_family() {
        for class in ["Wizard", "Sorcerer", "Bard", "Paladin", "Swashbuckler"] {
            assert_eq!(resolve_circle(class, 21), Some(Circle::Epic), "{}", class);
            assert_eq!(resolve_circle(class, 30), Some(Circle::Epic), "{}", class);
        }
    }

    #[test]
    fn full_caster_progression() {
        assert_eq!(resolve_circle("Wizard", 1), Some(Circle::Numbered(1)));
        assert_eq!(resolve_circle("Wizard", 2), None);
        assert_eq!(resolve_circle("Wizard", 3), Some(Circle::Numbered(2)));
        assert_eq!(resolve_circle("Cleric", 5), Some(Circle::Numbered(3)));
        assert_eq!(resolve_circle("Druid", 17), Some(Circle::Numbered(9)));
        assert_eq!(resolve_circle("Wizard", 19), Some(Circle::Numbered(9)));
    }

    #[test]
    fn delayed_caster_waits_for_level_four() {
        assert_eq!(resolve_circle("Sorcerer", 1), Some(Circle::Numbered(1)));
        assert_eq!(resolve_circle("Sorcerer", 2), None);
        assert_eq!(resolve_circle("Sorcerer", 3), None);
        assert_eq!(resolve_circle("Sorcerer", 4), Some(Circle::Numbered(2)));
        assert_eq!(resolve_circle("Sorcerer", 18), Some(Circle::Numbered(9)));
        assert_eq!(resolve_circle("Sorcerer", 20), Some(Circle::Numbered(9)));
    }

    #[test]
    fn six_circle_progression_caps_at_six() {
        assert_eq!(resolve_circle("Bard", 1), Some(Circle::Numbered(1)));
        assert_eq!(resolve_circle("Bard", 4), Some(Circle::Numbered(2)));
        assert_eq!(resolve_circle("Bard", 7), Some(Circle::Numbered(3)));
        assert_eq!(resolve_circle("Bard", 16), Some(Circle::Numbered(6)));
        assert_eq!(resolve_circle("Bard", 19), Some(Circle::Numbered(6)));
    }

    #[test]
    fn four_circle_thresholds() {
        assert_eq!(resolve_circle("Paladin", 5), None);
        assert_eq!(resolve_circle("Paladin", 6), Some(Circle::Numbered(1)));
        assert_eq!(resolve_circle("Paladin", 8), Some(Circle::Numbered(1)));
        assert_eq!(resolve_circle("Ranger", 9), None);
        assert_eq!(resolve_circle("Ranger", 10), Some(Circle::Numbered(2)));
        assert_eq!(resolve_circle("Paladin", 12), Some(Circle::Numbered(3)));
        assert_eq!(resolve_circle("Ranger", 15), Some(Circle::Numbered(4)));
    }

    #[test]
    fn unknown_class_falls_back_to_identity() {
        assert_eq!(resolve_circle("CLASS_MYSTIC", 7), Some(Circle::Numbered(7)));
    }

    #[test]
    fn epic_sorts_after_numbered() {
        assert!(Circle::Numbered(9) < Circle::Epic);
        assert!(Circle::Numbered(1) < Circle::Numbered(2));
    }
}
