use crate::text::{between, scan_after, scan_pairs, sum_counts};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const SECTION_START: &str = "<b>Dreadsylvania";
const SECTION_END: &str = "<b>Loot Distribution:";
const SHEETS_PREFIX: &str = "got the carriageman ";
const SHEETS_SUFFIX: &str = " sheet(s) drunker";
const BANISH_OPEN: &str = "drove some ";
const BANISH_MID: &str = " out of the ";
const BANISH_CLOSE: &str = " (";
const KILL_MARKER: &str = ") defeated  ";
const KILL_CLOSE: &str = " (";

/// One-shot noncombat milestones, detected by phrase.
const FLAG_PHRASES: &[(&str, &str)] = &[("made the forest less spooky", "forest.13")];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Place {
    Forest,
    Village,
    Castle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Monster {
    Werewolf,
    Bugbear,
    Ghost,
    Zombie,
    Vampire,
    Skeleton,
}

impl Place {
    pub const ALL: [Place; 3] = [Place::Forest, Place::Village, Place::Castle];

    /// The two monster kinds of a place. The order fixes the tilt sign:
    /// banishing index 0 tilts by -1, index 1 by +1.
    pub fn population(self) -> [Monster; 2] {
        match self {
            Place::Forest => [Monster::Werewolf, Monster::Bugbear],
            Place::Village => [Monster::Ghost, Monster::Zombie],
            Place::Castle => [Monster::Vampire, Monster::Skeleton],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Place::Forest => "forest",
            Place::Village => "village",
            Place::Castle => "castle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Place::ALL.into_iter().find(|place| place.name() == name)
    }

    fn index_of(self, monster: Monster) -> Option<usize> {
        self.population().iter().position(|kind| *kind == monster)
    }
}

impl Monster {
    pub const ALL: [Monster; 6] = [
        Monster::Werewolf,
        Monster::Bugbear,
        Monster::Ghost,
        Monster::Zombie,
        Monster::Vampire,
        Monster::Skeleton,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Monster::Werewolf => "werewolf",
            Monster::Bugbear => "bugbear",
            Monster::Ghost => "ghost",
            Monster::Zombie => "zombie",
            Monster::Vampire => "vampire",
            Monster::Skeleton => "skeleton",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Monster::Werewolf => "werewolves",
            Monster::Bugbear => "bugbears",
            Monster::Ghost => "ghosts",
            Monster::Zombie => "zombies",
            Monster::Vampire => "vampires",
            Monster::Skeleton => "skeletons",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Monster::ALL.into_iter().find(|monster| monster.name() == name)
    }

    pub fn from_plural(name: &str) -> Option<Self> {
        Monster::ALL
            .into_iter()
            .find(|monster| monster.plural() == name)
    }

    pub fn home(self) -> Place {
        Place::ALL
            .into_iter()
            .find(|place| place.population().contains(&self))
            .unwrap_or(Place::Forest)
    }
}

/// Structured view of the clan raid log, rebuilt from scratch on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreadStatus {
    pub open: bool,
    pub sheets: u32,
    pub kills: BTreeMap<Place, u32>,
    pub tilt: BTreeMap<Place, i32>,
    pub banished: BTreeMap<Monster, u32>,
    pub flags: BTreeSet<String>,
}

impl Default for DreadStatus {
    fn default() -> Self {
        Self {
            open: false,
            sheets: 0,
            kills: Place::ALL.into_iter().map(|place| (place, 0)).collect(),
            tilt: Place::ALL.into_iter().map(|place| (place, 0)).collect(),
            banished: Monster::ALL.into_iter().map(|kind| (kind, 0)).collect(),
            flags: BTreeSet::new(),
        }
    }
}

impl DreadStatus {
    /// Pure and total: unreadable or absent sections give the closed status.
    pub fn parse(page: &str) -> Self {
        let mut status = Self::default();
        let log = between(page, SECTION_START, SECTION_END);
        if log.is_empty() {
            return status;
        }
        status.open = true;
        status.sheets = sum_counts(log, SHEETS_PREFIX, SHEETS_SUFFIX);

        for (what, where_) in scan_pairs(log, BANISH_OPEN, BANISH_MID, BANISH_CLOSE) {
            let (Some(kind), Some(place)) = (Monster::from_plural(what), Place::from_name(where_))
            else {
                continue;
            };
            let Some(index) = place.index_of(kind) else {
                continue;
            };
            *status.banished.entry(kind).or_default() += 1;
            *status.tilt.entry(place).or_default() += if index == 0 { -1 } else { 1 };
        }

        for body in scan_after(log, KILL_MARKER, KILL_CLOSE) {
            let Some((who, count)) = parse_defeat(body) else {
                continue;
            };
            if let Some(kind) = Monster::from_name(who) {
                let kills = status.kills.entry(kind.home()).or_default();
                *kills = kills.saturating_add(count);
            }
        }

        for (phrase, flag) in FLAG_PHRASES {
            if log.contains(phrase) {
                status.flags.insert((*flag).to_string());
            }
        }
        status
    }

    /// Replaces every field with what `page` says; never merges with the old state.
    pub fn refresh(&mut self, page: &str) {
        *self = Self::parse(page);
    }

    pub fn kills(&self, place: Place) -> u32 {
        self.kills.get(&place).copied().unwrap_or(0)
    }

    pub fn tilt(&self, place: Place) -> i32 {
        self.tilt.get(&place).copied().unwrap_or(0)
    }

    pub fn banished(&self, monster: Monster) -> u32 {
        self.banished.get(&monster).copied().unwrap_or(0)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn tilt_label(&self, place: Place) -> String {
        let amount = self.tilt(place);
        if amount == 0 {
            return "no tilt".to_string();
        }
        let toward = place.population()[if amount > 0 { 0 } else { 1 }];
        format!("towards {} x{}", toward.name(), amount.unsigned_abs())
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            format!(
                "Dread Status: {}",
                if self.open { "Open" } else { "Closed" }
            ),
            format!("Sheets: {}", self.sheets),
        ];
        for place in Place::ALL {
            out.push(format!("Kills in {}: {}", place.name(), self.kills(place)));
        }
        for place in Place::ALL {
            out.push(format!("Tilt in {}: {}", place.name(), self.tilt_label(place)));
        }
        for monster in Monster::ALL {
            let count = self.banished(monster);
            if count > 0 {
                out.push(format!("Banished {} {} times", monster.name(), count));
            }
        }
        out
    }
}

impl fmt::Display for DreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("; "))
    }
}

/// `<element> <who>[ x <count>]`: `who` is the last lowercase-letter word.
fn parse_defeat(body: &str) -> Option<(&str, u32)> {
    let (rest, count) = match body.rsplit_once(" x ") {
        Some((head, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (head, digits.parse().unwrap_or(u32::MAX))
        }
        _ => (body, 1),
    };
    let who = rest.rsplit(' ').next()?;
    if who.is_empty() || !who.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some((who, count))
}
