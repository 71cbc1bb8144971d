use serde::{Deserialize, Serialize};

/// Where an item can be worn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Hat,
    Back,
    Shirt,
    Weapon,
    OffHand,
    Pants,
    Accessory,
    Familiar,
}

/// A concrete equipment slot. Accessories expand to three interchangeable slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Hat,
    Back,
    Shirt,
    Weapon,
    OffHand,
    Pants,
    Acc1,
    Acc2,
    Acc3,
    Familiar,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::Hat,
        Slot::Back,
        Slot::Shirt,
        Slot::Weapon,
        Slot::OffHand,
        Slot::Pants,
        Slot::Acc1,
        Slot::Acc2,
        Slot::Acc3,
        Slot::Familiar,
    ];

    pub const ACCESSORIES: [Slot; 3] = [Slot::Acc1, Slot::Acc2, Slot::Acc3];

    pub fn kind(self) -> SlotKind {
        match self {
            Slot::Hat => SlotKind::Hat,
            Slot::Back => SlotKind::Back,
            Slot::Shirt => SlotKind::Shirt,
            Slot::Weapon => SlotKind::Weapon,
            Slot::OffHand => SlotKind::OffHand,
            Slot::Pants => SlotKind::Pants,
            Slot::Acc1 | Slot::Acc2 | Slot::Acc3 => SlotKind::Accessory,
            Slot::Familiar => SlotKind::Familiar,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Hat => "hat",
            Slot::Back => "back",
            Slot::Shirt => "shirt",
            Slot::Weapon => "weapon",
            Slot::OffHand => "off-hand",
            Slot::Pants => "pants",
            Slot::Acc1 => "acc1",
            Slot::Acc2 => "acc2",
            Slot::Acc3 => "acc3",
            Slot::Familiar => "familiar",
        }
    }
}

impl SlotKind {
    /// Concrete slots an item of this kind may occupy, in fill order.
    pub fn slots(self) -> &'static [Slot] {
        match self {
            SlotKind::Hat => &[Slot::Hat],
            SlotKind::Back => &[Slot::Back],
            SlotKind::Shirt => &[Slot::Shirt],
            SlotKind::Weapon => &[Slot::Weapon],
            SlotKind::OffHand => &[Slot::OffHand],
            SlotKind::Pants => &[Slot::Pants],
            SlotKind::Accessory => &Slot::ACCESSORIES,
            SlotKind::Familiar => &[Slot::Familiar],
        }
    }
}

/// Numeric modifiers the optimizer knows how to weigh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    FamiliarWeight,
    MeatDrop,
    ItemDrop,
    FamiliarActionBonus,
}

impl Stat {
    pub fn label(self) -> &'static str {
        match self {
            Stat::FamiliarWeight => "Familiar Weight",
            Stat::MeatDrop => "Meat Drop",
            Stat::ItemDrop => "Item Drop",
            Stat::FamiliarActionBonus => "Familiar Action Bonus",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Modifiers {
    #[serde(default)]
    pub familiar_weight: f64,
    #[serde(default)]
    pub meat_drop: f64,
    #[serde(default)]
    pub item_drop: f64,
    #[serde(default)]
    pub familiar_action_bonus: f64,
}

impl Modifiers {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::FamiliarWeight => self.familiar_weight,
            Stat::MeatDrop => self.meat_drop,
            Stat::ItemDrop => self.item_drop,
            Stat::FamiliarActionBonus => self.familiar_action_bonus,
        }
    }

    pub fn add(&mut self, other: &Modifiers) {
        self.familiar_weight += other.familiar_weight;
        self.meat_drop += other.meat_drop;
        self.item_drop += other.item_drop;
        self.familiar_action_bonus += other.familiar_action_bonus;
    }
}

/// One weighted term of the maximizer objective, e.g. `4.4 Familiar Weight`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModifierTarget {
    pub stat: Stat,
    pub weight: f64,
}

impl ModifierTarget {
    pub fn new(stat: Stat, weight: f64) -> Self {
        Self { stat, weight }
    }

    pub fn score(&self, modifiers: &Modifiers) -> f64 {
        self.weight * modifiers.get(self.stat)
    }
}

impl std::fmt::Display for ModifierTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.weight, self.stat.label())
    }
}
