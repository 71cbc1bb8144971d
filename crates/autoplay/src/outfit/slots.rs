use super::Loadout;
use ghostrider_core::{GameConfig, SessionState, Slot, SlotKind};

/// Single-slot kinds in the order they are filled.
const FILL_ORDER: [SlotKind; 7] = [
    SlotKind::Hat,
    SlotKind::Back,
    SlotKind::Shirt,
    SlotKind::Weapon,
    SlotKind::OffHand,
    SlotKind::Pants,
    SlotKind::Familiar,
];

/// Flat bonus plus weighted modifier score of one item under the loadout's targets.
pub fn item_score(config: &GameConfig, loadout: &Loadout, item: &str) -> f64 {
    let modifiers = config.item_modifiers(item);
    let bonus = loadout.bonuses.get(item).copied().unwrap_or(0.0);
    bonus
        + loadout
            .modifiers
            .iter()
            .map(|target| target.score(&modifiers))
            .sum::<f64>()
}

/// Fill every slot still open with the best owned item, then hand out the
/// accessory slots greedily by descending score.
pub fn fill_open_slots(config: &GameConfig, state: &SessionState, loadout: &mut Loadout) {
    let candidates: Vec<(&str, SlotKind, f64)> = state
        .items
        .iter()
        .filter(|(_, amount)| **amount > 0)
        .filter_map(|(item, _)| {
            let kind = config.item_slot(item)?;
            if loadout.wears(item) {
                return None;
            }
            let score = item_score(config, loadout, item);
            (score > 0.0).then_some((item.as_str(), kind, score))
        })
        .collect();

    for kind in FILL_ORDER {
        if kind == SlotKind::Familiar && loadout.familiar.is_none() {
            continue;
        }
        let slot = kind.slots()[0];
        if loadout.slots.contains_key(&slot) {
            continue;
        }
        let mut best: Option<(&str, f64)> = None;
        for (item, item_kind, score) in &candidates {
            if *item_kind != kind || loadout.wears(item) {
                continue;
            }
            if best.map_or(true, |(_, top)| *score > top) {
                best = Some((*item, *score));
            }
        }
        if let Some((item, _)) = best {
            loadout.slots.insert(slot, item.to_string());
        }
    }

    let mut accessories: Vec<(&str, f64)> = candidates
        .iter()
        .filter(|(item, kind, _)| *kind == SlotKind::Accessory && !loadout.wears(item))
        .map(|(item, _, score)| (*item, *score))
        .collect();
    accessories.sort_by(|a, b| b.1.total_cmp(&a.1));
    let free: Vec<Slot> = Slot::ACCESSORIES
        .iter()
        .take(config.rules.accessory_slots)
        .filter(|slot| !loadout.slots.contains_key(slot))
        .copied()
        .collect();
    for (slot, (item, _)) in free.into_iter().zip(accessories) {
        loadout.slots.insert(slot, item.to_string());
    }
}
