use crate::{
    AutoplayError, CombatStrategy, Command, EquipmentRequest, Location, Purpose, Task,
    TaskContext, WandererKind, WandererRequest, COMBAT_LOST_PROPERTY,
};
use ghostrider_core::{SessionState, Sobriety};

const KRAMCO: &str = "Kramco Sausage-o-Matic™";
const SOURCE_TERMINAL: &str = "Source terminal";

pub fn global_tasks() -> Vec<Task> {
    vec![
        Task::plain(
            "Search the Mall",
            |ctx| ctx.property_bool("_ghostrider_mallPricesChecked"),
            |ctx| {
                ctx.execute(Command::cli("mallprices allitems"))?;
                ctx.set_property("_ghostrider_mallPricesChecked", "true");
                Ok(())
            },
        ),
        Task::plain(
            "Acquire Kgnee",
            |ctx| ctx.property_bool("_ghostrider_checkedGnome"),
            |ctx| {
                ctx.execute(Command::visit("arena.php"))?;
                ctx.execute(Command::RunChoice { option: 4 })?;
                ctx.set_property("_ghostrider_checkedGnome", "true");
                Ok(())
            },
        )
        .ready(|ctx| {
            let state = ctx.state();
            state.have_familiar("Reagnimated Gnome")
                && !state.have_item("gnomish housemaid's kgnee")
                && !state.property_bool("_ghostrider_checkedGnome")
        })
        .equipment(EquipmentRequest::new().familiar("Reagnimated Gnome"))
        .limit(1),
        Task::plain(
            "Ow!",
            |ctx| ctx.counters().hp > 0,
            |_| {
                Err(AutoplayError::hook(
                    "Ow!",
                    "I don't want to be remembered at all. If I'm being remembered, it means I'm dead. (0 hp)",
                ))
            },
        ),
        Task::plain(
            "Check combat lost",
            |ctx| !ctx.property_bool(COMBAT_LOST_PROPERTY),
            |_| Err(AutoplayError::hook("Check combat lost", "Lost in combat!")),
        ),
        Task::plain(
            "You cannot live in fear. (Lick wounds)",
            |ctx| !ctx.state().have_effect("Beaten Up"),
            |ctx| ctx.execute(Command::use_skill("Tongue of the Walrus")),
        )
        .ready(|ctx| ctx.state().have_skill("Tongue of the Walrus")),
        Task::plain(
            "Sweat Out some Booze",
            |ctx| ctx.property_int("_sweatOutSomeBoozeUsed") >= 3,
            |ctx| ctx.execute(Command::use_skill("Sweat Out Some Booze")),
        )
        .ready(|ctx| ctx.counters().inebriety > 0 && ctx.property_int("sweat") >= 25)
        .equipment(EquipmentRequest::new().item("designer sweatpants"))
        .sobriety(Sobriety::Sober),
        Task::plain(
            "Magical Sausage",
            |ctx| {
                let counters = ctx.counters();
                ctx.property_int("_sausagesEaten") >= 23 || counters.fullness > counters.fullness_limit
            },
            |ctx| {
                ctx.execute(Command::retrieve("magical sausage", 1))?;
                ctx.execute(Command::eat("magical sausage"))
            },
        )
        .ready(|ctx| {
            let state = ctx.state();
            ["magical sausage", "magical sausage casing"]
                .iter()
                .any(|item| state.have_item(item))
                && [KRAMCO, "replica Kramco Sausage-o-Matic™"]
                    .iter()
                    .any(|item| state.have_item(item))
        }),
        Task::plain(
            "License to Chill",
            |ctx| ctx.property_bool("_licenseToChillUsed"),
            |ctx| ctx.execute(Command::use_item("License to Chill")),
        )
        .ready(|ctx| ctx.have_item("License to Chill")),
        Task::plain(
            "Fill Pantsgiving Fullness",
            |ctx| {
                let counters = ctx.counters();
                counters.fullness >= counters.fullness_limit
            },
            fill_pantsgiving_fullness,
        )
        .ready(|ctx| {
            let state = ctx.state();
            !["Vampyre", "Grey Goo"].contains(&state.class.as_str())
                && state.counters.fullness + 1 == state.counters.fullness_limit
        }),
        Task::plain(
            "Tune Snapper",
            |ctx| ctx.state().property("redSnapperPhylum") == Some("dude"),
            |ctx| ctx.execute(Command::cli("snapper dude")),
        )
        .ready(|ctx| ctx.run.settings.familiar.as_deref() == Some("Red-Nosed Snapper")),
        Task::new(
            "June Cleaver",
            |ctx| !ctx.have_item("June cleaver") || ctx.property_int("_juneCleaverFightsLeft") != 0,
            |ctx| {
                let target = if ctx.counters().is_drunk() {
                    "Drunken Stupor"
                } else {
                    "Noob Cave"
                };
                Ok(Some(Location::new(target)))
            },
        )
        .equipment(EquipmentRequest::new().item("June cleaver"))
        .combat(CombatStrategy::new().abort()),
        Task::plain(
            "Terminal Skills",
            |ctx| terminal_skills_current(ctx.state(), &["extract.edu", "duplicate.edu"]),
            |ctx| {
                ctx.execute(Command::cli("terminal educate extract.edu"))?;
                ctx.execute(Command::cli("terminal educate duplicate.edu"))
            },
        )
        .ready(|ctx| ctx.have_item(SOURCE_TERMINAL)),
        Task::new(
            "Proton Ghost",
            |ctx| ctx.state().property("questPAGhost") == Some("unstarted"),
            |ctx| match ctx.state().property("ghostLocation") {
                Some(location) if !location.is_empty() => Ok(Some(Location::new(location))),
                _ => Err(AutoplayError::hook(
                    "Proton Ghost",
                    "Failed to find proper ghost location",
                )),
            },
        )
        .ready(|ctx| {
            ctx.have_item("protonic accelerator pack")
                && ctx.state().property("ghostLocation").is_some_and(|location| !location.is_empty())
        })
        .equipment(EquipmentRequest::new().item("protonic accelerator pack"))
        .combat(
            CombatStrategy::new()
                .try_skill("Shoot Ghost")
                .try_skill("Shoot Ghost")
                .try_skill("Shoot Ghost")
                .try_skill("Trap Ghost"),
        ),
        wanderer_task(
            "Vote Wanderer",
            WandererKind::Wanderer,
            true,
            |ctx| {
                ctx.property_int("lastVoteMonsterTurn") == i64::from(ctx.counters().turns_played)
            },
            &["\"I Voted!\" sticker"],
        )
        .ready(|ctx| {
            ctx.have_item("\"I Voted!\" sticker")
                && ctx.counters().turns_played % 11 == 1
                && ctx.property_int("_voteFreeFights") < 3
        }),
        wanderer_task(
            "Digitize Wanderer",
            WandererKind::Wanderer,
            true,
            |ctx| counter_turns(ctx.state(), "Digitize").map_or(true, |turns| turns > 0),
            &[],
        )
        .prepare(|ctx| {
            if should_redigitize(ctx.state()) {
                ctx.execute(Command::cli("terminal educate digitize.edu"))?;
                ctx.execute(Command::cli("terminal educate extract.edu"))?;
            }
            Ok(())
        })
        .post(|ctx| {
            if ctx.property_int("_sourceTerminalDigitizeMonsterCount") == 0 {
                ctx.run.memory.digitize_initialized = false;
            }
            Ok(())
        })
        .contest(Purpose::Digitize, |_| {
            CombatStrategy::new()
                .try_skill("Digitize")
                .then(CombatStrategy::standard())
        }),
        wanderer_task(
            "Void Monster",
            WandererKind::Wanderer,
            true,
            |ctx| ctx.property_int("_voidFreeFights") >= 5,
            &["cursed magnifying glass"],
        )
        .ready(|ctx| {
            ctx.have_item("cursed magnifying glass")
                && ctx.property_int("cursedMagnifyingGlassCount") == 13
        }),
        wanderer_task(
            "Kramco",
            WandererKind::Wanderer,
            true,
            |ctx| kramco_wanderer_chance(ctx.state()) < 1.0,
            &[KRAMCO],
        )
        .ready(|ctx| ctx.have_item(KRAMCO))
        .post(mark_digitize_initialized),
        wanderer_task(
            "Yellow Ray: Fondeluge",
            WandererKind::YellowRay,
            false,
            |ctx| ctx.state().have_effect("Everything Looks Yellow"),
            &[],
        )
        .ready(|ctx| ctx.state().have_skill("Fondeluge"))
        .post(mark_digitize_initialized)
        .combat(
            CombatStrategy::new()
                .try_have_skill("Duplicate")
                .try_skill("Fondeluge")
                .abort(),
        ),
        wanderer_task(
            "Yellow Ray: Jurassic Parka",
            WandererKind::YellowRay,
            false,
            |ctx| ctx.state().have_effect("Everything Looks Yellow"),
            &["Jurassic Parka"],
        )
        .ready(|ctx| ctx.have_item("Jurassic Parka") && ctx.state().have_skill("Torso Awareness"))
        .prepare(|ctx| ctx.execute(Command::cli("parka dilophosaur")))
        .post(mark_digitize_initialized)
        .combat(
            CombatStrategy::new()
                .try_have_skill("Duplicate")
                .try_skill("Spit jurassic acid")
                .abort(),
        ),
        wanderer_task(
            "Free-for-All",
            WandererKind::FreeFight,
            false,
            |ctx| ctx.state().have_effect("Everything Looks Red"),
            &[],
        )
        .ready(|ctx| ctx.state().have_skill("Free-For-All"))
        .post(mark_digitize_initialized)
        .combat(CombatStrategy::new().skill("Free-For-All")),
        wanderer_task(
            "Initialize Digitize",
            WandererKind::Backup,
            false,
            |ctx| ctx.run.memory.digitize_initialized,
            &[],
        )
        .post(mark_digitize_initialized)
        .combat(CombatStrategy::new().runaway()),
    ]
}

/// Contested task whose target, choices and gear come from the wanderer manager.
fn wanderer_task<C>(
    name: &str,
    kind: WandererKind,
    drunk_safe: bool,
    completed: C,
    equip: &'static [&'static str],
) -> Task
where
    C: Fn(&TaskContext<'_>) -> bool + 'static,
{
    let request = WandererRequest { kind, drunk_safe };
    let task = Task::new(name, completed, move |ctx| {
        ctx.session
            .wanderer(request)
            .map(|target| Some(target.location))
    })
    .choices(move |ctx| ctx.session.wanderer(request).map(|target| target.choices))
    .equipment_with(move |ctx| {
        let target = ctx.session.wanderer(request)?;
        Ok(EquipmentRequest::new()
            .items(target.equipment)
            .items(equip.iter().copied()))
    })
    .combat(CombatStrategy::standard());
    if drunk_safe {
        task
    } else {
        task.sobriety(Sobriety::Sober)
    }
}

fn mark_digitize_initialized(ctx: &mut TaskContext<'_>) -> Result<(), AutoplayError> {
    ctx.run.memory.digitize_initialized = true;
    Ok(())
}

fn fill_pantsgiving_fullness(ctx: &mut TaskContext<'_>) -> Result<(), AutoplayError> {
    let Some(rule) = ctx.run.config().pantsgiving.clone() else {
        return Err(AutoplayError::hook(
            "Fill Pantsgiving Fullness",
            "no pantsgiving food configured",
        ));
    };
    if !ctx.property_bool(&rule.spork_used) {
        ctx.execute(Command::retrieve(&rule.spork, 1))?;
        ctx.execute(Command::eat(&rule.spork))?;
    }
    ctx.execute(Command::retrieve(&rule.food, 1))?;
    ctx.execute(Command::eat(&rule.food))
}

/// Chance that the next adventure brings a sausage goblin.
pub fn kramco_wanderer_chance(state: &SessionState) -> f64 {
    let fights = state.property_int("_sausageFights");
    if fights == 0 {
        return 1.0;
    }
    let since = i64::from(state.counters.turns_played) - state.property_int("_lastSausageMonsterTurn");
    let needed = 5 + fights * 3 + (fights - 5).max(0).pow(3);
    ((since + 1) as f64 / needed as f64).min(1.0)
}

/// Turns until the first relay counter whose label contains `label`.
/// Counters are stored as `turn:label:image` triples.
pub fn counter_turns(state: &SessionState, label: &str) -> Option<i64> {
    let raw = state.property("relayCounters")?;
    let parts: Vec<&str> = raw.split(':').collect();
    parts.chunks(3).find_map(|chunk| match chunk {
        [turn, name, ..] if name.contains(label) => turn
            .trim()
            .parse::<i64>()
            .ok()
            .map(|turn| turn - i64::from(state.counters.turns_played)),
        _ => None,
    })
}

fn terminal_skills_current(state: &SessionState, skills: &[&str]) -> bool {
    let current = [
        state.property("sourceTerminalEducate1").unwrap_or(""),
        state.property("sourceTerminalEducate2").unwrap_or(""),
    ];
    skills.iter().all(|skill| current.contains(skill))
}

/// Re-digitize when the remaining uses would pay off faster than the adventures left.
pub fn should_redigitize(state: &SessionState) -> bool {
    if !state.have_item(SOURCE_TERMINAL) {
        return false;
    }
    let chips = state.property("sourceTerminalChips").unwrap_or("");
    let maximum = 1
        + i64::from(chips.split(',').any(|chip| chip.trim() == "TRAM"))
        + i64::from(chips.split(',').any(|chip| chip.trim() == "TRIGRAM"));
    let remaining = maximum - state.property_int("_sourceTerminalDigitizeUses");
    let count = state.property_int("_sourceTerminalDigitizeMonsterCount");
    (state.counters.adventures as f64) * 1.1 < (remaining * (5 * (count * (1 + count)) - 3)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kramco_chance_grows_with_turns_since_last_fight() {
        let mut state = SessionState::default();
        assert_eq!(kramco_wanderer_chance(&state), 1.0);
        state.set_property("_sausageFights", "2");
        state.set_property("_lastSausageMonsterTurn", "10");
        state.counters.turns_played = 12;
        assert!((kramco_wanderer_chance(&state) - 3.0 / 11.0).abs() < 1e-12);
        state.counters.turns_played = 40;
        assert_eq!(kramco_wanderer_chance(&state), 1.0);
    }

    #[test]
    fn relay_counter_reports_turns_remaining() {
        let mut state = SessionState::default();
        assert_eq!(counter_turns(&state, "Digitize"), None);
        state.counters.turns_played = 100;
        state.set_property("relayCounters", "107:Digitize Monster:watch.gif:120:Fortune:x.gif");
        assert_eq!(counter_turns(&state, "Digitize"), Some(7));
        assert_eq!(counter_turns(&state, "Fortune"), Some(20));
    }

    #[test]
    fn terminal_skill_order_does_not_matter() {
        let mut state = SessionState::default();
        state.set_property("sourceTerminalEducate1", "duplicate.edu");
        state.set_property("sourceTerminalEducate2", "extract.edu");
        assert!(terminal_skills_current(&state, &["extract.edu", "duplicate.edu"]));
        state.set_property("sourceTerminalEducate2", "digitize.edu");
        assert!(!terminal_skills_current(&state, &["extract.edu", "duplicate.edu"]));
    }
}
