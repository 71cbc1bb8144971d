use crate::{AutoplayError, Command, Task, TaskContext};
use ghostrider_core::Monster;

const SHEETS_NEEDED: u32 = 2000;
const SKELETON_KEY: &str = "Dreadsylvanian skeleton key";

fn dready(ctx: &TaskContext<'_>) -> bool {
    ctx.run.dread.open && ctx.run.dread.sheets >= SHEETS_NEEDED
}

pub fn dread_tasks() -> Vec<Task> {
    vec![
        Task::plain(
            "Dreadsylvania Status",
            |ctx| ctx.counters().turns_played == ctx.run.memory.status_turn,
            |ctx| ctx.update_dread_status(),
        )
        .ready(|ctx| ctx.run.memory.status_turn < ctx.counters().turns_played),
        Task::plain(
            "Dread Drunk",
            |ctx| ctx.run.dread.sheets >= SHEETS_NEEDED,
            |ctx| {
                ctx.execute(Command::cli("dreaddrunk castle"))?;
                ctx.update_dread_status()
            },
        )
        .ready(|ctx| ctx.run.dread.open && ctx.run.dread.sheets < SHEETS_NEEDED),
        Task::plain(
            "Time to play some pinball! (Adjusting tilt)",
            |ctx| ctx.run.dread.banished(Monster::Zombie) >= 2,
            |ctx| ctx.execute(Command::cli("dr limit hot|cold|stench|sleaze|spooky ghost")),
        )
        .ready(dready),
        Task::plain(
            "Get some music box parts",
            |ctx| ctx.run.dread.has_flag("forest.13"),
            |ctx| {
                ctx.execute(Command::retrieve(SKELETON_KEY, 1))?;
                if !ctx.have_item(SKELETON_KEY) {
                    return Err(AutoplayError::hook(
                        "Get some music box parts",
                        "Failed to get a Dreadsylvanian skeleton key",
                    ));
                }
                ctx.execute(Command::visit("clan_dreadsylvania.php?action=forceloc&loc=1"))?;
                ctx.execute(Command::RunChoice { option: -1 })
            },
        )
        .ready(|ctx| {
            let state = ctx.state();
            dready(ctx)
                && (state.item_amount(SKELETON_KEY) > 0 || state.item_amount("Freddy Kruegerand") > 60)
                && state.class == "Accordion Thief"
        })
        .fixed_choices(&[(721, 3), (724, 1)]),
    ]
}
