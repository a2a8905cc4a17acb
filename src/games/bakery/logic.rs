//! Cake game logic — stage transitions, trackers, and timers. Pure
//! functions over [`BakeryState`], fully testable, no strings attached:
//! every command reports a typed outcome and the presentation layer turns
//! it into whatever notification it likes.

use super::state::{
    AddOutcome, BakeryState, Character, CommandError, DecorOutcome, DialogueStep, Guard, Stage,
};

/// Advance the game by `delta_ticks` ticks (at 10 ticks/sec). Ticks are
/// routed only to the timer owned by the active stage, so a timer left
/// over from a previous run can never fire.
pub fn tick(state: &mut BakeryState, delta_ticks: u32) {
    if delta_ticks == 0 {
        return;
    }
    state.anim_frame = state.anim_frame.wrapping_add(delta_ticks);
    state.add_flash = state.add_flash.saturating_sub(delta_ticks);

    match state.stage() {
        Stage::Baking => {
            if state.oven.tick(delta_ticks) {
                // The oven-done event is the sole driver of this edge.
                let moved = advance(state, Stage::Decoration);
                debug_assert!(moved.is_ok());
            }
        }
        Stage::Blackout => {
            if state.blackout.tick(delta_ticks) {
                let moved = advance(state, Stage::ShadowKitchen);
                debug_assert!(moved.is_ok());
            }
        }
        _ => {}
    }
}

/// Whether the guard on the edge into `plan[idx]` currently holds.
fn guard_holds(state: &BakeryState, idx: usize) -> bool {
    match state.config.plan[idx].guard {
        Guard::Open => true,
        Guard::RecipeComplete => state.recipe.is_complete(),
        Guard::BakeDone => state.oven.is_done(),
        Guard::DecorationsReady => state.tray.count() >= state.config.min_decorations,
        Guard::DialogueExhausted => state.config.plan[idx - 1]
            .stage
            .dialogue_phase()
            .is_some_and(|phase| state.dialogue.phase > phase),
        Guard::TimerElapsed => state.blackout.fired(),
    }
}

/// Attempt the transition into `target`. Succeeds only when `target` is
/// the stage immediately following the current one in the plan AND its
/// entry guard holds; otherwise the state is left untouched. Stages can
/// never be skipped, whatever the argument.
pub fn advance(state: &mut BakeryState, target: Stage) -> Result<(), CommandError> {
    let next_idx = state.stage_idx + 1;
    let Some(node) = state.config.plan.get(next_idx) else {
        return Err(CommandError::GuardNotSatisfied);
    };
    if node.stage != target || !guard_holds(state, next_idx) {
        return Err(CommandError::GuardNotSatisfied);
    }
    state.stage_idx = next_idx;
    on_enter(state);
    Ok(())
}

/// Stage entry effects: arm the timer the stage owns. Arming zeroes any
/// prior progress, so re-entry after a reset always starts clean.
fn on_enter(state: &mut BakeryState) {
    match state.stage() {
        Stage::Baking => state.oven.arm(),
        Stage::Blackout => state.blackout.arm(state.config.blackout_ticks),
        _ => {}
    }
}

/// Pick a baker on the title screen. Valid only from `Start`.
pub fn select_character(state: &mut BakeryState, who: Character) -> Result<(), CommandError> {
    if state.stage() != Stage::Start {
        return Err(CommandError::GuardNotSatisfied);
    }
    state.character = Some(who);
    advance(state, Stage::Ingredients)
}

/// Add one unit of an ingredient to the bowl.
pub fn add_ingredient(state: &mut BakeryState, id: &str) -> Result<AddOutcome, CommandError> {
    if state.stage() != Stage::Ingredients {
        return Err(CommandError::GuardNotSatisfied);
    }
    let outcome = state.recipe.add_unit(id)?;
    if matches!(outcome, AddOutcome::Added { .. }) {
        state.add_flash = 3;
    }
    Ok(outcome)
}

/// Put the batter in the oven. Requires every ingredient at its count.
pub fn start_baking(state: &mut BakeryState) -> Result<(), CommandError> {
    advance(state, Stage::Baking)
}

/// Place a decoration on the baked cake.
pub fn add_decoration(state: &mut BakeryState, id: &str) -> Result<DecorOutcome, CommandError> {
    if state.stage() != Stage::Decoration {
        return Err(CommandError::GuardNotSatisfied);
    }
    let outcome = state.tray.add(id)?;
    if matches!(outcome, DecorOutcome::Placed { .. }) {
        state.add_flash = 3;
    }
    Ok(outcome)
}

/// Declare the cake finished. Requires the decoration minimum.
pub fn finish_cake(state: &mut BakeryState) -> Result<(), CommandError> {
    advance(state, Stage::Complete)
}

/// Leave the shadow-kitchen reveal and start gathering ingredients
/// (story). An unconditional user-triggered edge.
pub fn begin_prep(state: &mut BakeryState) -> Result<(), CommandError> {
    if state.stage() != Stage::ShadowKitchen {
        return Err(CommandError::GuardNotSatisfied);
    }
    advance(state, Stage::Ingredients)
}

/// Show the next dialogue line. On phase exhaustion the stage machine
/// moves on; the last phase's exhaustion enters the blackout, whose timer
/// then drives the reveal.
pub fn advance_dialogue(state: &mut BakeryState) -> Result<DialogueStep, CommandError> {
    let Some(phase) = state.stage().dialogue_phase() else {
        return Err(CommandError::GuardNotSatisfied);
    };
    debug_assert_eq!(state.dialogue.phase, phase);

    let step = state.dialogue.advance(&state.config.script);
    if step == DialogueStep::PhaseExhausted {
        if let Some(next) = state.config.plan.get(state.stage_idx + 1).map(|n| n.stage) {
            let moved = advance(state, next);
            debug_assert!(moved.is_ok());
        }
    }
    Ok(step)
}

/// Return to the plan's first stage and clear all derived state. Always
/// succeeds, from any stage. Timer cancellation is unconditional.
pub fn reset(state: &mut BakeryState) {
    state.stage_idx = 0;
    state.character = state.config.fixed_character;
    state.recipe.reset_all();
    state.tray.reset_all();
    state.oven.cancel();
    state.blackout.cancel();
    state.dialogue.reset();
    state.add_flash = 0;
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::games::bakery::config;
    use proptest::prelude::*;

    /// Every external event the shell can feed the core.
    #[derive(Clone, Debug)]
    enum Cmd {
        SelectVanilla,
        SelectShadow,
        AddIngredient(usize),
        StartBaking,
        AddDecoration(usize),
        FinishCake,
        AdvanceDialogue,
        BeginPrep,
        Reset,
        Tick(u32),
    }

    fn arb_cmd() -> impl Strategy<Value = Cmd> {
        prop_oneof![
            Just(Cmd::SelectVanilla),
            Just(Cmd::SelectShadow),
            (0usize..6).prop_map(Cmd::AddIngredient),
            Just(Cmd::StartBaking),
            (0usize..5).prop_map(Cmd::AddDecoration),
            Just(Cmd::FinishCake),
            Just(Cmd::AdvanceDialogue),
            Just(Cmd::BeginPrep),
            Just(Cmd::Reset),
            (0u32..80).prop_map(Cmd::Tick),
        ]
    }

    fn apply(state: &mut BakeryState, cmd: &Cmd) {
        match cmd {
            Cmd::SelectVanilla => {
                let _ = select_character(state, Character::PureVanilla);
            }
            Cmd::SelectShadow => {
                let _ = select_character(state, Character::ShadowMilk);
            }
            Cmd::AddIngredient(i) => {
                let id = state.recipe.items[i % state.recipe.items.len()].id;
                let _ = add_ingredient(state, id);
            }
            Cmd::StartBaking => {
                let _ = start_baking(state);
            }
            Cmd::AddDecoration(i) => {
                let id = state.tray.items[i % state.tray.items.len()].id;
                let _ = add_decoration(state, id);
            }
            Cmd::FinishCake => {
                let _ = finish_cake(state);
            }
            Cmd::AdvanceDialogue => {
                let _ = advance_dialogue(state);
            }
            Cmd::BeginPrep => {
                let _ = begin_prep(state);
            }
            Cmd::Reset => reset(state),
            Cmd::Tick(n) => tick(state, *n),
        }
    }

    proptest! {
        #[test]
        fn prop_classic_invariants_hold(cmds in prop::collection::vec(arb_cmd(), 0..200)) {
            let mut state = BakeryState::new(config::classic());
            for cmd in &cmds {
                apply(&mut state, cmd);
                prop_assert!(state.stage_idx < state.config.plan.len());
                for item in &state.recipe.items {
                    prop_assert!(item.current <= item.required);
                }
                let pct = state.recipe.progress_percent();
                prop_assert!((0.0..=100.0).contains(&pct));
                prop_assert!(state.oven.progress() <= 100);
            }
        }

        #[test]
        fn prop_story_invariants_hold(cmds in prop::collection::vec(arb_cmd(), 0..200)) {
            let mut state = BakeryState::new(config::story());
            for cmd in &cmds {
                apply(&mut state, cmd);
                prop_assert!(state.stage_idx < state.config.plan.len());
                // While a dialogue stage is active there is always a line
                if state.stage().dialogue_phase().is_some() {
                    prop_assert!(state.current_line().is_some());
                }
                prop_assert!(state.tray.count() <= state.tray.items.len() as u32);
            }
        }

        #[test]
        fn prop_oven_partitions_fire_once(
            splits in prop::collection::vec(1u32..20, 1..40)
        ) {
            // However 55+ ticks are sliced up, the oven completes exactly once.
            let mut oven = crate::games::bakery::state::OvenTimer::new(2, 5);
            oven.arm();
            let mut events = 0;
            for d in &splits {
                if oven.tick(*d) {
                    events += 1;
                }
            }
            let total: u32 = splits.iter().sum();
            if total >= 55 {
                prop_assert_eq!(events, 1);
                prop_assert!(oven.is_done());
            } else {
                prop_assert_eq!(events, 0);
            }
        }

        #[test]
        fn prop_reset_always_restores_initial_stage(
            cmds in prop::collection::vec(arb_cmd(), 0..100)
        ) {
            for mut state in [BakeryState::new(config::classic()), BakeryState::new(config::story())] {
                for cmd in &cmds {
                    apply(&mut state, cmd);
                }
                reset(&mut state);
                prop_assert_eq!(state.stage_idx, 0);
                prop_assert_eq!(state.recipe.total_added(), 0);
                prop_assert_eq!(state.tray.count(), 0);
                prop_assert_eq!(state.oven.progress(), 0);
                prop_assert_eq!(state.character, state.config.fixed_character);
            }
        }
    }
}
