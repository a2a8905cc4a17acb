/// Cake game state definitions: the stage plan, the two item trackers,
/// the oven timer, and the dialogue cursor.

/// The two playable cookies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    PureVanilla,
    ShadowMilk,
}

impl Character {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Character::PureVanilla => "ピュアバニラクッキー",
            Character::ShadowMilk => "シャドウミルククッキー",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Character::PureVanilla => "🌼",
            Character::ShadowMilk => "🌙",
        }
    }
}

/// Cosmetic delivery tag on a dialogue line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emotion {
    Gentle,
    Cheerful,
    Mischief,
    Laugh,
    Surprised,
    Dark,
}

/// One scripted line. Ordering within a phase is fixed and significant.
#[derive(Clone, Debug)]
pub struct DialogueLine {
    pub speaker: Character,
    pub text: &'static str,
    pub emotion: Emotion,
}

/// The full conversation script: one line sequence per dialogue phase,
/// traversed strictly in order.
#[derive(Clone, Debug)]
pub struct DialogueScript {
    pub phases: Vec<Vec<DialogueLine>>,
}

impl DialogueScript {
    pub fn empty() -> Self {
        Self { phases: Vec::new() }
    }
}

/// Result of advancing the dialogue cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueStep {
    /// Moved to the next line of the same phase.
    Spoke,
    /// The phase had no further lines; the cursor moved to line 0 of the
    /// next phase and the stage machine should transition.
    PhaseExhausted,
}

/// Position within the script: phase index + zero-based line index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DialogueCursor {
    pub phase: usize,
    pub line: usize,
}

impl DialogueCursor {
    pub fn advance(&mut self, script: &DialogueScript) -> DialogueStep {
        let len = script.phases.get(self.phase).map_or(0, |p| p.len());
        if self.line + 1 < len {
            self.line += 1;
            DialogueStep::Spoke
        } else {
            self.phase += 1;
            self.line = 0;
            DialogueStep::PhaseExhausted
        }
    }

    /// The active line, or `None` once the cursor has left the script.
    /// Stage gating keeps callers away from `None`; hitting it is an
    /// invariant violation, so the renderer just skips the box.
    pub fn current_line<'a>(&self, script: &'a DialogueScript) -> Option<&'a DialogueLine> {
        script.phases.get(self.phase)?.get(self.line)
    }

    pub fn reset(&mut self) {
        self.phase = 0;
        self.line = 0;
    }
}

/// A discrete phase of game progression. One enum covers both variants;
/// a variant's config selects an ordered subset (its stage plan).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Title screen with character select (classic).
    Start,
    /// Opening conversation (story).
    Intro,
    /// First kitchen banter phase (story).
    DialogueOne,
    /// Second banter phase; ends with the lights going out (story).
    DialogueTwo,
    /// Dark interstitial before the hidden kitchen is revealed (story).
    Blackout,
    /// The shadow kitchen reveal (story).
    ShadowKitchen,
    /// Gather ingredients into the bowl.
    Ingredients,
    /// The sponge is in the oven.
    Baking,
    /// Decorate the baked cake.
    Decoration,
    /// Celebration screen.
    Complete,
}

impl Stage {
    /// Script phase driven while this stage is active.
    pub fn dialogue_phase(self) -> Option<usize> {
        match self {
            Stage::Intro => Some(0),
            Stage::DialogueOne => Some(1),
            Stage::DialogueTwo => Some(2),
            _ => None,
        }
    }
}

/// Precondition on the edge *into* a stage. Evaluated against tracker and
/// timer state when a transition into that stage is attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    /// Taken directly by a user command (character select, begin prep).
    Open,
    /// Every ingredient is at its required count.
    RecipeComplete,
    /// The oven has emitted its completion event for the current arming.
    BakeDone,
    /// At least `min_decorations` decorations are on the cake.
    DecorationsReady,
    /// The previous stage's dialogue phase ran out of lines.
    DialogueExhausted,
    /// The blackout one-shot has fired.
    TimerElapsed,
}

/// One node of the ordered stage plan: the stage plus the guard on the
/// edge leading into it. The first node's guard is never evaluated.
#[derive(Clone, Copy, Debug)]
pub struct StageNode {
    pub stage: Stage,
    pub guard: Guard,
}

/// The named command failures. Saturating no-ops are not errors — they are
/// reported through the outcome enums below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// A gated transition was attempted before its precondition holds.
    GuardNotSatisfied,
    /// An id absent from the configured item lists. Config error, not a
    /// user mistake — callers propagate it rather than swallowing it.
    UnknownItem,
}

// ── Recipe tracker ──────────────────────────────────────────────

/// One measured ingredient. `current` only ever moves by the add-one-unit
/// operation and by the full reset.
#[derive(Clone, Debug)]
pub struct Ingredient {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub required: u32,
    pub current: u32,
    /// Cosmetic highlight; no effect on gating.
    pub special: bool,
}

/// Outcome of adding one unit of an ingredient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added {
        current: u32,
        required: u32,
        /// This unit brought the item to exactly its required count.
        just_completed: bool,
    },
    /// Item already at its required count; nothing changed.
    AlreadyFull,
}

/// The ingredient collection and its completion predicate.
#[derive(Clone, Debug)]
pub struct RecipeBook {
    pub items: Vec<Ingredient>,
}

impl RecipeBook {
    pub fn new(items: Vec<Ingredient>) -> Self {
        Self { items }
    }

    /// Add exactly one unit. Saturates at `required`.
    pub fn add_unit(&mut self, id: &str) -> Result<AddOutcome, CommandError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CommandError::UnknownItem)?;
        if item.current < item.required {
            item.current += 1;
            Ok(AddOutcome::Added {
                current: item.current,
                required: item.required,
                just_completed: item.current == item.required,
            })
        } else {
            Ok(AddOutcome::AlreadyFull)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|i| i.current == i.required)
    }

    pub fn total_required(&self) -> u32 {
        self.items.iter().map(|i| i.required).sum()
    }

    pub fn total_added(&self) -> u32 {
        self.items.iter().map(|i| i.current).sum()
    }

    /// Aggregate progress in `[0, 100]`. Configurations are structurally
    /// non-empty, so the denominator is never zero.
    pub fn progress_percent(&self) -> f64 {
        self.total_added() as f64 / self.total_required() as f64 * 100.0
    }

    pub fn reset_all(&mut self) {
        for item in &mut self.items {
            item.current = 0;
        }
    }
}

// ── Decoration tracker ──────────────────────────────────────────

/// One topping. `added` is monotonic until the full reset.
#[derive(Clone, Debug)]
pub struct Decoration {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub added: bool,
}

/// Outcome of placing a decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorOutcome {
    Placed {
        /// Count of placed decorations after this one.
        count: u32,
    },
    /// Already on the cake; nothing changed.
    AlreadyPlaced,
}

/// The decoration set and its count predicate.
#[derive(Clone, Debug)]
pub struct DecorationTray {
    pub items: Vec<Decoration>,
}

impl DecorationTray {
    pub fn new(items: Vec<Decoration>) -> Self {
        Self { items }
    }

    pub fn add(&mut self, id: &str) -> Result<DecorOutcome, CommandError> {
        let item = self
            .items
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(CommandError::UnknownItem)?;
        if item.added {
            Ok(DecorOutcome::AlreadyPlaced)
        } else {
            item.added = true;
            Ok(DecorOutcome::Placed { count: self.count() })
        }
    }

    pub fn count(&self) -> u32 {
        self.items.iter().filter(|d| d.added).count() as u32
    }

    pub fn reset_all(&mut self) {
        for item in &mut self.items {
            item.added = false;
        }
    }
}

// ── Oven timer ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OvenPhase {
    Idle,
    Baking,
    /// Progress reached 100; the completion event fires after this many
    /// more ticks.
    Settling { ticks_left: u32 },
    Done,
}

/// Tick-driven bake progress: 0–100 while armed, then a short settling
/// delay, then one completion event per arming. Arming and cancelling are
/// unconditional state overwrites — there is no scheduled callback that
/// could fire stale after a reset.
#[derive(Clone, Debug)]
pub struct OvenTimer {
    increment: u32,
    settle_ticks: u32,
    progress: u32,
    phase: OvenPhase,
}

impl OvenTimer {
    pub fn new(increment: u32, settle_ticks: u32) -> Self {
        Self {
            increment,
            settle_ticks,
            progress: 0,
            phase: OvenPhase::Idle,
        }
    }

    /// Start (or restart) a bake from zero progress.
    pub fn arm(&mut self) {
        self.progress = 0;
        self.phase = OvenPhase::Baking;
    }

    /// Stop and zero the oven. Idempotent.
    pub fn cancel(&mut self) {
        self.progress = 0;
        self.phase = OvenPhase::Idle;
    }

    /// Advance by `delta_ticks`. Returns `true` exactly once per arming,
    /// on the tick the completion event fires.
    pub fn tick(&mut self, delta_ticks: u32) -> bool {
        for _ in 0..delta_ticks {
            match self.phase {
                OvenPhase::Baking => {
                    self.progress = (self.progress + self.increment).min(100);
                    if self.progress == 100 {
                        self.phase = OvenPhase::Settling {
                            ticks_left: self.settle_ticks,
                        };
                    }
                }
                OvenPhase::Settling { ticks_left } => {
                    if ticks_left <= 1 {
                        self.phase = OvenPhase::Done;
                        return true;
                    }
                    self.phase = OvenPhase::Settling {
                        ticks_left: ticks_left - 1,
                    };
                }
                OvenPhase::Idle | OvenPhase::Done => return false,
            }
        }
        false
    }

    /// Bake progress in `[0, 100]`.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// True once the completion event has fired for the current arming.
    pub fn is_done(&self) -> bool {
        self.phase == OvenPhase::Done
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, OvenPhase::Baking | OvenPhase::Settling { .. })
    }
}

// ── One-shot delay ──────────────────────────────────────────────

/// A cancellable one-shot tick countdown (the blackout interstitial).
/// Fires exactly once per arming; cancelling is idempotent.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneShot {
    ticks_left: Option<u32>,
    fired: bool,
}

impl OneShot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, ticks: u32) {
        self.ticks_left = Some(ticks.max(1));
        self.fired = false;
    }

    pub fn cancel(&mut self) {
        self.ticks_left = None;
        self.fired = false;
    }

    /// Advance by `delta_ticks`. Returns `true` on the call that elapses
    /// the countdown; disarmed or already-fired timers return `false`.
    pub fn tick(&mut self, delta_ticks: u32) -> bool {
        let Some(left) = self.ticks_left else {
            return false;
        };
        if left <= delta_ticks {
            self.ticks_left = None;
            self.fired = true;
            true
        } else {
            self.ticks_left = Some(left - delta_ticks);
            false
        }
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    pub fn is_armed(&self) -> bool {
        self.ticks_left.is_some()
    }
}

// ── Configuration ───────────────────────────────────────────────

/// Everything variant-specific, supplied at construction: the stage plan,
/// the item lists, the thresholds, and the timer cadences.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub title: &'static str,
    pub plan: Vec<StageNode>,
    pub ingredients: Vec<Ingredient>,
    pub decorations: Vec<Decoration>,
    /// Decorations needed before the cake can be finished.
    pub min_decorations: u32,
    /// Bake progress gained per tick.
    pub oven_increment: u32,
    /// Ticks between reaching 100 and the completion event.
    pub oven_settle_ticks: u32,
    /// Length of the blackout interstitial in ticks.
    pub blackout_ticks: u32,
    pub script: DialogueScript,
    /// Pre-assigned baker (story). `None` means the player picks one.
    pub fixed_character: Option<Character>,
}

// ── Full game state ─────────────────────────────────────────────

/// Full state of one cake game. All mutation goes through `logic`.
pub struct BakeryState {
    pub config: GameConfig,
    /// Index of the active stage in `config.plan`.
    pub stage_idx: usize,
    pub character: Option<Character>,
    pub recipe: RecipeBook,
    pub tray: DecorationTray,
    pub oven: OvenTimer,
    pub blackout: OneShot,
    pub dialogue: DialogueCursor,
    /// Animation frame counter (incremented every tick).
    pub anim_frame: u32,
    /// Feedback flash after a successful add (ticks remaining).
    pub add_flash: u32,
}

impl BakeryState {
    pub fn new(config: GameConfig) -> Self {
        let recipe = RecipeBook::new(config.ingredients.clone());
        let tray = DecorationTray::new(config.decorations.clone());
        let oven = OvenTimer::new(config.oven_increment, config.oven_settle_ticks);
        Self {
            character: config.fixed_character,
            recipe,
            tray,
            oven,
            blackout: OneShot::idle(),
            dialogue: DialogueCursor::default(),
            stage_idx: 0,
            anim_frame: 0,
            add_flash: 0,
            config,
        }
    }

    /// The active stage.
    pub fn stage(&self) -> Stage {
        self.config.plan[self.stage_idx].stage
    }

    /// The line currently on screen, if a dialogue stage is active.
    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.dialogue.current_line(&self.config.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> RecipeBook {
        RecipeBook::new(vec![
            Ingredient { id: "egg", name: "卵", icon: "🥚", required: 3, current: 0, special: false },
            Ingredient { id: "milk", name: "牛乳", icon: "🥛", required: 1, current: 0, special: false },
        ])
    }

    fn tray() -> DecorationTray {
        DecorationTray::new(vec![
            Decoration { id: "strawberry", name: "いちご", icon: "🍓", added: false },
            Decoration { id: "cherry", name: "さくらんぼ", icon: "🍒", added: false },
        ])
    }

    // ── RecipeBook ─────────────────────────────────────────────

    #[test]
    fn add_unit_increments_by_one() {
        let mut book = recipe();
        let out = book.add_unit("egg").unwrap();
        assert_eq!(
            out,
            AddOutcome::Added { current: 1, required: 3, just_completed: false }
        );
        assert_eq!(book.items[0].current, 1);
    }

    #[test]
    fn add_unit_reports_item_completion() {
        let mut book = recipe();
        book.add_unit("egg").unwrap();
        book.add_unit("egg").unwrap();
        let out = book.add_unit("egg").unwrap();
        assert_eq!(
            out,
            AddOutcome::Added { current: 3, required: 3, just_completed: true }
        );
    }

    #[test]
    fn add_unit_saturates() {
        let mut book = recipe();
        for _ in 0..3 {
            book.add_unit("egg").unwrap();
        }
        // A fourth unit changes nothing and is not an error
        assert_eq!(book.add_unit("egg").unwrap(), AddOutcome::AlreadyFull);
        assert_eq!(book.items[0].current, 3);
    }

    #[test]
    fn add_unit_unknown_id() {
        let mut book = recipe();
        assert_eq!(book.add_unit("butter"), Err(CommandError::UnknownItem));
    }

    #[test]
    fn is_complete_requires_every_item() {
        let mut book = recipe();
        for _ in 0..3 {
            book.add_unit("egg").unwrap();
        }
        assert!(!book.is_complete()); // milk still missing
        book.add_unit("milk").unwrap();
        assert!(book.is_complete());
    }

    #[test]
    fn progress_percent_tracks_totals() {
        let mut book = recipe();
        assert!((book.progress_percent() - 0.0).abs() < f64::EPSILON);
        book.add_unit("egg").unwrap();
        book.add_unit("milk").unwrap();
        // 2 of 4 units
        assert!((book.progress_percent() - 50.0).abs() < 0.001);
        book.add_unit("egg").unwrap();
        book.add_unit("egg").unwrap();
        assert!((book.progress_percent() - 100.0).abs() < 0.001);
    }

    #[test]
    fn reset_all_keeps_requirements() {
        let mut book = recipe();
        book.add_unit("egg").unwrap();
        book.reset_all();
        assert_eq!(book.total_added(), 0);
        assert_eq!(book.total_required(), 4);
    }

    // ── DecorationTray ─────────────────────────────────────────

    #[test]
    fn add_decoration_is_idempotent() {
        let mut t = tray();
        assert_eq!(t.add("strawberry").unwrap(), DecorOutcome::Placed { count: 1 });
        assert_eq!(t.add("strawberry").unwrap(), DecorOutcome::AlreadyPlaced);
        assert_eq!(t.count(), 1);
    }

    #[test]
    fn add_decoration_unknown_id() {
        let mut t = tray();
        assert_eq!(t.add("candle"), Err(CommandError::UnknownItem));
    }

    #[test]
    fn tray_reset_clears_flags() {
        let mut t = tray();
        t.add("strawberry").unwrap();
        t.add("cherry").unwrap();
        t.reset_all();
        assert_eq!(t.count(), 0);
    }

    // ── OvenTimer ──────────────────────────────────────────────

    #[test]
    fn oven_reaches_100_after_50_ticks() {
        let mut oven = OvenTimer::new(2, 5);
        oven.arm();
        assert!(!oven.tick(49));
        assert_eq!(oven.progress(), 98);
        assert!(!oven.tick(1));
        assert_eq!(oven.progress(), 100);
        assert!(!oven.is_done()); // still settling
    }

    #[test]
    fn oven_completes_once_after_settling() {
        let mut oven = OvenTimer::new(2, 5);
        oven.arm();
        oven.tick(50); // progress 100, settling starts
        assert!(!oven.tick(4));
        assert!(oven.tick(1)); // event fires on the 55th tick
        assert!(oven.is_done());
        // No second event, ever
        assert!(!oven.tick(100));
    }

    #[test]
    fn oven_single_large_delta_fires_once() {
        let mut oven = OvenTimer::new(2, 5);
        oven.arm();
        assert!(oven.tick(200));
        assert!(oven.is_done());
        assert!(!oven.tick(200));
    }

    #[test]
    fn oven_progress_never_exceeds_100() {
        let mut oven = OvenTimer::new(3, 2); // 3 does not divide 100 evenly
        oven.arm();
        oven.tick(60);
        assert_eq!(oven.progress(), 100);
    }

    #[test]
    fn oven_rearm_cancels_pending_completion() {
        let mut oven = OvenTimer::new(2, 5);
        oven.arm();
        oven.tick(52); // deep into settling
        oven.arm(); // restart before the event fires
        assert_eq!(oven.progress(), 0);
        assert!(!oven.is_done());
        // Full second run produces exactly one event
        assert!(oven.tick(55));
        assert!(!oven.tick(55));
    }

    #[test]
    fn oven_cancel_is_idempotent() {
        let mut oven = OvenTimer::new(2, 5);
        oven.arm();
        oven.tick(30);
        oven.cancel();
        oven.cancel();
        assert_eq!(oven.progress(), 0);
        assert!(!oven.is_running());
        assert!(!oven.tick(100)); // a cancelled oven never fires
    }

    // ── OneShot ────────────────────────────────────────────────

    #[test]
    fn one_shot_fires_exactly_once() {
        let mut shot = OneShot::idle();
        shot.arm(25);
        assert!(!shot.tick(24));
        assert!(shot.tick(1));
        assert!(shot.fired());
        assert!(!shot.tick(50));
    }

    #[test]
    fn one_shot_cancel_prevents_firing() {
        let mut shot = OneShot::idle();
        shot.arm(10);
        shot.cancel();
        assert!(!shot.tick(100));
        assert!(!shot.fired());
    }

    #[test]
    fn one_shot_rearm_restarts_countdown() {
        let mut shot = OneShot::idle();
        shot.arm(10);
        shot.tick(9);
        shot.arm(10); // restart with 1 tick to spare
        assert!(!shot.tick(9));
        assert!(shot.tick(1));
    }

    #[test]
    fn one_shot_disarmed_ignores_ticks() {
        let mut shot = OneShot::idle();
        assert!(!shot.tick(1000));
        assert!(!shot.is_armed());
    }

    // ── DialogueCursor ─────────────────────────────────────────

    fn two_phase_script() -> DialogueScript {
        let line = |speaker, text| DialogueLine { speaker, text, emotion: Emotion::Gentle };
        DialogueScript {
            phases: vec![
                vec![
                    line(Character::PureVanilla, "a"),
                    line(Character::ShadowMilk, "b"),
                    line(Character::PureVanilla, "c"),
                ],
                vec![line(Character::ShadowMilk, "d"), line(Character::PureVanilla, "e")],
            ],
        }
    }

    #[test]
    fn cursor_stays_in_phase_until_last_line() {
        let script = two_phase_script();
        let mut cur = DialogueCursor::default();
        // 3 lines → 2 advances stay in phase 0
        assert_eq!(cur.advance(&script), DialogueStep::Spoke);
        assert_eq!(cur.advance(&script), DialogueStep::Spoke);
        assert_eq!(cur.phase, 0);
        assert_eq!(cur.line, 2);
    }

    #[test]
    fn cursor_phase_boundary_resets_line() {
        let script = two_phase_script();
        let mut cur = DialogueCursor::default();
        cur.advance(&script);
        cur.advance(&script);
        assert_eq!(cur.advance(&script), DialogueStep::PhaseExhausted);
        assert_eq!(cur.phase, 1);
        assert_eq!(cur.line, 0);
        assert_eq!(cur.current_line(&script).unwrap().text, "d");
    }

    #[test]
    fn cursor_past_script_has_no_line() {
        let script = two_phase_script();
        let mut cur = DialogueCursor::default();
        for _ in 0..5 {
            cur.advance(&script);
        }
        assert_eq!(cur.phase, 2);
        assert!(cur.current_line(&script).is_none());
    }

    #[test]
    fn cursor_reset_returns_to_first_line() {
        let script = two_phase_script();
        let mut cur = DialogueCursor::default();
        cur.advance(&script);
        cur.advance(&script);
        cur.advance(&script);
        cur.reset();
        assert_eq!(cur, DialogueCursor { phase: 0, line: 0 });
        assert_eq!(cur.current_line(&script).unwrap().text, "a");
    }
}
