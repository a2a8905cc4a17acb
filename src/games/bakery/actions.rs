//! Semantic action IDs for the cake game's click targets.
//!
//! Each constant represents a distinct clickable action in the UI.
//! These IDs are registered during render and dispatched via
//! `InputEvent::Click`.

// ── Title screen ────────────────────────────────────────────────
pub const PICK_VANILLA: u16 = 0;
pub const PICK_SHADOW: u16 = 1;

// ── Dialogue / story screens ────────────────────────────────────
pub const NEXT_LINE: u16 = 10;
pub const BEGIN_PREP: u16 = 11;

// ── Kitchen screens ─────────────────────────────────────────────
pub const START_BAKING: u16 = 20;
pub const FINISH_CAKE: u16 = 21;
pub const RESET_GAME: u16 = 22;

// ── Item grids (base + item index) ──────────────────────────────
pub const ADD_INGREDIENT_BASE: u16 = 100;
pub const ADD_DECORATION_BASE: u16 = 200;
