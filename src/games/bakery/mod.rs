//! Cake Atelier — a narrative cake-baking mini-game.
//!
//! One parameterized game backs both menu entries: the classic quick bake
//! and the story mode with its scripted blackout. `logic` owns the rules
//! and returns typed outcomes; this module turns those outcomes into
//! notifications and maps raw input onto commands.

pub mod actions;
pub mod config;
pub mod logic;
pub mod render;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use actions::*;
use state::{AddOutcome, BakeryState, Character, CommandError, DecorOutcome, GameConfig, Stage};

/// A notification line (the toast equivalent).
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct BakeryGame {
    pub state: BakeryState,
    pub log: Vec<LogEntry>,
}

impl BakeryGame {
    pub fn new(config: GameConfig) -> Self {
        let state = BakeryState::new(config);
        let mut game = Self {
            state,
            log: Vec::new(),
        };
        game.log_welcome();
        game
    }

    fn log_welcome(&mut self) {
        if self.state.config.script.phases.is_empty() {
            self.add_log("クッキーを選んでケーキを焼こう!", true);
        } else {
            self.add_log("物語が始まる…", true);
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        // Keep log manageable
        if self.log.len() > 50 {
            self.log.remove(0);
        }
    }

    // ── Command wrappers: run logic, narrate the outcome ───────

    fn do_select(&mut self, who: Character) -> bool {
        match logic::select_character(&mut self.state, who) {
            Ok(()) => {
                self.add_log(&format!("🎮 {}がケーキを作ります!", who.name()), true);
                true
            }
            Err(_) => false,
        }
    }

    fn do_add_ingredient(&mut self, idx: usize) -> bool {
        let Some((id, name, icon)) = self
            .state
            .recipe
            .items
            .get(idx)
            .map(|i| (i.id, i.name, i.icon))
        else {
            return false;
        };
        match logic::add_ingredient(&mut self.state, id) {
            Ok(AddOutcome::Added {
                current,
                required,
                just_completed,
            }) => {
                self.add_log(&format!("{icon} {name}を追加 ({current}/{required})"), false);
                if just_completed {
                    self.add_log("✨ ぴったり!", true);
                }
                true
            }
            Ok(AddOutcome::AlreadyFull) => {
                self.add_log(&format!("{name}はもう十分入っている"), false);
                true
            }
            Err(CommandError::UnknownItem) => {
                self.add_log(&format!("⚠ 未知の材料: {id}"), true);
                true
            }
            Err(CommandError::GuardNotSatisfied) => false,
        }
    }

    fn do_start_baking(&mut self) -> bool {
        match logic::start_baking(&mut self.state) {
            Ok(()) => {
                self.add_log("🔥 オーブンに入れました…", true);
                true
            }
            Err(_) => {
                self.add_log("❌ 材料をすべて加えてください!", true);
                true
            }
        }
    }

    fn do_add_decoration(&mut self, idx: usize) -> bool {
        let Some((id, name, icon)) = self
            .state
            .tray
            .items
            .get(idx)
            .map(|d| (d.id, d.name, d.icon))
        else {
            return false;
        };
        let total = self.state.tray.items.len();
        match logic::add_decoration(&mut self.state, id) {
            Ok(DecorOutcome::Placed { count }) => {
                self.add_log(&format!("{icon} {name}をのせた ({count}/{total})"), false);
                true
            }
            Ok(DecorOutcome::AlreadyPlaced) => {
                self.add_log(&format!("{name}はもうのせてある"), false);
                true
            }
            Err(CommandError::UnknownItem) => {
                self.add_log(&format!("⚠ 未知の飾り: {id}"), true);
                true
            }
            Err(CommandError::GuardNotSatisfied) => false,
        }
    }

    fn do_finish_cake(&mut self) -> bool {
        match logic::finish_cake(&mut self.state) {
            Ok(()) => {
                self.add_log("🎉 ケーキ完成!おめでとう!", true);
                true
            }
            Err(_) => {
                let missing = self
                    .state
                    .config
                    .min_decorations
                    .saturating_sub(self.state.tray.count());
                self.add_log(&format!("❌ 飾りをあと{missing}個のせてください!"), true);
                true
            }
        }
    }

    fn do_begin_prep(&mut self) -> bool {
        match logic::begin_prep(&mut self.state) {
            Ok(()) => {
                self.add_log("🍳 影のキッチンで調理開始!", true);
                true
            }
            Err(_) => false,
        }
    }

    fn do_advance_dialogue(&mut self) -> bool {
        logic::advance_dialogue(&mut self.state).is_ok()
    }

    fn do_reset(&mut self) -> bool {
        logic::reset(&mut self.state);
        self.log.clear();
        self.add_log("🔄 最初から作り直します", false);
        self.log_welcome();
        true
    }

    // ── Input mapping ──────────────────────────────────────────

    fn handle_key(&mut self, key: char) -> bool {
        match self.state.stage() {
            Stage::Start => match key {
                '1' => self.do_select(Character::PureVanilla),
                '2' => self.do_select(Character::ShadowMilk),
                _ => false,
            },
            Stage::Intro | Stage::DialogueOne | Stage::DialogueTwo => match key {
                ' ' | 'n' => self.do_advance_dialogue(),
                _ => false,
            },
            Stage::Blackout => false, // nothing to do but wait
            Stage::ShadowKitchen => match key {
                ' ' | '1' => self.do_begin_prep(),
                _ => false,
            },
            Stage::Ingredients => match key {
                '1'..='9' => {
                    let idx = (key as u8 - b'1') as usize;
                    if idx < self.state.recipe.items.len() {
                        self.do_add_ingredient(idx)
                    } else {
                        false
                    }
                }
                'o' => self.do_start_baking(),
                'r' => self.do_reset(),
                _ => false,
            },
            Stage::Baking => match key {
                'r' => self.do_reset(),
                _ => false,
            },
            Stage::Decoration => match key {
                '1'..='9' => {
                    let idx = (key as u8 - b'1') as usize;
                    if idx < self.state.tray.items.len() {
                        self.do_add_decoration(idx)
                    } else {
                        false
                    }
                }
                'f' => self.do_finish_cake(),
                'r' => self.do_reset(),
                _ => false,
            },
            Stage::Complete => match key {
                'r' | ' ' => self.do_reset(),
                _ => false,
            },
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        // Not ours: let main.rs take the player back to the menu
        if action_id == crate::BACK_TO_MENU {
            return false;
        }
        match action_id {
            PICK_VANILLA => self.do_select(Character::PureVanilla),
            PICK_SHADOW => self.do_select(Character::ShadowMilk),
            NEXT_LINE => self.do_advance_dialogue(),
            BEGIN_PREP => self.do_begin_prep(),
            START_BAKING => self.do_start_baking(),
            FINISH_CAKE => self.do_finish_cake(),
            RESET_GAME => self.do_reset(),
            id if (ADD_INGREDIENT_BASE..ADD_INGREDIENT_BASE + 9).contains(&id) => {
                self.do_add_ingredient((id - ADD_INGREDIENT_BASE) as usize)
            }
            id if (ADD_DECORATION_BASE..ADD_DECORATION_BASE + 9).contains(&id) => {
                self.do_add_decoration((id - ADD_DECORATION_BASE) as usize)
            }
            _ => false,
        }
    }
}

impl Game for BakeryGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        let before = self.state.stage();
        logic::tick(&mut self.state, delta_ticks);
        let after = self.state.stage();
        if before != after {
            // Timer-driven transitions get their toast here; command-driven
            // ones are narrated by the command wrappers.
            match after {
                Stage::Decoration => self.add_log("🎂 スポンジが焼けた!デコレーションしよう!", true),
                Stage::ShadowKitchen => self.add_log("……ここは? 影のキッチン?", true),
                _ => {}
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
