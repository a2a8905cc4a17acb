/// Game trait and game selection logic.

pub mod bakery;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

/// Trait that all games implement.
pub trait Game {
    /// Handle an input event. Returns true if the event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Advance game logic by `delta_ticks` discrete ticks.
    fn tick(&mut self, delta_ticks: u32);

    /// Render the game into the given area.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}

/// Which variant the player has selected (or is choosing). Both entries
/// are the same game under different configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameChoice {
    Classic,
    Story,
}

impl GameChoice {
    pub fn title(&self) -> &'static str {
        match self {
            GameChoice::Classic => "クラシック",
            GameChoice::Story => "ストーリー",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            GameChoice::Classic => "クッキーを選んで、さっとケーキを焼く",
            GameChoice::Story => "ふたりのクッキーと、消えた灯りの物語",
        }
    }
}

/// Top-level application state.
pub enum AppState {
    /// Showing the variant selection menu.
    Menu,
    /// Playing a game.
    Playing { game: Box<dyn Game> },
}

/// Create a game instance from a choice.
pub fn create_game(choice: &GameChoice) -> Box<dyn Game> {
    match choice {
        GameChoice::Classic => Box::new(bakery::BakeryGame::new(bakery::config::classic())),
        GameChoice::Story => Box::new(bakery::BakeryGame::new(bakery::config::story())),
    }
}
