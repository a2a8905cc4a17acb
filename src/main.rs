mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::{create_game, AppState, Game, GameChoice};
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::GameTime;
use widgets::ClickableList;

/// Shared action id: leave the current game and return to the menu.
/// Games return `false` for it so the shell handles the navigation.
pub const BACK_TO_MENU: u16 = 9000;

// Menu screen action ids
const MENU_CLASSIC: u16 = 1;
const MENU_STORY: u16 = 2;

/// Game ticks per second. One tick is the oven's 100ms cadence.
const TICKS_PER_SEC: u32 = 10;

/// Wall clock for the fixed-timestep accumulator.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Query the grid container's bounding rect and convert a pixel click to a
/// terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

/// Route an event to the menu or the active game. Unconsumed back events
/// ('q', Esc, or a BACK_TO_MENU click) return to the menu.
fn dispatch(app: &mut AppState, event: &InputEvent) {
    match app {
        AppState::Menu => {
            let choice = match event {
                InputEvent::Key('1') | InputEvent::Click(MENU_CLASSIC) => Some(GameChoice::Classic),
                InputEvent::Key('2') | InputEvent::Click(MENU_STORY) => Some(GameChoice::Story),
                _ => None,
            };
            if let Some(choice) = choice {
                *app = AppState::Playing {
                    game: create_game(&choice),
                };
            }
        }
        AppState::Playing { game } => {
            let consumed = game.handle_input(event);
            if !consumed {
                let back = matches!(event, InputEvent::Key('q'))
                    || matches!(event, InputEvent::Click(id) if *id == BACK_TO_MENU);
                if back {
                    *app = AppState::Menu;
                }
            }
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let app = Rc::new(RefCell::new(AppState::Menu));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(GameTime::new(TICKS_PER_SEC)));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let matched = cs.hit_test(col, row);
            drop(cs);

            web_sys::console::log_1(
                &format!("click: cell=({col},{row}), action={matched:?}").into(),
            );

            if let Some(action_id) = matched {
                let mut app = app.borrow_mut();
                dispatch(&mut app, &InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Enter => InputEvent::Key(' '),
                KeyCode::Esc => InputEvent::Key('q'),
                _ => return,
            };
            let mut app = app.borrow_mut();
            dispatch(&mut app, &event);
        }
    });

    terminal.draw_web({
        let app = app.clone();
        let click_state = click_state.clone();
        let clock = clock.clone();
        move |f| {
            let delta_ticks = clock.borrow_mut().update(now_ms());

            let mut app_ref = app.borrow_mut();
            if let AppState::Playing { game } = &mut *app_ref {
                game.tick(delta_ticks);
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            match &*app_ref {
                AppState::Menu => render_menu(f, size, &click_state),
                AppState::Playing { game } => game.render(f, size, &click_state),
            }
        }
    });

    Ok(())
}

fn render_menu(
    f: &mut ratzilla::ratatui::Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "🍰 ケーキ工房コレクション 🍰",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "あそぶモードを選んでください",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(title, chunks[0]);

    let mut cl = ClickableList::new();
    for (key, choice, action_id) in [
        ('1', GameChoice::Classic, MENU_CLASSIC),
        ('2', GameChoice::Story, MENU_STORY),
    ] {
        cl.push(Line::from(""));
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{key}] "),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    choice.title(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" — {}", choice.blurb()),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            action_id,
        );
    }

    let mut cs = click_state.borrow_mut();
    cl.register_targets(chunks[1], &mut cs, 1, 1, 0, 0);
    let list = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" ゲーム "),
    );
    f.render_widget(list, chunks[1]);

    let help = Paragraph::new(Line::from(Span::styled(
        "番号キー または タップで選択",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(help, chunks[2]);
}
