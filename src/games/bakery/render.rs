//! Cake game rendering — one screen per stage, with co-located click
//! targets. All branching over the stage lives here; game logic never
//! knows how (or whether) it is drawn.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::ClickableList;

use super::actions::*;
use super::state::{Character, Emotion, Stage};
use super::BakeryGame;

/// Oven window frames, cycled while baking.
const OVEN_FRAMES: &[&[&str]] = &[
    &["╔════════════╗", "║ 🔥      🔥 ║", "║    🍰      ║", "╚════════════╝"],
    &["╔════════════╗", "║   🔥  🔥   ║", "║    🍰      ║", "╚════════════╝"],
    &["╔════════════╗", "║ 🔥  🔥  🔥 ║", "║    🍰      ║", "╚════════════╝"],
];

/// Celebration sparkle frames.
const SPARKLE_FRAMES: &[&str] = &["✨ 🎂 ✨", "🎉 🎂 🎉", "⭐ 🎂 ⭐"];

pub fn render(game: &BakeryGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    // Side log panel when there is room for it
    let (main_area, log_area) = if area.width >= 80 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let mut cs = click_state.borrow_mut();
    match game.state.stage() {
        Stage::Start => render_start(game, f, main_area, &mut cs),
        Stage::Intro | Stage::DialogueOne | Stage::DialogueTwo => {
            render_dialogue(game, f, main_area, &mut cs)
        }
        Stage::Blackout => render_blackout(game, f, main_area),
        Stage::ShadowKitchen => render_shadow_kitchen(game, f, main_area, &mut cs),
        Stage::Ingredients => render_ingredients(game, f, main_area, &mut cs),
        Stage::Baking => render_baking(game, f, main_area),
        Stage::Decoration => render_decoration(game, f, main_area, &mut cs),
        Stage::Complete => render_complete(game, f, main_area, &mut cs),
    }

    if let Some(log_area) = log_area {
        render_log(game, f, log_area);
    }
}

/// A textual progress meter, `pct` in [0, 100].
fn meter(pct: f64, width: u16) -> String {
    let width = width.max(4) as usize;
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn emotion_tag(emotion: Emotion) -> (&'static str, Color) {
    match emotion {
        Emotion::Gentle => ("やさしく", Color::Yellow),
        Emotion::Cheerful => ("にこにこ", Color::Green),
        Emotion::Mischief => ("いたずらっぽく", Color::Magenta),
        Emotion::Laugh => ("大笑い", Color::Cyan),
        Emotion::Surprised => ("びっくり", Color::White),
        Emotion::Dark => ("昏い声で", Color::DarkGray),
    }
}

fn speaker_color(who: Character) -> Color {
    match who {
        Character::PureVanilla => Color::Yellow,
        Character::ShadowMilk => Color::Magenta,
    }
}

// ── Title / character select ────────────────────────────────────

fn render_start(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(9)])
        .split(area);

    let mut header = ClickableList::new();
    header.push(Line::from(Span::styled(
        format!("🍰 {} 🍰", game.state.config.title),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    header.push(Line::from(Span::styled(
        "クッキーを選んでケーキを焼こう!",
        Style::default().fg(Color::Gray),
    )));
    header.push_clickable(
        Line::from(Span::styled(
            "[Q] ゲーム選択へもどる",
            Style::default().fg(Color::DarkGray),
        )),
        crate::BACK_TO_MENU,
    );
    header.register_targets(chunks[0], cs, 1, 1, 0, 0);
    let header = Paragraph::new(header.into_lines())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Magenta)));
    f.render_widget(header, chunks[0]);

    // Two character cards side by side; the whole card is tappable
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_character_card(f, cards[0], Character::PureVanilla, '1', "おだやかで賢いパティシエ", cs, PICK_VANILLA);
    render_character_card(f, cards[1], Character::ShadowMilk, '2', "よく笑う、秘密主義のいたずら屋", cs, PICK_SHADOW);
}

fn render_character_card(
    f: &mut Frame,
    area: Rect,
    who: Character,
    key: char,
    blurb: &str,
    cs: &mut ClickState,
    action_id: u16,
) {
    let color = speaker_color(who);
    let card = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(who.icon(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(
            who.name(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(blurb.to_string(), Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            format!("[{key}] このクッキーにする"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(card, area);
    cs.add_click_target(area, action_id);
}

// ── Dialogue box ────────────────────────────────────────────────

fn render_dialogue(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    // The stage machine keeps a line on screen for every dialogue stage;
    // if the invariant ever broke we would rather show nothing than panic.
    let Some(line) = game.state.current_line() else {
        return;
    };
    let phase_count = game.state.config.script.phases.len();
    let phase = game.state.dialogue.phase;
    let line_no = game.state.dialogue.line + 1;
    let line_count = game.state.config.script.phases[phase].len();

    let color = speaker_color(line.speaker);
    let (tag, tag_color) = emotion_tag(line.emotion);

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(
            format!("{} {} ", line.speaker.icon(), line.speaker.name()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({tag})"), Style::default().fg(tag_color)),
    ]));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(line.text, Style::default().fg(Color::White))),
        NEXT_LINE,
    );
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "[N] つぎへ ▼",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        NEXT_LINE,
    );

    let inner_width = area.width.saturating_sub(2).max(1);
    let box_height = (cl.visual_height(inner_width) + 2).min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(box_height)])
        .split(area);

    // Scene header above the speech box
    let scene = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("🏰 {}", game.state.config.title),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("会話 {}/{} ・ {line_no}/{line_count}行目", phase + 1, phase_count),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(scene, chunks[0]);

    let box_area = chunks[1];
    cl.register_targets(box_area, cs, 1, 1, 0, inner_width);
    let speech = Paragraph::new(cl.into_lines())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    f.render_widget(speech, box_area);
}

// ── Blackout interstitial ───────────────────────────────────────

fn render_blackout(game: &BakeryGame, f: &mut Frame, area: Rect) {
    // Nothing clickable here on purpose: the one-shot owns the exit.
    let dots = match (game.state.anim_frame / 5) % 4 {
        0 => "…",
        1 => "……",
        2 => "………",
        _ => "",
    };
    let dark = Paragraph::new(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(dots, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().style(Style::default().bg(Color::Black)));
    f.render_widget(dark, area);
}

// ── Shadow kitchen reveal ───────────────────────────────────────

fn render_shadow_kitchen(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "🌙 影のキッチン 🌙",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "灯りの消えた先にあったのは、月明かりだけのキッチン。",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(Span::styled(
        "材料はぜんぶ揃っている。ここで焼くしかない。",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "[1] 調理をはじめる",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        BEGIN_PREP,
    );
    if let Some(who) = game.state.character {
        cl.push(Line::from(""));
        cl.push(Line::from(Span::styled(
            format!("{} {}が腕まくりをしている", who.icon(), who.name()),
            Style::default().fg(speaker_color(who)),
        )));
    }

    cl.register_targets(area, cs, 1, 1, 0, 0);
    let widget = Paragraph::new(cl.into_lines())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Magenta)));
    f.render_widget(widget, area);
}

// ── Ingredient gathering ────────────────────────────────────────

fn render_ingredients(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let state = &game.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    // Header: totals + progress meter
    let pct = state.recipe.progress_percent();
    let header_border = if state.add_flash > 0 { Color::Yellow } else { Color::Green };
    let baker = state
        .character
        .map(|c| format!("{} {}", c.icon(), c.name()))
        .unwrap_or_default();
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("🥣 生地づくり  ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(baker, Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            format!("{} {:>3.0}%", meter(pct, area.width.saturating_sub(10)), pct),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("材料 {}/{}", state.recipe.total_added(), state.recipe.total_required()),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(header_border)));
    f.render_widget(header, chunks[0]);

    // Item grid: one clickable row per ingredient
    let mut cl = ClickableList::new();
    for (i, item) in state.recipe.items.iter().enumerate() {
        let done = item.current == item.required;
        let status = if done {
            Span::styled("✓", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(
                format!("{}/{}", item.current, item.required),
                Style::default().fg(Color::Yellow),
            )
        };
        let name_style = if item.special {
            Style::default().fg(Color::Magenta)
        } else if done {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} {:　<8}", item.icon, item.name), name_style),
                Span::raw(" "),
                status,
            ]),
            ADD_INGREDIENT_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    let oven_style = if state.recipe.is_complete() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(Line::from(Span::styled(" [O] オーブンへ 🔥", oven_style)), START_BAKING);
    cl.push_clickable(
        Line::from(Span::styled(" [R] 最初から", Style::default().fg(Color::DarkGray))),
        RESET_GAME,
    );

    cl.register_targets(chunks[1], cs, 1, 1, 0, 0);
    let grid = Paragraph::new(cl.into_lines())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Green)).title(" 材料（タップで追加） "));
    f.render_widget(grid, chunks[1]);
}

// ── Oven ────────────────────────────────────────────────────────

fn render_baking(game: &BakeryGame, f: &mut Frame, area: Rect) {
    let state = &game.state;
    let pct = state.oven.progress();
    let frame_idx = (state.anim_frame / 3) as usize % OVEN_FRAMES.len();

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "🔥 オーブンで焼いています",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for row in OVEN_FRAMES[frame_idx] {
        lines.push(Line::from(Span::styled(*row, Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} {pct:>3}%", meter(pct as f64, area.width.saturating_sub(12))),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    let status = if pct >= 100 {
        "いい香り……もうすぐ焼き上がり!"
    } else {
        "スポンジが膨らむのを待っている…"
    };
    lines.push(Line::from(Span::styled(status, Style::default().fg(Color::Gray))));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    f.render_widget(widget, area);
}

// ── Decoration ──────────────────────────────────────────────────

fn render_decoration(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let state = &game.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let count = state.tray.count();
    let min = state.config.min_decorations;
    let header_border = if state.add_flash > 0 { Color::Yellow } else { Color::Cyan };
    let placed: String = state
        .tray
        .items
        .iter()
        .filter(|d| d.added)
        .map(|d| d.icon)
        .collect::<Vec<_>>()
        .join(" ");
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "🎨 デコレーション",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("のせた飾り {count}/{} (最低{min}個)", state.tray.items.len()),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::raw(format!("🎂 {placed}"))),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(header_border)));
    f.render_widget(header, chunks[0]);

    let mut cl = ClickableList::new();
    for (i, item) in state.tray.items.iter().enumerate() {
        let status = if item.added {
            Span::styled("✓", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("+", Style::default().fg(Color::Cyan))
        };
        let name_style = if item.added {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} {:　<10}", item.icon, item.name), name_style),
                Span::raw(" "),
                status,
            ]),
            ADD_DECORATION_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    let finish_style = if count >= min {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(Span::styled(" [F] ケーキを完成させる ✨", finish_style)),
        FINISH_CAKE,
    );
    cl.push_clickable(
        Line::from(Span::styled(" [R] 最初から", Style::default().fg(Color::DarkGray))),
        RESET_GAME,
    );

    cl.register_targets(chunks[1], cs, 1, 1, 0, 0);
    let grid = Paragraph::new(cl.into_lines())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)).title(" 飾り（タップで追加） "));
    f.render_widget(grid, chunks[1]);
}

// ── Celebration ─────────────────────────────────────────────────

fn render_complete(game: &BakeryGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let state = &game.state;
    let sparkle = SPARKLE_FRAMES[(state.anim_frame / 4) as usize % SPARKLE_FRAMES.len()];
    let placed: String = state
        .tray
        .items
        .iter()
        .filter(|d| d.added)
        .map(|d| d.icon)
        .collect::<Vec<_>>()
        .join(" ");

    let mut cl = ClickableList::new();
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "🎉 おめでとう! 🎉",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::raw(sparkle)));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "バニラケーキのできあがり!",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(Span::raw(placed)));
    if let Some(who) = state.character {
        cl.push(Line::from(Span::styled(
            format!("{} {}も大満足 👨‍🍳", who.icon(), who.name()),
            Style::default().fg(speaker_color(who)),
        )));
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "[R] もういちど焼く 🔄",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        RESET_GAME,
    );
    cl.push_clickable(
        Line::from(Span::styled(
            "[Q] ゲーム選択へもどる",
            Style::default().fg(Color::DarkGray),
        )),
        crate::BACK_TO_MENU,
    );

    cl.register_targets(area, cs, 1, 1, 0, 0);
    let widget = Paragraph::new(cl.into_lines())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    f.render_widget(widget, area);
}

// ── Notification log ────────────────────────────────────────────

fn render_log(game: &BakeryGame, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = game.log.len().saturating_sub(visible);

    let lines: Vec<Line> = game.log[start..]
        .iter()
        .map(|entry| {
            if entry.is_important {
                Line::from(Span::styled(
                    entry.text.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(entry.text.clone(), Style::default().fg(Color::Gray)))
            }
        })
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" おしらせ "),
        );
    f.render_widget(widget, area);
}
