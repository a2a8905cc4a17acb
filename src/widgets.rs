//! Reusable clickable UI components.
//!
//! [`ClickableList`] pairs rendered lines with click actions so that visual
//! output and interactive behaviour stay co-located: a line marked clickable
//! is clickable on whatever row it ends up on, even after lines are inserted
//! above it or the list is scrolled.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;
use ratzilla::ratatui::widgets::{Paragraph, Wrap};

use crate::input::ClickState;

/// A builder that pairs rendered [`Line`]s with click actions.
///
/// # Example
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("header (not clickable)"));
/// cl.push_clickable(Line::from(" [1] 卵を加える"), ADD_INGREDIENT_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, 0, 0);
/// let widget = Paragraph::new(cl.into_lines()).block(block);
/// f.render_widget(widget, area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs — line_index indexes into `lines`.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a clickable line with a semantic action ID.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    /// Total number of logical lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Visual rows these lines occupy when rendered with `Wrap` at `width`
    /// columns. Used to size boxes around wrap-prone text (dialogue lines).
    pub fn visual_height(&self, width: u16) -> u16 {
        Paragraph::new(self.lines.clone())
            .wrap(Wrap { trim: false })
            .line_count(width) as u16
    }

    /// Consume the builder, returning the lines for rendering.
    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines.
    ///
    /// * `area` — the widget area (including borders).
    /// * `top_offset` / `bottom_offset` — rows taken by borders.
    /// * `scroll` — vertical scroll offset in visual rows.
    /// * `inner_width` — content width for wrap calculation; pass `0` when
    ///   the widget does **not** wrap (1 logical line = 1 visual row).
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        // Visual row each line starts on, plus how many rows it spans.
        // Without wrapping every line is exactly one row tall.
        let spans: Vec<(u16, u16)> = {
            let mut next_row = 0u16;
            self.lines
                .iter()
                .map(|line| {
                    let rows = match inner_width as usize {
                        0 => 1,
                        w => line.width().div_ceil(w).max(1) as u16,
                    };
                    let start = next_row;
                    next_row += rows;
                    (start, rows)
                })
                .collect()
        };

        // A clickable line must be tappable on every visual row it spans.
        for &(line_idx, action_id) in &self.actions {
            let Some(&(start, rows)) = spans.get(line_idx as usize) else {
                continue;
            };
            for visual_row in start..start + rows {
                if visual_row < scroll {
                    continue;
                }
                let screen_row = content_y + (visual_row - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }
}
