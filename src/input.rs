//! Shared input handling: normalized events, click targets, and the
//! pixel-to-cell conversion used by the DOM mouse handler.
//!
//! This module is game-agnostic. Each game interprets the events itself.

use ratzilla::ratatui::layout::Rect;

/// All input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from the keyboard.
    Key(char),
    /// A click/tap on a registered target, identified by a semantic action
    /// ID. Each game defines its own action ID constants.
    Click(u16),
}

/// A screen region that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cell coordinates.
    pub rect: Rect,
    /// Semantic action ID.
    pub action_id: u16,
}

/// Click state shared between the render loop (which registers targets) and
/// the mouse handler (which hit-tests them). Targets are cleared and
/// re-registered every frame, so they always match what is on screen.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register a click target with a rectangular hit region.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Convenience: register a full-width target at one row within an area.
    /// Rows outside the area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if (area.y..area.y + area.height).contains(&row) {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Hit-test a terminal cell against all registered targets. When targets
    /// overlap, the last registered wins (later elements render on top).
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let r = t.rect;
                (r.x..r.x + r.width).contains(&col) && (r.y..r.y + r.height).contains(&row)
            })
            .map(|t| t.action_id)
    }
}

/// Convert a pixel coordinate along one axis to a cell index, given the
/// grid's pixel extent and cell count along that axis. `None` outside the
/// grid or for a degenerate grid.
fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset * cells as f64 / extent) as u16;
    (cell < cells).then_some(cell)
}

/// Convert a pixel Y coordinate (relative to the grid container's top edge)
/// to a terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Convert a pixel X coordinate to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}
