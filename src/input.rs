//! Input normalization: keyboard keys, tap coordinates and click targets.
//!
//! Keys and taps are both turned into an [`InputEvent`] before they reach
//! the game. Taps only count when they land on a target registered by the
//! last render.

use ratzilla::event::KeyCode;
use ratzilla::ratatui::layout::Rect;

/// An input event, normalized from keyboard, mouse and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press, lowercased. Esc arrives as `'b'` (back).
    Key(char),
    /// A tap on a registered target, identified by a semantic action ID
    /// from `clicker::actions`.
    Click(u16),
}

/// Map a browser key to the game's key alphabet.
pub fn normalize_key(code: &KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Char(c) => Some(InputEvent::Key(c.to_ascii_lowercase())),
        KeyCode::Esc | KeyCode::Backspace => Some(InputEvent::Key('b')),
        KeyCode::Enter => Some(InputEvent::Key('c')),
        _ => None,
    }
}

/// A tappable region, in terminal cells.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets of the last frame plus the terminal size they were laid
/// out for. Shared between the draw loop and the mouse handler.
#[derive(Default)]
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

    /// Start a new frame: remember its size and forget the old targets.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width row of `area`. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a row of tabs laid out left to right.
    ///
    /// `tab_widths` holds `(display_width, action_id)` per tab. Each target
    /// covers its label plus half of the separator on either side; the
    /// outermost tabs stretch to the edges of `total_width`.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts: Vec<u16> = Vec::with_capacity(n);
        let mut cursor: u16 = 0;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }

        for (i, &(width, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = starts[i - 1] + tab_widths[i - 1].0;
                prev_end + (starts[i] - prev_end) / 2
            };
            let right = if i == n - 1 {
                total_width
            } else {
                let end = starts[i] + width;
                end + (starts[i + 1] - end) / 2
            };

            let w = right.min(total_width).saturating_sub(left);
            if w > 0 {
                self.add_click_target(Rect::new(x + left, y, w, height), action_id);
            }
        }
    }

    /// Action ID under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Resolve a tap given in pixels relative to the grid's top-left corner.
    pub fn tap(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<InputEvent> {
        let col = pixel_x_to_col(x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row).map(InputEvent::Click)
    }
}

/// Narrow screens (phones) stack panels instead of placing them side by side.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Pixel Y (relative to the grid top) to a terminal row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    (row < terminal_rows).then_some(row)
}

/// Pixel X (relative to the grid left edge) to a terminal column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    (col < terminal_cols).then_some(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── key normalization ───────────────────────────────────────────

    #[test]
    fn keys_are_lowercased() {
        assert_eq!(normalize_key(&KeyCode::Char('C')), Some(InputEvent::Key('c')));
        assert_eq!(normalize_key(&KeyCode::Char(' ')), Some(InputEvent::Key(' ')));
    }

    #[test]
    fn escape_means_back() {
        assert_eq!(normalize_key(&KeyCode::Esc), Some(InputEvent::Key('b')));
        assert_eq!(normalize_key(&KeyCode::Backspace), Some(InputEvent::Key('b')));
    }

    #[test]
    fn enter_clicks_and_arrows_are_ignored() {
        assert_eq!(normalize_key(&KeyCode::Enter), Some(InputEvent::Key('c')));
        assert_eq!(normalize_key(&KeyCode::Left), None);
    }

    // ── hit testing ─────────────────────────────────────────────────

    #[test]
    fn hit_test_rows() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);
        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
        assert_eq!(cs.hit_test(5, 12), None);
    }

    #[test]
    fn hit_test_multi_row_clicker_button() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(10, 5, 20, 4), 0);
        assert_eq!(cs.hit_test(10, 5), Some(0));
        assert_eq!(cs.hit_test(29, 8), Some(0));
        assert_eq!(cs.hit_test(30, 8), None);
        assert_eq!(cs.hit_test(15, 9), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(5, 5, 10, 1), 2);
        assert_eq!(cs.hit_test(7, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), Some(1));
    }

    #[test]
    fn row_target_outside_area_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99);
        cs.add_row_target(area, 15, 98);
        assert!(cs.targets.is_empty());
        cs.add_row_target(area, 12, 97);
        assert_eq!(cs.hit_test(15, 12), Some(97));
    }

    #[test]
    fn begin_frame_resets_targets() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.begin_frame(100, 40);
        assert!(cs.targets.is_empty());
        assert_eq!((cs.terminal_cols, cs.terminal_rows), (100, 40));
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    // ── pixel conversion ────────────────────────────────────────────

    #[test]
    fn pixel_to_row() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
    }

    #[test]
    fn pixel_to_col() {
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(5.0, 800.0, 0), None);
    }

    #[test]
    fn tap_resolves_to_click_event() {
        let mut cs = ClickState::new();
        cs.begin_frame(80, 30);
        cs.add_click_target(Rect::new(0, 12, 80, 1), 100);
        // 15px cells: row 12 spans 180..195
        assert_eq!(cs.tap(40.0, 187.0, 800.0, 450.0), Some(InputEvent::Click(100)));
        assert_eq!(cs.tap(40.0, 170.0, 800.0, 450.0), None);
    }

    #[test]
    fn tap_before_first_frame_is_ignored() {
        let cs = ClickState::new();
        assert_eq!(cs.tap(1.0, 1.0, 800.0, 450.0), None);
    }

    // ── tab targets ─────────────────────────────────────────────────

    #[test]
    fn tab_targets_split_separators() {
        // [6][3][6][3][6] in an 80-wide row
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[(6, 10), (6, 11), (6, 12)], 3, 0, 5, 80, 1);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(6, 5), Some(10));
        assert_eq!(cs.hit_test(7, 5), Some(11));
        assert_eq!(cs.hit_test(15, 5), Some(11));
        assert_eq!(cs.hit_test(16, 5), Some(12));
        assert_eq!(cs.hit_test(79, 5), Some(12));
    }

    #[test]
    fn tab_targets_with_offset_and_height() {
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[(6, 10), (6, 11)], 1, 5, 3, 30, 2);
        assert_eq!(cs.hit_test(5, 4), Some(10));
        assert_eq!(cs.hit_test(4, 3), None);
    }

    #[test]
    fn tab_targets_empty() {
        let mut cs = ClickState::new();
        cs.register_tab_targets(&[], 3, 0, 0, 80, 1);
        assert!(cs.targets.is_empty());
    }
}
