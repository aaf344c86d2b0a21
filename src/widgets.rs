//! Clickable UI components.
//!
//! Each component renders and registers its own click targets, so what the
//! player sees and what the player can tap never drift apart.
//!
//! - [`TabBar`]: the scene switcher along the top.
//! - [`ClickableList`]: a vertical list whose lines may be buttons.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// A single row of tabs. Click targets follow the rendered label widths.
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    /// Wrap the bar in a [`Block`]. Targets are laid out inside its borders.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// `(padded label width, action id)` per tab, as rendered.
    fn tab_widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|(label, _, id)| (Line::from(format!(" {} ", label)).width() as u16, *id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let tab_widths = self.tab_widths();

        let mut spans: Vec<Span> = Vec::new();
        for (i, (label, style, _)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(format!(" {} ", label), *style));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // Full outer height so the border rows are tappable too
        cs.register_tab_targets(
            &tab_widths,
            sep_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

/// Style of a tab: inverted when active.
pub fn tab_style(active: bool, color: Color) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines for a [`Paragraph`], some of them bound to action IDs.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Click power: 3"));
/// cl.push_clickable(Line::from(" [1] Buy click power"), BUY_CLICK_POWER);
/// cl.register_targets(area, &mut cs, 1, 1, inner_width);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line that triggers `action_id` when tapped. The target follows
    /// the line wherever it ends up.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    /// A `[K] label` button line. Disabled buttons are dimmed but stay
    /// tappable so a refusal can explain itself.
    pub fn push_button(
        &mut self,
        key: char,
        label: impl Into<String>,
        enabled: bool,
        action_id: u16,
    ) {
        let (key_style, label_style) = if enabled {
            (
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", key.to_ascii_uppercase()), key_style),
            Span::styled(label.into(), label_style),
        ]);
        self.push_clickable(line, action_id);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Visual rows each line occupies when wrapped at `inner_width`.
    /// An `inner_width` of 0 means no wrapping.
    fn visual_heights(&self, inner_width: u16) -> Vec<u16> {
        let w = inner_width as usize;
        self.lines
            .iter()
            .map(|line| {
                let lw = line.width();
                if w == 0 || lw <= w {
                    1
                } else {
                    lw.div_ceil(w) as u16
                }
            })
            .collect()
    }

    /// Rows needed to show every line, without borders.
    pub fn height(&self, inner_width: u16) -> u16 {
        self.visual_heights(inner_width).iter().sum()
    }

    /// Register targets for every clickable line.
    ///
    /// `top_offset` / `bottom_offset` are the rows taken by borders.
    /// `inner_width` is the wrap width, or 0 when the paragraph does not wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let heights = self.visual_heights(inner_width);
        let mut starts = Vec::with_capacity(heights.len());
        let mut cumulative: u16 = 0;
        for h in &heights {
            starts.push(cumulative);
            cumulative += h;
        }

        for &(idx, action_id) in &self.actions {
            let (Some(&start), Some(&height)) = (starts.get(idx), heights.get(idx)) else {
                continue;
            };
            for r in 0..height {
                let row = content_y + start + r;
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
