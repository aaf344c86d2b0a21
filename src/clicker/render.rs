//! MMF Clicker rendering: header, scene tabs, notice banner and one panel
//! per scene. Every `[K]` hint on screen is also a tap target.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{tab_style, ClickableList, TabBar};

use super::actions::*;
use super::logic::{can_afford, clicker_status, format_number, ClickerStatus};
use super::state::{clicker_catalog, GameState, MIN_AUTO_CLICK_INTERVAL_MS, REBIRTH_COST};
use super::transition::Scene;
use super::{ClickerGame, Notice};

/// Clicker art per skin, 4 rows of 10 columns.
fn clicker_art(id: &str) -> &'static [&'static str] {
    match id {
        "new_clicker1" => &["  .-\"\"-.  ", " ( ^  ^ ) ", "  \\ -- /  ", "   `--`   "],
        "new_clicker2" => &["  _____   ", " | o o |  ", "  \\ = /   ", "  /|_|\\   "],
        _ => &["   ____   ", "  /    \\  ", " |  ()  | ", "  \\____/  "],
    }
}

pub fn render(game: &ClickerGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cs = click_state.borrow_mut();
    let state = &game.state;

    let notice_height = game
        .notice
        .as_ref()
        .map(|n| notice_paragraph(n).line_count(area.width) as u16)
        .unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // header
            Constraint::Length(3),             // tabs
            Constraint::Length(notice_height), // notice banner
            Constraint::Min(6),                // scene
            Constraint::Length(1),             // key help
        ])
        .split(area);

    render_header(game.scene, state, f, chunks[0]);
    render_tabs(game.scene, f, chunks[1], &mut cs);
    if let Some(notice) = &game.notice {
        f.render_widget(notice_paragraph(notice), chunks[2]);
    }

    let (scene_area, stats_area) = if is_narrow_layout(area.width) {
        (chunks[3], None)
    } else {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[3]);
        (h[0], Some(h[1]))
    };

    match game.scene {
        Scene::Main => render_main(state, f, scene_area, &mut cs),
        Scene::Upgrade => render_upgrades(state, f, scene_area, &mut cs),
        Scene::Menu => render_menu(state, game.reset_armed(), f, scene_area, &mut cs),
        Scene::Shop => render_shop(state, f, scene_area, &mut cs),
    }
    if let Some(stats_area) = stats_area {
        render_stats(state, f, stats_area);
    }

    render_help(game.scene, f, chunks[4]);
}

fn render_header(scene: Scene, state: &GameState, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("{}  ", scene.title()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Points: {}", format_number(state.points.floor())),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let header = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn render_tabs(scene: Scene, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    TabBar::new("│")
        .tab("Clicker", tab_style(scene == Scene::Main, Color::Yellow), GOTO_MAIN)
        .tab("Upgrades", tab_style(scene == Scene::Upgrade, Color::Green), GOTO_UPGRADES)
        .tab("Menu", tab_style(scene == Scene::Menu, Color::Magenta), GOTO_MENU)
        .tab("Shop", tab_style(scene == Scene::Shop, Color::Cyan), GOTO_SHOP)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(f, area, cs);
}

fn notice_paragraph(notice: &Notice) -> Paragraph<'_> {
    let bg = if notice.is_error { Color::Red } else { Color::Green };
    let mut style = Style::default().fg(Color::Black).bg(bg);
    // Bold until the last half second
    if notice.ms_left() > 500 {
        style = style.add_modifier(Modifier::BOLD);
    }
    Paragraph::new(Line::from(notice.text.as_str()))
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Render a bordered scene panel and register its buttons.
fn render_panel(cl: ClickableList<'_>, title: &str, color: Color, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    cl.register_targets(area, cs, 1, 1, area.width.saturating_sub(2));
    let panel = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn render_main(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();
    let art_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    for row in clicker_art(&state.equipped_clicker) {
        cl.push_clickable(Line::from(Span::styled(*row, art_style)).centered(), CLICK);
    }
    cl.push(Line::from(""));
    cl.push_button('c', format!("Click! (+{})", format_number(state.click_power as f64)), true, CLICK);
    cl.push_button('u', "Upgrades", true, GOTO_UPGRADES);
    cl.push_button('m', "Menu", true, GOTO_MENU);
    cl.push_button('s', "Clicker shop", true, GOTO_SHOP);

    let title = state.equipped().map(|c| c.name).unwrap_or("Clicker");
    render_panel(cl, title, Color::Yellow, f, area, cs);
}

fn render_upgrades(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();

    cl.push(Line::from(format!("Click power: {}", format_number(state.click_power as f64))));
    cl.push_button(
        '1',
        format!("Click power +1  ({} pts)", format_number(state.click_power_cost as f64)),
        can_afford(state, state.click_power_cost),
        BUY_CLICK_POWER,
    );
    cl.push(Line::from(""));

    cl.push(Line::from(format!(
        "Auto-click power: {}  every {}",
        format_number(state.auto_click_power as f64),
        format_seconds(state.auto_click_interval),
    )));
    cl.push_button(
        '2',
        format!("Auto-click +1  ({} pts)", format_number(state.auto_click_power_cost as f64)),
        can_afford(state, state.auto_click_power_cost),
        BUY_AUTO_CLICK,
    );
    let interval_note = if state.auto_click_interval > MIN_AUTO_CLICK_INTERVAL_MS {
        "Each auto-click level also speeds the timer up by 0.1s."
    } else {
        "The auto-click timer is at its fastest."
    };
    cl.push(Line::from(Span::styled(
        interval_note,
        Style::default().fg(Color::DarkGray),
    )));
    cl.push(Line::from(""));
    cl.push_button('b', "Back", true, GOTO_MAIN);

    render_panel(cl, "Upgrades", Color::Green, f, area, cs);
}

fn render_menu(
    state: &GameState,
    reset_armed: bool,
    f: &mut Frame,
    area: Rect,
    cs: &mut ClickState,
) {
    let mut cl = ClickableList::new();
    let on_off = |on: bool| if on { "On" } else { "Off" };

    cl.push(Line::from(format!("Rebirths: {}", state.rebirth_count)));
    cl.push(Line::from(Span::styled(
        format!(
            "Rebirth resets points and upgrades. You restart with {}x click power.",
            state.rebirth_count + 2
        ),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push_button(
        'r',
        format!("Rebirth  ({} pts)", format_number(REBIRTH_COST as f64)),
        can_afford(state, REBIRTH_COST),
        REBIRTH,
    );
    cl.push(Line::from(""));
    cl.push_button('t', format!("Sound: {}", on_off(state.settings.sound_on)), true, TOGGLE_SOUND);
    cl.push_button('y', format!("Music: {}", on_off(state.settings.music_on)), true, TOGGLE_MUSIC);
    cl.push(Line::from(""));
    let reset_label = if reset_armed { "Confirm: erase all progress" } else { "Reset progress" };
    cl.push_button('x', reset_label, true, RESET_PROGRESS);
    cl.push(Line::from(""));
    cl.push_button('b', "Back", true, GOTO_MAIN);

    render_panel(cl, "Menu", Color::Magenta, f, area, cs);
}

fn render_shop(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();

    for (i, entry) in clicker_catalog().iter().enumerate() {
        let status = clicker_status(state, entry);
        let label = match status {
            ClickerStatus::Equipped => "Equipped".to_string(),
            ClickerStatus::Owned | ClickerStatus::Free => "Equip".to_string(),
            ClickerStatus::Affordable => {
                format!("Buy & Equip  ({} pts)", format_number(entry.cost as f64))
            }
            ClickerStatus::Locked => {
                format!("Not enough points  ({} pts)", format_number(entry.cost as f64))
            }
        };
        let key = char::from(b'1' + i as u8);
        cl.push_button(
            key,
            format!("{:<16}{}", entry.name, label),
            status != ClickerStatus::Locked,
            EQUIP_CLICKER_BASE + i as u16,
        );
    }
    cl.push(Line::from(""));
    cl.push_button('b', "Back", true, GOTO_MAIN);

    render_panel(cl, "Clickers", Color::Cyan, f, area, cs);
}

fn render_stats(state: &GameState, f: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let row = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(format!("{:<14}", name), label), Span::styled(v, value)])
    };

    let auto = if state.auto_click_power == 0 {
        "off".to_string()
    } else {
        format!(
            "+{} / {}",
            format_number(state.auto_click_power as f64),
            format_seconds(state.auto_click_interval)
        )
    };
    let lines = vec![
        row("Points", format_number(state.points.floor())),
        row("Click power", format_number(state.click_power as f64)),
        row("Auto-click", auto),
        row("Rebirths", state.rebirth_count.to_string()),
        row(
            "Clicker",
            state.equipped().map(|c| c.name).unwrap_or("?").to_string(),
        ),
        row("Skins owned", format!("{}/{}", state.owned_clickers.len(), clicker_catalog().len())),
    ];

    let stats = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Stats "),
    );
    f.render_widget(stats, area);
}

fn render_help(scene: Scene, f: &mut Frame, area: Rect) {
    let text = match scene {
        Scene::Main => "c/space click · u upgrades · m menu · s shop",
        Scene::Upgrade => "1 click power · 2 auto-click · b back",
        Scene::Menu => "r rebirth · t sound · y music · x reset · b back",
        Scene::Shop => "1-3 equip · b back",
    };
    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(help, area);
}

/// `9900` → `"9.9s"`.
fn format_seconds(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
