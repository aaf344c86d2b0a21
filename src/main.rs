mod clicker;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use clicker::save::{console_log, PersistenceStore};
use clicker::ClickerGame;
use input::{normalize_key, ClickState, InputEvent};
use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::SimClock;

/// localStorage when the browser allows it, otherwise an in-memory store
/// that lasts for this page load only.
#[cfg(target_arch = "wasm32")]
fn open_store() -> PersistenceStore {
    match clicker::save::LocalStorage::open() {
        Ok(storage) => PersistenceStore::new(Box::new(storage)),
        Err(e) => {
            clicker::save::console_warn(&format!("{e}; progress will not be saved"));
            PersistenceStore::in_memory()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> PersistenceStore {
    PersistenceStore::in_memory()
}

/// `performance.now()`, falling back to the wall clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Translate a viewport tap into a click on whatever the last frame drew there.
fn dom_tap(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<InputEvent> {
    let document = web_sys::window()?.document()?;

    // DomBackend renders its grid into a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.tap(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(ClickerGame::new(open_store())));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    {
        let g = game.borrow();
        console_log(&format!(
            "loaded: {} points, rebirth {}",
            clicker::logic::format_number(g.state.points),
            g.state.rebirth_count
        ));
    }

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let event = dom_tap(mouse_event.x, mouse_event.y, &click_state.borrow());
            if let Some(event) = event {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(event) = normalize_key(&key_event.code) {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    let mut clock = SimClock::new();
    terminal.draw_web(move |f| {
        game.borrow_mut().tick(clock.update(now_ms()));

        let area = f.area();
        click_state
            .borrow_mut()
            .begin_frame(area.width, area.height);
        game.borrow().render(f, area, &click_state);
    });

    Ok(())
}
