mod clock;
mod render;
mod state;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use program_map_core::Dataset;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use crate::state::{log, WebState};

fn main() -> io::Result<()> {
    let dataset = match Dataset::bundled() {
        Ok(dataset) => dataset,
        Err(e) => {
            log(&format!("bundled program data is invalid: {e}"));
            return Err(io::Error::new(io::ErrorKind::InvalidData, e.to_string()));
        }
    };
    log(&format!("loaded {} programs", dataset.len()));

    let state = Rc::new(RefCell::new(WebState::new(Arc::new(dataset))));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| state.borrow_mut().handle_key(event.code, event.shift)
    });

    terminal.draw_web(move |f| {
        let inner = render::map_inner(render::page_layout(f.area()).map);
        let mut state = state.borrow_mut();
        state.frame(js_sys::Date::now(), inner.width, inner.height);
        render::draw(&state, f);
    });

    Ok(())
}
