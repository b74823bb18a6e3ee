pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::Frame;

use crate::app::AppState;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.session.as_ref().and_then(|session| session.editor()) {
        Some(editor) => screens::splits::render(frame, area, state, editor),
        None => screens::loading::render(frame, area, state),
    }
}
