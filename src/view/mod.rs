//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, markup stripping, lists)
//! - `layout`: Main layout structure (top bar, sidebar)
//! - `content`: Main content area rendering
//! - `overlays`: Modal overlays (error, city picker, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::model::{ContentState, LoadState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        content_state: &ContentState,
        load_state: &LoadState,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filter + date + city + language
                Constraint::Min(0),    // Main content (sidebar + content)
            ])
            .split(frame.area());

        // Top bar: filter input plus date, city and language indicators
        layout::render_top_bar(frame, chunks[0], ui_state);

        // Middle: sidebar (sections) and main content
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(26), // Sidebar (sections)
                Constraint::Percentage(74), // Main content
            ])
            .split(chunks[1]);

        layout::render_sidebar(frame, main_chunks[0], ui_state);

        content::render_main_content(frame, main_chunks[1], ui_state, content_state, load_state);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // City picker overlay (if open)
        if ui_state.show_city_picker {
            overlays::render_city_picker(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
