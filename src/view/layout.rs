//! Layout rendering (top bar, sidebar, main area structure)

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use crate::model::{ActiveSection, Language, Section, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Filter input
            Constraint::Length(14), // Date
            Constraint::Length(24), // Location
            Constraint::Length(11), // Language
        ])
        .split(area);

    let search_focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if search_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        match ui_state.language {
            Language::Hindi => "खोजें...",
            Language::English => "Type to filter...",
        }
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filter ")
            .padding(Padding::horizontal(1))
            .border_style(if search_focused {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[0]);

    let date = Paragraph::new(ui_state.date.format("%Y-%m-%d").to_string())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Date "));
    frame.render_widget(date, chunks[1]);

    let location_name = ui_state
        .location
        .as_ref()
        .map(|l| l.name.as_str())
        .unwrap_or("New Delhi");
    let location = Paragraph::new(format!("📍 {}", location_name))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" City (c) "));
    frame.render_widget(location, chunks[2]);

    let language_label = match ui_state.language {
        Language::Hindi => "हिन्दी",
        Language::English => "English",
    };
    let language = Paragraph::new(language_label)
        .style(Style::default().fg(Color::Magenta))
        .block(Block::default().borders(Borders::ALL).title(" Lang (l) "));
    frame.render_widget(language, chunks[3]);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let sections_focused = ui_state.active_section == ActiveSection::Sections;

    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if i == ui_state.section_selected && sections_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == ui_state.section_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(section.label(ui_state.language)).style(style)
        })
        .collect();

    let border_style = if sections_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let title = match ui_state.language {
        Language::Hindi => " अनुभाग ",
        Language::English => " Sections ",
    };

    let sections = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.section_selected));

    frame.render_stateful_widget(sections, area, &mut list_state);
}
