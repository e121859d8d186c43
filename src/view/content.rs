//! Main content area rendering (section views, detail views, lists)

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Tabs, Wrap},
};

use crate::model::filter;
use crate::model::{
    ActiveSection, CalculatorFlow, CalculatorKind, CalculatorState, ContentRecord, ContentState,
    ContentView, KoshCategory, Language, LoadState, MuhuratWindow, PanchangDetail, PanchangTab,
    UiState,
};

use super::utils::{calculate_num_width, render_scrollable_list, strip_markup, truncate_string};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    load_state: &LoadState,
) {
    let is_focused = ui_state.active_section == ActiveSection::MainContent;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let language = ui_state.language;

    if content_state.is_loading {
        let loading = Paragraph::new(language.loading_text())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Content ")
                    .border_style(border_style),
            );
        frame.render_widget(loading, area);
        return;
    }

    match &content_state.view {
        ContentView::Empty => {
            let hint = match language {
                Language::Hindi => {
                    "अनुभाग चुनें और Enter दबाएँ\n\nTab से फ़ोकस बदलें\n↑/↓ से चुनें\n? से सहायता"
                }
                Language::English => {
                    "Pick a section and press Enter\n\nUse Tab to move focus\nUse ↑/↓ to select\nPress ? for help"
                }
            };
            let content = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(content, area);
        }
        ContentView::Panchang { tab, detail, muhurats, sade_sati } => {
            render_panchang(
                frame,
                area,
                *tab,
                detail.as_ref(),
                muhurats,
                sade_sati.as_deref(),
                language,
                border_style,
            );
        }
        ContentView::Rashifal { entries, selected_index } => {
            let title = match language {
                Language::Hindi => " राशिफल ",
                Language::English => " Rashifal ",
            };
            render_record_list(frame, area, title, entries, *selected_index, language, is_focused);
        }
        ContentView::KoshCategories { categories, selected_index } => {
            render_category_list(frame, area, categories, *selected_index, language, is_focused);
        }
        ContentView::KoshEntries { category, selected_index } => {
            let title = format!(" {} ", category.display_name(language));
            render_loader_list(
                frame,
                area,
                &title,
                load_state,
                &ui_state.search_query,
                ui_state.special_list.as_deref(),
                ui_state.sort_order,
                content_state.revealed,
                *selected_index,
                language,
                is_focused,
            );
        }
        ContentView::RecordDetail { record } => {
            render_record_detail(frame, area, record, language, border_style);
        }
        ContentView::BookCategories { categories, selected_index } => {
            let title = match language {
                Language::Hindi => " पुस्तक श्रेणियाँ ",
                Language::English => " Book Categories ",
            };
            render_record_list(frame, area, title, categories, *selected_index, language, is_focused);
        }
        ContentView::Books { books, selected_index } => {
            let title = match language {
                Language::Hindi => " पुस्तकें ",
                Language::English => " Books ",
            };
            render_record_list(frame, area, title, books, *selected_index, language, is_focused);
        }
        ContentView::Chapters { book, chapters, selected_index } => {
            let title = format!(" {} ", book.display_name(language));
            render_record_list(frame, area, &title, chapters, *selected_index, language, is_focused);
        }
        ContentView::ChapterContent { title, body } => {
            let text = Paragraph::new(strip_markup(body))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", title))
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(text, area);
        }
        ContentView::Listing { title, items, selected_index } => {
            let title = format!(" {} ", title);
            render_record_list(frame, area, &title, items, *selected_index, language, is_focused);
        }
        ContentView::ShopCategories { categories, selected_index } => {
            let title = match language {
                Language::Hindi => " शॉप श्रेणियाँ ",
                Language::English => " Shop Categories ",
            };
            render_record_list(frame, area, title, categories, *selected_index, language, is_focused);
        }
        ContentView::Shop { items, selected_index } => {
            let title = match language {
                Language::Hindi => " एस्ट्रो शॉप (o: ऑर्डर) ",
                Language::English => " AstroShop (o: order) ",
            };
            render_record_list(frame, area, title, items, *selected_index, language, is_focused);
        }
        ContentView::Quotes { selected_index } => {
            let title = match language {
                Language::Hindi => " सुविचार ",
                Language::English => " Divine Quotes ",
            };
            render_loader_list(
                frame,
                area,
                title,
                load_state,
                &ui_state.search_query,
                ui_state.special_list.as_deref(),
                ui_state.sort_order,
                content_state.revealed,
                *selected_index,
                language,
                is_focused,
            );
        }
        ContentView::PrashnaYantra { answer } => {
            let title = match language {
                Language::Hindi => " प्रश्न यंत्र ",
                Language::English => " Prashan Yantra ",
            };
            let text = answer
                .clone()
                .unwrap_or_else(|| language.no_data_text().to_string());
            let answer = Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .padding(Padding::horizontal(1))
                        .border_style(border_style),
                );
            frame.render_widget(answer, area);
        }
        ContentView::Calculators { selected_index } => {
            let items: Vec<ListItem> = CalculatorKind::ALL
                .iter()
                .enumerate()
                .map(|(i, kind)| {
                    let style = if i == *selected_index && is_focused {
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                    } else if i == *selected_index {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(kind.label(language)).style(style)
                })
                .collect();
            let title = match language {
                Language::Hindi => " गणक ",
                Language::English => " Calculators ",
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border_style);
            render_scrollable_list(frame, area, items, *selected_index, block);
        }
        ContentView::Calculator { flow } => {
            render_calculator(frame, area, flow, language, border_style);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_panchang(
    frame: &mut Frame,
    area: Rect,
    tab: PanchangTab,
    detail: Option<&PanchangDetail>,
    muhurats: &[MuhuratWindow],
    sade_sati: Option<&str>,
    language: Language,
    border_style: Style,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab strip
            Constraint::Min(0),    // Tab content
        ])
        .split(area);

    let labels: Vec<Line> = PanchangTab::ALL
        .iter()
        .map(|t| Line::from(t.label(language)))
        .collect();
    let selected = PanchangTab::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    let tabs = Tabs::new(labels)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(tabs, chunks[0]);

    let lines: Vec<Line> = match tab {
        PanchangTab::Overview => match detail {
            Some(detail) if !detail.rows(language).is_empty() => detail
                .rows(language)
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>12}  ", label),
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(value),
                    ])
                })
                .collect(),
            _ => vec![Line::from(language.no_data_text())],
        },
        PanchangTab::Muhurat => {
            if muhurats.is_empty() {
                vec![Line::from(language.no_data_text())]
            } else {
                muhurats
                    .iter()
                    .map(|w| {
                        let window = match (&w.start, &w.end) {
                            (Some(start), Some(end)) => format!("{} - {}", start, end),
                            (Some(start), None) => start.clone(),
                            _ => String::new(),
                        };
                        Line::from(vec![
                            Span::styled(
                                format!("{:<24}", w.name),
                                Style::default().fg(Color::Yellow),
                            ),
                            Span::raw(window),
                        ])
                    })
                    .collect()
            }
        }
        PanchangTab::SadeSati => vec![Line::from(
            sade_sati.unwrap_or(language.no_data_text()).to_string(),
        )],
        PanchangTab::Yoga => vec![Line::from(
            detail
                .and_then(|d| d.yoga.clone())
                .unwrap_or_else(|| language.no_data_text().to_string()),
        )],
    };

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", tab.label(language)))
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(body, chunks[1]);
}

fn render_record_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    records: &[ContentRecord],
    selected_index: usize,
    language: Language,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    if records.is_empty() {
        let empty = Paragraph::new(language.no_data_text())
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let num_width = calculate_num_width(records.len());
    let name_width = (area.width as usize).saturating_sub(num_width + 6);

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i == selected_index && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == selected_index {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let text = format!(
                "{:>num_width$}  {}",
                i + 1,
                truncate_string(record.display_name(language), name_width),
            );
            ListItem::new(text).style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, selected_index, block);
}

fn render_category_list(
    frame: &mut Frame,
    area: Rect,
    categories: &[KoshCategory],
    selected_index: usize,
    language: Language,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let title = match language {
        Language::Hindi => " कोश ",
        Language::English => " Kosh ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    if categories.is_empty() {
        let empty = Paragraph::new(language.no_data_text())
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == selected_index && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == selected_index {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(category.display_name(language)).style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, selected_index, block);
}

/// List backed by the progressive loader: narrowed by the live query and
/// letter index, sorted, and capped at the revealed window, with a
/// shown/loaded count in the title.
#[allow(clippy::too_many_arguments)]
fn render_loader_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    load_state: &LoadState,
    query: &str,
    initial: Option<&str>,
    order: filter::SortOrder,
    revealed: usize,
    selected_index: usize,
    language: Language,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if let Some(error) = &load_state.error {
        let text = format!("{}: {}", language.error_text(), error);
        let widget = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(border_style),
            );
        frame.render_widget(widget, area);
        return;
    }

    if load_state.is_loading && load_state.records.is_empty() {
        let widget = Paragraph::new(language.loading_text())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(border_style),
            );
        frame.render_widget(widget, area);
        return;
    }

    let records = filter::visible(&load_state.records, query, initial, order, revealed);
    let titled = match initial {
        Some(initial) => format!(
            "{}[{}] ({}/{}) ",
            title,
            initial,
            records.len(),
            load_state.records.len()
        ),
        None => format!("{}({}/{}) ", title, records.len(), load_state.records.len()),
    };
    render_record_list(frame, area, &titled, &records, selected_index, language, is_focused);
}

fn render_record_detail(
    frame: &mut Frame,
    area: Rect,
    record: &ContentRecord,
    language: Language,
    border_style: Style,
) {
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        record.display_name(language).to_string(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))];
    if let Some(name_en) = &record.name_en {
        if language == Language::Hindi {
            lines.push(Line::from(Span::styled(
                name_en.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));
    if let Some(meaning) = &record.meaning {
        lines.push(Line::from(strip_markup(meaning)));
        lines.push(Line::from(""));
    }
    if let Some(details) = &record.details {
        lines.push(Line::from(strip_markup(details)));
    }
    if let Some(extra) = &record.extra {
        lines.push(Line::from(""));
        lines.push(Line::from(strip_markup(extra)));
    }
    if lines.len() <= 2 {
        lines.push(Line::from(language.no_data_text()));
    }

    let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(detail, area);
}

fn render_calculator(
    frame: &mut Frame,
    area: Rect,
    flow: &CalculatorFlow,
    language: Language,
    border_style: Style,
) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in flow.fields.iter().enumerate() {
        let marker = if field.required { "*" } else { " " };
        let label_style = if i == flow.focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value = if field.value.is_empty() && i == flow.focused {
            "_".to_string()
        } else {
            field.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<28}", marker, field.label), label_style),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));

    match &flow.state {
        CalculatorState::Idle => {
            let hint = match language {
                Language::Hindi => "Enter से गणना करें",
                Language::English => "Press Enter to calculate",
            };
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )));
        }
        CalculatorState::Loading => {
            lines.push(Line::from(Span::styled(
                language.loading_text(),
                Style::default().fg(Color::Yellow),
            )));
        }
        CalculatorState::Success(result) => {
            lines.push(Line::from(Span::styled(
                result.heading.clone(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            for (key, value) in &result.rows {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>14}  ", key),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(value.clone()),
                ]));
            }
        }
        CalculatorState::Error(message) => {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", flow.kind.label(language)))
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(form, area);
}
