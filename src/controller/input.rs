//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::filter;
use crate::model::{ActiveSection, ContentView};

use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) {
        // Dismissable popups swallow the first key press.
        {
            let model = self.model.lock().await;
            if model.has_error().await {
                model.clear_error().await;
                return;
            }
            if model.is_help_popup_open().await {
                model.hide_help_popup().await;
                return;
            }
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            let model = self.model.lock().await;
            model.set_should_quit(true).await;
            return;
        }

        let picker_open = {
            let model = self.model.lock().await;
            model.is_city_picker_open().await
        };
        if picker_open {
            self.handle_city_picker_key(key).await;
            return;
        }

        let active = {
            let model = self.model.lock().await;
            model.get_ui_state().await.active_section
        };
        match active {
            ActiveSection::Search => self.handle_search_key(key).await,
            ActiveSection::Sections => self.handle_sections_key(key).await,
            ActiveSection::MainContent => self.handle_content_key(key).await,
        }
    }

    /// Keys that mean the same everywhere outside text input. Returns true
    /// when the key was consumed.
    async fn handle_global_key(&self, key: KeyEvent) -> bool {
        let model = self.model.lock().await;
        match key.code {
            KeyCode::Char('q') => {
                model.set_should_quit(true).await;
                true
            }
            KeyCode::Tab => {
                model.cycle_section_forward().await;
                true
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
                true
            }
            KeyCode::Char('?') => {
                model.show_help_popup().await;
                true
            }
            KeyCode::Char('l') => {
                model.toggle_language().await;
                true
            }
            KeyCode::Char('c') => {
                model.show_city_picker().await;
                drop(model);
                // Blank input primes the popular-cities fallback.
                self.lookup.input_changed(String::new()).await;
                true
            }
            KeyCode::Char('[') => {
                model.shift_date(-1).await;
                drop(model);
                self.reload_panchang_if_active().await;
                true
            }
            KeyCode::Char(']') => {
                model.shift_date(1).await;
                drop(model);
                self.reload_panchang_if_active().await;
                true
            }
            _ => false,
        }
    }

    async fn handle_search_key(&self, key: KeyEvent) {
        let model = self.model.lock().await;
        match key.code {
            KeyCode::Tab => model.cycle_section_forward().await,
            KeyCode::BackTab => model.cycle_section_backward().await,
            KeyCode::Esc => model.clear_search().await,
            KeyCode::Enter => model.set_active_section(ActiveSection::MainContent).await,
            KeyCode::Backspace => model.backspace_search().await,
            // The filter is applied live at render time, no request here.
            KeyCode::Char(c) => model.append_to_search(c).await,
            _ => {}
        }
    }

    async fn handle_sections_key(&self, key: KeyEvent) {
        if self.handle_global_key(key).await {
            return;
        }
        match key.code {
            KeyCode::Up => {
                let model = self.model.lock().await;
                model.move_section_selection(false).await;
            }
            KeyCode::Down => {
                let model = self.model.lock().await;
                model.move_section_selection(true).await;
            }
            KeyCode::Enter => self.open_selected_section().await,
            _ => {}
        }
    }

    async fn handle_content_key(&self, key: KeyEvent) {
        let in_calculator = {
            let model = self.model.lock().await;
            matches!(
                model.get_content_state().await.view,
                ContentView::Calculator { .. }
            )
        };
        if in_calculator {
            self.handle_calculator_key(key).await;
            return;
        }

        if self.handle_global_key(key).await {
            return;
        }
        match key.code {
            KeyCode::Up => {
                let model = self.model.lock().await;
                model.content_move_up().await;
            }
            KeyCode::Down => self.move_content_down().await,
            KeyCode::Left => self.switch_panchang_tab(false).await,
            KeyCode::Right => self.switch_panchang_tab(true).await,
            KeyCode::Enter => self.activate_selection().await,
            KeyCode::Char('o') => self.order_selected_product().await,
            KeyCode::Char('s') => {
                let model = self.model.lock().await;
                model.cycle_sort_order().await;
            }
            KeyCode::Char('r') => self.open_last_report().await,
            KeyCode::Char('i') => self.toggle_initial_filter().await,
            KeyCode::Esc | KeyCode::Backspace => {
                let model = self.model.lock().await;
                if !model.navigate_back().await {
                    model.set_active_section(ActiveSection::Sections).await;
                }
            }
            _ => {}
        }
    }

    /// Cursor-down plus the scroll-reveal check for loader-backed lists.
    async fn move_content_down(&self) {
        let load = self.loader.snapshot().await;
        let model = self.model.lock().await;
        let ui = model.get_ui_state().await;
        let revealed = model.get_content_state().await.revealed;

        let narrowed =
            filter::narrow(&load.records, &ui.search_query, ui.special_list.as_deref());
        let visible_len = narrowed.len().min(revealed);
        if let Some(cursor) = model.content_move_down(visible_len).await {
            model.maybe_reveal_more(cursor, narrowed.len()).await;
        }
    }

    /// Toggle the letter-index narrowing on a loader-backed list, keyed to
    /// the highlighted record's title initial.
    async fn toggle_initial_filter(&self) {
        let (already_set, language, index) = {
            let model = self.model.lock().await;
            let ui = model.get_ui_state().await;
            let index = match model.get_content_state().await.view {
                ContentView::KoshEntries { selected_index, .. }
                | ContentView::Quotes { selected_index } => Some(selected_index),
                _ => None,
            };
            (ui.special_list.is_some(), ui.language, index)
        };
        let Some(index) = index else {
            return;
        };

        if already_set {
            let model = self.model.lock().await;
            model.set_special_list(None).await;
            model.reset_loader_cursor().await;
            return;
        }

        let records = self.visible_records().await;
        if let Some(record) = records.get(index) {
            let initial: String = record.display_name(language).chars().take(1).collect();
            let model = self.model.lock().await;
            model.set_special_list(Some(initial)).await;
            model.reset_loader_cursor().await;
        }
    }

    /// Tabs only reorder already-loaded panchang data, nothing is refetched.
    async fn switch_panchang_tab(&self, forward: bool) {
        let model = self.model.lock().await;
        if let Some(tab) = model.panchang_tab().await {
            let next = if forward { tab.next() } else { tab.prev() };
            model.set_panchang_tab(next).await;
        }
    }

    async fn handle_city_picker_key(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let model = self.model.lock().await;
                model.hide_city_picker().await;
            }
            KeyCode::Enter => self.commit_city_selection().await,
            KeyCode::Up => {
                let model = self.model.lock().await;
                model.city_picker_move(false).await;
            }
            KeyCode::Down => {
                let model = self.model.lock().await;
                model.city_picker_move(true).await;
            }
            KeyCode::Backspace => {
                let input = {
                    let model = self.model.lock().await;
                    model.backspace_city_input().await
                };
                self.lookup.input_changed(input).await;
            }
            KeyCode::Char(c) => {
                let input = {
                    let model = self.model.lock().await;
                    model.append_city_input(c).await
                };
                self.lookup.input_changed(input).await;
            }
            _ => {}
        }
    }

    async fn handle_calculator_key(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let model = self.model.lock().await;
                model.navigate_back().await;
            }
            KeyCode::Enter => self.submit_calculator().await,
            KeyCode::Tab | KeyCode::Down => {
                let model = self.model.lock().await;
                model
                    .with_calculator(|flow| {
                        flow.focused = (flow.focused + 1) % flow.fields.len();
                    })
                    .await;
            }
            KeyCode::BackTab | KeyCode::Up => {
                let model = self.model.lock().await;
                model
                    .with_calculator(|flow| {
                        flow.focused = flow.focused.checked_sub(1).unwrap_or(flow.fields.len() - 1);
                    })
                    .await;
            }
            KeyCode::Backspace => {
                let model = self.model.lock().await;
                model
                    .with_calculator(|flow| {
                        let focused = flow.focused;
                        if let Some(field) = flow.fields.get_mut(focused) {
                            field.value.pop();
                        }
                    })
                    .await;
            }
            KeyCode::Char(c) => {
                let model = self.model.lock().await;
                model
                    .with_calculator(|flow| {
                        let focused = flow.focused;
                        if let Some(field) = flow.fields.get_mut(focused) {
                            field.value.push(c);
                        }
                    })
                    .await;
            }
            _ => {}
        }
    }
}
