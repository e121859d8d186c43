//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use tokio::sync::Mutex;

use super::calculator::CalculatorFlow;
use super::content::{
    ContentRecord, ContentState, ContentView, KoshCategory, MuhuratWindow, PanchangDetail,
};
use super::lookup::LocationCandidate;
use super::types::{ActiveSection, Language, PanchangTab, SelectedItem, UiState};

/// Main application model containing all state
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn toggle_language(&self) {
        let mut state = self.ui_state.lock().await;
        state.language = state.language.toggle();
    }

    pub async fn language(&self) -> Language {
        self.ui_state.lock().await.language
    }

    pub async fn set_section_selected(&self, index: usize) {
        let mut state = self.ui_state.lock().await;
        state.section_selected = index.min(super::types::Section::ALL.len() - 1);
    }

    pub async fn move_section_selection(&self, down: bool) {
        let mut state = self.ui_state.lock().await;
        if down {
            if state.section_selected < super::types::Section::ALL.len() - 1 {
                state.section_selected += 1;
            }
        } else if state.section_selected > 0 {
            state.section_selected -= 1;
        }
    }

    pub async fn shift_date(&self, days: i64) {
        let mut state = self.ui_state.lock().await;
        state.date += Duration::days(days);
    }

    pub async fn set_location(&self, location: LocationCandidate) {
        let mut state = self.ui_state.lock().await;
        state.location = Some(location);
    }

    // ========================================================================
    // Search / filter input
    // ========================================================================

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop();
    }

    /// Clears both narrowing terms; called on every category switch.
    pub async fn clear_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_query.clear();
        state.special_list = None;
    }

    pub async fn set_special_list(&self, term: Option<String>) {
        let mut state = self.ui_state.lock().await;
        state.special_list = term;
    }

    pub async fn cycle_sort_order(&self) {
        let mut state = self.ui_state.lock().await;
        state.sort_order = state.sort_order.next();
    }

    // ========================================================================
    // Errors & popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // City picker
    // ========================================================================

    pub async fn show_city_picker(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_city_picker = true;
        state.city_input.clear();
        state.city_candidates.clear();
        state.city_selected = 0;
        state.city_lookup_error = None;
    }

    pub async fn hide_city_picker(&self) {
        self.ui_state.lock().await.show_city_picker = false;
    }

    pub async fn is_city_picker_open(&self) -> bool {
        self.ui_state.lock().await.show_city_picker
    }

    pub async fn append_city_input(&self, c: char) -> String {
        let mut state = self.ui_state.lock().await;
        state.city_input.push(c);
        state.city_input.clone()
    }

    pub async fn backspace_city_input(&self) -> String {
        let mut state = self.ui_state.lock().await;
        state.city_input.pop();
        state.city_input.clone()
    }

    pub async fn set_city_candidates(&self, candidates: Vec<LocationCandidate>, error: Option<String>) {
        let mut state = self.ui_state.lock().await;
        state.city_selected = state.city_selected.min(candidates.len().saturating_sub(1));
        state.city_candidates = candidates;
        state.city_lookup_error = error;
    }

    pub async fn city_picker_move(&self, down: bool) {
        let mut state = self.ui_state.lock().await;
        if down {
            if state.city_selected < state.city_candidates.len().saturating_sub(1) {
                state.city_selected += 1;
            }
        } else if state.city_selected > 0 {
            state.city_selected -= 1;
        }
    }

    pub async fn get_selected_city(&self) -> Option<LocationCandidate> {
        let state = self.ui_state.lock().await;
        state.city_candidates.get(state.city_selected).cloned()
    }

    // ========================================================================
    // Content state
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn set_content_loading(&self, loading: bool) {
        self.content_state.lock().await.is_loading = loading;
    }

    /// Replace the view, pushing the previous one onto the navigation stack.
    pub async fn push_view(&self, view: ContentView) {
        let mut state = self.content_state.lock().await;
        if !matches!(state.view, ContentView::Empty) {
            let previous = state.view.clone();
            state.navigation_stack.push(previous);
        }
        state.view = view;
        state.is_loading = false;
    }

    /// Replace the view and drop the navigation history (section switch).
    pub async fn reset_view(&self, view: ContentView) {
        let mut state = self.content_state.lock().await;
        state.navigation_stack.clear();
        state.view = view;
        state.is_loading = false;
        state.reset_reveal();
    }

    pub async fn navigate_back(&self) -> bool {
        let mut state = self.content_state.lock().await;
        if let Some(previous) = state.navigation_stack.pop() {
            state.view = previous;
            true
        } else {
            state.view = ContentView::Empty;
            false
        }
    }

    pub async fn set_panchang_tab(&self, tab: PanchangTab) {
        let mut state = self.content_state.lock().await;
        if let ContentView::Panchang { tab: current, .. } = &mut state.view {
            *current = tab;
        }
    }

    pub async fn panchang_tab(&self) -> Option<PanchangTab> {
        let state = self.content_state.lock().await;
        if let ContentView::Panchang { tab, .. } = &state.view {
            Some(*tab)
        } else {
            None
        }
    }

    pub async fn set_panchang(
        &self,
        detail: Option<PanchangDetail>,
        muhurats: Vec<MuhuratWindow>,
        sade_sati: Option<String>,
        tab: PanchangTab,
    ) {
        self.reset_view(ContentView::Panchang { tab, detail, muhurats, sade_sati })
            .await;
    }

    pub async fn set_kosh_entries_view(&self, category: KoshCategory) {
        let mut state = self.content_state.lock().await;
        if !matches!(state.view, ContentView::Empty) {
            let previous = state.view.clone();
            state.navigation_stack.push(previous);
        }
        state.view = ContentView::KoshEntries { category, selected_index: 0 };
        state.is_loading = false;
        state.reset_reveal();
    }

    /// Move the cursor up within the current view.
    pub async fn content_move_up(&self) {
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::Rashifal { selected_index, .. }
            | ContentView::KoshCategories { selected_index, .. }
            | ContentView::KoshEntries { selected_index, .. }
            | ContentView::BookCategories { selected_index, .. }
            | ContentView::ShopCategories { selected_index, .. }
            | ContentView::Books { selected_index, .. }
            | ContentView::Chapters { selected_index, .. }
            | ContentView::Listing { selected_index, .. }
            | ContentView::Shop { selected_index, .. }
            | ContentView::Quotes { selected_index }
            | ContentView::Calculators { selected_index } => {
                if *selected_index > 0 {
                    *selected_index -= 1;
                }
            }
            _ => {}
        }
    }

    /// Move the cursor down. `visible_len` is the length of the list the
    /// renderer currently shows (loader-backed views do not own their data).
    /// Returns the new cursor for loader-backed views so the controller can
    /// run the reveal check.
    pub async fn content_move_down(&self, visible_len: usize) -> Option<usize> {
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::Rashifal { entries, selected_index } => {
                if *selected_index < entries.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::KoshCategories { categories, selected_index } => {
                if *selected_index < categories.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::BookCategories { categories, selected_index }
            | ContentView::ShopCategories { categories, selected_index } => {
                if *selected_index < categories.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::Books { books, selected_index } => {
                if *selected_index < books.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::Chapters { chapters, selected_index, .. } => {
                if *selected_index < chapters.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::Listing { items, selected_index, .. }
            | ContentView::Shop { items, selected_index } => {
                if *selected_index < items.len().saturating_sub(1) {
                    *selected_index += 1;
                }
                None
            }
            ContentView::KoshEntries { selected_index, .. }
            | ContentView::Quotes { selected_index } => {
                if *selected_index < visible_len.saturating_sub(1) {
                    *selected_index += 1;
                }
                Some(*selected_index)
            }
            ContentView::Calculators { selected_index } => {
                if *selected_index < super::calculator::CalculatorKind::ALL.len() - 1 {
                    *selected_index += 1;
                }
                None
            }
            _ => None,
        }
    }

    /// Run the scroll-reveal check for loader-backed views.
    pub async fn maybe_reveal_more(&self, cursor: usize, loaded: usize) -> bool {
        let mut state = self.content_state.lock().await;
        state.maybe_reveal_more(cursor, loaded)
    }

    /// Put the cursor back at the top of a loader-backed list after the
    /// narrowing terms change underneath it.
    pub async fn reset_loader_cursor(&self) {
        let mut state = self.content_state.lock().await;
        if let ContentView::KoshEntries { selected_index, .. }
        | ContentView::Quotes { selected_index } = &mut state.view
        {
            *selected_index = 0;
        }
    }

    pub async fn get_selected_content_item(&self) -> Option<SelectedItem> {
        let state = self.content_state.lock().await;
        match &state.view {
            ContentView::KoshCategories { categories, selected_index } => categories
                .get(*selected_index)
                .map(|c| SelectedItem::KoshCategory { id: c.id }),
            ContentView::BookCategories { categories, selected_index } => categories
                .get(*selected_index)
                .map(|c| SelectedItem::BookCategory { id: c.id }),
            ContentView::ShopCategories { categories, selected_index } => categories
                .get(*selected_index)
                .map(|c| SelectedItem::ShopCategory { id: c.id }),
            ContentView::KoshEntries { selected_index, .. }
            | ContentView::Quotes { selected_index } => {
                Some(SelectedItem::Record { index: *selected_index })
            }
            ContentView::Rashifal { selected_index, .. }
            | ContentView::Listing { selected_index, .. }
            | ContentView::Shop { selected_index, .. } => {
                Some(SelectedItem::Record { index: *selected_index })
            }
            ContentView::Books { books, selected_index } => {
                books.get(*selected_index).map(|b| SelectedItem::Book { id: b.id })
            }
            ContentView::Chapters { chapters, selected_index, .. } => chapters
                .get(*selected_index)
                .map(|c| SelectedItem::Chapter { id: c.id }),
            ContentView::Calculators { selected_index } => {
                Some(SelectedItem::Calculator { index: *selected_index })
            }
            _ => None,
        }
    }

    /// Select a record from a view that owns its items (rashifal, listings).
    pub async fn get_owned_record(&self, index: usize) -> Option<ContentRecord> {
        let state = self.content_state.lock().await;
        match &state.view {
            ContentView::Rashifal { entries, .. } => entries.get(index).cloned(),
            ContentView::Listing { items, .. } => items.get(index).cloned(),
            ContentView::Shop { items, .. } => items.get(index).cloned(),
            _ => None,
        }
    }

    /// Mutate the active calculator flow in place.
    pub async fn with_calculator<R>(&self, f: impl FnOnce(&mut CalculatorFlow) -> R) -> Option<R> {
        let mut state = self.content_state.lock().await;
        if let ContentView::Calculator { flow } = &mut state.view {
            Some(f(flow))
        } else {
            None
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u64, name: &str) -> ContentRecord {
        ContentRecord { id, name: name.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn clearing_search_drops_both_narrowing_terms() {
        let model = AppModel::new();
        model.append_to_search('m').await;
        model.set_special_list(Some("अ".to_string())).await;

        model.clear_search().await;

        let ui = model.get_ui_state().await;
        assert!(ui.search_query.is_empty());
        assert!(ui.special_list.is_none());
    }

    #[tokio::test]
    async fn category_index_selection_names_its_section() {
        let model = AppModel::new();

        model
            .reset_view(ContentView::BookCategories {
                categories: vec![category(3, "ज्योतिष"), category(5, "वास्तु")],
                selected_index: 1,
            })
            .await;
        assert!(matches!(
            model.get_selected_content_item().await,
            Some(SelectedItem::BookCategory { id: 5 })
        ));

        model
            .reset_view(ContentView::ShopCategories {
                categories: vec![category(8, "रत्न")],
                selected_index: 0,
            })
            .await;
        assert!(matches!(
            model.get_selected_content_item().await,
            Some(SelectedItem::ShopCategory { id: 8 })
        ));
    }

    #[tokio::test]
    async fn loader_cursor_resets_only_for_loader_views() {
        let model = AppModel::new();
        model.reset_view(ContentView::Quotes { selected_index: 7 }).await;
        model.reset_loader_cursor().await;
        assert!(matches!(
            model.get_content_state().await.view,
            ContentView::Quotes { selected_index: 0 }
        ));

        model
            .reset_view(ContentView::Rashifal {
                entries: vec![category(1, "मेष")],
                selected_index: 0,
            })
            .await;
        model.reset_loader_cursor().await;
        assert!(matches!(
            model.get_content_state().await.view,
            ContentView::Rashifal { .. }
        ));
    }
}
