//! Section, category and detail navigation flows.

use anyhow::Result;

use crate::model::{
    ActiveSection, ContentRecord, ContentView, KoshCategory, Language, ListSource,
    LocationCandidate, PanchangTab, Section, SelectedItem,
};
use crate::route::Route;

use super::AppController;

/// Location used for panchang calculations until the user picks a city.
fn default_location() -> LocationCandidate {
    LocationCandidate {
        name: "New Delhi".to_string(),
        latitude: 28.6139,
        longitude: 77.2090,
    }
}

impl AppController {
    /// Apply a startup route argument such as `panchang?tab=yoga`.
    pub async fn apply_route(&self, route: Route) {
        {
            let model = self.model.lock().await;
            if let Some(index) = Section::ALL.iter().position(|s| *s == route.section) {
                model.set_section_selected(index).await;
            }
        }
        self.open_section(route.section).await;
        if let Some(tab) = route.tab {
            let model = self.model.lock().await;
            model.set_panchang_tab(tab).await;
        }
    }

    /// Open the section highlighted in the sidebar.
    pub async fn open_selected_section(&self) {
        let index = {
            let model = self.model.lock().await;
            model.get_ui_state().await.section_selected
        };
        if let Some(section) = Section::ALL.get(index).copied() {
            self.open_section(section).await;
        }
    }

    pub async fn open_section(&self, section: Section) {
        tracing::info!(section = section.slug(), "opening section");
        let language = {
            let model = self.model.lock().await;
            model.clear_search().await;
            model.set_content_loading(true).await;
            model.language().await
        };

        match section {
            Section::Panchang => self.load_panchang(PanchangTab::Overview).await,
            Section::Rashifal => {
                let date = {
                    let model = self.model.lock().await;
                    model.get_ui_state().await.date
                };
                match self.client.rashifal(date).await {
                    Ok(entries) => {
                        let model = self.model.lock().await;
                        model
                            .reset_view(ContentView::Rashifal { entries, selected_index: 0 })
                            .await;
                    }
                    Err(e) => self.fail_open(&e).await,
                }
            }
            Section::Kosh => match self.client.kosh_categories().await {
                Ok(categories) => {
                    let model = self.model.lock().await;
                    model
                        .reset_view(ContentView::KoshCategories { categories, selected_index: 0 })
                        .await;
                }
                Err(e) => self.fail_open(&e).await,
            },
            Section::Books => match self.client.book_categories().await {
                Ok(categories) => {
                    let model = self.model.lock().await;
                    model
                        .reset_view(ContentView::BookCategories { categories, selected_index: 0 })
                        .await;
                }
                Err(e) => self.fail_open(&e).await,
            },
            Section::Magazines => {
                let result = self.client.magazines(Some(language.code())).await;
                self.open_listing(section.label(language), result).await;
            }
            Section::Shop => match self.client.shop_categories().await {
                Ok(categories) => {
                    let model = self.model.lock().await;
                    model
                        .reset_view(ContentView::ShopCategories { categories, selected_index: 0 })
                        .await;
                }
                Err(e) => self.fail_open(&e).await,
            },
            Section::EPooja => {
                let result = self.client.epoojas().await;
                self.open_listing(section.label(language), result).await;
            }
            Section::Videos => {
                let result = self.client.videos().await;
                self.open_listing(section.label(language), result).await;
            }
            Section::Quotes => {
                {
                    let model = self.model.lock().await;
                    model.reset_view(ContentView::Quotes { selected_index: 0 }).await;
                }
                let loader = self.loader.clone();
                let generation = loader.begin();
                tokio::spawn(async move {
                    loader.load(generation, ListSource::Quotes).await;
                });
            }
            Section::PrashnaYantra => match self.client.prashna_yantra().await {
                Ok(answer) => {
                    let model = self.model.lock().await;
                    model.reset_view(ContentView::PrashnaYantra { answer }).await;
                }
                Err(e) => self.fail_open(&e).await,
            },
            Section::Calculators => {
                let model = self.model.lock().await;
                model.reset_view(ContentView::Calculators { selected_index: 0 }).await;
            }
        }

        let model = self.model.lock().await;
        model.set_active_section(ActiveSection::MainContent).await;
    }

    async fn open_listing(&self, title: &str, result: Result<Vec<ContentRecord>>) {
        match result {
            Ok(items) => {
                let model = self.model.lock().await;
                model
                    .reset_view(ContentView::Listing {
                        title: title.to_string(),
                        items,
                        selected_index: 0,
                    })
                    .await;
            }
            Err(e) => self.fail_open(&e).await,
        }
    }

    async fn fail_open(&self, error: &anyhow::Error) {
        tracing::error!(error = %error, "section load failed");
        let model = self.model.lock().await;
        model.set_error(Self::format_error(error)).await;
        model.reset_view(ContentView::Empty).await;
    }

    /// Fetch panchang, muhurat and sade sati for the selected date and
    /// location. The overview is mandatory; the other two degrade to empty.
    pub async fn load_panchang(&self, tab: PanchangTab) {
        let (date, location) = {
            let model = self.model.lock().await;
            let state = model.get_ui_state().await;
            (state.date, state.location.unwrap_or_else(default_location))
        };

        let (panchang, muhurat, sade_sati) = futures::join!(
            self.client.panchang(date, location.latitude, location.longitude),
            self.client.muhurat(date, location.latitude, location.longitude),
            self.client.sade_sati(date),
        );

        let detail = match panchang {
            Ok(detail) if !detail.is_empty() => Some(detail),
            Ok(_) => None,
            Err(e) => {
                self.fail_open(&e).await;
                return;
            }
        };
        let muhurats = muhurat.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "muhurat load failed");
            Vec::new()
        });
        let sade_sati = sade_sati.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "sade sati load failed");
            None
        });

        let model = self.model.lock().await;
        model.set_panchang(detail, muhurats, sade_sati, tab).await;
    }

    /// Reload panchang after a date shift or city change, keeping the tab.
    pub async fn reload_panchang_if_active(&self) {
        let tab = {
            let model = self.model.lock().await;
            model.panchang_tab().await
        };
        if let Some(tab) = tab {
            {
                let model = self.model.lock().await;
                model.set_content_loading(true).await;
            }
            self.load_panchang(tab).await;
        }
    }

    /// Act on the item under the cursor in the main content area.
    pub async fn activate_selection(&self) {
        let (item, view) = {
            let model = self.model.lock().await;
            (
                model.get_selected_content_item().await,
                model.get_content_state().await.view,
            )
        };
        let Some(item) = item else {
            return;
        };

        match item {
            SelectedItem::KoshCategory { id } => {
                if let ContentView::KoshCategories { categories, .. } = view {
                    if let Some(category) = categories.into_iter().find(|c| c.id == id) {
                        self.open_kosh_category(category).await;
                    }
                }
            }
            SelectedItem::BookCategory { id } => {
                if let ContentView::BookCategories { categories, .. } = view {
                    if let Some(category) = categories.into_iter().find(|c| c.id == id) {
                        self.open_book_category(category).await;
                    }
                }
            }
            SelectedItem::ShopCategory { id } => {
                if let ContentView::ShopCategories { categories, .. } = view {
                    if let Some(category) = categories.into_iter().find(|c| c.id == id) {
                        self.open_shop_category(category).await;
                    }
                }
            }
            SelectedItem::Record { index } => self.open_record(index).await,
            SelectedItem::Book { id } => {
                if let ContentView::Books { books, .. } = view {
                    if let Some(book) = books.into_iter().find(|b| b.id == id) {
                        self.open_book(book).await;
                    }
                }
            }
            SelectedItem::Chapter { id } => {
                if let ContentView::Chapters { chapters, .. } = view {
                    if let Some(chapter) = chapters.into_iter().find(|c| c.id == id) {
                        self.open_chapter(chapter).await;
                    }
                }
            }
            SelectedItem::Calculator { index } => self.open_calculator(index).await,
        }
    }

    pub async fn open_kosh_category(&self, category: KoshCategory) {
        let id = category.id;
        {
            let model = self.model.lock().await;
            model.set_kosh_entries_view(category).await;
            model.clear_search().await;
        }
        let loader = self.loader.clone();
        let generation = loader.begin();
        tokio::spawn(async move {
            loader.load(generation, ListSource::KoshCategory(id)).await;
        });
    }

    /// Open the detail view for a record list entry. Loader-backed views
    /// resolve against the rendered (filtered, revealed) list.
    async fn open_record(&self, index: usize) {
        let view = {
            let model = self.model.lock().await;
            model.get_content_state().await.view
        };
        let record = match view {
            ContentView::KoshEntries { .. } | ContentView::Quotes { .. } => {
                self.visible_records().await.get(index).cloned()
            }
            _ => {
                let model = self.model.lock().await;
                model.get_owned_record(index).await
            }
        };
        if let Some(record) = record {
            let model = self.model.lock().await;
            model.push_view(ContentView::RecordDetail { record }).await;
        }
    }

    async fn open_book_category(&self, category: ContentRecord) {
        {
            let model = self.model.lock().await;
            model.set_content_loading(true).await;
        }
        match self.client.books(category.id).await {
            Ok(books) => {
                let model = self.model.lock().await;
                model.push_view(ContentView::Books { books, selected_index: 0 }).await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
                model.set_content_loading(false).await;
            }
        }
    }

    async fn open_shop_category(&self, category: ContentRecord) {
        {
            let model = self.model.lock().await;
            model.set_content_loading(true).await;
        }
        match self.client.shop_products(category.id).await {
            Ok(items) => {
                let model = self.model.lock().await;
                model.push_view(ContentView::Shop { items, selected_index: 0 }).await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
                model.set_content_loading(false).await;
            }
        }
    }

    async fn open_book(&self, book: ContentRecord) {
        {
            let model = self.model.lock().await;
            model.set_content_loading(true).await;
        }
        match self.client.chapters(book.id).await {
            Ok(chapters) => {
                let model = self.model.lock().await;
                model
                    .push_view(ContentView::Chapters { book, chapters, selected_index: 0 })
                    .await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
                model.set_content_loading(false).await;
            }
        }
    }

    async fn open_chapter(&self, chapter: ContentRecord) {
        let language = {
            let model = self.model.lock().await;
            model.set_content_loading(true).await;
            model.language().await
        };
        match self.client.chapter_content(chapter.id).await {
            Ok(body) => {
                let model = self.model.lock().await;
                model
                    .push_view(ContentView::ChapterContent {
                        title: chapter.display_name(language).to_string(),
                        body: body.unwrap_or_else(|| language.no_data_text().to_string()),
                    })
                    .await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
                model.set_content_loading(false).await;
            }
        }
    }

    /// Place an order for the highlighted shop product, quantity one.
    pub async fn order_selected_product(&self) {
        let (product, language) = {
            let model = self.model.lock().await;
            let state = model.get_content_state().await;
            let product = match &state.view {
                ContentView::Shop { items, selected_index } => {
                    items.get(*selected_index).cloned()
                }
                _ => None,
            };
            (product, model.language().await)
        };
        let Some(product) = product else {
            return;
        };

        match self.client.place_order(product.id, 1).await {
            Ok(response) => {
                let order_id = response
                    .get("order_id")
                    .or_else(|| response.get("id"))
                    .and_then(|v| v.as_u64());
                tracing::info!(product = product.id, ?order_id, "order placed");
                let name = match language {
                    Language::Hindi => "ऑर्डर सफल",
                    Language::English => "Order placed",
                };
                let details = match order_id {
                    Some(order_id) => {
                        format!("{} x1 (order #{})", product.display_name(language), order_id)
                    }
                    None => format!("{} x1", product.display_name(language)),
                };
                let record = ContentRecord {
                    id: product.id,
                    name: name.to_string(),
                    details: Some(details),
                    ..Default::default()
                };
                let model = self.model.lock().await;
                model.push_view(ContentView::RecordDetail { record }).await;
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Commit the highlighted city from the picker.
    pub async fn commit_city_selection(&self) {
        let selected = {
            let model = self.model.lock().await;
            model.get_selected_city().await
        };
        if let Some(city) = selected {
            tracing::info!(city = %city.name, "location changed");
            let model = self.model.lock().await;
            model.set_location(city).await;
            model.hide_city_picker().await;
            drop(model);
            self.reload_panchang_if_active().await;
        }
    }
}
