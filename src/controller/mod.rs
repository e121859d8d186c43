//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and the portal API, and drives the
//! progressive loading flows. It is organized into submodules by
//! responsibility:
//!
//! - `input`: Key event handling
//! - `navigation`: Section/category/page flows
//! - `calculators`: Calculator form submission flows

mod input;
mod navigation;
mod calculators;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{
    AppModel, CityLookup, ContentRecord, LoadState, PortalClient, ProgressiveLoader, SessionStore,
};
use crate::model::filter;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) client: Arc<PortalClient>,
    pub(crate) loader: ProgressiveLoader<PortalClient>,
    pub(crate) lookup: Arc<CityLookup<PortalClient>>,
    pub(crate) store: SessionStore,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, client: Arc<PortalClient>, store: SessionStore) -> Self {
        Self {
            model,
            loader: ProgressiveLoader::new(client.clone()),
            lookup: Arc::new(CityLookup::new(client.clone())),
            client,
            store,
        }
    }

    pub async fn loader_state(&self) -> LoadState {
        self.loader.snapshot().await
    }

    /// The record list the renderer currently shows for loader-backed views:
    /// filtered by the search query, capped at the revealed window.
    pub(crate) async fn visible_records(&self) -> Vec<ContentRecord> {
        let load = self.loader.snapshot().await;
        let model = self.model.lock().await;
        let ui = model.get_ui_state().await;
        let revealed = model.get_content_state().await.revealed;
        filter::visible(
            &load.records,
            &ui.search_query,
            ui.special_list.as_deref(),
            ui.sort_order,
            revealed,
        )
    }

    /// Copy the debounced lookup's latest results into the UI state. Called
    /// every tick while the city picker is open.
    pub async fn refresh_city_results(&self) {
        let results = self.lookup.results().await;
        let model = self.model.lock().await;
        model.set_city_candidates(results.candidates, results.error).await;
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = error.to_string();

        // Map common portal API failures to readable text
        if error_str.contains("404") {
            "Content not found. It may have been removed.".to_string()
        } else if error_str.contains("401") || error_str.contains("403") {
            "Session expired or not authorized. Please sign in again.".to_string()
        } else if error_str.contains("429") {
            "Too many requests. Please wait a moment.".to_string()
        } else if error_str.contains("timed out") || error_str.contains("connect") {
            "Could not reach the AstroSetu service. Check your connection.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
