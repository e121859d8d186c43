//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the
//! application. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (enums, UI state, etc.)
//! - `content`: Content records, panchang data, and view state
//! - `filter`: Pure filter/sort/search helpers for list views
//! - `loader`: Progressive loader for paginated collections
//! - `lookup`: Debounced city lookup
//! - `calculator`: Calculator form state machine
//! - `portal_client`: Portal REST API client
//! - `session`: Persisted auth session and report stash
//! - `app_model`: Main application model with state management methods

mod types;
mod content;
pub mod filter;
mod loader;
mod lookup;
mod calculator;
mod portal_client;
mod session;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    ActiveSection, Language, PanchangTab, Section, SelectedItem, UiState,
};

pub use content::{
    ContentPage, ContentRecord, ContentState, ContentView, KoshCategory,
    MuhuratWindow, PanchangDetail,
};

pub use loader::{ListSource, LoadState, PageFetcher, ProgressiveLoader};

pub use lookup::{CityLookup, CitySource, LocationCandidate, LookupResults};

pub use calculator::{CalculatorFlow, CalculatorKind, CalculatorState};

pub use portal_client::PortalClient;

pub use session::{AuthSession, REPORT_KEY, SessionStore};

pub use app_model::AppModel;
