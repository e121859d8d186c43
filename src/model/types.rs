//! Core type definitions for the application

use std::time::Instant;

use chrono::NaiveDate;

use super::filter::SortOrder;
use super::lookup::LocationCandidate;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Sections,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Sections,
            ActiveSection::Sections => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Sections => ActiveSection::Search,
            ActiveSection::MainContent => ActiveSection::Sections,
        }
    }
}

/// Display language for chrome text and record titles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Hindi,
    English,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::Hindi => Language::English,
            Language::English => Language::Hindi,
        }
    }

    /// Two-letter code used as a backend filter value.
    pub fn code(self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::English => "en",
        }
    }

    pub fn loading_text(self) -> &'static str {
        match self {
            Language::Hindi => "लोड हो रहा है...",
            Language::English => "Loading...",
        }
    }

    pub fn no_data_text(self) -> &'static str {
        match self {
            Language::Hindi => "कोई डेटा उपलब्ध नहीं",
            Language::English => "No data available",
        }
    }

    pub fn error_text(self) -> &'static str {
        match self {
            Language::Hindi => "त्रुटि",
            Language::English => "Error",
        }
    }

    pub fn required_field_text(self) -> &'static str {
        match self {
            Language::Hindi => "कृपया सभी आवश्यक फ़ील्ड भरें",
            Language::English => "Please fill in all required fields",
        }
    }
}

/// Top-level portal sections shown in the sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Panchang,
    Rashifal,
    Kosh,
    Books,
    Magazines,
    Shop,
    EPooja,
    Quotes,
    Videos,
    PrashnaYantra,
    Calculators,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::Panchang,
        Section::Rashifal,
        Section::Kosh,
        Section::Books,
        Section::Magazines,
        Section::Shop,
        Section::EPooja,
        Section::Quotes,
        Section::Videos,
        Section::PrashnaYantra,
        Section::Calculators,
    ];

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Section::Panchang, Language::Hindi) => "पंचांग",
            (Section::Panchang, Language::English) => "Panchang",
            (Section::Rashifal, Language::Hindi) => "राशिफल",
            (Section::Rashifal, Language::English) => "Rashifal",
            (Section::Kosh, Language::Hindi) => "कोश",
            (Section::Kosh, Language::English) => "Kosh",
            (Section::Books, Language::Hindi) => "पुस्तकें",
            (Section::Books, Language::English) => "Books",
            (Section::Magazines, Language::Hindi) => "ई-पत्रिका",
            (Section::Magazines, Language::English) => "E-Magazine",
            (Section::Shop, Language::Hindi) => "एस्ट्रो शॉप",
            (Section::Shop, Language::English) => "AstroShop",
            (Section::EPooja, Language::Hindi) => "ई-पूजा",
            (Section::EPooja, Language::English) => "E-Pooja",
            (Section::Quotes, Language::Hindi) => "सुविचार",
            (Section::Quotes, Language::English) => "Divine Quotes",
            (Section::Videos, Language::Hindi) => "वीडियो",
            (Section::Videos, Language::English) => "Videos",
            (Section::PrashnaYantra, Language::Hindi) => "प्रश्न यंत्र",
            (Section::PrashnaYantra, Language::English) => "Prashan Yantra",
            (Section::Calculators, Language::Hindi) => "गणक",
            (Section::Calculators, Language::English) => "Calculators",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Section::Panchang => "panchang",
            Section::Rashifal => "rashifal",
            Section::Kosh => "kosh",
            Section::Books => "books",
            Section::Magazines => "magazines",
            Section::Shop => "shop",
            Section::EPooja => "epooja",
            Section::Quotes => "quotes",
            Section::Videos => "videos",
            Section::PrashnaYantra => "prashna-yantra",
            Section::Calculators => "calculators",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// Tabs within the Panchang view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanchangTab {
    #[default]
    Overview,
    Muhurat,
    SadeSati,
    Yoga,
}

impl PanchangTab {
    pub const ALL: [PanchangTab; 4] = [
        PanchangTab::Overview,
        PanchangTab::Muhurat,
        PanchangTab::SadeSati,
        PanchangTab::Yoga,
    ];

    pub fn next(self) -> Self {
        match self {
            PanchangTab::Overview => PanchangTab::Muhurat,
            PanchangTab::Muhurat => PanchangTab::SadeSati,
            PanchangTab::SadeSati => PanchangTab::Yoga,
            PanchangTab::Yoga => PanchangTab::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PanchangTab::Overview => PanchangTab::Yoga,
            PanchangTab::Muhurat => PanchangTab::Overview,
            PanchangTab::SadeSati => PanchangTab::Muhurat,
            PanchangTab::Yoga => PanchangTab::SadeSati,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            PanchangTab::Overview => "overview",
            PanchangTab::Muhurat => "muhurat",
            PanchangTab::SadeSati => "sadesati",
            PanchangTab::Yoga => "yoga",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (PanchangTab::Overview, Language::Hindi) => "पंचांग",
            (PanchangTab::Overview, Language::English) => "Overview",
            (PanchangTab::Muhurat, Language::Hindi) => "मुहूर्त",
            (PanchangTab::Muhurat, Language::English) => "Muhurat",
            (PanchangTab::SadeSati, Language::Hindi) => "साढ़े साती",
            (PanchangTab::SadeSati, Language::English) => "Sade Sati",
            (PanchangTab::Yoga, Language::Hindi) => "योग",
            (PanchangTab::Yoga, Language::English) => "Yoga",
        }
    }
}

/// Represents a selected item for action handling
#[derive(Clone, Debug)]
pub enum SelectedItem {
    KoshCategory { id: u64 },
    BookCategory { id: u64 },
    ShopCategory { id: u64 },
    Record { index: usize },
    Book { id: u64 },
    Chapter { id: u64 },
    Calculator { index: usize },
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub language: Language,
    pub search_query: String,
    /// Letter-index term narrowing loader-backed lists by title initial.
    pub special_list: Option<String>,
    pub sort_order: SortOrder,
    pub section_selected: usize,
    pub date: NaiveDate,
    pub location: Option<LocationCandidate>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_city_picker: bool,
    pub city_input: String,
    pub city_candidates: Vec<LocationCandidate>,
    pub city_selected: usize,
    pub city_lookup_error: Option<String>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Sections,
            language: Language::default(),
            search_query: String::new(),
            special_list: None,
            sort_order: SortOrder::default(),
            section_selected: 0,
            date: chrono::Local::now().date_naive(),
            location: None,
            error_message: None,
            error_timestamp: None,
            show_city_picker: false,
            city_input: String::new(),
            city_candidates: Vec::new(),
            city_selected: 0,
            city_lookup_error: None,
            show_help_popup: false,
        }
    }
}
