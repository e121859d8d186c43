//! Content view state and data structures for portal records, panchang, books, etc.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::calculator::CalculatorFlow;
use super::types::{Language, PanchangTab};

/// Number of already-loaded records initially revealed to the renderer.
pub const REVEAL_INITIAL: usize = 50;
/// Number of additional records revealed per scroll trigger.
pub const REVEAL_STEP: usize = 100;
/// Fraction of the revealed window that must be scrolled past before more
/// records are revealed.
pub const REVEAL_THRESHOLD: f32 = 0.8;

/// A single record from the portal backend (kosh entry, quote, book, ...).
///
/// Backend payloads are duck-typed; fields are picked out of whichever key
/// the endpoint happens to use. Body fields may contain embedded markup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: u64,
    pub name: String,
    pub name_en: Option<String>,
    pub meaning: Option<String>,
    pub details: Option<String>,
    pub extra: Option<String>,
}

impl ContentRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = u64_field(value, &["id", "content_id", "book_id", "chapter_id"])?;
        let name = str_field(value, &["name", "title", "word", "hindi_name"])?;
        Some(Self {
            id,
            name,
            name_en: str_field(value, &["name_en", "english_name", "title_en"]),
            meaning: str_field(value, &["meaning", "description"]),
            details: str_field(value, &["details", "content", "body"]),
            extra: str_field(value, &["extra", "extra_details"]),
        })
    }

    /// Title in the preferred language, falling back to whichever exists.
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::English => self.name_en.as_deref().unwrap_or(&self.name),
            Language::Hindi => &self.name,
        }
    }
}

/// One page of records plus the backend-reported total page count.
#[derive(Clone, Debug, Default)]
pub struct ContentPage {
    pub records: Vec<ContentRecord>,
    pub total_pages: u32,
}

impl ContentPage {
    /// Parse a page payload. Accepts `{contents: [...], total_pages: N}`
    /// variants as well as a bare array (single page).
    pub fn from_value(value: &Value) -> Self {
        let items = value
            .as_array()
            .or_else(|| {
                ["contents", "items", "records"]
                    .iter()
                    .find_map(|k| value.get(*k).and_then(Value::as_array))
            });

        let records = items
            .map(|arr| arr.iter().filter_map(ContentRecord::from_value).collect())
            .unwrap_or_default();

        let total_pages = u64_field(value, &["total_pages", "totalPages", "pages"])
            .map(|n| n as u32)
            .unwrap_or(1);

        Self { records, total_pages }
    }
}

/// A Kosh (encyclopedia) category or subcategory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KoshCategory {
    pub id: u64,
    pub name: String,
    pub name_en: Option<String>,
}

impl KoshCategory {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: u64_field(value, &["id", "category_id"])?,
            name: str_field(value, &["name", "title", "category"])?,
            name_en: str_field(value, &["name_en", "english_name"]),
        })
    }

    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::English => self.name_en.as_deref().unwrap_or(&self.name),
            Language::Hindi => &self.name,
        }
    }
}

/// Almanac data for a date/location, computed entirely by the backend.
#[derive(Clone, Debug, Default)]
pub struct PanchangDetail {
    pub tithi: Option<String>,
    pub nakshatra: Option<String>,
    pub yoga: Option<String>,
    pub karana: Option<String>,
    pub vaar: Option<String>,
    pub masa: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
}

impl PanchangDetail {
    pub fn from_value(value: &Value) -> Self {
        Self {
            tithi: str_field(value, &["tithi"]),
            nakshatra: str_field(value, &["nakshatra"]),
            yoga: str_field(value, &["yoga", "yog"]),
            karana: str_field(value, &["karana", "karan"]),
            vaar: str_field(value, &["vaar", "day", "weekday"]),
            masa: str_field(value, &["masa", "month"]),
            sunrise: str_field(value, &["sunrise", "sun_rise"]),
            sunset: str_field(value, &["sunset", "sun_set"]),
            moonrise: str_field(value, &["moonrise", "moon_rise"]),
            moonset: str_field(value, &["moonset", "moon_set"]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tithi.is_none() && self.nakshatra.is_none() && self.yoga.is_none()
    }

    pub fn rows(&self, language: Language) -> Vec<(String, String)> {
        let label = |hi: &str, en: &str| match language {
            Language::Hindi => hi.to_string(),
            Language::English => en.to_string(),
        };
        [
            (label("तिथि", "Tithi"), &self.tithi),
            (label("नक्षत्र", "Nakshatra"), &self.nakshatra),
            (label("योग", "Yoga"), &self.yoga),
            (label("करण", "Karana"), &self.karana),
            (label("वार", "Vaar"), &self.vaar),
            (label("मास", "Masa"), &self.masa),
            (label("सूर्योदय", "Sunrise"), &self.sunrise),
            (label("सूर्यास्त", "Sunset"), &self.sunset),
            (label("चंद्रोदय", "Moonrise"), &self.moonrise),
            (label("चंद्रास्त", "Moonset"), &self.moonset),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k, v.clone())))
        .collect()
    }
}

/// An auspicious time window reported by the backend.
#[derive(Clone, Debug)]
pub struct MuhuratWindow {
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl MuhuratWindow {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: str_field(value, &["name", "muhurat", "title"])?,
            start: str_field(value, &["start", "start_time", "from"]),
            end: str_field(value, &["end", "end_time", "to"]),
        })
    }

    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .or_else(|| {
                ["muhurats", "windows", "items"]
                    .iter()
                    .find_map(|k| value.get(*k).and_then(Value::as_array))
            })
            .map(|arr| arr.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

/// Represents the current view in the main content area
#[derive(Clone, Debug, Default)]
pub enum ContentView {
    #[default]
    Empty,
    Panchang {
        tab: PanchangTab,
        detail: Option<PanchangDetail>,
        muhurats: Vec<MuhuratWindow>,
        sade_sati: Option<String>,
    },
    Rashifal {
        entries: Vec<ContentRecord>,
        selected_index: usize,
    },
    KoshCategories {
        categories: Vec<KoshCategory>,
        selected_index: usize,
    },
    /// Entries themselves live in the loader state; this view only tracks
    /// the active category and cursor.
    KoshEntries {
        category: KoshCategory,
        selected_index: usize,
    },
    RecordDetail {
        record: ContentRecord,
    },
    /// Index of book categories; selecting one opens its book listing.
    BookCategories {
        categories: Vec<ContentRecord>,
        selected_index: usize,
    },
    Books {
        books: Vec<ContentRecord>,
        selected_index: usize,
    },
    Chapters {
        book: ContentRecord,
        chapters: Vec<ContentRecord>,
        selected_index: usize,
    },
    ChapterContent {
        title: String,
        body: String,
    },
    Listing {
        title: String,
        items: Vec<ContentRecord>,
        selected_index: usize,
    },
    /// Index of shop categories; selecting one opens its product listing.
    ShopCategories {
        categories: Vec<ContentRecord>,
        selected_index: usize,
    },
    /// Shop products; like a listing but the selection can be ordered.
    Shop {
        items: Vec<ContentRecord>,
        selected_index: usize,
    },
    /// Divine quotes; records are loader-backed like kosh entries.
    Quotes {
        selected_index: usize,
    },
    PrashnaYantra {
        answer: Option<String>,
    },
    Calculators {
        selected_index: usize,
    },
    Calculator {
        flow: CalculatorFlow,
    },
}

/// State for the main content area
#[derive(Clone, Debug)]
pub struct ContentState {
    pub view: ContentView,
    pub navigation_stack: Vec<ContentView>,
    pub is_loading: bool,
    /// How many loader-backed records are currently revealed to the renderer.
    pub revealed: usize,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            view: ContentView::default(),
            navigation_stack: Vec::new(),
            is_loading: false,
            revealed: REVEAL_INITIAL,
        }
    }
}

impl ContentState {
    pub fn reset_reveal(&mut self) {
        self.revealed = REVEAL_INITIAL;
    }

    /// Reveal more already-loaded records once the cursor crosses the
    /// threshold of the revealed window. Returns true when a reveal happened.
    /// Callers hold the content-state mutex, which serializes reveals
    /// across scroll gestures.
    pub fn maybe_reveal_more(&mut self, cursor: usize, loaded: usize) -> bool {
        if self.revealed >= loaded {
            return false;
        }
        let window = self.revealed.min(loaded);
        if (cursor as f32) < (window as f32) * REVEAL_THRESHOLD {
            return false;
        }
        self.revealed = (self.revealed + REVEAL_STEP).min(loaded);
        true
    }
}

pub(crate) fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        value.get(*k).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

pub(crate) fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| {
        value.get(*k).and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_parses_alternate_keys() {
        let bare = json!({"id": 7, "name": "गणेश", "meaning": "remover of obstacles"});
        let record = ContentRecord::from_value(&bare).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "गणेश");

        let aliased = json!({"content_id": "12", "title": "Ganesh", "body": "<p>..</p>"});
        let record = ContentRecord::from_value(&aliased).unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.details.as_deref(), Some("<p>..</p>"));

        assert!(ContentRecord::from_value(&json!({"name": "no id"})).is_none());
    }

    #[test]
    fn display_name_prefers_language_with_fallback() {
        let record = ContentRecord {
            id: 1,
            name: "गणेश".into(),
            name_en: Some("Ganesh".into()),
            ..Default::default()
        };
        assert_eq!(record.display_name(Language::Hindi), "गणेश");
        assert_eq!(record.display_name(Language::English), "Ganesh");

        let hindi_only = ContentRecord { id: 2, name: "शिव".into(), ..Default::default() };
        assert_eq!(hindi_only.display_name(Language::English), "शिव");
    }

    #[test]
    fn page_parses_wrapped_and_bare_shapes() {
        let wrapped = json!({
            "contents": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
            "total_pages": 12
        });
        let page = ContentPage::from_value(&wrapped);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total_pages, 12);

        let bare = json!([{"id": 3, "name": "c"}]);
        let page = ContentPage::from_value(&bare);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn reveal_grows_only_past_threshold() {
        let mut state = ContentState::default();
        let loaded = 400;

        // Cursor well inside the initial window: nothing revealed.
        assert!(!state.maybe_reveal_more(10, loaded));
        assert_eq!(state.revealed, REVEAL_INITIAL);

        // Crossing 80% of the 50-record window reveals 100 more.
        assert!(state.maybe_reveal_more(40, loaded));
        assert_eq!(state.revealed, REVEAL_INITIAL + REVEAL_STEP);

        // Never reveals past what is loaded.
        state.revealed = 390;
        assert!(state.maybe_reveal_more(389, loaded));
        assert_eq!(state.revealed, loaded);
        assert!(!state.maybe_reveal_more(399, loaded));
    }
}
