//! Debounced search-as-you-type city lookup.
//!
//! Every keystroke aborts the pending lookup task and schedules a new one
//! 500 ms out; a generation counter checked at commit time guarantees only
//! the last keystroke's results land even if an aborted task already has a
//! response in hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::content::str_field;

pub const DEBOUNCE: Duration = Duration::from_millis(500);
/// Result cap for the blank-input "popular cities" fallback.
pub const POPULAR_LIMIT: u32 = 60;
/// Result cap for a typed search.
pub const SEARCH_LIMIT: u32 = 25;

/// A city suggestion used to parameterize panchang/muhurat calculations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationCandidate {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: str_field(value, &["name", "city", "city_name"])?,
            latitude: num_field(value, &["latitude", "lat"])?,
            longitude: num_field(value, &["longitude", "lon", "lng"])?,
        })
    }
}

fn num_field(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| {
        value.get(*k).and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
    })
}

/// Capitalize the first letter of the typed input; the backend search is a
/// case-insensitive contains, capitalization just mirrors stored names.
/// Blank input maps to `None`, meaning the popular-cities fallback.
pub fn normalize_city_query(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}

/// Seam between the lookup and the gateway. The query passed through is the
/// raw user input; the implementation applies [`normalize_city_query`].
#[async_trait]
pub trait CitySource: Send + Sync {
    async fn search_cities(&self, input: &str) -> Result<Vec<LocationCandidate>>;
}

#[derive(Clone, Debug, Default)]
pub struct LookupResults {
    pub candidates: Vec<LocationCandidate>,
    pub error: Option<String>,
}

pub struct CityLookup<S> {
    source: Arc<S>,
    results: Arc<Mutex<LookupResults>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    generation: Arc<AtomicU64>,
}

impl<S: CitySource + 'static> CityLookup<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            results: Arc::new(Mutex::new(LookupResults::default())),
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn results(&self) -> LookupResults {
        self.results.lock().await.clone()
    }

    /// Cancel the pending lookup and schedule one for the new input.
    pub async fn input_changed(&self, input: String) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let source = self.source.clone();
        let results = self.results.clone();
        let current = self.generation.clone();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;

            let outcome = source.search_cities(&input).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            let mut results = results.lock().await;
            match outcome {
                Ok(candidates) => {
                    *results = LookupResults { candidates, error: None };
                }
                Err(e) => {
                    // Failed lookups yield an empty list; never propagate.
                    tracing::warn!(error = %e, "city lookup failed");
                    *results = LookupResults {
                        candidates: Vec::new(),
                        error: Some(e.to_string()),
                    };
                }
            }
        }));
    }

    #[cfg(test)]
    async fn settle(&self) {
        if let Some(handle) = self.pending.lock().await.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockCities {
        queries: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CitySource for MockCities {
        async fn search_cities(&self, input: &str) -> Result<Vec<LocationCandidate>> {
            self.queries.lock().unwrap().push(input.to_string());
            if input == "fail" {
                anyhow::bail!("backend down");
            }
            Ok(vec![LocationCandidate {
                name: format!("{input}pal"),
                latitude: 23.25,
                longitude: 77.41,
            }])
        }
    }

    fn mock() -> Arc<MockCities> {
        Arc::new(MockCities { queries: std::sync::Mutex::new(Vec::new()) })
    }

    #[test]
    fn normalize_capitalizes_first_letter_only() {
        assert_eq!(normalize_city_query("bho"), Some("Bho".to_string()));
        assert_eq!(normalize_city_query("  delhi "), Some("Delhi".to_string()));
        assert_eq!(normalize_city_query("New delhi"), Some("New delhi".to_string()));
        assert_eq!(normalize_city_query("   "), None);
        assert_eq!(normalize_city_query(""), None);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_collapse_to_one_request() {
        let cities = mock();
        let lookup = CityLookup::new(cities.clone());

        for input in ["B", "Bh", "Bho"] {
            lookup.input_changed(input.to_string()).await;
            tokio::task::yield_now().await;
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        // Let the surviving debounce window elapse.
        tokio::time::advance(DEBOUNCE).await;
        lookup.settle().await;

        assert_eq!(*cities.queries.lock().unwrap(), vec!["Bho".to_string()]);
        let results = lookup.results().await;
        assert_eq!(results.candidates[0].name, "Bhopal");
        assert!(results.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_keystrokes_each_issue_a_request() {
        let cities = mock();
        let lookup = CityLookup::new(cities.clone());

        lookup.input_changed("B".to_string()).await;
        tokio::task::yield_now().await;
        tokio::time::advance(DEBOUNCE + Duration::from_millis(10)).await;
        lookup.settle().await;

        lookup.input_changed("Bh".to_string()).await;
        tokio::task::yield_now().await;
        tokio::time::advance(DEBOUNCE + Duration::from_millis(10)).await;
        lookup.settle().await;

        assert_eq!(cities.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_lookup_yields_empty_list_and_error() {
        let cities = mock();
        let lookup = CityLookup::new(cities.clone());

        lookup.input_changed("fail".to_string()).await;
        tokio::task::yield_now().await;
        tokio::time::advance(DEBOUNCE).await;
        lookup.settle().await;

        let results = lookup.results().await;
        assert!(results.candidates.is_empty());
        assert_eq!(results.error.as_deref(), Some("backend down"));
    }

    #[test]
    fn candidate_parses_coordinate_aliases() {
        let value = serde_json::json!({"city_name": "Bhopal", "lat": "23.25", "lng": 77.41});
        let candidate = LocationCandidate::from_value(&value).unwrap();
        assert_eq!(candidate.name, "Bhopal");
        assert!((candidate.latitude - 23.25).abs() < f64::EPSILON);
    }
}
