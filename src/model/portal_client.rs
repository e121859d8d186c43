//! Portal API client wrapping the backend REST endpoints.
//!
//! The backend wraps some response bodies in `{data: ...}` and not others;
//! `unwrap_envelope` normalizes that exactly once, here, so no call site
//! ever re-checks the shape. Non-2xx responses surface as errors and no
//! retry happens at this layer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use super::content::{ContentPage, ContentRecord, KoshCategory, MuhuratWindow, PanchangDetail, str_field};
use super::loader::{ListSource, PageFetcher};
use super::lookup::{CitySource, LocationCandidate, POPULAR_LIMIT, SEARCH_LIMIT, normalize_city_query};

/// Fixed region used for the blank-input "popular cities" fallback.
const POPULAR_CITIES_REGION: &str = "IN";

#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    origin: String,
}

impl PortalClient {
    pub fn new(origin: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.origin, path);
        tracing::debug!(%url, "API GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?
            .error_for_status()
            .with_context(|| format!("GET {path}"))?;
        let body = response.json().await.with_context(|| format!("GET {path}: body"))?;
        Ok(unwrap_envelope(body))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.origin, path);
        tracing::debug!(%url, "API POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path}"))?
            .error_for_status()
            .with_context(|| format!("POST {path}"))?;
        let body = response.json().await.with_context(|| format!("POST {path}: body"))?;
        Ok(unwrap_envelope(body))
    }

    // ========================================================================
    // Panchang & almanac
    // ========================================================================

    pub async fn panchang(&self, date: NaiveDate, latitude: f64, longitude: f64) -> Result<PanchangDetail> {
        let value = self
            .get_json(
                "panchang",
                &[
                    ("date", date.to_string()),
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                ],
            )
            .await?;
        Ok(PanchangDetail::from_value(&value))
    }

    pub async fn muhurat(&self, date: NaiveDate, latitude: f64, longitude: f64) -> Result<Vec<MuhuratWindow>> {
        let value = self
            .get_json(
                "muhurat",
                &[
                    ("date", date.to_string()),
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                ],
            )
            .await?;
        Ok(MuhuratWindow::list_from_value(&value))
    }

    pub async fn sade_sati(&self, date: NaiveDate) -> Result<Option<String>> {
        let value = self.get_json("sade-sati", &[("date", date.to_string())]).await?;
        Ok(str_field(&value, &["summary", "status", "phase"]))
    }

    pub async fn rashifal(&self, date: NaiveDate) -> Result<Vec<ContentRecord>> {
        let value = self.get_json("rashifal", &[("date", date.to_string())]).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    // ========================================================================
    // Kosh, books & other content listings
    // ========================================================================

    pub async fn kosh_categories(&self) -> Result<Vec<KoshCategory>> {
        let value = self.get_json("kosh/categories", &[]).await?;
        let categories = value
            .as_array()
            .map(|arr| arr.iter().filter_map(KoshCategory::from_value).collect())
            .unwrap_or_default();
        Ok(categories)
    }

    pub async fn book_categories(&self) -> Result<Vec<ContentRecord>> {
        let value = self.get_json("books/categories", &[]).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn books(&self, category_id: u64) -> Result<Vec<ContentRecord>> {
        let value = self
            .get_json("books", &[("category", category_id.to_string())])
            .await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn chapters(&self, book_id: u64) -> Result<Vec<ContentRecord>> {
        let value = self
            .get_json(&format!("books/{book_id}/chapters"), &[])
            .await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn chapter_content(&self, chapter_id: u64) -> Result<Option<String>> {
        let value = self.get_json(&format!("chapters/{chapter_id}"), &[]).await?;
        Ok(str_field(&value, &["content", "body", "text"]))
    }

    pub async fn magazines(&self, language_filter: Option<&str>) -> Result<Vec<ContentRecord>> {
        let mut query = Vec::new();
        if let Some(lang) = language_filter {
            query.push(("lang", lang.to_string()));
        }
        let value = self.get_json("magazines", &query).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn shop_categories(&self) -> Result<Vec<ContentRecord>> {
        let value = self.get_json("shop/categories", &[]).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn shop_products(&self, category_id: u64) -> Result<Vec<ContentRecord>> {
        let value = self
            .get_json("shop/products", &[("category", category_id.to_string())])
            .await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn place_order(&self, product_id: u64, quantity: u32) -> Result<Value> {
        self.post_json("shop/orders", &json!({"product_id": product_id, "quantity": quantity}))
            .await
    }

    pub async fn epoojas(&self) -> Result<Vec<ContentRecord>> {
        let value = self.get_json("epooja", &[]).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn videos(&self) -> Result<Vec<ContentRecord>> {
        let value = self.get_json("videos", &[]).await?;
        Ok(ContentPage::from_value(&value).records)
    }

    pub async fn prashna_yantra(&self) -> Result<Option<String>> {
        let value = self.get_json("prashna-yantra", &[]).await?;
        Ok(str_field(&value, &["answer", "result", "text"]))
    }

    // ========================================================================
    // Calculators
    // ========================================================================

    pub async fn rashi_by_date(&self, date: &str) -> Result<Value> {
        self.get_json("calculators/rashi", &[("date", date.to_string())]).await
    }

    pub async fn nakshatra_by_date(&self, date: &str) -> Result<Value> {
        self.get_json("calculators/nakshatra", &[("date", date.to_string())]).await
    }

    pub async fn dasha_for(&self, date: &str, time: &str) -> Result<Value> {
        let mut query = vec![("date", date.to_string())];
        if !time.is_empty() {
            query.push(("time", time.to_string()));
        }
        self.get_json("calculators/dasha", &query).await
    }

    pub async fn numerology_for(&self, name: &str, date: &str) -> Result<Value> {
        self.get_json(
            "calculators/numerology",
            &[("name", name.to_string()), ("date", date.to_string())],
        )
        .await
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn exchange_google_code(&self, code: &str) -> Result<Value> {
        self.post_json("auth/google", &json!({"code": code})).await
    }
}

#[async_trait]
impl CitySource for PortalClient {
    async fn search_cities(&self, input: &str) -> Result<Vec<LocationCandidate>> {
        let value = match normalize_city_query(input) {
            None => {
                self.get_json(
                    "cities",
                    &[
                        ("region", POPULAR_CITIES_REGION.to_string()),
                        ("limit", POPULAR_LIMIT.to_string()),
                    ],
                )
                .await?
            }
            Some(query) => {
                self.get_json(
                    "cities",
                    &[("search", query), ("limit", SEARCH_LIMIT.to_string())],
                )
                .await?
            }
        };
        let candidates = value
            .as_array()
            .map(|arr| arr.iter().filter_map(LocationCandidate::from_value).collect())
            .unwrap_or_default();
        Ok(candidates)
    }
}

#[async_trait]
impl PageFetcher for PortalClient {
    async fn fetch_page(&self, source: &ListSource, page: u32) -> Result<ContentPage> {
        let value = match source {
            ListSource::KoshCategory(id) => {
                self.get_json(
                    "kosh/contents",
                    &[("category", id.to_string()), ("page", page.to_string())],
                )
                .await?
            }
            ListSource::Quotes => {
                self.get_json("quotes", &[("page", page.to_string())]).await?
            }
        };
        Ok(ContentPage::from_value(&value))
    }
}

/// Strip the optional `{data: ...}` envelope.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_unwraps_wrapped_bodies() {
        let wrapped = json!({"data": {"id": 1, "name": "a"}});
        assert_eq!(unwrap_envelope(wrapped), json!({"id": 1, "name": "a"}));

        let wrapped_list = json!({"data": [1, 2]});
        assert_eq!(unwrap_envelope(wrapped_list), json!([1, 2]));
    }

    #[test]
    fn envelope_passes_bare_bodies_through() {
        let bare = json!({"id": 1, "name": "a"});
        assert_eq!(unwrap_envelope(bare.clone()), bare);

        let list = json!([{"id": 1}]);
        assert_eq!(unwrap_envelope(list.clone()), list);
    }

    #[test]
    fn envelope_null_data_means_no_data() {
        assert_eq!(unwrap_envelope(json!({"data": null})), Value::Null);
    }
}
