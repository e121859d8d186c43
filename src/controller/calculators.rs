//! Calculator form submission flows.
//!
//! The flow state machine lives in the model; this layer wires its tickets
//! to the gateway. A blank required field never reaches the network, and a
//! resubmission before the previous response lands wins.

use crate::model::{CalculatorFlow, CalculatorKind, ContentRecord, ContentView, Language, REPORT_KEY};

use super::AppController;

impl AppController {
    pub async fn open_calculator(&self, index: usize) {
        if let Some(kind) = CalculatorKind::ALL.get(index).copied() {
            tracing::info!(kind = ?kind, "opening calculator");
            let model = self.model.lock().await;
            model
                .push_view(ContentView::Calculator { flow: CalculatorFlow::new(kind) })
                .await;
        }
    }

    /// Validate and submit the active calculator form.
    pub async fn submit_calculator(&self) {
        let submission = {
            let model = self.model.lock().await;
            let language = model.language().await;
            model
                .with_calculator(|flow| {
                    let ticket = flow.submit(language)?;
                    Some((
                        ticket,
                        flow.kind,
                        flow.field("name").unwrap_or_default().to_string(),
                        flow.field("date").unwrap_or_default().to_string(),
                        flow.field("time").unwrap_or_default().to_string(),
                    ))
                })
                .await
                .flatten()
        };
        let Some((ticket, kind, name, date, time)) = submission else {
            return;
        };

        let outcome = match kind {
            CalculatorKind::Rashi => self.client.rashi_by_date(&date).await,
            CalculatorKind::Nakshatra => self.client.nakshatra_by_date(&date).await,
            CalculatorKind::Dasha => self.client.dasha_for(&date, &time).await,
            CalculatorKind::Numerology => self.client.numerology_for(&name, &date).await,
        };

        if let Ok(report) = &outcome {
            self.store.stash_report(REPORT_KEY, report.clone()).await;
        }

        let model = self.model.lock().await;
        model.with_calculator(|flow| flow.complete(ticket, outcome)).await;
    }

    /// Reopen the report generated by the most recent calculator run.
    pub async fn open_last_report(&self) {
        let Some(report) = self.store.recover_report(REPORT_KEY).await else {
            return;
        };
        let model = self.model.lock().await;
        let name = match model.language().await {
            Language::Hindi => "पिछली रिपोर्ट",
            Language::English => "Last report",
        };
        let record = ContentRecord {
            name: name.to_string(),
            details: serde_json::to_string_pretty(&report).ok(),
            ..Default::default()
        };
        model.push_view(ContentView::RecordDetail { record }).await;
    }
}
