//! Calculator form flow: Idle -> Loading -> Success | Error.
//!
//! The flow itself does no IO. `submit` validates and hands back a ticket;
//! the controller performs the gateway call and feeds the outcome into
//! `complete`. Validation failures short-circuit to Error without a ticket,
//! so no network call can happen. A resubmit bumps the submission counter
//! and the superseded response is ignored when it eventually lands.

use anyhow::Result;
use serde_json::Value;

use super::content::str_field;
use super::types::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculatorKind {
    Rashi,
    Nakshatra,
    Dasha,
    Numerology,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 4] = [
        CalculatorKind::Rashi,
        CalculatorKind::Nakshatra,
        CalculatorKind::Dasha,
        CalculatorKind::Numerology,
    ];

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (CalculatorKind::Rashi, Language::Hindi) => "राशि",
            (CalculatorKind::Rashi, Language::English) => "Rashi",
            (CalculatorKind::Nakshatra, Language::Hindi) => "नक्षत्र",
            (CalculatorKind::Nakshatra, Language::English) => "Nakshatra",
            (CalculatorKind::Dasha, Language::Hindi) => "दशा",
            (CalculatorKind::Dasha, Language::English) => "Dasha",
            (CalculatorKind::Numerology, Language::Hindi) => "अंक ज्योतिष",
            (CalculatorKind::Numerology, Language::English) => "Numerology",
        }
    }

    /// Result key under which the backend nests the computed object.
    fn result_key(self) -> &'static str {
        match self {
            CalculatorKind::Rashi => "rashi",
            CalculatorKind::Nakshatra => "nakshatra",
            CalculatorKind::Dasha => "dasha",
            CalculatorKind::Numerology => "numerology",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl FormField {
    fn new(key: &'static str, label: &'static str, required: bool) -> Self {
        Self { key, label, value: String::new(), required }
    }
}

#[derive(Clone, Debug, Default)]
pub enum CalculatorState {
    #[default]
    Idle,
    Loading,
    Success(CalculatorResult),
    Error(String),
}

#[derive(Clone, Debug)]
pub struct CalculatorResult {
    pub heading: String,
    pub rows: Vec<(String, String)>,
    pub raw: Value,
}

/// Ticket returned by a validated submit; the controller echoes it back so
/// stale responses from superseded submissions can be dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Clone, Debug)]
pub struct CalculatorFlow {
    pub kind: CalculatorKind,
    pub fields: Vec<FormField>,
    pub state: CalculatorState,
    pub focused: usize,
    submission: u64,
}

impl CalculatorFlow {
    pub fn new(kind: CalculatorKind) -> Self {
        let fields = match kind {
            CalculatorKind::Rashi | CalculatorKind::Nakshatra => {
                vec![FormField::new("date", "Date of birth (YYYY-MM-DD)", true)]
            }
            CalculatorKind::Dasha => vec![
                FormField::new("date", "Date of birth (YYYY-MM-DD)", true),
                FormField::new("time", "Time of birth (HH:MM)", false),
            ],
            CalculatorKind::Numerology => vec![
                FormField::new("name", "Full name", true),
                FormField::new("date", "Date of birth (YYYY-MM-DD)", true),
            ],
        };
        Self {
            kind,
            fields,
            state: CalculatorState::Idle,
            focused: 0,
            submission: 0,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Validate and move to Loading. Returns `None` (with the validation
    /// error set) when a required field is blank; no request may be issued.
    pub fn submit(&mut self, language: Language) -> Option<SubmissionTicket> {
        let missing = self
            .fields
            .iter()
            .any(|f| f.required && f.value.trim().is_empty());
        if missing {
            self.state = CalculatorState::Error(language.required_field_text().to_string());
            return None;
        }
        self.submission += 1;
        self.state = CalculatorState::Loading;
        Some(SubmissionTicket(self.submission))
    }

    /// Feed the gateway outcome back in. Outcomes for superseded
    /// submissions are discarded; the latest submission wins.
    pub fn complete(&mut self, ticket: SubmissionTicket, outcome: Result<Value>) {
        if ticket.0 != self.submission {
            tracing::debug!(kind = ?self.kind, "ignoring result of superseded submission");
            return;
        }
        match outcome {
            Ok(value) => {
                self.state = CalculatorState::Success(parse_result(self.kind, value));
            }
            Err(e) => {
                self.state = CalculatorState::Error(e.to_string());
            }
        }
    }
}

fn parse_result(kind: CalculatorKind, raw: Value) -> CalculatorResult {
    let nested = raw.get(kind.result_key());

    let heading = nested
        .and_then(|v| str_field(v, &["name", "title"]))
        .or_else(|| str_field(&raw, &["name", "title", "heading"]))
        .unwrap_or_else(|| kind.label(Language::English).to_string());

    let mut rows = Vec::new();
    if let Some(obj) = nested.and_then(Value::as_object) {
        for (key, value) in obj {
            if key == "name" {
                continue;
            }
            if let Some(text) = value.as_str() {
                rows.push((key.clone(), text.to_string()));
            }
        }
    }
    if let Some(description) = str_field(&raw, &["description", "details"]) {
        rows.push(("description".to_string(), description));
    }

    CalculatorResult { heading, rows, raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rashi_submission_reaches_success_with_result_heading() {
        let mut flow = CalculatorFlow::new(CalculatorKind::Rashi);
        flow.fields[0].value = "1990-05-15".to_string();

        let ticket = flow.submit(Language::English).expect("valid form");
        assert!(matches!(flow.state, CalculatorState::Loading));

        let response = json!({
            "rashi": {"name": "Taurus", "element": "Earth"},
            "description": "steady and patient"
        });
        flow.complete(ticket, Ok(response));

        let CalculatorState::Success(result) = &flow.state else {
            panic!("expected success, got {:?}", flow.state);
        };
        assert_eq!(result.heading, "Taurus");
        assert!(result.rows.iter().any(|(k, v)| k == "element" && v == "Earth"));
    }

    #[test]
    fn blank_required_field_errors_without_a_ticket() {
        let mut flow = CalculatorFlow::new(CalculatorKind::Rashi);

        assert!(flow.submit(Language::English).is_none());

        let CalculatorState::Error(message) = &flow.state else {
            panic!("expected validation error");
        };
        assert_eq!(message, Language::English.required_field_text());
    }

    #[test]
    fn gateway_failure_becomes_error_text() {
        let mut flow = CalculatorFlow::new(CalculatorKind::Nakshatra);
        flow.fields[0].value = "1990-05-15".to_string();

        let ticket = flow.submit(Language::English).unwrap();
        flow.complete(ticket, Err(anyhow::anyhow!("service unavailable")));

        assert!(matches!(&flow.state, CalculatorState::Error(m) if m == "service unavailable"));
    }

    #[test]
    fn superseded_submission_is_ignored() {
        let mut flow = CalculatorFlow::new(CalculatorKind::Rashi);
        flow.fields[0].value = "1990-05-15".to_string();

        let first = flow.submit(Language::English).unwrap();
        let second = flow.submit(Language::English).unwrap();

        flow.complete(first, Ok(json!({"rashi": {"name": "Aries"}})));
        assert!(matches!(flow.state, CalculatorState::Loading));

        flow.complete(second, Ok(json!({"rashi": {"name": "Taurus"}})));
        assert!(matches!(&flow.state, CalculatorState::Success(r) if r.heading == "Taurus"));
    }

    #[test]
    fn numerology_requires_name_and_date() {
        let mut flow = CalculatorFlow::new(CalculatorKind::Numerology);
        flow.fields[0].value = "Asha".to_string();
        assert!(flow.submit(Language::Hindi).is_none());

        flow.fields[1].value = "1990-05-15".to_string();
        assert!(flow.submit(Language::Hindi).is_some());
    }
}
