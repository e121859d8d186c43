//! Query-string view state.
//!
//! A view worth sharing is encoded as `section?key=value`, e.g.
//! `panchang?tab=yoga`. Passing such a string as the launch argument
//! reproduces the view, the terminal equivalent of a shareable link.

use url::form_urlencoded;

use crate::model::{PanchangTab, Section};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub section: Section,
    pub tab: Option<PanchangTab>,
}

impl Route {
    pub fn parse(input: &str) -> Option<Self> {
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        let section = Section::from_slug(path.trim().trim_matches('/'))?;

        let tab = query.and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "tab")
                .and_then(|(_, value)| PanchangTab::from_slug(&value))
        });

        Some(Self { section, tab })
    }

    pub fn to_arg(self) -> String {
        match self.tab {
            Some(tab) => format!("{}?tab={}", self.section.slug(), tab.slug()),
            None => self.section.slug().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_section_with_tab() {
        let route = Route::parse("panchang?tab=yoga").unwrap();
        assert_eq!(route.section, Section::Panchang);
        assert_eq!(route.tab, Some(PanchangTab::Yoga));
    }

    #[test]
    fn parses_bare_section_and_ignores_unknown_params() {
        let route = Route::parse("kosh").unwrap();
        assert_eq!(route.section, Section::Kosh);
        assert_eq!(route.tab, None);

        let route = Route::parse("panchang?utm=x&tab=muhurat").unwrap();
        assert_eq!(route.tab, Some(PanchangTab::Muhurat));
    }

    #[test]
    fn rejects_unknown_sections() {
        assert!(Route::parse("no-such-page").is_none());
        assert!(Route::parse("").is_none());
    }

    #[test]
    fn round_trips_through_to_arg() {
        let route = Route { section: Section::Panchang, tab: Some(PanchangTab::Yoga) };
        assert_eq!(Route::parse(&route.to_arg()), Some(route));

        let bare = Route { section: Section::Quotes, tab: None };
        assert_eq!(Route::parse(&bare.to_arg()), Some(bare));
    }
}
