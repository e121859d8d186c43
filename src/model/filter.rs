//! Pure filter/sort/search helpers shared by the list-heavy views.

use super::content::ContentRecord;

/// Sort order for list views. `Latest` is ascending numeric id: the portal
/// backend hands out ids in insertion order and has no timestamp field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::Latest => SortOrder::NameAsc,
            SortOrder::NameAsc => SortOrder::NameDesc,
            SortOrder::NameDesc => SortOrder::Latest,
        }
    }
}

/// Case-insensitive substring filter on the display name. An empty query is
/// a no-op.
pub fn filter_by_name(records: &[ContentRecord], query: &str) -> Vec<ContentRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.name_en
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Letter-index narrowing: keep records whose title starts with the given
/// term. `None` (or an empty term) is a no-op.
pub fn filter_by_initial(records: &[ContentRecord], initial: Option<&str>) -> Vec<ContentRecord> {
    let Some(initial) = initial.filter(|s| !s.is_empty()) else {
        return records.to_vec();
    };
    let needle = initial.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().starts_with(&needle)
                || r.name_en
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().starts_with(&needle))
        })
        .cloned()
        .collect()
}

pub fn sort_records(records: &mut [ContentRecord], order: SortOrder) {
    // Name order is lowercased code-point order, not locale collation;
    // Devanagari titles sort by code point.
    match order {
        SortOrder::Latest => records.sort_by_key(|r| r.id),
        SortOrder::NameAsc => records.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortOrder::NameDesc => records.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase())),
    }
}

/// Both narrowing terms, letter index first, without sorting.
pub fn narrow(records: &[ContentRecord], query: &str, initial: Option<&str>) -> Vec<ContentRecord> {
    filter_by_name(&filter_by_initial(records, initial), query)
}

/// Narrow then sort, defaulting the sort to `Latest`.
pub fn apply(
    records: &[ContentRecord],
    query: &str,
    initial: Option<&str>,
    order: Option<SortOrder>,
) -> Vec<ContentRecord> {
    let mut out = narrow(records, query, initial);
    sort_records(&mut out, order.unwrap_or_default());
    out
}

/// What a list view actually renders: narrowed and sorted records capped
/// at the revealed window.
pub fn visible(
    records: &[ContentRecord],
    query: &str,
    initial: Option<&str>,
    order: SortOrder,
    revealed: usize,
) -> Vec<ContentRecord> {
    let mut out = apply(records, query, initial, Some(order));
    out.truncate(revealed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> ContentRecord {
        ContentRecord {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_query_is_a_noop() {
        let records = vec![record(2, "Mesh"), record(1, "Vrishabh")];
        let out = filter_by_name(&records, "");
        assert_eq!(out.len(), 2);
        // Insertion order preserved.
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn filter_is_case_insensitive_and_matches_english_title() {
        let mut records = vec![record(1, "Mesh"), record(2, "Vrishabh")];
        records[1].name_en = Some("Taurus".into());

        assert_eq!(filter_by_name(&records, "mESH").len(), 1);
        assert_eq!(filter_by_name(&records, "taur")[0].id, 2);
        assert!(filter_by_name(&records, "zzz").is_empty());
    }

    #[test]
    fn filter_is_idempotent() {
        let records = vec![record(1, "Mesh"), record(2, "Mithun"), record(3, "Vrishabh")];
        let once = filter_by_name(&records, "m");
        let twice = filter_by_name(&once, "m");
        assert_eq!(once.len(), twice.len());
        assert!(once.iter().zip(&twice).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn latest_sort_is_ascending_id() {
        let mut records = vec![record(30, "c"), record(10, "a"), record(20, "b")];
        sort_records(&mut records, SortOrder::Latest);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn name_sorts_ignore_case() {
        let mut records = vec![record(1, "banyan"), record(2, "Ashoka"), record(3, "neem")];
        sort_records(&mut records, SortOrder::NameAsc);
        assert_eq!(records[0].name, "Ashoka");
        sort_records(&mut records, SortOrder::NameDesc);
        assert_eq!(records[0].name, "neem");
    }

    #[test]
    fn visible_caps_at_the_revealed_window() {
        let records: Vec<ContentRecord> =
            (1..=10).map(|i| record(i, &format!("word {}", i))).collect();
        let out = visible(&records, "", None, SortOrder::Latest, 4);
        assert_eq!(out.len(), 4);
        assert_eq!(out.last().unwrap().id, 4);
    }

    #[test]
    fn initial_narrows_by_leading_letter() {
        let records = vec![record(1, "अमृत"), record(2, "आभा"), record(3, "अनल")];
        let out = filter_by_initial(&records, Some("अ"));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.name.starts_with("अ")));

        // No term and an empty term are both no-ops.
        assert_eq!(filter_by_initial(&records, None).len(), 3);
        assert_eq!(filter_by_initial(&records, Some("")).len(), 3);
    }

    #[test]
    fn narrow_applies_both_terms() {
        let mut records = vec![record(1, "Mesh"), record(2, "Mithun"), record(3, "Vrishabh")];
        records[1].name_en = Some("Gemini".into());
        let out = narrow(&records, "gem", Some("m"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn sort_order_cycles_through_all_variants() {
        let order = SortOrder::Latest;
        assert_eq!(order.next(), SortOrder::NameAsc);
        assert_eq!(order.next().next(), SortOrder::NameDesc);
        assert_eq!(order.next().next().next(), SortOrder::Latest);
    }

    #[test]
    fn apply_filters_then_sorts() {
        let records = vec![record(9, "Mithun"), record(4, "Mesh"), record(7, "Kark")];
        let out = apply(&records, "m", None, None);
        let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 9]);
    }
}
