// ── Pure list derivation ──
//
// Every list screen renders `derive_view(items, params)`: filter by a
// case-insensitive substring of the search key, sort newest first,
// slice one page. Nothing is cached; the page is recomputed from the
// source list whenever the list or the parameters change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{Query, Recommendation};

// ── Layout ──────────────────────────────────────────────────────────

/// Column layout of a list screen. The column count fixes the page size.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Layout {
    #[strum(to_string = "one-column", serialize = "1")]
    OneColumn,
    #[strum(to_string = "two-columns", serialize = "2")]
    TwoColumns,
    #[default]
    #[strum(to_string = "three-columns", serialize = "3")]
    ThreeColumns,
}

impl Layout {
    pub fn columns(self) -> usize {
        match self {
            Self::OneColumn => 1,
            Self::TwoColumns => 2,
            Self::ThreeColumns => 3,
        }
    }

    pub fn page_size(self) -> usize {
        self.columns() * 2
    }
}

// ── Listed ──────────────────────────────────────────────────────────

/// An item a list screen can search and order.
pub trait Listed {
    /// Text matched against the search box.
    fn search_key(&self) -> &str;
    /// Sort key; newer items come first.
    fn listed_at(&self) -> DateTime<Utc>;
}

impl Listed for Query {
    fn search_key(&self) -> &str {
        &self.product_name
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.current_date
    }
}

impl Listed for Recommendation {
    fn search_key(&self) -> &str {
        &self.recommended_product_name
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.current_date
    }
}

impl<T: Listed> Listed for &T {
    fn search_key(&self) -> &str {
        (*self).search_key()
    }

    fn listed_at(&self) -> DateTime<Utc> {
        (*self).listed_at()
    }
}

// ── Parameters & output ─────────────────────────────────────────────

/// UI-side state that, together with the source list, fixes the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    pub search_text: String,
    pub page_size: usize,
    /// 1-indexed.
    pub page_number: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self::with_layout(Layout::default())
    }
}

impl ViewParams {
    pub fn with_layout(layout: Layout) -> Self {
        Self {
            search_text: String::new(),
            page_size: layout.page_size(),
            page_number: 1,
        }
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The requested page clamped into `1..=max(1, total_pages)`.
    pub page_number: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

// ── Derivation ──────────────────────────────────────────────────────

pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    filtered_count.div_ceil(page_size)
}

pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn matches_search(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filter, sort and slice `items` into the page described by `params`.
pub fn derive_view<'a, T: Listed>(items: &'a [T], params: &ViewParams) -> Page<&'a T> {
    let mut filtered: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(item.search_key(), &params.search_text))
        .collect();
    // `sort_by` is stable: equal timestamps keep their source order.
    filtered.sort_by(|a, b| b.listed_at().cmp(&a.listed_at()));

    let filtered_count = filtered.len();
    let page_size = params.page_size.max(1);
    let total_pages = total_pages(filtered_count, page_size);
    let page_number = clamp_page(params.page_number, total_pages);

    let start = (page_number - 1) * page_size;
    let items = filtered.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page_number,
        total_pages,
        filtered_count,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        at: DateTime<Utc>,
    }

    impl Listed for Item {
        fn search_key(&self) -> &str {
            self.name
        }

        fn listed_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn item(name: &'static str, day: u32) -> Item {
        Item {
            name,
            at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("Water bottle", 3),
            item("iPhone 12", 7),
            item("Android Tablet", 1),
            item("Smartphone X", 5),
            item("Sneakers", 2),
            item("Phone case", 6),
            item("Coffee", 4),
        ]
    }

    fn names<T: Listed>(page: &Page<T>) -> Vec<String> {
        page.items.iter().map(|i| i.search_key().to_owned()).collect()
    }

    #[test]
    fn seven_items_page_size_six() {
        let items = sample();
        let mut params = ViewParams::with_layout(Layout::ThreeColumns);

        let first = derive_view(&items, &params);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 6);

        params.page_number = 2;
        let second = derive_view(&items, &params);
        assert_eq!(second.items.len(), 1);
        assert_eq!(names(&second), vec!["Android Tablet"]);
    }

    #[test]
    fn phone_search_is_case_insensitive_substring() {
        let items = vec![
            item("iPhone 12", 1),
            item("Android Tablet", 2),
            item("Smartphone X", 3),
        ];
        let params = ViewParams {
            search_text: "phone".into(),
            ..ViewParams::default()
        };
        let page = derive_view(&items, &params);
        assert_eq!(names(&page), vec!["Smartphone X", "iPhone 12"]);
        assert_eq!(page.filtered_count, 2);
    }

    #[test]
    fn filter_commutes_with_sort() {
        let items = sample();
        for needle in ["", "PHONE", "e", "zzz"] {
            let mut sorted = items.clone();
            sorted.sort_by(|a, b| b.at.cmp(&a.at));
            let sort_then_filter: Vec<_> = sorted
                .iter()
                .filter(|i| matches_search(i.name, needle))
                .cloned()
                .collect();

            let mut filter_then_sort: Vec<_> = items
                .iter()
                .filter(|i| matches_search(i.name, needle))
                .cloned()
                .collect();
            filter_then_sort.sort_by(|a, b| b.at.cmp(&a.at));

            assert_eq!(sort_then_filter, filter_then_sort, "needle {needle:?}");
        }
    }

    #[test]
    fn pages_partition_the_filtered_list() {
        let items = sample();
        for layout in [Layout::OneColumn, Layout::TwoColumns, Layout::ThreeColumns] {
            let mut params = ViewParams::with_layout(layout);
            let total = derive_view(&items, &params).total_pages;
            let mut concatenated = Vec::new();
            for n in 1..=total {
                params.page_number = n;
                concatenated.extend(derive_view(&items, &params).items.into_iter().cloned());
            }

            let mut expected = items.clone();
            expected.sort_by(|a, b| b.at.cmp(&a.at));
            assert_eq!(concatenated, expected, "layout {layout}");
        }
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let items = sample();
        let params = ViewParams {
            search_text: "phone".into(),
            page_size: 2,
            page_number: 4,
        };
        let page = derive_view(&items, &params);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn empty_list_reports_page_one_of_zero() {
        let items: Vec<Item> = Vec::new();
        let page = derive_view(&items, &ViewParams::default());
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let items = vec![item("b", 1), item("a", 1), item("c", 1)];
        let page = derive_view(&items, &ViewParams::default());
        assert_eq!(names(&page), vec!["b", "a", "c"]);
    }

    #[test]
    fn layout_parses_names_and_column_counts() {
        assert_eq!("2".parse::<Layout>().unwrap(), Layout::TwoColumns);
        assert_eq!("One-Column".parse::<Layout>().unwrap(), Layout::OneColumn);
        assert_eq!(Layout::default().page_size(), 6);
        assert_eq!(Layout::OneColumn.page_size(), 2);
        assert_eq!(Layout::TwoColumns.to_string(), "two-columns");
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(0, 6), 0);
    }
}
