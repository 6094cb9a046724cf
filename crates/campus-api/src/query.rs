//! List state that lives in the query string: filters, sort, and page.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

use campus_core::config::defaults::DEFAULT_ITEMS_PER_PAGE;

const PAGE: &str = "page";
const ITEMS_PER_PAGE: &str = "itemsPerPage";
const SORT_BY: &str = "sortBy";
const SORT_ORDER: &str = "sortOrder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters, sort, and pagination for a list view.
///
/// Empty filter values are never stored, so they never reach the query
/// string. Changing a filter or the sort returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    filters: BTreeMap<String, String>,
    sort_by: Option<String>,
    sort_order: Option<SortOrder>,
    page: u32,
    items_per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl ListQuery {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            filters: BTreeMap::new(),
            sort_by: None,
            sort_order: None,
            page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.set_filter(key, value);
        self
    }

    pub fn set_filter(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    pub fn sorted_by(mut self, field: &str, order: SortOrder) -> Self {
        let field = field.trim();
        self.sort_by = (!field.is_empty()).then(|| field.to_string());
        self.sort_order = self.sort_by.as_ref().map(|_| order);
        self.page = 1;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn sort(&self) -> Option<(&str, SortOrder)> {
        Some((self.sort_by.as_deref()?, self.sort_order.unwrap_or(SortOrder::Asc)))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Copy keeping only the filters in `allowed`.
    pub fn restricted_to(&self, allowed: &[&str]) -> Self {
        let mut out = self.clone();
        out.filters.retain(|key, _| allowed.contains(&key.as_str()));
        out
    }

    /// Encode as a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.filters {
            serializer.append_pair(key, value);
        }
        if let Some((field, order)) = self.sort() {
            serializer.append_pair(SORT_BY, field);
            serializer.append_pair(SORT_ORDER, order.as_str());
        }
        serializer.append_pair(PAGE, &self.page.to_string());
        serializer.append_pair(ITEMS_PER_PAGE, &self.items_per_page.to_string());
        serializer.finish()
    }

    /// Decode a query string, with or without the leading `?`.
    /// Unparsable numbers fall back to the defaults.
    pub fn from_query_string(query: &str) -> Self {
        let mut out = Self::default();
        let mut page = 1;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                PAGE => page = value.parse().unwrap_or(1),
                ITEMS_PER_PAGE => {
                    out.items_per_page = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
                }
                SORT_BY => out.sort_by = Some(value.trim().to_string()).filter(|s| !s.is_empty()),
                SORT_ORDER => out.sort_order = SortOrder::parse(&value),
                _ => out.set_filter(&key, &value),
            }
        }
        out.page = page.max(1);
        out
    }

    /// `collection?query`.
    pub fn path_for(&self, collection: &str) -> String {
        format!("{collection}?{}", self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_omitted() {
        let query = ListQuery::default()
            .with_filter("courseName", "Algebra II")
            .with_filter("instructor", "   ")
            .with_filter("creditMin", "3");

        assert_eq!(
            query.to_query_string(),
            "courseName=Algebra+II&creditMin=3&page=1&itemsPerPage=10"
        );
    }

    #[test]
    fn filtering_returns_to_first_page() {
        let mut query = ListQuery::default().with_page(4);
        assert_eq!(query.page(), 4);
        query.set_filter("department", "Math");
        assert_eq!(query.page(), 1);

        let sorted = ListQuery::default().with_page(3).sorted_by("courseName", SortOrder::Desc);
        assert_eq!(sorted.page(), 1);
        assert_eq!(sorted.sort(), Some(("courseName", SortOrder::Desc)));
    }

    #[test]
    fn parses_browser_query_string() {
        let query = ListQuery::from_query_string(
            "?studentName=Nguy%E1%BB%85n&gradeMin=&page=2&itemsPerPage=25&sortBy=fullName&sortOrder=DESC",
        );
        assert_eq!(query.filter("studentName"), Some("Nguyễn"));
        assert_eq!(query.filter("gradeMin"), None);
        assert_eq!(query.page(), 2);
        assert_eq!(query.items_per_page(), 25);
        assert_eq!(query.sort(), Some(("fullName", SortOrder::Desc)));

        let reparsed = ListQuery::from_query_string(&query.to_query_string());
        assert_eq!(reparsed, query);
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let query = ListQuery::from_query_string("page=zero&itemsPerPage=0");
        assert_eq!((query.page(), query.items_per_page()), (1, 10));
    }

    #[test]
    fn restriction_drops_unknown_filters() {
        let query = ListQuery::default()
            .with_filter("courseId", "3")
            .with_filter("bogus", "x")
            .restricted_to(&["courseId", "studentId"]);
        assert_eq!(query.filters().collect::<Vec<_>>(), vec![("courseId", "3")]);
    }
}
