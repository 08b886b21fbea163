//! Composite search query builder
//!
//! Accumulates filters plus free-text, time-range, paging and sort state
//! into a derived [`SearchRequest`]. The query string is recomputed on every
//! read; nothing derived is cached.

use crate::filter::Filter;
use crate::{SearchRequest, SortField, SortOrder};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const DEFAULT_SORT_FIELD: &str = "timestamp";

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    filters: Vec<Filter>,
    search_text: String,
    /// Epoch-millis inclusive range rendered as a timestamp clause.
    time_range: Option<(i64, i64)>,
    from: usize,
    size: usize,
    sort_field: String,
    sort_order: SortOrder,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            search_text: String::new(),
            time_range: None,
            from: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Desc,
        }
    }

    /// Inserts `filter` if no entry constrains the same field/value pair,
    /// otherwise replaces the existing entry. Idempotent for identical
    /// input; never fails.
    pub fn add_or_update_filter(&mut self, filter: Filter) {
        match self.filters.iter_mut().find(|f| f.same_constraint(&filter)) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Removes the entry constraining the same field/value pair as `filter`.
    /// Silent no-op when absent.
    pub fn remove_filter(&mut self, filter: &Filter) {
        self.filters.retain(|f| !f.same_constraint(filter));
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_time_range(&mut self, from_ms: i64, to_ms: i64) {
        self.time_range = Some((from_ms, to_ms));
    }

    pub fn clear_time_range(&mut self) {
        self.time_range = None;
    }

    pub fn set_paging(&mut self, from: usize, size: usize) {
        self.from = from;
        self.size = size;
    }

    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) {
        self.sort_field = field.into();
        self.sort_order = order;
    }

    /// The effective query string: all active filters joined with ` AND `,
    /// free text (when set) as one more clause, time range (when set) as a
    /// `timestamp:[from TO to]` clause. An empty builder yields `*`.
    pub fn query(&self) -> String {
        let mut clauses: Vec<String> = self
            .filters
            .iter()
            .filter(|f| f.is_active)
            .map(Filter::query_fragment)
            .collect();

        if !self.search_text.trim().is_empty() {
            clauses.push(self.search_text.trim().to_string());
        }
        if let Some((from, to)) = self.time_range {
            clauses.push(format!("timestamp:[{} TO {}]", from, to));
        }

        if clauses.is_empty() {
            "*".to_string()
        } else {
            clauses.join(" AND ")
        }
    }

    /// Projects the current state into the request handed to the backend.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query(),
            from: self.from,
            size: self.size,
            sort: vec![SortField {
                field: self.sort_field.clone(),
                sort_order: self.sort_order,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_queries_everything() {
        let builder = QueryBuilder::new();
        assert_eq!(builder.query(), "*");
    }

    #[test]
    fn no_two_entries_share_a_constraint() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("ip_src_addr", "10.0.0.1"));
        builder.add_or_update_filter(Filter::new("ip_src_addr", "10.0.0.1"));
        builder.add_or_update_filter(Filter::new("ip_src_addr", "10.0.0.1"));
        assert_eq!(builder.filters().len(), 1);
    }

    #[test]
    fn re_adding_replaces_with_latest() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("source:type", "bro"));
        builder.add_or_update_filter(Filter::inactive("source:type", "bro"));
        assert_eq!(builder.filters().len(), 1);
        assert!(!builder.filters()[0].is_active);
    }

    #[test]
    fn same_field_different_values_coexist() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("-alert_status", "RESOLVE"));
        builder.add_or_update_filter(Filter::new("-alert_status", "DISMISS"));
        assert_eq!(builder.filters().len(), 2);
        assert_eq!(
            builder.query(),
            "-alert_status:RESOLVE AND -alert_status:DISMISS"
        );
    }

    #[test]
    fn remove_absent_filter_is_a_no_op() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("source:type", "snort"));
        builder.remove_filter(&Filter::new("ip_dst_addr", "10.0.0.2"));
        assert_eq!(builder.filters().len(), 1);
    }

    #[test]
    fn inactive_filters_are_held_but_not_queried() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("source:type", "bro"));
        builder.add_or_update_filter(Filter::inactive("ip_src_addr", "10.0.0.1"));
        assert_eq!(builder.query(), "source:type:bro");
    }

    #[test]
    fn free_text_and_time_range_join_the_and_clause_list() {
        let mut builder = QueryBuilder::new();
        builder.add_or_update_filter(Filter::new("source:type", "bro"));
        builder.set_search_text("dns.query:*.example.com");
        builder.set_time_range(1000, 2000);
        assert_eq!(
            builder.query(),
            "source:type:bro AND dns.query:*.example.com AND timestamp:[1000 TO 2000]"
        );
    }

    #[test]
    fn search_request_carries_paging_and_sort() {
        let mut builder = QueryBuilder::new();
        builder.set_paging(50, 10);
        builder.set_sort("score", SortOrder::Asc);
        let request = builder.search_request();
        assert_eq!(request.query, "*");
        assert_eq!(request.from, 50);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort[0].field, "score");
        assert_eq!(request.sort[0].sort_order, SortOrder::Asc);
    }
}
