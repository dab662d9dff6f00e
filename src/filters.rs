//! Task Filters
//!
//! `TaskFilters` is what the filter bar edits. `TaskQuery` is the resolved,
//! hashable form sent to `GET /tasks/` and used as the task cache key.

use crate::models::{Priority, Tag};

/// Fixed category list offered by the task form and the filter bar
pub const CATEGORIES: [&str; 6] = ["Work", "Personal", "Shopping", "Health", "Learning", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Tasks",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        Self::ALL.into_iter().find(|f| f.as_str() == s).unwrap_or_default()
    }

    fn completed(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(false),
            StatusFilter::Completed => Some(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [SortBy::CreatedAt, SortBy::DueDate, SortBy::Priority, SortBy::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::DueDate => "due_date",
            SortBy::Priority => "priority",
            SortBy::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "Date Created",
            SortBy::DueDate => "Due Date",
            SortBy::Priority => "Priority",
            SortBy::Title => "Title",
        }
    }

    pub fn parse(s: &str) -> Self {
        Self::ALL.into_iter().find(|f| f.as_str() == s).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Identifies one removable filter chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChip {
    Search,
    Status,
    Priority,
    Category,
    Tag,
}

/// Filter bar state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskFilters {
    pub search: String,
    pub status: StatusFilter,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    /// Tag name; resolved to ids against the loaded tag list
    pub tag: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl TaskFilters {
    /// Active chips with their display text, in bar order
    pub fn chips(&self) -> Vec<(FilterChip, String)> {
        let mut chips = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            chips.push((FilterChip::Search, format!("Search: {}", search)));
        }
        if self.status != StatusFilter::All {
            chips.push((FilterChip::Status, format!("Status: {}", self.status.label())));
        }
        if let Some(priority) = self.priority {
            chips.push((FilterChip::Priority, format!("Priority: {}", priority.label())));
        }
        if let Some(category) = &self.category {
            chips.push((FilterChip::Category, format!("Category: {}", category)));
        }
        if let Some(tag) = &self.tag {
            chips.push((FilterChip::Tag, format!("Tag: {}", tag)));
        }
        chips
    }

    pub fn active_count(&self) -> usize {
        self.chips().len()
    }

    pub fn remove(&mut self, chip: FilterChip) {
        match chip {
            FilterChip::Search => self.search.clear(),
            FilterChip::Status => self.status = StatusFilter::All,
            FilterChip::Priority => self.priority = None,
            FilterChip::Category => self.category = None,
            FilterChip::Tag => self.tag = None,
        }
    }

    /// Clear every filter; sorting is kept
    pub fn clear(&mut self) {
        *self = Self {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..Default::default()
        };
    }

    /// The tag filter names a tag that is not in `tags`
    pub fn has_unknown_tag(&self, tags: &[Tag]) -> bool {
        self.tag
            .as_ref()
            .is_some_and(|name| !tags.iter().any(|t| &t.name == name))
    }

    /// Forget a tag filter whose tag was deleted or renamed
    pub fn drop_unknown_tag(&mut self, tags: &[Tag]) -> bool {
        let unknown = self.has_unknown_tag(tags);
        if unknown {
            self.tag = None;
        }
        unknown
    }

    pub fn to_query(&self, tags: &[Tag]) -> TaskQuery {
        let search = self.search.trim();
        let tag_ids = match &self.tag {
            Some(name) => tags.iter().filter(|t| &t.name == name).map(|t| t.id).collect(),
            None => Vec::new(),
        };
        TaskQuery {
            completed: self.status.completed(),
            priority: self.priority,
            category: self.category.clone(),
            search: (!search.is_empty()).then(|| search.to_string()),
            tag_ids,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            skip: None,
            limit: None,
        }
    }
}

/// Resolved `GET /tasks/` parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaskQuery {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub tag_ids: Vec<u64>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskQuery {
    /// Query string pairs; `tag_ids` repeats once per id
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        for id in &self.tag_ids {
            pairs.push(("tag_ids", id.to_string()));
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn test_default_query_only_sorts() {
        let query = TaskFilters::default().to_query(&[]);
        assert_eq!(
            query.query_pairs(),
            vec![("sort_by", "created_at".to_string()), ("sort_order", "desc".to_string())]
        );
    }

    #[test]
    fn test_full_query_pairs() {
        let tags = vec![fixtures::tag(4, "urgent"), fixtures::tag(9, "home")];
        let filters = TaskFilters {
            search: "  report ".into(),
            status: StatusFilter::Pending,
            priority: Some(Priority::High),
            category: Some("Work".into()),
            tag: Some("urgent".into()),
            sort_by: SortBy::DueDate,
            sort_order: SortOrder::Asc,
        };

        let pairs = filters.to_query(&tags).query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("completed", "false".to_string()),
                ("priority", "high".to_string()),
                ("category", "Work".to_string()),
                ("search", "report".to_string()),
                ("tag_ids", "4".to_string()),
                ("sort_by", "due_date".to_string()),
                ("sort_order", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_tag_name_filters_nothing() {
        let filters = TaskFilters {
            tag: Some("gone".into()),
            ..Default::default()
        };
        assert!(filters.to_query(&[fixtures::tag(1, "home")]).tag_ids.is_empty());
    }

    #[test]
    fn test_deleted_tag_filter_is_dropped() {
        let tags = [fixtures::tag(1, "home")];
        let mut filters = TaskFilters {
            tag: Some("work".into()),
            ..Default::default()
        };
        assert_eq!(filters.active_count(), 1);

        assert!(filters.drop_unknown_tag(&tags));
        assert_eq!(filters.tag, None);
        assert_eq!(filters.active_count(), 0);
        assert!(filters.chips().is_empty());

        filters.tag = Some("home".into());
        assert!(!filters.drop_unknown_tag(&tags));
        assert_eq!(filters.to_query(&tags).tag_ids, vec![1]);
    }

    #[test]
    fn test_chips_and_clear() {
        let mut filters = TaskFilters {
            search: "milk".into(),
            category: Some("Shopping".into()),
            sort_by: SortBy::Title,
            ..Default::default()
        };
        assert_eq!(filters.active_count(), 2);

        filters.remove(FilterChip::Search);
        assert_eq!(filters.chips(), vec![(FilterChip::Category, "Category: Shopping".to_string())]);

        filters.clear();
        assert_eq!(filters.active_count(), 0);
        assert_eq!(filters.sort_by, SortBy::Title);
    }

    #[test]
    fn test_equal_filters_share_cache_key() {
        let a = TaskFilters {
            search: "x ".into(),
            ..Default::default()
        };
        let b = TaskFilters {
            search: " x".into(),
            ..Default::default()
        };
        assert_eq!(a.to_query(&[]), b.to_query(&[]));
    }
}
