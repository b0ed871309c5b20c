//! Sort definitions and the entry comparator
//!
//! Both the transactional executor and the hybrid merger order entries with
//! [`compare_entries`], so a merged set re-sorted here agrees with what each
//! backend would have produced on its own.

use crate::result::ResultEntry;
use std::cmp::Ordering;

/// What a sort definition orders by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKind {
    /// A named property
    Field(String),
    /// Relevance score
    Score,
    /// Document (entity reference) order
    Document,
}

/// One sort key with direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDefinition {
    /// What to order by
    pub kind: SortKind,
    /// Ascending when true
    pub ascending: bool,
}

impl SortDefinition {
    /// Sort by a named property
    pub fn field(name: impl Into<String>, ascending: bool) -> Self {
        SortDefinition {
            kind: SortKind::Field(name.into()),
            ascending,
        }
    }

    /// Sort by relevance score
    pub fn score(ascending: bool) -> Self {
        SortDefinition {
            kind: SortKind::Score,
            ascending,
        }
    }

    /// Sort by document order
    pub fn document(ascending: bool) -> Self {
        SortDefinition {
            kind: SortKind::Document,
            ascending,
        }
    }

    /// Index sort clause, e.g. `score desc` or `cm:name asc`
    pub fn clause(&self) -> String {
        let field = match &self.kind {
            SortKind::Field(name) => name.as_str(),
            SortKind::Score => "score",
            SortKind::Document => "_docid_",
        };
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{} {}", field, direction)
    }

    fn compare(&self, a: &ResultEntry, b: &ResultEntry) -> Ordering {
        let ordering = match &self.kind {
            SortKind::Score => a.score.total_cmp(&b.score),
            SortKind::Document => a.entity.cmp(&b.entity),
            SortKind::Field(name) => match (a.fields.get(name), b.fields.get(name)) {
                (Some(x), Some(y)) => x.total_cmp(y),
                // Missing values sort last in either direction
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// Compare two entries by a list of sort definitions, first key first
///
/// Returns `Equal` when every key ties; callers use a stable sort so ties keep
/// their incoming order.
pub fn compare_entries(a: &ResultEntry, b: &ResultEntry, sort: &[SortDefinition]) -> Ordering {
    sort.iter()
        .map(|def| def.compare(a, b))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
