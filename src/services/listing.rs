use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect, Select,
};

use crate::errors::CoreResult;

/// Relay-style slice request expressed as row offsets.
///
/// `after` and `before` are exclusive offsets; `first`/`last` then narrow the
/// window from the front or the back.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageWindow {
    pub after: Option<u64>,
    pub before: Option<u64>,
    pub first: Option<u64>,
    pub last: Option<u64>,
}

impl PageWindow {
    pub fn all() -> Self {
        Self::default()
    }

    /// Resolves the window to a `start..end` range within `total` rows.
    pub fn resolve(&self, total: u64) -> (u64, u64) {
        let mut start = self.after.map(|after| after + 1).unwrap_or(0).min(total);
        let mut end = self.before.unwrap_or(total).min(total);
        if end < start {
            end = start;
        }

        if let Some(first) = self.first {
            end = end.min(start + first);
        }
        if let Some(last) = self.last {
            start = start.max(end.saturating_sub(last));
        }

        (start, end)
    }
}

#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Offset of the first item within the whole listing.
    pub start: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    pub fn has_next(&self) -> bool {
        self.start + (self.items.len() as u64) < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            start: self.start,
            total: self.total,
        }
    }
}

/// Counts the query, then loads only the rows inside `window`.
///
/// The caller is responsible for ordering `select`.
pub async fn paginate<E, C>(db: &C, select: Select<E>, window: &PageWindow) -> CoreResult<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
    C: ConnectionTrait,
{
    let total = select.clone().count(db).await?;
    let (start, end) = window.resolve(total);

    let items = if end > start {
        select.offset(start).limit(end - start).all(db).await?
    } else {
        Vec::new()
    };

    Ok(Page { items, start, total })
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `fragment` literally anywhere in the value.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Substring match where `%` and `_` in `fragment` carry no wildcard meaning.
///
/// SQLite `LIKE` folds ASCII case, which gives `icontains` semantics.
fn icontains<C: ColumnTrait>(column: C, fragment: &str) -> SimpleExpr {
    Expr::col((column.entity_name(), column))
        .like(LikeExpr::new(contains_pattern(fragment)).escape(LIKE_ESCAPE))
}

/// Applies an exact match and a case-insensitive substring match on a text column.
pub fn filter_text<E, C>(
    mut select: Select<E>,
    column: C,
    exact: Option<String>,
    fragment: Option<String>,
) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    if let Some(exact) = exact {
        select = select.filter(column.eq(exact));
    }
    if let Some(fragment) = fragment {
        select = select.filter(icontains(column, &fragment));
    }
    select
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_covers_everything() {
        assert_eq!(PageWindow::all().resolve(12), (0, 12));
    }

    #[test]
    fn first_and_after_slice_forward() {
        let window = PageWindow {
            after: Some(2),
            first: Some(4),
            ..Default::default()
        };
        assert_eq!(window.resolve(10), (3, 7));
    }

    #[test]
    fn last_and_before_slice_backward() {
        let window = PageWindow {
            before: Some(8),
            last: Some(3),
            ..Default::default()
        };
        assert_eq!(window.resolve(10), (5, 8));
    }

    #[test]
    fn out_of_range_cursors_are_clamped() {
        let window = PageWindow {
            after: Some(40),
            ..Default::default()
        };
        assert_eq!(window.resolve(5), (5, 5));

        let window = PageWindow {
            after: Some(4),
            before: Some(2),
            ..Default::default()
        };
        assert_eq!(window.resolve(10), (5, 5));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("math"), "%math%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern(r"c:\"), r"%c:\\%");
    }

    #[test]
    fn page_reports_neighbours() {
        let page = Page {
            items: vec![1, 2],
            start: 3,
            total: 6,
        };
        assert!(page.has_previous());
        assert!(page.has_next());

        let page = Page {
            items: vec![1, 2],
            start: 0,
            total: 2,
        };
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }
}
