use std::future::Future;

use async_graphql::connection::{query, Connection, CursorType, Edge, EmptyFields};
use async_graphql::{OutputType, Result, SimpleObject};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::CoreResult;
use crate::graphql::errors::StructuredError;
use crate::services::{Page, PageWindow};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Opaque cursor holding a row offset, encoded as `base64("arrayconnection:N")`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OffsetCursor(pub u64);

#[derive(Debug, thiserror::Error)]
#[error("Invalid cursor '{0}'")]
pub struct InvalidCursor(String);

impl CursorType for OffsetCursor {
    type Error = InvalidCursor;

    fn decode_cursor(s: &str) -> Result<Self, Self::Error> {
        STANDARD
            .decode(s)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|raw| raw.strip_prefix(CURSOR_PREFIX)?.parse().ok())
            .map(OffsetCursor)
            .ok_or_else(|| InvalidCursor(s.to_string()))
    }

    fn encode_cursor(&self) -> String {
        STANDARD.encode(format!("{}{}", CURSOR_PREFIX, self.0))
    }
}

#[derive(SimpleObject)]
pub struct TotalCount {
    /// Number of rows matching the filter, ignoring the page window
    pub total_count: u64,
}

pub type NodeConnection<T> = Connection<OffsetCursor, T, TotalCount, EmptyFields>;

/// Builds a connection from Relay arguments and a page loader.
pub async fn load_connection<T, M, F, Fut>(
    after: Option<String>,
    before: Option<String>,
    first: Option<i32>,
    last: Option<i32>,
    load: F,
) -> Result<NodeConnection<T>>
where
    T: OutputType + From<M>,
    F: FnOnce(PageWindow) -> Fut,
    Fut: Future<Output = CoreResult<Page<M>>>,
{
    query(
        after,
        before,
        first,
        last,
        |after: Option<OffsetCursor>, before: Option<OffsetCursor>, first: Option<usize>, last: Option<usize>| async move {
            let window = PageWindow {
                after: after.map(|cursor| cursor.0),
                before: before.map(|cursor| cursor.0),
                first: first.map(|n| n as u64),
                last: last.map(|n| n as u64),
            };

            let page = load(window)
                .await
                .map_err(StructuredError::from_core_error)?;

            let mut connection = Connection::with_additional_fields(
                page.has_previous(),
                page.has_next(),
                TotalCount {
                    total_count: page.total,
                },
            );
            let start = page.start;
            connection.edges.extend(
                page.items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| Edge::new(OffsetCursor(start + index as u64), T::from(item))),
            );

            Ok::<_, async_graphql::Error>(connection)
        },
    )
    .await
}
