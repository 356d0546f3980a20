//! Re-renders a named container of the host document from a record list.
//!
//! # Design
//! The host element tree sits behind `Document` / `Container`, so rendering
//! is a pure function of (records, formatter) into whatever tree the host
//! provides. `MemoryDocument` is the in-process tree used by the console host
//! and by tests. Row text is plain text, never interpreted as markup.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ApiError;

/// Class applied to rows of the list views.
pub const LIST_ITEM_CLASS: &str = "list-group-item";

/// One rendered child element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub class_name: Option<String>,
    pub text: String,
}

impl Row {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            class_name: None,
            text: text.into(),
        }
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }
}

pub trait Container {
    fn clear_children(&mut self);
    fn append_row(&mut self, row: Row);
    fn rows(&self) -> &[Row];
}

pub trait Document {
    type Container: Container;

    fn container_mut(&mut self, id: &str) -> Option<&mut Self::Container>;
}

/// Clear `container_id` and append one row per record, in order.
///
/// Fails with `MissingElement` without touching the document when the
/// container does not exist. Repeating the call with the same records
/// leaves the container in the same state.
pub fn render<D, R, F>(
    document: &mut D,
    container_id: &str,
    records: &[R],
    format_line: F,
) -> Result<(), ApiError>
where
    D: Document,
    F: Fn(&R) -> Row,
{
    let container = document
        .container_mut(container_id)
        .ok_or_else(|| ApiError::MissingElement(container_id.to_string()))?;

    container.clear_children();
    for record in records {
        container.append_row(format_line(record));
    }
    debug!(container = container_id, rows = records.len(), "rendered");
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryContainer {
    rows: Vec<Row>,
}

impl Container for MemoryContainer {
    fn clear_children(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// In-memory document holding named containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    containers: BTreeMap<String, MemoryContainer>,
}

impl MemoryDocument {
    /// A document with an empty container for each id.
    pub fn with_containers(ids: &[&str]) -> Self {
        let containers = ids
            .iter()
            .map(|id| (id.to_string(), MemoryContainer::default()))
            .collect();
        Self { containers }
    }

    pub fn container(&self, id: &str) -> Option<&MemoryContainer> {
        self.containers.get(id)
    }

    /// Text of every row in `id`, or empty if the container is absent.
    pub fn texts(&self, id: &str) -> Vec<&str> {
        self.container(id)
            .map(|c| c.rows().iter().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Document for MemoryDocument {
    type Container = MemoryContainer;

    fn container_mut(&mut self, id: &str) -> Option<&mut MemoryContainer> {
        self.containers.get_mut(id)
    }
}
