//! Transient per-session interaction state
//!
//! Tracks which record is expanded in grid view, which records are being
//! deleted, which delete is awaiting confirmation, and the active layout.
//! Never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How the collection is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    List,
    #[default]
    Grid,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::List => f.write_str("list"),
            LayoutMode::Grid => f.write_str("grid"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(LayoutMode::List),
            "grid" => Ok(LayoutMode::Grid),
            other => Err(format!("unknown layout '{}' (expected list or grid)", other)),
        }
    }
}

/// Interaction state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    expanded: Option<String>,
    deleting: BTreeSet<String>,
    pending_delete: Option<String>,
    layout: LayoutMode,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- expansion ----

    /// Currently expanded record, if any
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    /// Expand `id`, collapsing whatever was expanded before
    pub fn expand(&mut self, id: &str) {
        self.expanded = Some(id.to_string());
    }

    /// Toggle `id`: collapse it if expanded, otherwise expand it (collapsing any other)
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.expanded = None;
        } else {
            self.expand(id);
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    // ---- delete confirmation gate ----

    /// Record awaiting delete confirmation, if any
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Ask for confirmation to delete `id`, replacing any earlier request
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    /// Take the pending request (confirm path)
    pub fn take_pending_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    /// Drop the pending request (reject path)
    pub fn reject_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    // ---- in-flight delete markers ----

    /// Records currently being deleted
    ///
    /// Markers are per identifier, so deletes of different records never
    /// clear each other's marker.
    pub fn deleting(&self) -> impl Iterator<Item = &str> {
        self.deleting.iter().map(String::as_str)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Mark `id` as mid-deletion; false if it already is
    pub fn begin_delete(&mut self, id: &str) -> bool {
        self.deleting.insert(id.to_string())
    }

    /// Clear the marker for `id`
    pub fn finish_delete(&mut self, id: &str) {
        self.deleting.remove(id);
    }

    // ---- layout ----

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        self.layout = layout;
    }

    /// Reset after the collection was replaced
    ///
    /// Expansion and pending confirmation refer to records that may be gone.
    /// In-flight markers belong to the deletes that set them and the layout is
    /// the user's choice, so both are kept.
    pub fn reset_for_refresh(&mut self) {
        self.expanded = None;
        self.pending_delete = None;
    }
}
