use std::sync::Arc;

use crate::assets::decode::SpriteSheet;
use crate::foundation::core::ImageDimensions;

/// Identifier of a loaded sheet, unique within one history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SheetId(pub u64);

/// One previously loaded sheet.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Identifier.
    pub id: SheetId,
    /// Display name, usually the file name.
    pub name: String,
    /// Natural size.
    pub dimensions: ImageDimensions,
    /// Decoded pixels.
    pub sheet: Arc<SpriteSheet>,
}

/// Loaded sheets, newest first, with one optionally active.
#[derive(Debug, Default)]
pub struct SheetHistory {
    entries: Vec<HistoryEntry>,
    active: Option<SheetId>,
    next_id: u64,
}

impl SheetHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet at the front and make it active.
    pub fn push(&mut self, name: impl Into<String>, sheet: SpriteSheet) -> SheetId {
        let id = SheetId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            0,
            HistoryEntry {
                id,
                name: name.into(),
                dimensions: sheet.dimensions(),
                sheet: Arc::new(sheet),
            },
        );
        self.active = Some(id);
        id
    }

    /// Make `id` active. Returns `false` if it is unknown or already active.
    pub fn select(&mut self, id: SheetId) -> bool {
        if self.active == Some(id) || self.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Entry by id.
    pub fn get(&self, id: SheetId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The active entry.
    pub fn active(&self) -> Option<&HistoryEntry> {
        self.active.and_then(|id| self.get(id))
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was loaded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/history.rs"]
mod tests;
