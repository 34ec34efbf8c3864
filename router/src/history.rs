use std::fmt;

use serde::Serialize;

use crate::{location::Location, page::PresentationState};

/// Stable identity of a [`HistoryEntry`], unique for the lifetime of a [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryKey(u64);

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub key: EntryKey,
    pub location: Location,
}

/// What a call into [`History`] did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// Moved to the older neighbour.
    Back,
    /// Moved to the newer neighbour.
    Forward,
    /// A new entry was inserted at the front and the forward branch dropped.
    Pushed,
}

impl Transition {
    pub fn is_change(self) -> bool {
        self != Transition::Unchanged
    }
}

/// Visited locations ordered newest first, and a cursor into them.
///
/// Index 0 is the most recently pushed destination. Moving back increases the
/// cursor, moving forward decreases it. `entries` is never empty.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    next_key: u64,
}

impl History {
    pub fn new(initial: Location) -> Self {
        let mut ret = Self {
            entries: Vec::new(),
            cursor: 0,
            next_key: 0,
        };
        let entry = ret.create_entry(initial);
        ret.entries.push(entry);
        ret
    }

    fn create_entry(&mut self, location: Location) -> HistoryEntry {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        HistoryEntry { key, location }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    fn back_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor + 1)
    }

    fn forward_entry(&self) -> Option<&HistoryEntry> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    pub fn can_go_back(&self) -> bool {
        self.back_entry().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor > 0
    }

    /// Classifies what [`History::navigate`] would do, without doing it.
    pub fn classify(&self, destination: &Location) -> Transition {
        if self.current().location == *destination {
            Transition::Unchanged
        } else if self
            .back_entry()
            .is_some_and(|entry| entry.location == *destination)
        {
            Transition::Back
        } else if self
            .forward_entry()
            .is_some_and(|entry| entry.location == *destination)
        {
            Transition::Forward
        } else {
            Transition::Pushed
        }
    }

    /// Moves to `destination`.
    ///
    /// The current location is a no-op and a direct neighbour is an implicit
    /// back/forward. Anything else drops every entry newer than the cursor and
    /// becomes the new entry at index 0.
    pub fn navigate(&mut self, destination: Location) -> Transition {
        let transition = self.classify(&destination);
        match transition {
            Transition::Unchanged => {}
            Transition::Back => self.cursor += 1,
            Transition::Forward => self.cursor -= 1,
            Transition::Pushed => {
                self.entries.drain(..self.cursor);
                let entry = self.create_entry(destination);
                self.entries.insert(0, entry);
                self.cursor = 0;
            }
        }
        transition
    }

    pub fn go_back(&mut self) -> Transition {
        if !self.can_go_back() {
            return Transition::Unchanged;
        }
        self.cursor += 1;
        Transition::Back
    }

    pub fn go_forward(&mut self) -> Transition {
        if !self.can_go_forward() {
            return Transition::Unchanged;
        }
        self.cursor -= 1;
        Transition::Forward
    }

    pub fn state_of(&self, index: usize) -> PresentationState {
        PresentationState::relative_to(index, self.cursor)
    }

    /// Every entry in index order, paired with its state relative to the cursor.
    pub fn all_with_state(&self) -> Vec<(&HistoryEntry, PresentationState)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry, self.state_of(index)))
            .collect()
    }
}
