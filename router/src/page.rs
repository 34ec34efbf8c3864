use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    history::{EntryKey, History, HistoryEntry},
    location::Location,
};

/// Where a page sits relative to the history cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationState {
    Active,
    /// Older than the active page, reachable by going back.
    Back,
    /// Newer than the active page, reachable by going forward.
    Forward,
}

impl PresentationState {
    pub fn relative_to(index: usize, cursor: usize) -> Self {
        match index.cmp(&cursor) {
            std::cmp::Ordering::Equal => Self::Active,
            std::cmp::Ordering::Greater => Self::Back,
            std::cmp::Ordering::Less => Self::Forward,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Everything a page needs to render itself. Derived from an entry on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub key: EntryKey,
    pub location: Location,
    pub to: String,
    pub path_segments: Vec<String>,
    pub query_params: BTreeMap<String, String>,
    pub state: PresentationState,
}

impl PageInfo {
    pub fn new(entry: &HistoryEntry, state: PresentationState) -> Self {
        let decoded = entry.location.decode();
        Self {
            key: entry.key,
            location: entry.location.clone(),
            to: entry.location.to(),
            path_segments: decoded.path_segments,
            query_params: decoded.query_params,
            state,
        }
    }

    pub fn href(&self) -> &str {
        self.location.href()
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.path_segments.get(index).map(String::as_str)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }
}

impl History {
    pub fn current_page(&self) -> PageInfo {
        PageInfo::new(self.current(), PresentationState::Active)
    }

    /// Page info for every entry, in index order (newest first).
    pub fn pages(&self) -> Vec<PageInfo> {
        self.all_with_state()
            .into_iter()
            .map(|(entry, state)| PageInfo::new(entry, state))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::PresentationState;
    use crate::{history::History, location::Location};

    #[test]
    fn relative_states() {
        assert_eq!(PresentationState::relative_to(2, 2), PresentationState::Active);
        assert_eq!(PresentationState::relative_to(3, 2), PresentationState::Back);
        assert_eq!(PresentationState::relative_to(0, 2), PresentationState::Forward);
    }

    #[test]
    fn page_info_from_entry() {
        let mut history = History::new(Location::parse("http://localhost/").unwrap());
        history.navigate(Location::parse("http://localhost/users/jo%20e/?tab=a&tab=b").unwrap());

        let page = history.current_page();
        assert_eq!(page.key, history.current().key);
        assert_eq!(page.to, "/users/jo%20e/?tab=a&tab=b");
        assert_eq!(page.path_segments, ["users", "jo e"]);
        assert_eq!(page.segment(1), Some("jo e"));
        assert_eq!(page.param("tab"), Some("b"));
        assert_eq!(page.param("missing"), None);
        assert!(page.state.is_active());

        history.go_back();
        let pages = history.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].state, PresentationState::Forward);
        assert_eq!(pages[1].href(), "http://localhost/");
        assert!(pages[1].state.is_active());
    }

    #[test]
    fn serializes_state_lowercase() {
        let history = History::new(Location::parse("http://localhost/a?b=c").unwrap());
        let json = serde_json::to_value(history.current_page()).unwrap();
        assert_eq!(json["state"], "active");
        assert_eq!(json["location"], "http://localhost/a?b=c");
        assert_eq!(json["path_segments"][0], "a");
        assert_eq!(json["query_params"]["b"], "c");
    }
}
