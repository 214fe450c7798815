use reqwest::Url;

use super::FilterState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Push,
    Replace,
}

/// Browser-style session history of page URLs.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Url>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    // never empty: `new` seeds the initial location
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, url: Url) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor = self.entries.len() - 1;
    }

    pub fn replace(&mut self, url: Url) {
        self.entries[self.cursor] = url;
    }

    /// Records `state` as the new location using the given navigation mode.
    pub fn record(&mut self, state: &FilterState, navigation: Navigation) {
        let url = state.to_url(self.current());
        match navigation {
            Navigation::Push => self.push(url),
            Navigation::Replace => self.replace(url),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Url> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Url> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://intranet.local/directory/").unwrap()
    }

    #[test]
    fn replace_does_not_grow_history() {
        let mut history = History::new(base());
        let mut state = FilterState::default();
        for q in ["p", "pu", "pum", "pump"] {
            state.set_query(q);
            history.record(&state, Navigation::Replace);
        }
        assert_eq!(history.len(), 1);
        assert_eq!(FilterState::from_url(history.current()).query, "pump");
    }

    #[test]
    fn back_and_forward_walk_entries() {
        let mut history = History::new(base());
        let mut state = FilterState::default();
        state.select_role("OFFICER");
        history.record(&state, Navigation::Push);
        state.toggle_customer("Acme");
        history.record(&state, Navigation::Push);
        assert_eq!(history.len(), 3);

        let back = FilterState::from_url(history.back().unwrap());
        assert_eq!(back.role.as_deref(), Some("OFFICER"));
        assert!(back.customers.is_empty());

        assert_eq!(
            FilterState::from_url(history.back().unwrap()),
            FilterState::default()
        );
        assert!(history.back().is_none());

        let fwd = FilterState::from_url(history.forward().unwrap());
        assert_eq!(fwd.role.as_deref(), Some("OFFICER"));
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = History::new(base());
        let mut state = FilterState::default();
        state.select_role("A");
        history.record(&state, Navigation::Push);
        history.back();
        state.select_role("B");
        history.record(&state, Navigation::Push);
        assert_eq!(history.len(), 2);
        assert!(!history.can_go_forward());
        assert_eq!(
            FilterState::from_url(history.current()).role.as_deref(),
            Some("B")
        );
    }
}
