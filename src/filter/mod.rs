pub mod history;
pub mod url;

pub use history::{History, Navigation};

/// A facet the user can select values from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    Role,
    Contribution,
    Customer,
}

/// A single user interaction with the filter panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SelectRole(String),
    ToggleContribution(String),
    ToggleCustomer(String),
    Clear(Facet),
    ClearAll,
    SetQuery(String),
    ToggleView,
    SetExpanded(bool),
}

impl Action {
    /// Query edits replace the current history entry, everything else pushes.
    pub fn navigation(&self) -> Navigation {
        match self {
            Action::SetQuery(_) => Navigation::Replace,
            _ => Navigation::Push,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub role: Option<String>,
    pub contributions: Vec<String>,
    pub customers: Vec<String>,
    pub query: String,
    pub expanded: bool,
}

fn toggle_membership(list: &mut Vec<String>, item: &str) {
    if let Some(idx) = list.iter().position(|v| v == item) {
        list.remove(idx);
    } else {
        list.push(item.to_string());
    }
}

impl FilterState {
    pub fn select_role(&mut self, role: &str) {
        if self.role.as_deref() == Some(role) {
            self.role = None;
        } else {
            self.role = Some(role.to_string());
        }
    }

    pub fn toggle_contribution(&mut self, contribution: &str) {
        toggle_membership(&mut self.contributions, contribution);
    }

    pub fn toggle_customer(&mut self, customer: &str) {
        toggle_membership(&mut self.customers, customer);
    }

    pub fn clear(&mut self, facet: Facet) {
        match facet {
            Facet::Role => self.role = None,
            Facet::Contribution => self.contributions.clear(),
            Facet::Customer => self.customers.clear(),
        }
    }

    /// Resets every facet and the query; the view flag is kept.
    pub fn clear_all(&mut self) {
        self.role = None;
        self.contributions.clear();
        self.customers.clear();
        self.query.clear();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::SelectRole(role) => self.select_role(role),
            Action::ToggleContribution(c) => self.toggle_contribution(c),
            Action::ToggleCustomer(c) => self.toggle_customer(c),
            Action::Clear(facet) => self.clear(*facet),
            Action::ClearAll => self.clear_all(),
            Action::SetQuery(q) => self.set_query(q),
            Action::ToggleView => self.expanded = !self.expanded,
            Action::SetExpanded(expanded) => self.expanded = *expanded,
        }
    }

    /// Returns a copy with `action` applied, used to build toggle links.
    pub fn with(&self, action: &Action) -> Self {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    pub fn has_selection(&self, facet: Facet) -> bool {
        match facet {
            Facet::Role => self.role.is_some(),
            Facet::Contribution => !self.contributions.is_empty(),
            Facet::Customer => !self.customers.is_empty(),
        }
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        match facet {
            Facet::Role => self.role.as_deref() == Some(value),
            Facet::Contribution => self.contributions.iter().any(|c| c == value),
            Facet::Customer => self.customers.iter().any(|c| c == value),
        }
    }

    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Whether the "clear all" control has anything to clear.
    pub fn is_filtered(&self) -> bool {
        self.has_selection(Facet::Role)
            || self.has_selection(Facet::Contribution)
            || self.has_selection(Facet::Customer)
            || !self.query.trim().is_empty()
    }

    /// Compares selections ignoring the order values were picked in.
    pub fn same_selection(&self, other: &Self) -> bool {
        fn sorted(list: &[String]) -> Vec<&String> {
            let mut out: Vec<&String> = list.iter().collect();
            out.sort();
            out
        }
        self.role == other.role
            && self.query == other.query
            && self.expanded == other.expanded
            && sorted(&self.contributions) == sorted(&other.contributions)
            && sorted(&self.customers) == sorted(&other.customers)
    }
}
