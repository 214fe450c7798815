use reqwest::Url;

use super::FilterState;

pub const PARAM_ROLE: &str = "role";
pub const PARAM_QUERY: &str = "q";
pub const PARAM_VIEW: &str = "view";
pub const PARAM_CUSTOMERS: &str = "cust";
pub const PARAM_CONTRIBUTIONS: &str = "contrib";
pub const VIEW_EXPANDED: &str = "expanded";

const OWN_PARAMS: [&str; 5] = [
    PARAM_ROLE,
    PARAM_QUERY,
    PARAM_VIEW,
    PARAM_CUSTOMERS,
    PARAM_CONTRIBUTIONS,
];

// placeholder origin for parsing bare query strings
const LOCAL_ORIGIN: &str = "http://localhost/";

// list items are comma-joined; `\` escapes a literal comma or backslash
fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(",")
}

fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut item = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => item.push(chars.next().unwrap_or('\\')),
            ',' => items.push(std::mem::take(&mut item)),
            _ => item.push(c),
        }
    }
    items.push(item);
    items
}

fn parse_list(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in split_list(value) {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|v| v == item) {
            out.push(item.to_string());
        }
    }
    out
}

impl FilterState {
    pub fn from_url(url: &Url) -> Self {
        let mut state = FilterState::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                PARAM_ROLE if !value.is_empty() => state.role = Some(value.into_owned()),
                PARAM_QUERY => state.query = value.into_owned(),
                PARAM_VIEW => state.expanded = value == VIEW_EXPANDED,
                PARAM_CUSTOMERS => state.customers = parse_list(&value),
                PARAM_CONTRIBUTIONS => state.contributions = parse_list(&value),
                _ => {}
            }
        }
        state
    }

    /// Parses a bare query string such as `role=OFFICER&cust=Acme`.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        match Url::parse(LOCAL_ORIGIN) {
            Ok(mut url) => {
                url.set_query(Some(query));
                Self::from_url(&url)
            }
            Err(_) => FilterState::default(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(role) = self.role.as_deref().filter(|r| !r.is_empty()) {
            pairs.push((PARAM_ROLE, role.to_string()));
        }
        if !self.query.is_empty() {
            pairs.push((PARAM_QUERY, self.query.clone()));
        }
        if self.expanded {
            pairs.push((PARAM_VIEW, VIEW_EXPANDED.to_string()));
        }
        if !self.customers.is_empty() {
            pairs.push((PARAM_CUSTOMERS, join_list(&self.customers)));
        }
        if !self.contributions.is_empty() {
            pairs.push((PARAM_CONTRIBUTIONS, join_list(&self.contributions)));
        }
        pairs
    }

    /// Writes the state onto `url`, keeping any parameters this crate does not own.
    pub fn write_to_url(&self, url: &mut Url) {
        let foreign: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !OWN_PARAMS.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let pairs = self.query_pairs();
        if foreign.is_empty() && pairs.is_empty() {
            url.set_query(None);
            return;
        }
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (k, v) in foreign.iter() {
            serializer.append_pair(k, v);
        }
        for (k, v) in pairs.iter() {
            serializer.append_pair(k, v);
        }
    }

    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        self.write_to_url(&mut url);
        url
    }

    /// The encoded query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        match Url::parse(LOCAL_ORIGIN) {
            Ok(base) => self.to_url(&base).query().unwrap_or_default().to_string(),
            Err(_) => String::new(),
        }
    }

    /// A relative link (`?role=...` or `?`) for an anchor on the page at
    /// `location`, keeping that page's foreign parameters.
    pub fn href_on(&self, location: &Url) -> String {
        format!("?{}", self.to_url(location).query().unwrap_or_default())
    }
}

/// Parses either a full page URL or a bare query string.
pub fn parse_location(value: &str) -> Result<Url, String> {
    let trimmed = value.trim();
    if trimmed.contains("://") {
        return Url::parse(trimmed).map_err(|e| format!("invalid page URL '{trimmed}': {e}"));
    }
    let mut url = Url::parse(LOCAL_ORIGIN).map_err(|e| e.to_string())?;
    let query = trimmed.trim_start_matches('?');
    if !query.is_empty() {
        url.set_query(Some(query));
    }
    Ok(url)
}
