use std::collections::HashSet;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

use crate::data::Employee;

fn name_delimiters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[/,;|]+").expect("delimiter pattern is valid"))
}

/// Splits a composite name string on `/ , ; |`, trimming and dropping empties.
pub fn split_names(value: &str) -> Vec<String> {
    name_delimiters()
        .split(value)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// The selectable values for each filter dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    pub roles: Vec<String>,
    pub contributions: Vec<String>,
    pub customers: Vec<String>,
}

impl Facets {
    pub fn extract(employees: &[Employee]) -> Self {
        let roles = employees
            .iter()
            .map(|e| e.role.as_str())
            .filter(|r| !r.is_empty())
            .unique()
            .map(|r| r.to_string())
            .collect();

        let contributions = employees
            .iter()
            .flat_map(|e| e.children.iter())
            .map(|c| c.contribution.as_str())
            .filter(|c| !c.is_empty())
            .unique()
            .map(|c| c.to_string())
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut customers: Vec<String> = Vec::new();
        for employee in employees {
            for name in employee.customer_names() {
                if seen.insert(name.clone()) {
                    customers.push(name);
                }
            }
        }
        customers.sort();

        Self {
            roles,
            contributions,
            customers,
        }
    }
}
