use crate::data::Employee;
use crate::facets::split_names;
use crate::filter::FilterState;

fn matches_role(employee: &Employee, state: &FilterState) -> bool {
    match state.role.as_deref() {
        Some(role) => employee.role == role,
        None => true,
    }
}

fn matches_contribution(employee: &Employee, state: &FilterState) -> bool {
    if state.contributions.is_empty() {
        return true;
    }
    employee
        .children
        .iter()
        .any(|c| state.contributions.contains(&c.contribution))
}

fn matches_customer(employee: &Employee, state: &FilterState) -> bool {
    if state.customers.is_empty() {
        return true;
    }
    employee
        .customers
        .iter()
        .flat_map(|c| split_names(c))
        .any(|name| state.customers.contains(&name))
}

fn matches_text(employee: &Employee, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let top = format!(
        "{} {} {} {}",
        employee.name,
        employee.code,
        employee.role,
        employee.department.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    if top.contains(needle) {
        return true;
    }
    if employee
        .authorities
        .iter()
        .any(|a| a.to_lowercase().contains(needle))
    {
        return true;
    }
    if employee.children.iter().any(|c| {
        format!("{} {}", c.description, c.contribution)
            .to_lowercase()
            .contains(needle)
    }) {
        return true;
    }
    employee
        .customers
        .iter()
        .any(|c| c.to_lowercase().contains(needle))
}

pub fn matches(employee: &Employee, state: &FilterState) -> bool {
    let needle = state.normalized_query();
    matches_role(employee, state)
        && matches_contribution(employee, state)
        && matches_customer(employee, state)
        && matches_text(employee, &needle)
}

/// Returns the records passing every active filter, in directory order.
pub fn visible<'a>(employees: &'a [Employee], state: &FilterState) -> Vec<&'a Employee> {
    employees.iter().filter(|e| matches(e, state)).collect()
}
