use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use super::Employee;

pub const UNKNOWN_ROLE_RANK: u32 = 999;

const ROLE_ORDER: [(&str, u32); 7] = [
    ("HEAD OF THE DEPARTMENT", 1),
    ("SR.OFFICER", 2),
    ("OFFICER", 3),
    ("JR.OFFICER", 4),
    ("OPERATOR", 5),
    ("AD.OPERATOR", 6),
    ("AD.TRAINEE", 7),
];

pub fn role_rank(role: &str) -> u32 {
    let upper = role.to_uppercase();
    ROLE_ORDER
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_ROLE_RANK)
}

pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// scalar -> [scalar], null -> [], list -> list
pub(crate) fn coerce_list(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::String(s) if s.is_empty() => Vec::new(),
        other => vec![other],
    }
}

pub(crate) fn compare_employees(a: &Employee, b: &Employee) -> Ordering {
    role_rank(&a.role)
        .cmp(&role_rank(&b.role))
        .then_with(|| a.code.to_uppercase().cmp(&b.code.to_uppercase()))
}

pub(crate) fn sort_employees(employees: &mut [Employee]) {
    employees.sort_by(compare_employees);
}

pub(crate) fn build_name_index(employees: &[Employee]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(employees.len());
    for (idx, employee) in employees.iter().enumerate() {
        index.insert(employee.name.to_lowercase(), idx);
    }
    index
}
