pub mod normalize;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::facets::Facets;

pub use normalize::{role_rank, UNKNOWN_ROLE_RANK};

// secondline values starting with this marker are redacted
pub const REDACTION_MARKER: &str = "****";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Responsibility {
    #[serde(rename = "RESPONSIBILITIES", default, deserialize_with = "text")]
    pub description: String,
    #[serde(
        rename = "SALES ACTIVITIES CONTRIBUTION",
        default,
        deserialize_with = "text"
    )]
    pub contribution: String,
    #[serde(
        rename = "SECONDLINE PERSON",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondline: Option<String>,
}

impl Responsibility {
    pub fn is_redacted(&self) -> bool {
        self.secondline
            .as_deref()
            .map(|s| s.starts_with(REDACTION_MARKER))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employee {
    #[serde(rename = "EMPLOYEE_CODE", default, deserialize_with = "text")]
    pub code: String,
    #[serde(rename = "EMPLOYEE_NAME", default, deserialize_with = "text")]
    pub name: String,
    #[serde(rename = "ROLES", default, deserialize_with = "text")]
    pub role: String,
    #[serde(
        rename = "DEPARTMENT",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<String>,
    #[serde(
        rename = "EMPLOYEE_IMAGE",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(rename = "AUTHORITIES", default, deserialize_with = "text_list")]
    pub authorities: Vec<String>,
    #[serde(rename = "CUSTOMER", default, deserialize_with = "text_list")]
    pub customers: Vec<String>,
    #[serde(rename = "CHILDREN", default, deserialize_with = "child_list")]
    pub children: Vec<Responsibility>,
}

impl Employee {
    /// Individual customer names across every composite customer string.
    pub fn customer_names(&self) -> Vec<String> {
        self.customers
            .iter()
            .flat_map(|c| crate::facets::split_names(c))
            .collect()
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize::coerce_text(&value).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize::coerce_text(&value).filter(|s| !s.trim().is_empty()))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize::coerce_list(value)
        .iter()
        .filter_map(normalize::coerce_text)
        .collect())
}

fn child_list<'de, D>(deserializer: D) -> Result<Vec<Responsibility>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut out = Vec::new();
    for item in normalize::coerce_list(value) {
        if !item.is_object() {
            log::debug!("skipping non-object responsibility entry: {item}");
            continue;
        }
        out.push(serde_json::from_value(item).map_err(serde::de::Error::custom)?);
    }
    Ok(out)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(crate::config::expand_tilde(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read data file: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch data: {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("data source returned HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("failed to parse data: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("data must be a JSON array of employee records")]
    NotAnArray,
}

/// The loaded dataset: sorted records, the name lookup and the filter facets.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    employees: Vec<Employee>,
    name_index: HashMap<String, usize>,
    facets: Facets,
}

impl Directory {
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| LoadError::Parse { source: e })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let items = match value {
            Value::Array(items) => items,
            _ => return Err(LoadError::NotAnArray),
        };
        let mut employees = Vec::with_capacity(items.len());
        for item in items {
            let employee: Employee =
                serde_json::from_value(item).map_err(|e| LoadError::Parse { source: e })?;
            employees.push(employee);
        }
        Ok(Self::from_records(employees))
    }

    pub fn from_records(mut employees: Vec<Employee>) -> Self {
        normalize::sort_employees(&mut employees);
        let name_index = normalize::build_name_index(&employees);
        let facets = Facets::extract(&employees);
        Self {
            employees,
            name_index,
            facets,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Case-insensitive lookup by employee name.
    pub fn find_by_name(&self, name: &str) -> Option<&Employee> {
        self.name_index
            .get(&name.to_lowercase())
            .and_then(|idx| self.employees.get(*idx))
    }
}

pub async fn load_source(
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Directory, LoadError> {
    let bytes = match source {
        DataSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Read {
                    path: path.display().to_string(),
                    source: e,
                })?
        }
        DataSource::Url(url) => {
            let resp = client
                .get(url.as_str())
                .send()
                .await
                .map_err(|e| LoadError::Fetch {
                    url: url.clone(),
                    source: e,
                })?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            resp.bytes()
                .await
                .map_err(|e| LoadError::Fetch {
                    url: url.clone(),
                    source: e,
                })?
                .to_vec()
        }
    };
    let directory = Directory::from_json(&bytes)?;
    log::info!(
        "loaded {} employee records from {}",
        directory.len(),
        source.describe()
    );
    Ok(directory)
}

pub fn build_client(timeout_seconds: usize) -> Result<reqwest::Client, reqwest::Error> {
    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_missing_list_fields_become_sequences() {
        let raw = br#"[
            {"EMPLOYEE_NAME": "A", "EMPLOYEE_CODE": "E1", "AUTHORITIES": "Sign", "CUSTOMER": null},
            {"EMPLOYEE_NAME": "B", "EMPLOYEE_CODE": "E2", "CHILDREN": {"RESPONSIBILITIES": "Plan"}},
            {"EMPLOYEE_NAME": "C", "EMPLOYEE_CODE": "E3", "AUTHORITIES": ["x", "y"], "CUSTOMER": "Acme/Beta"}
        ]"#;
        let dir = Directory::from_json(raw).unwrap();
        let a = dir.find_by_name("a").unwrap();
        assert_eq!(a.authorities, vec!["Sign"]);
        assert!(a.customers.is_empty());
        assert!(a.children.is_empty());

        let b = dir.find_by_name("B").unwrap();
        assert!(b.authorities.is_empty());
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.children[0].description, "Plan");

        let c = dir.find_by_name("c").unwrap();
        assert_eq!(c.authorities, vec!["x", "y"]);
        assert_eq!(c.customers, vec!["Acme/Beta"]);
    }

    #[test]
    fn numeric_code_is_stringified_and_blank_image_is_none() {
        let raw = br#"[{"EMPLOYEE_NAME": "A", "EMPLOYEE_CODE": 1042, "EMPLOYEE_IMAGE": "  "}]"#;
        let dir = Directory::from_json(raw).unwrap();
        let a = &dir.employees()[0];
        assert_eq!(a.code, "1042");
        assert_eq!(a.image, None);
    }

    #[test]
    fn rejects_non_array_documents() {
        let err = Directory::from_json(br#"{"EMPLOYEE_NAME": "A"}"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray));
        let err = Directory::from_json(b"not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn redaction_marker_is_a_prefix_match() {
        let child = Responsibility {
            secondline: Some("****".to_string()),
            ..Default::default()
        };
        assert!(child.is_redacted());
        let child = Responsibility {
            secondline: Some("**** hidden".to_string()),
            ..Default::default()
        };
        assert!(child.is_redacted());
        let child = Responsibility {
            secondline: Some("Jane *".to_string()),
            ..Default::default()
        };
        assert!(!child.is_redacted());
        assert!(!Responsibility::default().is_redacted());
    }

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(
            DataSource::parse("https://intranet/Data.json"),
            DataSource::Url("https://intranet/Data.json".to_string())
        );
        assert!(matches!(DataSource::parse("./Data.json"), DataSource::Path(_)));
    }

    #[tokio::test]
    async fn load_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(dir.path().join("missing.json"));
        let client = build_client(5).unwrap();
        let err = load_source(&source, &client).await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn load_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Data.json");
        std::fs::write(
            &path,
            r#"[{"EMPLOYEE_NAME": "Zed", "EMPLOYEE_CODE": "Z9", "ROLES": "OFFICER"}]"#,
        )
        .unwrap();
        let client = build_client(5).unwrap();
        let dir = load_source(&DataSource::Path(path), &client).await.unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.facets().roles, vec!["OFFICER"]);
    }
}
