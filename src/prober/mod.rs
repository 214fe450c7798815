use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::data::Employee;

/// A kind of per-employee document stored as `{folder}/{code}.pdf`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentCategory {
    pub folder: String,
    pub label: String,
    pub title: String,
}

impl DocumentCategory {
    pub fn new(folder: &str, label: &str, title: &str) -> Self {
        Self {
            folder: folder.to_string(),
            label: label.to_string(),
            title: title.to_string(),
        }
    }

    pub fn path_for(&self, code: &str) -> String {
        format!("{}/{}.pdf", self.folder, code.to_lowercase())
    }
}

pub fn default_categories() -> Vec<DocumentCategory> {
    vec![
        DocumentCategory::new("R&R", "R&R, Skill Matrix", "R&R Document"),
        DocumentCategory::new("DWM", "DWM Activities", "DWM Activities"),
        DocumentCategory::new("KPI", "KPI Activities", "KPI Activities"),
    ]
}

/// A document confirmed to exist for one employee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub folder: String,
    pub label: String,
    pub title: String,
    pub href: String,
}

impl DocumentLink {
    fn new(category: &DocumentCategory, employee: &Employee, href: String) -> Self {
        Self {
            folder: category.folder.clone(),
            label: category.label.clone(),
            title: format!("{}: {} ({})", category.title, employee.name, employee.code),
            href,
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// Whether the document at `path` exists. Failures count as absence.
    async fn exists(&self, path: &str) -> bool;

    /// The link the rendered page should use for `path`.
    fn href(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Probes documents with HEAD requests relative to a base URL.
#[derive(Clone, Debug)]
pub struct HttpProber {
    client: reqwest::Client,
    base: Url,
}

impl HttpProber {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    fn resolve(&self, path: &str) -> Option<Url> {
        self.base.join(path).ok()
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn exists(&self, path: &str) -> bool {
        let url = match self.resolve(path) {
            Some(url) => url,
            None => {
                log::debug!("probe {path}: could not resolve against {}", self.base);
                return false;
            }
        };
        match self.client.head(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                log::debug!("probe {url}: HTTP {}", resp.status().as_u16());
                false
            }
            Err(e) => {
                log::debug!("probe {url}: {e}");
                false
            }
        }
    }

    fn href(&self, path: &str) -> String {
        self.resolve(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|| path.to_string())
    }
}

/// Probes documents on the local filesystem under a root directory.
#[derive(Clone, Debug)]
pub struct FsProber {
    root: PathBuf,
    href_prefix: String,
}

impl FsProber {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            href_prefix: String::new(),
        }
    }

    /// Prefix prepended to document links on the rendered page.
    pub fn with_href_prefix(mut self, prefix: &str) -> Self {
        self.href_prefix = prefix.to_string();
        self
    }
}

#[async_trait]
impl Prober for FsProber {
    async fn exists(&self, path: &str) -> bool {
        let full = self.root.join(path);
        match tokio::fs::metadata(&full).await {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                log::debug!("probe {}: {e}", full.display());
                false
            }
        }
    }

    fn href(&self, path: &str) -> String {
        if self.href_prefix.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", self.href_prefix.trim_end_matches('/'), path)
    }
}

/// Builds the prober for a document location: an http(s) base URL or a directory.
pub fn prober_for(
    location: &str,
    href_prefix: Option<&str>,
    client: reqwest::Client,
) -> Result<Arc<dyn Prober>, String> {
    let trimmed = location.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        let base = Url::parse(trimmed)
            .map_err(|e| format!("invalid document base URL '{trimmed}': {e}"))?;
        return Ok(Arc::new(HttpProber::new(client, base)));
    }
    let prober = FsProber::new(crate::config::expand_tilde(trimmed))
        .with_href_prefix(href_prefix.unwrap_or_default());
    Ok(Arc::new(prober))
}

/// Probes every category for one employee concurrently; returns the
/// existing documents in category order.
pub async fn probe_record(
    prober: &dyn Prober,
    categories: &[DocumentCategory],
    employee: &Employee,
) -> Vec<DocumentLink> {
    let code = employee.code.trim();
    if code.is_empty() {
        return Vec::new();
    }
    let paths: Vec<String> = categories.iter().map(|c| c.path_for(code)).collect();
    let found = join_all(paths.iter().map(|p| prober.exists(p))).await;
    categories
        .iter()
        .zip(paths.iter())
        .zip(found)
        .filter(|(_, exists)| *exists)
        .map(|((category, path), _)| DocumentLink::new(category, employee, prober.href(path)))
        .collect()
}

#[derive(Clone, Debug)]
pub struct ProbeOptions {
    pub concurrency: usize,
    pub rate: Option<u32>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            concurrency: 16,
            rate: None,
        }
    }
}

/// Probes every employee and returns the documents in the same order as
/// `employees`, once all probes have finished.
pub async fn probe_all(
    prober: &dyn Prober,
    categories: &[DocumentCategory],
    employees: &[&Employee],
    options: &ProbeOptions,
    pb: Option<&ProgressBar>,
) -> Vec<Vec<DocumentLink>> {
    let limiter = options
        .rate
        .and_then(NonZeroU32::new)
        .map(|rate| RateLimiter::direct(Quota::per_second(rate)));
    let concurrency = options.concurrency.max(1);

    let mut out: Vec<Vec<DocumentLink>> = vec![Vec::new(); employees.len()];
    let mut pending = employees.iter().enumerate();
    let mut in_flight = FuturesUnordered::new();

    loop {
        while in_flight.len() < concurrency {
            let Some((idx, employee)) = pending.next() else {
                break;
            };
            if let Some(lim) = limiter.as_ref() {
                lim.until_ready().await;
            }
            in_flight.push(async move { (idx, probe_record(prober, categories, employee).await) });
        }
        match in_flight.next().await {
            Some((idx, links)) => {
                if let Some(pb) = pb {
                    pb.inc(1);
                }
                out[idx] = links;
            }
            None => break,
        }
    }
    out
}
