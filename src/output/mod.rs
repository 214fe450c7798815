use serde::Serialize;

use crate::prober::DocumentLink;
use crate::store::RenderedView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "json" => Some(Self::Json),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub code: String,
    pub name: String,
    pub role: String,
    pub documents: Vec<DocumentLink>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputReport {
    pub query: String,
    pub total: usize,
    pub visible: usize,
    pub records: Vec<OutputRecord>,
}

pub fn build_report(view: &RenderedView) -> OutputReport {
    let records = view
        .cards
        .iter()
        .map(|c| OutputRecord {
            code: c.code.clone(),
            name: c.name.clone(),
            role: c.role.clone(),
            documents: c.documents.clone(),
        })
        .collect();
    OutputReport {
        query: view.state.to_query(),
        total: view.total,
        visible: view.visible(),
        records,
    }
}

pub fn render_text(report: &OutputReport) -> Vec<u8> {
    let mut out = String::new();
    for r in report.records.iter() {
        let docs = r
            .documents
            .iter()
            .map(|d| d.folder.as_str())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("{}\t{}\t{}\t{}\n", r.code, r.name, r.role, docs));
    }
    out.into_bytes()
}

pub fn render_json(report: &OutputReport) -> Vec<u8> {
    serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
}
