pub mod page;
pub mod viewer;

use crate::data::{Directory, Employee, Responsibility};
use crate::facets::split_names;
use crate::prober::DocumentLink;

pub use page::{render_error_page, render_page, PageContext};
pub use viewer::Viewer;

pub const NO_RESULTS: &str = "No matching records found.";
pub const NO_SECONDLINE_DATA: &str = "(No image/data found)";
const EMPTY_RESPONSIBILITY: &str = "\u{2014}";

/// Element ids of every page region the renderer and page script touch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewBindings {
    pub content: &'static str,
    pub role_filters: &'static str,
    pub contrib_filters: &'static str,
    pub customer_filters: &'static str,
    pub search_input: &'static str,
    pub clear_all: &'static str,
    pub clear_role: &'static str,
    pub clear_customers: &'static str,
    pub clear_contribs: &'static str,
    pub view_toggle: &'static str,
    pub image_modal: &'static str,
    pub image_content: &'static str,
    pub document_modal: &'static str,
    pub document_viewer: &'static str,
    pub document_title: &'static str,
    pub document_close: &'static str,
}

impl Default for ViewBindings {
    fn default() -> Self {
        Self {
            content: "contentArea",
            role_filters: "roleFilters",
            contrib_filters: "contribFilters",
            customer_filters: "customerFilters",
            search_input: "filterInput",
            clear_all: "clearFilterBtn",
            clear_role: "clearRoleBtn",
            clear_customers: "clearCustomerBtn",
            clear_contribs: "clearContribBtn",
            view_toggle: "viewToggleBtn",
            image_modal: "imageModal",
            image_content: "modalContent",
            document_modal: "pdfModal",
            document_viewer: "pdfViewer",
            document_title: "pdfTitle",
            document_close: "pdfCloseBtn",
        }
    }
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn customer_chips(employee: &Employee) -> String {
    let mut out = String::new();
    for name in employee.customer_names() {
        out.push_str(&format!(
            r#"<span class="customer-chip">{}</span>"#,
            escape_html(&name)
        ));
    }
    out
}

fn preview_image(src: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" data-preview="1" loading="lazy"/>"#,
        escape_html(src),
        escape_html(alt)
    )
}

fn render_actions(docs: &[DocumentLink]) -> String {
    if docs.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<div class="employee-actions-top">"#);
    for doc in docs {
        out.push_str(&format!(
            r#"<button type="button" class="action-document-btn" data-doc="{}" data-title="{}">{}</button>"#,
            escape_html(&doc.href),
            escape_html(&doc.title),
            escape_html(&doc.label)
        ));
    }
    out.push_str("</div>");
    out
}

/// A resolved secondline reference, or the inline placeholder when the
/// name is unknown or the match has no image.
pub fn render_secondline(name: &str, directory: &Directory) -> String {
    let found = directory
        .find_by_name(name)
        .filter(|m| m.image.is_some());
    let m = match found {
        Some(m) => m,
        None => {
            return format!(
                r#"<div class="secondline-chip"><div><div class="sname">{}</div><div class="smeta missing">{}</div></div></div>"#,
                escape_html(name),
                NO_SECONDLINE_DATA
            );
        }
    };
    let mut out = String::from(r#"<div class="secondline-chip">"#);
    if let Some(image) = m.image.as_deref() {
        out.push_str(&preview_image(image, &m.name));
    }
    out.push_str(r#"<div class="secondline-text">"#);
    out.push_str(&format!(
        r#"<div class="sname">{}</div><div class="code">{}</div><div class="smeta">{}</div>"#,
        escape_html(&m.name),
        escape_html(&m.code),
        escape_html(&m.role)
    ));
    if !m.customers.is_empty() {
        out.push_str(r#"<div class="secondline-customers">"#);
        out.push_str(&customer_chips(m));
        out.push_str("</div>");
    }
    out.push_str("</div></div>");
    out
}

fn render_responsibility(child: &Responsibility, directory: &Directory) -> Option<String> {
    if child.is_redacted() {
        return None;
    }
    let description = if child.description.is_empty() {
        EMPTY_RESPONSIBILITY.to_string()
    } else {
        escape_html(&child.description)
    };
    let mut out = String::from(r#"<div class="child-block"><div class="child-top">"#);
    out.push_str(&format!(
        r#"<div class="resp">{}</div><div class="contrib">{}</div></div>"#,
        description,
        escape_html(&child.contribution)
    ));
    let names = split_names(child.secondline.as_deref().unwrap_or_default());
    if !names.is_empty() {
        out.push_str(r#"<div class="secondline-row">"#);
        for name in names.iter() {
            out.push_str(&render_secondline(name, directory));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    Some(out)
}

/// Builds the card for one visible employee.
pub fn render_card(
    employee: &Employee,
    docs: &[DocumentLink],
    directory: &Directory,
    expanded: bool,
) -> String {
    let mut out = String::from(r#"<div class="employee-card"><div class="employee-top">"#);
    if let Some(image) = employee.image.as_deref() {
        out.push_str(&preview_image(image, &employee.name));
    }
    out.push_str(&format!(
        r#"<div class="meta"><h3>{}</h3><div class="code">{}</div><small>{}</small></div>"#,
        escape_html(&employee.name),
        escape_html(&employee.code),
        escape_html(&employee.role)
    ));
    out.push_str(&render_actions(docs));
    out.push_str("</div>");

    let chips = customer_chips(employee);
    if !chips.is_empty() {
        out.push_str(r#"<div class="customer-follow"><strong>Customer Follow-ups:</strong>"#);
        out.push_str(&chips);
        out.push_str("</div>");
    }

    if expanded {
        if !employee.authorities.is_empty() {
            out.push_str(r#"<div class="authorities">"#);
            for authority in employee.authorities.iter() {
                out.push_str(&format!(
                    r#"<div class="authority-chip">{}</div>"#,
                    escape_html(authority)
                ));
            }
            out.push_str("</div>");
        }
        let blocks: Vec<String> = employee
            .children
            .iter()
            .filter_map(|c| render_responsibility(c, directory))
            .collect();
        if !blocks.is_empty() {
            out.push_str(r#"<div class="children-wrap">"#);
            for block in blocks {
                out.push_str(&block);
            }
            out.push_str("</div>");
        }
    }

    out.push_str("</div>");
    out
}

/// The content region: every card in order, or the no-results placeholder.
pub fn render_cards(cards: &[String]) -> String {
    if cards.is_empty() {
        return format!(r#"<p class="no-results">{NO_RESULTS}</p>"#);
    }
    cards.concat()
}
