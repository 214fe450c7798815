use reqwest::Url;

use crate::facets::Facets;
use crate::filter::url::PARAM_QUERY;
use crate::filter::{Action, Facet, FilterState};

use super::{escape_html, ViewBindings};

pub struct PageContext<'a> {
    pub title: &'a str,
    pub bindings: &'a ViewBindings,
    pub facets: &'a Facets,
    pub state: &'a FilterState,
    /// Current page URL; links keep its foreign parameters.
    pub location: &'a Url,
    pub content: &'a str,
    pub visible: usize,
    pub total: usize,
}

const STYLE: &str = r#"
body{font-family:Inter,system-ui,sans-serif;margin:0;background:#f8fafc;color:#0f172a}
header{display:flex;gap:1rem;align-items:center;padding:1rem 2rem;background:#fff;border-bottom:1px solid #e2e8f0;position:sticky;top:0;z-index:10}
header form{flex:1;display:flex;gap:.5rem}
header input[type=search]{flex:1;padding:.5rem .75rem;border:1px solid #cbd5e1;border-radius:.5rem}
.layout{display:flex}
aside{width:280px;padding:1rem 1.5rem;border-right:1px solid #e2e8f0;background:#fff;min-height:100vh}
aside h4{display:flex;justify-content:space-between;margin:1.25rem 0 .5rem}
main{flex:1;padding:1.5rem 2rem}
.filter-btn{display:inline-block;margin:.15rem;padding:.25rem .6rem;border:1px solid #cbd5e1;border-radius:999px;text-decoration:none;color:inherit;font-size:.85rem}
.filter-btn.active{background:#135bec;border-color:#135bec;color:#fff}
.clear-btn{font-size:.75rem;color:#135bec}
.clear-btn.disabled{color:#94a3b8;pointer-events:none}
.count{color:#64748b;margin-bottom:1rem}
.employee-card{background:#fff;border:1px solid #e2e8f0;border-radius:1rem;padding:1rem;margin-bottom:1rem}
.employee-top{display:flex;gap:1rem;align-items:center}
.employee-top img,.secondline-chip img{width:64px;height:64px;border-radius:50%;object-fit:cover;cursor:zoom-in}
.employee-actions-top{margin-left:auto;display:flex;gap:.5rem;flex-wrap:wrap}
.action-document-btn{padding:.4rem .8rem;border-radius:.5rem;border:0;background:#135bec;color:#fff;cursor:pointer}
.customer-chip,.authority-chip{display:inline-block;margin:.15rem;padding:.15rem .5rem;border-radius:.5rem;background:#e2e8f0;font-size:.8rem}
.child-block{border-top:1px dashed #e2e8f0;padding:.5rem 0}
.child-top{display:flex;justify-content:space-between;gap:1rem}
.contrib{font-weight:700;color:#135bec}
.secondline-row{display:flex;flex-wrap:wrap;gap:.75rem;margin-top:.5rem}
.secondline-chip{display:flex;gap:.5rem;align-items:center;padding:.5rem;border:1px solid #e2e8f0;border-radius:.75rem}
.secondline-text{display:flex;flex-direction:column}
.smeta.missing{color:#c23a3a;font-weight:700;font-size:.84rem}
.modal{display:none;position:fixed;inset:0;background:rgba(15,23,42,.7);align-items:center;justify-content:center;z-index:50}
.modal.visible{display:flex}
.modal img{max-width:90vw;max-height:90vh;border-radius:1rem}
.doc-frame{background:#fff;width:90vw;height:90vh;border-radius:1rem;display:flex;flex-direction:column}
.doc-frame header{position:static}
.doc-frame iframe{flex:1;border:0}
.error{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;padding:1.5rem;border-radius:1rem}
"#;

fn filter_link(facet: Facet, value: &str, state: &FilterState, location: &Url) -> String {
    let action = match facet {
        Facet::Role => Action::SelectRole(value.to_string()),
        Facet::Contribution => Action::ToggleContribution(value.to_string()),
        Facet::Customer => Action::ToggleCustomer(value.to_string()),
    };
    let class = if state.is_selected(facet, value) {
        "filter-btn active"
    } else {
        "filter-btn"
    };
    format!(
        r#"<a class="{}" href="{}">{}</a>"#,
        class,
        escape_html(&state.with(&action).href_on(location)),
        escape_html(value)
    )
}

fn clear_link(
    id: &str,
    label: &str,
    enabled: bool,
    action: &Action,
    state: &FilterState,
    location: &Url,
) -> String {
    if !enabled {
        return format!(
            r#"<span id="{}" class="clear-btn disabled" aria-disabled="true">{}</span>"#,
            id, label
        );
    }
    format!(
        r#"<a id="{}" class="clear-btn" href="{}">{}</a>"#,
        id,
        escape_html(&state.with(action).href_on(location)),
        label
    )
}

fn facet_section(
    heading: &str,
    container_id: &str,
    clear_id: &str,
    facet: Facet,
    values: &[String],
    state: &FilterState,
    location: &Url,
) -> String {
    let mut out = format!(
        "<h4>{}{}</h4>",
        heading,
        clear_link(
            clear_id,
            "Clear",
            state.has_selection(facet),
            &Action::Clear(facet),
            state,
            location
        )
    );
    out.push_str(&format!(r#"<div id="{container_id}">"#));
    for value in values {
        out.push_str(&filter_link(facet, value, state, location));
    }
    out.push_str("</div>");
    out
}

fn search_form(bindings: &ViewBindings, state: &FilterState, location: &Url) -> String {
    let mut out = String::from(r#"<form method="get" data-replace="1">"#);
    out.push_str(&format!(
        r#"<input type="search" id="{}" name="{}" value="{}" placeholder="Search name, code, role, responsibilities, customers..."/>"#,
        bindings.search_input,
        PARAM_QUERY,
        escape_html(&state.query)
    ));
    let target = state.to_url(location);
    for (key, value) in target.query_pairs() {
        if key == PARAM_QUERY {
            continue;
        }
        out.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}"/>"#,
            key,
            escape_html(&value)
        ));
    }
    out.push_str("</form>");
    out
}

fn page_script(b: &ViewBindings) -> String {
    format!(
        r#"<script>
(() => {{
  const imageModal = document.getElementById('{image_modal}');
  const imageContent = document.getElementById('{image_content}');
  const docModal = document.getElementById('{document_modal}');
  const docViewer = document.getElementById('{document_viewer}');
  const docTitle = document.getElementById('{document_title}');
  const closeImage = () => imageModal.classList.remove('visible');
  const closeDoc = () => {{ docModal.classList.remove('visible'); docViewer.src = ''; }};
  document.querySelectorAll('img[data-preview]').forEach(img => img.addEventListener('click', () => {{
    if (docModal.classList.contains('visible')) return;
    imageContent.src = img.src;
    imageModal.classList.add('visible');
  }}));
  document.querySelectorAll('[data-doc]').forEach(btn => btn.addEventListener('click', () => {{
    closeImage();
    docTitle.textContent = btn.dataset.title;
    docViewer.src = btn.dataset.doc;
    docModal.classList.add('visible');
  }}));
  imageModal.addEventListener('click', e => {{ if (e.target === imageModal) closeImage(); }});
  docModal.addEventListener('click', e => {{ if (e.target === docModal) closeDoc(); }});
  document.getElementById('{document_close}').addEventListener('click', closeDoc);
  document.addEventListener('keydown', e => {{ if (e.key === 'Escape') {{ closeImage(); closeDoc(); }} }});
  document.querySelectorAll('form[data-replace]').forEach(form => form.addEventListener('submit', e => {{
    e.preventDefault();
    const params = new URLSearchParams(new FormData(form));
    if (!params.get('q')) params.delete('q');
    location.replace('?' + params.toString());
  }}));
}})();
</script>"#,
        image_modal = b.image_modal,
        image_content = b.image_content,
        document_modal = b.document_modal,
        document_viewer = b.document_viewer,
        document_title = b.document_title,
        document_close = b.document_close,
    )
}

fn overlays(b: &ViewBindings) -> String {
    format!(
        r#"<div id="{}" class="modal"><img id="{}" alt="preview"/></div>
<div id="{}" class="modal"><div class="doc-frame"><header><strong id="{}"></strong><button type="button" id="{}">Close</button></header><iframe id="{}" title="document"></iframe></div></div>"#,
        b.image_modal,
        b.image_content,
        b.document_modal,
        b.document_title,
        b.document_close,
        b.document_viewer
    )
}

fn shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{}</title>
  <style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        escape_html(title),
        STYLE,
        body
    )
}

/// Renders the whole directory page around an already rendered content region.
pub fn render_page(ctx: &PageContext<'_>) -> String {
    let b = ctx.bindings;
    let state = ctx.state;
    let location = ctx.location;
    let mut body = String::new();

    body.push_str("<header>");
    body.push_str(&format!("<h2>{}</h2>", escape_html(ctx.title)));
    body.push_str(&search_form(b, state, location));
    let view_label = if state.expanded { "Expanded" } else { "Basic" };
    body.push_str(&format!(
        r#"<a id="{}" class="filter-btn" href="{}">{}</a>"#,
        b.view_toggle,
        escape_html(&state.with(&Action::ToggleView).href_on(location)),
        view_label
    ));
    body.push_str(&clear_link(
        b.clear_all,
        "Clear all",
        state.is_filtered(),
        &Action::ClearAll,
        state,
        location,
    ));
    body.push_str("</header>");

    body.push_str(r#"<div class="layout"><aside id="sidebar">"#);
    body.push_str(&facet_section(
        "Role",
        b.role_filters,
        b.clear_role,
        Facet::Role,
        &ctx.facets.roles,
        state,
        location,
    ));
    body.push_str(&facet_section(
        "Sales Activities Contribution",
        b.contrib_filters,
        b.clear_contribs,
        Facet::Contribution,
        &ctx.facets.contributions,
        state,
        location,
    ));
    body.push_str(&facet_section(
        "Customers",
        b.customer_filters,
        b.clear_customers,
        Facet::Customer,
        &ctx.facets.customers,
        state,
        location,
    ));
    body.push_str("</aside><main>");
    body.push_str(&format!(
        r#"<div class="count">Showing {} of {} employees</div>"#,
        ctx.visible, ctx.total
    ));
    body.push_str(&format!(r#"<div id="{}">{}</div>"#, b.content, ctx.content));
    body.push_str("</main></div>");
    body.push_str(&overlays(b));
    body.push_str(&page_script(b));

    shell(ctx.title, &body)
}

/// A page that states why the directory could not be shown.
pub fn render_error_page(title: &str, bindings: &ViewBindings, message: &str) -> String {
    let body = format!(
        r#"<header><h2>{}</h2></header><main><div id="{}"><div class="error"><strong>The directory could not be loaded.</strong><p>{}</p></div></div></main>"#,
        escape_html(title),
        bindings.content,
        escape_html(message)
    );
    shell(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets() -> Facets {
        Facets {
            roles: vec!["OFFICER".to_string(), "OPERATOR".to_string()],
            contributions: vec!["Direct".to_string()],
            customers: vec!["Acme".to_string(), "Beta".to_string()],
        }
    }

    fn page(state: &FilterState) -> String {
        page_at(state, "https://intranet.local/")
    }

    fn page_at(state: &FilterState, location: &str) -> String {
        let facets = facets();
        let bindings = ViewBindings::default();
        let location = Url::parse(location).unwrap();
        render_page(&PageContext {
            title: "Directory",
            bindings: &bindings,
            facets: &facets,
            state,
            location: &location,
            content: "<p>cards</p>",
            visible: 1,
            total: 3,
        })
    }

    #[test]
    fn active_role_link_toggles_it_off() {
        let state = FilterState {
            role: Some("OFFICER".to_string()),
            ..Default::default()
        };
        let html = page(&state);
        assert!(html.contains(r#"<a class="filter-btn active" href="?">OFFICER</a>"#));
        assert!(html.contains(r#"<a class="filter-btn" href="?role=OPERATOR">OPERATOR</a>"#));
        assert!(html.contains(r#"<a id="clearRoleBtn" class="clear-btn" href="?">Clear</a>"#));
    }

    #[test]
    fn clear_controls_are_disabled_without_selection() {
        let html = page(&FilterState::default());
        assert!(html.contains(r#"<span id="clearFilterBtn" class="clear-btn disabled""#));
        assert!(html.contains(r#"<span id="clearCustomerBtn" class="clear-btn disabled""#));
        assert!(html.contains("Showing 1 of 3 employees"));
        assert!(html.contains(r#"<div id="contentArea"><p>cards</p></div>"#));
    }

    #[test]
    fn customer_links_add_to_selection() {
        let state = FilterState {
            customers: vec!["Acme".to_string()],
            expanded: true,
            ..Default::default()
        };
        let html = page(&state);
        assert!(html.contains(r#"href="?view=expanded&amp;cust=Acme%2CBeta">Beta</a>"#));
        assert!(html.contains(r#"<a class="filter-btn active" href="?view=expanded">Acme</a>"#));
        assert!(html.contains(r#"<input type="hidden" name="cust" value="Acme"/>"#));
        assert!(html.contains(">Expanded</a>"));
    }

    #[test]
    fn links_and_search_form_keep_foreign_parameters() {
        let state = FilterState::from_query("lang=en&role=OFFICER");
        let html = page_at(&state, "https://intranet.local/?lang=en&role=OFFICER");
        assert!(html.contains(
            r#"<a id="viewToggleBtn" class="filter-btn" href="?lang=en&amp;role=OFFICER&amp;view=expanded">Basic</a>"#
        ));
        assert!(html.contains(r#"<a class="filter-btn active" href="?lang=en">OFFICER</a>"#));
        assert!(html.contains(r#"<a id="clearFilterBtn" class="clear-btn" href="?lang=en">Clear all</a>"#));
        assert!(html.contains(r#"<input type="hidden" name="lang" value="en"/>"#));
        assert!(html.contains(r#"<input type="hidden" name="role" value="OFFICER"/>"#));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error_page("Directory", &ViewBindings::default(), "bad <json>");
        assert!(html.contains("bad &lt;json&gt;"));
        assert!(html.contains("could not be loaded"));
    }
}
