use reqwest::Url;

use crate::data::Directory;
use crate::filter::{Action, FilterState, Navigation};
use crate::prober::tests::FixedProber;
use crate::prober::{default_categories, ProbeOptions};
use crate::render::ViewBindings;
use crate::store::Store;

const DATA: &str = r#"[
    {"EMPLOYEE_NAME": "Bilal Khan", "EMPLOYEE_CODE": "e2", "ROLES": "OPERATOR",
     "CUSTOMER": "Acme", "AUTHORITIES": null, "CHILDREN": ""},
    {"EMPLOYEE_NAME": "Chen Wei", "EMPLOYEE_CODE": 7, "ROLES": "Contractor",
     "CUSTOMER": ["Gamma; Acme"]},
    {"EMPLOYEE_NAME": "Asha Rao", "EMPLOYEE_CODE": "E1", "ROLES": "OFFICER",
     "CUSTOMER": ["Beta/Acme"], "AUTHORITIES": "Sign purchase orders",
     "CHILDREN": [
        {"RESPONSIBILITIES": "Audit vendors", "SALES ACTIVITIES CONTRIBUTION": "Direct",
         "SECONDLINE PERSON": "Bilal Khan"},
        {"RESPONSIBILITIES": "Board minutes", "SALES ACTIVITIES CONTRIBUTION": "Indirect",
         "SECONDLINE PERSON": "****"}
     ]}
]"#;

fn directory() -> Directory {
    Directory::from_json(DATA.as_bytes()).unwrap()
}

fn codes(store: &Store) -> Vec<String> {
    store
        .current()
        .map(|v| v.cards.iter().map(|c| c.code.clone()).collect())
        .unwrap_or_default()
}

async fn render(store: &mut Store, prober: &FixedProber) {
    let view = store
        .begin_render()
        .run(prober, &default_categories(), &ProbeOptions::default(), None)
        .await;
    assert!(store.commit(view));
}

#[test]
fn loaded_records_are_normalized_and_ranked() {
    let dir = directory();
    let codes: Vec<_> = dir.employees().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["E1", "e2", "7"]);

    let bilal = dir.find_by_name("bilal khan").unwrap();
    assert!(bilal.authorities.is_empty());
    assert!(bilal.children.is_empty());
    assert_eq!(dir.employees()[0].authorities, vec!["Sign purchase orders"]);

    assert_eq!(dir.facets().roles, vec!["OFFICER", "OPERATOR", "Contractor"]);
    assert_eq!(dir.facets().contributions, vec!["Direct", "Indirect"]);
    assert_eq!(dir.facets().customers, vec!["Acme", "Beta", "Gamma"]);
}

#[test]
fn toggling_a_customer_twice_restores_the_selection() {
    let mut state = FilterState::from_query("role=OFFICER&cust=Acme");
    let before = state.clone();
    state.toggle_customer("Beta");
    assert_eq!(state.customers, vec!["Acme", "Beta"]);
    state.toggle_customer("Beta");
    assert_eq!(state, before);
}

#[test]
fn filter_state_survives_a_url_round_trip() {
    let state = FilterState {
        role: Some("OFFICER".to_string()),
        customers: vec!["Acme".to_string()],
        expanded: true,
        ..Default::default()
    };
    let base = Url::parse("https://intranet.local/directory/index.html?lang=en").unwrap();
    let url = state.to_url(&base);
    assert_eq!(url.path(), "/directory/index.html");
    assert_eq!(FilterState::from_url(&url), state);
    assert!(url.query().unwrap_or_default().starts_with("lang=en"));
}

#[tokio::test]
async fn browsing_session_filters_probes_and_navigates() {
    let prober = FixedProber::new(&["R&R/e1.pdf", "KPI/e1.pdf", "DWM/e2.pdf"]);
    let mut store = Store::new(
        directory(),
        Url::parse("https://intranet.local/").unwrap(),
    );

    render(&mut store, &prober).await;
    assert_eq!(codes(&store), vec!["E1", "e2", "7"]);

    assert_eq!(
        store.dispatch(Action::ToggleCustomer("Beta".to_string())),
        Navigation::Push
    );
    render(&mut store, &prober).await;
    assert_eq!(codes(&store), vec!["E1"]);
    let folders: Vec<_> = store.current().unwrap().cards[0]
        .documents
        .iter()
        .map(|d| d.folder.as_str())
        .collect();
    assert_eq!(folders, vec!["R&R", "KPI"]);

    assert_eq!(
        store.dispatch(Action::SetQuery("AUDIT".to_string())),
        Navigation::Replace
    );
    store.dispatch(Action::ToggleView);
    render(&mut store, &prober).await;
    assert_eq!(codes(&store), vec!["E1"]);
    assert_eq!(store.history().len(), 3);

    let page = store
        .page("Directory", &ViewBindings::default())
        .unwrap();
    assert!(page.contains("Audit vendors"));
    assert!(!page.contains("Board minutes"));
    assert!(page.contains("Showing 1 of 3 employees"));

    assert!(store.back());
    assert!(!store.state().expanded);
    assert_eq!(store.state().query, "AUDIT");
    assert!(store.back());
    assert_eq!(store.state(), &FilterState::default());
    assert!(!store.back());
    render(&mut store, &prober).await;
    assert_eq!(codes(&store), vec!["E1", "e2", "7"]);
}

#[tokio::test]
async fn report_lists_visible_records_with_documents() {
    let prober = FixedProber::new(&["DWM/e2.pdf"]);
    let mut store = Store::new(
        directory(),
        Url::parse("https://intranet.local/?role=OPERATOR").unwrap(),
    );
    render(&mut store, &prober).await;

    let report = crate::output::build_report(store.current().unwrap());
    assert_eq!(report.total, 3);
    assert_eq!(report.visible, 1);
    assert_eq!(report.records[0].code, "e2");
    assert_eq!(report.records[0].documents[0].href, "DWM/e2.pdf");

    let text = String::from_utf8(crate::output::render_text(&report)).unwrap();
    assert!(text.starts_with("e2\tBilal Khan\tOPERATOR\tDWM"));
}

#[test]
fn comma_bearing_contribution_link_selects_its_records() {
    let dir = Directory::from_json(
        br#"[
            {"EMPLOYEE_NAME": "Dana", "EMPLOYEE_CODE": "E9", "ROLES": "OFFICER",
             "CHILDREN": {"RESPONSIBILITIES": "Campaigns", "SALES ACTIVITIES CONTRIBUTION": "Sales, Marketing"}},
            {"EMPLOYEE_NAME": "Eli", "EMPLOYEE_CODE": "E8", "ROLES": "OFFICER",
             "CHILDREN": [{"RESPONSIBILITIES": "Quotes", "SALES ACTIVITIES CONTRIBUTION": "Sales"}]}
        ]"#,
    )
    .unwrap();
    assert_eq!(dir.facets().contributions, vec!["Sales", "Sales, Marketing"]);

    let linked = FilterState::default()
        .with(&Action::ToggleContribution("Sales, Marketing".to_string()));
    let clicked = FilterState::from_query(&format!("?{}", linked.to_query()));
    assert_eq!(clicked, linked);
    let visible = crate::query::visible(dir.employees(), &clicked);
    let names: Vec<_> = visible.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Dana"]);
}
