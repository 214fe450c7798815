use std::error::Error;
use std::path::PathBuf;

use staffdir::data::{self, DataSource};
use staffdir::filter::url::parse_location;
use staffdir::filter::Action;
use staffdir::prober::{default_categories, FsProber, ProbeOptions};
use staffdir::render::ViewBindings;
use staffdir::store::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = data::build_client(5)?;
    let directory = data::load_source(&DataSource::parse("./Data.json"), &client).await?;
    let mut store = Store::new(directory, parse_location("https://intranet.local/")?);
    let prober = FsProber::new(PathBuf::from("./"));
    let categories = default_categories();
    let options = ProbeOptions::default();

    store.dispatch(Action::ToggleCustomer("Acme".to_string()));
    store.dispatch(Action::SetQuery("audit".to_string()));
    let view = store
        .begin_render()
        .run(&prober, &categories, &options, None)
        .await;
    let first_document = view
        .cards
        .iter()
        .find_map(|card| card.documents.first().cloned());
    store.commit(view);
    println!("{}", store.location());
    if let Some(link) = first_document {
        store.open_document(&link);
        println!("{:?}", store.viewer());
        store.close_viewer();
    }

    store.back();
    let view = store
        .begin_render()
        .run(&prober, &categories, &options, None)
        .await;
    store.commit(view);
    println!("{}", store.location());

    if let Some(page) = store.page("Employee Directory", &ViewBindings::default()) {
        std::fs::write("directory.html", page)?;
    }
    Ok(())
}
