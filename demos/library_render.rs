use std::error::Error;

use staffdir::data::DataSource;
use staffdir::runner::{Options, Runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(Options {
        data: DataSource::parse("./Data.json"),
        docs: "./".to_string(),
        location: "role=OFFICER&view=expanded".to_string(),
        concurrency: 8,
        timeout_seconds: 5,
        ..Options::default()
    })?;
    let result = runner.run().await?;

    println!("Showing {} of {}", result.view.visible(), result.view.total);
    for card in result.view.cards.iter() {
        let folders: Vec<_> = card.documents.iter().map(|d| d.folder.as_str()).collect();
        println!("{} {} [{}]", card.code, card.name, folders.join(", "));
    }
    std::fs::write("directory.html", result.page)?;

    Ok(())
}
