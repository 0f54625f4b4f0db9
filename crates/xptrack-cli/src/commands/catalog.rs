use clap::Subcommand;
use serde::Serialize;
use xptrack_core::{JsonFileStore, StateStore, TaskTemplate};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List the task templates in tasks.json
    List,
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    number: usize,
    #[serde(flatten)]
    template: &'a TaskTemplate,
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open()?;

    match action {
        CatalogAction::List => {
            let catalog = store.load_catalog()?;
            let entries: Vec<_> = catalog
                .tasks
                .iter()
                .enumerate()
                .map(|(i, template)| CatalogEntry {
                    number: i + 1,
                    template,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
