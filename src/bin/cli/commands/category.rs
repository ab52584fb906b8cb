use anyhow::{bail, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, name: &str, format: &OutputFormat) -> Result<()> {
    let name_lower = name.to_lowercase();
    let matches: Vec<String> = app
        .catalog
        .packs()
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&name_lower))
        .map(|p| p.name.clone())
        .collect();

    let pack = match matches.as_slice() {
        [] => bail!(
            "No pack matching '{}'. Available packs:\n{}",
            name,
            app.catalog
                .packs()
                .iter()
                .map(|p| format!("  - {}", p.name))
                .collect::<Vec<_>>()
                .join("\n")
        ),
        [single] => single.clone(),
        _ => match matches.iter().find(|m| m.to_lowercase() == name_lower) {
            Some(exact) => exact.clone(),
            None => bail!(
                "Ambiguous pack name '{}'. Matches:\n{}",
                name,
                matches
                    .iter()
                    .map(|m| format!("  - {}", m))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        },
    };

    app.session.set_category(&pack);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "currentCategory": pack }))?
            );
        }
        OutputFormat::Plain => println!("Now practicing {}", pack),
    }

    Ok(())
}
