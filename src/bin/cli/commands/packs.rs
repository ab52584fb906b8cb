use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let current = &app.session.state().current_category;
    let ledger = &app.session.state().review_data;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = app
                .catalog
                .packs()
                .iter()
                .map(|pack| {
                    serde_json::json!({
                        "name": pack.name,
                        "icon": pack.icon,
                        "character": pack.character,
                        "isCurrent": &pack.name == current,
                        "words": pack.words.iter().map(|w| serde_json::json!({
                            "id": w.id,
                            "en": w.en,
                            "cn": w.cn,
                            "mastered": ledger.contains(&w.id),
                        })).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for pack in app.catalog.packs() {
                let marker = if &pack.name == current { "* " } else { "  " };
                let mastered = pack.words.iter().filter(|w| ledger.contains(&w.id)).count();
                println!(
                    "{}{} {} ({}/{} mastered, with {})",
                    marker,
                    pack.icon,
                    pack.name,
                    mastered,
                    pack.words.len(),
                    pack.character
                );
                for word in &pack.words {
                    let check = if ledger.contains(&word.id) { "x" } else { " " };
                    println!("    [{}] {:<14} {:<12} {}", check, word.id, word.en, word.cn);
                }
                println!();
            }
        }
    }

    Ok(())
}
