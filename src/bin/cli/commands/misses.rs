use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let wrong = &app.session.state().wrong_words;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = wrong
                .iter()
                .map(|id| {
                    let word = app.catalog.find_word(id);
                    serde_json::json!({
                        "wordId": id,
                        "en": word.map(|w| w.en.as_str()),
                        "cn": word.map(|w| w.cn.as_str()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if wrong.is_empty() {
                println!("No missed words yet.");
                return Ok(());
            }

            for id in wrong {
                match app.catalog.find_word(id) {
                    Some(word) => println!("  {:<14} {:<12} {}", id, word.en, word.cn),
                    None => println!("  {:<14} (not in current word packs)", id),
                }
            }
            println!("\n{} missed word(s)", wrong.len());
        }
    }

    Ok(())
}
