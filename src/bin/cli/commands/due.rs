use anyhow::Result;
use chrono::Utc;

use wordgarden_lib::vocab::scheduler::format_interval;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let now = Utc::now();
    let due = app.session.due_words(now);
    let scheduler = app.session.scheduler();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = due
                .iter()
                .map(|record| {
                    let word = app.catalog.find_word(&record.word_id);
                    serde_json::json!({
                        "wordId": record.word_id,
                        "en": word.map(|w| w.en.as_str()),
                        "cn": word.map(|w| w.cn.as_str()),
                        "stage": record.stage,
                        "lastReviewTime": record.last_review_time.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing to review right now.");
                let next = app
                    .session
                    .state()
                    .review_data
                    .records()
                    .filter_map(|r| scheduler.next_due_at(r))
                    .min();
                if let Some(next) = next {
                    println!("Next review in {}.", format_interval(next - now));
                }
                return Ok(());
            }

            for record in &due {
                let (en, cn) = app
                    .catalog
                    .find_word(&record.word_id)
                    .map(|w| (w.en.as_str(), w.cn.as_str()))
                    .unwrap_or((record.word_id.as_str(), ""));
                println!(
                    "  {:<14} {:<12} {:<8} stage {}/{}",
                    record.word_id,
                    en,
                    cn,
                    record.stage,
                    scheduler.graduated_stage()
                );
            }
            println!("\n{} word(s) due", due.len());
        }
    }

    Ok(())
}
