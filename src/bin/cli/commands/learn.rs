use anyhow::Result;
use chrono::Utc;

use wordgarden_lib::vocab::Mastery;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, key: &str, format: &OutputFormat) -> Result<()> {
    let word = app.find_word(key)?;
    let mastery = app.session.mark_mastered(&word.id, Utc::now());
    let stats = &app.session.state().stats;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "wordId": word.id,
                "firstMastery": mastery == Mastery::First,
                "wordsLearnedToday": stats.words_learned_today,
                "dailyGoal": stats.daily_goal,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match mastery {
            Mastery::First => println!(
                "Learned {} ({}). Today: {}/{}",
                word.en, word.cn, stats.words_learned_today, stats.daily_goal
            ),
            Mastery::Reset => println!(
                "{} was already learned; its review schedule starts over",
                word.en
            ),
        },
    }

    Ok(())
}
