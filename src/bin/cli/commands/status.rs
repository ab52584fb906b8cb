use anyhow::Result;
use chrono::Utc;

use wordgarden_lib::progress::tracker;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let state = app.session.state();
    let stats = &state.stats;
    let due = app.session.due_words(Utc::now()).len();
    let progress = app.session.daily_progress();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "stars": stats.stars,
                "streak": stats.streak,
                "wordsMastered": stats.words_mastered,
                "wordsLearnedToday": stats.words_learned_today,
                "dailyGoal": stats.daily_goal,
                "dailyProgress": progress,
                "goalReached": tracker::goal_reached(stats),
                "currentCategory": state.current_category,
                "dueCount": due,
                "wrongWordCount": state.wrong_words.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::paint("WordGarden", Color::BOLD, use_color));
            println!("  Stars:     {}", stats.stars);
            println!("  Streak:    {} day(s)", stats.streak);
            println!("  Mastered:  {} word(s)", stats.words_mastered);
            println!(
                "  Today:     {} {}/{}{}",
                terminal::progress_bar(progress, 20),
                stats.words_learned_today,
                stats.daily_goal,
                if tracker::goal_reached(stats) {
                    terminal::paint("  goal reached!", Color::GREEN, use_color)
                } else {
                    String::new()
                }
            );
            println!("  Pack:      {}", state.current_category);

            let due_line = format!("{} word(s) due for review", due);
            if due > 0 {
                println!("  {}", terminal::paint(&due_line, Color::YELLOW, use_color));
            } else {
                println!("  {}", terminal::paint(&due_line, Color::DIM, use_color));
            }
        }
    }

    Ok(())
}
