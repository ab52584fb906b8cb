use std::io;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use wordgarden_lib::progress::rewards;
use wordgarden_lib::vocab::catalog::Catalog;
use wordgarden_lib::vocab::quiz::{Round, RoundKind};
use wordgarden_lib::vocab::{ReviewRecord, VocabularyEntry};

use crate::app::App;
use crate::commands::practice;
use crate::OutputFormat;

/// Walk through every due word as a multiple-choice question read from stdin
pub fn run_interactive(app: &mut App, use_color: bool) -> Result<()> {
    let due = app.session.due_words(Utc::now());
    let (words, orphaned) = due_entries(&due, &app.catalog);

    if !orphaned.is_empty() {
        log::warn!("review: due words missing from the catalog: {}", orphaned.join(", "));
        println!(
            "Skipping {} word(s) not in the current packs.",
            orphaned.len()
        );
    }

    if words.is_empty() {
        println!("Nothing to review right now.");
        return Ok(());
    }

    let mut rng = rand::thread_rng();
    let mut round = Round::from_words(RoundKind::Review, &words, &app.catalog, &mut rng);

    println!("{} word(s) to review. Pick the English word.", round.len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let finished = practice::play(
        &mut round,
        &mut app.session,
        &mut stdin.lock(),
        &mut stdout.lock(),
        use_color,
    )?;
    if !finished {
        println!("\nReview stopped; answered words are saved.");
        return Ok(());
    }

    // The session reward counts every due word, including ones the packs no longer have
    let reward = rewards::review_session_reward(due.len());
    app.session.award_stars(reward);
    println!(
        "\nReview complete: {}/{} correct, +{} stars",
        round.correct(),
        round.len(),
        reward
    );

    Ok(())
}

/// Split due records into catalog entries and ids the catalog does not know
fn due_entries(due: &[ReviewRecord], catalog: &Catalog) -> (Vec<VocabularyEntry>, Vec<String>) {
    let mut words = Vec::new();
    let mut orphaned = Vec::new();
    for record in due {
        match catalog.find_word(&record.word_id) {
            Some(word) => words.push(word.clone()),
            None => orphaned.push(record.word_id.clone()),
        }
    }
    (words, orphaned)
}

/// Record a single review outcome without the interactive flow
pub fn run_answer(app: &mut App, key: &str, correct: bool, format: &OutputFormat) -> Result<()> {
    let word = app.find_word(key)?;
    if !app.session.state().review_data.contains(&word.id) {
        bail!("{} has not been learned yet; run `learn {}` first", word.en, word.id);
    }

    app.session.record_review(&word.id, correct, Utc::now());

    let record = app
        .session
        .state()
        .review_data
        .get(&word.id)
        .context("Review record disappeared")?;
    let graduated = app.session.scheduler().is_graduated(record);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "wordId": word.id,
                "correct": correct,
                "stage": record.stage,
                "graduated": graduated,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if graduated {
                println!("{} graduated; no more reviews needed", word.en);
            } else {
                println!(
                    "{} is now at stage {}/{}",
                    word.en,
                    record.stage,
                    app.session.scheduler().graduated_stage()
                );
            }
        }
    }

    Ok(())
}
