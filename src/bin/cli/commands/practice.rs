use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::Utc;

use wordgarden_lib::vocab::quiz::{Round, RoundKind};
use wordgarden_lib::Session;

use crate::app::App;
use crate::render::terminal::{self, Color};

/// Play a matching game or a quiz on random catalog words
pub fn run(app: &mut App, kind: RoundKind, use_color: bool) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut round = Round::random(kind, &app.catalog, &mut rng);

    match kind {
        RoundKind::MatchGame => println!(
            "Match {} words. You have {} lives.",
            round.len(),
            round.lives().unwrap_or(0)
        ),
        _ => println!("{} questions. Pick the English word.", round.len()),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let finished = play(&mut round, &mut app.session, &mut stdin.lock(), &mut stdout.lock(), use_color)?;
    if !finished {
        println!("\nRound stopped; no stars this time.");
        return Ok(());
    }

    let reward = round.reward();
    app.session.award_stars(reward);
    if round.is_lost() {
        println!("\nOut of lives! {} matched.", round.correct());
    } else {
        println!(
            "\nDone: {}/{} correct, +{} stars",
            round.correct(),
            round.len(),
            reward
        );
    }

    Ok(())
}

/// Ask every question of `round`, applying each answer to the session.
///
/// Review answers move the word's schedule; wrong answers in the game or
/// the quiz go to the wrong-word notebook. Returns false if input ran out
/// before the round was over.
pub fn play<R: BufRead, W: Write>(
    round: &mut Round,
    session: &mut Session,
    input: &mut R,
    out: &mut W,
    use_color: bool,
) -> Result<bool> {
    while let Some(question) = round.current().cloned() {
        writeln!(out)?;
        writeln!(out, "{}", terminal::paint(&question.word.cn, Color::BOLD, use_color))?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, option)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read answer")? == 0 {
            return Ok(false);
        }

        let Some(choice) = parse_choice(&line, &question.options) else {
            writeln!(out, "Type a number between 1 and {}.", question.options.len())?;
            continue;
        };

        let Some(answer) = round.answer(&choice) else {
            continue;
        };

        if round.kind() == RoundKind::Review {
            session.record_review(&answer.word_id, answer.correct, Utc::now());
        } else if !answer.correct {
            session.record_miss(&answer.word_id);
        }

        if answer.correct {
            writeln!(out, "{}", terminal::paint("Correct!", Color::GREEN, use_color))?;
        } else if let Some(lives) = round.lives() {
            writeln!(
                out,
                "{} {} li{} left.",
                terminal::paint("Not quite.", Color::RED, use_color),
                lives,
                if lives == 1 { "fe" } else { "ves" }
            )?;
        } else {
            writeln!(
                out,
                "{} It was {}.",
                terminal::paint("Not quite.", Color::RED, use_color),
                question.word.en
            )?;
        }
    }

    Ok(true)
}

/// Accept either an option number (1-based) or the word itself
fn parse_choice(input: &str, options: &[String]) -> Option<String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).cloned();
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .cloned()
}
