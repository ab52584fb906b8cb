use anyhow::Result;

use wordgarden_lib::progress::rewards;

use crate::app::App;
use crate::{OutputFormat, RewardKind};

pub fn run(app: &mut App, kind: RewardKind, count: u32, format: &OutputFormat) -> Result<()> {
    let amount = match kind {
        RewardKind::Review => rewards::review_session_reward(count as usize),
        RewardKind::Game => rewards::match_game_reward(count),
        RewardKind::Quiz => rewards::quiz_reward(count),
    };

    app.session.award_stars(amount);
    let stars = app.session.state().stats.stars;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "awarded": amount,
                "stars": stars,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("+{} stars ({} total)", amount, stars),
    }

    Ok(())
}
