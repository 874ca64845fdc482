//! Laser command - trace a player's laser on a starting layout

use anyhow::{ensure, Context, Result};
use clap::Args;

use khet_core::{GameState, LaserOutcome, LaserResult, Player, Preset};

use crate::render::{piece_token, render_with_laser};

#[derive(Args)]
pub struct LaserArgs {
    /// Player whose laser to fire (silver or red)
    #[arg(long, default_value = "silver")]
    pub player: Player,

    /// Starting layout
    #[arg(long, default_value = "classic")]
    pub preset: Preset,

    /// Output the trace as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LaserArgs) -> Result<()> {
    let state = GameState::new_game(args.preset, Player::Silver);
    ensure!(state.piece_count() > 0, "preset '{}' places no pieces", args.preset);

    let laser = state.trace_laser(args.player);

    tracing::debug!("{} laser: {} segments, {:?}", args.player, laser.segments.len(), laser.outcome);

    if args.json {
        let json = serde_json::to_string_pretty(&laser).context("Failed to serialize laser trace")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", render_with_laser(&state, &laser));
    for line in trace_lines(&laser) {
        println!("{}", line);
    }
    Ok(())
}

/// Human-readable trace, one line per segment plus the outcome
fn trace_lines(laser: &LaserResult) -> Vec<String> {
    let mut lines: Vec<String> = laser
        .segments
        .iter()
        .map(|s| match s.end {
            Some(end) => format!("  {} -> {} ({})", s.start, end, s.direction),
            None => format!("  {} -> off board ({})", s.start, s.direction),
        })
        .collect();

    lines.push(match laser.outcome {
        LaserOutcome::NoEmitter => format!("{} has no Sphinx", laser.player),
        LaserOutcome::Exited => format!("Beam left the board after {} reflections", laser.reflections()),
        LaserOutcome::Absorbed { at, piece } => format!("Absorbed by {} at {}", piece_token(&piece).trim_end(), at),
        LaserOutcome::Destroyed { at, piece } => format!("Destroyed {} at {}", piece_token(&piece).trim_end(), at),
        LaserOutcome::Looped => "Beam looped".to_string(),
    });

    lines
}
