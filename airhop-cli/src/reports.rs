use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use airhop_game::{FlightReport, Player};

/// What a command produced, ready to be rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Seeded(Seeded),
    Status(PlayerStatus),
    Flight(FlightReport),
    Visited(VisitCheck),
}

#[derive(Debug, Clone, Serialize)]
pub struct Seeded {
    pub airports: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatus {
    pub name: String,
    pub location: String,
    pub airport_name: String,
    pub points: i64,
    pub time: i64,
    pub speed: i64,
    pub range: f64,
    pub returning: bool,
}

impl PlayerStatus {
    pub fn new(player: Player, airport_name: String) -> Self {
        Self {
            name: player.name,
            location: player.location,
            airport_name,
            points: player.points,
            time: player.time,
            speed: player.speed,
            range: player.range,
            returning: player.returning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitCheck {
    pub player: String,
    pub airport: String,
    pub visited: bool,
}

#[derive(Serialize)]
struct Envelope<'a> {
    generated_at: String,
    result: &'a Outcome,
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, outcome: &Outcome) -> Result<()> {
    let envelope = Envelope {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        result: outcome,
    };
    serde_json::to_writer_pretty(&mut *writer, &envelope)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_console_report<W: Write + ?Sized>(writer: &mut W, outcome: &Outcome) -> Result<()> {
    writeln!(writer, "{}", "✈️  Airhop".bright_cyan().bold())?;
    writeln!(writer, "{}", "==========".cyan())?;

    match outcome {
        Outcome::Seeded(seeded) => {
            writeln!(
                writer,
                "Seeded {} airports",
                seeded.airports.to_string().green()
            )?;
        }
        Outcome::Status(status) => {
            let greeting = if status.returning {
                "Welcome back"
            } else {
                "New pilot"
            };
            writeln!(writer, "{greeting}, {}", status.name.bold())?;
            writeln!(
                writer,
                "   Location: {} ({})",
                status.location.bold(),
                status.airport_name
            )?;
            writeln!(writer, "   Points:   {}", status.points)?;
            writeln!(writer, "   Time:     {} min", status.time)?;
            writeln!(writer, "   Speed:    {}", status.speed)?;
            writeln!(writer, "   Range:    {}", format_range(status.range))?;
        }
        Outcome::Flight(flight) => {
            writeln!(
                writer,
                "{} flew {} → {}",
                flight.player.bold(),
                flight.from,
                flight.to.bold()
            )?;
            writeln!(writer, "   Distance: {:.1}", flight.distance)?;
            writeln!(writer, "   Flight:   {} min", flight.minutes)?;
            if flight.newly_visited {
                writeln!(writer, "   {}", "New airport!".green())?;
            } else {
                writeln!(writer, "   {}", "Already visited".yellow())?;
            }
            writeln!(writer, "   Points:   {}", flight.points)?;
            writeln!(writer, "   Time:     {} min left", flight.time_left)?;
            writeln!(writer, "   Range:    {}", format_range(flight.range_left))?;
        }
        Outcome::Visited(check) => {
            let status = if check.visited {
                "✅ visited".green()
            } else {
                "❌ not visited".red()
            };
            writeln!(writer, "{} at {}: {status}", check.player.bold(), check.airport)?;
        }
    }
    Ok(())
}

fn format_range(range: f64) -> String {
    let text = format!("{range:.1}");
    if range < 0.0 {
        format!("{} (out of range)", text.red())
    } else {
        text
    }
}
