//! The `week` command.

use weekgrid_server::WeekData;

use crate::error::ClientResult;

/// Serializes the week payload.
pub fn render(week: &WeekData) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(week)?)
}

/// Prints the week payload to stdout.
pub fn print(week: &WeekData) -> ClientResult<()> {
    println!("{}", render(week)?);
    Ok(())
}
