//! The `grid` command.

use weekgrid_core::{GridConfig, GridLayout, GridLayoutEngine, WeekWindow};
use weekgrid_server::WeekData;

use crate::error::ClientResult;

/// Lays `week` out on the grid of the week it starts in.
pub fn layout(week: &WeekData, config: GridConfig) -> GridLayout {
    let window = WeekWindow::containing(week.start_date);
    GridLayoutEngine::new(config).layout(&week.events, &window)
}

/// Serializes the grid layout.
pub fn render(week: &WeekData, config: GridConfig) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(&layout(week, config))?)
}

/// Prints the grid layout to stdout.
pub fn print(week: &WeekData, config: GridConfig) -> ClientResult<()> {
    println!("{}", render(week, config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};
    use weekgrid_core::{CanonicalEvent, EventTime};

    fn at(day: u32, hour: u32, minute: u32) -> EventTime {
        EventTime::from_local(
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        )
    }

    #[test]
    fn places_events_in_their_day_columns() {
        let start = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let offsite = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let week = WeekData::new(
            vec![
                CanonicalEvent::new("standup", Some("Standup"), at(3, 9, 0), at(3, 9, 30)),
                CanonicalEvent::new(
                    "offsite",
                    Some("Offsite"),
                    EventTime::from_date(offsite),
                    EventTime::from_date(offsite),
                ),
            ],
            start,
        );

        let grid = layout(&week, GridConfig::default());
        assert_eq!(grid.event_count(), 2);
        assert_eq!(grid.days[2].timed.len(), 1);
        assert_eq!(grid.days[3].all_day.len(), 1);
    }

    #[test]
    fn empty_week_has_seven_empty_days() {
        let week = WeekData::empty(Local.with_ymd_and_hms(2024, 1, 3, 15, 0, 0).unwrap());
        let grid = layout(&week, GridConfig::default());
        assert_eq!(grid.days.len(), 7);
        assert!(grid.days.iter().all(|day| day.is_empty()));
        assert!(render(&week, GridConfig::default()).is_ok());
    }
}
