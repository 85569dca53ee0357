use std::sync::LazyLock;

use {
    jiff::{
        Zoned,
        civil::Time,
        tz::{self, TimeZone},
    },
    regex::Regex,
};

use crate::{config::Config, error::ConfigError, meeting::Meeting};

/// The world clock converter that deep links point to.
const CONVERTER_URL: &'static str =
    "https://www.timeanddate.com/worldclock/converter.html";

/// The locations shown by the converter when none are configured.
const DEFAULT_LOCATIONS: &'static str =
    "p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240";

const RANGE_SEPARATOR: &'static str = " – ";

/// A same-day range of wall clock times, e.g., `09:00-10:30`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeRange {
    pub start: Time,
    pub end: Time,
}

impl TimeRange {
    /// Parses a 24 hour `HH:MM-HH:MM` range.
    ///
    /// This returns `None` when the string isn't of that form or when either
    /// side isn't a valid time of day.
    pub fn parse(range: &str) -> Option<TimeRange> {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^([0-9]{1,2}):([0-9]{2})-([0-9]{1,2}):([0-9]{2})$")
                .unwrap()
        });

        let caps = RE.captures(range)?;
        let int = |i: usize| caps[i].parse::<i8>().ok();
        let start = Time::new(int(1)?, int(2)?, 0, 0).ok()?;
        let end = Time::new(int(3)?, int(4)?, 0, 0).ok()?;
        Some(TimeRange { start, end })
    }
}

/// The rendered date and time of a meeting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateTimeLine {
    /// e.g., `January 4, 2024, 9:00 – 10:00 AM PST`.
    pub human_range: String,
    /// A link to the world clock converter at the start of the meeting.
    pub deep_link: String,
}

/// Renders the date and time range of the given meeting in its time zone.
///
/// The end time is assumed to be on the same day as the start time.
pub fn render(
    config: &Config,
    meeting: &Meeting,
) -> Result<DateTimeLine, ConfigError> {
    let range =
        TimeRange::parse(&meeting.time).ok_or_else(|| ConfigError::TimeRange {
            name: meeting.name.clone(),
            time: meeting.time.clone(),
        })?;
    let timezone = if meeting.timezone.is_empty() {
        &config.timezone
    } else {
        &meeting.timezone
    };
    let zone_err = |source: jiff::Error| ConfigError::TimeZone {
        name: meeting.name.clone(),
        timezone: timezone.clone(),
        source,
    };
    let tz = TimeZone::get(timezone).map_err(zone_err)?;
    let start = meeting
        .date
        .to_datetime(range.start)
        .to_zoned(tz.clone())
        .map_err(zone_err)?;
    let end =
        meeting.date.to_datetime(range.end).to_zoned(tz).map_err(zone_err)?;

    let iso = start
        .with_time_zone(TimeZone::UTC)
        .strftime("%Y%m%dT%H%M%S")
        .to_string();
    let locations =
        config.date_and_time_locations.as_deref().unwrap_or(DEFAULT_LOCATIONS);
    Ok(DateTimeLine {
        human_range: human_range(&start, &end),
        deep_link: format!("{CONVERTER_URL}?iso={iso}&{locations}"),
    })
}

/// Formats a same-day range in US English, collapsing shared fields.
///
/// The date is written once. The meridiem and zone abbreviation are written
/// once when both ends share them, e.g., `9:00 – 10:00 AM PST`, but
/// `11:00 AM – 1:00 PM PST`. On a DST transition day, both ends get their
/// own abbreviation.
fn human_range(start: &Zoned, end: &Zoned) -> String {
    let date = start.strftime("%B %-d, %Y");
    let (start_zone, end_zone) =
        (start.strftime("%Z").to_string(), end.strftime("%Z").to_string());
    if start_zone != end_zone {
        return format!(
            "{date}, {}{RANGE_SEPARATOR}{}",
            start.strftime("%-I:%M %p %Z"),
            end.strftime("%-I:%M %p %Z"),
        );
    }
    let same_meridiem = (start.hour() < 12) == (end.hour() < 12);
    let start_fmt = if same_meridiem { "%-I:%M" } else { "%-I:%M %p" };
    format!(
        "{date}, {}{RANGE_SEPARATOR}{} {start_zone}",
        start.strftime(start_fmt),
        end.strftime("%-I:%M %p"),
    )
}

/// Returns true when the given string names a time zone Jiff knows about.
pub fn is_known_time_zone(name: &str) -> bool {
    tz::db().get(name).is_ok()
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use crate::config::tests::monthly;

    use super::*;

    fn meeting(day: (i16, i8, i8), time: &str, timezone: &str) -> Meeting {
        Meeting {
            primary: true,
            name: "GraphQL WG — Test".to_string(),
            description: None,
            timezone: timezone.to_string(),
            date: date(day.0, day.1, day.2),
            time: time.to_string(),
            filename_fragment: "wg".to_string(),
        }
    }

    fn line(day: (i16, i8, i8), time: &str, timezone: &str) -> String {
        let config = monthly(serde_json::json!({"timezone": timezone}));
        let line = render(&config, &meeting(day, time, timezone)).unwrap();
        format!("{}\n{}", line.human_range, line.deep_link)
    }

    #[test]
    fn time_ranges() {
        assert_eq!(
            TimeRange::parse("09:00-10:30"),
            Some(TimeRange { start: time(9, 0, 0, 0), end: time(10, 30, 0, 0) }),
        );
        assert_eq!(
            TimeRange::parse("9:05-17:45"),
            Some(TimeRange { start: time(9, 5, 0, 0), end: time(17, 45, 0, 0) }),
        );
        assert_eq!(TimeRange::parse("24:00-25:00"), None);
        assert_eq!(TimeRange::parse("09:60-10:00"), None);
        assert_eq!(TimeRange::parse("9-10"), None);
        assert_eq!(TimeRange::parse("09:00 - 10:00"), None);
        assert_eq!(TimeRange::parse("109:00-10:00"), None);
        assert_eq!(TimeRange::parse(""), None);
    }

    #[test]
    fn morning_in_pacific() {
        insta::assert_snapshot!(
            line((2024, 1, 4), "09:00-10:00", "US/Pacific"),
            @r"
        January 4, 2024, 9:00 – 10:00 AM PST
        https://www.timeanddate.com/worldclock/converter.html?iso=20240104T170000&p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240
        ",
        );
    }

    #[test]
    fn crossing_noon() {
        insta::assert_snapshot!(
            line((2024, 1, 4), "11:00-13:30", "US/Pacific"),
            @r"
        January 4, 2024, 11:00 AM – 1:30 PM PST
        https://www.timeanddate.com/worldclock/converter.html?iso=20240104T190000&p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240
        ",
        );
    }

    #[test]
    fn daylight_saving_time() {
        insta::assert_snapshot!(
            line((2024, 3, 14), "09:00-10:00", "US/Pacific"),
            @r"
        March 14, 2024, 9:00 – 10:00 AM PDT
        https://www.timeanddate.com/worldclock/converter.html?iso=20240314T160000&p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240
        ",
        );
        insta::assert_snapshot!(
            line((2024, 3, 10), "01:00-03:30", "US/Pacific"),
            @r"
        March 10, 2024, 1:00 AM PST – 3:30 AM PDT
        https://www.timeanddate.com/worldclock/converter.html?iso=20240310T090000&p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240
        ",
        );
    }

    #[test]
    fn afternoon_in_utc() {
        insta::assert_snapshot!(
            line((2024, 7, 1), "16:00-17:00", "UTC"),
            @r"
        July 1, 2024, 4:00 – 5:00 PM UTC
        https://www.timeanddate.com/worldclock/converter.html?iso=20240701T160000&p1=224&p2=179&p3=136&p4=268&p5=367&p6=438&p7=248&p8=240
        ",
        );
    }

    #[test]
    fn configured_locations() {
        let config = monthly(serde_json::json!({
            "timezone": "US/Eastern",
            "dateAndTimeLocations": "p1=1440&p2=37",
        }));
        let m = meeting((2024, 11, 21), "12:00-13:00", "US/Eastern");
        let line = render(&config, &m).unwrap();
        assert_eq!(line.human_range, "November 21, 2024, 12:00 – 1:00 PM EST");
        assert_eq!(
            line.deep_link,
            "https://www.timeanddate.com/worldclock/converter.html\
             ?iso=20241121T170000&p1=1440&p2=37",
        );
    }

    #[test]
    fn falls_back_to_config_time_zone() {
        let config = monthly(serde_json::json!({"timezone": "US/Eastern"}));
        let m = meeting((2024, 1, 4), "09:00-10:00", "");
        let line = render(&config, &m).unwrap();
        assert_eq!(line.human_range, "January 4, 2024, 9:00 – 10:00 AM EST");
    }

    #[test]
    fn errors() {
        let config = monthly(serde_json::json!({}));
        let m = meeting((2024, 1, 4), "25:00-26:00", "US/Pacific");
        insta::assert_snapshot!(
            render(&config, &m).unwrap_err(),
            @"invalid time range `25:00-26:00` for `GraphQL WG — Test`; should be of format `HH:MM-HH:MM` in 24 hour clock",
        );

        let m = meeting((2024, 1, 4), "09:00-10:00", "Mars/Olympus_Mons");
        let err = render(&config, &m).unwrap_err();
        assert!(
            matches!(err, ConfigError::TimeZone { ref timezone, .. } if timezone == "Mars/Olympus_Mons"),
            "{err}",
        );
        assert!(!is_known_time_zone("Mars/Olympus_Mons"));
        assert!(is_known_time_zone("US/Pacific"));
    }
}
