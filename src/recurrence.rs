use jiff::{
    ToSpan,
    civil::{Date, Weekday},
};

use crate::{
    config::Config,
    datetime::TimeRange,
    error::ConfigError,
    meeting::{Meeting, fragment_from_name},
};

const EMDASH: &'static str = "—";

/// How often a meeting recurs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frequency {
    /// Once per month on the nth weekday, plus any secondary meetings.
    Monthly,
    /// Every week on the configured weekday, with one of them primary.
    Weekly,
}

impl Frequency {
    fn from_config(config: &Config) -> Result<Frequency, ConfigError> {
        match &*config.frequency {
            "monthly" => Ok(Frequency::Monthly),
            "weekly" => Ok(Frequency::Weekly),
            unk => Err(ConfigError::Frequency {
                name: config.name.clone(),
                frequency: unk.to_string(),
            }),
        }
    }
}

/// Parses a weekday code such as `M`, `Tu`, `W`, `Th`, `F`, `Sa` or `Su`.
///
/// This is case insensitive and tolerates longer spellings. Only the first
/// letter is significant, except for `S` and `T` days, which need two.
pub fn parse_weekday(code: &str) -> Option<Weekday> {
    use jiff::civil::Weekday::*;

    let lower = code.to_ascii_lowercase();
    let prefix = if lower.starts_with(['s', 't']) {
        lower.get(..2)
    } else {
        lower.get(..1)
    };
    let weekday = match prefix? {
        "su" => Sunday,
        "m" => Monday,
        "tu" => Tuesday,
        "w" => Wednesday,
        "th" => Thursday,
        "f" => Friday,
        "sa" => Saturday,
        _ => return None,
    };
    Some(weekday)
}

/// Returns the date of the `nth` `weekday` in the given month.
///
/// A positive `nth` counts from the start of the month (`1` is the first).
/// A negative `nth` counts from the end (`-1` is the last). When there is no
/// such weekday, including when `nth` is zero or the month is invalid, this
/// returns `None`.
///
/// All arithmetic is on civil dates, so time zones (and their transitions)
/// play no role here.
pub fn nth_weekday(
    year: i16,
    month: i8,
    weekday: Weekday,
    nth: i8,
) -> Option<Date> {
    let first = Date::new(year, month, 1).ok()?;
    let offset = weekday.since(first.weekday());
    let candidates: Vec<Date> = std::iter::successors(
        first.checked_add(offset.days()).ok(),
        |date| date.checked_add(1.week()).ok(),
    )
    .take_while(|date| date.month() == month)
    .collect();
    log::trace!(
        "candidate {weekday:?} dates in {year:04}-{month:02}: {candidates:?}",
    );

    let index = if nth > 0 {
        usize::try_from(nth - 1).ok()?
    } else {
        candidates.len().checked_sub(usize::from(nth.unsigned_abs()))?
    };
    candidates.get(index).copied()
}

/// Returns every occurrence of the configured meeting in the given month, in
/// the order they should be generated.
///
/// For monthly meetings, the primary meeting comes first, followed by each
/// secondary meeting in configuration order. For weekly meetings, the
/// occurrences are in date order and exactly one of them is primary.
pub fn resolve(
    config: &Config,
    year: i16,
    month: i8,
) -> Result<Vec<Meeting>, ConfigError> {
    let first = Date::new(year, month, 1).map_err(|_| ConfigError::Month {
        name: config.name.clone(),
        year,
        month,
    })?;
    let weekday =
        parse_weekday(&config.weekday).ok_or_else(|| ConfigError::Weekday {
            name: config.name.clone(),
            weekday: config.weekday.clone(),
        })?;
    let resolver = Resolver {
        config,
        first,
        weekday,
        base_name: format!(
            "{} {EMDASH} {} {year}",
            config.name,
            first.strftime("%B"),
        ),
    };
    let meetings = match Frequency::from_config(config)? {
        Frequency::Monthly => resolver.monthly()?,
        Frequency::Weekly => resolver.weekly()?,
    };
    for meeting in meetings.iter() {
        if TimeRange::parse(&meeting.time).is_none() {
            return Err(ConfigError::TimeRange {
                name: meeting.name.clone(),
                time: meeting.time.clone(),
            });
        }
        log::debug!(
            "resolved `{}` on {} at {} (primary: {})",
            meeting.name,
            meeting.date,
            meeting.time,
            meeting.primary,
        );
    }
    Ok(meetings)
}

/// Returns the secondary meetings of the month preceding the given primary
/// meeting.
///
/// This is used to cross reference what happened since the last primary
/// meeting. (It assumes the primary meeting is the first one in its month.)
pub fn prior_secondaries(
    config: &Config,
    primary: &Meeting,
) -> Result<Vec<Meeting>, ConfigError> {
    let previous = primary
        .date
        .first_of_month()
        .checked_sub(1.month())
        .map_err(|_| ConfigError::Month {
            name: primary.name.clone(),
            year: primary.year(),
            month: primary.month(),
        })?;
    let meetings = resolve(config, previous.year(), previous.month())?;
    Ok(meetings.into_iter().filter(|m| !m.primary).collect())
}

struct Resolver<'c> {
    config: &'c Config,
    first: Date,
    weekday: Weekday,
    /// e.g., `GraphQL WG — January 2024`.
    base_name: String,
}

impl<'c> Resolver<'c> {
    fn monthly(&self) -> Result<Vec<Meeting>, ConfigError> {
        let config = self.config;
        let nth = config.nth.unwrap_or(1);
        let date = self.nth(nth, &config.name)?;
        let name = if config.secondary_meetings.is_some() {
            format!("{} (Primary)", self.base_name)
        } else {
            self.base_name.clone()
        };
        let mut meetings = vec![Meeting {
            primary: true,
            description: config.description.clone(),
            timezone: config.timezone.clone(),
            date,
            time: config.time.clone(),
            filename_fragment: config
                .filename_fragment
                .clone()
                .unwrap_or_else(|| fragment_from_name(&name)),
            name,
        }];

        let specs = config.secondary_meetings.as_deref().unwrap_or(&[]);
        for (i, spec) in specs.iter().enumerate() {
            let label = match spec.name {
                Some(ref label) => label.clone(),
                None => format!("Secondary {}", i + 1),
            };
            let name = format!("{} ({label})", self.base_name);
            let base = self.nth(spec.nth, &name)?;
            let offset = spec.day_offset.unwrap_or(0);
            let date = base
                .checked_add(offset.days())
                .ok()
                .filter(|date| date.month() == self.first.month())
                .ok_or_else(|| ConfigError::DayOffset {
                    name: name.clone(),
                    year: self.first.year(),
                    month: self.first.month(),
                    day: i32::from(base.day()) + offset,
                    offset,
                })?;
            meetings.push(Meeting {
                primary: false,
                description: spec
                    .description
                    .clone()
                    .or_else(|| config.description.clone()),
                timezone: config.timezone.clone(),
                date,
                time: spec.time.clone(),
                filename_fragment: spec
                    .filename_fragment
                    .clone()
                    .or_else(|| config.filename_fragment.clone())
                    .unwrap_or_else(|| fragment_from_name(&name)),
                name,
            });
        }
        Ok(meetings)
    }

    fn weekly(&self) -> Result<Vec<Meeting>, ConfigError> {
        let config = self.config;
        if config.secondary_meetings.is_some() {
            return Err(ConfigError::WeeklySecondary {
                name: config.name.clone(),
            });
        }
        // Looking this up first guarantees that exactly one of the weeks
        // below is primary.
        let primary_date =
            self.nth(config.primary_n.unwrap_or(1), &config.name)?;

        let mut meetings = vec![];
        for n in 1..=5 {
            let Some(date) = self.nth_opt(n) else { break };
            let primary = date == primary_date;
            let (label, fragment) = if primary {
                ("Primary".to_string(), "primary".to_string())
            } else {
                (format!("Week {n}"), format!("week-{n}"))
            };
            meetings.push(Meeting {
                primary,
                name: format!("{} ({label})", self.base_name),
                description: config.description.clone(),
                timezone: config.timezone.clone(),
                date,
                time: config.time.clone(),
                filename_fragment: config
                    .filename_fragment
                    .clone()
                    .unwrap_or(fragment),
            });
        }
        Ok(meetings)
    }

    fn nth_opt(&self, nth: i8) -> Option<Date> {
        nth_weekday(self.first.year(), self.first.month(), self.weekday, nth)
    }

    fn nth(&self, nth: i8, name: &str) -> Result<Date, ConfigError> {
        self.nth_opt(nth).ok_or_else(|| ConfigError::NoSuchWeekday {
            name: name.to_string(),
            year: self.first.year(),
            month: self.first.month(),
            nth,
            weekday: self.weekday,
        })
    }
}
