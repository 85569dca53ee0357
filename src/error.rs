use jiff::civil::Weekday;

/// An error that occurs while turning a configuration into occurrences.
///
/// These are always fatal to the occurrence (or the whole month) being
/// computed. Resolution is deterministic, so there is never any point in
/// retrying.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "unrecognized frequency `{frequency}` for `{name}` \
         (must be `monthly` or `weekly`)"
    )]
    Frequency { name: String, frequency: String },
    #[error(
        "unrecognized weekday `{weekday}` for `{name}` \
         (must be one of M, Tu, W, Th, F, Sa or Su)"
    )]
    Weekday { name: String, weekday: String },
    #[error(
        "invalid time range `{time}` for `{name}`; should be of format \
         `HH:MM-HH:MM` in 24 hour clock"
    )]
    TimeRange { name: String, time: String },
    #[error("there is no nth={nth} {weekday:?} in {year:04}-{month:02} for `{name}`")]
    NoSuchWeekday { name: String, year: i16, month: i8, nth: i8, weekday: Weekday },
    #[error("weekly meeting `{name}` cannot have secondary meetings")]
    WeeklySecondary { name: String },
    #[error(
        "secondary meeting `{name}` would land on day {day} \
         (day offset {offset}), which is outside of {year:04}-{month:02}"
    )]
    DayOffset { name: String, year: i16, month: i8, day: i32, offset: i32 },
    #[error("invalid month {year:04}-{month:02} for `{name}`")]
    Month { name: String, year: i16, month: i8 },
    #[error("unknown time zone `{timezone}` for `{name}`")]
    TimeZone {
        name: String,
        timezone: String,
        #[source]
        source: jiff::Error,
    },
}

/// An error that occurs when a required value is absent while rendering.
///
/// `placeholder` names the value that was missing. For example,
/// `repoUrl` or `links.calendar`.
#[derive(Debug, thiserror::Error)]
#[error("missing value for `{placeholder}` while rendering `{meeting}`")]
pub struct TemplateError {
    pub placeholder: String,
    pub meeting: String,
}

/// Any error that can occur while rendering an occurrence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}
