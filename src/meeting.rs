use std::sync::LazyLock;

use {jiff::civil::Date, regex::Regex};

/// One concrete occurrence of a recurring meeting.
///
/// Meetings are computed fresh for every invocation and have no identity
/// beyond their fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Meeting {
    pub primary: bool,
    pub name: String,
    pub description: Option<String>,
    /// An IANA time zone identifier.
    pub timezone: String,
    /// The civil date of this occurrence. Its weekday matches the
    /// configured weekday, unless a secondary meeting day offset moved it.
    pub date: Date,
    /// A 24 hour range, e.g., `09:00-10:00`.
    pub time: String,
    pub filename_fragment: String,
}

impl Meeting {
    pub fn year(&self) -> i16 {
        self.date.year()
    }

    pub fn month(&self) -> i8 {
        self.date.month()
    }

    pub fn day(&self) -> i8 {
        self.date.day()
    }
}

/// Turns a meeting name into something suitable for a file name.
///
/// e.g., `GraphQL WG — May 2024 (APAC)` becomes `graphql-wg-may-2024-apac`.
pub fn fragment_from_name(name: &str) -> String {
    static NON_ALNUM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

    let lower = name.to_lowercase();
    NON_ALNUM.replace_all(&lower, "-").trim_matches('-').to_string()
}
