use std::path::Path;

use anyhow::Context;

/// The default location of the configuration, relative to the current
/// working directory.
pub const DEFAULT_PATH: &'static str = "agenda.json";

/// The configuration of one recurring meeting.
///
/// This is loaded once per invocation and never mutated. `frequency` and
/// `weekday` are deliberately kept as strings: they are validated when
/// occurrences are resolved, so that a bad value is reported along with the
/// month being computed.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub name: String,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub repo_subpath: Option<String>,
    pub agendas_folder: Option<String>,
    pub frequency: String,
    pub weekday: String,
    /// Monthly only. Negative values count from the end of the month.
    pub nth: Option<i8>,
    /// Weekly only. Which week of the month holds the primary meeting.
    pub primary_n: Option<i8>,
    pub timezone: String,
    /// A 24 hour range, e.g., `09:15-10:45`.
    pub time: String,
    pub video_conference_details: String,
    pub live_notes_url: Option<String>,
    #[serde(default)]
    pub links: Links,
    pub attendees_template: String,
    pub agenda_template_bottom: Option<String>,
    pub joining_a_meeting_file: Option<String>,
    /// A `p1=...&p2=...` query string for the world clock converter.
    pub date_and_time_locations: Option<String>,
    pub filename_fragment: Option<String>,
    pub secondary_meetings: Option<Vec<SecondaryMeetingSpec>>,
}

impl Config {
    /// Read and parse the JSON configuration at the given path.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let data = std::fs::read_to_string(path).with_context(|| {
            format!("failed to read configuration at `{}`", path.display())
        })?;
        let config: Config = serde_json::from_str(&data).with_context(|| {
            format!("failed to parse configuration at `{}`", path.display())
        })?;
        log::debug!(
            "loaded configuration for `{}` from `{}`",
            config.name,
            path.display(),
        );
        if !crate::datetime::is_known_time_zone(&config.timezone) {
            log::warn!(
                "time zone `{}` in `{}` is not in the time zone database",
                config.timezone,
                path.display(),
            );
        }
        Ok(config)
    }
}

/// An additional occurrence positioned relative to its own nth weekday.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryMeetingSpec {
    pub nth: i8,
    /// Days to add to this meeting's nth weekday, e.g., `-1` for the day
    /// before.
    pub day_offset: Option<i32>,
    pub time: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub filename_fragment: Option<String>,
}

/// An ordered mapping from link label to URL.
///
/// Unlike `serde_json::Map`, this preserves the order in which entries were
/// written. A `null` URL is kept as `None` so that rendering can report it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Links(Vec<(String, Option<String>)>);

impl Links {
    /// Insert the given entry. An existing label keeps its position but has
    /// its URL replaced.
    pub fn insert(&mut self, label: impl Into<String>, url: Option<String>) {
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = url,
            None => self.0.push((label, url)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(label, url)| (label.as_str(), url.as_deref()))
    }
}

impl<'de> serde::Deserialize<'de> for Links {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Links, D::Error> {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Links;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a map of link labels to URLs")
            }

            fn visit_map<A: de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Links, A::Error> {
                let mut links = Links::default();
                while let Some((label, url)) =
                    map.next_entry::<String, Option<String>>()?
                {
                    links.insert(label, url);
                }
                Ok(links)
            }
        }

        deserializer.deserialize_map(Visitor)
    }
}

/// The configuration written by `agenda init`.
pub const EXAMPLE: &'static str = r#"{
  "name": "Example Working Group",
  "repoUrl": "https://github.com/example/wg",
  "videoConferenceDetails": "https://zoom.us/j/000000000",
  "attendeesTemplate": "| Name | GitHub | Organization | Location |\n| :--- | :----- | :----------- | :------- |",
  "timezone": "US/Pacific",
  "frequency": "monthly",
  "weekday": "Th",
  "nth": 1,
  "time": "10:30-12:00"
}
"#;
