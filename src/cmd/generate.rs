use std::{io::Write, path::Path};

use anyhow::Context;

use crate::{
    args::{self, flags, positional},
    config::Config,
    paths::{PathOf, RepoLayout},
    recurrence, render,
    style::Theme,
};

const USAGE: &'static str = r#"
Write the agenda documents for every occurrence of a meeting in a month.

One Markdown document is written per occurrence, at a path derived from the
repository layout in the configuration, e.g.,
`agendas/2024/01-Jan/04-wg-primary.md`. Missing directories are created and
existing documents are overwritten. The path of each document is printed as it
is written.

%snip-start%
The year must be within 3 years before and 9 years after the current year.
If the configuration names a `joiningAMeetingFile`, then the text following its
`## How to join` heading is copied into a comment at the top of every document.

Generation stops at the first error. Documents written before the error are
left in place.
%snip-end%

USAGE:
    agenda gen <year> <month>

TIP:
    use -h for short docs and --help for long docs

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

/// The heading after which the how to join text begins.
const HOW_TO_JOIN: &'static str = "\n## How to join\n\n";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config_path = flags::ConfigPath::default();
    let mut dry_run = flags::DryRun::default();
    let mut when = positional::YearMonth::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut config_path, &mut dry_run, &mut when],
    )?;
    let (year, month) = when.get()?;
    check_window(year)?;

    let config = Config::load(config_path.get())?;
    let how_to_join = read_how_to_join(&config)?;
    let layout = RepoLayout::new(&config);
    let meetings = recurrence::resolve(&config, year, month)?;

    let mut wtr = std::io::stdout().lock();
    for meeting in meetings.iter() {
        let priors = if meeting.primary {
            recurrence::prior_secondaries(&config, meeting)?
        } else {
            vec![]
        };
        let contents = render::render(
            &config,
            meeting,
            &priors,
            how_to_join.as_deref(),
            &layout,
        )?;
        let path = layout.path_of(meeting);
        let shown = Theme::stdout().path(&path.relative);
        if dry_run.enabled() {
            writeln!(wtr, "would write {shown}")?;
            continue;
        }
        write(Path::new(&path.relative), &contents)?;
        log::info!("wrote `{}` for `{}`", path.relative, meeting.name);
        writeln!(wtr, "wrote {shown}")?;
    }
    Ok(())
}

/// Rejects years too far from the current one to be anything but a typo.
fn check_window(year: i16) -> anyhow::Result<()> {
    let current = crate::NOW.year();
    let (min, max) = (current - 3, current + 9);
    anyhow::ensure!(
        (min..=max).contains(&year),
        "invalid <year> `{year}`, must be between {min} and {max}",
    );
    Ok(())
}

fn read_how_to_join(config: &Config) -> anyhow::Result<Option<String>> {
    let Some(ref file) = config.joining_a_meeting_file else {
        return Ok(None);
    };
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read `{file}`"))?;
    match extract_how_to_join(&data) {
        Some(text) => Ok(Some(text.to_string())),
        None => {
            log::warn!(
                "`{file}` has no `## How to join` section, so agendas \
                 will not include joining instructions",
            );
            Ok(None)
        }
    }
}

/// Returns the text between the first `## How to join` heading and the next
/// one, if any.
fn extract_how_to_join(data: &str) -> Option<&str> {
    data.split(HOW_TO_JOIN).nth(1)
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| {
            format!("failed to create directory `{}`", dir.display())
        })?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write `{}`", path.display()))
}
