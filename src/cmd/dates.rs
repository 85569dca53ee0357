use std::io::Write;

use jiff::{ToSpan, civil::Date};

use crate::{
    args::{self, Usage, flags, positional},
    config::Config,
    recurrence,
};

const USAGE: &'static str = r#"
Print the occurrences of a meeting in a month.

Each occurrence is printed on its own line with its date, its time range in the
meeting's time zone, whether it is the primary meeting and its name. For
example:

    2024-01-04 09:00-10:00 primary GraphQL WG — January 2024

Nothing is written to disk. This is useful for checking a configuration before
running `agenda gen`.

USAGE:
    agenda dates <year> <month>

TIP:
    use -h for short docs and --help for long docs

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config_path = flags::ConfigPath::default();
    let mut months = Months { count: 1 };
    let mut when = positional::YearMonth::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut config_path, &mut months, &mut when],
    )?;
    let (year, month) = when.get()?;
    let config = Config::load(config_path.get())?;

    let mut wtr = std::io::stdout().lock();
    let mut first = Date::new(year, month, 1)?;
    for _ in 0..months.count {
        let meetings =
            recurrence::resolve(&config, first.year(), first.month())?;
        for m in meetings.iter() {
            let kind = if m.primary { "primary" } else { "secondary" };
            writeln!(wtr, "{} {} {kind} {}", m.date, m.time, m.name)?;
        }
        first = first.checked_add(1.month())?;
    }
    Ok(())
}

#[derive(Debug)]
struct Months {
    count: u8,
}

impl args::Configurable for Months {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Short('n') | lexopt::Arg::Long("months") => {
                let count: u8 = args::parse(p, "-n/--months")?;
                anyhow::ensure!(
                    count >= 1,
                    "-n/--months: must be at least 1",
                );
                self.count = count;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const MONTHS: Usage = Usage::flag(
            "-n, --months <count>",
            "Print this many consecutive months.",
            r#"
Print this many consecutive months, starting with the one given.

The default is 1.
"#,
        );
        &[MONTHS]
    }
}
