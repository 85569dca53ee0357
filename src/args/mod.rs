use std::{
    fmt::{Debug, Display, Write},
    str::FromStr,
    sync::LazyLock,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex::Regex,
};

pub mod flags;
pub mod positional;

/// A thing that can consume command line arguments.
///
/// Each command builds a list of these and hands them to `configure`, which
/// offers every argument to each one in turn until one accepts it.
pub trait Configurable: Debug {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    /// Documentation for the flags and arguments this parses.
    fn usage(&self) -> &[Usage] {
        &[]
    }
}

/// Parses the remaining arguments of `p` into `targets`.
///
/// `-h` and `--help` are handled here. They produce a `Help` error whose
/// text is `usage` with `%args%` and `%flags%` filled in.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    /// Removes `%snip-start%`, `%snip-end%` and everything between them.
    /// Used for the short `-h` output.
    static REMOVE_SNIPS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^\s*%snip-start%\p{any}*?%snip-end%\s*$").unwrap()
    });

    /// Removes only the snip markers. Used for the long `--help` output.
    static REMOVE_SNIP_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^\s*%snip-(start|end)%\s*$").unwrap()
    });

    while let Some(arg) = p.next()? {
        if let Arg::Short('h') | Arg::Long("help") = arg {
            let args = collect_usage_for_args(targets);
            let flags = collect_usage_for_flags(targets);
            let (usage, args, flags) = if arg == Arg::Short('h') {
                let usage = REMOVE_SNIPS.replace_all(usage, "").into_owned();
                (usage, Usage::short(&args), Usage::short(&flags))
            } else {
                let usage =
                    REMOVE_SNIP_MARKERS.replace_all(usage, "").into_owned();
                (usage, Usage::long(&args), Usage::long(&flags))
            };
            let usage =
                usage.replace("%args%", &args).replace("%flags%", &flags);
            return Err(anyhow::Error::from(Help(usage.trim().to_string())));
        }
        // Long flag names borrow from `p`, which the targets also need
        // mutably. So give the name its own home first.
        let long_flag: Option<String> = match arg {
            Arg::Long(name) => Some(name.to_string()),
            _ => None,
        };
        let mut arg = match long_flag {
            Some(ref flag) => Arg::Long(flag),
            None => match arg {
                Arg::Short(c) => Arg::Short(c),
                Arg::Long(_) => unreachable!(),
                Arg::Value(value) => Arg::Value(value),
            },
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
    Ok(())
}

fn collect_usage_for_args(targets: &[&mut dyn Configurable]) -> Vec<Usage> {
    let mut usages = vec![];
    for t in targets.iter() {
        usages.extend(t.usage().iter().copied().filter(|u| !u.flag));
    }
    // Positional arguments keep the order in which they are parsed.
    usages
}

fn collect_usage_for_flags(targets: &[&mut dyn Configurable]) -> Vec<Usage> {
    let mut usages = vec![Help::USAGE, Version::USAGE];
    for t in targets.iter() {
        usages.extend(t.usage().iter().copied().filter(|u| u.flag));
    }
    usages.sort_by_key(|u| {
        u.format.split_once(", ").map(|(_, long)| long).unwrap_or(u.format)
    });
    usages
}

/// Parses the next argument as a command name.
///
/// With no argument at all, the usage is returned as an error. `-h/--help`
/// and `--version` are recognized here too.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    let usage = usage.trim();
    let arg = match p.next()? {
        Some(arg) => arg,
        None => anyhow::bail!("{}", usage),
    };
    let cmd = match arg {
        Arg::Value(cmd) => cmd.string()?,
        Arg::Short('h') | Arg::Long("help") => {
            return Err(anyhow::Error::from(Help(usage.to_string())));
        }
        Arg::Long("version") => return Err(anyhow::Error::from(Version)),
        arg => return Err(arg.unexpected().into()),
    };
    Ok(cmd)
}

/// Parses the next `p.value()` into `T`, with `flag_name` in any error.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let osv = p.value().context(flag_name)?;
    let strv = match osv.to_str() {
        Some(strv) => strv,
        None => {
            let err = lexopt::Error::NonUnicodeValue(osv.into());
            return Err(anyhow::Error::from(err).context(flag_name));
        }
    };
    match strv.parse() {
        Err(err) => Err(anyhow::Error::msg(err).context(flag_name)),
        Ok(parsed) => Ok(parsed),
    }
}

/// The documentation of a single flag or positional argument.
///
/// `Usage::short` and `Usage::long` turn a list of these into the aligned
/// and wrapped text that replaces `%args%` and `%flags%`.
#[derive(Clone, Copy, Debug)]
pub struct Usage {
    /// Whether this is an optional flag or a required argument.
    pub flag: bool,
    /// e.g., `-c, --config <path>`.
    pub format: &'static str,
    /// One line, shown with `-h`.
    pub short: &'static str,
    /// Any number of paragraphs, shown with `--help`.
    pub long: &'static str,
}

impl Usage {
    pub const fn flag(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { flag: true, format, short, long }
    }

    pub const fn arg(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { flag: false, format, short, long }
    }

    /// A two column table of formats and short descriptions.
    pub fn short(usages: &[Usage]) -> String {
        const MIN_SPACE: usize = 2;

        let mut result = String::new();
        let Some(max_len) = usages.iter().map(|u| u.format.len()).max() else {
            return result;
        };
        for usage in usages.iter() {
            let padding = " ".repeat(MIN_SPACE + (max_len - usage.format.len()));
            writeln!(result, "    {}{}{}", usage.format, padding, usage.short)
                .unwrap();
        }
        result
    }

    /// Each format followed by its long description, wrapped and indented
    /// below it.
    pub fn long(usages: &[Usage]) -> String {
        let wrap_opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let mut result = String::new();
        for (i, usage) in usages.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            writeln!(result, "    {}", usage.format).unwrap();
            for (i, paragraph) in usage.long.trim().split("\n\n").enumerate() {
                if i > 0 {
                    result.push('\n');
                }
                let flattened = paragraph.replace("\n", " ");
                for line in textwrap::wrap(&flattened, &wrap_opts) {
                    result.push_str(&line);
                    result.push('\n');
                }
            }
        }
        result
    }
}

/// A `-h/--help` message. `main` prints it to stdout and exits successfully.
#[derive(Debug)]
pub struct Help(String);

impl Help {
    const USAGE: Usage = Usage::flag(
        "-h/--help",
        "Print help output.",
        r#"
Print help output.

The short flag, -h, shows a condensed help output with a single line for every
flag. The long flag, --help, shows complete documentation.
"#,
    );
}

impl std::fmt::Display for Help {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Help {}

/// A `--version` message. `main` prints it to stdout and exits successfully.
#[derive(Debug)]
pub struct Version;

impl Version {
    const USAGE: Usage = Usage::flag(
        "--version",
        "Print the version of agenda.",
        r#"
Print the version of agenda.
"#,
    );
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let semver = option_env!("CARGO_PKG_VERSION").unwrap_or("N/A");
        match option_env!("AGENDA_BUILD_GIT_HASH") {
            None => write!(f, "agenda {semver}"),
            Some(hash) => write!(f, "agenda {semver} (rev {hash})"),
        }
    }
}

impl std::error::Error for Version {}
