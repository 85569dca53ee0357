mod dates;
mod generate;
mod init;

const USAGE: &'static str = "\
Generate agenda documents for a recurring meeting.

USAGE:
    agenda <command> ...

COMMANDS:
    dates  Print the occurrences of the meeting in a month
    gen    Write the agenda documents for a month
    init   Write an example configuration file
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "dates" => dates::run(p),
        "gen" => generate::run(p),
        "init" => init::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
