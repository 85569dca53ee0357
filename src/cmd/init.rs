use std::io::Write;

use anyhow::Context;

use crate::{
    args::{self, flags},
    config,
};

const USAGE: &'static str = r#"
Write an example configuration file.

The example describes a meeting on the first Thursday of every month. It is
meant to be edited before running `agenda gen`. An existing file is never
overwritten.

USAGE:
    agenda init

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config_path = flags::ConfigPath::default();
    args::configure(p, USAGE, &mut [&mut config_path])?;

    let path = config_path.get();
    let result = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path);
    let mut file = match result {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            anyhow::bail!(
                "`{}` already exists, refusing to overwrite it",
                path.display(),
            )
        }
        Err(err) => {
            return Err(anyhow::Error::from(err)
                .context(format!("failed to create `{}`", path.display())));
        }
    };
    file.write_all(config::EXAMPLE.as_bytes())
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    log::info!("wrote example configuration to `{}`", path.display());
    writeln!(
        std::io::stdout(),
        "wrote {}, edit it before running `agenda gen`",
        path.display(),
    )?;
    Ok(())
}
