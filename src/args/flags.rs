use std::path::{Path, PathBuf};

use crate::{
    args::{Configurable, Usage},
    config,
};

/// The `-c/--config` flag, naming the meeting series configuration file.
#[derive(Clone, Debug)]
pub struct ConfigPath {
    path: PathBuf,
}

impl ConfigPath {
    pub fn get(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigPath {
    fn default() -> ConfigPath {
        ConfigPath { path: PathBuf::from(config::DEFAULT_PATH) }
    }
}

impl Configurable for ConfigPath {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Short('c') | lexopt::Arg::Long("config") => {
                self.path = PathBuf::from(p.value()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const CONFIG: Usage = Usage::flag(
            "-c, --config <path>",
            "The meeting series configuration file.",
            r#"
The meeting series configuration file.

This is a JSON file describing a recurring meeting: its name, its time zone,
its recurrence rule, any secondary meetings and the links shown at the top of
every agenda. Run `agenda init` for an example.

When absent, this defaults to `agenda.json` in the current directory.
"#,
        );
        &[CONFIG]
    }
}

/// The `--dry-run` flag.
#[derive(Clone, Debug, Default)]
pub struct DryRun {
    enabled: bool,
}

impl DryRun {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Configurable for DryRun {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("dry-run") => {
                self.enabled = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const DRY_RUN: Usage = Usage::flag(
            "--dry-run",
            "Print what would be written without writing anything.",
            r#"
Print what would be written without writing anything.

The paths of every agenda that would be generated are still printed, but no
directories are created and no files are written.
"#,
        );
        &[DRY_RUN]
    }
}
