/*!
Snapshot testing of whole `agenda` invocations.

A `Command` is an owned builder around `std::process::Command`, so tests can
build one up in a single expression. Running it produces a `Snapshot` holding
the exit status, stdout and stderr, which is then compared with `insta`. The
command line and environment are attached as `insta` info, so they show up in
`cargo insta review` without cluttering the snapshot itself.
*/

use std::{
    collections::BTreeMap,
    env::consts::EXE_SUFFIX,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process,
};

use bstr::{ByteSlice, ByteVec};

macro_rules! run_and_snapshot {
    ($cmd:expr, $body:expr) => {{
        let snap = $cmd.snapshot();
        let mut settings = insta::Settings::clone_current();
        settings.set_info(snap.info());
        settings.set_omit_expression(true);
        settings.bind(|| ($body)(snap.snapshot()));
    }};
}

macro_rules! assert_cmd_snapshot {
    ($cmd:expr, @$snapshot:literal $(,)?) => {{
        $crate::command::run_and_snapshot!($cmd, |snapshot: &str| {
            insta::assert_snapshot!(snapshot, @$snapshot);
        });
    }};
}

pub(crate) use {assert_cmd_snapshot, run_and_snapshot};

/// The output of one command, formatted for comparison.
pub struct Snapshot {
    info: CommandInfo,
    snapshot: String,
}

impl Snapshot {
    fn new(cmd: &Command, output: &process::Output) -> Snapshot {
        let snapshot = format!(
            "success: {:?}\n\
             exit_code: {}\n\
             ----- stdout -----\n\
             {}\n\
             ----- stderr -----\n\
             {}",
            output.status.success(),
            output.status.code().unwrap_or(!0),
            bytes_to_string(&output.stdout),
            bytes_to_string(&output.stderr),
        );
        Snapshot { info: cmd.info(), snapshot }
    }

    pub fn info(&self) -> &CommandInfo {
        &self.info
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }
}

/// An owned builder for a process.
///
/// Only the parts of `std::process::Command` that the tests need are here.
/// Standard I/O is always captured, with stdin closed.
#[derive(Clone, Debug)]
pub struct Command {
    bin: OsString,
    current_dir: Option<PathBuf>,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl Command {
    pub fn new(bin: impl AsRef<OsStr>) -> Command {
        Command {
            bin: bin.as_ref().to_os_string(),
            current_dir: None,
            args: vec![],
            envs: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Command {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args(
        mut self,
        args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    ) -> Command {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    pub fn env(
        mut self,
        key: impl AsRef<OsStr>,
        val: impl AsRef<OsStr>,
    ) -> Command {
        self.envs
            .push((key.as_ref().to_os_string(), val.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Command {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn std(&self) -> process::Command {
        let mut cmd = process::Command::new(&self.bin);
        if let Some(ref current_dir) = self.current_dir {
            cmd.current_dir(current_dir);
        }
        cmd.args(self.args.iter());
        for (key, val) in self.envs.iter() {
            cmd.env(key, val);
        }
        cmd.stdin(process::Stdio::null());
        cmd
    }

    pub fn snapshot(&self) -> Snapshot {
        let output = self.std().output().unwrap();
        Snapshot::new(self, &output)
    }

    pub fn info(&self) -> CommandInfo {
        CommandInfo::new(&self.std())
    }
}

/// What gets shown in `cargo insta review` next to a snapshot.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CommandInfo {
    bin: String,
    args: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

impl CommandInfo {
    fn new(cmd: &process::Command) -> CommandInfo {
        let name = Path::new(cmd.get_program())
            .file_name()
            .unwrap_or(OsStr::new("{UNKNOWN}"));
        let name = os_str_to_string(name);
        let bin = name.strip_suffix(EXE_SUFFIX).unwrap_or(&name).to_string();
        CommandInfo {
            bin,
            args: cmd.get_args().map(os_str_to_string).collect(),
            env: cmd
                .get_envs()
                .map(|(k, v)| {
                    (
                        os_str_to_string(k),
                        os_str_to_string(v.unwrap_or(OsStr::new(""))),
                    )
                })
                .collect(),
        }
    }
}

/// Returns a command for the Cargo binary with the given name.
pub fn bin(name: &str) -> Command {
    let path = std::env::current_exe()
        .unwrap()
        .parent()
        .expect("executable's directory")
        .parent()
        .expect("target profile directory")
        .join(format!("{name}{EXE_SUFFIX}"));
    Command::new(path)
}

/// Valid UTF-8 is kept as is. Anything else is escaped.
fn bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(string) => string.to_string(),
        Err(_) => bytes.escape_bytes().to_string(),
    }
}

fn os_str_to_string(os_str: &OsStr) -> String {
    bytes_to_string(&Vec::from_os_str_lossy(os_str))
}
