//! Remote session kinds: recognize a process, recover its target host, and
//! rebuild the command that re-enters the same target from a fresh shell.
//!
//! Adding a kind means adding a variant and its arms in the `match`es below.

use std::fmt;

use crate::args::{FlagGrammar, getopt};
use crate::process::ProcessHandle;

/// Short options accepted by the OpenSSH client.
pub const SSH_OPTSTRING: &str = concat!(
    "1246ab:c:e:fgi:kl:m:no:p:qstvx",
    "AB:CD:E:F:GI:J:KL:MNO:P:Q:R:S:TVw:W:XYy",
);

/// Container runtimes checked by default, in priority order after SSH.
pub const DEFAULT_CONTAINER_RUNTIMES: &[&str] = &["docker", "podman"];

const EXEC_GRAMMAR: FlagGrammar = FlagGrammar {
    switches: &[
        "-d",
        "--detach",
        "-i",
        "--interactive",
        "-l",
        "--latest",
        "-t",
        "--tty",
    ],
    valued: &[
        "--detach-keys",
        "-e",
        "--env",
        "--env-file",
        "--privileged",
        "--preserve-fds",
        "-u",
        "--user",
        "-w",
        "--workdir",
    ],
};

const ATTACH_GRAMMAR: FlagGrammar = FlagGrammar {
    switches: &["-l", "--latest", "--no-stdin", "--sig-proxy"],
    valued: &["--detach-keys"],
};

/// A kind of remote session. The executable name is the kind's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteSessionKind {
    Ssh,
    /// A container CLI such as `docker` or `podman`.
    Container(String),
}

/// Coarse grouping used to pick a default profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCategory {
    Ssh,
    Container,
}

/// Interactive container subcommands we know how to clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerCommand {
    Run,
    Exec,
    Attach,
}

impl ContainerCommand {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "run" => Some(Self::Run),
            "exec" => Some(Self::Exec),
            "attach" => Some(Self::Attach),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Exec => "exec",
            Self::Attach => "attach",
        }
    }
}

/// SSH first, then each default container runtime.
pub fn default_kinds() -> Vec<RemoteSessionKind> {
    std::iter::once(RemoteSessionKind::Ssh)
        .chain(
            DEFAULT_CONTAINER_RUNTIMES
                .iter()
                .map(|exe| RemoteSessionKind::Container((*exe).to_string())),
        )
        .collect()
}

impl RemoteSessionKind {
    pub fn container(exe: impl Into<String>) -> Self {
        Self::Container(exe.into())
    }

    pub fn executable(&self) -> &str {
        match self {
            Self::Ssh => "ssh",
            Self::Container(exe) => exe,
        }
    }

    pub fn category(&self) -> SessionCategory {
        match self {
            Self::Ssh => SessionCategory::Ssh,
            Self::Container(_) => SessionCategory::Container,
        }
    }

    /// Whether `process` is a session of this kind.
    pub fn matches(&self, process: &ProcessHandle) -> bool {
        if !self.matches_by_name(process) {
            return false;
        }
        match self {
            Self::Ssh => true,
            Self::Container(_) => container_command(process).is_some(),
        }
    }

    /// True when the reported name, the executable's base name, or `argv[0]`
    /// equals this kind's executable name exactly.
    pub fn matches_by_name(&self, process: &ProcessHandle) -> bool {
        let exe = self.executable();
        process.name == exe
            || process.exe_basename() == Some(exe)
            || process.cmdline.first().is_some_and(|arg0| arg0 == exe)
    }

    /// Host or container the session talks to, if it can be recovered from
    /// the command line.
    pub fn extract_host(&self, process: &ProcessHandle) -> Option<String> {
        let host = match self {
            Self::Ssh => ssh_host(&process.cmdline),
            Self::Container(_) => container_host(&process.cmdline),
        };
        if host.is_none() {
            tracing::debug!(pid = process.pid, kind = %self, "no host in command line");
        }
        host
    }

    /// Argument vector that re-establishes an equivalent session.
    pub fn build_clone_command(&self, process: &ProcessHandle) -> Vec<String> {
        match self {
            Self::Ssh => process.cmdline.clone(),
            Self::Container(exe) => match container_command(process) {
                Some(ContainerCommand::Run) => match self.extract_host(process) {
                    Some(name) => vec![
                        exe.clone(),
                        "exec".to_string(),
                        "-it".to_string(),
                        name,
                        "sh".to_string(),
                    ],
                    // Unnamed container: re-running starts a second one.
                    None => process.cmdline.clone(),
                },
                Some(ContainerCommand::Exec | ContainerCommand::Attach) => {
                    process.cmdline.clone()
                }
                None => {
                    tracing::error!(pid = process.pid, "clone requested for non-interactive container command");
                    process.cmdline.clone()
                }
            },
        }
    }
}

impl fmt::Display for RemoteSessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable())
    }
}

/// First interactive subcommand anywhere in the command line.
pub fn container_command(process: &ProcessHandle) -> Option<ContainerCommand> {
    process
        .cmdline
        .iter()
        .find_map(|arg| ContainerCommand::parse(arg))
}

fn ssh_host(cmdline: &[String]) -> Option<String> {
    let args = cmdline.get(1..)?;
    let parsed = match getopt(args, SSH_OPTSTRING) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("ssh command line did not parse: {e}");
            return None;
        }
    };
    let target = parsed.operands.first()?;
    match target.split_once('@') {
        Some((_user, host)) => Some(host.to_string()),
        None => Some(target.clone()),
    }
}

fn container_host(cmdline: &[String]) -> Option<String> {
    let (idx, command) = cmdline
        .iter()
        .enumerate()
        .find_map(|(idx, arg)| ContainerCommand::parse(arg).map(|cmd| (idx, cmd)))?;
    let after = &cmdline[idx + 1..];
    let host = match command {
        ContainerCommand::Run => run_name(cmdline),
        ContainerCommand::Exec => EXEC_GRAMMAR.first_positional(after),
        ContainerCommand::Attach => ATTACH_GRAMMAR.first_positional(after),
    };
    host.map(str::to_string)
}

/// Value of `--name`. Without it the runtime picks a random name that the
/// command line cannot tell us.
fn run_name(cmdline: &[String]) -> Option<&str> {
    let mut iter = cmdline.iter();
    while let Some(arg) = iter.next() {
        if arg == "--name" {
            return iter.next().map(String::as_str);
        }
        if let Some(name) = arg.strip_prefix("--name=") {
            return Some(name);
        }
    }
    None
}
