//! Runs tmux as a subprocess, aimed at one server.

use crate::error::TmuxError;

/// Anything that can run a tmux command line and hand back its stdout.
pub trait TmuxCommandRunner: Send + Sync {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError>;
}

impl<T: TmuxCommandRunner + ?Sized> TmuxCommandRunner for &T {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        (**self).run(args)
    }
}

/// Which tmux server to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Socket {
    /// Whatever tmux picks (`$TMUX` inside a session).
    Default,
    /// `-S <path>`
    Path(String),
    /// `-L <name>`
    Name(String),
}

impl Socket {
    fn args(&self) -> Option<[&str; 2]> {
        match self {
            Self::Default => None,
            Self::Path(path) => Some(["-S", path.as_str()]),
            Self::Name(name) => Some(["-L", name.as_str()]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    tmux_bin: String,
    socket: Socket,
}

impl TmuxExecutor {
    /// Socket targeting: explicit path, then `PANECLONE_TMUX_SOCKET_PATH`,
    /// then `PANECLONE_TMUX_SOCKET_NAME`, then tmux's own default.
    pub fn from_env<F>(explicit_socket: Option<&str>, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let socket = match explicit_socket {
            Some(path) => Socket::Path(path.to_string()),
            None => env_lookup("PANECLONE_TMUX_SOCKET_PATH")
                .map(Socket::Path)
                .or_else(|| env_lookup("PANECLONE_TMUX_SOCKET_NAME").map(Socket::Name))
                .unwrap_or(Socket::Default),
        };
        Self {
            tmux_bin: "tmux".to_string(),
            socket,
        }
    }
}

impl Default for TmuxExecutor {
    fn default() -> Self {
        Self {
            tmux_bin: "tmux".to_string(),
            socket: Socket::Default,
        }
    }
}

impl TmuxCommandRunner for TmuxExecutor {
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let mut cmd = std::process::Command::new(&self.tmux_bin);
        if let Some(socket_args) = self.socket.args() {
            cmd.args(socket_args);
        }
        cmd.args(args);
        tracing::trace!(?args, "tmux");
        let output = cmd.output().map_err(TmuxError::Io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TmuxError::CommandFailed(format!(
                "{} exited {}: {}",
                args.first().unwrap_or(&""),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_default_server() {
        let exec = TmuxExecutor::default();
        assert_eq!(exec.tmux_bin, "tmux");
        assert_eq!(exec.socket, Socket::Default);
        assert_eq!(exec.socket.args(), None);
    }

    #[test]
    fn explicit_socket_beats_environment() {
        let exec = TmuxExecutor::from_env(Some("/tmp/my.sock"), |_| Some("ignored".to_string()));
        assert_eq!(exec.socket.args(), Some(["-S", "/tmp/my.sock"]));
    }

    #[test]
    fn environment_picks_socket() {
        let exec = TmuxExecutor::from_env(None, |name| {
            (name == "PANECLONE_TMUX_SOCKET_NAME").then(|| "work".to_string())
        });
        assert_eq!(exec.socket.args(), Some(["-L", "work"]));

        let exec = TmuxExecutor::from_env(None, |name| {
            name.starts_with("PANECLONE_TMUX_SOCKET").then(|| format!("/run/{name}"))
        });
        assert_eq!(
            exec.socket,
            Socket::Path("/run/PANECLONE_TMUX_SOCKET_PATH".to_string())
        );

        let exec = TmuxExecutor::from_env(None, |_| None);
        assert_eq!(exec.socket, Socket::Default);
    }

    #[test]
    fn missing_binary_is_io_error() {
        let exec = TmuxExecutor {
            tmux_bin: "/nonexistent/tmux-binary".to_string(),
            socket: Socket::Default,
        };
        assert!(matches!(exec.run(&["list-panes"]), Err(TmuxError::Io(_))));
    }
}
