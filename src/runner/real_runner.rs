use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::debug;

use super::interactive::{ChannelStream, InteractiveSession, TerminalSecretSource};
use super::{CommandOutput, CommandRunner};
use crate::core::{split_arguments, CommandInfo};
use crate::error::{MigrateError, Result};

/// Runs commands as real child processes
pub struct ProcessCommandRunner {
    echo: bool,
    working_dir: Option<PathBuf>,
}

impl Default for ProcessCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCommandRunner {
    /// Create a runner that works in the current directory without echoing
    pub fn new() -> Self {
        Self {
            echo: false,
            working_dir: None,
        }
    }

    /// Echo captured output lines as they arrive
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Run every command in `path`
    pub fn with_working_dir(mut self, path: &Path) -> Self {
        self.working_dir = Some(path.to_path_buf());
        self
    }

    fn command(&self, info: &CommandInfo) -> Command {
        let mut cmd = Command::new(&info.command);
        cmd.args(split_arguments(&info.arguments));
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn(&self, info: &CommandInfo, cmd: &mut Command) -> Result<Child> {
        debug!("Running command: {info}");
        cmd.spawn().map_err(|e| launch_error(&info.command, e))
    }
}

fn launch_error(program: &str, error: io::Error) -> MigrateError {
    if error.kind() == io::ErrorKind::NotFound {
        MigrateError::CommandNotFound {
            program: program.to_string(),
        }
    } else {
        MigrateError::Io(error)
    }
}

/// Reads a stream to its end, line by line, optionally echoing each line
fn collect_lines<R: Read>(reader: R, echo: bool, to_stderr: bool) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buffer)
            .trim_end_matches(&['\r', '\n'][..])
            .to_string();
        if echo {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, info: &CommandInfo) -> Result<CommandOutput> {
        let mut cmd = self.command(info);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = self.spawn(info, &mut cmd)?;

        let echo = self.echo;
        let stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || match stderr {
            Some(stream) => collect_lines(stream, echo, true),
            None => Ok(String::new()),
        });

        let stdout = match child.stdout.take() {
            Some(stream) => collect_lines(stream, echo, false)?,
            None => String::new(),
        };
        let stderr = stderr_reader
            .join()
            .map_err(|_| io::Error::other("stderr reader panicked"))??;

        let status = child.wait()?;
        let exit_code = status.code().unwrap_or(-1);
        debug!(exit_code, "Command finished: {info}");

        Ok(CommandOutput {
            exit_code,
            stdout,
            stderr,
        })
    }

    fn run_interactive(&self, info: &CommandInfo, password: Option<&str>) -> Result<i32> {
        let mut cmd = self.command(info);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        let mut child = self.spawn(info, &mut cmd)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("child input stream unavailable"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("child error stream unavailable"))?;

        InteractiveSession::new(
            ChannelStream::spawn(stderr),
            stdin,
            io::stdout(),
            TerminalSecretSource,
        )
        .with_secret(password)
        .run()?;

        let status = child.wait()?;
        let exit_code = status.code().unwrap_or(-1);
        debug!(exit_code, "Interactive command finished: {info}");
        Ok(exit_code)
    }
}
