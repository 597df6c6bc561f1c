use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::CommandError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// Minimum wait for pipe output once the child has exited, even past the deadline.
const READER_GRACE: Duration = Duration::from_millis(100);

/// `cmd.exe` exit code for "is not recognized as an internal or external command".
#[cfg(windows)]
const CMD_NOT_RECOGNIZED: i32 = 9009;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn combined_lowercase(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).to_lowercase()
    }
}

/// Blocking child-process execution with an upper time bound.
pub trait CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        debug!("running {} {}", program, args.join(" "));
        let mut child = build_command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + timeout;
        let status = wait_with_timeout(&mut child, program, timeout)?;
        let output = CommandOutput {
            code: status.code(),
            success: status.success(),
            stdout: collect_reader(stdout, deadline),
            stderr: collect_reader(stderr, deadline),
        };

        reject_unrecognized(program, output)
    }
}

#[cfg(windows)]
fn reject_unrecognized(program: &str, output: CommandOutput) -> Result<CommandOutput, CommandError> {
    if output.code == Some(CMD_NOT_RECOGNIZED) {
        return Err(CommandError::NotFound {
            program: program.to_string(),
        });
    }
    Ok(output)
}

#[cfg(not(windows))]
fn reject_unrecognized(_program: &str, output: CommandOutput) -> Result<CommandOutput, CommandError> {
    Ok(output)
}

#[cfg(windows)]
fn build_command(program: &str, args: &[String]) -> Command {
    // Package managers ship as `.cmd` shims on Windows; only the shell resolves those.
    let mut command = Command::new("cmd");
    command.arg("/C").arg(program).args(args);
    command
}

#[cfg(not(windows))]
fn build_command(program: &str, args: &[String]) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command
}

fn spawn_error(program: &str, source: io::Error) -> CommandError {
    if source.kind() == io::ErrorKind::NotFound {
        CommandError::NotFound {
            program: program.to_string(),
        }
    } else {
        CommandError::Io {
            program: program.to_string(),
            source,
        }
    }
}

fn wait_with_timeout(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, CommandError> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    after: timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                return Err(CommandError::Io {
                    program: program.to_string(),
                    source,
                })
            }
        }
    }
}

// Pipes are drained on their own threads so a chatty child cannot fill the pipe
// buffer and stall before exiting.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        let _ = tx.send(String::from_utf8_lossy(&buffer).into_owned());
    });
    rx
}

/// Waits for a reader until the command's deadline. A grandchild that inherited the pipe
/// can keep it open after the child exits; its reader is then left behind.
fn collect_reader(reader: Option<Receiver<String>>, deadline: Instant) -> String {
    let Some(reader) = reader else {
        return String::new();
    };
    let budget = deadline
        .saturating_duration_since(Instant::now())
        .max(READER_GRACE);
    match reader.recv_timeout(budget) {
        Ok(text) => text,
        Err(_) => {
            debug!("output pipe still open after exit, detaching reader");
            String::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_not_found() {
        let err = SystemRunner
            .run(
                "definitely-not-a-real-program-4f1c",
                &[],
                Duration::from_secs(5),
            )
            .expect_err("spawn must fail");
        assert!(matches!(err, CommandError::NotFound { .. }));
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let output = SystemRunner
            .run(
                "sh",
                &["-c".to_string(), "echo hello; echo oops >&2; exit 3".to_string()],
                Duration::from_secs(5),
            )
            .expect("sh runs");
        assert_eq!(output.code, Some(3));
        assert!(!output.success);
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.combined_lowercase().contains("oops"));
    }

    #[test]
    fn inherited_pipe_does_not_outlive_the_timeout() {
        let started = Instant::now();
        let output = SystemRunner
            .run(
                "sh",
                &["-c".to_string(), "sleep 5 & exit 0".to_string()],
                Duration::from_millis(300),
            )
            .expect("sh runs");
        assert!(output.success);
        assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    }

    #[test]
    fn slow_command_times_out() {
        let err = SystemRunner
            .run(
                "sleep",
                &["5".to_string()],
                Duration::from_millis(100),
            )
            .expect_err("must time out");
        assert!(matches!(err, CommandError::TimedOut { .. }));
    }
}
