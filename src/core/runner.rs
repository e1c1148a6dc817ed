//! ### Run external tools
//!
//! Every call hands back its own exit status together with the decoded
//! output; nothing about a previous run is remembered.

use std::{
    io::Write,
    process::{Command, ExitStatus, Stdio},
};

use tracing::debug;

use crate::core::{
    error::{AppError, AppResult},
    utils::auto_decode,
};

/// The result of one command run.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(command.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Run the command and return its output whatever the exit status.
pub fn capture_command(mut command: Command) -> AppResult<CommandOutput> {
    debug!(command = %describe(&command), "running");
    let output = command.output()?;

    let result = CommandOutput {
        status: output.status,
        stdout: auto_decode(&output.stdout)?,
        stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
    };
    debug!(status = ?result.status, bytes = output.stdout.len(), "finished");
    Ok(result)
}

/// Run the command, feeding `input` on stdin.
pub fn capture_command_with_input(mut command: Command, input: &str) -> AppResult<CommandOutput> {
    debug!(command = %describe(&command), "running with stdin");
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    Ok(CommandOutput {
        status: output.status,
        stdout: auto_decode(&output.stdout)?,
        stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
    })
}

/// Run the command and turn a non-zero exit status into an error.
pub fn execute_command(command: Command) -> AppResult<CommandOutput> {
    let description = describe(&command);
    let output = capture_command(command)?;

    if !output.success() {
        return Err(AppError::CommandFailed {
            command: description,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_program_and_args() {
        let mut command = Command::new("accurev");
        command.args(["show", "-fx", "users"]);
        assert_eq!(describe(&command), "accurev show -fx users");
    }
}
