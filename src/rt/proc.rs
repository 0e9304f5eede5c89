//! Process execution (spec §2 "RtProc" table entry, §3.3 `RtProcess`
//! result shape). A spawn failure surfaces as the sentinel exit code
//! 127 ("command not found") rather than a `Result`, matching the OS-
//! failure-as-return-sentinel policy spec §7 applies elsewhere.

use std::process::Command;

pub struct RtProcessResult {
    pub exit_code: i32,
    pub stdout_data: String,
    pub stderr_data: String,
}

const COMMAND_NOT_FOUND: i32 = 127;

pub fn run(command: &str) -> RtProcessResult {
    run_with_args(command, &[])
}

pub fn run_with_args(command: &str, args: &[&str]) -> RtProcessResult {
    match Command::new(command).args(args).output() {
        Ok(output) => RtProcessResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout_data: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr_data: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(_) => RtProcessResult {
            exit_code: COMMAND_NOT_FOUND,
            stdout_data: String::new(),
            stderr_data: format!("command not found: {command}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let result = run_with_args("echo", &["hi"]);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout_data.trim(), "hi");
    }

    #[test]
    fn missing_command_yields_127() {
        let result = run("this-command-does-not-exist-anywhere");
        assert_eq!(result.exit_code, COMMAND_NOT_FOUND);
    }
}
