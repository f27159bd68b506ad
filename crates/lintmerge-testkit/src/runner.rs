//! A process runner that replays canned tool output.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, anyhow};
use lintmerge_core::{ProcessOutput, ProcessRunner, ToolCommand};

/// Answers each invocation by the file name of the tool binary.
///
/// For JS stages the program is the runtime and the binary is the first
/// argument; both positions are checked.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, ProcessOutput>,
    calls: RefCell<Vec<ToolCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, binary: &str, text: &str, exit_code: i32) -> Self {
        self.responses.insert(
            binary.to_string(),
            ProcessOutput {
                text: text.to_string(),
                exit_code: Some(exit_code),
            },
        );
        self
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }

    fn lookup(&self, command: &ToolCommand) -> Option<&ProcessOutput> {
        let by_program = file_name(&command.program).and_then(|n| self.responses.get(n));
        by_program.or_else(|| {
            command
                .args
                .first()
                .and_then(|a| file_name(Path::new(a)))
                .and_then(|n| self.responses.get(n))
        })
    }
}

fn file_name(p: &Path) -> Option<&str> {
    p.file_name().and_then(|n| n.to_str())
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> Result<ProcessOutput> {
        self.calls.borrow_mut().push(command.clone());
        self.lookup(command)
            .cloned()
            .ok_or_else(|| anyhow!("no scripted output for `{}`", command.display()))
    }
}
