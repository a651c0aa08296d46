//! Terminal implementation of the policy UI

use kubitect_core::errors::PolicyError;
use kubitect_core::policy::{parse_answer, MessageBlock, Ui};
use std::io::{BufRead, IsTerminal, Write};

/// Prompts on stdin, prints diffs on stdout and message blocks on stderr.
pub struct TerminalUi {
    auto_approve: bool,
    color: bool,
}

impl TerminalUi {
    /// Confirmations are skipped when `auto_approve` is set or stdin is
    /// not a terminal.
    pub fn new(auto_approve: bool, color: bool) -> Self {
        Self {
            auto_approve: auto_approve || !std::io::stdin().is_terminal(),
            color,
        }
    }
}

impl Ui for TerminalUi {
    fn ask(&self, prompt: &str) -> Result<(), PolicyError> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("{} (yes/no) ", prompt);
            stdout.flush().map_err(|e| PolicyError::Ui {
                reason: e.to_string(),
            })?;

            let mut answer = String::new();
            let read = stdin.lock().read_line(&mut answer).map_err(|e| PolicyError::Ui {
                reason: e.to_string(),
            })?;
            if read == 0 {
                return Err(PolicyError::Ui {
                    reason: "stdin closed".to_string(),
                });
            }

            match parse_answer(&answer) {
                Some(true) => return Ok(()),
                Some(false) => return Err(PolicyError::Declined),
                None => continue,
            }
        }
    }

    fn print_blocks(&self, blocks: &[MessageBlock]) {
        for block in blocks {
            eprintln!("{}", block.render(self.color));
        }
    }

    fn println(&self, line: &str) {
        println!("{}", line);
    }

    fn auto_approve(&self) -> bool {
        self.auto_approve
    }
}
