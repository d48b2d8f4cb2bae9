//! Yes/no prompts on a terminal.

use std::io::{BufRead, Write};

use phonebook_core::{Contact, Decider, Submission};

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks `question`; only "y" or "yes" (any case) count as consent.
    ///
    /// End of input or an I/O failure counts as "no".
    pub fn ask(&mut self, question: &str) -> bool {
        if let Err(e) = write!(self.output, "{question} [y/N] ").and_then(|()| self.output.flush())
        {
            tracing::warn!("Failed to write prompt: {}", e);
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                false
            }
        }
    }
}

impl<R: BufRead, W: Write> Decider for Prompt<R, W> {
    fn confirm_replace(&mut self, existing: &Contact, _submission: &Submission) -> bool {
        self.ask(&format!(
            "{} is already added to phonebook, replace the old number with a new one?",
            existing.name
        ))
    }
}
