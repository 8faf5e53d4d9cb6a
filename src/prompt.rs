//! User interaction gates for destructive and naming operations.

/// Asks the user to confirm or to supply input.
///
/// Deletion never proceeds without [`Prompter::confirm`] returning `true`,
/// and there is no implementation that answers yes by default.
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question.
    fn confirm(&self, question: &str) -> bool;

    /// Ask for a new folder name; `None` means the user cancelled.
    fn folder_name(&self) -> Option<String>;
}

/// Prompter reading answers from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(prompt: &str) -> Option<String> {
        use std::io::Write;

        print!("{}", prompt);
        std::io::stdout().flush().ok()?;
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> bool {
        Self::read_line(&format!("{} [y/N] ", question))
            .map(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn folder_name(&self) -> Option<String> {
        Self::read_line("New folder name: ")
    }
}
