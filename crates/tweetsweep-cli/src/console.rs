//! Terminal input: line editor, review answers and credential prompts.

use crate::error::Result;
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use tweetsweep_domain::Decision;
use tweetsweep_store::CredentialPrompt;
use tweetsweep_sweeper::{DecisionSource, ReviewItem};

/// Line editor shared by the menu, the review loop and the prompts
pub struct Console {
    editor: DefaultEditor,
}

impl Console {
    /// Open the terminal
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read one trimmed line
    ///
    /// Returns `None` on Ctrl-C or end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e.to_string())),
        }
    }

    /// Ask a yes/no question; an empty answer picks `default`
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.read_line(&format!("{} {} ", question, hint))?;
        Ok(answer.map(|a| parse_yes_no(&a, default)).unwrap_or(false))
    }
}

/// Interpret a yes/no answer
pub fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_uppercase().as_str() {
        "" => default,
        "Y" | "YES" => true,
        "N" | "NO" => false,
        _ => default,
    }
}

/// Interpret a review answer
///
/// ENTER or K keeps, X destroys, C skips, Q quits. Anything else is asked again.
pub fn parse_decision(answer: &str) -> Option<Decision> {
    match answer.trim().to_ascii_uppercase().as_str() {
        "" | "K" => Some(Decision::Keep),
        "X" => Some(Decision::Destroy),
        "C" => Some(Decision::Skip),
        "Q" => Some(Decision::Quit),
        _ => None,
    }
}

/// Review answers read from the terminal
pub struct ConsoleDecisionSource<'a> {
    console: &'a mut Console,
    formatter: &'a Formatter,
}

impl<'a> ConsoleDecisionSource<'a> {
    /// Decision source over an open console
    pub fn new(console: &'a mut Console, formatter: &'a Formatter) -> Self {
        Self { console, formatter }
    }
}

impl DecisionSource for ConsoleDecisionSource<'_> {
    fn decide(&mut self, item: &ReviewItem<'_>) -> io::Result<Decision> {
        println!();
        println!("{}", self.formatter.review_item(item));
        loop {
            let Some(answer) = self.console.read_line("> ")? else {
                return Ok(Decision::Quit);
            };
            match parse_decision(&answer) {
                Some(Decision::Destroy) => {
                    println!("{}", self.formatter.warning("DELETE"));
                    return Ok(Decision::Destroy);
                }
                Some(Decision::Skip) => {
                    println!("{}", self.formatter.info("LATER"));
                    return Ok(Decision::Skip);
                }
                Some(decision) => return Ok(decision),
                None => println!("{}", self.formatter.warning("Use ENTER, X, C or Q")),
            }
        }
    }
}

/// Credential values read from the terminal
pub struct ConsoleCredentialPrompt<'a> {
    console: &'a mut Console,
}

impl<'a> ConsoleCredentialPrompt<'a> {
    /// Prompt over an open console
    pub fn new(console: &'a mut Console) -> Self {
        Self { console }
    }
}

impl CredentialPrompt for ConsoleCredentialPrompt<'_> {
    fn ask(&mut self, field: &'static str) -> io::Result<String> {
        let label = field.replace('_', " ");
        self.console
            .read_line(&format!("{}: ", label))?
            .ok_or_else(|| io::Error::new(io::ErrorKind::Interrupted, "credential entry aborted"))
    }
}
