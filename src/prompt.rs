//! Interactive input.
//!
//! The core never reads the terminal itself; it asks a [`Prompter`]. The CLI
//! passes a [`TerminalPrompter`], tests and scripted callers pass a
//! [`ScriptedPrompter`].

use crate::error::{KsError, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use zeroize::Zeroizing;

/// Source of answers to the questions the core needs to ask.
pub trait Prompter {
    /// Ask for a secret. The answer must not be echoed.
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Ask for a line of plain text. An empty answer selects `default`.
    fn line(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(rpassword::prompt_password(prompt)?))
    }

    fn line(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut stderr = io::stderr();
        match default {
            Some(value) if !value.is_empty() => write!(stderr, "{} [{}]: ", prompt, value)?,
            _ => write!(stderr, "{}: ", prompt)?,
        }
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim_end_matches(['\r', '\n']).to_string();

        Ok(with_default(answer, default))
    }
}

/// Replays a fixed list of answers in order.
///
/// Running out of answers is an error rather than a hang, which keeps
/// non-interactive callers from blocking.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter that returns `answers` one by one.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// The prompts shown so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            KsError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for prompt {:?}", prompt),
            ))
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        self.next_answer(prompt).map(Zeroizing::new)
    }

    fn line(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next_answer(prompt)?;
        Ok(with_default(answer, default))
    }
}

fn with_default(answer: String, default: Option<&str>) -> String {
    match default {
        Some(value) if answer.trim().is_empty() => value.to_string(),
        _ => answer,
    }
}

/// Ask for a new secret twice and return it if both entries agree.
///
/// Disagreement yields [`KsError::PasswordMismatch`]; whether to ask again is
/// up to the caller.
pub fn new_password(prompter: &mut dyn Prompter, label: &str) -> Result<Zeroizing<String>> {
    let first = prompter.secret(&format!("Enter new {}: ", label))?;
    let second = prompter.secret(&format!("Confirm {}: ", label))?;

    if *first != *second {
        return Err(KsError::PasswordMismatch);
    }

    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let mut prompter = ScriptedPrompter::new(["one", "two"]);
        assert_eq!(prompter.line("first", None).unwrap(), "one");
        assert_eq!(prompter.secret("second").unwrap().as_str(), "two");
        assert_eq!(prompter.asked(), ["first", "second"]);
    }

    #[test]
    fn test_scripted_exhausted_is_error() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        match prompter.line("anything", None) {
            Err(KsError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_empty_line_takes_default() {
        let mut prompter = ScriptedPrompter::new(["", "given"]);
        assert_eq!(prompter.line("cn", Some("previous")).unwrap(), "previous");
        assert_eq!(prompter.line("cn", Some("previous")).unwrap(), "given");
    }

    #[test]
    fn test_new_password_match() {
        let mut prompter = ScriptedPrompter::new(["changeit", "changeit"]);
        let password = new_password(&mut prompter, "store password").unwrap();
        assert_eq!(password.as_str(), "changeit");
        assert_eq!(prompter.asked()[0], "Enter new store password: ");
    }

    #[test]
    fn test_new_password_mismatch() {
        let mut prompter = ScriptedPrompter::new(["changeit", "changeme"]);
        match new_password(&mut prompter, "store password") {
            Err(KsError::PasswordMismatch) => {}
            _ => panic!("Expected PasswordMismatch"),
        }
    }
}
