use std::io::{self, BufRead, Write};

const YES: [&str; 2] = ["y", "yes"];
const NO: [&str; 2] = ["n", "no"];

/// Interactive input the orchestrator blocks on.
pub trait UserPrompt {
    /// Show `message` and return one line of input without its line ending.
    fn read_line(&mut self, message: &str) -> io::Result<String>;
}

/// Reads answers from the controlling terminal.
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn read_line(&mut self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{message}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// Ask until the answer is one of the accepted yes/no tokens.
pub fn yes_no(prompt: &mut impl UserPrompt, question: &str) -> io::Result<bool> {
    loop {
        let answer = prompt.read_line(&format!("{question} | (Y)es/(N)o: "))?;
        let answer = answer.trim().to_ascii_lowercase();
        if YES.contains(&answer.as_str()) {
            return Ok(true);
        }
        if NO.contains(&answer.as_str()) {
            return Ok(false);
        }
    }
}

/// Ask for the version currently installed; blank answers are asked again.
pub fn current_version(prompt: &mut impl UserPrompt) -> io::Result<String> {
    loop {
        let answer = prompt.read_line(
            "-> Please provide your current server files version. Example(s): \"latest\", \"0.1.12\"\n   Enter version: ",
        )?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_owned());
        }
    }
}

#[cfg(test)]
pub(crate) struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_owned()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl UserPrompt for ScriptedPrompt {
    fn read_line(&mut self, message: &str) -> io::Result<String> {
        self.asked.push(message.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer"))
    }
}
