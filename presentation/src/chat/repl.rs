//! Line-based interactive chat

use super::runner::TurnRunner;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive chat reading one message per line from stdin
pub struct ChatRepl {
    runner: TurnRunner,
    prompt: bool,
}

enum Command {
    Quit,
    Help,
    Info,
    Unknown,
}

impl ChatRepl {
    pub fn new(runner: TurnRunner) -> Self {
        Self {
            runner,
            prompt: true,
        }
    }

    /// Set whether to print the welcome banner and prompt
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run until EOF or `/quit`. Returns the number of failed turns.
    pub async fn run(&self) -> std::io::Result<usize> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut failures = 0;

        if self.prompt {
            self.print_welcome();
        }

        loop {
            if self.prompt {
                eprint!("{} ", ">>>".cyan());
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                match Self::parse_command(line) {
                    Command::Quit => break,
                    Command::Help => Self::print_help(),
                    Command::Info => self.print_info(),
                    Command::Unknown => {
                        eprintln!("Unknown command: {}", line);
                        eprintln!("Type /help for available commands");
                    }
                }
                continue;
            }

            if let Err(e) = self.runner.run(line).await {
                failures += 1;
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }

        if self.prompt {
            eprintln!("Bye!");
        }
        Ok(failures)
    }

    fn parse_command(line: &str) -> Command {
        match line {
            "/quit" | "/exit" | "/q" => Command::Quit,
            "/help" | "/h" | "/?" => Command::Help,
            "/info" | "/mode" => Command::Info,
            _ => Command::Unknown,
        }
    }

    fn print_welcome(&self) {
        eprintln!();
        eprintln!("{}", "rasa-bridge chat".cyan().bold());
        self.print_info();
        Self::print_help();
    }

    fn print_info(&self) {
        let session = self.runner.session();
        eprintln!(
            "Mode: {} ({})  Sender: {}",
            session.mode(),
            session.mode().description(),
            session.sender()
        );
    }

    fn print_help() {
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  /help, /h, /?    - Show this help");
        eprintln!("  /info, /mode     - Show mode and sender");
        eprintln!("  /quit, /exit, /q - Exit chat");
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(ChatRepl::parse_command("/q"), Command::Quit));
        assert!(matches!(ChatRepl::parse_command("/help"), Command::Help));
        assert!(matches!(ChatRepl::parse_command("/mode"), Command::Info));
        assert!(matches!(ChatRepl::parse_command("/nope"), Command::Unknown));
    }
}
