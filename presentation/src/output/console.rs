//! Console output for deliveries

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use rasa_bridge_application::ReplySink;
use rasa_bridge_domain::{BotReply, Button, CombinedResponse, Delivery, NlpAnnotation, OutputFormat};
use std::io::Write;

/// Formats deliveries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one delivery as human-readable text
    pub fn format(delivery: &Delivery) -> String {
        match delivery {
            Delivery::Reply { channel, reply } => {
                Self::format_reply(&format!("{}", channel).cyan().bold().to_string(), reply)
            }
            Delivery::Combined(combined) => Self::format_combined(combined),
            Delivery::Spillover { channel, reply } => Self::format_reply(
                &format!("{} (extra)", channel).yellow().bold().to_string(),
                reply,
            ),
        }
    }

    /// Format as JSON
    pub fn format_json(delivery: &Delivery) -> String {
        serde_json::to_string(delivery).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_reply(label: &str, reply: &BotReply) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", label, Self::text_or_dash(reply.text.as_deref())));
        output.push_str(&Self::buttons(&reply.buttons));
        for url in &reply.media {
            output.push_str(&format!("  {} {}\n", "media:".dimmed(), url));
        }
        if let Some(nlp) = &reply.nlp {
            output.push_str(&Self::nlp(nlp));
        }
        output
    }

    fn format_combined(combined: &CombinedResponse) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "bot".cyan().bold(),
            Self::text_or_dash(combined.text.as_deref())
        ));
        output.push_str(&Self::buttons(&combined.buttons));
        if let Some(nlp) = &combined.nlp {
            output.push_str(&Self::nlp(nlp));
        }
        output
    }

    fn text_or_dash(text: Option<&str>) -> String {
        match text.filter(|t| !t.is_empty()) {
            Some(text) => text.to_string(),
            None => "-".dimmed().to_string(),
        }
    }

    fn buttons(buttons: &[Button]) -> String {
        buttons
            .iter()
            .map(|button| match &button.payload {
                Some(payload) => format!("  [{}] {}\n", button.text.green(), payload.dimmed()),
                None => format!("  [{}]\n", button.text.green()),
            })
            .collect()
    }

    fn nlp(nlp: &NlpAnnotation) -> String {
        let mut output = String::new();
        let intent = &nlp.intent;
        if intent.incomprehension {
            output.push_str(&format!(
                "  {} {}\n",
                "intent:".magenta(),
                "(not understood)".red()
            ));
        } else {
            output.push_str(&format!(
                "  {} {} {}\n",
                "intent:".magenta(),
                intent.name.as_deref().unwrap_or("-").bold(),
                intent
                    .confidence
                    .map(|c| format!("({:.2})", c))
                    .unwrap_or_default()
                    .dimmed()
            ));
        }
        for entity in &nlp.entities {
            output.push_str(&format!(
                "  {} {} = {}\n",
                "entity:".magenta(),
                entity.name,
                entity.value
            ));
        }
        output
    }
}

struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format(&self, delivery: &Delivery) -> String {
        ConsoleFormatter::format(delivery)
    }
}

struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, delivery: &Delivery) -> String {
        ConsoleFormatter::format_json(delivery)
    }
}

/// Prints every delivery to stdout as it is emitted.
pub struct ConsolePrinter {
    formatter: Box<dyn OutputFormatter>,
}

impl ConsolePrinter {
    pub fn new(format: OutputFormat) -> Self {
        let formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        };
        Self { formatter }
    }

    pub fn render(&self, delivery: &Delivery) -> String {
        self.formatter.format(delivery)
    }
}

impl ReplySink for ConsolePrinter {
    fn deliver(&self, delivery: Delivery) {
        let rendered = self.render(&delivery);
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", rendered.trim_end());
        let _ = stdout.flush();
    }
}
