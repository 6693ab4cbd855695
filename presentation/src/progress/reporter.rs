//! Progress reporting for turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rasa_bridge_application::TurnProgressNotifier;
use rasa_bridge_domain::{ChannelKind, TurnPhase};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner while a turn waits for its channels
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    answered: Mutex<Vec<String>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            answered: Mutex::new(Vec::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_display_name(phase: TurnPhase) -> &'static str {
        match phase {
            TurnPhase::Idle => "Idle",
            TurnPhase::Dispatching => "Sending",
            TurnPhase::Collecting => "Waiting",
            TurnPhase::Merging => "Merging",
            TurnPhase::Emitting => "Done",
            TurnPhase::FlushingSpillover => "Flushing",
        }
    }

    fn clear(&self) {
        if let Some(pb) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_and_clear();
        }
        self.answered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_phase(&self, phase: TurnPhase, channels: &[ChannelKind]) {
        match phase {
            TurnPhase::Dispatching => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.set_prefix(Self::phase_display_name(phase));
                pb.enable_steady_tick(Duration::from_millis(100));
                *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
            }
            TurnPhase::Collecting => {
                if let Some(pb) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
                    pb.set_prefix(Self::phase_display_name(phase));
                    pb.set_message(
                        channels
                            .iter()
                            .map(|c| c.to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    );
                }
            }
            // Clear before anything is printed
            TurnPhase::Emitting => self.clear(),
            _ => {}
        }
    }

    fn on_channel_reply(&self, channel: ChannelKind, success: bool) {
        let mark = if success {
            format!("{} {}", "v".green(), channel)
        } else {
            format!("{} {}", "x".red(), channel)
        };
        let mut answered = self.answered.lock().unwrap_or_else(|e| e.into_inner());
        answered.push(mark);
        if let Some(pb) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            pb.set_message(answered.join("  "));
        }
    }

    fn on_turn_complete(&self, _success: bool) {
        self.clear();
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_phase(&self, phase: TurnPhase, channels: &[ChannelKind]) {
        if phase == TurnPhase::Dispatching {
            eprintln!(
                "{} {} ({})",
                "->".cyan(),
                ProgressReporter::phase_display_name(phase).bold(),
                channels
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    fn on_channel_reply(&self, channel: ChannelKind, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), channel);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_clears_on_emit() {
        let reporter = ProgressReporter::new();
        let channels = [ChannelKind::Understanding, ChannelKind::Response];
        reporter.on_phase(TurnPhase::Dispatching, &channels);
        reporter.on_phase(TurnPhase::Collecting, &channels);
        reporter.on_channel_reply(ChannelKind::Understanding, true);
        assert!(reporter.spinner.lock().unwrap().is_some());
        assert_eq!(reporter.answered.lock().unwrap().len(), 1);

        reporter.on_phase(TurnPhase::Emitting, &channels);
        assert!(reporter.spinner.lock().unwrap().is_none());
        assert!(reporter.answered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reporter_clears_on_failed_turn() {
        let reporter = ProgressReporter::new();
        reporter.on_phase(TurnPhase::Dispatching, &[ChannelKind::Response]);
        reporter.on_channel_reply(ChannelKind::Response, false);
        reporter.on_turn_complete(false);
        assert!(reporter.spinner.lock().unwrap().is_none());
    }
}
