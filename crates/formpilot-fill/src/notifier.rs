//! [`RunNotifier`] implementations.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use formpilot_protocols::{EngineEvent, RunNotifier, RunReport};

/// Logs run results.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl RunNotifier for TracingNotifier {
    fn run_complete(&self, report: &RunReport) {
        info!(
            run_id = %report.run_id,
            fields_filled = report.fields_filled,
            files_uploaded = report.files_uploaded,
            skipped = report.skipped,
            "Autofill finished"
        );
        for message in &report.errors {
            warn!(run_id = %report.run_id, "{}", message);
        }
    }

    fn run_failed(&self, message: &str) {
        error!("Autofill failed: {}", message);
    }
}

/// Forwards run results as [`EngineEvent`]s.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            warn!("Run notification dropped; receiver closed");
        }
    }
}

impl RunNotifier for ChannelNotifier {
    fn run_complete(&self, report: &RunReport) {
        self.send(EngineEvent::RunComplete(report.clone()));
    }

    fn run_failed(&self, message: &str) {
        self.send(EngineEvent::Error {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        let report = RunReport::new();
        notifier.run_complete(&report);
        notifier.run_failed("boom");

        assert_eq!(rx.try_recv().unwrap(), EngineEvent::RunComplete(report));
        assert_eq!(
            rx.try_recv().unwrap(),
            EngineEvent::Error {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_channel_notifier_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.run_failed("nobody listening");
    }
}
