//! Ordered handoff of status events to the presentation context

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::StatusEvent;

/// Receives status events on the presentation context
pub trait StatusSink: Send + 'static {
    fn deliver(&mut self, event: &StatusEvent);
}

/// Receiving half of the status channel
pub type StatusReceiver = mpsc::UnboundedReceiver<StatusEvent>;

/// Sending half of the status channel
///
/// Sending never blocks or waits on the sink. The channel is unbounded so
/// events are neither dropped nor coalesced when presentation falls behind.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusSender {
    /// Queue an event for presentation
    pub fn emit(&self, event: StatusEvent) {
        debug!(%event, "emitting status event");
        if self.tx.send(event).is_err() {
            warn!("status presenter gone, event dropped");
        }
    }
}

/// Create a linked status sender and receiver
pub fn channel() -> (StatusSender, StatusReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusSender { tx }, rx)
}

/// Deliver events to `sink` in emission order until every sender is dropped
pub async fn present<S: StatusSink>(mut sink: S, mut rx: StatusReceiver) -> S {
    while let Some(event) = rx.recv().await {
        sink.deliver(&event);
    }
    info!("status presenter stopped");
    sink
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LoopState;

    #[derive(Default)]
    struct Collect(Vec<StatusEvent>);

    impl StatusSink for Collect {
        fn deliver(&mut self, event: &StatusEvent) {
            self.0.push(event.clone());
        }
    }

    #[tokio::test]
    async fn test_present_preserves_order() {
        let (tx, rx) = channel();
        let presenter = tokio::spawn(present(Collect::default(), rx));

        for i in 0..100 {
            tx.emit(StatusEvent::new(LoopState::ListeningHotword, i.to_string()));
        }
        tx.emit(StatusEvent::stopped());
        drop(tx);

        let sink = presenter.await.unwrap();
        assert_eq!(sink.0.len(), 101);
        for (i, event) in sink.0.iter().take(100).enumerate() {
            assert_eq!(event.message, i.to_string());
        }
        assert_eq!(sink.0[100], StatusEvent::stopped());
    }

    #[test]
    fn test_emit_without_presenter_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit(StatusEvent::stopped());
    }
}
