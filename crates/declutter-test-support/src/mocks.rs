//! Recording log sink for asserting on organizer output.

use std::sync::{Arc, Mutex, PoisonError};

/// Collects every message passed to its sink closure.
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure suitable for any `Fn(&str)` log sink seam.
    #[must_use]
    pub fn sink(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let messages = Arc::clone(&self.messages);
        move |message: &str| {
            messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_string());
        }
    }

    /// Copy of all recorded messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded messages starting with `prefix`.
    #[must_use]
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.messages()
            .iter()
            .filter(|message| message.starts_with(prefix))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_arrival_order() {
        let recorder = RecordingSink::new();
        let sink = recorder.sink();
        sink("Creating folder: 2024");
        sink("Moved: a.txt");
        sink("Creating folder: 01-January");

        assert_eq!(recorder.messages().len(), 3);
        assert_eq!(recorder.messages()[1], "Moved: a.txt");
        assert_eq!(recorder.count_prefix("Creating folder:"), 2);
    }
}
