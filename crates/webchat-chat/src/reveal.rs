use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Delay between prefix emissions; purely for the visible typing effect
pub const REVEAL_DELAY: Duration = Duration::from_millis(3);

/// Where revealed prefixes go: in-memory state, the remote store, a terminal
#[async_trait]
pub trait RevealSink: Send {
    /// Apply the next prefix of the response
    ///
    /// Sinks handle their own failures; a lost store update must not stop
    /// the reveal.
    async fn apply_prefix(&mut self, prefix: &str);
}

/// Sink that discards every prefix
pub struct NullSink;

#[async_trait]
impl RevealSink for NullSink {
    async fn apply_prefix(&mut self, _prefix: &str) {}
}

/// How a reveal pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    Cancelled,
}

/// Lazy sequence of char-boundary prefixes of `text`, shortest first
///
/// For a response of N characters this yields exactly N prefixes, the last
/// one being the full string.
pub fn prefixes(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices().map(move |(i, c)| &text[..i + c.len_utf8()])
}

/// Reveal `text` to `sink` one character at a time with a fixed delay
///
/// Emissions are strictly increasing in prefix length and single in-flight:
/// the next prefix is not produced until the sink finished applying the
/// previous one. Cancellation is checked before every emission.
pub async fn reveal(
    text: &str,
    sink: &mut dyn RevealSink,
    delay: Duration,
    cancel: &CancellationToken,
) -> RevealOutcome {
    for prefix in prefixes(text) {
        if cancel.is_cancelled() {
            return RevealOutcome::Cancelled;
        }

        sink.apply_prefix(prefix).await;

        tokio::select! {
            _ = cancel.cancelled() => return RevealOutcome::Cancelled,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    RevealOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct RecordingSink {
        seen: Vec<String>,
    }

    #[async_trait]
    impl RevealSink for RecordingSink {
        async fn apply_prefix(&mut self, prefix: &str) {
            self.seen.push(prefix.to_string());
        }
    }

    #[test]
    fn prefixes_emit_one_per_character() {
        let all: Vec<&str> = prefixes("Hi!").collect();
        assert_eq!(all, vec!["H", "Hi", "Hi!"]);
    }

    #[test]
    fn prefixes_respect_char_boundaries() {
        let all: Vec<&str> = prefixes("Olá").collect();
        assert_eq!(all, vec!["O", "Ol", "Olá"]);
    }

    #[test]
    fn prefixes_of_empty_text_are_empty() {
        assert_eq!(prefixes("").count(), 0);
    }

    #[tokio::test]
    async fn reveal_emits_every_prefix_in_increasing_order() {
        let mut sink = RecordingSink { seen: Vec::new() };
        let cancel = CancellationToken::new();

        let outcome = reveal("Olá!", &mut sink, Duration::ZERO, &cancel).await;

        assert_eq!(outcome, RevealOutcome::Completed);
        assert_eq!(sink.seen, vec!["O", "Ol", "Olá", "Olá!"]);
        assert!(sink
            .seen
            .windows(2)
            .all(|w| w[0].chars().count() < w[1].chars().count()));
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_reveal_before_any_emission() {
        let mut sink = RecordingSink { seen: Vec::new() };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = reveal("hello", &mut sink, Duration::ZERO, &cancel).await;

        assert_eq!(outcome, RevealOutcome::Cancelled);
        assert!(sink.seen.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_mid_stream_stops_further_emissions() {
        struct CancelAfter {
            seen: Vec<String>,
            cancel_at: usize,
            cancel: CancellationToken,
        }

        #[async_trait]
        impl RevealSink for CancelAfter {
            async fn apply_prefix(&mut self, prefix: &str) {
                self.seen.push(prefix.to_string());
                if self.seen.len() == self.cancel_at {
                    self.cancel.cancel();
                }
            }
        }

        let cancel = CancellationToken::new();
        let mut sink = CancelAfter {
            seen: Vec::new(),
            cancel_at: 2,
            cancel: cancel.clone(),
        };

        let outcome = reveal("hello", &mut sink, REVEAL_DELAY, &cancel).await;

        assert_eq!(outcome, RevealOutcome::Cancelled);
        assert_eq!(sink.seen, vec!["h", "he"]);
    }
}
