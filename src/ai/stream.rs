//! Streaming Response Accumulation
//!
//! Consumes an ordered sequence of text fragments from a remote call and
//! assembles them into a single result, forwarding each fragment to
//! registered observers as it arrives.
//!
//! ## Guarantees
//!
//! - Fragments are processed strictly in delivery order; observers are
//!   notified synchronously before the next fragment is consumed
//! - On mid-stream failure the partial buffer is preserved inside the
//!   returned `QuillError::Stream` and stays readable via `partial()`
//! - Dropping the collect future drops the source stream, which closes the
//!   underlying connection (RAII); no observer fires after cancellation
//!
//! What counts as appendable text is a parameter of `collect_with`, so the
//! same loop serves any event shape the remote service produces.

use futures::{Stream, StreamExt};

use crate::types::{QuillError, Result};

/// Observer notified for each fragment, in arrival order
pub trait FragmentObserver: Send {
    fn on_fragment(&mut self, fragment: &str);
}

impl<F> FragmentObserver for F
where
    F: FnMut(&str) + Send,
{
    fn on_fragment(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Final accumulated output of one streamed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedText {
    /// Ordered concatenation of all fragments
    pub text: String,
    /// Character count of the full text
    pub chars: usize,
}

/// Assembles streamed fragments into a complete result.
///
/// One accumulator serves one logical call; independent calls own
/// independent accumulators.
#[derive(Default)]
pub struct StreamAccumulator {
    buffer: String,
    observers: Vec<Box<dyn FragmentObserver>>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for live fragment delivery
    pub fn observe(&mut self, observer: impl FragmentObserver + 'static) -> &mut Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Text assembled so far. After a failed collect this is the partial
    /// output, useful for diagnostics.
    pub fn partial(&self) -> &str {
        &self.buffer
    }

    fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        for observer in &mut self.observers {
            observer.on_fragment(fragment);
        }
    }

    /// Consume a stream of events, appending whatever `classify` extracts.
    ///
    /// `classify` decides which events carry appendable text; everything
    /// else (pings, completion markers) is skipped. The stream ends on its
    /// natural end-of-stream, at which point the full text is returned.
    pub async fn collect_with<S, Item, E, C>(
        &mut self,
        stream: S,
        classify: C,
    ) -> Result<AccumulatedText>
    where
        S: Stream<Item = std::result::Result<Item, E>>,
        E: std::fmt::Display,
        C: for<'a> Fn(&'a Item) -> Option<&'a str>,
    {
        futures::pin_mut!(stream);

        while let Some(event) = stream.next().await {
            match event {
                Ok(item) => {
                    if let Some(fragment) = classify(&item) {
                        self.push(fragment);
                    }
                }
                Err(e) => {
                    return Err(QuillError::stream(e.to_string(), self.buffer.clone()));
                }
            }
        }

        Ok(AccumulatedText {
            chars: self.buffer.chars().count(),
            text: self.buffer.clone(),
        })
    }

    /// Convenience form for streams of plain text fragments
    pub async fn collect<S, E>(&mut self, stream: S) -> Result<AccumulatedText>
    where
        S: Stream<Item = std::result::Result<String, E>>,
        E: std::fmt::Display,
    {
        self.collect_with(stream, |fragment: &String| Some(fragment.as_str()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::sync::{Arc, Mutex};

    fn ok(s: &str) -> std::result::Result<String, String> {
        Ok(s.to_string())
    }

    #[tokio::test]
    async fn test_fragments_concatenate_in_order() {
        let mut acc = StreamAccumulator::new();
        let source = stream::iter(vec![ok("ab"), ok("cd"), ok("ef")]);

        let result = acc.collect(source).await.unwrap();
        assert_eq!(result.text, "abcdef");
        assert_eq!(result.chars, 6);
    }

    #[tokio::test]
    async fn test_observers_see_each_fragment_in_order() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut acc = StreamAccumulator::new();
        acc.observe(move |fragment: &str| {
            sink.lock().unwrap().push(fragment.to_string());
        });

        let source = stream::iter(vec![ok("ab"), ok("cd"), ok("ef")]);
        acc.collect(source).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["ab", "cd", "ef"]);
    }

    #[tokio::test]
    async fn test_mid_stream_error_preserves_partial() {
        let mut acc = StreamAccumulator::new();
        let source = stream::iter(vec![
            ok("ab"),
            ok("cd"),
            Err("connection reset".to_string()),
            ok("never delivered"),
        ]);

        let err = acc.collect(source).await.unwrap_err();
        match &err {
            QuillError::Stream { message, partial } => {
                assert_eq!(partial, "abcd");
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected stream error, got {:?}", other),
        }
        // Also readable from the accumulator itself
        assert_eq!(acc.partial(), "abcd");
    }

    #[tokio::test]
    async fn test_no_fragments_after_error() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut acc = StreamAccumulator::new();
        acc.observe(move |fragment: &str| {
            sink.lock().unwrap().push(fragment.to_string());
        });

        let source = stream::iter(vec![ok("ab"), Err("boom".to_string()), ok("cd")]);
        let _ = acc.collect(source).await;

        assert_eq!(*seen.lock().unwrap(), vec!["ab"]);
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_result() {
        let mut acc = StreamAccumulator::new();
        let source = stream::iter(Vec::<std::result::Result<String, String>>::new());

        let result = acc.collect(source).await.unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.chars, 0);
    }

    #[tokio::test]
    async fn test_classification_filters_events() {
        #[derive(Debug)]
        enum Event {
            Text(String),
            Ping,
            Done,
        }

        let mut acc = StreamAccumulator::new();
        let source = stream::iter(vec![
            Ok::<_, String>(Event::Text("hello ".into())),
            Ok(Event::Ping),
            Ok(Event::Text("world".into())),
            Ok(Event::Done),
        ]);

        let result = acc
            .collect_with(source, |event| match event {
                Event::Text(t) => Some(t.as_str()),
                Event::Ping | Event::Done => None,
            })
            .await
            .unwrap();

        assert_eq!(result.text, "hello world");
    }

    #[tokio::test]
    async fn test_dropping_collect_stops_observers_and_closes_stream() {
        use futures::channel::mpsc;

        let (tx, rx) = mpsc::unbounded();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut acc = StreamAccumulator::new();
        acc.observe(move |fragment: &str| {
            sink.lock().unwrap().push(fragment.to_string());
        });

        let mut fut = Box::pin(acc.collect(rx));
        tx.unbounded_send(ok("ab")).unwrap();
        // One poll consumes the buffered fragment, then parks on the channel
        assert!(futures::poll!(fut.as_mut()).is_pending());
        drop(fut);

        // The source stream went down with the future, closing the channel
        assert!(tx.is_closed());
        let _ = tx.unbounded_send(ok("cd"));

        assert_eq!(acc.partial(), "ab");
        assert_eq!(*seen.lock().unwrap(), vec!["ab"]);
    }

    #[tokio::test]
    async fn test_multiple_observers_all_notified() {
        let a: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));
        let b: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));

        let mut acc = StreamAccumulator::new();
        let sink_a = Arc::clone(&a);
        acc.observe(move |f: &str| sink_a.lock().unwrap().push_str(f));
        let sink_b = Arc::clone(&b);
        acc.observe(move |f: &str| sink_b.lock().unwrap().push_str(f));

        let source = stream::iter(vec![ok("x"), ok("y")]);
        acc.collect(source).await.unwrap();

        assert_eq!(*a.lock().unwrap(), "xy");
        assert_eq!(*b.lock().unwrap(), "xy");
    }
}
