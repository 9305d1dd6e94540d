//! End-to-end behavior of `Companion::handle` against a stub generator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use calmind::prelude::*;

/// Answers each stage with a fixed fragment; counts calls; optionally fails
/// one stage or returns a call-numbered fragment.
struct StubGenerator {
    fragments: [&'static str; 4],
    failing: Option<StageKind>,
    numbered: bool,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn new(fragments: [&'static str; 4]) -> Self {
        Self {
            fragments,
            failing: None,
            numbered: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(mut self, stage: StageKind) -> Self {
        self.failing = Some(stage);
        self
    }

    fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for StubGenerator {
    fn generate<'a>(&'a self, context: &'a str, _prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let stage = StageKind::ALL
                .into_iter()
                .find(|s| context.contains(s.persona().role))
                .expect("context names a persona");
            if self.failing == Some(stage) {
                return Err(ClientError::Http {
                    status: 401,
                    body: "invalid api key".into(),
                });
            }
            let fragment = self.fragments[stage.index()];
            if self.numbered {
                Ok(format!("[{fragment}#{n}]"))
            } else {
                Ok(fragment.to_string())
            }
        })
    }
}

fn companion(stub: &Arc<StubGenerator>) -> Companion {
    let generator: Arc<dyn TextGenerator> = stub.clone();
    Companion::new(
        Pipeline::new(generator)
            .with_stage_timeout(Duration::from_secs(5))
            .with_event_handler(Arc::new(NoopHandler)),
    )
}

#[tokio::test]
async fn anxious_scenario_composes_in_stage_order() {
    let stub = Arc::new(StubGenerator::new([
        "anxious",
        " try deep breathing",
        "you are enough",
        "want to talk more?",
    ]));
    let reply = companion(&stub)
        .handle("I feel really anxious about tomorrow")
        .await
        .unwrap();

    let expected = format!(
        "anxious try deep breathingyou are enoughwant to talk more?{}",
        MoodMarker::Anxious.emoji()
    );
    assert_eq!(reply.text(), expected);
    assert_eq!(stub.calls(), 4);
}

#[tokio::test]
async fn boundary_of_four_characters() {
    let stub = Arc::new(StubGenerator::new(["a", "b", "c", "d"]));
    let companion = companion(&stub);

    assert!(companion.handle("abc").await.unwrap().is_clarification());
    assert!(companion.handle("      ").await.unwrap().is_clarification());
    assert_eq!(stub.calls(), 0);

    let reply = companion.handle("abcd").await.unwrap();
    assert_eq!(reply.text(), "abcd🌿");
    assert_eq!(stub.calls(), 4);
}

#[tokio::test]
async fn mixed_keywords_resolve_to_the_earlier_rule() {
    let stub = Arc::new(StubGenerator::new(["a", "b", "c", "d"]));
    let reply = companion(&stub).handle("I feel sad but calm").await.unwrap();
    assert_eq!(reply.mood(), Some(MoodMarker::Sad));
    assert!(reply.text().ends_with("😢"));
}

#[tokio::test]
async fn failed_stage_fails_the_whole_request() {
    let stub = Arc::new(StubGenerator::new(["a", "b", "c", "d"]).failing(StageKind::Affirmation));
    let err = companion(&stub)
        .handle("everything feels heavy today")
        .await
        .unwrap_err();
    assert_eq!(err.stage, StageKind::Affirmation);
    assert!(!err.cause.is_transient());
    assert!(err.to_string().starts_with("affirmation stage failed"));
}

#[tokio::test]
async fn repeated_calls_keep_the_same_shape() {
    let stub = Arc::new(StubGenerator::new(["E", "C", "A", "G"]).numbered());
    let companion = companion(&stub);

    for _ in 0..3 {
        let reply = companion.handle("a peaceful evening walk").await.unwrap();
        let text = reply.text();

        // Four fragments, in stage order, then exactly one marker.
        let positions: Vec<usize> = ["[E#", "[C#", "[A#", "[G#"]
            .iter()
            .map(|tag| text.find(tag).expect("fragment present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches('[').count(), 4);
        assert!(text.ends_with("]🧘"));
        assert_eq!(text.matches("🧘").count(), 1);
    }
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let stub = Arc::new(StubGenerator::new(["E", "C", "A", "G"]));
    let companion = Arc::new(companion(&stub));

    let mut handles = Vec::new();
    for msg in ["I am so happy", "I am so angry", "I am so nervous"] {
        let companion = companion.clone();
        handles.push(tokio::spawn(async move { companion.handle(msg).await }));
    }

    let mut texts = Vec::new();
    for handle in handles {
        texts.push(handle.await.unwrap().unwrap().into_text());
    }
    assert_eq!(texts, ["ECAG😊", "ECAG😡", "ECAG😰"]);
    assert_eq!(stub.calls(), 12);
}
