//! Chunk-invariance and replay tests for the progress wire format.

use proptest::prelude::*;
use siteforge_progress::{
    GenerationLog, GenerationLogStep, LogStreamDecoder, StepKind, decode, decode_partial, encode,
};
use siteforge_utils::types::GeneratedFile;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64);
    ProptestConfig::with_cases(cases)
}

fn step_strategy() -> impl Strategy<Value = GenerationLogStep> {
    let message = "[a-zA-Z0-9 {}\\[\\]\"\\\\:,éü☕]{0,24}";
    prop_oneof![
        message.prop_map(GenerationLogStep::plan),
        message.prop_map(GenerationLogStep::thought),
        message.prop_map(GenerationLogStep::text),
        (message, "[a-z]{1,8}").prop_map(|(m, name)| {
            GenerationLogStep::file(m, GeneratedFile::new(format!("src/{name}.tsx"), "<div>{x}</div>"))
        }),
        (message, "[a-z]{1,8}")
            .prop_map(|(m, id)| GenerationLogStep::image(m, format!("https://img.example/{id}"))),
    ]
}

fn log_strategy() -> impl Strategy<Value = GenerationLog> {
    (prop::collection::vec(step_strategy(), 0..8), any::<bool>()).prop_map(|(steps, done)| {
        let mut log = GenerationLog::new();
        for step in steps {
            log.push(step).unwrap();
        }
        if done {
            log.complete("done", 10).unwrap();
        }
        log
    })
}

fn stream_decode(bytes: &[u8], splits: &[usize]) -> (Vec<GenerationLogStep>, bool) {
    let mut cuts: Vec<usize> = splits.iter().map(|s| s % (bytes.len() + 1)).collect();
    cuts.sort_unstable();
    let mut decoder = LogStreamDecoder::new();
    let mut steps = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(bytes.len())) {
        steps.extend(decoder.push(&bytes[start..cut]).unwrap());
        start = cut;
    }
    steps.extend(decoder.finish().unwrap());
    (steps, decoder.is_complete())
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_stream_decode_is_chunk_invariant(
        log in log_strategy(),
        splits in prop::collection::vec(any::<usize>(), 0..6),
    ) {
        let wire = encode(&log).unwrap();
        let (steps, complete) = stream_decode(wire.as_bytes(), &splits);
        prop_assert_eq!(&steps, log.steps());
        prop_assert_eq!(complete, log.is_complete());
    }

    #[test]
    fn prop_partial_decode_yields_a_prefix(log in log_strategy(), cut in any::<usize>()) {
        let wire = encode(&log).unwrap();
        let mut end = cut % (wire.len() + 1);
        while !wire.is_char_boundary(end) {
            end -= 1;
        }
        // Prefix shorter than the start of the array has no payload yet
        if let Ok(partial) = decode_partial(&wire[..end]) {
            prop_assert!(partial.steps.len() <= log.len());
            prop_assert_eq!(&partial.steps[..], &log.steps()[..partial.steps.len()]);
        }
    }

    #[test]
    fn prop_decode_is_deterministic(log in log_strategy()) {
        let wire = encode(&log).unwrap();
        prop_assert_eq!(decode(&wire).unwrap(), decode(&wire).unwrap());
    }
}

/// Test that a consumer can replay a sealed log and see the terminal step last
#[test]
fn test_replay_of_cancelled_run() {
    let mut log = GenerationLog::new();
    log.push(GenerationLogStep::plan("Generating 3 components")).unwrap();
    log.open(GenerationLogStep::thought("Drafting hero")).unwrap();
    log.extend(" with a split layout").unwrap();
    log.fail("Generation cancelled during generating-components").unwrap();

    let replayed = decode(&encode(&log).unwrap()).unwrap();
    assert!(replayed.is_complete());
    assert_eq!(replayed.last().unwrap().kind, StepKind::Error);
    assert_eq!(replayed.steps()[1].message, "Drafting hero with a split layout");
    assert!(!replayed.steps()[1].in_progress);
}

/// Test that the payload decodes the same with and without the prefix
#[test]
fn test_prefix_is_optional() {
    let mut log = GenerationLog::new();
    log.push(GenerationLogStep::summary("3 files")).unwrap();
    let wire = encode(&log).unwrap();
    let bare = wire.trim_start_matches("CHAIN:");
    assert_eq!(decode(&wire).unwrap(), decode(bare).unwrap());
    assert_eq!(decode_partial(bare).unwrap().steps, log.steps());
}
