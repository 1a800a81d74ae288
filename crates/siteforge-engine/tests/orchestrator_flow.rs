//! End-to-end runs of the orchestrator against a scripted provider gateway.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use siteforge_config::Config;
use siteforge_engine::{
    CancelHandle, GenerationOrchestrator, GenerationRequest, InMemoryStore, IntentAnalyzer,
    PersistenceStore, ProgressEmitter, ProgressEvent,
};
use siteforge_llm::{
    BackendDescriptor, BackendKind, ProviderGateway, ProviderRequest, ProviderResponse,
};
use siteforge_progress::{GenerationLog, GenerationLogStep, StepKind};
use siteforge_utils::types::TaskCategory;
use siteforge_utils::{GenerationError, LogError, ProviderError};

type Responder =
    Box<dyn Fn(&BackendDescriptor, &ProviderRequest) -> Result<String, ProviderError> + Send + Sync>;

/// Gateway whose answers come from a closure, with real exhaustion tracking.
struct ScriptedGateway {
    backends: Vec<BackendDescriptor>,
    responder: Responder,
    exhausted: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, TaskCategory)>>,
    on_code_request: Option<CancelHandle>,
}

impl ScriptedGateway {
    fn new(ids: &[&str], responder: Responder) -> Self {
        let backends = ids
            .iter()
            .map(|id| BackendDescriptor {
                id: (*id).to_string(),
                kind: BackendKind::OpenAi,
                base_url: format!("http://{id}.invalid"),
                model: "test-model".to_string(),
                api_key: Some("test-key".to_string()),
                max_tokens: 1024,
                temperature: 0.7,
            })
            .collect();
        Self {
            backends,
            responder,
            exhausted: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            on_code_request: None,
        }
    }

    fn cancelling_on_code(mut self, cancel: CancelHandle) -> Self {
        self.on_code_request = Some(cancel);
        self
    }

    fn calls_to(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(b, _)| b == id).count()
    }
}

#[async_trait]
impl ProviderGateway for ScriptedGateway {
    async fn candidates(
        &self,
        category: TaskCategory,
        _override_id: Option<&str>,
    ) -> Result<Vec<BackendDescriptor>, ProviderError> {
        let exhausted = self.exhausted.lock().unwrap();
        let chain: Vec<_> = self
            .backends
            .iter()
            .filter(|b| !exhausted.contains(&b.id))
            .cloned()
            .collect();
        if chain.is_empty() {
            return Err(ProviderError::NoProviderAvailable { category });
        }
        Ok(chain)
    }

    async fn execute_request(
        &self,
        backend: &BackendDescriptor,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((backend.id.clone(), request.category));
        if request.category == TaskCategory::Code
            && let Some(cancel) = &self.on_code_request
        {
            cancel.cancel();
        }
        (self.responder)(backend, request).map(|content| ProviderResponse {
            content,
            backend: backend.id.clone(),
            model: backend.model.clone(),
        })
    }

    fn mark_exhausted(&self, backend_id: &str) {
        self.exhausted.lock().unwrap().insert(backend_id.to_string());
    }
}

fn all_down() -> Responder {
    Box::new(|backend, _| {
        Err(ProviderError::Transport {
            backend: backend.id.clone(),
            message: "connection refused".to_string(),
        })
    })
}

const MANIFEST_REPLY: &str = r#"Here is the analysis:
{"core":{"goal":"fill tables with online booking","industry":"restaurant","subCategory":"trattoria"},
 "audience":{"ageRange":"25-60","income":"middle","values":["family"]},
 "content":{"sections":["hero","menu","footer"],"tone":"inviting"},
 "design":{"personality":"warm, rustic","layoutStyle":"image-led"},
 "market":{"competitors":["Olive Garden"],"differentiators":["nonna's recipes"]}}"#;

fn healthy() -> Responder {
    Box::new(|_, request| {
        Ok(match request.category {
            TaskCategory::Prose => "A family trattoria in Leeds wants a warm site.".to_string(),
            TaskCategory::Analysis => MANIFEST_REPLY.to_string(),
            _ => "```tsx\nexport default function Section() {\n  return <section />;\n}\n```"
                .to_string(),
        })
    })
}

fn seeded_config() -> Config {
    let mut config = Config::minimal_for_testing();
    config.design.seed = Some(42);
    config
}

async fn drain(mut rx: tokio::sync::mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn finished_log(events: &[ProgressEvent]) -> GenerationLog {
    events
        .iter()
        .find_map(|e| match e {
            ProgressEvent::Finished(log) => Some(log.clone()),
            _ => None,
        })
        .expect("finished event")
}

/// Test that a run with every backend down still completes from fallbacks
#[tokio::test]
async fn test_providers_down_still_produces_full_project() {
    let gateway = Arc::new(ScriptedGateway::new(&["a", "b"], all_down()));
    let orchestrator = GenerationOrchestrator::new(gateway, &seeded_config());
    let (emitter, rx) = ProgressEmitter::channel();

    let outcome = orchestrator
        .run(
            &GenerationRequest::new("skate shop, dark and edgy"),
            &emitter,
            &CancelHandle::new(),
        )
        .await
        .unwrap();
    drop(emitter);
    let events = drain(rx).await;

    assert_eq!(outcome.manifest.industry, "skate-shop");
    assert_eq!(outcome.fallback_components, outcome.manifest.sections.len());
    assert!(outcome.log.is_complete());
    assert_eq!(outcome.log.last().unwrap().kind, StepKind::Complete);

    let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
    for expected in ["package.json", "tailwind.config.js", "src/App.tsx", "design-manifest.json"] {
        assert!(paths.contains(&expected), "missing {expected}");
    }
    assert!(paths.contains(&"src/components/Hero.tsx"));
    assert_eq!(finished_log(&events), outcome.log);
}

/// Test that healthy backends produce backend-authored components and manifest
#[tokio::test]
async fn test_healthy_run_uses_backend_output() {
    let gateway = Arc::new(ScriptedGateway::new(&["primary"], healthy()));
    let orchestrator = GenerationOrchestrator::new(gateway.clone(), &seeded_config());

    let outcome = orchestrator
        .run(
            &GenerationRequest::new("italian restaurant"),
            &ProgressEmitter::disabled(),
            &CancelHandle::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.manifest.sub_category, "trattoria");
    assert_eq!(outcome.manifest.sections, vec!["hero", "menu", "footer"]);
    assert_eq!(outcome.fallback_components, 0);
    // 5 base files, 3 components, App, design manifest
    assert_eq!(outcome.files.len(), 10);
    assert_eq!(outcome.log.count(StepKind::Summary), 1);
    assert_eq!(outcome.log.count(StepKind::Image), 1);
    // prose + analysis + three components
    assert_eq!(gateway.calls_to("primary"), 5);

    let thoughts: Vec<&str> = outcome
        .log
        .steps()
        .iter()
        .filter(|s| s.kind == StepKind::Thought)
        .map(|s| s.message.as_str())
        .collect();
    assert!(thoughts.iter().any(|t| t.starts_with("Expanded brief")));
}

/// Test that steps are tagged with stages in pipeline order
#[tokio::test]
async fn test_stage_order_in_log() {
    let gateway = Arc::new(ScriptedGateway::new(&["primary"], healthy()));
    let orchestrator = GenerationOrchestrator::new(gateway, &seeded_config());
    let outcome = orchestrator
        .run(
            &GenerationRequest::new("italian restaurant"),
            &ProgressEmitter::disabled(),
            &CancelHandle::new(),
        )
        .await
        .unwrap();

    let mut stages: Vec<&str> = Vec::new();
    for step in outcome.log.steps() {
        let stage = step.stage().unwrap();
        if stages.last() != Some(&stage) {
            stages.push(stage);
        }
    }
    assert_eq!(
        stages,
        [
            "enhancing-prompt",
            "analyzing-intent",
            "drafting-design-brief",
            "generating-assets",
            "scaffolding-project",
            "generating-components",
            "assembling-app",
            "finalizing",
            "complete",
        ]
    );
}

/// Test that a run with no configured backend fails with a terminal error step
#[tokio::test]
async fn test_no_backend_is_fatal() {
    let gateway = Arc::new(ScriptedGateway::new(&[], all_down()));
    let orchestrator = GenerationOrchestrator::new(gateway, &seeded_config());
    let (emitter, rx) = ProgressEmitter::channel();

    let err = orchestrator
        .run(&GenerationRequest::new("a cafe"), &emitter, &CancelHandle::new())
        .await
        .unwrap_err();
    drop(emitter);
    let log = finished_log(&drain(rx).await);

    assert!(matches!(
        err,
        GenerationError::ProviderUnavailable(ProviderError::NoProviderAvailable {
            category: TaskCategory::Code
        })
    ));
    assert!(log.is_complete());
    assert_eq!(log.last().unwrap().kind, StepKind::Error);
    assert_eq!(log.count(StepKind::File), 0);
}

/// Test that cancellation seals the log with no further file or thought steps
#[tokio::test]
async fn test_cancellation_during_components() {
    let cancel = CancelHandle::new();
    let gateway =
        Arc::new(ScriptedGateway::new(&["primary"], healthy()).cancelling_on_code(cancel.clone()));
    let orchestrator = GenerationOrchestrator::new(gateway, &seeded_config());
    let (emitter, rx) = ProgressEmitter::channel();

    let err = orchestrator
        .run(&GenerationRequest::new("italian restaurant"), &emitter, &cancel)
        .await
        .unwrap_err();
    drop(emitter);
    let log = finished_log(&drain(rx).await);

    assert!(matches!(err, GenerationError::Cancelled { ref stage } if stage == "generating-components"));
    assert!(log.is_complete());
    assert_eq!(log.last().unwrap().kind, StepKind::Error);
    let writing_hero = log
        .steps()
        .iter()
        .position(|s| s.message == "Writing Hero")
        .unwrap();
    assert!(
        log.steps()[writing_hero + 1..]
            .iter()
            .all(|s| s.kind == StepKind::Error)
    );
    assert!(
        !log.steps()
            .iter()
            .filter_map(|s| s.generated_file())
            .any(|f| f.path.starts_with("src/components/"))
    );
}

/// Test that a cancelled handle stops the run before any work
#[tokio::test]
async fn test_cancelled_before_start() {
    let gateway = Arc::new(ScriptedGateway::new(&["primary"], healthy()));
    let orchestrator = GenerationOrchestrator::new(gateway.clone(), &seeded_config());
    let cancel = CancelHandle::new();
    cancel.cancel();

    let err = orchestrator
        .run(&GenerationRequest::new("a cafe"), &ProgressEmitter::disabled(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled { .. }));
    assert_eq!(gateway.calls_to("primary"), 0);
}

/// Test that a 429 marks the backend exhausted so later requests skip it
#[tokio::test]
async fn test_quota_exhaustion_skips_backend_for_rest_of_run() {
    let responder: Responder = Box::new(|backend, request| {
        if backend.id == "metered" {
            return Err(ProviderError::RequestFailed {
                backend: backend.id.clone(),
                status: 429,
                body: "quota".to_string(),
            });
        }
        (healthy())(backend, request)
    });
    let gateway = Arc::new(ScriptedGateway::new(&["metered", "spare"], responder));
    let orchestrator = GenerationOrchestrator::new(gateway.clone(), &seeded_config());

    let outcome = orchestrator
        .run(
            &GenerationRequest::new("italian restaurant"),
            &ProgressEmitter::disabled(),
            &CancelHandle::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.fallback_components, 0);
    assert_eq!(gateway.calls_to("metered"), 1);
    assert_eq!(gateway.calls_to("spare"), 5);
}

/// Test that checkpoints reach the persistence collaborator
#[tokio::test]
async fn test_snapshot_is_persisted() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(ScriptedGateway::new(&["primary"], healthy()));
    let orchestrator =
        GenerationOrchestrator::new(gateway, &seeded_config()).with_store(store.clone());

    let outcome = orchestrator
        .run(
            &GenerationRequest::new("italian restaurant"),
            &ProgressEmitter::disabled(),
            &CancelHandle::new(),
        )
        .await
        .unwrap();

    let snapshot = store.load(outcome.run_id).await.unwrap().unwrap();
    assert!(snapshot.log.is_complete());
    assert_eq!(snapshot.files.len(), outcome.files.len());
    assert_eq!(snapshot.brief.as_ref(), Some(&outcome.brief));
}

/// Test that a persisted run reloads into an idle log but not into a live one
#[tokio::test]
async fn test_reload_restores_persisted_log_unless_in_flight() {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(ScriptedGateway::new(&["primary"], healthy()));
    let orchestrator =
        GenerationOrchestrator::new(gateway, &seeded_config()).with_store(store.clone());

    let outcome = orchestrator
        .run(
            &GenerationRequest::new("italian restaurant"),
            &ProgressEmitter::disabled(),
            &CancelHandle::new(),
        )
        .await
        .unwrap();

    let mut viewer = GenerationLog::new();
    let snapshot = orchestrator.reload(outcome.run_id, &mut viewer).await.unwrap();
    assert_eq!(viewer, outcome.log);
    assert_eq!(snapshot.files.len(), outcome.files.len());

    let mut live = GenerationLog::new();
    live.push(GenerationLogStep::plan("Generating a site")).unwrap();
    live.push(GenerationLogStep::thought("Reading the prompt")).unwrap();
    let err = orchestrator
        .reload(outcome.run_id, &mut live)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Log(LogError::RunInFlight { steps: 2 })));
    assert_eq!(live.len(), 2);

    let missing = orchestrator
        .reload(uuid::Uuid::new_v4(), &mut GenerationLog::new())
        .await
        .unwrap_err();
    assert!(matches!(missing, GenerationError::Reload { .. }));
}

/// Test that repeated restaurant runs on one orchestrator trigger regeneration
#[tokio::test]
async fn test_repeated_runs_avoid_duplicates() {
    let gateway = Arc::new(ScriptedGateway::new(&["a"], all_down()));
    let orchestrator = GenerationOrchestrator::new(gateway, &seeded_config());
    let mut regenerations = 0;
    for _ in 0..11 {
        let outcome = orchestrator
            .run(
                &GenerationRequest::new("a warm neighbourhood restaurant"),
                &ProgressEmitter::disabled(),
                &CancelHandle::new(),
            )
            .await
            .unwrap();
        regenerations += outcome.regenerations;
    }
    assert!(regenerations >= 1);
}

/// Test that the analyzer classifies by keyword when providers are down
#[tokio::test]
async fn test_analyzer_heuristic_when_providers_down() {
    let gateway = Arc::new(ScriptedGateway::new(&["a"], all_down()));
    let analysis = IntentAnalyzer::new(gateway)
        .analyze_intent("skate shop, dark and edgy", "skate shop, dark and edgy")
        .await;
    assert!(analysis.is_heuristic());
    assert_eq!(analysis.manifest.industry, "skate-shop");
    assert_eq!(analysis.manifest.personality, "dark, edgy");
}
