//! Staged generation pipeline.
//!
//! One run walks the stages in [`Stage`] order, appending steps to its
//! [`GenerationLog`] and mirroring each step onto a progress channel. The run
//! checks the cancellation flag before every step; once it is set no further
//! work is done and the log is sealed with an `error` step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use siteforge_config::{Config, GenerationConfig};
use siteforge_design::{DesignBrief, DesignDirector, DirectorSettings};
use siteforge_extraction::extract_code_block;
use siteforge_llm::{ProviderGateway, ProviderRequest};
use siteforge_progress::{GenerationLog, GenerationLogStep};
use siteforge_utils::logging::{log_stage_complete, log_stage_error, log_stage_start, stage_span};
use siteforge_utils::redaction::redact_error_message;
use siteforge_utils::types::{GeneratedFile, IntentManifest, TaskCategory};
use siteforge_utils::{GenerationError, ProviderError, UserFriendlyError};

use crate::collaborators::{AssetProvider, NoAssets, NoopStore, PersistenceStore, RunSnapshot};
use crate::dispatch::request_with_fallback;
use crate::fallback::{FallbackArtifactGenerator, component_name, component_path, fallback_image_url};
use crate::intent::{IntentAnalyzer, ManifestSource, PromptEnhancer};
use crate::scaffold::{app_file, base_files, design_manifest_file, validate_file_set};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    EnhancingPrompt,
    AnalyzingIntent,
    DraftingDesignBrief,
    GeneratingAssets,
    ScaffoldingProject,
    GeneratingComponents,
    AssemblingApp,
    Finalizing,
    Complete,
    Error,
}

/// What the caller drains from the progress channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A stage was entered.
    Stage(Stage),
    /// A step was appended to the log.
    Step(GenerationLogStep),
    /// The run ended; carries the sealed log.
    Finished(GenerationLog),
}

/// Sending half of the progress channel.
///
/// A dropped receiver is not an error; the run continues without observers.
#[derive(Debug, Clone, Default)]
pub struct ProgressEmitter {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressEmitter {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// An emitter with no receiver.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx
            && tx.send(event).is_err()
        {
            debug!("Progress receiver dropped");
        }
    }
}

/// Cooperative cancellation flag shared between a run and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// One generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Backend id tried before the category preferences.
    pub provider_override: Option<String>,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            provider_override: None,
        }
    }

    #[must_use]
    pub fn with_provider_override(mut self, id: Option<String>) -> Self {
        self.provider_override = id;
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub run_id: Uuid,
    pub manifest: IntentManifest,
    pub brief: DesignBrief,
    pub files: Vec<GeneratedFile>,
    pub log: GenerationLog,
    /// Components that came from the fallback generator.
    pub fallback_components: usize,
    pub regenerations: u32,
}

/// Mutable state of one run.
struct RunContext<'a> {
    run_id: Uuid,
    prompt: String,
    stage: Stage,
    log: GenerationLog,
    files: Vec<GeneratedFile>,
    manifest: Option<IntentManifest>,
    brief: Option<DesignBrief>,
    emitter: &'a ProgressEmitter,
    cancel: &'a CancelHandle,
}

impl<'a> RunContext<'a> {
    fn new(prompt: &str, emitter: &'a ProgressEmitter, cancel: &'a CancelHandle) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            stage: Stage::EnhancingPrompt,
            log: GenerationLog::new(),
            files: Vec::new(),
            manifest: None,
            brief: None,
            emitter,
            cancel,
        }
    }

    fn ensure_live(&self) -> Result<(), GenerationError> {
        if self.cancel.is_cancelled() {
            return Err(GenerationError::Cancelled {
                stage: self.stage.to_string(),
            });
        }
        Ok(())
    }

    fn enter(&mut self, stage: Stage) -> Result<(), GenerationError> {
        self.stage = stage;
        self.ensure_live()?;
        log_stage_start(&self.run_id.to_string(), stage.as_ref());
        self.emitter.send(ProgressEvent::Stage(stage));
        Ok(())
    }

    /// Append a step tagged with the current stage.
    fn emit(&mut self, step: GenerationLogStep) -> Result<(), GenerationError> {
        self.ensure_live()?;
        let step = step.with_stage(self.stage.as_ref());
        self.log.push(step.clone())?;
        self.emitter.send(ProgressEvent::Step(step));
        Ok(())
    }

    fn emit_file(&mut self, message: impl Into<String>, file: GeneratedFile) -> Result<(), GenerationError> {
        self.emit(GenerationLogStep::file(message, file.clone()))?;
        self.files.push(file);
        Ok(())
    }

    /// Seal the log with an `error` step. Bypasses the cancellation check.
    fn terminate(&mut self, err: &GenerationError) {
        let stage = self.stage;
        self.stage = Stage::Error;
        let message = redact_error_message(&err.user_message());
        let step = GenerationLogStep::error(message).with_stage(stage.as_ref());
        if self.log.push(step.clone()).is_ok() {
            self.emitter.send(ProgressEvent::Step(step));
        } else {
            self.log.seal();
        }
        self.emitter.send(ProgressEvent::Stage(Stage::Error));
    }

    fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            run_id: self.run_id,
            prompt: self.prompt.clone(),
            manifest: self.manifest.clone(),
            brief: self.brief.clone(),
            files: self.files.clone(),
            log: self.log.clone(),
            updated_at: Utc::now(),
        }
    }
}

/// Sequences enhancement, intent, design, assets, scaffolding, components,
/// assembly and finalization for each run.
///
/// The design history lives in the orchestrator, so reuse one instance across
/// runs for duplicate avoidance to work.
pub struct GenerationOrchestrator {
    gateway: Arc<dyn ProviderGateway>,
    store: Arc<dyn PersistenceStore>,
    assets: Arc<dyn AssetProvider>,
    director: Mutex<DesignDirector>,
    fallback: Mutex<FallbackArtifactGenerator>,
    settings: GenerationConfig,
}

impl GenerationOrchestrator {
    #[must_use]
    pub fn new(gateway: Arc<dyn ProviderGateway>, config: &Config) -> Self {
        let design = &config.design;
        let director = DesignDirector::new(DirectorSettings {
            similarity_threshold: design.similarity_threshold,
            history_window: design.history_window,
            history_capacity: design.history_capacity,
            max_regenerations: design.max_regenerations,
            seed: design.seed,
        });
        let fallback = match design.seed {
            Some(seed) => FallbackArtifactGenerator::with_seed(seed),
            None => FallbackArtifactGenerator::new(),
        };
        Self {
            gateway,
            store: Arc::new(NoopStore),
            assets: Arc::new(NoAssets),
            director: Mutex::new(director),
            fallback: Mutex::new(fallback),
            settings: config.generation.clone(),
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn PersistenceStore>) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn with_assets(mut self, assets: Arc<dyn AssetProvider>) -> Self {
        self.assets = assets;
        self
    }

    /// Run one generation to completion, cancellation, or failure.
    ///
    /// On failure the log is sealed with an `error` step, persisted, and sent
    /// as [`ProgressEvent::Finished`] before the error is returned.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        emitter: &ProgressEmitter,
        cancel: &CancelHandle,
    ) -> Result<GenerationOutcome, GenerationError> {
        let started = Instant::now();
        let mut run = RunContext::new(&request.prompt, emitter, cancel);
        info!(run_id = %run.run_id, "Generation started");

        match self.execute(request, &mut run, started).await {
            Ok((fallback_components, regenerations)) => {
                self.checkpoint(&run).await;
                emitter.send(ProgressEvent::Stage(Stage::Complete));
                emitter.send(ProgressEvent::Finished(run.log.clone()));
                info!(
                    run_id = %run.run_id,
                    files = run.files.len(),
                    duration_ms = elapsed_ms(started),
                    "Generation complete"
                );
                let (Some(manifest), Some(brief)) = (run.manifest, run.brief) else {
                    return Err(GenerationError::Assembly {
                        reason: "run finished without a manifest and brief".to_string(),
                    });
                };
                Ok(GenerationOutcome {
                    run_id: run.run_id,
                    manifest,
                    brief,
                    files: run.files,
                    log: run.log,
                    fallback_components,
                    regenerations,
                })
            }
            Err(err) => {
                log_stage_error(&run.run_id.to_string(), run.stage.as_ref(), &err.to_string());
                run.terminate(&err);
                self.checkpoint(&run).await;
                emitter.send(ProgressEvent::Finished(run.log.clone()));
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        request: &GenerationRequest,
        run: &mut RunContext<'_>,
        started: Instant,
    ) -> Result<(usize, u32), GenerationError> {
        let run_id = run.run_id.to_string();
        let override_id = request.provider_override.clone();

        // Enhancing prompt
        let t = Instant::now();
        run.enter(Stage::EnhancingPrompt)?;
        run.emit(GenerationLogStep::plan(format!(
            "Generating a site for: {}",
            request.prompt
        )))?;
        self.preflight(override_id.as_deref()).await?;
        let prompt = self
            .enhance_prompt(run, &request.prompt, override_id.clone())
            .instrument(stage_span(&run_id, Stage::EnhancingPrompt.as_ref()))
            .await?;
        log_stage_complete(&run_id, Stage::EnhancingPrompt.as_ref(), t.elapsed().as_millis());

        // Analyzing intent
        let t = Instant::now();
        run.enter(Stage::AnalyzingIntent)?;
        let analysis = IntentAnalyzer::new(Arc::clone(&self.gateway))
            .with_provider_override(override_id.clone())
            .analyze_intent(&prompt, &request.prompt)
            .instrument(stage_span(&run_id, Stage::AnalyzingIntent.as_ref()))
            .await;
        let manifest = analysis.manifest;
        match &analysis.source {
            ManifestSource::Backend { backend } => run.emit(GenerationLogStep::thought(format!(
                "{backend} read this as a {} site for {}",
                manifest.industry, manifest.goal
            )))?,
            ManifestSource::Heuristic { reason } => run.emit(GenerationLogStep::thought(format!(
                "Classified as {} from keywords ({reason})",
                manifest.industry
            )))?,
        }
        run.emit(GenerationLogStep::plan(format!(
            "Sections: {}",
            manifest.sections.join(", ")
        )))?;
        run.manifest = Some(manifest.clone());
        self.checkpoint(run).await;
        log_stage_complete(&run_id, Stage::AnalyzingIntent.as_ref(), t.elapsed().as_millis());

        // Drafting design brief
        let t = Instant::now();
        run.enter(Stage::DraftingDesignBrief)?;
        let mood = format!("{} {}", manifest.personality, manifest.tone);
        let draft = {
            let _span = stage_span(&run_id, Stage::DraftingDesignBrief.as_ref()).entered();
            self.director
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .draft(&manifest.industry, &manifest.personality, &mood, Some(&manifest))
        };
        if draft.regenerations > 0 {
            run.emit(GenerationLogStep::thought(format!(
                "First draft was too close to a recent {} design (similarity {:.2}); tried a {} direction instead",
                manifest.industry, draft.score.overall, draft.brief.personality
            )))?;
        }
        let brief = draft.brief;
        run.emit(GenerationLogStep::thought(format!(
            "{} direction: {} / {} on {}, {} hero",
            brief.style,
            brief.fonts.heading,
            brief.fonts.body,
            brief.palette.primary.base(),
            brief.layout.hero.variant
        )))?;
        run.brief = Some(brief.clone());
        log_stage_complete(&run_id, Stage::DraftingDesignBrief.as_ref(), t.elapsed().as_millis());

        // Generating assets
        let t = Instant::now();
        run.enter(Stage::GeneratingAssets)?;
        let image_url = self
            .hero_image(&manifest)
            .instrument(stage_span(&run_id, Stage::GeneratingAssets.as_ref()))
            .await;
        run.emit(GenerationLogStep::image("Hero image", image_url))?;
        log_stage_complete(&run_id, Stage::GeneratingAssets.as_ref(), t.elapsed().as_millis());

        // Scaffolding project
        let t = Instant::now();
        run.enter(Stage::ScaffoldingProject)?;
        let brand = self
            .fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .brand_name(&manifest.industry);
        for file in base_files(&brand, &brief)? {
            run.emit_file(format!("Created {}", file.path), file)?;
        }
        log_stage_complete(&run_id, Stage::ScaffoldingProject.as_ref(), t.elapsed().as_millis());

        // Generating components
        let t = Instant::now();
        run.enter(Stage::GeneratingComponents)?;
        let mut sections: Vec<String> = Vec::new();
        for section in &manifest.sections {
            if !sections.contains(section) {
                sections.push(section.clone());
            }
        }
        sections.truncate(self.settings.max_components);
        run.emit(GenerationLogStep::plan(format!(
            "Generating {} components",
            sections.len()
        )))?;
        let mut fallback_components = 0;
        for section in &sections {
            run.ensure_live()?;
            let name = component_name(section);
            run.emit(GenerationLogStep::thought(format!("Writing {name}")))?;
            let (file, used_fallback) = self
                .component(section, &brand, &manifest, &brief, override_id.as_deref())
                .instrument(stage_span(&run_id, Stage::GeneratingComponents.as_ref()))
                .await;
            if used_fallback {
                fallback_components += 1;
            }
            run.ensure_live()?;
            let message = if used_fallback {
                format!("Created {name} from the design template")
            } else {
                format!("Created {name}")
            };
            run.emit_file(message, file)?;
            self.checkpoint(run).await;
        }
        log_stage_complete(&run_id, Stage::GeneratingComponents.as_ref(), t.elapsed().as_millis());

        // Assembling app
        let t = Instant::now();
        run.enter(Stage::AssemblingApp)?;
        let app = app_file(&sections);
        validate_file_set(&[run.files.as_slice(), std::slice::from_ref(&app)].concat(), &sections)?;
        run.emit_file(format!("Assembled {} sections into App", sections.len()), app)?;
        log_stage_complete(&run_id, Stage::AssemblingApp.as_ref(), t.elapsed().as_millis());

        // Finalizing
        let t = Instant::now();
        run.enter(Stage::Finalizing)?;
        run.emit_file("Wrote design manifest", design_manifest_file(&manifest, &brief)?)?;
        run.emit(GenerationLogStep::summary(format!(
            "{} files for {brand}: {} components ({} from template), {} palette, {} / {} type",
            run.files.len(),
            sections.len(),
            fallback_components,
            brief.palette.primary.base(),
            brief.fonts.heading,
            brief.fonts.body
        )))?;
        log_stage_complete(&run_id, Stage::Finalizing.as_ref(), t.elapsed().as_millis());

        run.stage = Stage::Complete;
        run.ensure_live()?;
        let step = GenerationLogStep::complete(
            format!("Generated {} files", run.files.len()),
            elapsed_ms(started),
        );
        run.emit(step)?;

        Ok((fallback_components, draft.regenerations))
    }

    /// Components cannot be generated without a code backend.
    async fn preflight(&self, override_id: Option<&str>) -> Result<(), GenerationError> {
        match self.gateway.candidates(TaskCategory::Code, override_id).await {
            Ok(chain) if !chain.is_empty() => Ok(()),
            Ok(_) => Err(GenerationError::ProviderUnavailable(
                ProviderError::NoProviderAvailable {
                    category: TaskCategory::Code,
                },
            )),
            Err(e) => Err(GenerationError::ProviderUnavailable(e)),
        }
    }

    async fn enhance_prompt(
        &self,
        run: &mut RunContext<'_>,
        prompt: &str,
        override_id: Option<String>,
    ) -> Result<String, GenerationError> {
        if !self.settings.enhance_prompt {
            run.emit(GenerationLogStep::thought("Using the prompt as written"))?;
            return Ok(prompt.to_string());
        }
        let enhanced = PromptEnhancer::new(Arc::clone(&self.gateway))
            .with_provider_override(override_id)
            .enhance(prompt)
            .await;
        match enhanced {
            Some(text) => {
                run.emit(GenerationLogStep::thought(format!("Expanded brief: {text}")))?;
                Ok(text)
            }
            None => {
                run.emit(GenerationLogStep::thought(
                    "Could not expand the prompt; keeping the original",
                ))?;
                Ok(prompt.to_string())
            }
        }
    }

    async fn hero_image(&self, manifest: &IntentManifest) -> String {
        if self.settings.request_images {
            let query = format!("{} hero image, {}", manifest.industry, manifest.personality);
            match self.assets.request_image(&query).await {
                Ok(Some(url)) => return url,
                Ok(None) => debug!("Asset provider had no image"),
                Err(e) => warn!(error = %e, "Asset provider failed"),
            }
        }
        fallback_image_url(&manifest.industry).to_string()
    }

    /// One routed `code` request; falls back to the template on any failure.
    async fn component(
        &self,
        section: &str,
        brand: &str,
        manifest: &IntentManifest,
        brief: &DesignBrief,
        override_id: Option<&str>,
    ) -> (GeneratedFile, bool) {
        let request = ProviderRequest::new(
            TaskCategory::Code,
            component_prompt(section, brand, manifest, brief),
        );
        match request_with_fallback(self.gateway.as_ref(), &request, override_id).await {
            Ok(response) => {
                let code = extract_code_block(&response.content);
                if looks_like_component(&code) {
                    return (GeneratedFile::new(component_path(section), code), false);
                }
                warn!(backend = %response.backend, section, "Component reply had no usable code");
            }
            Err(e) => {
                warn!(section, error = %redact_error_message(&e.to_string()), "Component request failed");
            }
        }
        let file = self
            .fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .component(section, brand, brief, manifest);
        (file, true)
    }

    /// Load a persisted run and restore its log into `log`.
    ///
    /// Refused with `RunInFlight` while `log` is still recording a live run:
    /// more than one step and no terminal step yet.
    pub async fn reload(
        &self,
        run_id: Uuid,
        log: &mut GenerationLog,
    ) -> Result<RunSnapshot, GenerationError> {
        let snapshot = self
            .store
            .load(run_id)
            .await
            .map_err(|e| GenerationError::Reload {
                run_id: run_id.to_string(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| GenerationError::Reload {
                run_id: run_id.to_string(),
                reason: "no saved run with this id".to_string(),
            })?;
        log.restore(snapshot.log.clone())?;
        info!(
            run_id = %run_id,
            steps = log.len(),
            complete = log.is_complete(),
            "Run reloaded"
        );
        Ok(snapshot)
    }

    async fn checkpoint(&self, run: &RunContext<'_>) {
        if let Err(e) = self.store.save(run.run_id, &run.snapshot()).await {
            warn!(run_id = %run.run_id, error = %e, "Checkpoint failed; continuing in memory");
        }
    }
}

/// Milliseconds since `started`, saturating at `u64::MAX`.
fn elapsed_ms(started: Instant) -> u64 {
    millis_u64(started.elapsed())
}

fn millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn component_prompt(
    section: &str,
    brand: &str,
    manifest: &IntentManifest,
    brief: &DesignBrief,
) -> String {
    let layout = match section {
        "hero" => format!(
            "Hero layout: {} ({} aligned).",
            brief.layout.hero.variant, brief.layout.hero.alignment
        ),
        "features" => format!("Feature layout: {}.", brief.layout.features),
        "products" | "menu" | "pricing" | "gallery" => {
            format!("Collection layout: {}.", brief.layout.products)
        }
        "footer" => format!("Footer layout: {}.", brief.layout.footer),
        _ => String::new(),
    };
    format!(
        "Write the `{name}` section component for {brand}, a {industry} site whose goal is to {goal}.\n\
         Tone: {tone}. Personality: {personality}.\n\
         Style: {style}. Colors: primary {primary}, secondary {secondary}, accent {accent}, neutral {neutral}.\n\
         Fonts: headings '{heading}', body '{body}'. Spacing: {padding}, container {width}, radius {radius}.\n\
         {layout}\n\
         Export the component as the default export of a single .tsx file using Tailwind classes.",
        name = component_name(section),
        industry = manifest.industry,
        goal = manifest.goal,
        tone = manifest.tone,
        personality = manifest.personality,
        style = brief.style,
        primary = brief.palette.primary.base(),
        secondary = brief.palette.secondary.base(),
        accent = brief.palette.accent.base(),
        neutral = brief.palette.neutral.base(),
        heading = brief.fonts.heading,
        body = brief.fonts.body,
        padding = brief.spacing.section_padding,
        width = brief.spacing.container_width,
        radius = brief.spacing.border_radius,
    )
}

/// Minimal structural check on model output.
fn looks_like_component(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code.contains("export") && (code.contains("return") || code.contains("=>"))
}
