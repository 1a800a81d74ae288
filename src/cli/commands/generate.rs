//! `siteforge generate`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use camino::{Utf8Component, Utf8Path};
use tracing::{info, warn};

use siteforge_engine::InMemoryStore;
use siteforge_llm::ProviderRouter;
use siteforge_progress::encode;
use siteforge_utils::types::GeneratedFile;

use crate::{
    CancelHandle, Config, GenerationOrchestrator, GenerationRequest, ProgressEmitter,
    ProgressEvent,
};

pub async fn execute_generate_command(
    prompt: &str,
    out: Option<&Path>,
    wire: bool,
    config: &Config,
) -> Result<()> {
    let router = ProviderRouter::from_config(config).context("Failed to set up provider router")?;
    let orchestrator = GenerationOrchestrator::new(Arc::new(router), config)
        .with_store(Arc::new(InMemoryStore::new()));
    let request =
        GenerationRequest::new(prompt).with_provider_override(config.provider_override.clone());

    let cancel = CancelHandle::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling generation");
                cancel.cancel();
            }
        })
    };

    let (emitter, mut rx) = ProgressEmitter::channel();
    let printer = tokio::spawn(async move {
        let mut finished = None;
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::Step(step) if !wire => println!("{step}"),
                ProgressEvent::Finished(log) => finished = Some(log),
                _ => {}
            }
        }
        finished
    });

    let result = orchestrator.run(&request, &emitter, &cancel).await;
    drop(emitter);
    interrupt.abort();
    let finished = printer.await.context("Progress printer stopped unexpectedly")?;

    if wire && let Some(log) = &finished {
        println!("{}", encode(log)?);
    }

    let outcome = result?;
    if let Some(dir) = out {
        write_files(dir, &outcome.files)?;
        info!(dir = %dir.display(), files = outcome.files.len(), "Project written");
    }
    if !wire {
        println!(
            "✓ {} files generated ({} components from templates, {} design regenerations)",
            outcome.files.len(),
            outcome.fallback_components,
            outcome.regenerations
        );
        match out {
            Some(dir) => println!("  Written to {}", dir.display()),
            None => println!("  Pass --out <DIR> to write them to disk"),
        }
    }
    Ok(())
}

/// Write files under `dir`; paths must stay inside it.
fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<()> {
    let root = Utf8Path::from_path(dir)
        .with_context(|| format!("Output directory is not valid UTF-8: {}", dir.display()))?;
    for file in files {
        let relative = Utf8Path::new(&file.path);
        if relative.as_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Utf8Component::Normal(_)))
        {
            bail!("Refusing to write outside the output directory: {}", file.path);
        }
        let target = root.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {parent}"))?;
        }
        std::fs::write(&target, &file.content)
            .with_context(|| format!("Failed to write {target}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_files_creates_nested_paths() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            GeneratedFile::new("package.json", "{}"),
            GeneratedFile::new("src/components/Hero.tsx", "export default function Hero() {}"),
        ];
        write_files(dir.path(), &files).unwrap();
        assert!(dir.path().join("src/components/Hero.tsx").is_file());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_write_files_rejects_escape() {
        let dir = TempDir::new().unwrap();
        for path in ["../evil.js", "/etc/passwd", "src/../../x"] {
            let files = vec![GeneratedFile::new(path, "x")];
            assert!(write_files(dir.path(), &files).is_err(), "{path} accepted");
        }
    }

}
