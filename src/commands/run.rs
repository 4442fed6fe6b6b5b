// src/commands/run.rs

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    core::{
        config::{self, TestPlan},
        document::Document,
        matcher,
        params,
        runner::{RunLog, RunOptions, run_document},
        summary::RunReport,
    },
    infra::{self, engine::NbConvertEngine},
    reporting,
};

pub struct RunArgs {
    pub config: PathBuf,
    pub docs_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub engine: Option<String>,
    pub full_tracebacks: bool,
    pub export: bool,
}

/// Runs the whole test batch: every (document, configuration) pair in the
/// plan, strictly sequentially. Completion always ends with a printed
/// summary, even when every run fails; only configuration-time errors and
/// missing inlined references abort the batch.
pub async fn execute(args: RunArgs) -> Result<()> {
    let config_path = fs::canonicalize(&args.config).with_context(|| {
        format!("Failed to read test configuration: {}", args.config.display())
    })?;
    let plan = config::load_plan(&config_path)?;

    let docs_dir = match args.docs_dir {
        Some(dir) => fs::canonicalize(&dir)
            .with_context(|| format!("Documents directory not found: {}", dir.display()))?,
        None => config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ".".into()),
    };

    println!("Loading test plan from: {}", config_path.display());
    println!("Documents directory: {}", docs_dir.display());
    println!(
        "Connected hardware profiles: {}",
        plan.connected.len().to_string().yellow()
    );

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", args.output_dir.display())
    })?;
    copy_image_assets(&docs_dir, &args.output_dir)?;

    // CLI override wins over the plan's pinned engine command.
    let engine = match args.engine.as_deref().or(plan.engine_command.as_deref()) {
        Some(command) => NbConvertEngine::from_command(command)?,
        None => NbConvertEngine::new(),
    };

    let report = run_batch(
        &engine,
        &plan,
        &docs_dir,
        &args.output_dir,
        args.full_tracebacks,
        args.export,
    )
    .await?;

    // Transient project trees left behind by executions; absence is fine.
    infra::fs::remove_dir_ignore_missing(&docs_dir.join("projects"))?;

    reporting::print_summary(&report);
    Ok(())
}

async fn run_batch(
    engine: &NbConvertEngine,
    plan: &TestPlan,
    docs_dir: &Path,
    output_dir: &Path,
    full_tracebacks: bool,
    export: bool,
) -> Result<RunReport> {
    let mut report = RunReport::new();

    for (document_name, spec) in &plan.tutorials {
        for configuration in &spec.configurations {
            let Some(profile) = matcher::matching_connected(configuration, &plan.connected)
            else {
                // Not an error: unmatched pairs are excluded from all counts.
                continue;
            };

            let parameters = params::merge_parameter_layers(configuration, profile, spec);
            let options = RunOptions {
                serial_number: profile.serial_number.clone(),
                baud: spec.baud.or(profile.baud),
                allowable_exceptions: spec.allowable_exceptions.clone(),
                full_tracebacks,
            };

            let document_path = docs_dir.join(document_name);
            let mut log = RunLog::new();
            let (executed, outcome) =
                run_document(engine, &document_path, &options, &parameters, &mut log).await?;

            if outcome.passed() && export {
                export_document(
                    &executed,
                    output_dir,
                    &configuration.scope,
                    &configuration.target,
                    &mut log,
                )?;
            }

            report.record(
                document_name,
                &configuration.target,
                outcome.passed(),
                log.into_text(),
            );
        }
    }

    Ok(report)
}

/// Copies the documents tree's `img` asset directory into the output tree,
/// keeping the same relative directory. Skipped when the source is absent.
fn copy_image_assets(docs_dir: &Path, output_dir: &Path) -> Result<()> {
    let image_input_dir = docs_dir.join("img");
    if !image_input_dir.is_dir() {
        return Ok(());
    }
    print!("Copying over image files...");
    infra::fs::copy_dir_all(&image_input_dir, &output_dir.join("img"))?;
    println!("Done");
    Ok(())
}

/// Renders the executed document to both artifact formats, named from the
/// document's base name plus its scope/target suffix.
fn export_document(
    document: &Document,
    output_dir: &Path,
    scope: &str,
    target: &str,
    log: &mut RunLog,
) -> Result<()> {
    let base = format!("{}-{}-{}", document.file_stem(), scope, target);

    let rst_path = output_dir.join(format!("{}.rst", base));
    fs::write(&rst_path, reporting::render_rst(document))
        .with_context(|| format!("Failed to write artifact: {}", rst_path.display()))?;
    log.record(format!("Wrote to: {}", rst_path.display()));

    let html_path = output_dir.join(format!("{}.html", base));
    fs::write(&html_path, reporting::render_html(document))
        .with_context(|| format!("Failed to write artifact: {}", html_path.display()))?;
    log.record(format!("Wrote to: {}", html_path.display()));

    Ok(())
}
