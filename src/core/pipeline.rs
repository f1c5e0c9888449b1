//! Workflow to deployment manifest pipeline
//!
//! Stages: extract nodes, optionally clone their repositories, infer model
//! paths, then look up model download URLs. Each stage reports a
//! [`PipelineEvent`] to the caller; a failed run ends with an `error` event.

use crate::core::inference::ModelPathInference;
use crate::core::workflow::{extract_nodes, transform_nodes};
use crate::error::Result;
use crate::models::deployment::{DeployedModel, DeploymentManifest, DeploymentSummary, PipelineEvent, PipelineStatus};
use crate::models::manifest::{InferenceRequest, Workflow};
use crate::resolve::channels::RepoResolver;
use crate::resolve::clone::RepoCloner;
use crate::resolve::url_cache::ModelFinder;
use chrono::Utc;
use tracing::{debug, info};

/// Turns workflows into deployment manifests
pub struct DeploymentPipeline {
    resolver: Box<dyn RepoResolver>,
    inference: ModelPathInference,
    finder: ModelFinder,
    cloner: Option<RepoCloner>,
}

impl DeploymentPipeline {
    pub fn new(resolver: Box<dyn RepoResolver>, inference: ModelPathInference, finder: ModelFinder) -> Self {
        Self {
            resolver,
            inference,
            finder,
            cloner: None,
        }
    }

    /// Clone missing repositories before inference
    pub fn with_cloner(mut self, cloner: RepoCloner) -> Self {
        self.cloner = Some(cloner);
        self
    }

    /// Run every stage without progress reporting
    pub fn run(&mut self, workflow: &Workflow) -> Result<DeploymentManifest> {
        self.run_with_events(workflow, |_| {})
    }

    /// Run every stage, passing progress events to `on_event`
    pub fn run_with_events<F>(&mut self, workflow: &Workflow, mut on_event: F) -> Result<DeploymentManifest>
    where
        F: FnMut(&PipelineEvent),
    {
        let mut emit = |status: PipelineStatus, message: String, progress: f64| {
            let event = PipelineEvent::new(status, message, progress);
            debug!("Pipeline event: {:?}", event);
            on_event(&event);
        };

        let result = self.run_stages(workflow, &mut emit);
        if let Err(err) = &result {
            emit(PipelineStatus::Error, err.user_message(), 100.0);
        }
        result
    }

    fn run_stages(
        &mut self,
        workflow: &Workflow,
        emit: &mut dyn FnMut(PipelineStatus, String, f64),
    ) -> Result<DeploymentManifest> {
        emit(PipelineStatus::Extracting, "Extracting nodes...".to_string(), 0.0);
        let nodes = extract_nodes(workflow, self.resolver.as_ref());
        let manifest = transform_nodes(&nodes);

        emit(PipelineStatus::Cloning, "Cloning repositories...".to_string(), 25.0);
        if let Some(cloner) = &self.cloner {
            // Per-repository failures are absorbed by the cloner itself
            let summary = cloner.materialize(&manifest.repos)?;
            info!(
                "Repositories: {} cloned, {} present, {} failed",
                summary.cloned.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
        }

        emit(PipelineStatus::Inferring, "Inferring model paths...".to_string(), 50.0);
        let report = self.inference.infer(&InferenceRequest::from(&manifest))?;

        let total = report.models.len();
        let mut models = Vec::with_capacity(total);
        for (i, record) in report.models.into_iter().enumerate() {
            let current = i + 1;
            emit(
                PipelineStatus::Searching,
                format!("Finding model {}/{}: {}", current, total, record.filename),
                current as f64 / total as f64 * 100.0,
            );
            let url = self.finder.find(&record.filename);
            models.push(DeployedModel { record, url });
        }

        let summary = DeploymentSummary::build(&manifest.repos, &models);
        emit(PipelineStatus::Complete, "Processing complete".to_string(), 100.0);

        Ok(DeploymentManifest {
            generated_at: Utc::now(),
            node_types: manifest.node_types,
            unmapped_nodes: manifest.unmapped_nodes,
            repos: manifest.repos,
            models,
            summary,
        })
    }
}
