//! Mining pipelines over ingested graphs.
//!
//! Two orchestration shapes, each with a plain and a refined variant:
//! - model-wide: one graph per input model, one reference graph out.
//! - per-viewpoint: a graph per named view of each model; every view name
//!   seen anywhere runs as an independent mining problem over the models
//!   that contain it, producing one reference graph per view.

use indexmap::{IndexMap, IndexSet};
use tracing::{info, warn};

use ream_core::ModelGraph;

use crate::cost::CostParams;
use crate::error::MineError;
use crate::mcc::{aggregate_graphs, MccEngine, MiningOutcome};
use crate::refpa;

/// The named viewpoint graphs of one input model.
#[derive(Debug, Clone, Default)]
pub struct ModelViews {
    pub model: String,
    pub views: IndexMap<String, ModelGraph>,
}

impl ModelViews {
    pub fn new(model: impl Into<String>) -> Self {
        ModelViews {
            model: model.into(),
            views: IndexMap::new(),
        }
    }

    /// Moves a named view out of this model.
    pub fn take_view(&mut self, view: &str) -> Result<ModelGraph, MineError> {
        self.views
            .shift_remove(view)
            .ok_or_else(|| MineError::ViewNotFound {
                view: view.to_string(),
                model: self.model.clone(),
            })
    }
}

/// Aggregates `graphs` and runs the consensus engine over the result.
pub fn mine_reference(graphs: &mut [ModelGraph], params: &CostParams) -> MiningOutcome {
    let (nodes, edges) = aggregate_graphs(graphs, params);
    MccEngine::new(nodes, edges, *params).run()
}

/// Mines a reference graph, then prunes it to common nodes and winning
/// clusters.
pub fn refine_reference(graphs: &mut [ModelGraph], params: &CostParams) -> MiningOutcome {
    let mut outcome = mine_reference(graphs, params);
    refpa::refine(&mut outcome.reference, &outcome.nodes, graphs);
    outcome
}

/// Runs the plain pipeline once per view name, in first-seen order.
pub fn mine_views(models: Vec<ModelViews>, params: &CostParams) -> IndexMap<String, MiningOutcome> {
    views_pipeline(models, params, false)
}

/// Runs the refined pipeline once per view name, in first-seen order.
pub fn refine_views(
    models: Vec<ModelViews>,
    params: &CostParams,
) -> IndexMap<String, MiningOutcome> {
    views_pipeline(models, params, true)
}

fn views_pipeline(
    mut models: Vec<ModelViews>,
    params: &CostParams,
    refine: bool,
) -> IndexMap<String, MiningOutcome> {
    let mut names: IndexSet<String> = IndexSet::new();
    for model in &models {
        for name in model.views.keys() {
            names.insert(name.clone());
        }
    }

    let mut results: IndexMap<String, MiningOutcome> = IndexMap::new();
    for name in names {
        // Each view is an independent problem over the models that have it;
        // a model without this view is skipped, not an error.
        let mut groups: Vec<ModelGraph> = Vec::new();
        for model in models.iter_mut() {
            match model.take_view(&name) {
                Ok(graph) => groups.push(graph),
                Err(error) => warn!(%error, "model skipped for viewpoint"),
            }
        }
        info!(view = %name, models = groups.len(), "mining viewpoint");
        let mut outcome = mine_reference(&mut groups, params);
        if refine {
            refpa::refine(&mut outcome.reference, &outcome.nodes, &mut groups);
        }
        results.insert(name, outcome);
    }
    results
}
