use rand::{SeedableRng, rngs::StdRng};

use super::BlockTrainer;
use crate::{
    Result,
    arch::{Sequential, activations::ActFn, layers::Dense},
    dataset::Dataset,
    specs::{ActFnSpec, LayerSpec, ModelSpec, TrainerSpec},
};

/// Builds `BlockTrainer`s given a specification.
#[derive(Debug, Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `BlockTrainer` and its dataset following a spec.
    ///
    /// The trainer has no source bound, the dataset is meant to be fed through
    /// `BlockTrainer::learn_dataset` or wrapped in a `CyclicSource`.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    ///
    /// # Returns
    /// The trainer and the dataset, or an error if any part of the spec is invalid.
    pub fn build(&self, spec: &TrainerSpec) -> Result<(BlockTrainer<Sequential>, Dataset)> {
        let mut rng = self.generate_rng(spec.seed);
        let model = self.resolve_model(&spec.model, &mut rng)?;
        let dataset = Dataset::try_from(&spec.dataset)?;
        let trainer = BlockTrainer::new(model, spec.trainer)?;

        Ok((trainer, dataset))
    }

    fn resolve_model(&self, spec: &ModelSpec, rng: &mut StdRng) -> Result<Sequential> {
        match spec {
            ModelSpec::Sequential {
                layers: layer_specs,
            } => {
                let layers = layer_specs
                    .iter()
                    .map(|ls| self.resolve_layer(*ls, rng))
                    .collect::<Result<Vec<_>>>()?;

                Ok(Sequential::new(layers)?)
            }
        }
    }

    fn resolve_layer(&self, spec: LayerSpec, rng: &mut StdRng) -> Result<Dense> {
        match spec {
            LayerSpec::Dense { dim, act_fn, init } => {
                Dense::init(dim, self.resolve_act_fn(act_fn), init, rng)
            }
        }
    }

    fn resolve_act_fn(&self, spec: Option<ActFnSpec>) -> Option<ActFn> {
        spec.map(|act_fn| match act_fn {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
        })
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
