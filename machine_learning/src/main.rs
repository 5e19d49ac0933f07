use std::{env, fs};

use log::{debug, info};
use machine_learning::{
    MlErr, Result,
    specs::{StopSpec, TrainerSpec},
    training::{TrainerBuilder, source::CyclicSource},
};

const SPEC_VAR: &str = "TRAINER_SPEC";

fn main() -> Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var(SPEC_VAR).ok())
        .ok_or_else(|| {
            MlErr::Io(std::io::Error::other(format!(
                "usage: machine_learning <spec.json> (or set {SPEC_VAR})"
            )))
        })?;

    let spec: TrainerSpec = serde_json::from_str(&fs::read_to_string(&path)?)?;
    info!(path = path.as_str(); "loaded trainer spec");

    let (mut trainer, dataset) = TrainerBuilder::new().build(&spec)?;
    trainer.on_block_done(|blocks_done, mean_error| {
        debug!(blocks_done = blocks_done, mean_error = mean_error; "block done");
    });

    let error = match spec.stop {
        StopSpec::Dataset => trainer.learn_dataset(dataset.inputs(), dataset.targets())?,
        StopSpec::Blocks { count } => {
            let (inputs, targets) = dataset.into_parts();
            trainer.set_source(CyclicSource::new(inputs, targets)?);
            trainer.learn_blocks(count)?
        }
        StopSpec::Error { threshold } => {
            let (inputs, targets) = dataset.into_parts();
            trainer.set_source(CyclicSource::new(inputs, targets)?);
            trainer.learn_to_error(threshold)?
        }
    };

    info!(
        blocks_done = trainer.blocks_done(),
        examples_done = trainer.examples_done(),
        mean_error = error;
        "training finished"
    );

    for (i, layer) in trainer.model().layers().iter().enumerate() {
        println!("layer {i} weights: {}", layer.weights());
        println!("layer {i} biases: {}", layer.biases());
    }

    Ok(())
}
