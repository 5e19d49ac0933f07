use std::thread;

use machine_learning::{
    MlErr,
    arch::{Sequential, layers::Dense},
    specs::TrainerSpec,
    training::{
        BlockTrainer, TrainerBuilder, TrainerConfig,
        source::{CyclicSource, Extractor, PullSource, QueueSource},
    },
};
use ml_core::Example;
use ndarray::{Array2, array};

/// Deterministic inputs in `[-1, 1]`.
fn x_at(i: u64) -> f32 {
    ((i * 37) % 21) as f32 / 10.0 - 1.0
}

fn linear_example(x: f32) -> Example {
    Example::new(array![[x]], array![[2.0 * x + 1.0]])
}

fn linear_model() -> Sequential {
    Sequential::new([Dense::zeros((1, 1), None)]).unwrap()
}

fn linear_dataset(len: u64) -> (Vec<Array2<f32>>, Vec<Array2<f32>>) {
    (0..len)
        .map(|i| {
            let Example { input, target } = linear_example(x_at(i));
            (input, target)
        })
        .unzip()
}

fn assert_fits_line(model: &Sequential) {
    let dense = &model.layers()[0];
    let (w, b) = (dense.weights()[[0, 0]], dense.biases()[0]);

    assert!((w - 2.0).abs() < 0.05, "weight {w}");
    assert!((b - 1.0).abs() < 0.05, "bias {b}");
}

#[test]
fn pulled_examples_fit_a_line() {
    let mut trainer = BlockTrainer::new(linear_model(), TrainerConfig::default())
        .unwrap()
        .with_source(PullSource::new(Extractor::by_block_index(|block, slot| {
            linear_example(x_at((block * 5 + slot) as u64))
        })));

    trainer
        .learn_while(|progress| progress.blocks_done() < 1_000)
        .unwrap();

    assert_eq!(trainer.examples_done(), 5_000);
    assert!(trainer.mean_error() < 1e-3);
    assert_fits_line(trainer.model());
}

#[test]
fn learn_to_error_stops_once_the_line_is_fit() {
    let (inputs, targets) = linear_dataset(21);
    let mut trainer = BlockTrainer::new(linear_model(), TrainerConfig::default())
        .unwrap()
        .with_source(CyclicSource::new(inputs, targets).unwrap());

    let error = trainer.learn_to_error(1e-4).unwrap();

    assert!(error <= 1e-4);
    assert_eq!(error, trainer.mean_error());
    assert_fits_line(trainer.model());
}

#[test]
fn queue_fed_trainer() {
    let (tx, source) = QueueSource::channel(3).unwrap();
    let config = TrainerConfig {
        batch_size: 4,
        ..Default::default()
    };
    let mut trainer = BlockTrainer::new(linear_model(), config)
        .unwrap()
        .with_source(source);

    let producer = thread::spawn(move || {
        for i in 0..10 {
            tx.blocking_send(linear_example(x_at(i))).unwrap();
        }
    });

    trainer.learn_blocks(2).unwrap();
    producer.join().unwrap();

    assert_eq!(trainer.blocks_done(), 2);
    assert_eq!(trainer.examples_done(), 8);

    // Two examples left and no producer: the third block cannot be filled.
    let weights = trainer.model().layers()[0].weights().clone();
    assert!(matches!(
        trainer.learn_block(),
        Err(MlErr::SourceExhausted {
            filled: 2,
            expected: 4
        })
    ));
    assert_eq!(trainer.blocks_done(), 2);
    assert_eq!(trainer.examples_done(), 8);
    assert_eq!(trainer.model().layers()[0].weights(), &weights);
}

#[test]
fn parallel_and_sequential_training_agree() {
    let (inputs, targets) = linear_dataset(23);
    let train = |parallel| {
        let config = TrainerConfig {
            parallel,
            batch_size: 4,
            ..Default::default()
        };
        let mut trainer = BlockTrainer::new(linear_model(), config).unwrap();
        trainer.learn_dataset(&inputs, &targets).unwrap();
        trainer.learn_dataset(&inputs, &targets).unwrap();
        trainer.into_model()
    };

    let (sequential, parallel) = (train(false), train(true));

    assert_eq!(sequential.layers()[0].weights(), parallel.layers()[0].weights());
    assert_eq!(sequential.layers()[0].biases(), parallel.layers()[0].biases());
}

#[test]
fn trainer_built_from_json_learns_a_dataset_pass() {
    let json = r#"{
        "model": {
            "sequential": {
                "layers": [
                    { "dense": { "dim": [2, 3], "act_fn": { "sigmoid": { "amp": 1.0 } } } },
                    { "dense": { "dim": [3, 1], "act_fn": { "sigmoid": { "amp": 1.0 } } } }
                ]
            }
        },
        "trainer": { "batch_size": 3, "momentum": 0.5 },
        "dataset": { "data": [0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 0], "x_size": 2, "y_size": 1 },
        "stop": "dataset",
        "seed": 11
    }"#;
    let spec: TrainerSpec = serde_json::from_str(json).unwrap();

    let (mut trainer, dataset) = TrainerBuilder::new().build(&spec).unwrap();
    let error = trainer
        .learn_dataset(dataset.inputs(), dataset.targets())
        .unwrap();

    assert_eq!(trainer.blocks_done(), 2);
    assert_eq!(trainer.examples_done(), 6);
    assert!(error.is_finite());
}
