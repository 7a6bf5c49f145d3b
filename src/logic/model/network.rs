//! Sequential Network - dense/dropout stacks on burn
//!
//! Contract used by the training orchestrator:
//! `build(layer specs)` → `compile(options)` → `fit(x, y, options)` →
//! `evaluate(x, y)` / `predict(x)` / `weights()`.
//!
//! Callers see `ndarray` batches; layers, loss, gradients and Adam are burn's
//! (`Autodiff<NdArray>` while fitting, plain `NdArray` for inference).

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::module::{AutodiffModule, Module, Param};
use burn::nn::loss::BinaryCrossEntropyLossConfig;
use burn::nn::{Dropout, DropoutConfig, Linear};
use burn::optim::{AdamConfig as AdamOptimizerConfig, GradientsParams, Optimizer};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor, TensorData};
use ndarray::{Array2, ArrayD, Axis, IxDyn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::MlError;
use crate::logic::features::layout_hash;

type TrainBackend = Autodiff<NdArray<f32>>;
type InferBackend = NdArray<f32>;

/// Probability above which a prediction counts as the positive class
const DECISION_THRESHOLD: f32 = 0.5;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply<B: Backend>(self, z: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            Activation::Linear => z,
            Activation::Relu => relu(z),
            Activation::Sigmoid => sigmoid(z),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerSpec {
    Dense {
        units: usize,
        activation: Activation,
        input_dim: Option<usize>,
    },
    Dropout {
        rate: f32,
    },
}

impl LayerSpec {
    pub fn dense(units: usize, activation: Activation) -> Self {
        LayerSpec::Dense { units, activation, input_dim: None }
    }

    /// First layer: dense with an explicit input width
    pub fn input_dense(input_dim: usize, units: usize, activation: Activation) -> Self {
        LayerSpec::Dense { units, activation, input_dim: Some(input_dim) }
    }

    pub fn dropout(rate: f32) -> Self {
        LayerSpec::Dropout { rate }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

impl AdamConfig {
    pub fn with_learning_rate(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            ..Default::default()
        }
    }

    fn optimizer_config(&self) -> AdamOptimizerConfig {
        AdamOptimizerConfig::new()
            .with_beta_1(self.beta1)
            .with_beta_2(self.beta2)
            .with_epsilon(self.epsilon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loss {
    BinaryCrossEntropy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    pub optimizer: AdamConfig,
    pub loss: Loss,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            optimizer: AdamConfig::default(),
            loss: Loss::BinaryCrossEntropy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { epochs: 20, batch_size: 32, shuffle: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitHistory {
    /// Mean training loss per epoch
    pub epoch_losses: Vec<f32>,
}

/// Held-out loss and accuracy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f32,
    pub accuracy: f32,
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Anything that maps a batch of feature rows to probabilities (n × 1)
pub trait Classifier: Send + Sync {
    fn predict(&self, x: &Array2<f32>) -> Result<Array2<f32>, MlError>;

    /// Expected number of input columns
    fn input_dim(&self) -> usize;

    /// Feature layout the model was fitted under
    fn layout_hash(&self) -> u32 {
        layout_hash()
    }
}

// ============================================================================
// BURN MODULE
// ============================================================================

/// Trainable parameters; activations and dropout live in `Stage`
#[derive(Module, Debug)]
struct DenseStack<B: Backend> {
    layers: Vec<Linear<B>>,
}

#[derive(Debug, Clone)]
enum Stage {
    Dense(Activation),
    Dropout(Dropout),
}

fn forward<B: Backend>(stack: &DenseStack<B>, stages: &[Stage], input: Tensor<B, 2>) -> Tensor<B, 2> {
    let mut dense = stack.layers.iter();
    stages.iter().fold(input, |x, stage| match stage {
        Stage::Dense(activation) => match dense.next() {
            Some(layer) => activation.apply(layer.forward(x)),
            None => x,
        },
        // No-op on the inference backend
        Stage::Dropout(dropout) => dropout.forward(x),
    })
}

/// Glorot-uniform kernel (inputs, units) drawn from the network RNG, zero bias
fn dense_layer(inputs: usize, units: usize, rng: &mut StdRng, device: &NdArrayDevice) -> Linear<TrainBackend> {
    let limit = (6.0 / (inputs + units) as f32).sqrt();
    let kernel: Vec<f32> = (0..inputs * units).map(|_| rng.gen_range(-limit..limit)).collect();

    Linear {
        weight: Param::from_tensor(Tensor::from_data(TensorData::new(kernel, [inputs, units]), device)),
        bias: Some(Param::from_tensor(Tensor::zeros([units], device))),
    }
}

// ============================================================================
// SEQUENTIAL
// ============================================================================

/// Burn modules are `Send` but not `Sync`; the lock lets a trained network be
/// shared behind `Arc`.
#[derive(Debug)]
pub struct Sequential {
    stack: Mutex<DenseStack<TrainBackend>>,
    stages: Vec<Stage>,
    input_dim: usize,
    output_dim: usize,
    compiled: Option<CompileOptions>,
    rng: StdRng,
    device: NdArrayDevice,
}

impl Clone for Sequential {
    fn clone(&self) -> Self {
        Self {
            stack: Mutex::new(self.stack.lock().clone()),
            stages: self.stages.clone(),
            input_dim: self.input_dim,
            output_dim: self.output_dim,
            compiled: self.compiled,
            rng: self.rng.clone(),
            device: self.device,
        }
    }
}

impl Sequential {
    /// Stack layers; the first must be dense with an explicit input width
    pub fn build(specs: &[LayerSpec], seed: u64) -> Result<Self, MlError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let device = NdArrayDevice::default();
        TrainBackend::seed(&device, seed);

        let input_dim = match specs.first() {
            Some(LayerSpec::Dense { input_dim: Some(dim), .. }) if *dim > 0 => *dim,
            Some(_) => {
                return Err(MlError::InvalidLayer(
                    "first layer must be dense with an input width".to_string(),
                ))
            }
            None => return Err(MlError::InvalidLayer("no layers".to_string())),
        };

        let mut width = input_dim;
        let mut layers = Vec::new();
        let mut stages = Vec::with_capacity(specs.len());

        for spec in specs {
            match *spec {
                LayerSpec::Dense { units, activation, input_dim } => {
                    if units == 0 {
                        return Err(MlError::InvalidLayer("dense layer with zero units".to_string()));
                    }
                    if let Some(dim) = input_dim {
                        if dim != width {
                            return Err(MlError::ShapeMismatch { expected: width, actual: dim });
                        }
                    }
                    layers.push(dense_layer(width, units, &mut rng, &device));
                    stages.push(Stage::Dense(activation));
                    width = units;
                }
                LayerSpec::Dropout { rate } => {
                    if !(0.0..1.0).contains(&rate) {
                        return Err(MlError::InvalidLayer(format!("dropout rate {} outside [0, 1)", rate)));
                    }
                    stages.push(Stage::Dropout(DropoutConfig::new(rate as f64).init()));
                }
            }
        }

        Ok(Self {
            stack: Mutex::new(DenseStack { layers }),
            stages,
            input_dim,
            output_dim: width,
            compiled: None,
            rng,
            device,
        })
    }

    /// Attach the optimizer settings. Binary cross-entropy is the only loss.
    pub fn compile(mut self, options: CompileOptions) -> Self {
        self.compiled = Some(options);
        self
    }

    /// Mini-batch training. `on_epoch` receives (epoch number from 1, mean loss).
    pub fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        options: &FitOptions,
        mut on_epoch: impl FnMut(usize, f32),
    ) -> Result<FitHistory, MlError> {
        let compiled = self.compiled.ok_or(MlError::NotCompiled)?;
        self.check_batch(x, y)?;
        check_finite(x)?;
        check_finite(y)?;

        let rows = x.nrows();
        let batch_size = options.batch_size.max(1);
        let learning_rate = compiled.optimizer.learning_rate as f64;
        let loss_fn = BinaryCrossEntropyLossConfig::new().init::<TrainBackend>(&self.device);
        let mut optimizer = compiled
            .optimizer
            .optimizer_config()
            .init::<TrainBackend, DenseStack<TrainBackend>>();

        let mut model = self.stack.get_mut().clone();
        let mut indices: Vec<usize> = (0..rows).collect();
        let mut history = FitHistory::default();

        for epoch in 1..=options.epochs {
            if options.shuffle {
                indices.shuffle(&mut self.rng);
            }

            let mut loss_sum = 0.0f32;

            for chunk in indices.chunks(batch_size) {
                let xb = to_tensor::<TrainBackend>(&x.select(Axis(0), chunk), &self.device);
                let yb = to_tensor::<TrainBackend>(&y.select(Axis(0), chunk), &self.device);

                let output = forward(&model, &self.stages, xb);
                let loss = loss_fn.forward(output, yb.int());
                loss_sum += loss.clone().into_scalar().elem::<f32>() * chunk.len() as f32;

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(learning_rate, model, grads);
            }

            let epoch_loss = loss_sum / rows as f32;
            if !epoch_loss.is_finite() {
                return Err(MlError::NonFiniteLoss { epoch });
            }

            on_epoch(epoch, epoch_loss);
            history.epoch_losses.push(epoch_loss);
        }

        *self.stack.get_mut() = model;
        Ok(history)
    }

    /// Loss and binary accuracy in inference mode
    pub fn evaluate(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<Evaluation, MlError> {
        self.check_batch(x, y)?;
        check_finite(x)?;

        let model = self.stack.lock().valid();
        let output = forward(&model, &self.stages, to_tensor::<InferBackend>(x, &self.device));
        let target = to_tensor::<InferBackend>(y, &self.device);

        let loss = BinaryCrossEntropyLossConfig::new()
            .init::<InferBackend>(&self.device)
            .forward(output.clone(), target.int())
            .into_scalar()
            .elem::<f32>();
        if !loss.is_finite() {
            return Err(MlError::NonFiniteLoss { epoch: 0 });
        }

        let output = to_array(output)?;
        let correct = output
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| {
                let predicted = if **p > DECISION_THRESHOLD { 1.0 } else { 0.0 };
                predicted == **t
            })
            .count();

        Ok(Evaluation {
            loss,
            accuracy: correct as f32 / y.len() as f32,
        })
    }

    /// Kernel (inputs, units) and bias of every dense layer, in layer order
    pub fn weights(&self) -> Result<Vec<ArrayD<f32>>, MlError> {
        let stack = self.stack.lock();
        let mut weights = Vec::with_capacity(stack.layers.len() * 2);

        for layer in &stack.layers {
            weights.push(to_dyn(layer.weight.val().into_data())?);
            if let Some(bias) = &layer.bias {
                weights.push(to_dyn(bias.val().into_data())?);
            }
        }

        Ok(weights)
    }

    fn check_batch(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<(), MlError> {
        if x.ncols() != self.input_dim {
            return Err(MlError::ShapeMismatch { expected: self.input_dim, actual: x.ncols() });
        }
        if y.ncols() != self.output_dim {
            return Err(MlError::ShapeMismatch { expected: self.output_dim, actual: y.ncols() });
        }
        if x.nrows() != y.nrows() {
            return Err(MlError::RowMismatch { inputs: x.nrows(), labels: y.nrows() });
        }
        if x.nrows() == 0 {
            return Err(MlError::EmptyBatch);
        }
        Ok(())
    }
}

impl Classifier for Sequential {
    fn predict(&self, x: &Array2<f32>) -> Result<Array2<f32>, MlError> {
        if x.ncols() != self.input_dim {
            return Err(MlError::ShapeMismatch { expected: self.input_dim, actual: x.ncols() });
        }
        let model = self.stack.lock().valid();
        to_array(forward(&model, &self.stages, to_tensor::<InferBackend>(x, &self.device)))
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

fn to_tensor<B: Backend>(x: &Array2<f32>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = x.dim();
    let values: Vec<f32> = x.iter().copied().collect();
    Tensor::from_data(TensorData::new(values, [rows, cols]), device)
}

fn to_array<B: Backend>(tensor: Tensor<B, 2>) -> Result<Array2<f32>, MlError> {
    let [rows, cols] = tensor.dims();
    let values = tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| MlError::Backend(format!("{:?}", e)))?;
    Array2::from_shape_vec((rows, cols), values).map_err(|e| MlError::Backend(e.to_string()))
}

fn to_dyn(data: TensorData) -> Result<ArrayD<f32>, MlError> {
    let shape = data.shape.clone();
    let values = data
        .to_vec::<f32>()
        .map_err(|e| MlError::Backend(format!("{:?}", e)))?;
    ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| MlError::Backend(e.to_string()))
}

fn check_finite(x: &Array2<f32>) -> Result<(), MlError> {
    for ((row, column), value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(MlError::NonFiniteInput { row, column });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn logistic(seed: u64) -> Sequential {
        Sequential::build(&[LayerSpec::input_dense(2, 1, Activation::Sigmoid)], seed)
            .unwrap()
            .compile(CompileOptions {
                optimizer: AdamConfig::with_learning_rate(0.05),
                loss: Loss::BinaryCrossEntropy,
            })
    }

    /// Label = 1 when the first column is positive
    fn separable() -> (Array2<f32>, Array2<f32>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            if j == 0 { sign * (1.0 + (i % 5) as f32) } else { (i % 3) as f32 * 0.1 }
        });
        let y = Array2::from_shape_fn((40, 1), |(i, _)| if i % 2 == 0 { 1.0 } else { 0.0 });
        (x, y)
    }

    #[test]
    fn test_build_rejects_missing_input_width() {
        let err = Sequential::build(&[LayerSpec::dense(4, Activation::Relu)], 1).unwrap_err();
        assert!(matches!(err, MlError::InvalidLayer(_)));

        let err = Sequential::build(&[], 1).unwrap_err();
        assert!(matches!(err, MlError::InvalidLayer(_)));
    }

    #[test]
    fn test_build_rejects_bad_dropout() {
        let specs = [
            LayerSpec::input_dense(3, 4, Activation::Relu),
            LayerSpec::dropout(1.0),
        ];
        assert!(Sequential::build(&specs, 1).is_err());
    }

    #[test]
    fn test_weights_layout() {
        let specs = [
            LayerSpec::input_dense(8, 16, Activation::Relu),
            LayerSpec::dropout(0.2),
            LayerSpec::dense(8, Activation::Relu),
            LayerSpec::dropout(0.2),
            LayerSpec::dense(1, Activation::Sigmoid),
        ];
        let network = Sequential::build(&specs, 7).unwrap();
        let weights = network.weights().unwrap();

        assert_eq!(weights.len(), 6);
        assert_eq!(weights[0].shape(), &[8, 16]);
        assert_eq!(weights[1].shape(), &[16]);
        assert_eq!(weights[4].shape(), &[8, 1]);
        assert!(weights[1].iter().all(|b| *b == 0.0));
        assert_eq!(weights[5].shape(), &[1]);
    }

    #[test]
    fn test_fit_requires_compile() {
        let mut network =
            Sequential::build(&[LayerSpec::input_dense(2, 1, Activation::Sigmoid)], 1).unwrap();
        let (x, y) = separable();
        let err = network.fit(&x, &y, &FitOptions::default(), |_, _| {}).unwrap_err();
        assert_eq!(err, MlError::NotCompiled);
    }

    #[test]
    fn test_fit_learns_separable_data() {
        let mut network = logistic(3);
        let (x, y) = separable();

        let before = network.evaluate(&x, &y).unwrap();
        let options = FitOptions { epochs: 60, batch_size: 8, shuffle: true };
        let history = network.fit(&x, &y, &options, |_, _| {}).unwrap();
        let after = network.evaluate(&x, &y).unwrap();

        assert_eq!(history.epoch_losses.len(), 60);
        assert!(after.loss < before.loss);
        assert!(after.accuracy >= 0.9);
    }

    #[test]
    fn test_fit_reports_epochs() {
        let mut network = logistic(5);
        let (x, y) = separable();
        let mut seen = Vec::new();

        let options = FitOptions { epochs: 3, batch_size: 32, shuffle: false };
        network.fit(&x, &y, &options, |epoch, loss| seen.push((epoch, loss))).unwrap();

        assert_eq!(seen.iter().map(|(e, _)| *e).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(seen.iter().all(|(_, loss)| loss.is_finite()));
    }

    #[test]
    fn test_fit_with_dropout_trains_network() {
        let specs = [
            LayerSpec::input_dense(2, 4, Activation::Relu),
            LayerSpec::dropout(0.2),
            LayerSpec::dense(1, Activation::Sigmoid),
        ];
        let mut network = Sequential::build(&specs, 4)
            .unwrap()
            .compile(CompileOptions::default());
        let (x, y) = separable();

        let before = network.weights().unwrap();
        let options = FitOptions { epochs: 2, batch_size: 16, shuffle: true };
        network.fit(&x, &y, &options, |_, _| {}).unwrap();

        assert_ne!(network.weights().unwrap(), before);
    }

    #[test]
    fn test_fit_rejects_non_finite_input() {
        let mut network = logistic(1);
        let x = array![[1.0f32, 2.0], [f32::INFINITY, 0.0]];
        let y = array![[1.0f32], [0.0]];

        let err = network.fit(&x, &y, &FitOptions::default(), |_, _| {}).unwrap_err();
        assert_eq!(err, MlError::NonFiniteInput { row: 1, column: 0 });
    }

    #[test]
    fn test_shape_checks() {
        let network = logistic(1);
        let x = array![[1.0f32, 2.0, 3.0]];
        let y = array![[1.0f32]];
        assert!(matches!(network.evaluate(&x, &y), Err(MlError::ShapeMismatch { .. })));
        assert!(matches!(network.predict(&x), Err(MlError::ShapeMismatch { .. })));

        let x = array![[1.0f32, 2.0]];
        let y = array![[1.0f32], [0.0]];
        assert!(matches!(network.evaluate(&x, &y), Err(MlError::RowMismatch { .. })));

        let x = Array2::<f32>::zeros((0, 2));
        let y = Array2::<f32>::zeros((0, 1));
        assert_eq!(network.evaluate(&x, &y).unwrap_err(), MlError::EmptyBatch);
    }

    #[test]
    fn test_predict_is_probability() {
        let network = logistic(9);
        let x = array![[100.0f32, -100.0], [0.0, 0.0], [-3.0, 2.0]];
        let output = network.predict(&x).unwrap();

        assert_eq!(output.shape(), &[3, 1]);
        assert!(output.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!((output[[1, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_predict_is_stable() {
        let network = logistic(2);
        let x = array![[0.3f32, -1.2], [2.0, 0.5]];
        assert_eq!(network.predict(&x).unwrap(), network.predict(&x).unwrap());
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = separable();
        let options = FitOptions { epochs: 5, batch_size: 8, shuffle: true };

        let mut a = logistic(11);
        let mut b = logistic(11);
        a.fit(&x, &y, &options, |_, _| {}).unwrap();
        b.fit(&x, &y, &options, |_, _| {}).unwrap();

        assert_eq!(a.weights().unwrap(), b.weights().unwrap());
    }

    #[test]
    fn test_clone_shares_no_state() {
        let (x, y) = separable();
        let mut original = logistic(6);
        let snapshot = original.clone();

        let options = FitOptions { epochs: 2, batch_size: 8, shuffle: false };
        original.fit(&x, &y, &options, |_, _| {}).unwrap();

        assert_ne!(original.weights().unwrap(), snapshot.weights().unwrap());
    }
}
