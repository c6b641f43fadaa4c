use super::*;

pub(crate) const IMAGE_SIZE: u32 = 28;

pub(crate) const INPUT_SIZE: usize = (IMAGE_SIZE * IMAGE_SIZE) as usize;

pub(crate) const CLASSES: usize = 10;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Activation {
  Linear,
  Relu,
  Sigmoid,
  Softmax,
}

impl Activation {
  pub(crate) fn apply(self, mut z: Array2<f64>) -> Array2<f64> {
    match self {
      Self::Linear => z,
      Self::Relu => z.mapv(relu),
      Self::Sigmoid => z.mapv(sigmoid),
      Self::Softmax => {
        for mut column in z.axis_iter_mut(Axis(1)) {
          let probabilities = softmax(column.view());
          column.assign(&probabilities);
        }
        z
      }
    }
  }

  fn yields_probabilities(self) -> bool {
    matches!(self, Self::Sigmoid | Self::Softmax)
  }
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct SerializableLayer {
  shape: (usize, usize),
  weights: Vec<f64>,
  #[serde(default)]
  bias: Option<Vec<f64>>,
  activation: Activation,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum SerializableNetworkConfig {
  Layered {
    layers: Vec<SerializableLayer>,
  },
  TwoLayer {
    weight_input_hidden: Vec<f64>,
    weight_hidden_output: Vec<f64>,
    input_hidden_shape: (usize, usize),
    hidden_output_shape: (usize, usize),
  },
}

#[derive(Clone, Debug)]
pub(crate) struct Layer {
  pub(crate) weights: Array2<f64>,
  pub(crate) bias: Array1<f64>,
  pub(crate) activation: Activation,
}

impl Layer {
  pub(crate) fn new(weights: Array2<f64>, activation: Activation) -> Self {
    let bias = Array1::zeros(weights.nrows());

    Self {
      weights,
      bias,
      activation,
    }
  }

  pub(crate) fn with_bias(mut self, bias: Array1<f64>) -> Self {
    self.bias = bias;
    self
  }
}

impl TryFrom<SerializableLayer> for Layer {
  type Error = anyhow::Error;

  fn try_from(layer: SerializableLayer) -> Result<Self> {
    let (outputs, inputs) = layer.shape;

    ensure!(
      layer.weights.len() == outputs * inputs,
      "layer of shape {outputs}x{inputs} needs {} weights, found {}",
      outputs * inputs,
      layer.weights.len()
    );

    let weights = Array2::from_shape_vec(layer.shape, layer.weights)?;

    let layer_without_bias = Layer::new(weights, layer.activation);

    match layer.bias {
      Some(bias) => {
        ensure!(
          bias.len() == outputs,
          "layer with {outputs} outputs needs {outputs} biases, found {}",
          bias.len()
        );

        Ok(layer_without_bias.with_bias(Array1::from_vec(bias)))
      }
      None => Ok(layer_without_bias),
    }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct NetworkConfig {
  pub(crate) layers: Vec<Layer>,
}

impl NetworkConfig {
  pub(crate) fn validate(&self) -> Result {
    let (Some(first), Some(last)) = (self.layers.first(), self.layers.last())
    else {
      bail!("network has no layers");
    };

    ensure!(
      first.weights.ncols() == INPUT_SIZE,
      "first layer takes {} inputs, expected {INPUT_SIZE}",
      first.weights.ncols()
    );

    for (index, pair) in self.layers.windows(2).enumerate() {
      ensure!(
        pair[0].weights.nrows() == pair[1].weights.ncols(),
        "layer {} produces {} outputs but layer {} takes {} inputs",
        index,
        pair[0].weights.nrows(),
        index + 1,
        pair[1].weights.ncols()
      );
    }

    ensure!(
      last.weights.nrows() == CLASSES,
      "last layer produces {} outputs, expected {CLASSES}",
      last.weights.nrows()
    );

    ensure!(
      last.activation.yields_probabilities(),
      "last layer activation must be sigmoid or softmax, found {:?}",
      last.activation
    );

    Ok(())
  }
}

impl TryFrom<SerializableNetworkConfig> for NetworkConfig {
  type Error = anyhow::Error;

  fn try_from(config: SerializableNetworkConfig) -> Result<Self> {
    let layers = match config {
      SerializableNetworkConfig::Layered { layers } => layers
        .into_iter()
        .enumerate()
        .map(|(index, layer)| {
          Layer::try_from(layer).with_context(|| format!("invalid layer {index}"))
        })
        .collect::<Result<Vec<Layer>>>()?,
      SerializableNetworkConfig::TwoLayer {
        weight_input_hidden,
        weight_hidden_output,
        input_hidden_shape,
        hidden_output_shape,
      } => vec![
        Layer::new(
          Array2::from_shape_vec(input_hidden_shape, weight_input_hidden)
            .context("invalid input-hidden weights")?,
          Activation::Relu,
        ),
        Layer::new(
          Array2::from_shape_vec(hidden_output_shape, weight_hidden_output)
            .context("invalid hidden-output weights")?,
          Activation::Sigmoid,
        ),
      ],
    };

    let config = Self { layers };

    config.validate()?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use {super::*, approx::assert_relative_eq, ndarray::array, serde_json::json};

  fn parse(value: serde_json::Value) -> Result<NetworkConfig> {
    NetworkConfig::try_from(serde_json::from_value::<SerializableNetworkConfig>(
      value,
    )?)
  }

  fn dense(outputs: usize, inputs: usize, activation: &str) -> serde_json::Value {
    json!({
      "shape": [outputs, inputs],
      "weights": vec![0.0; outputs * inputs],
      "activation": activation,
    })
  }

  #[test]
  fn layered_config_loads() {
    let config = parse(json!({
      "layers": [dense(16, INPUT_SIZE, "relu"), dense(CLASSES, 16, "softmax")]
    }))
    .unwrap();

    assert_eq!(config.layers.len(), 2);
    assert_eq!(config.layers[0].weights.dim(), (16, INPUT_SIZE));
    assert_eq!(config.layers[0].bias.len(), 16);
    assert_eq!(config.layers[1].activation, Activation::Softmax);
  }

  #[test]
  fn explicit_bias_is_kept() {
    let mut output = dense(CLASSES, INPUT_SIZE, "softmax");
    output["bias"] = json!(vec![0.25; CLASSES]);

    let config = parse(json!({ "layers": [output] })).unwrap();

    assert!(config.layers[0].bias.iter().all(|&b| b == 0.25));
  }

  #[test]
  fn two_layer_config_loads() {
    let config = parse(json!({
      "learning_rate": 0.1,
      "weight_input_hidden": vec![0.0; 4 * INPUT_SIZE],
      "weight_hidden_output": vec![0.0; CLASSES * 4],
      "input_hidden_shape": [4, INPUT_SIZE],
      "hidden_output_shape": [CLASSES, 4],
    }))
    .unwrap();

    assert_eq!(config.layers.len(), 2);
    assert_eq!(config.layers[0].activation, Activation::Relu);
    assert_eq!(config.layers[1].activation, Activation::Sigmoid);
  }

  #[test]
  fn empty_network_is_rejected() {
    let error = parse(json!({ "layers": [] })).unwrap_err();
    assert!(error.to_string().contains("no layers"));
  }

  #[test]
  fn weight_count_mismatch_is_rejected() {
    let error = parse(json!({
      "layers": [{
        "shape": [CLASSES, INPUT_SIZE],
        "weights": [0.0, 1.0],
        "activation": "softmax",
      }]
    }))
    .unwrap_err();

    assert!(format!("{error:#}").contains("weights"));
  }

  #[test]
  fn bias_count_mismatch_is_rejected() {
    let mut output = dense(CLASSES, INPUT_SIZE, "softmax");
    output["bias"] = json!([0.0]);

    let error = parse(json!({ "layers": [output] })).unwrap_err();

    assert!(format!("{error:#}").contains("biases"));
  }

  #[test]
  fn broken_layer_chain_is_rejected() {
    let error = parse(json!({
      "layers": [dense(16, INPUT_SIZE, "relu"), dense(CLASSES, 8, "softmax")]
    }))
    .unwrap_err();

    assert!(error.to_string().contains("layer 1 takes 8 inputs"));
  }

  #[test]
  fn wrong_input_size_is_rejected() {
    let error =
      parse(json!({ "layers": [dense(CLASSES, 100, "softmax")] })).unwrap_err();

    assert!(error.to_string().contains("expected 784"));
  }

  #[test]
  fn wrong_class_count_is_rejected() {
    let error =
      parse(json!({ "layers": [dense(3, INPUT_SIZE, "softmax")] })).unwrap_err();

    assert!(error.to_string().contains("expected 10"));
  }

  #[test]
  fn non_probability_output_is_rejected() {
    let error = parse(json!({ "layers": [dense(CLASSES, INPUT_SIZE, "relu")] }))
      .unwrap_err();

    assert!(error.to_string().contains("sigmoid or softmax"));
  }

  #[test]
  fn unknown_layout_is_rejected() {
    assert!(serde_json::from_value::<SerializableNetworkConfig>(json!({
      "weights": [1.0]
    }))
    .is_err());
  }

  #[test]
  fn softmax_activation_is_per_column() {
    let activated = Activation::Softmax.apply(array![[0.0, 1.0], [0.0, 1.0]]);

    assert_relative_eq!(activated[[0, 0]], 0.5, epsilon = 1e-12);
    assert_relative_eq!(activated[[1, 0]], 0.5, epsilon = 1e-12);
    assert_relative_eq!(activated[[0, 1]], 0.5, epsilon = 1e-12);
    assert_relative_eq!(activated.sum(), 2.0, epsilon = 1e-12);
  }
}
