use super::*;

#[derive(Clone, Debug)]
pub(crate) struct Network {
  config: NetworkConfig,
}

impl Network {
  pub(crate) fn new(config: NetworkConfig) -> Self {
    Self { config }
  }

  pub(crate) fn forward(&self, input: ArrayView2<f64>) -> Array2<f64> {
    self.config.layers.iter().fold(
      input.t().to_owned(),
      |activations, layer| {
        let z = layer.weights.dot(&activations)
          + &layer.bias.view().insert_axis(Axis(1));

        layer.activation.apply(z)
      },
    )
  }

  pub(crate) fn classify(&self, tensor: ArrayView4<f64>) -> Result<Prediction> {
    let batch = tensor.len_of(Axis(0));

    ensure!(batch > 0, "input tensor holds no images");

    let input = tensor
      .to_shape((batch, INPUT_SIZE))
      .context("input tensor does not hold 28x28 images")?;

    let output = self.forward(input.view());

    let probabilities = output.index_axis(Axis(1), 0);

    ensure!(
      probabilities.iter().all(|p| p.is_finite()),
      "model produced a non-finite output"
    );

    let digit = argmax(&probabilities).context("model produced no output")?;

    Ok(Prediction {
      digit,
      confidence: probabilities[digit],
    })
  }

  pub(crate) fn load_weights(path: &PathBuf) -> Result<Self> {
    let file = File::open(path).context("failed to open weights file")?;

    let serializable_config: SerializableNetworkConfig =
      serde_json::from_reader(file)
        .context("failed to deserialize network weights")?;

    let config = NetworkConfig::try_from(serializable_config)
      .context("invalid network weights")?;

    Ok(Self::new(config))
  }
}
