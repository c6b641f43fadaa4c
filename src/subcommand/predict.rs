use super::*;

#[derive(Debug, Parser)]
pub(crate) struct Predict {
  #[clap(short, long, env = "MNIST_WEIGHTS", default_value = "mnist_model.json")]
  weights: PathBuf,
  #[clap(short, long)]
  image: PathBuf,
  #[clap(long, help = "Print the prediction as JSON")]
  json: bool,
}

impl Predict {
  pub(crate) fn run(self) -> Result {
    let network = Network::load_weights(&self.weights)?;

    let image = read(&self.image)
      .with_context(|| format!("failed to read {}", self.image.display()))?;

    let prediction = network.predict(&image)?;

    if self.json {
      println!("{}", serde_json::to_string(&prediction)?);
    } else {
      println!(
        "Predicted digit: {} (confidence: {:.2}%)",
        prediction.digit,
        prediction.confidence * 100.0
      );
    }

    Ok(())
  }
}
