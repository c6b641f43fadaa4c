use super::*;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct Prediction {
  pub(crate) digit: usize,
  pub(crate) confidence: f64,
}

pub(crate) trait Predictor: Send + Sync {
  fn predict(&self, image: &[u8]) -> Result<Prediction>;
}

impl Predictor for Network {
  fn predict(&self, image: &[u8]) -> Result<Prediction> {
    let tensor = preprocess::tensor_from_bytes(image)?;
    self.classify(tensor.view())
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Mock;

impl Mock {
  pub(crate) const PREDICTION: Prediction = Prediction {
    digit: 5,
    confidence: 0.95,
  };
}

impl Predictor for Mock {
  fn predict(&self, _image: &[u8]) -> Result<Prediction> {
    Ok(Self::PREDICTION)
  }
}
