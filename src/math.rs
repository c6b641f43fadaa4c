use super::*;

/// Index of the largest element, preferring the earliest on ties.
pub(crate) fn argmax<D>(x: &ndarray::ArrayView<f64, D>) -> Option<usize>
where
  D: ndarray::Dimension,
{
  x.iter()
    .enumerate()
    .fold(None, |best: Option<(usize, f64)>, (index, &value)| match best {
      Some((_, max)) if value <= max || value.is_nan() => best,
      _ => Some((index, value)),
    })
    .map(|(index, _)| index)
}

pub(crate) fn relu(x: f64) -> f64 {
  x.max(0.0)
}

pub(crate) fn sigmoid(x: f64) -> f64 {
  1.0 / (1.0 + (-x).exp())
}

pub(crate) fn softmax(x: ArrayView1<f64>) -> Array1<f64> {
  let max = x.fold(f64::NEG_INFINITY, |max, &value| max.max(value));

  let exp = x.mapv(|value| (value - max).exp());

  let sum = exp.sum();

  exp / sum
}
