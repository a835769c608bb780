//! Accuracy of a ported program against the model it came from.

use crate::error::{PorterError, Result};
use crate::runtime::Prediction;

/// Compare predicted classes with `expected` element-wise.
///
/// Missing predictions count as wrong. Returns the fraction of matches when
/// `normalize` is set and the raw count otherwise; an empty batch scores 0.
pub fn accuracy(predicted: &[Option<Prediction>], expected: &[f64], normalize: bool) -> Result<f64> {
    if predicted.len() != expected.len() {
        return Err(PorterError::InvalidInput(format!(
            "{} predictions but {} expected labels",
            predicted.len(),
            expected.len()
        )));
    }
    if predicted.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted
        .iter()
        .zip(expected)
        .filter(|(p, &e)| matches!(p, Some(p) if p.predict == e))
        .count();
    Ok(if normalize {
        correct as f64 / predicted.len() as f64
    } else {
        correct as f64
    })
}
