use crate::error::{FlowError, Result};
use tch::Tensor;

/// Fails with a shape error unless the last dims of `t` equal `expected`.
pub fn check_trailing_dims(t: &Tensor, expected: &[i64]) -> Result<()> {
    let size = t.size();
    if size.len() < expected.len() || size[size.len() - expected.len()..] != expected[..] {
        return Err(FlowError::shape(expected, &size));
    }
    Ok(())
}

/// Axes `start..rank`.
pub fn axes_from(start: usize, rank: usize) -> Vec<i64> {
    (start as i64..rank as i64).collect()
}

pub fn numel(dims: &[i64]) -> i64 {
    dims.iter().product()
}

/// Rejects a negative sample count before it reaches a tensor constructor.
pub fn check_num_samples(num_samples: i64) -> Result<()> {
    if num_samples < 0 {
        return Err(FlowError::Config(format!(
            "number of samples must be non-negative, got {}",
            num_samples
        )));
    }
    Ok(())
}

/// `(batch, samples)` of a tensor laid out as `(batch, samples, ...)`.
pub fn batch_and_samples(z: &Tensor) -> Result<[i64; 2]> {
    let size = z.size();
    if size.len() < 2 {
        return Err(FlowError::Shape {
            expected: vec![-1, -1],
            got: size,
        });
    }
    Ok([size[0], size[1]])
}

/// Splits the channel axis `dim` of a function output into two halves,
/// `(mean, log_var)`. An odd channel count breaks the `2·d` contract.
pub fn split_channels(out: &Tensor, dim: i64) -> Result<(Tensor, Tensor)> {
    let size = out.size();
    let axis = if dim < 0 { size.len() as i64 + dim } else { dim };
    if axis < 0 || axis as usize >= size.len() {
        return Err(FlowError::Shape {
            expected: vec![-1; axis.unsigned_abs() as usize + 1],
            got: size,
        });
    }
    let channels = size[axis as usize];
    if channels % 2 != 0 || channels == 0 {
        let mut expected = size.clone();
        expected[axis as usize] = 2 * (channels / 2).max(1);
        return Err(FlowError::shape(&expected, &size));
    }
    let half = channels / 2;
    Ok((out.narrow(axis, 0, half), out.narrow(axis, half, half)))
}
