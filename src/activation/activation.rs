use std::f64::consts::E;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Derivative of the logistic function evaluated at the pre-activation `x`.
pub fn sigmoid_grad(x: f64) -> f64 {
    let fx = sigmoid(x);
    (1.0 - fx) * fx
}

/// Row-wise softmax over a single slice, written into `out`.
///
/// The row maximum is subtracted before exponentiating so large logits do
/// not overflow. `out` must have the same length as `row`.
pub fn softmax_into(row: &[f64], out: &mut [f64]) {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for (o, &v) in out.iter_mut().zip(row.iter()) {
        *o = (v - max).exp();
        sum += *o;
    }
    for o in out.iter_mut() {
        *o /= sum;
    }
}
