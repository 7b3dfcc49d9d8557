use candle_core::{Result, Tensor};
use serde::{Deserialize, Serialize};

/// Activation functions referenced by layer configs.
///
/// `Softplus2` is `ln(1 + e^x) - ln 2`, the shifted softplus used by the
/// MEGNet paper so that f(0) = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Act {
    Linear,
    Relu,
    Softplus2,
    Softmax,
}

impl Act {
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Act::Linear => Ok(xs.clone()),
            Act::Relu => xs.relu(),
            Act::Softplus2 => {
                let softplus = (xs.exp()? + 1.0)?.log()?;
                softplus.affine(1.0, -std::f64::consts::LN_2)
            }
            Act::Softmax => candle_nn::ops::softmax(xs, candle_core::D::Minus1),
        }
    }
}
