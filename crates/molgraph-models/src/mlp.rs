use crate::activation::Act;
use candle_core::{bail, Module, Result, Tensor};
use candle_nn::{linear, linear_no_bias, Linear, VarBuilder};
use serde::{Deserialize, Serialize};

/// Layer-wise MLP description: one entry per layer in each list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    pub units: Vec<usize>,
    pub activation: Vec<Act>,
    pub use_bias: Vec<bool>,
}

impl MlpConfig {
    /// Uniform stack: same activation and bias for every layer.
    pub fn uniform(units: &[usize], activation: Act) -> Self {
        MlpConfig {
            units: units.to_vec(),
            activation: vec![activation; units.len()],
            use_bias: vec![true; units.len()],
        }
    }

    pub fn out_dim(&self) -> Option<usize> {
        self.units.last().copied()
    }
}

/// A stack of dense layers driven by an [MlpConfig].
#[derive(Debug)]
pub struct Mlp {
    layers: Vec<Linear>,
    activations: Vec<Act>,
}

impl Mlp {
    pub fn load(vb: VarBuilder, in_dim: usize, cfg: &MlpConfig) -> Result<Self> {
        if cfg.units.is_empty() {
            bail!("mlp config has no layers");
        }
        if cfg.activation.len() != cfg.units.len() || cfg.use_bias.len() != cfg.units.len() {
            bail!(
                "mlp config lists disagree: {} units, {} activations, {} biases",
                cfg.units.len(),
                cfg.activation.len(),
                cfg.use_bias.len()
            );
        }
        let mut layers = Vec::with_capacity(cfg.units.len());
        let mut prev = in_dim;
        for (i, (&units, &use_bias)) in cfg.units.iter().zip(&cfg.use_bias).enumerate() {
            let vb = vb.pp(format!("layer_{i}"));
            let layer = if use_bias {
                linear(prev, units, vb)?
            } else {
                linear_no_bias(prev, units, vb)?
            };
            layers.push(layer);
            prev = units;
        }
        Ok(Mlp {
            layers,
            activations: cfg.activation.clone(),
        })
    }

    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = xs.clone();
        for (layer, act) in self.layers.iter().zip(&self.activations) {
            xs = act.forward(&layer.forward(&xs)?)?;
        }
        Ok(xs)
    }
}
