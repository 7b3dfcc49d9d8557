//! Graph-level readout: plain node pooling and set2set attention pooling.

use candle_core::{DType, Result, Tensor};
use candle_nn::{lstm, LSTMConfig, VarBuilder, LSTM, RNN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingMethod {
    Sum,
    Mean,
}

/// Pool `[N, F]` node features into a `[1, F]` graph vector.
#[derive(Debug, Clone, Copy)]
pub struct PoolingNodes {
    method: PoolingMethod,
}

impl PoolingNodes {
    pub fn new(method: PoolingMethod) -> Self {
        PoolingNodes { method }
    }

    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self.method {
            PoolingMethod::Sum => xs.sum_keepdim(0),
            PoolingMethod::Mean => xs.mean_keepdim(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set2SetConfig {
    pub channels: usize,
    pub iterations: usize,
}

impl Default for Set2SetConfig {
    fn default() -> Self {
        Set2SetConfig {
            channels: 16,
            iterations: 3,
        }
    }
}

/// Order-invariant iterative attention pooling (Vinyals et al.).
///
/// Each iteration feeds the running query `q*` through an LSTM cell,
/// attends over the node features with a dot-product softmax, and
/// appends the attention readout to form the next `q*`. Input features
/// must have width `channels`; the output is `[1, 2 * channels]`.
#[derive(Debug)]
pub struct Set2Set {
    lstm: LSTM,
    channels: usize,
    iterations: usize,
}

impl Set2Set {
    pub fn load(vb: VarBuilder, cfg: &Set2SetConfig) -> Result<Self> {
        let lstm = lstm(
            2 * cfg.channels,
            cfg.channels,
            LSTMConfig::default(),
            vb.pp("lstm"),
        )?;
        Ok(Set2Set {
            lstm,
            channels: cfg.channels,
            iterations: cfg.iterations,
        })
    }

    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut state = self.lstm.zero_state(1)?;
        let mut q_star = Tensor::zeros((1, 2 * self.channels), DType::F32, xs.device())?;
        for _ in 0..self.iterations {
            state = self.lstm.step(&q_star, &state)?;
            let q = state.h().clone();
            // attention over nodes
            let scores = xs.matmul(&q.t()?)?;
            let attention = candle_nn::ops::softmax(&scores, 0)?;
            let readout = xs.broadcast_mul(&attention)?.sum_keepdim(0)?;
            q_star = Tensor::cat(&[&q, &readout], 1)?;
        }
        Ok(q_star)
    }
}
