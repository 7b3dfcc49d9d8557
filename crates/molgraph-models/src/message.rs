//! Gather/aggregate primitives shared by the message-passing layers.

use candle_core::{Result, Tensor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
}

/// Split a `[E, 2]` edge-index tensor into its source and destination
/// columns, each `[E]`.
pub fn edge_endpoints(edge_index: &Tensor) -> Result<(Tensor, Tensor)> {
    let src = edge_index.narrow(1, 0, 1)?.squeeze(1)?;
    let dst = edge_index.narrow(1, 1, 1)?.squeeze(1)?;
    Ok((src, dst))
}

/// Gather per-node features `[N, F]` along an `[E]` index into `[E, F]`.
pub fn gather_nodes(h: &Tensor, index: &Tensor) -> Result<Tensor> {
    h.index_select(index, 0)
}

/// Scatter per-edge messages `[E, F]` onto their destination nodes,
/// producing `[N, F]`. Nodes without incident edges stay zero (mean
/// guards against division by zero).
pub fn aggregate_edges(
    messages: &Tensor,
    dst: &Tensor,
    node_count: usize,
    aggregate: Aggregate,
) -> Result<Tensor> {
    let (edge_count, features) = messages.dims2()?;
    // candle's CPU index-add requires a contiguous index layout; `dst` is
    // often a strided view produced by `edge_endpoints`.
    let dst = &dst.contiguous()?;
    let zeros = Tensor::zeros((node_count, features), messages.dtype(), messages.device())?;
    let summed = zeros.index_add(dst, messages, 0)?;
    match aggregate {
        Aggregate::Sum => Ok(summed),
        Aggregate::Mean => {
            let ones = Tensor::ones((edge_count, 1), messages.dtype(), messages.device())?;
            let counts = Tensor::zeros((node_count, 1), messages.dtype(), messages.device())?
                .index_add(dst, &ones, 0)?
                .maximum(1.0)?;
            summed.broadcast_div(&counts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_sum_aggregation() -> Result<()> {
        let device = Device::Cpu;
        let messages = Tensor::new(&[[1.0f32], [2.0], [4.0]], &device)?;
        let dst = Tensor::new(&[0u32, 1, 0], &device)?;
        let out = aggregate_edges(&messages, &dst, 3, Aggregate::Sum)?;
        let values = out.flatten_all()?.to_vec1::<f32>()?;
        assert_eq!(values, vec![5.0, 2.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_mean_aggregation_skips_isolated_nodes() -> Result<()> {
        let device = Device::Cpu;
        let messages = Tensor::new(&[[2.0f32], [4.0]], &device)?;
        let dst = Tensor::new(&[1u32, 1], &device)?;
        let out = aggregate_edges(&messages, &dst, 2, Aggregate::Mean)?;
        let values = out.flatten_all()?.to_vec1::<f32>()?;
        assert_eq!(values, vec![0.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_edge_endpoints() -> Result<()> {
        let device = Device::Cpu;
        let edge_index = Tensor::new(&[[0u32, 1], [1, 0]], &device)?;
        let (src, dst) = edge_endpoints(&edge_index)?;
        assert_eq!(src.to_vec1::<u32>()?, vec![0, 1]);
        assert_eq!(dst.to_vec1::<u32>()?, vec![1, 0]);
        Ok(())
    }
}
