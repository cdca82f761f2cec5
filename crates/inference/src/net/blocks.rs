use candle_core::{Result, Tensor};
use candle_nn::{BatchNorm, Conv2d, Conv2dConfig, Module, VarBuilder, batch_norm, conv2d_no_bias};

/// Conv2d (no bias) + BatchNorm + SiLU. Weights live under `conv` and `bn`.
#[derive(Debug)]
pub struct ConvBlock {
    conv: Conv2d,
    bn: BatchNorm,
}

impl ConvBlock {
    pub fn load(
        vb: VarBuilder,
        c_in: usize,
        c_out: usize,
        kernel: usize,
        stride: usize,
        padding: usize,
    ) -> Result<Self> {
        let config = Conv2dConfig {
            stride,
            padding,
            ..Default::default()
        };
        let conv = conv2d_no_bias(c_in, c_out, kernel, config, vb.pp("conv"))?;
        let bn = batch_norm(c_out, 1e-3, vb.pp("bn"))?;
        Ok(Self { conv, bn })
    }

    /// 3x3 block padded so stride 1 keeps the spatial size and stride 2
    /// halves it.
    pub fn same(vb: VarBuilder, c_in: usize, c_out: usize, stride: usize) -> Result<Self> {
        Self::load(vb, c_in, c_out, 3, stride, 1)
    }
}

impl Module for ConvBlock {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        xs.apply(&self.conv)?.apply_t(&self.bn, false)?.silu()
    }
}
