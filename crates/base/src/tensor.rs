use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    shape.iter().try_fold(1usize, |product, &dim| {
        product.checked_mul(dim).ok_or(TensorError::ShapeOverflow)
    })
}

/// Dense row-major tensor. Images use HWC layout, masks use `[H, W]`.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Tensor<U> {
        Tensor {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        Ok(Self {
            shape,
            data: vec![T::default(); product],
        })
    }
}

impl<T: Copy> Tensor<T> {
    /// Element at `[y, x, c]` of an HWC tensor.
    pub fn at3(&self, y: usize, x: usize, c: usize) -> T {
        let (w, ch) = (self.shape[1], self.shape[2]);
        self.data[(y * w + x) * ch + c]
    }

    /// Element at `[y, x]` of a 2D tensor.
    pub fn at2(&self, y: usize, x: usize) -> T {
        self.data[y * self.shape[1] + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        let result = Tensor::new(vec![2, 3], vec![0u8; 5]);
        assert_eq!(
            result.unwrap_err(),
            TensorError::ShapeMismatch {
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn test_zeros_overflow() {
        let result = Tensor::<f32>::zeros(vec![usize::MAX, 2]);
        assert_eq!(result.unwrap_err(), TensorError::ShapeOverflow);
    }

    #[test]
    fn test_hwc_indexing() {
        // 2x2 RGB, value encodes position
        let data: Vec<u8> = (0..12).collect();
        let t = Tensor::new(vec![2, 2, 3], data).unwrap();
        assert_eq!(t.at3(0, 0, 0), 0);
        assert_eq!(t.at3(0, 1, 2), 5);
        assert_eq!(t.at3(1, 0, 1), 7);
    }

    #[test]
    fn test_map_keeps_shape() {
        let t = Tensor::new(vec![1, 2], vec![1u8, 2]).unwrap();
        let f = t.map(|&v| v as f32 / 2.0);
        assert_eq!(f.shape, vec![1, 2]);
        assert_eq!(f.data, vec![0.5, 1.0]);
    }
}
