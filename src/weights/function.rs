use super::*;
use crate::graph::EdgeId;
use crate::Result;

/// Real weights of edges, as consumed by numeric algorithms.
///
/// An edge index out of range is reported as [NoSuchEdge](crate::GraphError::NoSuchEdge).
pub trait WeightFunction {
    fn weight(&self, e: EdgeId) -> Result<f64>;
}

/// Integral weights of edges.
pub trait WeightFunctionInt: WeightFunction {
    fn weight_int(&self, e: EdgeId) -> Result<i64>;
}

/// Weight 1 for every edge, for running weighted algorithms on unweighted graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardinalityWeightFunction;

impl WeightFunction for CardinalityWeightFunction {
    fn weight(&self, _: EdgeId) -> Result<f64> {
        Ok(1.0)
    }
}

impl WeightFunctionInt for CardinalityWeightFunction {
    fn weight_int(&self, _: EdgeId) -> Result<i64> {
        Ok(1)
    }
}

/// Adapts a closure into a [WeightFunction].
pub struct WeightFn<F>(pub F);

impl<F> WeightFunction for WeightFn<F>
where
    F: Fn(EdgeId) -> f64,
{
    fn weight(&self, e: EdgeId) -> Result<f64> {
        Ok((self.0)(e))
    }
}

/// Value types a [Weights] map can expose as a real weight.
pub trait NumericWeight: WeightValue + Copy {
    fn as_f64(self) -> f64;
}

/// Value types a [Weights] map can expose as an integral weight.
pub trait IntegralWeight: NumericWeight {
    fn as_i64(self) -> i64;
}

macro_rules! numeric_weights {
    ($($t:ty),*) => {
        $(
            impl NumericWeight for $t {
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! integral_weights {
    ($($t:ty),*) => {
        $(
            impl IntegralWeight for $t {
                fn as_i64(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

numeric_weights!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
integral_weights!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: NumericWeight> WeightFunction for Weights<T> {
    fn weight(&self, e: EdgeId) -> Result<f64> {
        self.get(e).map(NumericWeight::as_f64)
    }
}

impl<T: IntegralWeight> WeightFunctionInt for Weights<T> {
    fn weight_int(&self, e: EdgeId) -> Result<i64> {
        self.get(e).map(IntegralWeight::as_i64)
    }
}

impl<W: WeightFunction + ?Sized> WeightFunction for &W {
    fn weight(&self, e: EdgeId) -> Result<f64> {
        (**self).weight(e)
    }
}

impl<W: WeightFunctionInt + ?Sized> WeightFunctionInt for &W {
    fn weight_int(&self, e: EdgeId) -> Result<i64> {
        (**self).weight_int(e)
    }
}

/// Sum of weights over some edges, failing on the first edge out of range.
pub fn weight_sum<W, I>(w: &W, edges: I) -> Result<f64>
where
    W: WeightFunction + ?Sized,
    I: IntoIterator<Item = EdgeId>,
{
    edges.into_iter().map(|e| w.weight(e)).sum()
}
