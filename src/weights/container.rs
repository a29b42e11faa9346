use bitvec::prelude::*;
use std::fmt::Debug;

/// Dense storage of values of one type.
///
/// Indexing out of bounds panics, as slices do; [Weights](super::Weights) checks bounds before.
pub trait WeightStorage<T>: Clone + Debug + Send + Sync + 'static {
    fn with_len(len: usize, value: &T) -> Self;
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> T;
    fn set(&mut self, index: usize, value: T);
    fn push(&mut self, value: T);
    /// Removes `index` by moving the last value into it.
    fn swap_remove(&mut self, index: usize);
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Types that can be stored in [Weights](super::Weights).
pub trait WeightValue: Clone + Debug + Send + Sync + 'static {
    type Storage: WeightStorage<Self>;
}

/// A vector of values.
#[derive(Debug, Clone, PartialEq)]
pub struct VecStorage<T>(Vec<T>);

impl<T> VecStorage<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> WeightStorage<T> for VecStorage<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    fn with_len(len: usize, value: &T) -> Self {
        Self(vec![value.clone(); len])
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> T {
        self.0[index].clone()
    }

    fn set(&mut self, index: usize, value: T) {
        self.0[index] = value;
    }

    fn push(&mut self, value: T) {
        self.0.push(value);
    }

    fn swap_remove(&mut self, index: usize) {
        self.0.swap_remove(index);
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Bit-packed booleans, 64 per word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitStorage {
    bits: BitVec<u64, Lsb0>,
}

impl BitStorage {
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }
}

impl WeightStorage<bool> for BitStorage {
    fn with_len(len: usize, value: &bool) -> Self {
        Self {
            bits: BitVec::repeat(*value, len),
        }
    }

    fn len(&self) -> usize {
        self.bits.len()
    }

    fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    fn set(&mut self, index: usize, value: bool) {
        self.bits.set(index, value);
    }

    fn push(&mut self, value: bool) {
        self.bits.push(value);
    }

    fn swap_remove(&mut self, index: usize) {
        self.bits.swap_remove(index);
    }

    fn clear(&mut self) {
        self.bits.clear();
    }
}

impl WeightValue for bool {
    type Storage = BitStorage;
}

macro_rules! dense_weight_values {
    ($($t:ty),*) => {
        $(
            impl WeightValue for $t {
                type Storage = VecStorage<$t>;
            }
        )*
    };
}

dense_weight_values!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String);

impl<T> WeightValue for Option<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Storage = VecStorage<Option<T>>;
}

impl<T> WeightValue for Vec<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Storage = VecStorage<Vec<T>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_across_words() {
        let mut bits = BitStorage::with_len(130, &true);
        assert_eq!(bits.count_ones(), 130);
        bits.set(3, false);
        bits.push(false);
        assert_eq!(bits.len(), 131);
        assert!(!bits.get(130));
        // moves index 130 (false) into 129
        bits.swap_remove(129);
        assert_eq!(bits.len(), 130);
        assert!(!bits.get(129));
        assert_eq!(bits.count_ones(), 128);
        for _ in 0..66 {
            bits.swap_remove(0);
        }
        assert_eq!(bits.len(), 64);
        assert_eq!(bits.count_ones(), 63);
        assert_eq!(bits.bits.as_raw_slice().len(), 1);
    }

    #[test]
    fn vec_swap_remove_moves_last() {
        let mut v = VecStorage::with_len(3, &0i32);
        v.set(2, 7);
        v.swap_remove(0);
        assert_eq!(v.as_slice(), &[7, 0]);
    }
}
