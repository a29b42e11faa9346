//! Typed data attached to vertices or edges, addressed by index.
//!
//! A [Weights] map holds one value per index, with a declared default for slots never set.
//! Maps attached to a graph under a name follow its index space:
//! when a removal moves the last element into a freed slot, the value moves with it.
//!
//! Values are stored densely per type: `bool` maps are bit-packed, every other
//! [WeightValue] lives in a plain vector.
//! To attach a type of your own, implement [WeightValue] for it with `VecStorage<Self>` as storage.

mod container;
pub use self::container::*;
mod typed;
pub use self::typed::*;
mod set;
pub use self::set::*;
mod function;
pub use self::function::*;
mod flow;
pub use self::flow::*;
