mod dataloop;

pub use dataloop::{DataLoop, IntoIter, Iter, IterMut};

/// The integer-specialized loop; the generic container covers it directly
pub type IntLoop = DataLoop<i32>;
