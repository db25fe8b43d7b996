//! Filter configuration, live filter values and the item predicate.

mod predicate;
mod spec;
mod value;

pub use predicate::{Predicate, matches};
pub use spec::{FilterKind, FilterOption, FilterSpec, FilterSpecs};
pub use value::{FilterValue, FilterValueMap};
