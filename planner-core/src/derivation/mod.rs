//! Derived statistics over a [`StudyData`](crate::StudyData) snapshot.
//!
//! Every function here is pure. Anything that depends on the current time
//! takes `now` as an argument (local wall-clock time); nothing reads the
//! system clock. Empty collections produce zeros, empty sequences, or `None`
//! for "not applicable", never a panic.

mod counts;
mod dates;
mod filters;
mod sort;
mod summary;
mod weekly;

pub use counts::*;
pub use dates::*;
pub use filters::*;
pub use sort::*;
pub use summary::*;
pub use weekly::*;
