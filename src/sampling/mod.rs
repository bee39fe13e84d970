//! Window sampling engine
//!
//! [`WindowAverager`] computes per-projection channel means over the
//! in-bounds part of a square window; [`BatchSampler`] drives it over an
//! ordered list of sample centers.

pub mod batch;
pub mod window;

pub use batch::{BatchSampler, SampleRecord};
pub use window::{average_at, AveragedColor, ChannelMeans, WindowAverager, WindowSize};
