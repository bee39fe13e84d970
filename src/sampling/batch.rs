//! Batch driver: one averaged color per sample center, in input order

use serde::Serialize;

use crate::pixel::{Coordinate, PixelSource};
use crate::sampling::window::{AveragedColor, WindowAverager, WindowSize};
use crate::Result;

/// One output row: 1-based position, center and averaged color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRecord {
    /// 1-based position of the center in the input sequence
    pub index: usize,
    pub center: Coordinate,
    pub color: AveragedColor,
}

/// Samples a sequence of centers with shared source, size and projections
///
/// Iteration is lazy and sequential. Results come back in input order, and
/// an error for one center does not stop the iterator; the caller decides
/// whether to skip that point or abort.
#[derive(Debug)]
pub struct BatchSampler<'a, S: ?Sized> {
    source: &'a S,
    averager: &'a WindowAverager,
    size: WindowSize,
}

impl<'a, S> BatchSampler<'a, S>
where
    S: PixelSource + ?Sized,
{
    pub fn new(source: &'a S, averager: &'a WindowAverager, size: WindowSize) -> Self {
        Self {
            source,
            averager,
            size,
        }
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }

    /// Lazily sample every center
    ///
    /// Re-running over the same centers yields the same records.
    pub fn sample<I>(&self, centers: I) -> impl Iterator<Item = Result<SampleRecord>> + 'a
    where
        I: IntoIterator<Item = Coordinate>,
        I::IntoIter: 'a,
    {
        let (source, averager, size) = (self.source, self.averager, self.size);
        centers
            .into_iter()
            .enumerate()
            .map(move |(position, center)| {
                let color = averager.average_at(source, center, size)?;
                if color.is_truncated() {
                    tracing::warn!(
                        point = position + 1,
                        x = center.x,
                        y = center.y,
                        samples = color.sample_count,
                        window = color.window_count,
                        "Window extends past the image edge; averaging in-bounds pixels only"
                    );
                } else {
                    tracing::debug!(
                        point = position + 1,
                        x = center.x,
                        y = center.y,
                        samples = color.sample_count,
                        "Sampled point"
                    );
                }
                Ok(SampleRecord {
                    index: position + 1,
                    center,
                    color,
                })
            })
    }

    /// Sample every center, stopping at the first error
    pub fn sample_all<I>(&self, centers: I) -> Result<Vec<SampleRecord>>
    where
        I: IntoIterator<Item = Coordinate>,
        I::IntoIter: 'a,
    {
        self.sample(centers).collect()
    }
}
