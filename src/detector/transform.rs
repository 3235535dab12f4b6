/// Module grid sampling through a perspective transform
use crate::error::SymbolError;
use crate::models::BitMatrix;
use crate::utils::geometry::PerspectiveTransform;

/// Smallest module pitch, in pixels, at which a 3x3 window stays inside one module
const MIN_MAJORITY_PITCH: f32 = 3.0;

/// Samples module centres from the binary image
pub struct GridSampler<'a> {
    binary: &'a BitMatrix,
}

impl<'a> GridSampler<'a> {
    /// Sampler over a binarized image
    pub fn new(binary: &'a BitMatrix) -> Self {
        Self { binary }
    }

    /// Sample a `dimension`x`dimension` grid whose module (x, y) has its
    /// centre at `transform(x + 0.5, y + 0.5)`.
    ///
    /// Each module takes the majority of the 3x3 pixels around its centre,
    /// or the centre pixel alone when `module_size` is below 3 px; a centre
    /// outside the image fails the whole grid.
    pub fn sample(
        &self,
        transform: &PerspectiveTransform,
        dimension: usize,
        module_size: f32,
    ) -> Result<BitMatrix, SymbolError> {
        let width = self.binary.width();
        let height = self.binary.height();
        let use_majority = module_size >= MIN_MAJORITY_PITCH;
        let mut grid = BitMatrix::new(dimension, dimension);

        for y in 0..dimension {
            for x in 0..dimension {
                let p = transform
                    .transform(x as f32 + 0.5, y as f32 + 0.5)
                    .ok_or(SymbolError::MatrixSampleOutOfBounds)?;
                if p.x < 0.0 || p.y < 0.0 || p.x >= width as f32 || p.y >= height as f32 {
                    return Err(SymbolError::MatrixSampleOutOfBounds);
                }
                let (px, py) = (p.x as usize, p.y as usize);
                let dark = if use_majority {
                    self.majority(px, py)
                } else {
                    self.binary.get(px, py)
                };
                grid.set(x, y, dark);
            }
        }

        Ok(grid)
    }

    fn majority(&self, cx: usize, cy: usize) -> bool {
        let x0 = cx.saturating_sub(1);
        let y0 = cy.saturating_sub(1);
        let x1 = (cx + 1).min(self.binary.width() - 1);
        let y1 = (cy + 1).min(self.binary.height() - 1);

        let mut dark = 0usize;
        let mut total = 0usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                dark += self.binary.get(x, y) as usize;
                total += 1;
            }
        }
        dark * 2 >= total
    }
}
