//! Raster storage and read access.
//!
//! [`Image`] owns band-interleaved `u16` samples with a bit depth per band.
//! [`ImageView`] borrows a rectangular window of an image and re-bases its
//! coordinates to the window origin, so padders applied to a view extend the
//! view rather than the parent image.

mod rect;
mod scanner;
mod writer;

#[cfg(test)]
mod tests;

pub use rect::Rect;
pub use scanner::{Location, RasterScanner};
pub use writer::{SharedDest, TileWriter};

use crate::error::{Error, Result};

/// Largest supported bit depth of a band.
pub const MAX_BIT_DEPTH: u8 = 16;

/// Width, height and band count of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
}

/// Read access to a finite raster.
///
/// `sample` panics on out-of-range coordinates like slice indexing does;
/// border-safe access goes through a [`Padder`](crate::Padder).
pub trait Raster {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn bands(&self) -> usize;

    fn sample(&self, x: usize, y: usize, band: usize) -> u16;

    /// Largest representable sample of `band`, e.g. 255 for an 8-bit band.
    fn max_value(&self, band: usize) -> u16;

    fn dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.width(),
            height: self.height(),
            bands: self.bands(),
        }
    }

    fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// Copies all bands of pixel (x, y) into `out`.
    fn pixel_into(&self, x: usize, y: usize, out: &mut [u16]) {
        debug_assert!(out.len() >= self.bands());
        for (band, value) in out.iter_mut().enumerate().take(self.bands()) {
            *value = self.sample(x, y, band);
        }
    }
}

/// Maximum sample value for a bit depth.
#[inline]
pub fn max_value_for_depth(bits: u8) -> u16 {
    ((1u32 << bits) - 1) as u16
}

/// Rounds half-up and clamps to `[0, max]`.
#[inline]
pub fn clamp_sample(value: f64, max: u16) -> u16 {
    (value + 0.5).floor().clamp(0.0, max as f64) as u16
}

/// An owned raster with band-interleaved `u16` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    depths: Vec<u8>,
    max_values: Vec<u16>,
    samples: Vec<u16>,
}

impl Image {
    /// Creates a zero-filled image where every band has the same bit depth.
    pub fn new(width: usize, height: usize, bands: usize, bits: u8) -> Result<Self> {
        Self::with_band_depths(width, height, vec![bits; bands])
    }

    /// Creates a zero-filled image with an explicit bit depth per band.
    pub fn with_band_depths(width: usize, height: usize, depths: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || depths.is_empty() {
            return Err(Error::EmptyImage {
                width,
                height,
                bands: depths.len(),
            });
        }
        if let Some(&bits) = depths.iter().find(|&&b| b == 0 || b > MAX_BIT_DEPTH) {
            return Err(Error::InvalidBitDepth { bits });
        }

        let max_values = depths.iter().map(|&b| max_value_for_depth(b)).collect();
        let len = width * height * depths.len();
        Ok(Self {
            width,
            height,
            depths,
            max_values,
            samples: vec![0; len],
        })
    }

    /// Wraps existing band-interleaved samples.
    pub fn from_samples(
        width: usize,
        height: usize,
        bands: usize,
        bits: u8,
        samples: Vec<u16>,
    ) -> Result<Self> {
        let mut image = Self::new(width, height, bands, bits)?;
        if samples.len() != image.samples.len() {
            return Err(Error::SampleCountMismatch {
                expected: image.samples.len(),
                actual: samples.len(),
            });
        }
        for (i, &value) in samples.iter().enumerate() {
            let band = i % bands;
            let max = image.max_values[band];
            if value > max {
                return Err(Error::SampleOutOfRange { value, max, band });
            }
        }
        image.samples = samples;
        Ok(image)
    }

    /// A zero-filled image of the given size with the same bands and depths.
    pub fn compatible(&self, width: usize, height: usize) -> Result<Self> {
        Self::with_band_depths(width, height, self.depths.clone())
    }

    #[inline]
    pub fn depth(&self, band: usize) -> u8 {
        self.depths[band]
    }

    pub fn depths(&self) -> &[u8] {
        &self.depths
    }

    pub fn max_values(&self) -> &[u16] {
        &self.max_values
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, band: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && band < self.bands());
        (y * self.width + x) * self.depths.len() + band
    }

    #[inline]
    pub fn set_sample(&mut self, x: usize, y: usize, band: usize, value: u16) {
        debug_assert!(value <= self.max_values[band]);
        let idx = self.index(x, y, band);
        self.samples[idx] = value;
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[u16]) {
        debug_assert_eq!(values.len(), self.bands());
        for (band, &value) in values.iter().enumerate() {
            self.set_sample(x, y, band, value);
        }
    }

    /// All pixel values of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u16] {
        let start = self.index(x, y, 0);
        &self.samples[start..start + self.bands()]
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    /// Read-only window over `rect`, which must lie inside the image.
    pub fn view(&self, rect: Rect) -> ImageView<'_> {
        assert!(
            self.bounds().contains_rect(&rect),
            "view {rect} exceeds image bounds {}",
            self.bounds()
        );
        ImageView { image: self, rect }
    }

    /// Copies `rect` out into a new image.
    pub fn sub_image(&self, rect: Rect) -> Result<Image> {
        assert!(
            self.bounds().contains_rect(&rect),
            "sub-image {rect} exceeds image bounds {}",
            self.bounds()
        );
        let mut out = self.compatible(rect.width, rect.height)?;
        let len = rect.width * self.bands();
        for row in 0..rect.height {
            let src_start = self.index(rect.x, rect.y + row, 0);
            let dst_start = out.index(0, row, 0);
            out.samples[dst_start..dst_start + len]
                .copy_from_slice(&self.samples[src_start..src_start + len]);
        }
        Ok(out)
    }

    /// Verifies that a band index is valid for this image.
    pub fn check_band(&self, band: usize) -> Result<()> {
        if band >= self.bands() {
            return Err(Error::BandOutOfRange {
                band,
                bands: self.bands(),
            });
        }
        Ok(())
    }
}

impl Raster for Image {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn bands(&self) -> usize {
        self.depths.len()
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, band: usize) -> u16 {
        self.samples[self.index(x, y, band)]
    }

    #[inline]
    fn max_value(&self, band: usize) -> u16 {
        self.max_values[band]
    }
}

/// Borrowed rectangular window of an [`Image`].
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    image: &'a Image,
    rect: Rect,
}

impl<'a> ImageView<'a> {
    /// The window in parent image coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn parent(&self) -> &'a Image {
        self.image
    }
}

impl Raster for ImageView<'_> {
    #[inline]
    fn width(&self) -> usize {
        self.rect.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.rect.height
    }

    #[inline]
    fn bands(&self) -> usize {
        self.image.bands()
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, band: usize) -> u16 {
        debug_assert!(x < self.rect.width && y < self.rect.height);
        self.image.sample(self.rect.x + x, self.rect.y + y, band)
    }

    #[inline]
    fn max_value(&self, band: usize) -> u16 {
        self.image.max_value(band)
    }
}
