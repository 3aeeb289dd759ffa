use std::marker::PhantomData;

use super::{Image, Raster, Rect};

/// Write access to the destination of a tile.
///
/// Coordinates are absolute destination coordinates. Every write must fall
/// inside [`region`](Self::region); writes outside it panic, which is what
/// keeps concurrently running tiles from touching each other's pixels.
pub struct TileWriter<'a> {
    samples: *mut u16,
    image_bounds: Rect,
    bands: usize,
    max_values: &'a [u16],
    region: Rect,
    _marker: PhantomData<&'a mut [u16]>,
}

// SAFETY: a writer only touches samples inside its region; regions handed
// out concurrently are disjoint (see `SharedDest::writer`).
unsafe impl Send for TileWriter<'_> {}

impl<'a> TileWriter<'a> {
    /// Writer over the whole image, borrowing it exclusively.
    pub fn whole(image: &'a mut Image) -> Self {
        let bounds = image.bounds();
        Self::region_of(image, bounds)
    }

    /// Writer over `region` of an exclusively borrowed image.
    pub fn region_of(image: &'a mut Image, region: Rect) -> Self {
        assert!(
            image.bounds().contains_rect(&region),
            "writable region {region} exceeds image bounds {}",
            image.bounds()
        );
        let image_bounds = image.bounds();
        let Image {
            max_values,
            samples,
            ..
        } = image;
        Self {
            samples: samples.as_mut_ptr(),
            image_bounds,
            bands: max_values.len(),
            max_values: max_values.as_slice(),
            region,
            _marker: PhantomData,
        }
    }

    /// The absolute region this writer may write to.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Bounds of the whole destination image.
    #[inline]
    pub fn image_bounds(&self) -> Rect {
        self.image_bounds
    }

    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    #[inline]
    pub fn max_value(&self, band: usize) -> u16 {
        self.max_values[band]
    }

    #[inline]
    pub fn set_sample(&mut self, x: usize, y: usize, band: usize, value: u16) {
        assert!(
            self.region.contains(x, y) && band < self.bands,
            "write to ({x}, {y}, band {band}) outside writable region {}",
            self.region
        );
        debug_assert!(value <= self.max_values[band]);
        let idx = (y * self.image_bounds.width + x) * self.bands + band;
        // SAFETY: idx addresses a sample inside `region`, which lies inside the image.
        unsafe { *self.samples.add(idx) = value };
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[u16]) {
        debug_assert_eq!(values.len(), self.bands);
        for (band, &value) in values.iter().enumerate() {
            self.set_sample(x, y, band, value);
        }
    }
}

/// A destination image shared by concurrently running tile tasks.
///
/// Holds the exclusive borrow of the destination for the duration of a
/// concurrent operation and hands out [`TileWriter`]s for disjoint regions.
pub struct SharedDest<'a> {
    samples: *mut u16,
    bounds: Rect,
    bands: usize,
    max_values: Vec<u16>,
    _marker: PhantomData<&'a mut Image>,
}

// SAFETY: all mutation goes through `TileWriter`s whose regions the caller
// guarantees to be disjoint.
unsafe impl Send for SharedDest<'_> {}
unsafe impl Sync for SharedDest<'_> {}

impl<'a> SharedDest<'a> {
    pub fn new(image: &'a mut Image) -> Self {
        let bounds = image.bounds();
        let bands = image.bands();
        let max_values = image.max_values().to_vec();
        Self {
            samples: image.samples_mut().as_mut_ptr(),
            bounds,
            bands,
            max_values,
            _marker: PhantomData,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Writer restricted to `region`.
    ///
    /// # Safety
    ///
    /// No two writers alive at the same time may have overlapping regions.
    pub unsafe fn writer(&self, region: Rect) -> TileWriter<'_> {
        assert!(
            self.bounds.contains_rect(&region),
            "writable region {region} exceeds destination bounds {}",
            self.bounds
        );
        TileWriter {
            samples: self.samples,
            image_bounds: self.bounds,
            bands: self.bands,
            max_values: &self.max_values,
            region,
            _marker: PhantomData,
        }
    }
}
