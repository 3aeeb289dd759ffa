use super::*;

fn ramp(width: usize, height: usize, bands: usize) -> Image {
    let samples = (0..width * height * bands).map(|i| (i % 256) as u16).collect();
    Image::from_samples(width, height, bands, 8, samples).unwrap()
}

#[test]
fn test_new_image_is_zeroed_with_max_values() {
    let image = Image::with_band_depths(4, 3, vec![8, 1, 16]).unwrap();
    assert_eq!(image.dimensions().bands, 3);
    assert!(image.samples().iter().all(|&s| s == 0));
    assert_eq!(image.max_value(0), 255);
    assert_eq!(image.max_value(1), 1);
    assert_eq!(image.max_value(2), 65535);
}

#[test]
fn test_empty_image_is_rejected() {
    assert!(matches!(
        Image::new(0, 3, 1, 8),
        Err(Error::EmptyImage { width: 0, .. })
    ));
    assert!(matches!(
        Image::with_band_depths(3, 3, vec![]),
        Err(Error::EmptyImage { bands: 0, .. })
    ));
}

#[test]
fn test_invalid_bit_depth_is_rejected() {
    assert!(matches!(
        Image::new(2, 2, 1, 17),
        Err(Error::InvalidBitDepth { bits: 17 })
    ));
    assert!(matches!(
        Image::new(2, 2, 1, 0),
        Err(Error::InvalidBitDepth { bits: 0 })
    ));
}

#[test]
fn test_from_samples_validates_count_and_range() {
    assert!(matches!(
        Image::from_samples(2, 2, 1, 8, vec![0; 3]),
        Err(Error::SampleCountMismatch {
            expected: 4,
            actual: 3
        })
    ));
    assert!(matches!(
        Image::from_samples(2, 1, 1, 4, vec![3, 16]),
        Err(Error::SampleOutOfRange {
            value: 16,
            max: 15,
            band: 0
        })
    ));
}

#[test]
fn test_samples_are_band_interleaved() {
    let image = ramp(3, 2, 2);
    assert_eq!(image.sample(0, 0, 0), 0);
    assert_eq!(image.sample(0, 0, 1), 1);
    assert_eq!(image.sample(1, 0, 0), 2);
    assert_eq!(image.sample(0, 1, 1), 7);
    assert_eq!(image.pixel(2, 1), &[10, 11]);
}

#[test]
fn test_view_rebases_coordinates() {
    let image = ramp(5, 4, 1);
    let view = image.view(Rect::new(1, 2, 3, 2));
    assert_eq!(view.width(), 3);
    assert_eq!(view.height(), 2);
    assert_eq!(view.sample(0, 0, 0), image.sample(1, 2, 0));
    assert_eq!(view.sample(2, 1, 0), image.sample(3, 3, 0));
}

#[test]
#[should_panic(expected = "exceeds image bounds")]
fn test_view_outside_bounds_panics() {
    let image = ramp(4, 4, 1);
    let _ = image.view(Rect::new(2, 2, 3, 1));
}

#[test]
fn test_sub_image_copies_region() {
    let image = ramp(6, 5, 3);
    let rect = Rect::new(2, 1, 3, 3);
    let sub = image.sub_image(rect).unwrap();
    assert_eq!(sub.width(), 3);
    assert_eq!(sub.height(), 3);
    for loc in RasterScanner::samples(sub.bounds(), 3) {
        assert_eq!(
            sub.sample(loc.col, loc.row, loc.band),
            image.sample(loc.col + 2, loc.row + 1, loc.band)
        );
    }
}

#[test]
fn test_scanner_visits_raster_order() {
    let locs: Vec<_> = RasterScanner::pixels(Rect::new(1, 1, 2, 2)).collect();
    let coords: Vec<_> = locs.iter().map(|l| (l.col, l.row)).collect();
    assert_eq!(coords, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    assert!(locs.iter().all(|l| l.band == 0));

    let scanner = RasterScanner::samples(Rect::from_size(3, 2), 4);
    assert_eq!(scanner.len(), 24);
    let last = scanner.last().unwrap();
    assert_eq!((last.col, last.row, last.band), (2, 1, 3));
}

#[test]
fn test_scanner_over_empty_rect() {
    assert_eq!(RasterScanner::pixels(Rect::new(3, 3, 0, 5)).count(), 0);
}

#[test]
fn test_rect_intersection() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 7, 10, 10);
    assert_eq!(a.intersect(&b), Some(Rect::new(5, 7, 5, 3)));
    assert_eq!(a.intersect(&Rect::new(10, 0, 2, 2)), None);
    assert!(a.contains_rect(&Rect::new(2, 2, 8, 8)));
    assert!(!a.contains_rect(&b));
    assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "3x4+1+2");
}

#[test]
fn test_tile_writer_writes_inside_region() {
    let mut image = Image::new(4, 4, 2, 8).unwrap();
    {
        let mut writer = TileWriter::region_of(&mut image, Rect::new(1, 1, 2, 2));
        writer.set_pixel(2, 2, &[7, 9]);
        assert_eq!(writer.max_value(1), 255);
    }
    assert_eq!(image.pixel(2, 2), &[7, 9]);
    assert_eq!(image.pixel(1, 1), &[0, 0]);
}

#[test]
#[should_panic(expected = "outside writable region")]
fn test_tile_writer_rejects_outside_write() {
    let mut image = Image::new(4, 4, 1, 8).unwrap();
    let mut writer = TileWriter::region_of(&mut image, Rect::new(0, 0, 2, 2));
    writer.set_sample(2, 0, 0, 1);
}

#[test]
fn test_shared_dest_disjoint_writers() {
    let mut image = Image::new(4, 2, 1, 8).unwrap();
    {
        let shared = SharedDest::new(&mut image);
        // SAFETY: the two regions are disjoint.
        let mut left = unsafe { shared.writer(Rect::new(0, 0, 2, 2)) };
        let mut right = unsafe { shared.writer(Rect::new(2, 0, 2, 2)) };
        left.set_sample(1, 1, 0, 3);
        right.set_sample(2, 1, 0, 4);
    }
    assert_eq!(image.sample(1, 1, 0), 3);
    assert_eq!(image.sample(2, 1, 0), 4);
}
