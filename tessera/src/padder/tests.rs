use super::*;
use crate::raster::Image;

fn quad() -> Image {
    Image::from_samples(2, 2, 1, 8, vec![1, 2, 3, 4]).unwrap()
}

fn numbered(width: usize, height: usize) -> Image {
    let samples = (0..width * height).map(|i| (i + 1) as u16).collect();
    Image::from_samples(width, height, 1, 16, samples).unwrap()
}

fn window(padder: Padder, image: &Image, from: i64, to: i64) -> Vec<Vec<u16>> {
    (from..to)
        .map(|row| (from..to).map(|col| padder.sample(image, col, row, 0)).collect())
        .collect()
}

/// Reference index laws written independently of the helpers under test.
fn expected_index(padder: Padder, i: i64, len: usize) -> Option<usize> {
    let n = len as i64;
    match padder {
        Padder::Zero => (0..n).contains(&i).then_some(i as usize),
        Padder::ExtendedBorder => Some(if i < 0 {
            0
        } else if i >= n {
            len - 1
        } else {
            i as usize
        }),
        Padder::Tiled => Some((((i % n) + n) % n) as usize),
        Padder::Reflective => {
            let c = if i < 0 { -1 - i } else { i };
            let m = c % n;
            let folded = if (c / n) % 2 == 0 { m } else { n - 1 - m };
            Some(folded as usize)
        }
    }
}

#[test]
fn test_tiled_literal_window() {
    let grid = window(Padder::Tiled, &quad(), -2, 4);
    let odd = vec![1, 2, 1, 2, 1, 2];
    let even = vec![3, 4, 3, 4, 3, 4];
    assert_eq!(
        grid,
        vec![
            odd.clone(),
            even.clone(),
            odd.clone(),
            even.clone(),
            odd,
            even
        ]
    );
}

#[test]
fn test_zero_literal_window() {
    let grid = window(Padder::Zero, &quad(), -2, 4);
    for (r, row) in grid.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            let expected = match (c, r) {
                (2, 2) => 1,
                (3, 2) => 2,
                (2, 3) => 3,
                (3, 3) => 4,
                _ => 0,
            };
            assert_eq!(v, expected, "at window ({c}, {r})");
        }
    }
}

#[test]
fn test_padding_totality_matches_index_law() {
    for (width, height) in [(1, 1), (2, 2), (3, 1), (1, 4), (5, 3), (7, 6)] {
        let image = numbered(width, height);
        let (w, h) = (width as i64, height as i64);
        for padder in Padder::ALL {
            for row in -h..2 * h {
                for col in -w..2 * w {
                    let expected = match (
                        expected_index(padder, col, width),
                        expected_index(padder, row, height),
                    ) {
                        (Some(x), Some(y)) => image.sample(x, y, 0),
                        _ => 0,
                    };
                    assert_eq!(
                        padder.sample(&image, col, row, 0),
                        expected,
                        "{padder:?} {width}x{height} at ({col}, {row})"
                    );
                }
            }
        }
    }
}

#[test]
fn test_single_pixel_folds_to_origin() {
    let image = Image::from_samples(1, 1, 1, 8, vec![42]).unwrap();
    for padder in [Padder::ExtendedBorder, Padder::Tiled, Padder::Reflective] {
        for i in -5..5 {
            assert_eq!(padder.resolve(1, 1, i, -i), Some((0, 0)));
            assert_eq!(padder.sample(&image, i, i, 0), 42);
        }
    }
    assert_eq!(Padder::Zero.sample(&image, 0, 0, 0), 42);
    assert_eq!(Padder::Zero.sample(&image, 1, 0, 0), 0);
}

#[test]
fn test_reflect_index_sequence() {
    let got: Vec<_> = (-7..10).map(|i| reflect_index(i, 3)).collect();
    assert_eq!(
        got,
        vec![0, 0, 1, 2, 2, 1, 0, 0, 1, 2, 2, 1, 0, 0, 1, 2, 2]
    );
}

#[test]
fn test_wrap_and_clamp_helpers() {
    assert_eq!(wrap_index(-1, 4), 3);
    assert_eq!(wrap_index(-4, 4), 0);
    assert_eq!(wrap_index(9, 4), 1);
    assert_eq!(clamp_index(-10, 4), 0);
    assert_eq!(clamp_index(10, 4), 3);
}

#[test]
fn test_pixel_reads_all_bands() {
    let image = Image::from_samples(2, 1, 3, 8, vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(Padder::ExtendedBorder.pixel(&image, 5, -3), vec![4, 5, 6]);
    assert_eq!(Padder::Tiled.pixel(&image, -2, 0), vec![1, 2, 3]);
    assert_eq!(Padder::Zero.pixel(&image, -1, 0), vec![0, 0, 0]);
}

#[test]
fn test_padder_extends_view_not_parent() {
    let image = numbered(4, 4);
    let view = image.view(crate::raster::Rect::new(1, 1, 2, 2));
    // Left of the view is column 0 of the parent, but extended-border repeats the view edge.
    assert_eq!(
        Padder::ExtendedBorder.sample(&view, -1, 0, 0),
        image.sample(1, 1, 0)
    );
    assert_eq!(Padder::Zero.sample(&view, -1, 0, 0), 0);
}
