//! Integration tests for bordermark
//!
//! Exercise the public API end to end: in-memory buffers, the `Carrier`
//! wrapper, and files on disk.

use std::collections::HashSet;

use bordermark::codec::border::border_pixels;
use bordermark::codec::bits::bitstream_len;
use bordermark::{
    border_hash, capacity, embed, extract, Carrier, CarrierError, Coordinate, PixelSequencer,
    WatermarkError,
};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn create_test_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
        ])
    })
}

fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    ImageBuffer::from_fn(width, height, |_, _| Rgb(rng.gen()))
}

fn random_message(rng: &mut ChaCha20Rng, max_chars: usize) -> String {
    let alphabet: Vec<char> = "abcXYZ019 .,!ñé日本🦀".chars().collect();
    let len = rng.gen_range(0..=max_chars);
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Test embed/extract roundtrip over many shapes and messages
#[test]
fn test_roundtrip_random_messages() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);

    for case in 0..40 {
        let width = rng.gen_range(3..80);
        let height = rng.gen_range(3..80);
        let mut img = noise_image(width, height, case);

        let message = random_message(&mut rng, 40);
        let fits = bitstream_len(message.len()) as u64
            <= u64::from(width - 2) * u64::from(height - 2);

        match embed(&mut img, &message) {
            Ok(_) => {
                assert!(fits);
                assert_eq!(extract(&img).unwrap(), message);
            }
            Err(WatermarkError::InsufficientCapacity { .. }) => assert!(!fits),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

/// Test that the seed and the sequence are reproducible
#[test]
fn test_determinism() {
    let img = noise_image(33, 21, 1);
    let copy = img.clone();

    let seed_a = border_hash(&img).unwrap();
    let seed_b = border_hash(&copy).unwrap();
    assert_eq!(seed_a, seed_b);

    let a: Vec<Coordinate> = PixelSequencer::new(&seed_a, 33, 21).unwrap().collect();
    let b: Vec<Coordinate> = PixelSequencer::new(&seed_b, 33, 21).unwrap().collect();
    assert_eq!(a, b);
}

/// Test that embedding twice into identical images gives identical output
#[test]
fn test_embedding_is_deterministic() {
    let mut a = create_test_image(40, 30);
    let mut b = create_test_image(40, 30);
    embed(&mut a, "same input, same output").unwrap();
    embed(&mut b, "same input, same output").unwrap();
    assert_eq!(a, b);
}

/// Test that flipping any border bit changes the seed
#[test]
fn test_border_sensitivity() {
    let base = noise_image(25, 17, 3);
    let base_seed = border_hash(&base).unwrap();
    let ring = border_pixels(25, 17).unwrap();

    for at in ring {
        for channel in 0..3 {
            let mut img = base.clone();
            img.get_pixel_mut(at.col, at.row).0[channel] ^= 1;
            assert_ne!(border_hash(&img).unwrap(), base_seed, "flip at {at:?} ch {channel}");
        }
    }
}

/// Test the capacity boundary: exact fit succeeds, one byte more fails
#[test]
fn test_capacity_boundary() {
    // interior 10x10 = 100 bits; not a multiple of 8 past the header
    let img = create_test_image(12, 12);
    let max = capacity(&img).unwrap().max_message_bytes;
    assert_eq!(max, 10);

    let mut fits = img.clone();
    embed(&mut fits, &"z".repeat(max)).unwrap();
    assert_eq!(extract(&fits).unwrap(), "z".repeat(max));

    let mut over = img.clone();
    assert!(matches!(
        embed(&mut over, &"z".repeat(max + 1)),
        Err(WatermarkError::InsufficientCapacity { needed: 104, available: 100 })
    ));
    assert_eq!(over, img);

    // exact bit-for-bit fit: interior 6x8 = 48 = 16 + 32
    let mut exact = create_test_image(8, 10);
    embed(&mut exact, "four").unwrap();
    assert_eq!(extract(&exact).unwrap(), "four");

    let seed = border_hash(&exact).unwrap();
    let mut seq = PixelSequencer::new(&seed, 8, 10).unwrap();
    assert!(matches!(
        seq.take_coords(49),
        Err(WatermarkError::InsufficientCapacity { needed: 49, available: 48 })
    ));
}

/// Test that nothing but selected blue LSBs changes
#[test]
fn test_non_interference() {
    let original = noise_image(50, 40, 11);
    let mut img = original.clone();
    let summary = embed(&mut img, "touch only what you need").unwrap();

    let seed = border_hash(&original).unwrap();
    let selected: HashSet<Coordinate> = PixelSequencer::new(&seed, 50, 40)
        .unwrap()
        .take_coords(summary.total_bits as u64)
        .unwrap()
        .into_iter()
        .collect();

    for (x, y, px) in img.enumerate_pixels() {
        let before = original.get_pixel(x, y);
        let at = Coordinate::new(y, x);
        if selected.contains(&at) {
            assert_eq!(px.0[..2], before.0[..2]);
            assert_eq!(px.0[2] >> 1, before.0[2] >> 1);
        } else {
            assert_eq!(px, before, "unselected pixel {at:?} changed");
        }
    }
}

/// 5x5 with a uniform border cannot hold "Hi"
#[test]
fn test_scenario_5x5_hi() {
    let mut img: RgbImage = ImageBuffer::from_fn(5, 5, |x, y| {
        if x == 0 || y == 0 || x == 4 || y == 4 {
            Rgb([200, 200, 200])
        } else {
            Rgb([(x * 10) as u8, (y * 10) as u8, 77])
        }
    });
    let before = img.clone();

    assert!(matches!(
        embed(&mut img, "Hi"),
        Err(WatermarkError::InsufficientCapacity { .. })
    ));
    assert_eq!(img, before);
}

/// 20x20 carries the empty message
#[test]
fn test_scenario_20x20_empty() {
    let mut img = create_test_image(20, 20);
    embed(&mut img, "").unwrap();
    assert_eq!(extract(&img).unwrap(), "");
}

/// Noise in unselected interior pixels does not disturb "OK"
#[test]
fn test_scenario_10x10_unrelated_noise() {
    let mut img = create_test_image(10, 10);
    embed(&mut img, "OK").unwrap();

    let seed = border_hash(&img).unwrap();
    let selected: HashSet<Coordinate> = PixelSequencer::new(&seed, 10, 10)
        .unwrap()
        .take_coords(32)
        .unwrap()
        .into_iter()
        .collect();

    let unselected: Vec<Coordinate> = PixelSequencer::new(&seed, 10, 10)
        .unwrap()
        .filter(|at| !selected.contains(at))
        .collect();
    assert_eq!(unselected.len(), 64 - 32);

    for at in unselected {
        let mut noisy = img.clone();
        noisy.get_pixel_mut(at.col, at.row).0[2] ^= 1;
        assert_eq!(extract(&noisy).unwrap(), "OK");
    }
}

/// A too-long message is rejected before capacity is even considered
#[test]
fn test_message_too_large() {
    let mut img = create_test_image(600, 600);
    let message = "m".repeat(65_536);
    assert!(matches!(
        embed(&mut img, &message),
        Err(WatermarkError::MessageTooLarge { len: 65_536 })
    ));
}

/// Test the largest message the header allows
#[test]
fn test_max_message_roundtrip() {
    // interior 730x719 = 524,870 >= 16 + 8 * 65,535 = 524,296
    let mut img = create_test_image(732, 721);
    let message = "q".repeat(65_535);
    embed(&mut img, &message).unwrap();
    assert_eq!(extract(&img).unwrap(), message);
}

/// Test that a file written by Carrier::save can be read back
#[test]
fn test_carrier_file_roundtrip() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let png = dir.path().join("marked.png");
    let bmp = dir.path().join("marked.bmp");

    let mut carrier = Carrier::from_image(DynamicImage::ImageRgb8(noise_image(48, 48, 5)));
    carrier.embed("survives lossless storage").unwrap();
    carrier.save(&png).unwrap();
    carrier.save(&bmp).unwrap();

    for path in [&png, &bmp] {
        let loaded = Carrier::from_file(path).unwrap();
        assert_eq!(loaded.extract().unwrap(), "survives lossless storage");
    }
}

/// Test that lossy output formats are refused
#[test]
fn test_carrier_refuses_lossy_output() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let mut carrier = Carrier::from_image(DynamicImage::ImageRgb8(create_test_image(32, 32)));
    carrier.embed("keep me").unwrap();

    for name in ["out.jpg", "out.jpeg"] {
        let result = carrier.save(dir.path().join(name));
        assert!(matches!(result, Err(CarrierError::LossyFormat { .. })));
    }
}

/// Test that loading garbage bytes reports a load error
#[test]
fn test_carrier_rejects_garbage() {
    assert!(matches!(
        Carrier::from_bytes(b"definitely not an image"),
        Err(CarrierError::Load(_))
    ));
}
