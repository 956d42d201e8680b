//! Grain texture sprinkled over the pixel buffer.

use chaos_core::NoiseConfig;

use crate::random::RandomSource;
use crate::surface::ImageData;

/// Brighten a random subset of pixels.
///
/// Each pixel is picked when a sample exceeds `config.density`; a picked
/// pixel gets the same random offset in `[0, intensity)` added to its red,
/// green and blue channels, saturating at 255. Alpha is left alone.
pub fn apply_noise(image: &mut ImageData, config: &NoiseConfig, rng: &mut impl RandomSource) {
    for pixel in image.data.chunks_exact_mut(4) {
        if rng.next_f64() > config.density {
            let noise = rng.next_f64() * config.intensity;
            for channel in &mut pixel[..3] {
                *channel = (f64::from(*channel) + noise).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Script, StdRandom};

    fn image_of(value: u8, width: usize, height: usize) -> ImageData {
        ImageData {
            width,
            height,
            data: vec![value; width * height * 4],
        }
    }

    #[test]
    fn test_never_exceeds_channel_max() {
        for intensity in [0.0, 30.0, 100.0, 255.0, 1000.0] {
            let config = NoiseConfig {
                enabled: true,
                intensity,
                density: 0.5,
                ..NoiseConfig::default()
            };
            let mut image = image_of(250, 32, 32);
            apply_noise(&mut image, &config, &mut StdRandom::seeded(5));
            // Channels are u8, so an overflow would show up as a wrapped-around value.
            assert!(image.data.iter().all(|c| *c >= 250));
        }
    }

    #[test]
    fn test_selected_pixel_gets_same_offset() {
        let config = NoiseConfig {
            intensity: 30.0,
            density: 0.97,
            ..NoiseConfig::default()
        };
        let mut image = image_of(100, 2, 1);
        image.data[3] = 7;
        // First pixel selected with noise 0.5 * 30, second not selected.
        apply_noise(&mut image, &config, &mut Script::new(&[0.98, 0.5, 0.1]));
        assert_eq!(&image.data[..4], &[115, 115, 115, 7]);
        assert_eq!(&image.data[4..], &[100, 100, 100, 100]);
    }

    #[test]
    fn test_density_one_leaves_image_untouched() {
        let config = NoiseConfig {
            density: 1.0,
            ..NoiseConfig::default()
        };
        let mut image = image_of(42, 8, 8);
        let before = image.clone();
        apply_noise(&mut image, &config, &mut StdRandom::seeded(3));
        assert_eq!(image, before);
    }
}
