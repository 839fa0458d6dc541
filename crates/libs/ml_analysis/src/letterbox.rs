use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::Array4;

/// Gray used by YOLO exports to pad letterboxed input.
const PAD_VALUE: u8 = 114;

/// Scale and padding applied when fitting an image into the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub source_width: u32,
    pub source_height: u32,
}

impl Letterbox {
    #[must_use]
    pub fn new(source_width: u32, source_height: u32, input_size: u32) -> Self {
        let size = input_size as f32;
        let scale = (size / source_width as f32).min(size / source_height as f32);
        let resized_w = (source_width as f32 * scale).round();
        let resized_h = (source_height as f32 * scale).round();

        Self {
            scale,
            pad_x: ((size - resized_w) / 2.0).floor(),
            pad_y: ((size - resized_h) / 2.0).floor(),
            source_width,
            source_height,
        }
    }

    #[must_use]
    pub fn resized_dimensions(&self) -> (u32, u32) {
        (
            ((self.source_width as f32 * self.scale).round() as u32).max(1),
            ((self.source_height as f32 * self.scale).round() as u32).max(1),
        )
    }

    /// Map an `[x1, y1, x2, y2]` box from model input space back to source pixels,
    /// clipped to the source image.
    #[must_use]
    pub fn restore(&self, [x1, y1, x2, y2]: [f32; 4]) -> [f32; 4] {
        let w = self.source_width as f32;
        let h = self.source_height as f32;
        [
            ((x1 - self.pad_x) / self.scale).clamp(0.0, w),
            ((y1 - self.pad_y) / self.scale).clamp(0.0, h),
            ((x2 - self.pad_x) / self.scale).clamp(0.0, w),
            ((y2 - self.pad_y) / self.scale).clamp(0.0, h),
        ]
    }
}

/// Resize into an `input_size` square keeping aspect ratio, as a `[1, 3, S, S]` tensor in `[0, 1]`.
#[must_use]
pub fn letterbox_tensor(image: &DynamicImage, input_size: u32) -> (Array4<f32>, Letterbox) {
    let rgb = image.to_rgb8();
    let letterbox = Letterbox::new(rgb.width(), rgb.height(), input_size);
    let (resized_w, resized_h) = letterbox.resized_dimensions();
    let resized = imageops::resize(&rgb, resized_w, resized_h, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(input_size, input_size, Rgb([PAD_VALUE; 3]));
    imageops::overlay(
        &mut canvas,
        &resized,
        i64::from(letterbox.pad_x as u32),
        i64::from(letterbox.pad_y as u32),
    );

    let size = input_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = f32::from(pixel[c]) / 255.0;
        }
    }

    (tensor, letterbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_is_padded_vertically() {
        let letterbox = Letterbox::new(1280, 640, 640);
        assert_eq!(letterbox.scale, 0.5);
        assert_eq!(letterbox.pad_x, 0.0);
        assert_eq!(letterbox.pad_y, 160.0);
        assert_eq!(letterbox.resized_dimensions(), (640, 320));
    }

    #[test]
    fn restore_undoes_scale_and_padding() {
        let letterbox = Letterbox::new(1280, 640, 640);
        let restored = letterbox.restore([100.0, 200.0, 300.0, 400.0]);
        assert_eq!(restored, [200.0, 80.0, 600.0, 480.0]);
    }

    #[test]
    fn restore_clips_to_image() {
        let letterbox = Letterbox::new(640, 640, 640);
        let restored = letterbox.restore([-20.0, -5.0, 700.0, 650.0]);
        assert_eq!(restored, [0.0, 0.0, 640.0, 640.0]);
    }

    #[test]
    fn tensor_has_model_shape_and_padding() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([255, 0, 0])));
        let (tensor, letterbox) = letterbox_tensor(&image, 32);
        assert_eq!(tensor.shape(), &[1, 3, 32, 32]);
        assert_eq!(letterbox.pad_y, 8.0);
        // Padding rows are gray, content rows keep the source color.
        let gray = f32::from(PAD_VALUE) / 255.0;
        assert!((tensor[[0, 0, 0, 0]] - gray).abs() < 1e-6);
        assert!((tensor[[0, 0, 16, 16]] - 1.0).abs() < 0.01);
        assert!(tensor[[0, 1, 16, 16]].abs() < 0.01);
    }
}
