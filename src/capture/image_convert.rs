//! Conversion of raw camera images into encoder-ready pixel buffers.

use anyhow::{bail, ensure, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::writer::EncodeSettings;

const BYTES_PER_PIXEL: usize = 4;

/// A raw camera image as delivered with a tracking frame.
#[derive(Debug, Clone)]
pub enum CameraImage {
    Rgba(RgbaImage),
    /// Bi-planar 4:2:0 YCbCr: a full-resolution luma plane followed by a
    /// half-resolution plane of interleaved Cb/Cr pairs. Full-range BT.601.
    YCbCrBiPlanar {
        width: u32,
        height: u32,
        luma: Vec<u8>,
        chroma: Vec<u8>,
    },
}

impl CameraImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CameraImage::Rgba(image) => image.dimensions(),
            CameraImage::YCbCrBiPlanar { width, height, .. } => (*width, *height),
        }
    }

    pub fn to_rgba(&self) -> Result<RgbaImage> {
        match self {
            CameraImage::Rgba(image) => Ok(image.clone()),
            CameraImage::YCbCrBiPlanar {
                width,
                height,
                luma,
                chroma,
            } => ycbcr_to_rgba(*width, *height, luma, chroma),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PixelLayout {
    /// 32-bit ARGB, alpha byte first.
    Argb32,
    Rgba32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rotation {
    None,
    Clockwise90,
    CounterClockwise90,
}

/// A packed pixel buffer sized and laid out for the video encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeBuffer {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl EncodeBuffer {
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Pixel at (x, y) as stored, in the buffer's own channel order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.bytes_per_row() + x as usize * BYTES_PER_PIXEL;
        let bytes = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// X and Y scale factors mapping `source` extents onto `target` extents.
pub fn scale_factors(source: (u32, u32), target: (u32, u32)) -> (f64, f64) {
    (
        f64::from(target.0) / f64::from(source.0),
        f64::from(target.1) / f64::from(source.1),
    )
}

/// Rotates the camera image into device orientation, scales it to the encode
/// resolution and packs it into the encoder's pixel layout.
pub fn convert_camera_image(image: &CameraImage, settings: &EncodeSettings) -> Result<EncodeBuffer> {
    ensure!(
        settings.width > 0 && settings.height > 0,
        "encode resolution {}x{} is empty",
        settings.width,
        settings.height
    );

    let (source_width, source_height) = image.dimensions();
    ensure!(
        source_width > 0 && source_height > 0,
        "camera image {}x{} is empty",
        source_width,
        source_height
    );

    let rgba = image.to_rgba()?;
    let rotated = match settings.rotation {
        Rotation::None => rgba,
        Rotation::Clockwise90 => imageops::rotate90(&rgba),
        Rotation::CounterClockwise90 => imageops::rotate270(&rgba),
    };

    let target = (settings.width, settings.height);
    let (scale_x, scale_y) = scale_factors(rotated.dimensions(), target);
    let scaled = if scale_x == 1.0 && scale_y == 1.0 {
        rotated
    } else {
        imageops::resize(&rotated, target.0, target.1, FilterType::Triangle)
    };

    Ok(pack(scaled, settings.pixel_layout))
}

fn pack(image: RgbaImage, layout: PixelLayout) -> EncodeBuffer {
    let (width, height) = image.dimensions();
    let data = match layout {
        PixelLayout::Rgba32 => image.into_raw(),
        PixelLayout::Argb32 => image
            .pixels()
            // Alpha is not carried by camera frames; the encoder skips it anyway.
            .flat_map(|Rgba([r, g, b, _])| [u8::MAX, *r, *g, *b])
            .collect(),
    };

    EncodeBuffer {
        width,
        height,
        layout,
        data,
    }
}

fn ycbcr_to_rgba(width: u32, height: u32, luma: &[u8], chroma: &[u8]) -> Result<RgbaImage> {
    let (w, h) = (width as usize, height as usize);
    let chroma_width = w.div_ceil(2);
    let chroma_height = h.div_ceil(2);

    if luma.len() < w * h {
        bail!("luma plane has {} bytes, expected {}", luma.len(), w * h);
    }
    if chroma.len() < chroma_width * chroma_height * 2 {
        bail!(
            "chroma plane has {} bytes, expected {}",
            chroma.len(),
            chroma_width * chroma_height * 2
        );
    }

    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let (x, y) = (x as usize, y as usize);
        let luma_value = f32::from(luma[y * w + x]);
        let chroma_offset = ((y / 2) * chroma_width + x / 2) * 2;
        let cb = f32::from(chroma[chroma_offset]) - 128.0;
        let cr = f32::from(chroma[chroma_offset + 1]) - 128.0;

        let r = luma_value + 1.402 * cr;
        let g = luma_value - 0.344_136 * cb - 0.714_136 * cr;
        let b = luma_value + 1.772 * cb;

        *pixel = Rgba([to_channel(r), to_channel(g), to_channel(b), u8::MAX]);
    }

    Ok(out)
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::writer::VideoCodec;

    fn settings(width: u32, height: u32, rotation: Rotation, layout: PixelLayout) -> EncodeSettings {
        EncodeSettings {
            codec: VideoCodec::H264,
            width,
            height,
            pixel_layout: layout,
            rotation,
            expects_media_data_in_real_time: true,
        }
    }

    fn landscape_with_red_corner() -> CameraImage {
        // 4x2 landscape frame, red pixel at top-left, everything else blue.
        let mut image = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255]));
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        CameraImage::Rgba(image)
    }

    #[test]
    fn rotation_turns_landscape_into_portrait() {
        let buffer = convert_camera_image(
            &landscape_with_red_corner(),
            &settings(2, 4, Rotation::Clockwise90, PixelLayout::Rgba32),
        )
        .unwrap();

        assert_eq!((buffer.width, buffer.height), (2, 4));
        // Clockwise rotation moves the top-left pixel to the top-right.
        assert_eq!(buffer.pixel(1, 0), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn scales_to_encode_resolution() {
        let buffer = convert_camera_image(
            &landscape_with_red_corner(),
            &settings(6, 12, Rotation::Clockwise90, PixelLayout::Rgba32),
        )
        .unwrap();

        assert_eq!((buffer.width, buffer.height), (6, 12));
        assert_eq!(buffer.data.len(), 6 * 12 * 4);
        assert_eq!(buffer.bytes_per_row(), 24);
    }

    #[test]
    fn scale_factors_are_independent_per_axis() {
        let (sx, sy) = scale_factors((1440, 1920), (1170, 2532));
        assert!((sx - 1170.0 / 1440.0).abs() < 1e-12);
        assert!((sy - 2532.0 / 1920.0).abs() < 1e-12);
    }

    #[test]
    fn argb_layout_puts_alpha_first() {
        let image = CameraImage::Rgba(RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0])));
        let buffer =
            convert_camera_image(&image, &settings(1, 1, Rotation::None, PixelLayout::Argb32))
                .unwrap();

        assert_eq!(buffer.data, vec![255, 10, 20, 30]);
    }

    #[test]
    fn neutral_chroma_converts_to_grey() {
        let image = CameraImage::YCbCrBiPlanar {
            width: 2,
            height: 2,
            luma: vec![100; 4],
            chroma: vec![128, 128],
        };
        let rgba = image.to_rgba().unwrap();
        for pixel in rgba.pixels() {
            assert_eq!(*pixel, Rgba([100, 100, 100, 255]));
        }
    }

    #[test]
    fn strong_red_chroma_saturates_red_channel() {
        let image = CameraImage::YCbCrBiPlanar {
            width: 1,
            height: 1,
            luma: vec![128],
            chroma: vec![128, 255],
        };
        let rgba = image.to_rgba().unwrap();
        let Rgba([r, _, b, _]) = *rgba.get_pixel(0, 0);
        assert_eq!(r, 255);
        assert_eq!(b, 128);
    }

    #[test]
    fn short_planes_are_rejected() {
        let image = CameraImage::YCbCrBiPlanar {
            width: 4,
            height: 4,
            luma: vec![0; 16],
            chroma: vec![128; 3],
        };
        assert!(convert_camera_image(
            &image,
            &settings(4, 4, Rotation::None, PixelLayout::Argb32)
        )
        .is_err());
    }

    #[test]
    fn empty_images_are_rejected() {
        let image = CameraImage::Rgba(RgbaImage::new(0, 0));
        assert!(convert_camera_image(
            &image,
            &settings(4, 4, Rotation::None, PixelLayout::Argb32)
        )
        .is_err());
    }
}
