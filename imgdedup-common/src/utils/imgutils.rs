use image::{GrayImage, ImageBuffer, RgbImage};

/// A solid-color image.
pub fn filled(width: u32, height: u32, red: u8, green: u8, blue: u8) -> RgbImage {
    let mut buf = ImageBuffer::new(width, height);
    buf.enumerate_pixels_mut()
        .for_each(|(_, _, pixel)| *pixel = image::Rgb([red, green, blue]));
    buf
}

/// Build a grayscale image from literal rows. All rows must be equally long.
pub fn construct_gray(raw: &[&[u8]]) -> GrayImage {
    assert!(raw.windows(2).all(|w| w[0].len() == w[1].len()));
    let height = raw.len() as u32;
    let width = raw.iter().next().map(|row| row.len()).unwrap_or(0) as u32;
    GrayImage::from_fn(width, height, |x, y| {
        image::Luma([raw[y as usize][x as usize]])
    })
}

/// A diagonal luminance ramp with a coarse checker overlay, useful as a
/// structured stand-in for a photograph.
pub fn textured(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let ramp = ((x + y) * 255 / (width + height).max(1)) as u8;
        let checker = if (x / 32 + y / 32) % 2 == 0 { 40 } else { 0 };
        let v = ramp.saturating_add(checker);
        image::Rgb([v, v, v])
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filled_is_solid() {
        let img = filled(4, 3, 9, 8, 7);
        assert_eq!((4, 3), img.dimensions());
        assert!(img.pixels().all(|p| *p == image::Rgb([9, 8, 7])));
    }

    #[test]
    fn construct_gray_is_row_major() {
        let img = construct_gray(&[&[1, 2], &[3, 4]]);
        assert_eq!((2, 2), img.dimensions());
        assert_eq!(1, img.get_pixel(0, 0)[0]);
        assert_eq!(2, img.get_pixel(1, 0)[0]);
        assert_eq!(3, img.get_pixel(0, 1)[0]);
        assert_eq!(4, img.get_pixel(1, 1)[0]);
    }

    #[test]
    fn textured_is_not_flat() {
        let img = textured(128, 128);
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().any(|p| *p != first));
    }
}
