//! Bilateral mirroring for sections drawn on one half only
//!
//! The left half of every layer is copied onto the right half with a
//! horizontal flip. Mirrored geometry turns tangent-space X around, so the
//! copied normal pixels also get their red channel inverted. Anything that
//! must not be duplicated (a single label, say) is drawn after this pass.

use super::{TextureBuffer, TextureSet};

fn flip_into_right(buffer: &mut TextureBuffer, invert_red: bool) {
    let width = buffer.width;
    for y in 0..buffer.height {
        for x in 0..width / 2 {
            let mut pixel = buffer.get_pixel(x, y);
            if invert_red {
                pixel[0] = 255 - pixel[0];
            }
            buffer.set_pixel(width - 1 - x, y, pixel);
        }
    }
}

/// Copy the left half of every layer onto the right half
///
/// With an odd width the center column is left as drawn.
pub fn mirror_bilateral(set: &mut TextureSet) {
    flip_into_right(&mut set.color, false);
    flip_into_right(&mut set.emissive, false);
    flip_into_right(&mut set.normal, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Color;
    use crate::texture::Addressing;

    #[test]
    fn test_mirror_copies_left_half() {
        let mut set = TextureSet::new(6, 2, Color::BLACK, Addressing::Clamp);
        set.color.set_pixel(0, 1, [200, 10, 20, 255]);
        set.emissive.set_pixel(2, 0, [1, 2, 3, 255]);
        set.normal.set_pixel(1, 0, [168, 100, 240, 255]);
        // Right-half content is overwritten
        set.color.set_pixel(4, 0, [9, 9, 9, 255]);

        mirror_bilateral(&mut set);

        assert_eq!(set.color.get_pixel(5, 1), [200, 10, 20, 255]);
        assert_eq!(set.emissive.get_pixel(3, 0), [1, 2, 3, 255]);
        assert_eq!(set.normal.get_pixel(4, 0), [255 - 168, 100, 240, 255]);
        assert_eq!(set.color.get_pixel(4, 0), set.color.get_pixel(1, 0));
    }

    #[test]
    fn test_odd_width_keeps_center_column() {
        let mut set = TextureSet::new(5, 1, Color::BLACK, Addressing::Clamp);
        set.normal.set_pixel(2, 0, [10, 128, 255, 255]);
        mirror_bilateral(&mut set);
        assert_eq!(set.normal.get_pixel(2, 0), [10, 128, 255, 255]);
        assert_eq!(set.normal.get_pixel(4, 0)[0], 255 - 128);
    }
}
