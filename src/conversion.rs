//! Pixel format conversion between the renderer and the encoder.
//!
//! rlottie renders premultiplied-alpha BGRA; libwebp's animation encoder
//! takes straight-alpha RGBA. [`unpremultiply_bgra`] converts one pixel at
//! a time so the renderer can write straight into the encoder's buffer.

/// Convert one premultiplied BGRA pixel into a straight-alpha RGBA pixel.
///
/// Fully transparent pixels map to `[0, 0, 0, 0]`. Colour channels are
/// divided by alpha with rounding and clamped to 255.
#[inline]
pub fn unpremultiply_bgra(bgra: [u8; 4]) -> [u8; 4] {
    let [b, g, r, a] = bgra;
    match a {
        0 => [0, 0, 0, 0],
        255 => [r, g, b, 255],
        _ => {
            let alpha = u32::from(a);
            let channel = |value: u8| -> u8 {
                let scaled = (u32::from(value) * 255 + alpha / 2) / alpha;
                scaled.min(255) as u8
            };
            [channel(r), channel(g), channel(b), a]
        }
    }
}
