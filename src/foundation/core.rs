use std::{fmt, str::FromStr};

use crate::foundation::error::{AdError, AdResult};

/// Pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size, rejecting zero-area dimensions.
    pub fn new(width: u32, height: u32) -> AdResult<Self> {
        if width == 0 || height == 0 {
            return Err(AdError::invalid_input(format!(
                "size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Total pixel count.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Integer pixel rectangle, `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Opaque RGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// White (`#FFFFFF`).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> AdResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AdError::invalid_input(format!(
                "color '{s}' is not of the form #RRGGBB"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| AdError::invalid_input(format!("color '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Lift into RGBA with the given alpha.
    pub fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl FromStr for Rgb8 {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Channels as an array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Mutable straight-alpha RGBA8 pixel buffer.
///
/// A canvas is owned by exactly one stage at a time; stages consume their input canvas and
/// return a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> AdResult<Self> {
        Self::filled(
            width,
            height,
            Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
        )
    }

    /// Canvas filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> AdResult<Self> {
        let size = Size::new(width, height)?;
        Ok(Self {
            width,
            height,
            data: color.to_array().repeat(size.area()),
        })
    }

    /// Wrap tightly packed, row-major straight RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> AdResult<Self> {
        let size = Size::new(width, height)?;
        let expected = size
            .area()
            .checked_mul(4)
            .ok_or_else(|| AdError::invalid_input("canvas buffer size overflow"))?;
        if data.len() != expected {
            return Err(AdError::invalid_input(format!(
                "canvas buffer length {} does not match {}x{}x4",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take ownership of an `image` crate buffer.
    pub fn from_image(img: image::RgbaImage) -> AdResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }

    /// Copy into an `image` crate buffer.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y))
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw straight RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw straight RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume into raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read a pixel. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite a pixel. Panics when out of bounds, like slice indexing.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Number of pixels with non-zero alpha.
    pub fn visible_pixel_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Extract the alpha channel.
    pub fn alpha_mask(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            data: self.data.chunks_exact(4).map(|px| px[3]).collect(),
        }
    }

    /// Replace the alpha channel with `mask`, keeping RGB.
    pub fn with_alpha(mut self, mask: &Mask) -> AdResult<Self> {
        if mask.width != self.width || mask.height != self.height {
            return Err(AdError::invalid_input(format!(
                "mask {}x{} does not match canvas {}x{}",
                mask.width, mask.height, self.width, self.height
            )));
        }
        for (px, &a) in self.data.chunks_exact_mut(4).zip(mask.data.iter()) {
            px[3] = a;
        }
        Ok(self)
    }

    /// Copy out a sub-rectangle.
    pub fn crop(&self, rect: PixelRect) -> AdResult<Self> {
        if rect.width == 0
            || rect.height == 0
            || rect.x.saturating_add(rect.width) > self.width
            || rect.y.saturating_add(rect.height) > self.height
        {
            return Err(AdError::invalid_input(format!(
                "crop rect {rect:?} is outside canvas {}x{}",
                self.width, self.height
            )));
        }
        let mut data = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);
        for y in rect.y..rect.y + rect.height {
            let start = self.offset(rect.x, y);
            let end = start + rect.width as usize * 4;
            data.extend_from_slice(&self.data[start..end]);
        }
        Self::from_rgba8(rect.width, rect.height, data)
    }
}

/// Single-channel 0–255 buffer aligned with a canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Wrap tightly packed row-major bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> AdResult<Self> {
        let size = Size::new(width, height)?;
        if data.len() != size.area() {
            return Err(AdError::invalid_input(format!(
                "mask buffer length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Value at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Tight bounding box of non-zero values, or `None` when all values are zero.
    pub fn bounding_box(&self) -> Option<PixelRect> {
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);
        let mut any = false;
        for y in 0..self.height {
            let row = &self.data[y as usize * self.width as usize..][..self.width as usize];
            for (x, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let x = x as u32;
                any = true;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        any.then(|| PixelRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
