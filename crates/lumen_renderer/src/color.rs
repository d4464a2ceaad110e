//! Color output: gamma correction, quantization and the PPM (P3) codec.

use std::io::{self, Write};

use lumen_math::{Color, Interval};

/// Valid range of a gamma-corrected component before scaling to a byte.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Translate a linear color into the [0, 255] byte range.
pub fn color_to_bytes(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Streams a plain-text PPM image one pixel at a time.
///
/// Pixels must be supplied row by row, top to bottom, left to right.
pub struct PpmWriter<W: Write> {
    out: W,
    remaining: usize,
}

impl<W: Write> PpmWriter<W> {
    /// Write the `P3` header and return a writer ready for pixel data.
    pub fn new(mut out: W, width: u32, height: u32) -> io::Result<Self> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", width, height)?;
        writeln!(out, "255")?;

        Ok(Self {
            out,
            remaining: width as usize * height as usize,
        })
    }

    /// Write out one pixel's color components.
    pub fn write_pixel(&mut self, color: Color) -> io::Result<()> {
        if self.remaining == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "more pixels written than the header declares",
            ));
        }
        self.remaining -= 1;

        let [r, g, b] = color_to_bytes(color);
        writeln!(self.out, "{} {} {}", r, g, b)
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.remaining != 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} pixels missing from image", self.remaining),
            ));
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Simple image buffer of averaged linear colors in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at column x, row y.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at column x, row y.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Quantized RGB bytes, three per pixel.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_bytes(*c)).collect()
    }

    /// Serialize as a plain-text PPM image.
    pub fn write_ppm<W: Write>(&self, out: W) -> io::Result<W> {
        let mut writer = PpmWriter::new(out, self.width, self.height)?;
        for color in &self.pixels {
            writer.write_pixel(*color)?;
        }
        writer.finish()
    }
}
