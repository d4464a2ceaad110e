//! Tile-based work items for concurrent rendering.
//!
//! Divides the image into rectangular tiles that workers pull from a shared
//! FIFO queue. A tile size of 1 makes every work item a single pixel.

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Column of the tile's top-left corner
    pub x: u32,
    /// Row of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Index of this tile in the queue order
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Global `(row, col)` of every pixel, row-major within the tile.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Tile {
            x, y, width, height, ..
        } = *self;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| (row, col)))
    }
}

/// Default tile size in pixels: one pixel per work item.
pub const DEFAULT_TILE_SIZE: u32 = 1;

/// Generate tiles covering the image exactly once, in row-major order.
///
/// Tiles on the right and bottom edges are clipped to the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, index));
            index += 1;
            x += tile_size;
        }
        y += tile_size;
    }

    tiles
}
