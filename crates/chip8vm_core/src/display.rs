use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// 64x32 monochrome framebuffer. Coordinates wrap on both axes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl Framebuffer {
    #[inline]
    fn offset(x: usize, y: usize) -> usize {
        (y % SCREEN_HEIGHT) * SCREEN_WIDTH + (x % SCREEN_WIDTH)
    }

    pub fn clear(&mut self) {
        self.pixels = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    /// XOR `rows` onto the screen with the top-left corner at `(x, y)`,
    /// most significant bit leftmost.
    ///
    /// Returns `true` if any lit pixel was switched off by the draw.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if (bits >> (7 - col)) & 0x1 == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[Self::offset(x + col, y + row)];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }

    /// Row-major pixels, `SCREEN_WIDTH` per row.
    pub fn as_slice(&self) -> &[bool] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(SCREEN_WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }

    /// One line of text per row, using `on`/`off` for each pixel.
    pub fn render_text(&self, on: char, off: char) -> String {
        let mut out = String::with_capacity((SCREEN_WIDTH + 1) * SCREEN_HEIGHT);
        for row in self.rows() {
            out.extend(row.iter().map(|&lit| if lit { on } else { off }));
            out.push('\n');
        }
        out
    }
}
