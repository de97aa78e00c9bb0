use fxhash::FxHashMap;

pub type BitmapRef = usize;

/// A mutable 32-bit RGBA pixel buffer owned by the VM, addressed through
/// `Datum::Image`.
#[derive(Clone)]
pub struct Bitmap {
    pub width: u16,
    pub height: u16,
    pub bit_depth: u8,
    pub data: Vec<u32>,
}

impl Bitmap {
    pub fn new(width: u16, height: u16, bit_depth: u8) -> Bitmap {
        Bitmap {
            width,
            height,
            bit_depth,
            data: vec![0xFFFFFFFF; width as usize * height as usize],
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.data[y as usize * self.width as usize + x as usize] = color;
        true
    }

    pub fn fill_rect(&mut self, rect: (i32, i32, i32, i32), color: u32) {
        let (left, top, right, bottom) = rect;
        for y in top.max(0)..bottom.min(self.height as i32) {
            for x in left.max(0)..right.min(self.width as i32) {
                self.data[y as usize * self.width as usize + x as usize] = color;
            }
        }
    }

    /// Nearest-neighbour blit from a source rect to a destination rect.
    pub fn copy_pixels(
        &mut self,
        src: &Bitmap,
        dst_rect: (i32, i32, i32, i32),
        src_rect: (i32, i32, i32, i32),
    ) {
        let (dl, dt, dr, db) = dst_rect;
        let (sl, st, sr, sb) = src_rect;
        let dst_w = dr - dl;
        let dst_h = db - dt;
        let src_w = sr - sl;
        let src_h = sb - st;
        if dst_w <= 0 || dst_h <= 0 || src_w <= 0 || src_h <= 0 {
            return;
        }
        for dy in 0..dst_h {
            for dx in 0..dst_w {
                let sx = sl + dx * src_w / dst_w;
                let sy = st + dy * src_h / dst_h;
                if let Some(color) = src.get_pixel(sx, sy) {
                    self.set_pixel(dl + dx, dt + dy, color);
                }
            }
        }
    }

    pub fn crop(&self, rect: (i32, i32, i32, i32)) -> Bitmap {
        let (left, top, right, bottom) = rect;
        let width = (right - left).max(0) as u16;
        let height = (bottom - top).max(0) as u16;
        let mut result = Bitmap::new(width, height, self.bit_depth);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if let Some(color) = self.get_pixel(left + x, top + y) {
                    result.set_pixel(x, y, color);
                }
            }
        }
        result
    }
}

pub struct BitmapManager {
    bitmaps: FxHashMap<BitmapRef, Bitmap>,
    counter: BitmapRef,
}

impl BitmapManager {
    pub fn new() -> BitmapManager {
        BitmapManager {
            bitmaps: FxHashMap::default(),
            counter: 1,
        }
    }

    pub fn add_bitmap(&mut self, bitmap: Bitmap) -> BitmapRef {
        let id = self.counter;
        self.counter += 1;
        self.bitmaps.insert(id, bitmap);
        id
    }

    pub fn get_bitmap(&self, id: BitmapRef) -> Option<&Bitmap> {
        self.bitmaps.get(&id)
    }

    pub fn get_bitmap_mut(&mut self, id: BitmapRef) -> Option<&mut Bitmap> {
        self.bitmaps.get_mut(&id)
    }

    pub fn reset(&mut self) {
        self.bitmaps.clear();
        self.counter = 1;
    }
}

impl Default for BitmapManager {
    fn default() -> Self {
        Self::new()
    }
}
