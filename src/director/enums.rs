use binary_reader::BinaryReader;
use num_derive::FromPrimitive;

/// Cast member type code from the `CASt` chunk.
#[derive(Copy, Clone, FromPrimitive, PartialEq, Debug)]
pub enum MemberType {
    Null = 0,
    Bitmap = 1,
    FilmLoop = 2,
    Field = 3,
    Palette = 4,
    Picture = 5,
    Sound = 6,
    Button = 7,
    Shape = 8,
    Movie = 9,
    DigitalVideo = 10,
    Script = 11,
    Text = 12,
    Ole = 13,
    Transition = 14,
    Xtra = 15,
}

impl MemberType {
    pub fn from(val: u32) -> MemberType {
        num::FromPrimitive::from_u32(val).unwrap_or(MemberType::Null)
    }
}

#[derive(Copy, Clone, FromPrimitive, PartialEq, Debug)]
pub enum ScriptType {
    Invalid = 0,
    Score = 1,
    Movie = 3,
    Parent = 7,
}

impl ScriptType {
    pub fn from(val: u16) -> ScriptType {
        num::FromPrimitive::from_u16(val).unwrap_or(ScriptType::Invalid)
    }
}

#[derive(Clone)]
pub struct BitmapInfo {
    pub width: u16,
    pub height: u16,
    pub reg_x: i16,
    pub reg_y: i16,
    pub bit_depth: u8,
    pub palette_id: i16,
}

impl From<&[u8]> for BitmapInfo {
    fn from(bytes: &[u8]) -> BitmapInfo {
        let mut reader = BinaryReader::from_u8(bytes);
        reader.set_endian(binary_reader::Endian::Big);

        let _ = reader.read_u16();
        let _ = reader.read_u32();
        let height = reader.read_u16().unwrap_or(0);
        let width = reader.read_u16().unwrap_or(0);
        let _ = reader.read_u16();
        let _ = reader.read_u16();
        let _ = reader.read_u16();
        let _ = reader.read_u16();
        let reg_y = reader.read_i16().unwrap_or(0);
        let reg_x = reader.read_i16().unwrap_or(0);
        let _ = reader.read_u8();
        let (bit_depth, palette_id) = if reader.pos >= reader.length {
            (1, 0)
        } else {
            let depth = reader.read_u8().unwrap_or(1);
            let _ = reader.read_i16();
            let palette = reader.read_i16().unwrap_or(1) - 1;
            (depth, palette)
        };

        BitmapInfo {
            width,
            height,
            reg_x,
            reg_y,
            bit_depth,
            palette_id,
        }
    }
}

#[derive(Clone)]
#[allow(dead_code)]
pub enum ShapeType {
    Rect,
    Oval,
    OvalRect,
    Line,
    Unknown,
}

#[derive(Clone)]
pub struct ShapeInfo {
    pub shape_type: ShapeType,
    pub reg_point: (i16, i16),
    pub width: u16,
    pub height: u16,
    pub color: u8,
}

impl From<&[u8]> for ShapeInfo {
    fn from(bytes: &[u8]) -> ShapeInfo {
        let mut reader = BinaryReader::from_u8(bytes);
        reader.set_endian(binary_reader::Endian::Big);

        let shape_type = reader.read_u16().unwrap_or(0);
        let reg_y = reader.read_u16().unwrap_or(0);
        let reg_x = reader.read_u16().unwrap_or(0);
        let height = reader.read_u16().unwrap_or(0);
        let width = reader.read_u16().unwrap_or(0);
        let _ = reader.read_u16();
        let color = reader.read_u8().unwrap_or(0);

        ShapeInfo {
            shape_type: match shape_type {
                0x0001 => ShapeType::Rect,
                0x0002 => ShapeType::OvalRect,
                0x0003 => ShapeType::Oval,
                0x0004 => ShapeType::Line,
                _ => ShapeType::Unknown,
            },
            reg_point: (reg_x as i16, reg_y as i16),
            width,
            height,
            color,
        }
    }
}

#[derive(Clone)]
pub struct FilmLoopInfo {
    pub reg_point: (i16, i16),
    pub width: u16,
    pub height: u16,
    pub center: u8,
    pub crop: u8,
    pub sound: u8,
    pub loops: u8,
}

impl From<&[u8]> for FilmLoopInfo {
    fn from(bytes: &[u8]) -> FilmLoopInfo {
        let mut reader = BinaryReader::from_u8(bytes);
        reader.set_endian(binary_reader::Endian::Big);

        let reg_y = reader.read_u16().unwrap_or(0);
        let reg_x = reader.read_u16().unwrap_or(0);
        let height = reader.read_u16().unwrap_or(0);
        let width = reader.read_u16().unwrap_or(0);
        let _ = reader.read_u16();
        let _ = reader.read_u8();
        let flags = reader.read_u8().unwrap_or(0);
        let center = flags & 0b1;
        let crop = 1 - ((flags & 0b10) >> 1);
        let sound = (flags & 0b1000) >> 3;
        let loops = 1 - ((flags & 0b100000) >> 5);

        FilmLoopInfo {
            reg_point: (reg_x as i16, reg_y as i16),
            width,
            height,
            center,
            crop,
            sound,
            loops,
        }
    }
}
