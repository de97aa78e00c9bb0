use binary_reader::{BinaryReader, Endian};

use crate::{director::file::FileError, io::reader::DirectorExt};

#[derive(Clone)]
pub struct TextStyleRun {
    pub offset: u32,
    pub height: u16,
    pub ascent: u16,
    pub font_id: u16,
    pub style: u8,
    pub size: u16,
    pub color: (u8, u8, u8),
}

/// `STXT`: styled text. Header, raw text, then style runs.
pub struct TextChunk {
    pub text: String,
    pub style_runs: Vec<TextStyleRun>,
}

impl TextChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<TextChunk, FileError> {
        reader.set_endian(Endian::Big);

        let _header_len = reader.try_read_u32()?;
        let text_len = reader.try_read_u32()? as usize;
        let _style_len = reader.try_read_u32()?;
        let text = reader.read_string(text_len)?;

        let mut style_runs = Vec::new();
        if reader.bytes_left() >= 2 {
            let run_count = reader.try_read_u16()?;
            for _ in 0..run_count {
                if reader.bytes_left() < 20 {
                    break;
                }
                let offset = reader.try_read_u32()?;
                let height = reader.try_read_u16()?;
                let ascent = reader.try_read_u16()?;
                let font_id = reader.try_read_u16()?;
                let style = reader.try_read_u8()?;
                let _pad = reader.try_read_u8()?;
                let size = reader.try_read_u16()?;
                let r = reader.try_read_u16()?;
                let g = reader.try_read_u16()?;
                let b = reader.try_read_u16()?;
                style_runs.push(TextStyleRun {
                    offset,
                    height,
                    ascent,
                    font_id,
                    style,
                    size,
                    color: ((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8),
                });
            }
        }

        Ok(TextChunk { text, style_runs })
    }
}
