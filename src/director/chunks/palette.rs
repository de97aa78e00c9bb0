use binary_reader::{BinaryReader, Endian};

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `CLUT`: a colour lookup table. Six bytes per entry, high byte of each
/// 16-bit component carries the 8-bit channel value.
#[derive(Debug)]
pub struct PaletteChunk {
    pub colors: Vec<(u8, u8, u8)>,
}

impl PaletteChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<PaletteChunk, FileError> {
        reader.set_endian(Endian::Big);

        let mut colors = Vec::with_capacity(reader.bytes_left() / 6);
        while reader.bytes_left() >= 6 {
            let r = reader.try_read_u16()?;
            let g = reader.try_read_u16()?;
            let b = reader.try_read_u16()?;
            colors.push(((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8));
        }

        Ok(PaletteChunk { colors })
    }
}
