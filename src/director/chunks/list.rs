use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// The shared list layout used by `MCsL` and cast info chunks: a header
/// holding a data offset, an offset table, then per-item byte buffers.
pub struct BasicListChunk {}

impl BasicListChunk {
    pub fn read_header(reader: &mut BinaryReader, _dir_version: u16) -> Result<usize, FileError> {
        let data_offset = reader.try_read_u32()?;
        Ok(data_offset as usize)
    }

    pub fn read_offset_table(
        reader: &mut BinaryReader,
        _dir_version: u16,
        data_offset: usize,
    ) -> Result<Vec<usize>, FileError> {
        reader.jmp(data_offset);
        let offset_table_len = reader.try_read_u16()?;
        (0..offset_table_len)
            .map(|_| reader.try_read_u32().map(|x| x as usize))
            .collect()
    }

    pub fn read_items(
        reader: &mut BinaryReader,
        _dir_version: u16,
        offset_table: &[usize],
    ) -> Result<Vec<Vec<u8>>, FileError> {
        let items_len = reader.try_read_u32()?;
        let list_offset = reader.pos;

        (0..offset_table.len())
            .map(|i| {
                let offset = offset_table[i];
                let next_offset = if i == offset_table.len() - 1 {
                    items_len as usize
                } else {
                    offset_table[i + 1]
                };
                reader.jmp(list_offset + offset);
                reader.try_read_bytes(next_offset.saturating_sub(offset))
            })
            .collect()
    }
}
