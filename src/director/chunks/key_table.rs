use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// One `(owner, section, fourcc)` ownership triple: chunk `cast_id` owns an
/// auxiliary chunk of type `fourcc` stored at `section_id`.
pub struct KeyTableEntry {
    pub section_id: u32,
    pub cast_id: u32,
    pub fourcc: u32,
}

impl KeyTableEntry {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<KeyTableEntry, FileError> {
        Ok(KeyTableEntry {
            section_id: reader.try_read_u32()?,
            cast_id: reader.try_read_u32()?,
            fourcc: reader.try_read_u32()?,
        })
    }
}

#[derive(Debug)]
pub struct KeyTableChunk {
    pub entry_size: u16,
    pub entry_size2: u16,
    pub entry_count: u32,
    pub used_count: u32,
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTableChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<KeyTableChunk, FileError> {
        let entry_size = reader.try_read_u16()?;
        let entry_size2 = reader.try_read_u16()?;
        let entry_count = reader.try_read_u32()?;
        let used_count = reader.try_read_u32()?;

        let entries = (0..entry_count)
            .map(|_| KeyTableEntry::from_reader(reader, dir_version))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(KeyTableChunk {
            entry_size,
            entry_size2,
            entry_count,
            used_count,
            entries,
        })
    }
}
