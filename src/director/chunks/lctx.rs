use binary_reader::{BinaryReader, Endian};

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `Lctx`/`LctX`: an index of `Lscr` section ids plus the id of the `Lnam`
/// shared by every script in this context.
#[derive(Debug)]
pub struct ScriptContextChunk {
    pub entry_count: u32,
    pub lnam_section_id: u32,
    pub section_map: Vec<ScriptContextMapEntry>,
}

pub struct ScriptContextMapEntry {
    pub section_id: i32,
}

impl ScriptContextMapEntry {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<ScriptContextMapEntry, FileError> {
        let _unknown0 = reader.try_read_u32()?;
        let section_id = reader.try_read_i32()?;
        let _unknown1 = reader.try_read_u16()?;
        let _unknown2 = reader.try_read_u16()?;
        Ok(ScriptContextMapEntry { section_id })
    }
}

impl ScriptContextChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<ScriptContextChunk, FileError> {
        reader.set_endian(Endian::Big);

        let _unknown0 = reader.try_read_u32()?;
        let _unknown1 = reader.try_read_u32()?;
        let entry_count = reader.try_read_u32()?;
        let _entry_count2 = reader.try_read_u32()?;
        let entries_offset = reader.try_read_u16()? as usize;
        let _unknown2 = reader.try_read_u16()?;
        let _unknown3 = reader.try_read_u32()?;
        let _unknown4 = reader.try_read_u32()?;
        let _unknown5 = reader.try_read_u32()?;
        let lnam_section_id = reader.try_read_u32()?;
        let _valid_count = reader.try_read_u16()?;
        let _flags = reader.try_read_u16()?;
        let _free_pointer = reader.try_read_u16()?;

        reader.jmp(entries_offset);
        let section_map = (0..entry_count)
            .map(|_| ScriptContextMapEntry::from_reader(reader, dir_version))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScriptContextChunk {
            entry_count,
            lnam_section_id,
            section_map,
        })
    }
}
