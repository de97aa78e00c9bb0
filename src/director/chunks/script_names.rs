use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `Lnam`: the indexed name table shared by every script of one `Lctx`.
#[derive(Debug)]
pub struct ScriptNamesChunk {
    pub names: Vec<String>,
}

impl ScriptNamesChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<ScriptNamesChunk, FileError> {
        reader.set_endian(binary_reader::Endian::Big);

        let _unknown0 = reader.try_read_u32()?;
        let _unknown1 = reader.try_read_u32()?;
        let _len1 = reader.try_read_u32()?;
        let _len2 = reader.try_read_u32()?;
        let names_offset = reader.try_read_u16()? as usize;
        let names_count = reader.try_read_u16()?;

        reader.jmp(names_offset);
        let names = (0..names_count)
            .map(|_| reader.read_pascal_string())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScriptNamesChunk { names })
    }
}
