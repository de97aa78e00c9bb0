use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `CAS*`: a dense array of `CASt` resource ids indexed by member slot.
/// A zero id marks an empty slot.
#[derive(Debug)]
pub struct CastAssocChunk {
    pub member_ids: Vec<u32>,
}

impl CastAssocChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<CastAssocChunk, FileError> {
        reader.set_endian(binary_reader::Endian::Big);

        let mut member_ids: Vec<u32> = Vec::new();
        while !reader.eof() {
            member_ids.push(reader.try_read_u32()?);
        }

        Ok(CastAssocChunk { member_ids })
    }
}
