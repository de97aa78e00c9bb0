use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::list_readers::read_pascal_string};

use super::list::BasicListChunk;

pub struct CastMemberInfoChunkHeader {
    pub data_offset: usize,
    pub flags: u32,
    /// For script members, 1-based index into the owning `Lctx` section map.
    pub script_id: u32,
}

/// The nested info list inside a `CASt` chunk. Its length fields are
/// big-endian regardless of the outer container endian; the member's name
/// is the second list item (the first is script source text, usually
/// stripped from protected movies).
pub struct CastMemberInfoChunk {
    pub header: CastMemberInfoChunkHeader,
    pub script_src_text: String,
    pub name: String,
}

impl CastMemberInfoChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<CastMemberInfoChunk, FileError> {
        let header = Self::read_header(reader, dir_version)?;
        let offset_table =
            BasicListChunk::read_offset_table(reader, dir_version, header.data_offset)?;
        let item_bufs = BasicListChunk::read_items(reader, dir_version, &offset_table)?;

        let script_src_text = item_bufs
            .first()
            .map(|buf| buf.iter().map(|&b| b as char).collect())
            .unwrap_or_default();
        let name = read_pascal_string(&item_bufs, 1, reader.endian);

        Ok(CastMemberInfoChunk {
            header,
            script_src_text,
            name,
        })
    }

    fn read_header(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<CastMemberInfoChunkHeader, FileError> {
        use crate::io::reader::DirectorExt;
        let data_offset = reader.try_read_u32()? as usize;
        let _unk1 = reader.try_read_u32()?;
        let _unk2 = reader.try_read_u32()?;
        let flags = reader.try_read_u32()?;
        let script_id = reader.try_read_u32()?;
        Ok(CastMemberInfoChunkHeader {
            data_offset,
            flags,
            script_id,
        })
    }
}
