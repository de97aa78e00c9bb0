use binary_reader::{BinaryReader, Endian};

use crate::{
    director::file::FileError,
    io::list_readers::{read_pascal_string, read_u16},
};

use super::list::BasicListChunk;

/// `MCsL`: one entry per cast library. A library is external iff its file
/// path is non-empty and no `CAS*` in this container covers its id.
#[derive(Debug)]
pub struct CastListChunk {
    pub entries: Vec<CastListEntry>,
}

#[derive(Debug)]
pub struct CastListEntry {
    pub name: String,
    pub file_path: String,
    pub preload_settings: u16,
    pub min_member: u16,
    pub max_member: u16,
    pub id: u32,
}

struct CastListChunkHeader {
    data_offset: usize,
    cast_count: u16,
    items_per_cast: u16,
}

impl CastListChunk {
    fn read_header(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<CastListChunkHeader, FileError> {
        use crate::io::reader::DirectorExt;
        let data_offset = reader.try_read_u32()? as usize;
        let _unk0 = reader.try_read_u16()?;
        let cast_count = reader.try_read_u16()?;
        let items_per_cast = reader.try_read_u16()?;
        let _unk1 = reader.try_read_u16()?;
        Ok(CastListChunkHeader {
            data_offset,
            cast_count,
            items_per_cast,
        })
    }

    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
        item_endian: Endian,
    ) -> Result<CastListChunk, FileError> {
        reader.set_endian(Endian::Big);

        let header = Self::read_header(reader, dir_version)?;
        let offset_table =
            BasicListChunk::read_offset_table(reader, dir_version, header.data_offset)?;
        let item_bufs = BasicListChunk::read_items(reader, dir_version, &offset_table)?;

        let entries = (0..header.cast_count)
            .map(|i| {
                let mut name = String::new();
                let mut file_path = String::new();
                let mut preload_settings: u16 = 0;
                let mut min_member: u16 = 0;
                let mut max_member: u16 = 0;
                let mut id: u32 = 0;

                if header.items_per_cast >= 1 {
                    name = read_pascal_string(
                        &item_bufs,
                        (i * header.items_per_cast + 1) as usize,
                        item_endian,
                    );
                }
                if header.items_per_cast >= 2 {
                    file_path = read_pascal_string(
                        &item_bufs,
                        (i * header.items_per_cast + 2) as usize,
                        item_endian,
                    );
                }
                if header.items_per_cast >= 3 {
                    preload_settings = read_u16(
                        &item_bufs,
                        (i * header.items_per_cast + 3) as usize,
                        item_endian,
                    );
                }
                if header.items_per_cast >= 4 {
                    let buf = &item_bufs[(i * header.items_per_cast + 4) as usize];
                    if buf.len() >= 8 {
                        use crate::io::reader::DirectorExt;
                        let mut item_reader = BinaryReader::from_vec(buf);
                        item_reader.set_endian(reader.endian);
                        min_member = item_reader.try_read_u16().unwrap_or(0);
                        max_member = item_reader.try_read_u16().unwrap_or(0);
                        id = item_reader.try_read_u32().unwrap_or(0);
                    }
                }

                CastListEntry {
                    name,
                    file_path,
                    preload_settings,
                    min_member,
                    max_member,
                    id,
                }
            })
            .collect();

        Ok(CastListChunk { entries })
    }
}
