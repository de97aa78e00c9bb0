use binary_reader::BinaryReader;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `imap`: points at the active memory map of an uncompressed movie.
#[derive(Debug)]
pub struct InitialMapChunk {
    pub map_count: u32,
    pub mmap_offset: usize,
    pub director_version: u32,
}

impl InitialMapChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<InitialMapChunk, FileError> {
        let map_count = reader.try_read_u32()?;
        let mmap_offset = reader.try_read_u32()? as usize;
        let director_version = reader.try_read_u32()?;
        Ok(InitialMapChunk {
            map_count,
            mmap_offset,
            director_version,
        })
    }
}

pub struct MemoryMapEntry {
    pub fourcc: u32,
    pub len: usize,
    /// Absolute file offset of the chunk header (fourcc + length + data).
    pub offset: usize,
    pub flags: u16,
    pub next: i32,
}

/// `mmap`: the chunk index of an uncompressed movie. The resource id of a
/// chunk is its entry index.
pub struct MemoryMapChunk {
    pub header_size: u16,
    pub entry_size: u16,
    pub capacity: u32,
    pub used_count: u32,
    pub entries: Vec<MemoryMapEntry>,
}

impl MemoryMapChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<MemoryMapChunk, FileError> {
        let header_size = reader.try_read_u16()?;
        let entry_size = reader.try_read_u16()?;
        let capacity = reader.try_read_u32()?;
        let used_count = reader.try_read_u32()?;
        let _junk_head = reader.try_read_i32()?;
        let _junk_head2 = reader.try_read_i32()?;
        let _free_head = reader.try_read_i32()?;

        let mut entries = Vec::with_capacity(used_count as usize);
        for _ in 0..used_count {
            let entry_start = reader.pos;
            // reading tags with the file endian normalises XFIR's reversed
            // on-disk spelling back to the canonical big-endian value
            let fourcc = reader.try_read_u32()?;
            let len = reader.try_read_u32()? as usize;
            let offset = reader.try_read_u32()? as usize;
            let flags = reader.try_read_u16()?;
            let _unused = reader.try_read_u16()?;
            let next = reader.try_read_i32()?;
            entries.push(MemoryMapEntry {
                fourcc,
                len,
                offset,
                flags,
                next,
            });
            reader.jmp(entry_start + entry_size as usize);
        }

        Ok(MemoryMapChunk {
            header_size,
            entry_size,
            capacity,
            used_count,
            entries,
        })
    }
}
