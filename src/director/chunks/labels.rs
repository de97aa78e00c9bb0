use binary_reader::{BinaryReader, Endian};

use crate::{director::file::FileError, io::reader::DirectorExt};

#[derive(Clone, Debug)]
pub struct FrameLabel {
    pub frame_num: i32,
    pub label: String,
}

/// `VWLB`: frame labels. A table of `(frame, text offset)` pairs with one
/// trailing sentinel, followed by the concatenated label text.
#[derive(Debug)]
pub struct FrameLabelsChunk {
    pub labels: Vec<FrameLabel>,
}

impl FrameLabelsChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<FrameLabelsChunk, FileError> {
        reader.set_endian(Endian::Big);

        let count = reader.try_read_u16()? as usize;
        let mut entries = Vec::with_capacity(count + 1);
        for _ in 0..count + 1 {
            let frame_num = reader.try_read_u16()? as i32;
            let string_pos = reader.try_read_u16()? as usize;
            entries.push((frame_num, string_pos));
        }

        let text_start = reader.pos;
        let mut labels = Vec::with_capacity(count);
        for i in 0..count {
            let (frame_num, string_pos) = entries[i];
            let next_pos = entries[i + 1].1;
            reader.jmp(text_start + string_pos);
            let label = reader.read_string(next_pos.saturating_sub(string_pos))?;
            labels.push(FrameLabel { frame_num, label });
        }

        Ok(FrameLabelsChunk { labels })
    }
}
