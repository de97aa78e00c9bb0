use binary_reader::{BinaryReader, Endian};
use itertools::Itertools;

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `VWSC`: the score. The VM only needs the frame-interval descriptors
/// (which sprite spans carry which behaviors); the per-frame channel deltas
/// are decompressed into one flat buffer for the external score driver.
#[derive(Debug)]
pub struct ScoreChunk {
    pub header: ScoreChunkHeader,
    pub frame_interval_primaries: Vec<FrameIntervalPrimary>,
    pub frame_interval_secondaries: Vec<FrameIntervalSecondary>,
    pub frame_data: ScoreFrameData,
}

#[derive(Debug)]
pub struct ScoreChunkHeader {
    pub total_length: u32,
    pub entry_count: u32,
}

#[derive(Debug)]
pub struct FrameIntervalPrimary {
    pub start_frame: u32,
    pub end_frame: u32,
    pub sprite_number: u32,
}

#[derive(Debug)]
pub struct FrameIntervalSecondary {
    pub cast_lib: u16,
    pub cast_member: u16,
}

#[derive(Debug)]
pub struct ScoreFrameData {
    pub frame_count: u32,
    pub sprite_record_size: u16,
    pub num_channels: u16,
    pub uncompressed_data: Vec<u8>,
}

impl ScoreChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<ScoreChunk, FileError> {
        reader.set_endian(Endian::Big);

        let header = ScoreChunkHeader {
            total_length: {
                let total_length = reader.try_read_u32()?;
                let _unk1 = reader.try_read_u32()?;
                let _unk2 = reader.try_read_u32()?;
                total_length
            },
            entry_count: {
                let entry_count = reader.try_read_u32()?;
                let _unk3 = reader.try_read_u32()?;
                let _entry_size_sum = reader.try_read_u32()?;
                entry_count
            },
        };

        let offsets: Vec<usize> = (0..header.entry_count + 1)
            .map(|_| reader.try_read_u32().map(|x| x as usize))
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = (0..header.entry_count as usize)
            .map(|index| {
                let length = offsets[index + 1].saturating_sub(offsets[index]);
                reader.try_read_bytes(length)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let frame_data = if let Some(first) = entries.first() {
            let mut delta_reader = BinaryReader::from_vec(first);
            delta_reader.set_endian(Endian::Big);
            ScoreFrameData::from_reader(&mut delta_reader)?
        } else {
            ScoreFrameData {
                frame_count: 0,
                sprite_record_size: 0,
                num_channels: 0,
                uncompressed_data: Vec::new(),
            }
        };

        // entries 3.. alternate primary/secondary/tertiary per interval
        let frame_interval_entries = if entries.len() > 3 {
            entries.split_off(3)
        } else {
            Vec::new()
        };
        let mut frame_interval_primaries = vec![];
        let mut frame_interval_secondaries = vec![];
        for (i, entry) in frame_interval_entries.iter().enumerate() {
            if entry.is_empty() {
                continue;
            }
            let mut interval_reader = BinaryReader::from_vec(entry);
            interval_reader.set_endian(Endian::Big);
            if i % 3 == 0 {
                frame_interval_primaries.push(FrameIntervalPrimary::from_reader(
                    &mut interval_reader,
                )?);
            } else if i % 3 == 1 {
                frame_interval_secondaries.push(FrameIntervalSecondary::from_reader(
                    &mut interval_reader,
                )?);
            }
        }

        Ok(ScoreChunk {
            header,
            frame_interval_primaries,
            frame_interval_secondaries,
            frame_data,
        })
    }
}

impl FrameIntervalPrimary {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<Self, FileError> {
        let start_frame = reader.try_read_u32()?;
        let end_frame = reader.try_read_u32()?;
        let _unk0 = reader.try_read_u32()?;
        let _unk1 = reader.try_read_u32()?;
        let sprite_number = reader.try_read_u32()?;
        Ok(FrameIntervalPrimary {
            start_frame,
            end_frame,
            sprite_number,
        })
    }
}

impl FrameIntervalSecondary {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<Self, FileError> {
        Ok(FrameIntervalSecondary {
            cast_lib: reader.try_read_u16()?,
            cast_member: reader.try_read_u16()?,
        })
    }
}

impl ScoreFrameData {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<ScoreFrameData, FileError> {
        let (frame_count, sprite_record_size, num_channels) = Self::read_header(reader)?;

        let mut channel_data =
            vec![0u8; frame_count as usize * num_channels as usize * sprite_record_size as usize];

        // frames are stored as deltas against the running channel state
        while !reader.eof() {
            let length = reader.try_read_u16()?;
            if length == 0 {
                break;
            }
            let frame_length = length - 2;
            if frame_length > 0 {
                let chunk_data = reader.try_read_bytes(frame_length as usize)?;
                let mut frame_chunk_reader = BinaryReader::from_vec(&chunk_data);
                frame_chunk_reader.set_endian(Endian::Big);

                while !frame_chunk_reader.eof() {
                    let channel_size = frame_chunk_reader.try_read_u16()? as usize;
                    let channel_offset = frame_chunk_reader.try_read_u16()? as usize;
                    let channel_delta = frame_chunk_reader.try_read_bytes(channel_size)?;
                    if channel_offset + channel_size <= channel_data.len() {
                        channel_data[channel_offset..channel_offset + channel_size]
                            .copy_from_slice(&channel_delta);
                    }
                }
            }
        }

        Ok(ScoreFrameData {
            frame_count,
            sprite_record_size,
            num_channels,
            uncompressed_data: channel_data,
        })
    }

    fn read_header(reader: &mut BinaryReader) -> Result<(u32, u16, u16), FileError> {
        let _actual_length = reader.try_read_u32()?;
        let _unk1 = reader.try_read_u32()?;
        let frame_count = reader.try_read_u32()?;
        let frames_version = reader.try_read_u16()?;
        let sprite_record_size = reader.try_read_u16()?;
        let num_channels = reader.try_read_u16()?;
        let _num_channels_displayed = reader.try_read_u16()?;
        let _ = frames_version;
        Ok((frame_count, sprite_record_size, num_channels))
    }
}

/// Sprite spans grouped per interval, as `(span, member)` pairs.
pub fn interval_pairs(
    score: &ScoreChunk,
) -> Vec<(&FrameIntervalPrimary, Option<&FrameIntervalSecondary>)> {
    score
        .frame_interval_primaries
        .iter()
        .zip_longest(score.frame_interval_secondaries.iter())
        .filter_map(|pair| match pair {
            itertools::EitherOrBoth::Both(p, s) => Some((p, Some(s))),
            itertools::EitherOrBoth::Left(p) => Some((p, None)),
            itertools::EitherOrBoth::Right(_) => None,
        })
        .collect()
}
