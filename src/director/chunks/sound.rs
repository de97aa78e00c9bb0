use binary_reader::{BinaryReader, Endian};

use crate::{director::file::FileError, io::reader::DirectorExt};

/// `snd `: a Macintosh sound resource. Only the fields the runtime exposes
/// through Lingo are decoded; the sample bytes stay raw for the audio host.
#[derive(Debug)]
pub struct SoundChunk {
    pub format: u16,
    pub sample_rate: u32,
    pub sample_count: u32,
    pub bits_per_sample: u16,
    pub channel_count: u16,
    pub data: Vec<u8>,
}

impl SoundChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<SoundChunk, FileError> {
        reader.set_endian(Endian::Big);

        let format = reader.try_read_u16()?;
        if format == 1 {
            let modifier_count = reader.try_read_u16()?;
            for _ in 0..modifier_count {
                let _modifier_part = reader.try_read_u16()?;
                let _init_bits = reader.try_read_u32()?;
            }
        } else {
            let _ref_count = reader.try_read_u16()?;
        }
        let command_count = reader.try_read_u16()?;
        let mut data_offset = 0usize;
        for _ in 0..command_count {
            let cmd = reader.try_read_u16()?;
            let _param1 = reader.try_read_u16()?;
            let param2 = reader.try_read_u32()?;
            // bufferCmd/soundCmd point at the sound header
            if cmd == 0x8051 || cmd == 0x8050 {
                data_offset = param2 as usize;
            }
        }

        if data_offset == 0 || data_offset >= reader.length {
            let remaining = reader.bytes_left();
            return Ok(SoundChunk {
                format,
                sample_rate: 22050,
                sample_count: 0,
                bits_per_sample: 8,
                channel_count: 1,
                data: reader.try_read_bytes(remaining)?,
            });
        }

        reader.jmp(data_offset);
        let _data_pointer = reader.try_read_u32()?;
        let length_or_channels = reader.try_read_u32()?;
        let sample_rate_fixed = reader.try_read_u32()?;
        let _loop_start = reader.try_read_u32()?;
        let _loop_end = reader.try_read_u32()?;
        let encoding = reader.try_read_u8()?;
        let _base_frequency = reader.try_read_u8()?;

        // standard header: 8-bit mono; extended (0xff/0xfe) carries real
        // channel and depth fields
        let (sample_count, channel_count, bits_per_sample) = if encoding == 0xff || encoding == 0xfe
        {
            let frame_count = reader.try_read_u32()?;
            let _aiff_rate = reader.try_read_bytes(10)?;
            let _marker_chunk = reader.try_read_u32()?;
            let _instrument_chunks = reader.try_read_u32()?;
            let _aes_recording = reader.try_read_u32()?;
            let sample_size = reader.try_read_u16()?;
            let _future_use = reader.try_read_bytes(14)?;
            (frame_count, length_or_channels as u16, sample_size)
        } else {
            (length_or_channels, 1, 8)
        };

        let remaining = reader.bytes_left();
        let data = reader.try_read_bytes(remaining)?;

        Ok(SoundChunk {
            format,
            sample_rate: sample_rate_fixed >> 16,
            sample_count,
            bits_per_sample,
            channel_count,
            data,
        })
    }
}
