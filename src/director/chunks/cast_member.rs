use binary_reader::{BinaryReader, Endian};

use crate::{
    director::{
        chunks::cast_member_info::CastMemberInfoChunk,
        enums::{BitmapInfo, FilmLoopInfo, MemberType, ScriptType, ShapeInfo},
        file::FileError,
    },
    io::reader::DirectorExt,
};

use super::Chunk;

/// `CASt`: member type code + info list + type-specific data.
#[derive(Debug)]
pub struct CastMemberChunk {
    pub member_type: MemberType,
    pub specific_data: CastMemberSpecificData,
    pub specific_data_raw: Vec<u8>,
    pub member_info: Option<CastMemberInfoChunk>,
}

/// A `CASt` chunk together with the auxiliary chunks the key table assigns
/// to it (BITD, STXT, snd, ...).
#[derive(Debug)]
pub struct CastMemberDef {
    pub chunk: CastMemberChunk,
    pub children: Vec<Option<Chunk>>,
}

impl CastMemberChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<CastMemberChunk, FileError> {
        reader.set_endian(Endian::Big);

        let mut info: Option<CastMemberInfoChunk> = None;
        let info_len: usize;
        let specific_data: Vec<u8>;
        let member_type: MemberType;

        if dir_version >= 500 {
            member_type = MemberType::from(reader.try_read_u32()?);
            info_len = reader.try_read_u32()? as usize;
            let specific_data_len = reader.try_read_u32()? as usize;

            if info_len != 0 {
                let info_bytes = reader.try_read_bytes(info_len)?;
                let mut info_reader = BinaryReader::from_vec(&info_bytes);
                info_reader.set_endian(reader.endian);
                info = Some(CastMemberInfoChunk::from_reader(
                    &mut info_reader,
                    dir_version,
                )?);
            }
            specific_data = reader.try_read_bytes(specific_data_len)?;
        } else {
            let specific_data_len = reader.try_read_u16()? as usize;
            info_len = reader.try_read_u32()? as usize;

            // member type and an optional flags byte live inside the
            // specific data in the pre-D5 layout
            let mut specific_data_left = specific_data_len;
            member_type = MemberType::from(reader.try_read_u8()? as u32);
            specific_data_left -= 1;
            if specific_data_left != 0 {
                let _flags1 = reader.try_read_u8()?;
                specific_data_left -= 1;
            }
            specific_data = reader.try_read_bytes(specific_data_left)?;

            if info_len != 0 {
                let info_bytes = reader.try_read_bytes(info_len)?;
                let mut info_reader = BinaryReader::from_vec(&info_bytes);
                info_reader.set_endian(reader.endian);
                info = Some(CastMemberInfoChunk::from_reader(
                    &mut info_reader,
                    dir_version,
                )?);
            }
        }

        let specific_data_parsed = match member_type {
            MemberType::Script => {
                let mut specific_reader = BinaryReader::from_vec(&specific_data);
                specific_reader.set_endian(Endian::Big);
                CastMemberSpecificData::Script(ScriptType::from(
                    specific_reader.try_read_u16().unwrap_or(0),
                ))
            }
            MemberType::Bitmap => {
                CastMemberSpecificData::Bitmap(BitmapInfo::from(specific_data.as_slice()))
            }
            MemberType::Shape => {
                CastMemberSpecificData::Shape(ShapeInfo::from(specific_data.as_slice()))
            }
            // film loops, movies, digital video and xtra members share one
            // memory layout
            MemberType::FilmLoop | MemberType::Movie | MemberType::DigitalVideo => {
                CastMemberSpecificData::FilmLoop(FilmLoopInfo::from(specific_data.as_slice()))
            }
            _ => CastMemberSpecificData::None,
        };

        Ok(CastMemberChunk {
            member_type,
            specific_data: specific_data_parsed,
            specific_data_raw: specific_data,
            member_info: info,
        })
    }
}

pub enum CastMemberSpecificData {
    Script(ScriptType),
    Bitmap(BitmapInfo),
    Shape(ShapeInfo),
    FilmLoop(FilmLoopInfo),
    None,
}

impl CastMemberSpecificData {
    pub fn script_type(&self) -> Option<ScriptType> {
        if let CastMemberSpecificData::Script(script_type) = self {
            Some(*script_type)
        } else {
            None
        }
    }

    pub fn bitmap_info(&self) -> Option<&BitmapInfo> {
        if let CastMemberSpecificData::Bitmap(bitmap_info) = self {
            Some(bitmap_info)
        } else {
            None
        }
    }

    pub fn shape_info(&self) -> Option<&ShapeInfo> {
        if let CastMemberSpecificData::Shape(shape_info) = self {
            Some(shape_info)
        } else {
            None
        }
    }

    pub fn film_loop_info(&self) -> Option<&FilmLoopInfo> {
        if let CastMemberSpecificData::FilmLoop(film_loop_info) = self {
            Some(film_loop_info)
        } else {
            None
        }
    }
}
