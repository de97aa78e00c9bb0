use binary_reader::BinaryReader;
use num_derive::FromPrimitive;

use crate::{
    director::{file::FileError, lingo::datum::Datum},
    io::reader::DirectorExt,
};

pub struct LiteralStoreRecord {
    pub literal_type: LiteralType,
    pub offset: usize,
}

#[derive(Copy, Clone, FromPrimitive)]
pub enum LiteralType {
    Invalid = 0,
    String = 1,
    Int = 4,
    Float = 9,
    Unknown1 = 11,
}

/// Literal-table entries of an `Lscr`: a record array followed by a data
/// segment. Ints are stored inline in the record's offset field.
pub struct LiteralStore {}

impl LiteralStore {
    pub fn read_record(
        reader: &mut BinaryReader,
        dir_version: u16,
    ) -> Result<LiteralStoreRecord, FileError> {
        let literal_type_id = if dir_version >= 500 {
            reader.try_read_u32()?
        } else {
            reader.try_read_u16()? as u32
        };
        let literal_type: LiteralType = num::FromPrimitive::from_u32(literal_type_id)
            .ok_or_else(|| FileError::Corrupt(format!("invalid literal type {literal_type_id}")))?;
        let offset = reader.try_read_u32()? as usize;
        Ok(LiteralStoreRecord {
            literal_type,
            offset,
        })
    }

    pub fn read_data(
        reader: &mut BinaryReader,
        record: &LiteralStoreRecord,
        start_offset: usize,
    ) -> Result<Datum, FileError> {
        match record.literal_type {
            LiteralType::Int => Ok(Datum::Int(record.offset as i32)),
            _ => {
                reader.jmp(start_offset + record.offset);
                let length = reader.try_read_u32()? as usize;
                match record.literal_type {
                    LiteralType::String => {
                        // the stored length includes a trailing NUL
                        Ok(Datum::String(reader.read_string(length.saturating_sub(1))?))
                    }
                    LiteralType::Float => {
                        let value = if length == 8 {
                            let bytes = reader.try_read_bytes(8)?;
                            f64::from_be_bytes([
                                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
                                bytes[6], bytes[7],
                            ])
                        } else if length == 10 {
                            reader.read_apple_float_80()?
                        } else {
                            0.0
                        };
                        Ok(Datum::Float(value))
                    }
                    _ => Ok(Datum::Void),
                }
            }
        }
    }
}
