use binary_reader::BinaryReader;
use fxhash::FxHashMap;

use crate::{
    director::{file::FileError, lingo::opcode::OpCode},
    io::reader::DirectorExt,
};

/// The fixed-size handler record of an `Lscr`. 42 bytes, or 46 in `LctX`
/// contexts which append a stack-height field.
pub struct HandlerRecord {
    pub name_id: u16,
    pub vector_pos: u16,
    compiled_len: usize,
    compiled_offset: usize,
    argument_count: u16,
    argument_offset: usize,
    locals_count: u16,
    locals_offset: usize,
    globals_count: u16,
    globals_offset: usize,
}

/// One decoded instruction: folded opcode, operand, and the byte offset of
/// the instruction within the handler's code segment (jump targets are
/// expressed in those byte offsets).
#[derive(Clone)]
pub struct Bytecode {
    pub opcode: OpCode,
    pub obj: i64,
    pub pos: usize,
}

/// A fully decoded handler: instruction list plus the bidirectional
/// byte-offset map required to resolve jumps.
#[derive(Clone)]
pub struct HandlerDef {
    pub name_id: u16,
    pub bytecode_array: Vec<Bytecode>,
    pub bytecode_index_map: FxHashMap<usize, usize>,
    pub argument_name_ids: Vec<u16>,
    pub local_name_ids: Vec<u16>,
    pub global_name_ids: Vec<u16>,
}

impl HandlerDef {
    /// Builds a handler from an already-decoded instruction list, indexing
    /// the byte offsets. The decoder and the test suite both go through
    /// here so the offset map can't drift from the instruction list.
    pub fn from_instructions(
        name_id: u16,
        bytecode_array: Vec<Bytecode>,
        argument_name_ids: Vec<u16>,
        local_name_ids: Vec<u16>,
        global_name_ids: Vec<u16>,
    ) -> HandlerDef {
        let mut bytecode_index_map = FxHashMap::default();
        for (index, bytecode) in bytecode_array.iter().enumerate() {
            bytecode_index_map.insert(bytecode.pos, index);
        }
        HandlerDef {
            name_id,
            bytecode_array,
            bytecode_index_map,
            argument_name_ids,
            local_name_ids,
            global_name_ids,
        }
    }
}

impl HandlerRecord {
    pub fn read_record(
        reader: &mut BinaryReader,
        _dir_version: u16,
        capital_x: bool,
    ) -> Result<HandlerRecord, FileError> {
        let name_id = reader.try_read_u16()?;
        let vector_pos = reader.try_read_u16()?;
        let compiled_len = reader.try_read_u32()? as usize;
        let compiled_offset = reader.try_read_u32()? as usize;
        let argument_count = reader.try_read_u16()?;
        let argument_offset = reader.try_read_u32()? as usize;
        let locals_count = reader.try_read_u16()?;
        let locals_offset = reader.try_read_u32()? as usize;
        let globals_count = reader.try_read_u16()?;
        let globals_offset = reader.try_read_u32()? as usize;
        let _unknown1 = reader.try_read_u32()?;
        let _unknown2 = reader.try_read_u16()?;
        let _line_count = reader.try_read_u16()?;
        let _line_offset = reader.try_read_u32()?;
        if capital_x {
            let _stack_height = reader.try_read_u32()?;
        }

        Ok(HandlerRecord {
            name_id,
            vector_pos,
            compiled_len,
            compiled_offset,
            argument_count,
            argument_offset,
            locals_count,
            locals_offset,
            globals_count,
            globals_offset,
        })
    }

    pub fn read_data(
        reader: &mut BinaryReader,
        record: &HandlerRecord,
    ) -> Result<HandlerDef, FileError> {
        let mut bytecode_array: Vec<Bytecode> = Vec::new();

        reader.jmp(record.compiled_offset);
        while reader.pos < record.compiled_offset + record.compiled_len {
            let pos = reader.pos - record.compiled_offset;
            let op = reader.try_read_u8()? as u16;
            let opcode = OpCode::from(if op >= 0x40 { 0x40 + op % 0x40 } else { op });
            // operand width comes from the raw byte's range, not the folded
            // opcode
            let obj: i64 = if op >= 0xc0 {
                reader.try_read_i32()? as i64
            } else if op >= 0x80 {
                match opcode {
                    // pushint operands are signed; pushint8 may carry a
                    // 16-bit value in older Lingo
                    OpCode::PushInt16 | OpCode::PushInt8 => reader.try_read_i16()? as i64,
                    _ => reader.try_read_u16()? as i64,
                }
            } else if op >= 0x40 {
                match opcode {
                    OpCode::PushInt8 => {
                        reader.try_read_u8().map(|b| b as i8)? as i64
                    }
                    _ => reader.try_read_u8()? as i64,
                }
            } else {
                0
            };

            bytecode_array.push(Bytecode { opcode, obj, pos });
        }

        let argument_name_ids = read_varnames_table(
            reader,
            record.argument_count as usize,
            record.argument_offset,
        )?;
        let local_name_ids =
            read_varnames_table(reader, record.locals_count as usize, record.locals_offset)?;
        let global_name_ids =
            read_varnames_table(reader, record.globals_count as usize, record.globals_offset)?;

        Ok(HandlerDef::from_instructions(
            record.name_id,
            bytecode_array,
            argument_name_ids,
            local_name_ids,
            global_name_ids,
        ))
    }
}

fn read_varnames_table(
    reader: &mut BinaryReader,
    count: usize,
    offset: usize,
) -> Result<Vec<u16>, FileError> {
    reader.jmp(offset);
    (0..count).map(|_| reader.try_read_u16()).collect()
}
