use binary_reader::BinaryReader;

use crate::director::{chunks::literal::LiteralStore, file::FileError, lingo::datum::Datum};

use super::handler::{HandlerDef, HandlerRecord};

/// `Lscr`: one compiled Lingo script. Scripts are always big-endian
/// regardless of the container endian.
#[derive(Clone, Debug)]
pub struct ScriptChunk {
    pub script_number: u16,
    pub cast_id: u32,
    pub literals: Vec<Datum>,
    pub handlers: Vec<HandlerDef>,
    pub property_name_ids: Vec<u16>,
    pub global_name_ids: Vec<u16>,
    /// Resolved during the post-load fix-up pass: the `Lnam` this script's
    /// name ids index into.
    pub lnam_id: Option<u32>,
}

impl ScriptChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        dir_version: u16,
        capital_x: bool,
    ) -> Result<ScriptChunk, FileError> {
        use crate::io::reader::DirectorExt;

        reader.set_endian(binary_reader::Endian::Big);

        reader.jmp(16);
        let /* 16 */ _header_length = reader.try_read_u16()?;
        let /* 18 */ script_number = reader.try_read_u16()?;
        let /* 20 */ _unk20 = reader.try_read_u16()?;
        let /* 22 */ _parent_number = reader.try_read_u16()?;

        reader.jmp(38);
        let /* 38 */ _script_flags = reader.try_read_u32()?;
        let /* 42 */ _unk42 = reader.try_read_u16()?;
        let /* 44 */ cast_id = reader.try_read_u32()?;
        let /* 48 */ _factory_name_id = reader.try_read_u16()?;
        let /* 50 */ _handler_vectors_count = reader.try_read_u16()?;
        let /* 52 */ _handler_vectors_offset = reader.try_read_u32()?;
        let /* 56 */ _handler_vectors_size = reader.try_read_u32()?;
        let /* 60 */ properties_count = reader.try_read_u16()? as usize;
        let /* 62 */ properties_offset = reader.try_read_u32()? as usize;
        let /* 66 */ globals_count = reader.try_read_u16()? as usize;
        let /* 68 */ globals_offset = reader.try_read_u32()? as usize;
        let /* 72 */ handlers_count = reader.try_read_u16()?;
        let /* 74 */ handlers_offset = reader.try_read_u32()? as usize;
        let /* 78 */ literals_count = reader.try_read_u16()?;
        let /* 80 */ literals_offset = reader.try_read_u32()? as usize;
        let /* 84 */ _literals_data_count = reader.try_read_u32()?;
        let /* 88 */ literals_data_offset = reader.try_read_u32()? as usize;

        let property_name_ids = read_varnames_table(reader, properties_count, properties_offset)?;
        let global_name_ids = read_varnames_table(reader, globals_count, globals_offset)?;

        reader.jmp(handlers_offset);
        let handler_records = (0..handlers_count)
            .map(|_| HandlerRecord::read_record(reader, dir_version, capital_x))
            .collect::<Result<Vec<_>, _>>()?;

        let handlers = handler_records
            .iter()
            .map(|record| HandlerRecord::read_data(reader, record))
            .collect::<Result<Vec<_>, _>>()?;

        reader.jmp(literals_offset);
        let literal_records = (0..literals_count)
            .map(|_| LiteralStore::read_record(reader, dir_version))
            .collect::<Result<Vec<_>, _>>()?;

        let literals = literal_records
            .iter()
            .map(|record| LiteralStore::read_data(reader, record, literals_data_offset))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScriptChunk {
            script_number,
            cast_id,
            literals,
            handlers,
            property_name_ids,
            global_name_ids,
            lnam_id: None,
        })
    }
}

fn read_varnames_table(
    reader: &mut BinaryReader,
    count: usize,
    offset: usize,
) -> Result<Vec<u16>, FileError> {
    use crate::io::reader::DirectorExt;
    reader.jmp(offset);
    (0..count).map(|_| reader.try_read_u16()).collect()
}
