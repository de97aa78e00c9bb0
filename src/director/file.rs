use std::collections::HashMap;
use std::fmt::Display;

use binary_reader::BinaryReader;
use itertools::Itertools;
use log::{debug, warn};

use crate::director::chunks::imap::{InitialMapChunk, MemoryMapChunk};
use crate::director::chunks::key_table::KeyTableChunk;
use crate::director::chunks::labels::FrameLabelsChunk;
use crate::director::chunks::config::ConfigChunk;
use crate::director::guid::*;
use crate::director::rifx::RIFXReaderContext;
use crate::director::utils::*;
use crate::io::reader::DirectorExt;

use super::cast::CastDef;
use super::chunks::cast::CastAssocChunk;
use super::chunks::cast_list::{CastListChunk, CastListEntry};
use super::chunks::cast_member::CastMemberChunk;
use super::chunks::key_table::KeyTableEntry;
use super::chunks::lctx::ScriptContextChunk;
use super::chunks::make_chunk;
use super::chunks::score::ScoreChunk;
use super::chunks::script::ScriptChunk;
use super::chunks::script_names::ScriptNamesChunk;
use super::chunks::{Chunk, ChunkContainer, ChunkInfo};

/// Loader failures. All of these abort the enclosing load; the partially
/// built container is discarded.
#[derive(Debug)]
pub enum FileError {
    /// A read ran past the end of the available bytes.
    TruncatedInput,
    /// A zlib segment failed to inflate, or inflated to the wrong length.
    BadCompression { resource_id: u32 },
    /// The Afterburner resource map could not be decoded.
    MalformedAbmp(String),
    /// The container codec is not one this runtime understands.
    UnsupportedCodec(u32),
    MissingChunk(&'static str),
    Corrupt(String),
}

impl Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::TruncatedInput => write!(f, "truncated input"),
            FileError::BadCompression { resource_id } => {
                write!(f, "bad compression in resource {resource_id}")
            }
            FileError::MalformedAbmp(msg) => write!(f, "malformed ABMP: {msg}"),
            FileError::UnsupportedCodec(codec) => {
                write!(f, "unsupported codec '{}'", fourcc_to_string(*codec))
            }
            FileError::MissingChunk(tag) => write!(f, "no {tag} chunk"),
            FileError::Corrupt(msg) => write!(f, "corrupt movie: {msg}"),
        }
    }
}

impl std::error::Error for FileError {}

/// A fully decoded container: config, cast definitions, score data, plus
/// the chunk map for id-addressed auxiliary lookups.
#[derive(Debug)]
pub struct DirectorFile {
    pub file_name: String,
    pub version: u16,
    pub after_burned: bool,
    pub cast_entries: Vec<CastListEntry>,
    pub casts: Vec<CastDef>,
    pub config: ConfigChunk,
    pub score: Option<ScoreChunk>,
    pub frame_labels: Option<FrameLabelsChunk>,
    pub chunks: ChunkContainer,
    pub endian: binary_reader::Endian,
}

impl DirectorFile {
    fn read(
        file_name: String,
        reader: &mut BinaryReader,
        mut chunk_container: ChunkContainer,
    ) -> Result<DirectorFile, FileError> {
        reader.set_endian(binary_reader::Endian::Big);

        let meta_fourcc = reader.try_read_u32()?;
        if meta_fourcc == FOURCC("XFIR") {
            reader.set_endian(binary_reader::Endian::Little);
        } else if meta_fourcc != FOURCC("RIFX") {
            return Err(FileError::UnsupportedCodec(meta_fourcc));
        }

        let _meta_length = reader.try_read_u32()?;
        let codec = reader.try_read_u32()?;
        let mut rifx = RIFXReaderContext::new();

        if codec == FOURCC("MV93") || codec == FOURCC("MC95") {
            read_memory_map(reader, &mut chunk_container.chunk_info)?;
        } else if codec == FOURCC("FGDM") || codec == FOURCC("FGDC") {
            rifx.after_burned = true;
            rifx.ils_body_offset = read_after_burner_map(
                reader,
                &mut chunk_container.cached_chunk_views,
                &mut chunk_container.chunk_info,
            )?;
        } else {
            return Err(FileError::UnsupportedCodec(codec));
        }

        let key_table = read_key_table(reader, &mut chunk_container, &mut rifx)?;
        let config = read_config(reader, &mut chunk_container, &mut rifx)?;

        rifx.dir_version = human_version(config.director_version);

        let (cast_entries, mut casts) = read_casts(
            reader,
            &mut chunk_container,
            &mut rifx,
            &key_table,
            &config,
        )?;

        let score = get_first_chunk(reader, &mut chunk_container, &mut rifx, FOURCC("VWSC"))
            .and_then(|chunk| match chunk {
                Chunk::Score(score) => Some(score),
                _ => None,
            });
        let frame_labels = get_first_chunk(reader, &mut chunk_container, &mut rifx, FOURCC("VWLB"))
            .and_then(|chunk| match chunk {
                Chunk::FrameLabels(labels) => Some(labels),
                _ => None,
            });

        fix_up_chunks(&mut chunk_container, &mut casts);

        Ok(DirectorFile {
            file_name,
            version: rifx.dir_version,
            after_burned: rifx.after_burned,
            casts,
            cast_entries,
            config,
            score,
            frame_labels,
            chunks: chunk_container,
            endian: reader.endian,
        })
    }

    /// O(1) lookup of a materialised chunk's bytes by resource id.
    pub fn chunk_bytes(&self, id: u32) -> Option<&Vec<u8>> {
        self.chunks.cached_chunk_views.get(&id)
    }
}

pub fn read_director_file_bytes(
    bytes: &[u8],
    file_name: &str,
) -> Result<DirectorFile, FileError> {
    let owned = bytes.to_vec();
    let mut reader = BinaryReader::from_vec(&owned);
    let chunk_container = ChunkContainer::new();
    DirectorFile::read(file_name.to_owned(), &mut reader, chunk_container)
}

/// Index multiplier applied to local/param/literal operands.
pub fn get_variable_multiplier(capital_x: bool, dir_version: u16) -> u32 {
    if capital_x {
        return 1;
    }
    if dir_version >= 500 {
        return 8;
    }
    6
}

/// The second pass over the materialised chunk map: bind each script to the
/// name table of its context and drop empty resource slots. Skipping this
/// leaves handler names as bare numeric indices.
fn fix_up_chunks(chunk_container: &mut ChunkContainer, casts: &mut [CastDef]) {
    for cast in casts.iter_mut() {
        if let Some(lctx) = cast.lctx.as_mut() {
            let lnam_id = cast.lnam_section_id;
            for script in lctx.scripts.values_mut() {
                script.lnam_id = lnam_id;
            }
        }
    }
    chunk_container
        .chunk_info
        .retain(|_, info| info.fourcc != 0 && !(info.len == 0 && info.uncompressed_len == 0));
}

fn read_memory_map(
    reader: &mut BinaryReader,
    chunk_info: &mut HashMap<u32, ChunkInfo>,
) -> Result<(), FileError> {
    // imap immediately follows the container header
    let imap_fourcc = reader.try_read_u32()?;
    if imap_fourcc != FOURCC("imap") {
        return Err(FileError::MissingChunk("imap"));
    }
    let imap_len = reader.try_read_u32()? as usize;
    let imap_bytes = reader.try_read_bytes(imap_len)?;
    let mut imap_reader = BinaryReader::from_vec(&imap_bytes);
    imap_reader.set_endian(reader.endian);
    let imap = InitialMapChunk::from_reader(&mut imap_reader, 0)?;

    reader.jmp(imap.mmap_offset);
    let mmap_fourcc = reader.try_read_u32()?;
    if mmap_fourcc != FOURCC("mmap") {
        return Err(FileError::MissingChunk("mmap"));
    }
    let mmap_len = reader.try_read_u32()? as usize;
    let mmap_bytes = reader.try_read_bytes(mmap_len)?;
    let mut mmap_reader = BinaryReader::from_vec(&mmap_bytes);
    mmap_reader.set_endian(reader.endian);
    let mmap = MemoryMapChunk::from_reader(&mut mmap_reader)?;

    for (index, entry) in mmap.entries.iter().enumerate() {
        if entry.fourcc == FOURCC("free") || entry.fourcc == FOURCC("junk") {
            continue;
        }
        chunk_info.insert(
            index as u32,
            ChunkInfo {
                id: index as u32,
                fourcc: entry.fourcc,
                len: entry.len,
                uncompressed_len: entry.len,
                offset: entry.offset,
                compression_id: NULL_COMPRESSION_GUID,
            },
        );
    }
    Ok(())
}

fn read_after_burner_map(
    reader: &mut BinaryReader,
    cached_chunk_views: &mut HashMap<u32, Vec<u8>>,
    chunk_info: &mut HashMap<u32, ChunkInfo>,
) -> Result<usize, FileError> {
    // File version
    if reader.try_read_u32()? != FOURCC("Fver") {
        return Err(FileError::MissingChunk("Fver"));
    }

    let fver_length = reader.read_var_int()?;
    let start = reader.pos;
    let fver_version = reader.read_var_int()?;
    if fver_version >= 0x401 {
        let _imap_version = reader.read_var_int()?;
        let _director_version = reader.read_var_int()?;
    }
    if fver_version >= 0x501 {
        let version_string_len = reader.try_read_u8()?;
        let _fver_version_string = reader.read_string(version_string_len as usize)?;
    }
    let end = reader.pos;

    if end - start != fver_length as usize {
        debug!(
            "expected Fver of length {fver_length} but read {} bytes",
            end - start
        );
        reader.jmp(start + fver_length as usize);
    }

    // Compression types
    if reader.try_read_u32()? != FOURCC("Fcdr") {
        return Err(FileError::MissingChunk("Fcdr"));
    }

    let fcdr_length = reader.read_var_int()?;
    let fcdr_uncomp = reader.read_zlib_bytes(fcdr_length as usize)?;

    let mut fcdr_reader = BinaryReader::from_vec(&fcdr_uncomp);
    fcdr_reader.set_endian(reader.endian);

    let compression_type_count = fcdr_reader.try_read_u16()?;
    let compression_ids: Vec<MoaID> = (0..compression_type_count)
        .map(|_| MoaID::from_reader(&mut fcdr_reader))
        .collect::<Result<Vec<_>, _>>()?;
    let _compression_descs: Vec<String> = (0..compression_type_count)
        .map(|_| fcdr_reader.read_cstr().unwrap_or_default())
        .collect_vec();

    if fcdr_reader.pos != fcdr_reader.length {
        warn!(
            "Fcdr has uncompressed length {} but read {} bytes",
            fcdr_reader.length, fcdr_reader.pos
        );
    }

    // Resource map
    if reader.try_read_u32()? != FOURCC("ABMP") {
        return Err(FileError::MissingChunk("ABMP"));
    }

    let abmp_length = reader.read_var_int()?;
    let abmp_end = reader.pos + abmp_length as usize;
    let _abmp_compression_type = reader.read_var_int()?;
    let abmp_uncomp_length = reader.read_var_int()?;

    let abmp_uncomp = reader
        .read_zlib_bytes(abmp_end - reader.pos)
        .map_err(|_| FileError::MalformedAbmp("zlib inflate failed".to_owned()))?;
    if abmp_uncomp.len() != abmp_uncomp_length as usize {
        return Err(FileError::MalformedAbmp(format!(
            "expected uncompressed length {abmp_uncomp_length} but got {}",
            abmp_uncomp.len()
        )));
    }
    let mut abmp_reader = BinaryReader::from_vec(&abmp_uncomp);
    abmp_reader.set_endian(reader.endian);

    let map_abmp_err = |_| FileError::MalformedAbmp("truncated entry table".to_owned());
    let _abmp_unk1 = abmp_reader.read_var_int().map_err(map_abmp_err)?;
    let _abmp_unk2 = abmp_reader.read_var_int().map_err(map_abmp_err)?;
    let res_count = abmp_reader.read_var_int().map_err(map_abmp_err)?;

    for _ in 0..res_count {
        let res_id = abmp_reader.read_var_int().map_err(map_abmp_err)? as u32;
        let offset = abmp_reader.read_var_int().map_err(map_abmp_err)? as usize;
        let comp_size = abmp_reader.read_var_int().map_err(map_abmp_err)? as usize;
        let uncomp_size = abmp_reader.read_var_int().map_err(map_abmp_err)? as usize;
        let compression_type = abmp_reader.read_var_int().map_err(map_abmp_err)? as usize;
        let tag = abmp_reader.try_read_u32().map_err(map_abmp_err)?;

        if compression_type >= compression_ids.len() {
            return Err(FileError::MalformedAbmp(format!(
                "resource {res_id} names compression index {compression_type} of {}",
                compression_ids.len()
            )));
        }

        chunk_info.insert(
            res_id,
            ChunkInfo {
                id: res_id,
                fourcc: tag,
                len: comp_size,
                uncompressed_len: uncomp_size,
                offset,
                compression_id: compression_ids[compression_type],
            },
        );
    }

    // Initial load segment
    if !chunk_info.contains_key(&2) {
        return Err(FileError::MalformedAbmp("map has no entry for ILS".to_owned()));
    }
    if reader.try_read_u32()? != FOURCC("FGEI") {
        return Err(FileError::MissingChunk("FGEI"));
    }

    let (ils_len, ils_uncompressed_len) = {
        let ils_info = chunk_info.get(&2).unwrap();
        (ils_info.len, ils_info.uncompressed_len)
    };
    let _ils_unk1 = reader.read_var_int()?;
    let ils_body_offset = reader.pos;

    let ils_uncomp = reader
        .read_zlib_bytes(ils_len)
        .map_err(|_| FileError::BadCompression { resource_id: 2 })?;
    if ils_uncomp.len() != ils_uncompressed_len {
        warn!(
            "ILS: expected uncompressed length {ils_uncompressed_len} but got {}",
            ils_uncomp.len()
        );
    }

    let mut ils_reader = BinaryReader::from_vec(&ils_uncomp);
    ils_reader.set_endian(reader.endian);

    while !ils_reader.eof() {
        let res_id = ils_reader.read_var_int()? as u32;
        let info = chunk_info
            .get(&res_id)
            .ok_or_else(|| FileError::MalformedAbmp(format!("ILS names unknown resource {res_id}")))?;
        cached_chunk_views.insert(res_id, ils_reader.try_read_bytes(info.len)?);
    }
    Ok(ils_body_offset)
}

fn read_key_table(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
) -> Result<KeyTableChunk, FileError> {
    let info = get_first_chunk_info(&chunk_container.chunk_info, FOURCC("KEY*"))
        .ok_or(FileError::MissingChunk("KEY*"))?;
    let (fourcc, id) = (info.fourcc, info.id);
    match get_chunk(reader, chunk_container, rifx, fourcc, id)? {
        Chunk::KeyTable(key_table) => Ok(key_table),
        _ => Err(FileError::Corrupt("KEY* decoded to a non-keytable".to_owned())),
    }
}

fn read_config(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
) -> Result<ConfigChunk, FileError> {
    let info = get_first_chunk_info(&chunk_container.chunk_info, FOURCC("DRCF"))
        .or_else(|| get_first_chunk_info(&chunk_container.chunk_info, FOURCC("VWCF")))
        .ok_or(FileError::MissingChunk("DRCF/VWCF"))?;
    let (fourcc, id) = (info.fourcc, info.id);
    match get_chunk(reader, chunk_container, rifx, fourcc, id)? {
        Chunk::Config(config) => Ok(config),
        _ => Err(FileError::Corrupt("config decoded to a non-config".to_owned())),
    }
}

fn read_casts(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    key_table: &KeyTableChunk,
    config: &ConfigChunk,
) -> Result<(Vec<CastListEntry>, Vec<CastDef>), FileError> {
    let mut casts: Vec<CastDef> = Vec::new();

    if rifx.dir_version >= 500 {
        let cast_list = get_cast_list_chunk(reader, chunk_container, rifx);
        if let Some(cast_list) = cast_list {
            for cast_entry in &cast_list.entries {
                let cast =
                    get_cast_chunk_for_cast(reader, chunk_container, rifx, key_table, cast_entry.id);
                if let Some(cast) = cast {
                    casts.push(CastDef::from(
                        cast_entry.name.to_owned(),
                        cast_entry.id,
                        cast_entry.min_member,
                        cast.member_ids.to_vec(),
                        reader,
                        chunk_container,
                        rifx,
                        key_table,
                    )?);
                }
            }
            return Ok((cast_list.entries, casts));
        }
    }

    // no MCsL: a single implicit internal cast
    let cast = get_first_chunk(reader, chunk_container, rifx, FOURCC("CAS*"));
    if let Some(Chunk::CastAssoc(cast)) = cast {
        casts.push(CastDef::from(
            "Internal".to_string(),
            1024,
            config.min_member,
            cast.member_ids.to_vec(),
            reader,
            chunk_container,
            rifx,
            key_table,
        )?);
        return Ok((Vec::new(), casts));
    }

    debug!("movie has no cast");
    Ok((Vec::new(), casts))
}

fn find_key_table_entry_for_cast(key_table: &KeyTableChunk, cast_id: u32) -> Option<&KeyTableEntry> {
    key_table
        .entries
        .iter()
        .find(|entry| entry.cast_id == cast_id && entry.fourcc == FOURCC("CAS*"))
}

fn get_cast_chunk_for_cast(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    key_table: &KeyTableChunk,
    cast_id: u32,
) -> Option<CastAssocChunk> {
    let key_entry = find_key_table_entry_for_cast(key_table, cast_id)?;
    match get_chunk(reader, chunk_container, rifx, FOURCC("CAS*"), key_entry.section_id) {
        Ok(Chunk::CastAssoc(cast_chunk)) => Some(cast_chunk),
        _ => None,
    }
}

pub fn get_cast_member_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    section_id: u32,
) -> Result<CastMemberChunk, FileError> {
    match get_chunk(reader, chunk_container, rifx, FOURCC("CASt"), section_id)? {
        Chunk::CastMember(member_chunk) => Ok(member_chunk),
        _ => Err(FileError::Corrupt(format!(
            "section {section_id} is not a cast member chunk"
        ))),
    }
}

pub fn get_cast_list_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
) -> Option<CastListChunk> {
    match get_first_chunk(reader, chunk_container, rifx, FOURCC("MCsL")) {
        Some(Chunk::CastList(chunk_data)) => Some(chunk_data),
        _ => None,
    }
}

pub fn get_script_context_key_entry_for_cast<'a>(
    key_table: &'a KeyTableChunk,
    cast_id: u32,
) -> Option<&'a KeyTableEntry> {
    key_table.entries.iter().find(|entry| {
        entry.cast_id == cast_id
            && (entry.fourcc == FOURCC("Lctx") || entry.fourcc == FOURCC("LctX"))
    })
}

pub fn get_script_context_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    fourcc: u32,
    section_id: u32,
) -> Option<ScriptContextChunk> {
    match get_chunk(reader, chunk_container, rifx, fourcc, section_id) {
        Ok(Chunk::ScriptContext(context)) => Some(context),
        _ => None,
    }
}

pub fn get_script_names_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    section_id: u32,
) -> Option<ScriptNamesChunk> {
    match get_chunk(reader, chunk_container, rifx, FOURCC("Lnam"), section_id) {
        Ok(Chunk::ScriptNames(names)) => Some(names),
        _ => None,
    }
}

pub fn get_script_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    section_id: u32,
) -> Option<ScriptChunk> {
    match get_chunk(reader, chunk_container, rifx, FOURCC("Lscr"), section_id) {
        Ok(Chunk::Script(script)) => Some(script),
        _ => None,
    }
}

fn get_first_chunk_info(chunk_info: &HashMap<u32, ChunkInfo>, fourcc: u32) -> Option<&ChunkInfo> {
    chunk_info.values().find(|x| x.fourcc == fourcc)
}

fn get_first_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    fourcc: u32,
) -> Option<Chunk> {
    let info = get_first_chunk_info(&chunk_container.chunk_info, fourcc)?;
    let (fourcc, id) = (info.fourcc, info.id);
    get_chunk(reader, chunk_container, rifx, fourcc, id).ok()
}

/// Reads an uncompressed chunk in place, validating its header against the
/// memory-map entry.
fn read_chunk_data(
    reader: &mut BinaryReader,
    fourcc: u32,
    len: usize,
) -> Result<Vec<u8>, FileError> {
    let offset = reader.pos;

    let valid_fourcc = reader.try_read_u32()?;
    let valid_len = reader.try_read_u32()? as usize;

    // use the header length if the map hasn't recorded one
    let use_len = if len == u32::MAX as usize { valid_len } else { len };

    if fourcc != valid_fourcc || use_len != valid_len {
        return Err(FileError::Corrupt(format!(
            "at offset {offset} expected {} chunk with length {use_len}, but got {} with length {valid_len}",
            fourcc_to_string(fourcc),
            fourcc_to_string(valid_fourcc),
        )));
    }

    reader.try_read_bytes(use_len)
}

fn get_chunk_data(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &RIFXReaderContext,
    fourcc: u32,
    id: u32,
) -> Result<Vec<u8>, FileError> {
    let info = chunk_container
        .chunk_info
        .get(&id)
        .ok_or_else(|| FileError::Corrupt(format!(
            "could not find chunk {} #{id}",
            fourcc_to_string(fourcc)
        )))?;

    if fourcc != info.fourcc {
        return Err(FileError::Corrupt(format!(
            "expected chunk #{id} to be '{}', but is actually '{}'",
            fourcc_to_string(fourcc),
            fourcc_to_string(info.fourcc)
        )));
    }

    if chunk_container.cached_chunk_views.contains_key(&id) {
        return Ok(chunk_container.cached_chunk_views.get(&id).unwrap().clone());
    }

    let view = if rifx.after_burned {
        reader.jmp(info.offset + rifx.ils_body_offset);
        if info.len == 0 && info.uncompressed_len == 0 {
            Vec::new()
        } else if info.compression_id == ZLIB_COMPRESSION_GUID
            || info.compression_id == ZLIB_COMPRESSION_GUID2
        {
            let uncomp = reader
                .read_zlib_bytes(info.len)
                .map_err(|_| FileError::BadCompression { resource_id: id })?;
            if uncomp.len() != info.uncompressed_len {
                return Err(FileError::BadCompression { resource_id: id });
            }
            uncomp
        } else {
            if info.compression_id != NULL_COMPRESSION_GUID
                && info.compression_id != SND_COMPRESSION_GUID
                && info.compression_id != FONTMAP_COMPRESSION_GUID
            {
                warn!("unhandled compression type {}", info.compression_id);
            }
            reader.try_read_bytes(info.len)?
        }
    } else {
        reader.jmp(info.offset);
        read_chunk_data(reader, fourcc, info.len)?
    };

    chunk_container.cached_chunk_views.insert(id, view.clone());
    Ok(view)
}

pub fn get_chunk(
    reader: &mut BinaryReader,
    chunk_container: &mut ChunkContainer,
    rifx: &mut RIFXReaderContext,
    fourcc: u32,
    id: u32,
) -> Result<Chunk, FileError> {
    let chunk_view = get_chunk_data(reader, chunk_container, rifx, fourcc, id)?;
    make_chunk(reader.endian, rifx, fourcc, &chunk_view)
}

pub fn get_children_of_chunk<'a>(
    chunk_id: u32,
    key_table: &'a KeyTableChunk,
) -> Vec<&'a KeyTableEntry> {
    key_table
        .entries
        .iter()
        .filter(|x| x.cast_id == chunk_id)
        .collect_vec()
}
