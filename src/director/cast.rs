use std::collections::HashMap;

use binary_reader::BinaryReader;
use itertools::Itertools;
use log::debug;

use crate::director::{file::get_children_of_chunk, utils::fourcc_to_string};

use super::{
    chunks::{
        cast_member::CastMemberDef, key_table::KeyTableChunk, script::ScriptChunk, ChunkContainer,
    },
    file::{
        get_cast_member_chunk, get_chunk, get_script_chunk, get_script_context_chunk,
        get_script_context_key_entry_for_cast, get_script_names_chunk, FileError,
    },
    lingo::script::ScriptContext,
    rifx::RIFXReaderContext,
    utils::FOURCC,
};

/// One cast library as decoded from the container: members keyed by slot,
/// plus the script context shared by the library's scripts.
#[derive(Debug)]
pub struct CastDef {
    pub id: u32,
    pub name: String,
    pub members: HashMap<u32, CastMemberDef>,
    pub lctx: Option<ScriptContext>,
    pub lnam_section_id: Option<u32>,
    pub capital_x: bool,
    pub dir_version: u16,
}

impl CastDef {
    #[allow(clippy::too_many_arguments)]
    pub fn from(
        name: String,
        id: u32,
        min_member: u16,
        member_ids: Vec<u32>,
        reader: &mut BinaryReader,
        chunk_container: &mut ChunkContainer,
        rifx: &mut RIFXReaderContext,
        key_table: &KeyTableChunk,
    ) -> Result<CastDef, FileError> {
        let lctx_entry = get_script_context_key_entry_for_cast(key_table, id);
        let capital_x = lctx_entry.is_some_and(|entry| entry.fourcc == FOURCC("LctX"));
        let lctx_location = lctx_entry.map(|entry| (entry.fourcc, entry.section_id));

        let lctx = lctx_location.and_then(|(fourcc, section_id)| {
            get_script_context_chunk(reader, chunk_container, rifx, fourcc, section_id)
        });
        let lnam_section_id = lctx.as_ref().map(|lctx| lctx.lnam_section_id);
        let script_names = lctx.as_ref().and_then(|lctx| {
            get_script_names_chunk(reader, chunk_container, rifx, lctx.lnam_section_id)
        });

        let mut members: HashMap<u32, CastMemberDef> = HashMap::new();
        for (i, &section_id) in member_ids.iter().enumerate() {
            if section_id == 0 {
                continue;
            }
            let member_id = i as u32 + min_member as u32;
            let member = get_cast_member_chunk(reader, chunk_container, rifx, section_id)?;
            let children_entries = get_children_of_chunk(section_id, key_table);
            let children = children_entries
                .iter()
                .map(|x| {
                    let child = get_chunk(reader, chunk_container, rifx, x.fourcc, x.section_id);
                    if let Err(err) = &child {
                        debug!(
                            "failed to read child chunk {} (section {}): {}",
                            fourcc_to_string(x.fourcc),
                            x.section_id,
                            err
                        );
                    }
                    child.ok()
                })
                .collect_vec();

            members.insert(
                member_id,
                CastMemberDef {
                    chunk: member,
                    children,
                },
            );
        }

        let mut scripts: HashMap<u32, ScriptChunk> = HashMap::new();
        if let Some(lctx) = &lctx {
            for (i, section) in lctx.section_map.iter().enumerate() {
                if section.section_id > -1 {
                    if let Some(script) =
                        get_script_chunk(reader, chunk_container, rifx, section.section_id as u32)
                    {
                        scripts.insert(i as u32 + 1, script);
                    }
                }
            }
        }

        Ok(CastDef {
            id,
            name,
            members,
            lctx: lctx.map(|_| ScriptContext {
                scripts,
                names: script_names.map_or(Vec::new(), |x| x.names),
                capital_x,
            }),
            lnam_section_id,
            capital_x,
            dir_version: rifx.dir_version,
        })
    }
}
