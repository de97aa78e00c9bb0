#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use shockvm::director::chunks::handler::{Bytecode, HandlerDef};
use shockvm::director::chunks::script::ScriptChunk;
use shockvm::director::enums::ScriptType;
use shockvm::director::lingo::datum::Datum;
use shockvm::director::lingo::opcode::OpCode;
use shockvm::director::lingo::script::ScriptContext;
use shockvm::director::utils::FOURCC;
use shockvm::vm::cast_lib::{cast_member_ref, CastLib, CastLoadState, CastMemberRef, PreloadMode};
use shockvm::vm::script::Script;
use shockvm::vm::LingoVm;

/// One synthetic instruction; `pos` equals the instruction index so jump
/// deltas are expressed in instruction counts.
pub fn bc(opcode: OpCode, obj: i64, pos: usize) -> Bytecode {
    Bytecode { opcode, obj, pos }
}

pub struct ScriptSpec {
    pub slot: u32,
    pub name: &'static str,
    pub script_type: ScriptType,
    /// (handler name index into `names`, instructions)
    pub handlers: Vec<(u16, Vec<Bytecode>)>,
    pub literals: Vec<Datum>,
    pub property_name_ids: Vec<u16>,
}

/// Builds a VM holding one cast library with the given scripts. The
/// context is capital-X so the variable multiplier is 1 and synthetic
/// operand indices can be used directly.
pub fn vm_with_scripts(names: Vec<&str>, scripts: Vec<ScriptSpec>) -> LingoVm {
    let mut vm = LingoVm::new();

    let lctx = ScriptContext {
        names: names.iter().map(|name| name.to_string()).collect(),
        scripts: HashMap::new(),
        capital_x: true,
    };

    let mut cast = CastLib {
        name: "Internal".to_string(),
        file_name: String::new(),
        number: 1,
        state: CastLoadState::Loaded,
        lctx: Some(lctx.clone()),
        members: HashMap::new(),
        scripts: HashMap::new(),
        preload_mode: PreloadMode::WhenNeeded,
        min_member: 1,
        max_member: 1000,
        capital_x: true,
        dir_version: 850,
    };

    for spec in scripts {
        let member_ref = cast_member_ref(1, spec.slot as i32);
        let mut handler_map = HashMap::new();
        let mut handler_names = Vec::new();
        let mut handler_defs = Vec::new();
        for (name_id, instructions) in spec.handlers {
            let handler =
                HandlerDef::from_instructions(name_id, instructions, vec![], vec![], vec![]);
            let handler_name = lctx.names[name_id as usize].clone();
            handler_map.insert(handler_name.to_lowercase(), Rc::new(handler.clone()));
            handler_names.push(handler_name);
            handler_defs.push(handler);
        }
        let chunk = ScriptChunk {
            script_number: spec.slot as u16,
            cast_id: 0,
            literals: spec.literals,
            handlers: handler_defs,
            property_name_ids: spec.property_name_ids,
            global_name_ids: vec![],
            lnam_id: None,
        };
        let script = Script {
            member_ref,
            name: spec.name.to_string(),
            chunk,
            script_type: spec.script_type,
            handlers: handler_map,
            handler_names,
        };
        cast.scripts.insert(spec.slot, Rc::new(script));
    }

    vm.movie.cast_manager.casts.push(cast);
    vm.movie.dir_version = 850;
    vm
}

pub fn script_ref(slot: u32) -> CastMemberRef {
    cast_member_ref(1, slot as i32)
}

// ---------------------------------------------------------------------------
// Afterburner container synthesis
// ---------------------------------------------------------------------------

/// Director's VLI: 7 payload bits per byte, most significant group first,
/// continuation bit 0x80 on all but the last byte.
pub fn write_var_int(out: &mut Vec<u8>, value: u32) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest != 0 {
        groups.push((rest & 0x7f) as u8);
        rest >>= 7;
    }
    for (i, group) in groups.iter().enumerate().rev() {
        if i == 0 {
            out.push(*group);
        } else {
            out.push(*group | 0x80);
        }
    }
}

fn zlib_compress(bytes: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn push_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

const ZLIB_GUID: [u8; 16] = {
    let mut bytes = [0u8; 16];
    let d1 = 0xAC99E904u32.to_be_bytes();
    let d2 = 0x0070u16.to_be_bytes();
    let d3 = 0x0B36u16.to_be_bytes();
    let d4 = 0x00080000u32.to_be_bytes();
    let d5 = 0x347A3707u32.to_be_bytes();
    let mut i = 0;
    while i < 4 {
        bytes[i] = d1[i];
        bytes[8 + i] = d4[i];
        bytes[12 + i] = d5[i];
        i += 1;
    }
    bytes[4] = d2[0];
    bytes[5] = d2[1];
    bytes[6] = d3[0];
    bytes[7] = d3[1];
    bytes
};

const NULL_GUID: [u8; 16] = {
    let mut bytes = [0u8; 16];
    let d1 = 0xAC99982Eu32.to_be_bytes();
    let d2 = 0x005Du16.to_be_bytes();
    let d3 = 0x0D50u16.to_be_bytes();
    let d4 = 0x00080000u32.to_be_bytes();
    let d5 = 0x347A3707u32.to_be_bytes();
    let mut i = 0;
    while i < 4 {
        bytes[i] = d1[i];
        bytes[8 + i] = d4[i];
        bytes[12 + i] = d5[i];
        i += 1;
    }
    bytes[4] = d2[0];
    bytes[5] = d2[1];
    bytes[6] = d3[0];
    bytes[7] = d3[1];
    bytes
};

/// Builds a minimal Afterburner (`FGDM`) container holding the given
/// chunks inside the initial load segment. Resource id 2 is reserved for
/// the ILS itself.
pub fn build_afterburner(chunks: &[(u32, &str, Vec<u8>)]) -> Vec<u8> {
    // initial load segment: vli(res_id) ++ raw bytes per chunk
    let mut ils_payload = Vec::new();
    for (res_id, _fourcc, bytes) in chunks {
        write_var_int(&mut ils_payload, *res_id);
        ils_payload.extend_from_slice(bytes);
    }
    let ils_compressed = zlib_compress(&ils_payload);

    // Fcdr: compression table — index 0 zlib, index 1 null
    let mut fcdr_body = Vec::new();
    push_u16_be(&mut fcdr_body, 2);
    fcdr_body.extend_from_slice(&ZLIB_GUID);
    fcdr_body.extend_from_slice(&NULL_GUID);
    fcdr_body.extend_from_slice(b"zlib\0");
    fcdr_body.extend_from_slice(b"null\0");
    let fcdr_compressed = zlib_compress(&fcdr_body);

    // ABMP resource map
    let mut abmp_body = Vec::new();
    write_var_int(&mut abmp_body, 0); // unk1
    write_var_int(&mut abmp_body, 0); // unk2
    write_var_int(&mut abmp_body, chunks.len() as u32 + 1); // resCount

    // the ILS's own entry
    write_var_int(&mut abmp_body, 2);
    write_var_int(&mut abmp_body, 0);
    write_var_int(&mut abmp_body, ils_compressed.len() as u32);
    write_var_int(&mut abmp_body, ils_payload.len() as u32);
    write_var_int(&mut abmp_body, 0); // zlib
    push_u32_be(&mut abmp_body, FOURCC("FGEI"));

    for (res_id, fourcc, bytes) in chunks {
        write_var_int(&mut abmp_body, *res_id);
        write_var_int(&mut abmp_body, 0); // offset (cached via ILS)
        write_var_int(&mut abmp_body, bytes.len() as u32);
        write_var_int(&mut abmp_body, bytes.len() as u32);
        write_var_int(&mut abmp_body, 1); // null compression
        push_u32_be(&mut abmp_body, FOURCC(fourcc));
    }
    let abmp_compressed = zlib_compress(&abmp_body);

    let mut out = Vec::new();
    push_u32_be(&mut out, FOURCC("RIFX"));
    push_u32_be(&mut out, 0); // meta length, unused by the reader
    push_u32_be(&mut out, FOURCC("FGDM"));

    // Fver
    push_u32_be(&mut out, FOURCC("Fver"));
    let mut fver_body = Vec::new();
    write_var_int(&mut fver_body, 0); // version
    write_var_int(&mut out, fver_body.len() as u32);
    out.extend_from_slice(&fver_body);

    // Fcdr
    push_u32_be(&mut out, FOURCC("Fcdr"));
    write_var_int(&mut out, fcdr_compressed.len() as u32);
    out.extend_from_slice(&fcdr_compressed);

    // ABMP
    push_u32_be(&mut out, FOURCC("ABMP"));
    let mut abmp_header = Vec::new();
    write_var_int(&mut abmp_header, 0); // compression type
    write_var_int(&mut abmp_header, abmp_body.len() as u32); // uncompressed length
    write_var_int(
        &mut out,
        (abmp_header.len() + abmp_compressed.len()) as u32,
    );
    out.extend_from_slice(&abmp_header);
    out.extend_from_slice(&abmp_compressed);

    // FGEI / initial load segment
    push_u32_be(&mut out, FOURCC("FGEI"));
    write_var_int(&mut out, 0); // unk1
    out.extend_from_slice(&ils_compressed);

    out
}

/// Builds a minimal uncompressed (`MV93`) container: imap, mmap, then the
/// given chunks in order. Resource ids follow mmap entry order, with ids
/// 0..=2 taken by the RIFX/imap/mmap bookkeeping entries.
pub fn build_uncompressed(chunks: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let imap_offset = 12usize;
    let imap_body_len = 12usize;
    let mmap_offset = imap_offset + 8 + imap_body_len;
    let entry_count = 3 + chunks.len();
    let mmap_body_len = 24 + 20 * entry_count;

    let mut chunk_offsets = Vec::new();
    let mut data_offset = mmap_offset + 8 + mmap_body_len;
    for (_fourcc, bytes) in chunks {
        chunk_offsets.push(data_offset);
        data_offset += 8 + bytes.len();
    }
    let total_len = data_offset;

    let mut out = Vec::new();
    push_u32_be(&mut out, FOURCC("RIFX"));
    push_u32_be(&mut out, (total_len - 8) as u32);
    push_u32_be(&mut out, FOURCC("MV93"));

    // imap
    push_u32_be(&mut out, FOURCC("imap"));
    push_u32_be(&mut out, imap_body_len as u32);
    push_u32_be(&mut out, 1); // map count
    push_u32_be(&mut out, mmap_offset as u32);
    push_u32_be(&mut out, 0); // director version

    // mmap
    push_u32_be(&mut out, FOURCC("mmap"));
    push_u32_be(&mut out, mmap_body_len as u32);
    push_u16_be(&mut out, 24); // header size
    push_u16_be(&mut out, 20); // entry size
    push_u32_be(&mut out, entry_count as u32); // capacity
    push_u32_be(&mut out, entry_count as u32); // used
    push_u32_be(&mut out, u32::MAX); // junk head
    push_u32_be(&mut out, u32::MAX); // junk head 2
    push_u32_be(&mut out, u32::MAX); // free head

    let mut push_entry = |out: &mut Vec<u8>, fourcc: &str, len: usize, offset: usize| {
        push_u32_be(out, FOURCC(fourcc));
        push_u32_be(out, len as u32);
        push_u32_be(out, offset as u32);
        push_u16_be(out, 0); // flags
        push_u16_be(out, 0); // unused
        push_u32_be(out, u32::MAX); // next
    };
    push_entry(&mut out, "RIFX", total_len - 8, 0);
    push_entry(&mut out, "imap", imap_body_len, imap_offset);
    push_entry(&mut out, "mmap", mmap_body_len, mmap_offset);
    for (index, (fourcc, bytes)) in chunks.iter().enumerate() {
        push_entry(&mut out, fourcc, bytes.len(), chunk_offsets[index]);
    }

    for (fourcc, bytes) in chunks {
        push_u32_be(&mut out, FOURCC(fourcc));
        push_u32_be(&mut out, bytes.len() as u32);
        out.extend_from_slice(bytes);
    }

    out
}

/// A key table with the given `(section, owner, fourcc)` triples.
pub fn build_key_table(entries: &[(u32, u32, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16_be(&mut out, 12);
    push_u16_be(&mut out, 12);
    push_u32_be(&mut out, entries.len() as u32);
    push_u32_be(&mut out, entries.len() as u32);
    for (section_id, cast_id, fourcc) in entries {
        push_u32_be(&mut out, *section_id);
        push_u32_be(&mut out, *cast_id);
        push_u32_be(&mut out, FOURCC(fourcc));
    }
    out
}

/// A minimal config chunk claiming Director 5 (raw version 1201).
pub fn build_config() -> Vec<u8> {
    let mut out = vec![0u8; 100];
    out[0] = 0;
    out[1] = 100; // len
    out[12] = 0;
    out[13] = 1; // min_member
    out[14] = 0;
    out[15] = 100; // max_member
    out[36] = (1201u16 >> 8) as u8;
    out[37] = (1201u16 & 0xff) as u8;
    out
}

/// `CAS*`: dense array of CASt resource ids.
pub fn build_cast_assoc(member_section_ids: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    for id in member_section_ids {
        push_u32_be(&mut out, *id);
    }
    out
}

/// A field `CASt` in the D5 layout with the given member name.
pub fn build_field_cast_member(name: &str) -> Vec<u8> {
    // info list: 5-word header, offset table, items
    let mut info = Vec::new();
    push_u32_be(&mut info, 20); // data offset = header size
    push_u32_be(&mut info, 0);
    push_u32_be(&mut info, 0);
    push_u32_be(&mut info, 0); // flags
    push_u32_be(&mut info, 0); // script id
    push_u16_be(&mut info, 2); // offset table length
    push_u32_be(&mut info, 0); // item 0 (script text, empty)
    push_u32_be(&mut info, 0); // item 1 starts at 0
    let name_item = {
        let mut item = vec![name.len() as u8];
        item.extend_from_slice(name.as_bytes());
        item
    };
    push_u32_be(&mut info, name_item.len() as u32); // items length
    info.extend_from_slice(&name_item);

    let mut out = Vec::new();
    push_u32_be(&mut out, 3); // member type: field
    push_u32_be(&mut out, info.len() as u32);
    push_u32_be(&mut out, 0); // specific data length
    out.extend_from_slice(&info);
    out
}

/// `MCsL` with a single cast library entry.
pub fn build_cast_list(name: &str, file_path: &str, preload: u16, id: u32) -> Vec<u8> {
    let pascal = |s: &str| {
        let mut buf = vec![s.len() as u8];
        buf.extend_from_slice(s.as_bytes());
        buf
    };
    let items: Vec<Vec<u8>> = vec![
        Vec::new(),           // item 0, unused
        pascal(name),         // item 1: name
        pascal(file_path),    // item 2: file path
        preload.to_be_bytes().to_vec(), // item 3: preload settings
        {
            let mut buf = Vec::new();
            push_u16_be(&mut buf, 1); // min member
            push_u16_be(&mut buf, 100); // max member
            push_u32_be(&mut buf, id);
            buf
        },
    ];

    let mut out = Vec::new();
    push_u32_be(&mut out, 12); // data offset = header size
    push_u16_be(&mut out, 0); // unk0
    push_u16_be(&mut out, 1); // cast count
    push_u16_be(&mut out, 4); // items per cast
    push_u16_be(&mut out, 0); // unk1

    push_u16_be(&mut out, items.len() as u16);
    let mut offset = 0u32;
    for item in &items {
        push_u32_be(&mut out, offset);
        offset += item.len() as u32;
    }
    push_u32_be(&mut out, offset); // total items length
    for item in &items {
        out.extend_from_slice(item);
    }
    out
}
