pub mod bitmap;
pub mod cast;
pub mod cast_list;
pub mod cast_member;
pub mod cast_member_info;
pub mod config;
pub mod handler;
pub mod imap;
pub mod key_table;
pub mod labels;
pub mod lctx;
pub mod list;
pub mod literal;
pub mod palette;
pub mod score;
pub mod script;
pub mod script_names;
pub mod sound;
pub mod text;

use std::collections::HashMap;

use binary_reader::{BinaryReader, Endian};

use self::{
    bitmap::BitmapChunk, cast::CastAssocChunk, cast_list::CastListChunk,
    cast_member::CastMemberChunk, config::ConfigChunk, imap::InitialMapChunk,
    key_table::KeyTableChunk, labels::FrameLabelsChunk, lctx::ScriptContextChunk,
    palette::PaletteChunk, score::ScoreChunk, script::ScriptChunk,
    script_names::ScriptNamesChunk, sound::SoundChunk, text::TextChunk,
};
use super::{
    file::FileError,
    guid::MoaID,
    rifx::RIFXReaderContext,
    utils::{fourcc_to_string, FOURCC},
};

/// A decoded chunk. Tags without a dedicated decoder keep their raw bytes in
/// `Raw` so auxiliary data can still be looked up by resource id.
#[derive(Debug)]
pub enum Chunk {
    CastAssoc(CastAssocChunk),
    CastList(CastListChunk),
    CastMember(CastMemberChunk),
    Config(ConfigChunk),
    InitialMap(InitialMapChunk),
    KeyTable(KeyTableChunk),
    Script(ScriptChunk),
    ScriptContext(ScriptContextChunk),
    ScriptNames(ScriptNamesChunk),
    FrameLabels(FrameLabelsChunk),
    Score(ScoreChunk),
    Text(TextChunk),
    Bitmap(BitmapChunk),
    Palette(PaletteChunk),
    Sound(SoundChunk),
    Raw(u32, Vec<u8>),
}

impl Chunk {
    pub fn as_text(&self) -> Option<&TextChunk> {
        match self {
            Self::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_bitmap(&self) -> Option<&BitmapChunk> {
        match self {
            Self::Bitmap(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_palette(&self) -> Option<&PaletteChunk> {
        match self {
            Self::Palette(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_sound(&self) -> Option<&SoundChunk> {
        match self {
            Self::Sound(data) => Some(data),
            _ => None,
        }
    }
}

/// One resource-map entry: where a chunk's bytes live and how they are
/// compressed (Afterburner only).
#[derive(Debug)]
pub struct ChunkInfo {
    pub id: u32,
    pub fourcc: u32,
    pub len: usize,
    pub uncompressed_len: usize,
    pub offset: usize,
    pub compression_id: MoaID,
}

/// All chunk state for one container: the resource map plus the cache of
/// materialised (decompressed) chunk bytes.
#[derive(Debug)]
pub struct ChunkContainer {
    pub chunk_info: HashMap<u32, ChunkInfo>,
    pub cached_chunk_views: HashMap<u32, Vec<u8>>,
}

impl ChunkContainer {
    pub fn new() -> ChunkContainer {
        ChunkContainer {
            chunk_info: HashMap::new(),
            cached_chunk_views: HashMap::new(),
        }
    }
}

impl Default for ChunkContainer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn make_chunk(
    endian: Endian,
    rifx: &mut RIFXReaderContext,
    fourcc: u32,
    view: &[u8],
) -> Result<Chunk, FileError> {
    let version = rifx.dir_version;
    let mut chunk_reader = BinaryReader::from_u8(view);
    chunk_reader.set_endian(endian);

    match fourcc_to_string(fourcc).as_str() {
        "imap" => Ok(Chunk::InitialMap(InitialMapChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "CAS*" => Ok(Chunk::CastAssoc(CastAssocChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "CASt" => Ok(Chunk::CastMember(CastMemberChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "KEY*" => Ok(Chunk::KeyTable(KeyTableChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "LctX" | "Lctx" => {
            rifx.lctx_capital_x = fourcc == FOURCC("LctX");
            Ok(Chunk::ScriptContext(ScriptContextChunk::from_reader(
                &mut chunk_reader,
                version,
            )?))
        }
        "Lnam" => Ok(Chunk::ScriptNames(ScriptNamesChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "Lscr" => Ok(Chunk::Script(ScriptChunk::from_reader(
            &mut chunk_reader,
            version,
            rifx.lctx_capital_x,
        )?)),
        "DRCF" | "VWCF" => Ok(Chunk::Config(ConfigChunk::from_reader(
            &mut chunk_reader,
            version,
            endian,
        )?)),
        "MCsL" => Ok(Chunk::CastList(CastListChunk::from_reader(
            &mut chunk_reader,
            version,
            endian,
        )?)),
        "VWSC" | "SCVW" => Ok(Chunk::Score(ScoreChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "VWLB" => Ok(Chunk::FrameLabels(FrameLabelsChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "STXT" => Ok(Chunk::Text(TextChunk::from_reader(&mut chunk_reader)?)),
        "BITD" => Ok(Chunk::Bitmap(BitmapChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "CLUT" => Ok(Chunk::Palette(PaletteChunk::from_reader(
            &mut chunk_reader,
            version,
        )?)),
        "snd " => Ok(Chunk::Sound(SoundChunk::from_reader(&mut chunk_reader)?)),
        _ => Ok(Chunk::Raw(fourcc, view.to_vec())),
    }
}
