use crate::director::{
    chunks::cast_member::{CastMemberDef, CastMemberSpecificData},
    chunks::Chunk,
    enums::{BitmapInfo, MemberType, ScriptType, ShapeInfo},
    lingo::script::ScriptContext,
};

use super::bitmap::{Bitmap, BitmapManager, BitmapRef};

#[derive(Clone)]
pub struct CastMember {
    pub number: u32,
    pub name: String,
    pub member_type: CastMemberType,
}

#[derive(Clone)]
pub enum CastMemberType {
    Bitmap(BitmapMember),
    Field(FieldMember),
    Text(TextMember),
    Script(ScriptMember),
    Sound(SoundMember),
    Palette(PaletteMember),
    Shape(ShapeMember),
    FilmLoop(FilmLoopMember),
    Unknown,
}

#[derive(Clone)]
pub struct BitmapMember {
    pub image_ref: BitmapRef,
    pub reg_point: (i16, i16),
}

#[derive(Clone)]
pub struct FieldMember {
    pub text: String,
}

impl FieldMember {
    pub fn new() -> FieldMember {
        FieldMember {
            text: String::new(),
        }
    }
}

impl Default for FieldMember {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct TextMember {
    pub text: String,
}

impl TextMember {
    pub fn new() -> TextMember {
        TextMember {
            text: String::new(),
        }
    }
}

impl Default for TextMember {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct ScriptMember {
    pub script_type: ScriptType,
    /// 1-based index into the owning context's section map.
    pub script_id: u32,
}

#[derive(Clone)]
pub struct SoundMember {
    pub sample_rate: u32,
    pub sample_count: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub looped: bool,
}

#[derive(Clone)]
pub struct PaletteMember {
    pub colors: Vec<(u8, u8, u8)>,
}

impl PaletteMember {
    pub fn new() -> PaletteMember {
        PaletteMember { colors: vec![] }
    }
}

impl Default for PaletteMember {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct ShapeMember {
    pub info: ShapeInfo,
}

#[derive(Clone)]
pub struct FilmLoopMember {
    pub width: u16,
    pub height: u16,
}

impl CastMember {
    pub fn new(number: u32, member_type: CastMemberType) -> CastMember {
        CastMember {
            number,
            name: String::new(),
            member_type,
        }
    }

    /// Materialises a decoded `CASt` (plus its key-table children) into a
    /// runtime member.
    pub fn from_def(
        number: u32,
        def: &CastMemberDef,
        _lctx: &Option<ScriptContext>,
        bitmap_manager: &mut BitmapManager,
    ) -> CastMember {
        let chunk = &def.chunk;
        let name = chunk
            .member_info
            .as_ref()
            .map(|info| info.name.clone())
            .unwrap_or_default();

        let member_type = match chunk.member_type {
            MemberType::Script => {
                let script_type = chunk
                    .specific_data
                    .script_type()
                    .unwrap_or(ScriptType::Invalid);
                let script_id = chunk
                    .member_info
                    .as_ref()
                    .map(|info| info.header.script_id)
                    .unwrap_or(0);
                CastMemberType::Script(ScriptMember {
                    script_type,
                    script_id,
                })
            }
            MemberType::Field | MemberType::Button => {
                let text = find_child_text(def).unwrap_or_default();
                CastMemberType::Field(FieldMember { text })
            }
            MemberType::Text => {
                let text = find_child_text(def).unwrap_or_default();
                CastMemberType::Text(TextMember { text })
            }
            MemberType::Bitmap => {
                let info = chunk.specific_data.bitmap_info().cloned().unwrap_or(BitmapInfo {
                    width: 0,
                    height: 0,
                    reg_x: 0,
                    reg_y: 0,
                    bit_depth: 1,
                    palette_id: 0,
                });
                let bitmap = Bitmap::new(info.width, info.height, info.bit_depth);
                let image_ref = bitmap_manager.add_bitmap(bitmap);
                CastMemberType::Bitmap(BitmapMember {
                    image_ref,
                    reg_point: (info.reg_x, info.reg_y),
                })
            }
            MemberType::Sound => {
                let sound = def
                    .children
                    .iter()
                    .flatten()
                    .find_map(|chunk| chunk.as_sound());
                match sound {
                    Some(sound) => CastMemberType::Sound(SoundMember {
                        sample_rate: sound.sample_rate,
                        sample_count: sound.sample_count,
                        channel_count: sound.channel_count,
                        bits_per_sample: sound.bits_per_sample,
                        looped: false,
                    }),
                    None => CastMemberType::Unknown,
                }
            }
            MemberType::Palette => {
                let colors = def
                    .children
                    .iter()
                    .flatten()
                    .find_map(|chunk| chunk.as_palette())
                    .map(|palette| palette.colors.clone())
                    .unwrap_or_default();
                CastMemberType::Palette(PaletteMember { colors })
            }
            MemberType::Shape => match &chunk.specific_data {
                CastMemberSpecificData::Shape(info) => {
                    CastMemberType::Shape(ShapeMember { info: info.clone() })
                }
                _ => CastMemberType::Unknown,
            },
            MemberType::FilmLoop | MemberType::Movie | MemberType::DigitalVideo => {
                let info = chunk.specific_data.film_loop_info();
                CastMemberType::FilmLoop(FilmLoopMember {
                    width: info.map(|x| x.width).unwrap_or(0),
                    height: info.map(|x| x.height).unwrap_or(0),
                })
            }
            _ => CastMemberType::Unknown,
        };

        CastMember {
            number,
            name,
            member_type,
        }
    }

    pub fn type_symbol(&self) -> &'static str {
        match self.member_type {
            CastMemberType::Bitmap(_) => "bitmap",
            CastMemberType::Field(_) => "field",
            CastMemberType::Text(_) => "text",
            CastMemberType::Script(_) => "script",
            CastMemberType::Sound(_) => "sound",
            CastMemberType::Palette(_) => "palette",
            CastMemberType::Shape(_) => "shape",
            CastMemberType::FilmLoop(_) => "filmLoop",
            CastMemberType::Unknown => "empty",
        }
    }
}

impl CastMemberType {
    pub fn as_field(&self) -> Option<&FieldMember> {
        match self {
            CastMemberType::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldMember> {
        match self {
            CastMemberType::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextMember> {
        match self {
            CastMemberType::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextMember> {
        match self {
            CastMemberType::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptMember> {
        match self {
            CastMemberType::Script(script) => Some(script),
            _ => None,
        }
    }

    pub fn as_bitmap(&self) -> Option<&BitmapMember> {
        match self {
            CastMemberType::Bitmap(bitmap) => Some(bitmap),
            _ => None,
        }
    }
}

fn find_child_text(def: &CastMemberDef) -> Option<String> {
    def.children.iter().flatten().find_map(|chunk| match chunk {
        Chunk::Text(text) => Some(text.text.clone()),
        _ => None,
    })
}
