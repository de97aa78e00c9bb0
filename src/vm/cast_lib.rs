use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;
use log::info;

use crate::director::{
    cast::CastDef, enums::ScriptType, file::DirectorFile, lingo::datum::Datum,
    lingo::script::ScriptContext,
};

use super::{
    bitmap::BitmapManager,
    cast_member::{CastMember, CastMemberType, FieldMember, TextMember},
    providers::NetTaskId,
    script::Script,
    ScriptError,
};

/// External-cast lifecycle. `Loading` remembers the host fetch task.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CastLoadState {
    None,
    Loading(NetTaskId),
    Loaded,
}

/// When an external library's bytes are fetched relative to playback.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PreloadMode {
    WhenNeeded,
    AfterFrameOne,
    BeforeFrameOne,
}

impl PreloadMode {
    pub fn from_settings(settings: u16) -> PreloadMode {
        match settings {
            1 => PreloadMode::AfterFrameOne,
            2 => PreloadMode::BeforeFrameOne,
            _ => PreloadMode::WhenNeeded,
        }
    }
}

pub struct CastLib {
    pub name: String,
    /// Resolved fetch path; empty for internal libraries.
    pub file_name: String,
    pub number: u32,
    pub state: CastLoadState,
    pub lctx: Option<ScriptContext>,
    pub members: HashMap<u32, CastMember>,
    pub scripts: HashMap<u32, Rc<Script>>,
    pub preload_mode: PreloadMode,
    pub min_member: u16,
    pub max_member: u16,
    pub capital_x: bool,
    pub dir_version: u16,
}

impl CastLib {
    pub fn is_external(&self) -> bool {
        !self.file_name.is_empty()
    }

    pub fn max_member_id(&self) -> u32 {
        *self.members.keys().max().unwrap_or(&0)
    }

    pub fn first_free_member_id(&self) -> u32 {
        let mut i = 1;
        while self.members.contains_key(&i) {
            i += 1;
        }
        i
    }

    pub fn find_member_by_number(&self, number: u32) -> Option<&CastMember> {
        self.members.get(&number)
    }

    pub fn find_mut_member_by_number(&mut self, number: u32) -> Option<&mut CastMember> {
        self.members.get_mut(&number)
    }

    pub fn find_member_by_name(&self, name: &str) -> Option<&CastMember> {
        self.members
            .values()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    pub fn get_script_for_member(&self, number: u32) -> Option<&Rc<Script>> {
        self.scripts.get(&number)
    }

    pub fn remove_member(&mut self, number: u32) {
        self.members.remove(&number);
        self.scripts.remove(&number);
    }

    fn clear(&mut self) {
        self.members.clear();
        self.scripts.clear();
        self.lctx = None;
    }

    pub fn get_prop(&self, prop: &str) -> Result<Datum, ScriptError> {
        match prop {
            "preloadMode" => Ok(Datum::Int(self.preload_mode as i32)),
            "fileName" => Ok(Datum::String(self.file_name.clone())),
            "number" => Ok(Datum::Int(self.number as i32)),
            "name" => Ok(Datum::String(self.name.clone())),
            _ => Err(ScriptError::new(format!(
                "Cannot get castLib property {prop}"
            ))),
        }
    }

    pub fn set_prop(&mut self, prop: &str, value: Datum) -> Result<(), ScriptError> {
        match prop {
            "preloadMode" => {
                self.preload_mode = PreloadMode::from_settings(value.int_value()? as u16);
            }
            "name" => {
                self.name = value.string_value()?;
            }
            "fileName" => {
                self.file_name = value.string_value()?;
                self.state = CastLoadState::None;
            }
            _ => {
                return Err(ScriptError::new(format!(
                    "Cannot set castLib property {prop}"
                )));
            }
        };
        Ok(())
    }

    /// Integrates a fetched external cast file. The first cast def in the
    /// fetched container becomes this library's content.
    pub fn load_from_dir_file(&mut self, file: &DirectorFile, bitmap_manager: &mut BitmapManager) {
        self.clear();
        if self.name.is_empty() {
            self.name = basename_no_extension(&self.file_name);
        }
        if let Some(cast_def) = file.casts.first() {
            self.apply_cast_def(cast_def, bitmap_manager);
        }
        self.state = CastLoadState::Loaded;
        info!("loaded external cast {}", self.file_name);
    }

    pub fn apply_cast_def(&mut self, cast_def: &CastDef, bitmap_manager: &mut BitmapManager) {
        self.lctx = cast_def.lctx.clone();
        self.capital_x = cast_def.capital_x;
        self.dir_version = cast_def.dir_version;
        for (id, member_def) in &cast_def.members {
            let member = CastMember::from_def(*id, member_def, &self.lctx, bitmap_manager);
            self.insert_member(*id, member);
        }
    }

    pub fn insert_member(&mut self, number: u32, member: CastMember) {
        if let CastMemberType::Script(script_member) = &member.member_type {
            let script_def = self
                .lctx
                .as_ref()
                .and_then(|lctx| lctx.scripts.get(&script_member.script_id));
            if let Some(script_def) = script_def {
                let lctx = self.lctx.as_ref().unwrap();
                let mut handler_names = Vec::new();
                let mut handler_map = HashMap::new();
                for handler in &script_def.handlers {
                    let handler_name = lctx
                        .resolve_name(handler.name_id)
                        .cloned()
                        .unwrap_or_else(|| handler.name_id.to_string());
                    handler_map.insert(handler_name.to_lowercase(), Rc::new(handler.clone()));
                    handler_names.push(handler_name);
                }

                let script = Script {
                    member_ref: super::cast_lib::cast_member_ref(
                        self.number as i32,
                        number as i32,
                    ),
                    name: member.name.clone(),
                    chunk: script_def.clone(),
                    script_type: script_member.script_type,
                    handlers: handler_map,
                    handler_names,
                };
                self.scripts.insert(number, Rc::new(script));
            }
        }

        self.members.insert(number, member);
    }

    pub fn create_member_at(
        &mut self,
        number: u32,
        member_type: &str,
        bitmap_manager: &mut BitmapManager,
    ) -> Result<CastMemberRef, ScriptError> {
        let member = match member_type {
            "field" => Ok(CastMember::new(
                number,
                CastMemberType::Field(FieldMember::new()),
            )),
            "text" => Ok(CastMember::new(
                number,
                CastMemberType::Text(TextMember::new()),
            )),
            "bitmap" => {
                let bitmap = super::bitmap::Bitmap::new(0, 0, 32);
                let image_ref = bitmap_manager.add_bitmap(bitmap);
                Ok(CastMember::new(
                    number,
                    CastMemberType::Bitmap(super::cast_member::BitmapMember {
                        image_ref,
                        reg_point: (0, 0),
                    }),
                ))
            }
            _ => Err(ScriptError::new(format!(
                "Cannot create member of type {member_type}"
            ))),
        }?;
        self.insert_member(number, member);
        Ok(cast_member_ref(self.number as i32, number as i32))
    }

    pub fn movie_scripts(&self) -> Vec<&Rc<Script>> {
        self.scripts
            .values()
            .filter(|script| script.script_type == ScriptType::Movie)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CastMemberRef {
    pub cast_lib: i32,
    pub cast_member: i32,
}

pub const INVALID_CAST_MEMBER_REF: CastMemberRef = CastMemberRef {
    cast_lib: -1,
    cast_member: -1,
};
pub const NULL_CAST_MEMBER_REF: CastMemberRef = CastMemberRef {
    cast_lib: 0,
    cast_member: 0,
};

pub fn cast_member_ref(cast_lib: i32, cast_member: i32) -> CastMemberRef {
    CastMemberRef {
        cast_lib,
        cast_member,
    }
}

impl CastMemberRef {
    pub fn is_valid(&self) -> bool {
        self.cast_lib != INVALID_CAST_MEMBER_REF.cast_lib
            && self.cast_member != INVALID_CAST_MEMBER_REF.cast_member
    }
}

/// Candidate fetch names for an external cast path: Mac-style colon
/// components are stripped and the compressed extension is preferred.
pub fn cast_file_candidates(file_path: &str) -> Vec<String> {
    let slash_normalized = file_path.replace('\\', "/");
    let last_component = slash_normalized
        .split('/')
        .last()
        .unwrap_or(&slash_normalized);
    let base = last_component
        .split(':')
        .last()
        .unwrap_or(last_component);
    let base = basename_no_extension(base);
    ["cct", "cst", "cxt"]
        .iter()
        .map(|ext| format!("{base}.{ext}"))
        .collect_vec()
}

pub fn basename_no_extension(name: &str) -> String {
    let base = name.split('/').last().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _ext)) => stem.to_string(),
        None => base.to_string(),
    }
}
