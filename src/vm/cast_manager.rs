use std::collections::HashMap;
use std::rc::Rc;

use url::Url;

use crate::director::{enums::ScriptType, file::DirectorFile, lingo::datum::Datum};

use super::{
    bitmap::BitmapManager,
    cast_lib::{
        cast_file_candidates, CastLib, CastLoadState, CastMemberRef, PreloadMode,
        INVALID_CAST_MEMBER_REF,
    },
    cast_member::{CastMember, CastMemberType},
    script::Script,
    ScriptError,
};

/// Why a preload sweep is running; gates which preload modes fire.
#[derive(Clone, Copy, PartialEq)]
pub enum CastPreloadReason {
    MovieLoaded,
    AfterFrameOne,
    MemberAccess,
}

pub struct CastManager {
    pub casts: Vec<CastLib>,
    pub base_path: Option<Url>,
}

impl CastManager {
    pub const fn empty() -> CastManager {
        CastManager {
            casts: Vec::new(),
            base_path: None,
        }
    }

    /// Materialises one library per MCsL entry (or one implicit internal
    /// library when MCsL is absent).
    pub fn load_from_dir(&mut self, dir: &DirectorFile, bitmap_manager: &mut BitmapManager) {
        let mut casts: Vec<CastLib> = Vec::new();
        if dir.cast_entries.is_empty() {
            // single implicit internal cast
            for (index, cast_def) in dir.casts.iter().enumerate() {
                let mut cast = CastLib {
                    name: cast_def.name.clone(),
                    file_name: String::new(),
                    number: (index + 1) as u32,
                    state: CastLoadState::Loaded,
                    lctx: None,
                    members: HashMap::new(),
                    scripts: HashMap::new(),
                    preload_mode: PreloadMode::WhenNeeded,
                    min_member: dir.config.min_member,
                    max_member: dir.config.max_member,
                    capital_x: false,
                    dir_version: dir.version,
                };
                cast.apply_cast_def(cast_def, bitmap_manager);
                casts.push(cast);
            }
        } else {
            for (index, cast_entry) in dir.cast_entries.iter().enumerate() {
                let cast_def = dir.casts.iter().find(|cast| cast.id == cast_entry.id);
                // external iff the entry names a file and no CAS* in this
                // container covers its id
                let is_external = !cast_entry.file_path.is_empty() && cast_def.is_none();
                let file_name = if is_external {
                    self.resolve_external_path(&cast_entry.file_path)
                } else {
                    String::new()
                };
                let mut cast = CastLib {
                    name: cast_entry.name.clone(),
                    file_name,
                    number: (index + 1) as u32,
                    state: if is_external {
                        CastLoadState::None
                    } else {
                        CastLoadState::Loaded
                    },
                    lctx: None,
                    members: HashMap::new(),
                    scripts: HashMap::new(),
                    preload_mode: PreloadMode::from_settings(cast_entry.preload_settings),
                    min_member: cast_entry.min_member,
                    max_member: cast_entry.max_member,
                    capital_x: false,
                    dir_version: dir.version,
                };
                if let Some(cast_def) = cast_def {
                    cast.apply_cast_def(cast_def, bitmap_manager);
                }
                casts.push(cast);
            }
        }
        self.casts = casts;
    }

    fn resolve_external_path(&self, file_path: &str) -> String {
        let candidates = cast_file_candidates(file_path);
        let preferred = candidates
            .first()
            .cloned()
            .unwrap_or_else(|| file_path.to_string());
        match &self.base_path {
            Some(base) => base
                .join(&preferred)
                .map(|joined| joined.to_string())
                .unwrap_or(preferred),
            None => preferred,
        }
    }

    pub fn get_cast(&self, number: u32) -> Result<&CastLib, ScriptError> {
        self.get_cast_or_null(number)
            .ok_or_else(|| ScriptError::new(format!("Cast not found: {number}")))
    }

    pub fn get_cast_or_null(&self, number: u32) -> Option<&CastLib> {
        if number == 0 {
            return None;
        }
        self.casts.get(number as usize - 1)
    }

    pub fn get_cast_mut(&mut self, number: u32) -> Option<&mut CastLib> {
        if number == 0 {
            return None;
        }
        self.casts.get_mut(number as usize - 1)
    }

    pub fn get_cast_by_name(&self, name: &str) -> Option<&CastLib> {
        self.casts
            .iter()
            .find(|cast| cast.name.eq_ignore_ascii_case(name))
    }

    pub fn find_member_ref_by_number(&self, number: u32) -> Option<CastMemberRef> {
        for cast in &self.casts {
            for member in cast.members.values() {
                if member.number == number
                    || get_cast_slot_number(cast.number, member.number) == number
                {
                    return Some(CastMemberRef {
                        cast_lib: cast.number as i32,
                        cast_member: member.number as i32,
                    });
                }
            }
        }
        None
    }

    pub fn find_member_ref_by_name(&self, name: &str) -> Option<CastMemberRef> {
        for cast in &self.casts {
            if let Some(member) = cast.find_member_by_name(name) {
                return Some(CastMemberRef {
                    cast_lib: cast.number as i32,
                    cast_member: member.number as i32,
                });
            }
        }
        None
    }

    pub fn find_member_ref_by_identifiers(
        &self,
        member_name_or_num: &Datum,
        cast_name_or_num: Option<&Datum>,
    ) -> Result<Option<CastMemberRef>, ScriptError> {
        let cast_lib = match cast_name_or_num {
            Some(datum) if datum.is_string() => self.get_cast_by_name(&datum.string_value()?),
            Some(datum) if datum.is_number() => {
                let int_val = datum.int_value()?;
                if int_val > 0 {
                    self.get_cast_or_null(int_val as u32)
                } else {
                    None
                }
            }
            Some(Datum::CastLib(num)) => self.get_cast_or_null(*num),
            _ => None,
        };

        let member_ref = match (member_name_or_num, cast_lib) {
            (Datum::String(name), Some(cast_lib)) => {
                cast_lib.find_member_by_name(name).map(|member| CastMemberRef {
                    cast_lib: cast_lib.number as i32,
                    cast_member: member.number as i32,
                })
            }
            (Datum::String(name), None) => self.find_member_ref_by_name(name),
            (datum, Some(cast_lib)) if datum.is_number() => {
                let num = datum.int_value()? as u32;
                cast_lib.find_member_by_number(num).map(|member| CastMemberRef {
                    cast_lib: cast_lib.number as i32,
                    cast_member: member.number as i32,
                })
            }
            (datum, None) if datum.is_number() => {
                self.find_member_ref_by_number(datum.int_value()? as u32)
            }
            _ => {
                return Err(ScriptError::new(format!(
                    "Member number or name type invalid: {}",
                    member_name_or_num.type_str()
                )))
            }
        };

        Ok(member_ref)
    }

    pub fn find_member_by_ref(&self, member_ref: &CastMemberRef) -> Option<&CastMember> {
        if member_ref.cast_lib > 0 {
            self.get_cast_or_null(member_ref.cast_lib as u32)
                .and_then(|cast| cast.find_member_by_number(member_ref.cast_member as u32))
        } else {
            self.casts
                .iter()
                .find_map(|cast| cast.find_member_by_number(member_ref.cast_member as u32))
        }
    }

    pub fn find_mut_member_by_ref(&mut self, member_ref: &CastMemberRef) -> Option<&mut CastMember> {
        self.get_cast_mut(member_ref.cast_lib as u32)
            .and_then(|cast| cast.find_mut_member_by_number(member_ref.cast_member as u32))
    }

    pub fn get_script_by_ref(&self, member_ref: &CastMemberRef) -> Option<&Rc<Script>> {
        if member_ref.cast_lib == INVALID_CAST_MEMBER_REF.cast_lib
            || member_ref.cast_member == INVALID_CAST_MEMBER_REF.cast_member
        {
            None
        } else {
            self.get_cast_or_null(member_ref.cast_lib as u32)
                .and_then(|cast| cast.get_script_for_member(member_ref.cast_member as u32))
        }
    }

    pub fn get_field_value_by_identifiers(
        &self,
        member_name_or_num: &Datum,
        cast_name_or_num: Option<&Datum>,
    ) -> Result<String, ScriptError> {
        let member_ref =
            self.find_member_ref_by_identifiers(member_name_or_num, cast_name_or_num)?;
        let member = member_ref.and_then(|member_ref| self.find_member_by_ref(&member_ref));
        match member {
            Some(member) => match &member.member_type {
                CastMemberType::Field(field) => Ok(field.text.to_owned()),
                CastMemberType::Text(text) => Ok(text.text.to_owned()),
                _ => Err(ScriptError::new("Cast member is not a field".to_string())),
            },
            None => Err(ScriptError::new("Cast member not found".to_string())),
        }
    }

    pub fn remove_member_with_ref(&mut self, member_ref: &CastMemberRef) -> Result<(), ScriptError> {
        if member_ref.cast_lib <= 0 {
            return Err(ScriptError::new(
                "Cannot remove member with invalid cast lib".to_string(),
            ));
        }
        if let Some(cast) = self.get_cast_mut(member_ref.cast_lib as u32) {
            cast.remove_member(member_ref.cast_member as u32);
        }
        Ok(())
    }

    /// Declared property names of a script member, resolved through its
    /// context's name table.
    pub fn get_script_property_names(&self, member_ref: &CastMemberRef) -> Vec<String> {
        let script = match self.get_script_by_ref(member_ref) {
            Some(script) => script,
            None => return vec![],
        };
        let lctx = self
            .get_cast_or_null(member_ref.cast_lib as u32)
            .and_then(|cast| cast.lctx.as_ref());
        match lctx {
            Some(lctx) => script
                .chunk
                .property_name_ids
                .iter()
                .filter_map(|name_id| lctx.resolve_name(*name_id).cloned())
                .collect(),
            None => vec![],
        }
    }

    pub fn get_movie_scripts(&self) -> Vec<Rc<Script>> {
        let mut result = Vec::new();
        for cast in &self.casts {
            for script in cast.scripts.values() {
                if let ScriptType::Movie = script.script_type {
                    result.push(script.clone());
                }
            }
        }
        result
    }
}

/// Encoded member slot: high half selects the library, low half the member.
pub fn get_cast_slot_number(cast_lib: u32, cast_member: u32) -> u32 {
    (cast_lib << 16) | (cast_member & 0xFFFF)
}

pub fn member_ref_from_slot_number(slot_number: u32) -> CastMemberRef {
    if slot_number > 0xFFFF {
        CastMemberRef {
            cast_lib: (slot_number >> 16) as i32,
            cast_member: (slot_number & 0xFFFF) as i32,
        }
    } else {
        CastMemberRef {
            cast_lib: 0,
            cast_member: slot_number as i32,
        }
    }
}
