use itertools::Itertools;
use log::info;

use crate::{
    director::lingo::datum::Datum,
    vm::{datum_formatting::format_datum, datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct MovieHandlers {}

impl MovieHandlers {
    fn first(args: &[DatumRef]) -> Result<&DatumRef, ScriptError> {
        args.first()
            .ok_or_else(|| ScriptError::new("Missing argument".to_string()))
    }

    /// `put` prints to the log the way the message window would.
    pub fn put(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let line = args.iter().map(|arg| format_datum(arg, vm)).join(" ");
        info!("-- {line}");
        Ok(DatumRef::Void)
    }

    pub fn halt(vm: &mut LingoVm, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        vm.halted = true;
        Ok(DatumRef::Void)
    }

    /// 1-indexed access into the current handler's arguments.
    pub fn param(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let param_number = vm.get_datum(Self::first(args)?).int_value()?;
        let scope_ref = vm.current_scope_ref();
        let scope = &vm.scopes[scope_ref];
        Ok(scope
            .args
            .get((param_number - 1).max(0) as usize)
            .cloned()
            .unwrap_or(DatumRef::Void))
    }

    pub fn pass(vm: &mut LingoVm, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let scope_ref = vm.current_scope_ref();
        vm.scopes[scope_ref].passed = true;
        Ok(DatumRef::Void)
    }

    /// `go` accepts a frame number, a label string, or one of the
    /// navigation symbols `#next` / `#previous` / `#loop`.
    pub fn go(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let target = vm.get_datum(Self::first(args)?).clone();
        match target {
            Datum::Int(frame) => Self::go_to_frame(vm, frame.max(1) as u32),
            Datum::String(label) => Self::go_to_label(vm, &label),
            Datum::Symbol(direction) => {
                let current = vm.movie.current_frame;
                let frame = match direction.to_lowercase().as_str() {
                    "next" => current + 1,
                    "previous" => current.saturating_sub(1).max(1),
                    "loop" => current,
                    _ => {
                        return Err(ScriptError::new(format!(
                            "Invalid go target #{direction}"
                        )))
                    }
                };
                Self::go_to_frame(vm, frame)
            }
            other => Err(ScriptError::new(format!(
                "Invalid go target of type {}",
                other.type_str()
            ))),
        }
    }

    fn go_to_frame(vm: &mut LingoVm, frame: u32) -> Result<DatumRef, ScriptError> {
        vm.movie.current_frame = frame;
        if let Some(provider) = vm.providers.movie.as_mut() {
            provider.go_to_frame(frame);
        }
        Ok(DatumRef::Void)
    }

    fn go_to_label(vm: &mut LingoVm, label: &str) -> Result<DatumRef, ScriptError> {
        if let Some(frame) = vm.movie.label_to_frame(label) {
            vm.movie.current_frame = frame;
        }
        if let Some(provider) = vm.providers.movie.as_mut() {
            provider.go_to_label(label);
        }
        Ok(DatumRef::Void)
    }

    pub fn puppet_tempo(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let tempo = vm.get_datum(Self::first(args)?).int_value()?;
        vm.movie.puppet_tempo = tempo.max(0) as u32;
        Ok(DatumRef::Void)
    }

    pub fn puppet_sprite(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let sprite_num = vm.get_datum(Self::first(args)?).int_value()?;
        let puppet = match args.get(1) {
            Some(value_ref) => vm.get_datum(value_ref).clone(),
            None => Datum::Int(1),
        };
        if let Some(provider) = vm.providers.sprite.as_mut() {
            provider.set_sprite_prop(sprite_num as i16, "puppet", puppet);
        }
        Ok(DatumRef::Void)
    }

    pub fn sprite(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let sprite_num = vm.get_datum(Self::first(args)?).int_value()?;
        Ok(vm.alloc_datum(Datum::SpriteRef(sprite_num as i16)))
    }

    /// `script(nameOrNum)` resolves to a script reference.
    pub fn script(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let identifier = vm.get_datum(Self::first(args)?).clone();
        let member_ref = vm
            .movie
            .cast_manager
            .find_member_ref_by_identifiers(&identifier, None)?;
        match member_ref {
            Some(member_ref) => {
                if vm.movie.cast_manager.get_script_by_ref(&member_ref).is_some() {
                    Ok(vm.alloc_datum(Datum::ScriptRef(member_ref)))
                } else {
                    Ok(DatumRef::Void)
                }
            }
            None => Ok(DatumRef::Void),
        }
    }

    pub fn external_param_value(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let name = vm.get_datum(Self::first(args)?).string_value()?;
        let value = match vm.providers.params.as_mut() {
            Some(provider) => provider.get_param_value(&name),
            None => None,
        };
        match value {
            Some(value) => Ok(vm.alloc_datum(Datum::String(value))),
            None => Ok(DatumRef::Void),
        }
    }

    pub fn external_param_name(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let index = vm.get_datum(Self::first(args)?).int_value()?;
        let name = match vm.providers.params.as_mut() {
            Some(provider) => provider.get_param_name((index - 1).max(0) as usize),
            None => None,
        };
        match name {
            Some(name) => Ok(vm.alloc_datum(Datum::String(name))),
            None => Ok(DatumRef::Void),
        }
    }

    pub fn external_param_count(vm: &mut LingoVm, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let count = match vm.providers.params.as_mut() {
            Some(provider) => provider.param_count(),
            None => 0,
        };
        Ok(vm.alloc_datum(Datum::Int(count as i32)))
    }
}
