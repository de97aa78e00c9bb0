use crate::{
    director::lingo::datum::{datum_bool, Datum},
    vm::{
        cast_lib::CastMemberRef,
        cast_manager::get_cast_slot_number,
        cast_member::CastMemberType,
        datum_ref::DatumRef,
        LingoVm, ScriptError,
    },
};

pub struct CastMemberRefHandlers {}

impl CastMemberRefHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let member_ref = vm.get_datum(datum).to_member_ref()?;
        match handler_name {
            "erase" => {
                vm.movie.cast_manager.remove_member_with_ref(&member_ref)?;
                Ok(DatumRef::Void)
            }
            "getProp" => {
                let prop_name = vm
                    .get_datum(args.first().ok_or_else(|| {
                        ScriptError::new("Missing argument for getProp".to_string())
                    })?)
                    .string_value()?;
                let result = Self::get_prop(vm, &member_ref, &prop_name)?;
                Ok(vm.alloc_datum(result))
            }
            "setProp" => {
                let prop_name = vm
                    .get_datum(args.first().ok_or_else(|| {
                        ScriptError::new("Missing argument for setProp".to_string())
                    })?)
                    .string_value()?;
                let value = vm
                    .get_datum(args.get(1).ok_or_else(|| {
                        ScriptError::new("Missing value for setProp".to_string())
                    })?)
                    .clone();
                Self::set_prop(vm, &member_ref, &prop_name, value)?;
                Ok(DatumRef::Void)
            }
            "duplicate" => Ok(vm.duplicate_datum(datum)),
            _ => {
                // a member method may target its script, e.g.
                // member("x").handler()
                let script_exists = vm.movie.cast_manager.get_script_by_ref(&member_ref).is_some();
                if script_exists {
                    let script_ref_datum = vm.alloc_datum(Datum::ScriptRef(member_ref));
                    super::script::ScriptDatumHandlers::call(
                        vm,
                        &script_ref_datum,
                        handler_name,
                        args,
                    )
                } else {
                    Err(ScriptError::new(format!(
                        "No handler {handler_name} for cast member datum"
                    )))
                }
            }
        }
    }

    pub fn get_prop(
        vm: &mut LingoVm,
        member_ref: &CastMemberRef,
        prop_name: &str,
    ) -> Result<Datum, ScriptError> {
        match prop_name {
            "number" => {
                return Ok(Datum::Int(get_cast_slot_number(
                    member_ref.cast_lib as u32,
                    member_ref.cast_member as u32,
                ) as i32))
            }
            "castLibNum" => return Ok(Datum::Int(member_ref.cast_lib)),
            "memberNum" => return Ok(Datum::Int(member_ref.cast_member)),
            _ => {}
        }

        let member = vm
            .movie
            .cast_manager
            .find_member_by_ref(member_ref)
            .ok_or_else(|| {
                ScriptError::new(format!(
                    "Cast member not found: {}:{}",
                    member_ref.cast_lib, member_ref.cast_member
                ))
            })?;
        match prop_name {
            "name" => Ok(Datum::String(member.name.clone())),
            "type" => Ok(Datum::Symbol(member.type_symbol().to_string())),
            "text" => match &member.member_type {
                CastMemberType::Field(field) => Ok(Datum::String(field.text.clone())),
                CastMemberType::Text(text) => Ok(Datum::String(text.text.clone())),
                _ => Err(ScriptError::new("Member has no text".to_string())),
            },
            "image" => match &member.member_type {
                CastMemberType::Bitmap(bitmap) => Ok(Datum::Image(bitmap.image_ref)),
                _ => Err(ScriptError::new("Member has no image".to_string())),
            },
            "width" => match &member.member_type {
                CastMemberType::Shape(shape) => Ok(Datum::Int(shape.info.width as i32)),
                CastMemberType::FilmLoop(film_loop) => Ok(Datum::Int(film_loop.width as i32)),
                CastMemberType::Bitmap(bitmap) => {
                    let width = vm
                        .bitmap_manager
                        .get_bitmap(bitmap.image_ref)
                        .map(|b| b.width as i32)
                        .unwrap_or(0);
                    Ok(Datum::Int(width))
                }
                _ => Ok(Datum::Int(0)),
            },
            "height" => match &member.member_type {
                CastMemberType::Shape(shape) => Ok(Datum::Int(shape.info.height as i32)),
                CastMemberType::FilmLoop(film_loop) => Ok(Datum::Int(film_loop.height as i32)),
                CastMemberType::Bitmap(bitmap) => {
                    let height = vm
                        .bitmap_manager
                        .get_bitmap(bitmap.image_ref)
                        .map(|b| b.height as i32)
                        .unwrap_or(0);
                    Ok(Datum::Int(height))
                }
                _ => Ok(Datum::Int(0)),
            },
            "ilk" => Ok(Datum::Symbol(
                if member_ref.is_valid() { "member" } else { "void" }.to_string(),
            )),
            "scriptText" => Ok(Datum::String(String::new())),
            "loaded" => Ok(datum_bool(true)),
            _ => Err(ScriptError::new(format!(
                "Cannot get cast member property {prop_name}"
            ))),
        }
    }

    pub fn set_prop(
        vm: &mut LingoVm,
        member_ref: &CastMemberRef,
        prop_name: &str,
        value: Datum,
    ) -> Result<(), ScriptError> {
        let member = vm
            .movie
            .cast_manager
            .find_mut_member_by_ref(member_ref)
            .ok_or_else(|| {
                ScriptError::new(format!(
                    "Cast member not found: {}:{}",
                    member_ref.cast_lib, member_ref.cast_member
                ))
            })?;
        match prop_name {
            "name" => {
                member.name = value.string_value()?;
                Ok(())
            }
            "text" => {
                let text = value.string_value()?;
                match &mut member.member_type {
                    CastMemberType::Field(field) => {
                        field.text = text;
                        Ok(())
                    }
                    CastMemberType::Text(text_member) => {
                        text_member.text = text;
                        Ok(())
                    }
                    _ => Err(ScriptError::new("Member has no text".to_string())),
                }
            }
            _ => Err(ScriptError::new(format!(
                "Cannot set cast member property {prop_name}"
            ))),
        }
    }
}
