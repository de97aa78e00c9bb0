pub mod cast_lib;
pub mod cast_member_ref;
pub mod image;
pub mod int;
pub mod list_handlers;
pub mod point;
pub mod prop_list;
pub mod rect;
pub mod script;
pub mod script_instance;
pub mod string;
pub mod string_chunk;
pub mod symbol;
pub mod timeout;

use crate::{
    director::lingo::datum::{Datum, DatumKind},
    vm::{
        builtins::types::TypeUtils, datum_formatting::format_datum, datum_ref::DatumRef,
        script::script_get_prop, LingoVm, ScriptError, ScriptErrorCode,
    },
};

use self::{
    cast_lib::CastLibDatumHandlers, cast_member_ref::CastMemberRefHandlers,
    image::ImageDatumHandlers, int::IntDatumHandlers, list_handlers::ListDatumHandlers,
    point::PointDatumHandlers, prop_list::{PropListDatumHandlers, PropListUtils},
    rect::RectDatumHandlers, script::ScriptDatumHandlers,
    script_instance::ScriptInstanceDatumHandlers, string::StringDatumHandlers,
    string_chunk::StringChunkHandlers, symbol::SymbolDatumHandlers,
    timeout::TimeoutDatumHandlers,
};

/// `OBJ_CALL` method dispatch: route by the target's variant.
pub fn call_datum_handler(
    vm: &mut LingoVm,
    obj_ref: &DatumRef,
    handler_name: &str,
    args: &[DatumRef],
) -> Result<DatumRef, ScriptError> {
    let kind = vm.get_datum(obj_ref).kind();
    match kind {
        DatumKind::List | DatumKind::ArgList | DatumKind::ArgListNoRet => {
            ListDatumHandlers::call(vm, obj_ref, handler_name, args)
        }
        DatumKind::PropList => PropListDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::String => StringDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::StringChunk => StringChunkHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::Point => PointDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::Rect => RectDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::Image => ImageDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::ScriptRef => ScriptDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::ScriptInstance => {
            ScriptInstanceDatumHandlers::call(vm, obj_ref, handler_name, args)
        }
        DatumKind::TimeoutRef => TimeoutDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::CastMemberRef => CastMemberRefHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::CastLibRef => CastLibDatumHandlers::call(vm, obj_ref, handler_name, args),
        DatumKind::XtraInstance => {
            let (xtra_name, instance_id) = {
                let (name, id) = vm.get_datum(obj_ref).to_xtra_instance()?;
                (name.clone(), id)
            };
            let concrete_args = args
                .iter()
                .map(|arg| vm.get_datum(arg).clone())
                .collect::<Vec<_>>();
            match vm.providers.xtra.as_mut() {
                Some(provider) => {
                    let result = provider
                        .call_instance_handler(&xtra_name, instance_id, handler_name, &concrete_args)
                        .unwrap_or(Datum::Void);
                    Ok(vm.alloc_datum(result))
                }
                None => Ok(DatumRef::Void),
            }
        }
        _ => {
            let formatted = format_datum(obj_ref, vm);
            Err(ScriptError::new_code(
                ScriptErrorCode::HandlerNotFound,
                format!("No handler {handler_name} for datum {formatted}"),
            ))
        }
    }
}

/// `GET_OBJ_PROP` dispatch.
pub fn get_obj_prop(
    vm: &mut LingoVm,
    obj_ref: &DatumRef,
    prop_name: &str,
) -> Result<DatumRef, ScriptError> {
    let obj = vm.get_datum(obj_ref).clone();
    match obj {
        Datum::CastLib(cast_lib) => {
            let datum = vm.movie.cast_manager.get_cast(cast_lib)?.get_prop(prop_name)?;
            Ok(vm.alloc_datum(datum))
        }
        Datum::CastMember(member_ref) => {
            let result = CastMemberRefHandlers::get_prop(vm, &member_ref, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::ScriptInstance(instance_id) => script_get_prop(vm, instance_id, prop_name),
        Datum::PropList(pairs, ..) => PropListUtils::get_prop_or_built_in(vm, &pairs, prop_name),
        Datum::List(_, items, _) => {
            let result = list_handlers::ListDatumUtils::get_prop(vm, &items, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::Rect(..) => {
            let result = RectDatumHandlers::get_prop(vm, obj_ref, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::Point(..) => {
            let result = PointDatumHandlers::get_prop(vm, obj_ref, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::SpriteRef(sprite_num) => {
            let datum = match vm.providers.sprite.as_mut() {
                Some(provider) => provider
                    .get_sprite_prop(sprite_num, prop_name)
                    .unwrap_or(Datum::Void),
                None => Datum::Void,
            };
            Ok(vm.alloc_datum(datum))
        }
        Datum::Image(..) => ImageDatumHandlers::get_prop(vm, obj_ref, prop_name),
        Datum::String(s) => {
            let result = string::StringDatumUtils::get_built_in_prop(&s, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::StringChunk(..) => {
            let value = vm.get_datum(obj_ref).string_value()?;
            let result = string::StringDatumUtils::get_built_in_prop(&value, prop_name)?;
            Ok(vm.alloc_datum(result))
        }
        Datum::TimeoutRef(name) => TimeoutDatumHandlers::get_prop(vm, &name, prop_name),
        Datum::Symbol(..) => SymbolDatumHandlers::get_prop(vm, obj_ref, prop_name),
        Datum::Void => {
            if prop_name == "ilk" {
                Ok(vm.alloc_datum(Datum::Symbol("void".to_string())))
            } else {
                Ok(DatumRef::Void)
            }
        }
        Datum::Int(..) => IntDatumHandlers::get_prop(vm, obj_ref, prop_name),
        _ => {
            if prop_name == "ilk" {
                let obj = vm.get_datum(obj_ref);
                let ilk = TypeUtils::get_datum_ilk(obj)?;
                Ok(vm.alloc_datum(Datum::Symbol(ilk.to_string())))
            } else {
                Err(ScriptError::new(format!(
                    "get_obj_prop(\"{prop_name}\") was passed an invalid datum: {}",
                    format_datum(obj_ref, vm)
                )))
            }
        }
    }
}

/// `SET_OBJ_PROP` dispatch.
pub fn set_obj_prop(
    vm: &mut LingoVm,
    obj_ref: &DatumRef,
    prop_name: &str,
    value_ref: &DatumRef,
) -> Result<(), ScriptError> {
    let obj = vm.get_datum(obj_ref).clone();
    match obj {
        Datum::CastLib(cast_lib) => {
            let value = vm.get_datum(value_ref).clone();
            let cast = vm
                .movie
                .cast_manager
                .get_cast_mut(cast_lib)
                .ok_or_else(|| ScriptError::new(format!("Cast not found: {cast_lib}")))?;
            cast.set_prop(prop_name, value)?;
            if prop_name == "fileName" {
                vm.preload_casts(crate::vm::cast_manager::CastPreloadReason::MemberAccess);
            }
            Ok(())
        }
        Datum::ScriptInstance(instance_id) => {
            crate::vm::script::script_set_prop(vm, instance_id, prop_name, value_ref, false)
        }
        Datum::SpriteRef(sprite_num) => {
            let value = vm.get_datum(value_ref).clone();
            if let Some(provider) = vm.providers.sprite.as_mut() {
                provider.set_sprite_prop(sprite_num, prop_name, value);
            }
            Ok(())
        }
        Datum::CastMember(member_ref) => {
            let value = vm.get_datum(value_ref).clone();
            CastMemberRefHandlers::set_prop(vm, &member_ref, prop_name, value)
        }
        Datum::PropList(..) => {
            let key_ref = vm.alloc_datum(Datum::String(prop_name.to_string()));
            PropListUtils::set_prop(vm, obj_ref, &key_ref, value_ref, true)
        }
        Datum::Point(..) => PointDatumHandlers::set_prop(vm, obj_ref, prop_name, value_ref),
        Datum::Rect(..) => RectDatumHandlers::set_prop(vm, obj_ref, prop_name, value_ref),
        Datum::Image(..) => ImageDatumHandlers::set_prop(vm, obj_ref, prop_name, value_ref),
        Datum::TimeoutRef(name) => {
            let value = vm.get_datum(value_ref).clone();
            if let Some(provider) = vm.providers.timeout.as_mut() {
                provider.set_timeout_prop(&name, prop_name, value);
            }
            Ok(())
        }
        _ => Err(ScriptError::new(format!(
            "set_obj_prop was passed an invalid datum: {}",
            format_datum(obj_ref, vm)
        ))),
    }
}
