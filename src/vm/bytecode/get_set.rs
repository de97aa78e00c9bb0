use log::warn;

use crate::{
    director::lingo::{
        constants::{
            get_anim_prop_name, get_movie_prop_name, get_sprite_prop_name, MOVIE_PROP_NAMES,
        },
        datum::{Datum, DatumKind, StringChunkType},
    },
    vm::{
        builtins::datum_handlers::{
            get_obj_prop, list_handlers::ListDatumUtils, set_obj_prop,
            string_chunk::StringChunkUtils,
        },
        datum_ref::DatumRef,
        scope::ScopeRef,
        script::{
            get_current_variable_multiplier, get_name, script_get_prop, script_set_prop,
        },
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub struct GetSetBytecodeHandler {}
pub struct GetSetUtils {}

impl GetSetUtils {
    /// `the <name>` properties that depend on the execution context come
    /// first; everything else is a movie property.
    pub fn get_the_built_in_prop(
        vm: &mut LingoVm,
        scope_ref: ScopeRef,
        prop_name: &str,
    ) -> Result<DatumRef, ScriptError> {
        match prop_name {
            "paramCount" => {
                let count = vm.scopes[scope_ref].args.len() as i32;
                Ok(vm.alloc_datum(Datum::Int(count)))
            }
            "result" => Ok(vm.last_handler_result.clone()),
            _ => vm.get_movie_prop(prop_name),
        }
    }

    pub fn set_the_built_in_prop(
        vm: &mut LingoVm,
        prop_name: &str,
        value: Datum,
    ) -> Result<(), ScriptError> {
        vm.set_movie_prop(prop_name, value)
    }
}

impl GetSetBytecodeHandler {
    pub fn get_global(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let value_ref = vm.globals.get(&name).cloned().unwrap_or(DatumRef::Void);
        vm.scopes[ctx.scope_ref].stack.push(value_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_global(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in setglobal".to_string()))?;
        vm.globals.insert(name, value_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_local(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let local_index = (vm.current_bytecode(ctx).obj as u32
            / get_current_variable_multiplier(vm, ctx)) as usize;
        let name_id = *ctx
            .handler
            .local_name_ids
            .get(local_index)
            .ok_or_else(|| ScriptError::new(format!("Invalid local index {local_index}")))?;
        let var_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let value_ref = scope.locals.get(&var_name).cloned().unwrap_or(DatumRef::Void);
        scope.stack.push(value_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_local(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let local_index = (vm.current_bytecode(ctx).obj as u32
            / get_current_variable_multiplier(vm, ctx)) as usize;
        let name_id = *ctx
            .handler
            .local_name_ids
            .get(local_index)
            .ok_or_else(|| ScriptError::new(format!("Invalid local index {local_index}")))?;
        let var_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let value_ref = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in setlocal".to_string()))?;
        scope.locals.insert(var_name, value_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_param(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let param_index = (vm.current_bytecode(ctx).obj as u32
            / get_current_variable_multiplier(vm, ctx)) as usize;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let value_ref = scope.args.get(param_index).cloned().unwrap_or(DatumRef::Void);
        scope.stack.push(value_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_param(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let param_index = (vm.current_bytecode(ctx).obj as u32
            / get_current_variable_multiplier(vm, ctx)) as usize;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let value_ref = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in setparam".to_string()))?;
        if param_index < scope.args.len() {
            scope.args[param_index] = value_ref;
        } else {
            scope.args.resize(param_index, DatumRef::Void);
            scope.args.push(value_ref);
        }
        Ok(HandlerExecutionResult::Advance)
    }

    /// `GET_PROP` against the current receiver, or the script's own
    /// context when invoked statically.
    pub fn get_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let receiver = vm.scopes[ctx.scope_ref].receiver;
        let result = match receiver {
            Some(instance_id) => script_get_prop(vm, instance_id, &prop_name)?,
            None => DatumRef::Void,
        };
        vm.scopes[ctx.scope_ref].stack.push(result);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in setprop".to_string()))?;
        let receiver = vm.scopes[ctx.scope_ref].receiver;
        match receiver {
            Some(instance_id) => {
                script_set_prop(vm, instance_id, &prop_name, &value_ref, false)?;
            }
            None => {
                // a static script writing its own property becomes a global
                vm.globals.insert(prop_name, value_ref);
            }
        }
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_obj_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in getobjprop".to_string()))?;
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let result_ref = get_obj_prop(vm, &obj_ref, &prop_name)?;
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_obj_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (value_ref, obj_ref) = {
            let scope = &mut vm.scopes[ctx.scope_ref];
            let value = scope
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in setobjprop".to_string()))?;
            let obj = scope
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in setobjprop".to_string()))?;
            (value, obj)
        };
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        set_obj_prop(vm, &obj_ref, &prop_name, &value_ref)?;
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_movie_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let result_ref = vm.get_movie_prop(&prop_name)?;
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set_movie_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in setmovieprop".to_string()))?;
        let value = vm.get_datum(&value_ref).clone();
        vm.set_movie_prop(&prop_name, value)?;
        Ok(HandlerExecutionResult::Advance)
    }

    /// `THE_BUILTIN`: reads a movie property through the legacy encoding.
    /// The inline arg-list marker is consumed when present — some DCRs omit
    /// it, and a blind pop would eat a live operand.
    pub fn the_built_in(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let result_ref = GetSetUtils::get_the_built_in_prop(vm, ctx.scope_ref, &prop_name)?;

        let top_is_marker = match vm.scopes[ctx.scope_ref].stack.last() {
            Some(top_ref) => matches!(
                vm.allocator.get_datum(top_ref).kind(),
                DatumKind::ArgList | DatumKind::ArgListNoRet
            ),
            None => false,
        };
        let scope = &mut vm.scopes[ctx.scope_ref];
        if top_is_marker {
            scope.stack.pop();
        }
        scope.stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_field(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let cast_id_ref = if vm.movie.dir_version >= 500 {
            vm.scopes[ctx.scope_ref].stack.pop()
        } else {
            None
        };
        let field_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in getfield".to_string()))?;
        let field_name_or_num = vm.get_datum(&field_ref).clone();
        let cast_id = cast_id_ref.map(|r| vm.get_datum(&r).clone());

        let field_value = vm
            .movie
            .cast_manager
            .get_field_value_by_identifiers(&field_name_or_num, cast_id.as_ref())?;
        let result_ref = vm.alloc_datum(Datum::String(field_value));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    /// `GET(prop_type)`: pops the property id and resolves through the
    /// fixed tables; some rows pop further operands.
    pub fn get(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let prop_id_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in get".to_string()))?;
        let prop_id = vm.get_datum(&prop_id_ref).int_value()?;
        let prop_type = vm.current_bytecode(ctx).obj;
        let max_movie_prop_id = *MOVIE_PROP_NAMES.keys().max().unwrap();

        let result = if prop_type == 0 && prop_id <= max_movie_prop_id as i32 {
            let prop_name = get_movie_prop_name(prop_id as u16).unwrap();
            GetSetUtils::get_the_built_in_prop(vm, ctx.scope_ref, prop_name)
        } else if prop_type == 0 {
            // ids past the movie table read the last chunk of a string
            let string_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in get".to_string()))?;
            let string = vm.get_datum(&string_ref).string_value()?;
            let chunk_type = StringChunkType::from_prop_id(prop_id - 0x0b)
                .ok_or_else(|| ScriptError::new(format!("Invalid chunk prop id {prop_id}")))?;
            let last_chunk = StringChunkUtils::resolve_last_chunk(
                &string,
                chunk_type,
                vm.movie.item_delimiter,
            )?;
            Ok(vm.alloc_datum(Datum::String(last_chunk)))
        } else if prop_type == 0x01 {
            // chunk counts
            let string_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in get".to_string()))?;
            let string = vm.get_datum(&string_ref).string_value()?;
            let chunk_type = StringChunkType::from_prop_id(prop_id)
                .ok_or_else(|| ScriptError::new(format!("Invalid chunk prop id {prop_id}")))?;
            let chunks = StringChunkUtils::resolve_chunk_list(
                &string,
                chunk_type,
                vm.movie.item_delimiter,
            )?;
            Ok(vm.alloc_datum(Datum::Int(chunks.len() as i32)))
        } else if prop_type == 0x06 {
            // sprite prop
            let prop_name = get_sprite_prop_name(prop_id as u16).ok_or_else(|| {
                ScriptError::new(format!("Unknown sprite prop id {prop_id}"))
            })?;
            let sprite_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in get".to_string()))?;
            let sprite_num = vm.get_datum(&sprite_ref).int_value()?;
            let datum = match vm.providers.sprite.as_mut() {
                Some(provider) => provider
                    .get_sprite_prop(sprite_num as i16, prop_name)
                    .unwrap_or(Datum::Void),
                None => Datum::Void,
            };
            Ok(vm.alloc_datum(datum))
        } else if prop_type == 0x07 {
            let datum = vm.get_anim_prop(prop_id as u16)?;
            Ok(vm.alloc_datum(datum))
        } else if prop_type == 0x08 {
            let datum = if prop_id == 0x02 && vm.movie.dir_version >= 500 {
                // the number of castMembers takes a castLib selector from D5
                let cast_lib_ref = vm.scopes[ctx.scope_ref]
                    .stack
                    .pop()
                    .ok_or_else(|| ScriptError::new("Stack underflow in get".to_string()))?;
                let cast_lib_id = vm.get_datum(&cast_lib_ref).clone();
                let bypass = cast_lib_id.is_int() && cast_lib_id.int_value()? == 0;
                if bypass {
                    vm.get_anim2_prop(prop_id as u16)?
                } else {
                    let cast = if cast_lib_id.is_string() {
                        vm.movie
                            .cast_manager
                            .get_cast_by_name(&cast_lib_id.string_value()?)
                    } else {
                        vm.movie
                            .cast_manager
                            .get_cast_or_null(cast_lib_id.int_value()? as u32)
                    };
                    match cast {
                        Some(cast) => Datum::Int(cast.max_member_id() as i32),
                        None => return Err(ScriptError::new("Cast not found".to_string())),
                    }
                }
            } else {
                vm.get_anim2_prop(prop_id as u16)?
            };
            Ok(vm.alloc_datum(datum))
        } else {
            Err(ScriptError::new(format!(
                "GET not implemented for propertyID={prop_id} propertyType={prop_type}"
            )))
        }?;

        vm.scopes[ctx.scope_ref].stack.push(result);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn set(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (prop_id, value) = {
            let prop_id_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in set".to_string()))?;
            let prop_id = vm.get_datum(&prop_id_ref).int_value()?;
            let value_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in set".to_string()))?;
            (prop_id, vm.get_datum(&value_ref).clone())
        };

        let prop_type = vm.current_bytecode(ctx).obj;
        match prop_type {
            0x00 => {
                if prop_id <= 0x0b {
                    let prop_name = get_movie_prop_name(prop_id as u16).unwrap();
                    GetSetUtils::set_the_built_in_prop(vm, prop_name, value)?;
                    Ok(HandlerExecutionResult::Advance)
                } else {
                    Err(ScriptError::new(format!(
                        "Invalid propertyID for SET: {prop_id}"
                    )))
                }
            }
            0x06 => {
                let prop_name = get_sprite_prop_name(prop_id as u16).ok_or_else(|| {
                    ScriptError::new(format!("Unknown sprite prop id {prop_id}"))
                })?;
                let sprite_ref = vm.scopes[ctx.scope_ref]
                    .stack
                    .pop()
                    .ok_or_else(|| ScriptError::new("Stack underflow in set".to_string()))?;
                let sprite_num = vm.get_datum(&sprite_ref).int_value()?;
                if let Some(provider) = vm.providers.sprite.as_mut() {
                    provider.set_sprite_prop(sprite_num as i16, prop_name, value);
                }
                Ok(HandlerExecutionResult::Advance)
            }
            0x07 => {
                let prop_name = get_anim_prop_name(prop_id as u16).ok_or_else(|| {
                    ScriptError::new(format!("Unknown anim prop id {prop_id}"))
                })?;
                vm.set_movie_prop(prop_name, value)?;
                Ok(HandlerExecutionResult::Advance)
            }
            _ => Err(ScriptError::new(format!(
                "Invalid propertyType for SET: {prop_type}"
            ))),
        }
    }

    /// Dot-syntax chained access: `obj.prop` where obj may be any datum.
    pub fn get_chained_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .unwrap_or(DatumRef::Void);
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;

        let obj_kind = vm.get_datum(&obj_ref).kind();
        let result_ref = match obj_kind {
            DatumKind::List => {
                if let Ok(index) = prop_name.parse::<i32>() {
                    let items = vm.get_datum(&obj_ref).to_list()?;
                    let zero_based = (index - 1) as usize;
                    items.get(zero_based).cloned().ok_or_else(|| {
                        ScriptError::new(format!("List index {index} out of bounds"))
                    })?
                } else {
                    let items = vm.get_datum(&obj_ref).to_list()?.clone();
                    let result = ListDatumUtils::get_prop(vm, &items, &prop_name)?;
                    vm.alloc_datum(result)
                }
            }
            _ => get_obj_prop(vm, &obj_ref, &prop_name)?,
        };
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn get_top_level_prop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let prop_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        // _movie and _player forward to the movie property surface
        warn!("top-level object {prop_name} resolves to the movie surface");
        let result = vm.get_movie_prop(&prop_name).unwrap_or(DatumRef::Void);
        vm.scopes[ctx.scope_ref].stack.push(result);
        Ok(HandlerExecutionResult::Advance)
    }
}
