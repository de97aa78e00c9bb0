use crate::director::lingo::datum::Datum;
use crate::vm::bytecode::string::PutType;
use crate::vm::cast_member::CastMemberType;

use super::{
    bytecode::handler_manager::BytecodeHandlerContext,
    datum_ref::DatumRef,
    scope::ScopeRef,
    script::{get_current_variable_multiplier, get_name, script_get_prop, script_set_prop},
    LingoVm, ScriptError,
};

/// Context-variable kinds referenced by `PUT`/`PUT_CHUNK`/`DELETE_CHUNK`
/// and `PUSH_CHUNK_VAR_REF`: the low nibble of the operand.
/// 1/2 = global, 3 = property, 4 = parameter, 5 = local, 6 = field.
pub fn read_context_var_args(
    vm: &mut LingoVm,
    var_type: u32,
    scope_ref: ScopeRef,
) -> (DatumRef, Option<DatumRef>) {
    let scope = &mut vm.scopes[scope_ref];
    let cast_id = if var_type == 0x6 && vm.movie.dir_version >= 500 {
        scope.stack.pop()
    } else {
        None
    };
    let id = scope.stack.pop().unwrap_or(DatumRef::Void);
    (id, cast_id)
}

pub fn get_context_var(
    vm: &mut LingoVm,
    id_ref: &DatumRef,
    cast_id_ref: Option<&DatumRef>,
    var_type: u32,
    ctx: &BytecodeHandlerContext,
) -> Result<DatumRef, ScriptError> {
    let variable_multiplier = get_current_variable_multiplier(vm, ctx);

    match var_type {
        0x1 | 0x2 => {
            let name_id = vm.get_datum(id_ref).int_value()? as u16;
            let name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            Ok(vm.globals.get(&name).cloned().unwrap_or(DatumRef::Void))
        }
        0x3 => {
            let name_id = vm.get_datum(id_ref).int_value()? as u16;
            let name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            let receiver = vm.scopes[ctx.scope_ref].receiver;
            match receiver {
                Some(instance_id) => script_get_prop(vm, instance_id, &name),
                None => Ok(DatumRef::Void),
            }
        }
        0x4 => {
            let arg_index =
                (vm.get_datum(id_ref).int_value()? / variable_multiplier as i32) as usize;
            let scope = &vm.scopes[ctx.scope_ref];
            Ok(scope.args.get(arg_index).cloned().unwrap_or(DatumRef::Void))
        }
        0x5 => {
            let local_index =
                (vm.get_datum(id_ref).int_value()? / variable_multiplier as i32) as usize;
            let name_id = *ctx
                .handler
                .local_name_ids
                .get(local_index)
                .ok_or_else(|| ScriptError::new(format!("Invalid local index {local_index}")))?;
            let local_name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            let scope = &vm.scopes[ctx.scope_ref];
            Ok(scope.locals.get(&local_name).cloned().unwrap_or(DatumRef::Void))
        }
        0x6 => {
            let id_datum = vm.get_datum(id_ref).clone();
            let cast_id_datum = cast_id_ref.map(|r| vm.get_datum(r).clone());
            let text = vm
                .movie
                .cast_manager
                .get_field_value_by_identifiers(&id_datum, cast_id_datum.as_ref())?;
            Ok(vm.alloc_datum(Datum::String(text)))
        }
        _ => Err(ScriptError::new(format!(
            "Invalid context var type: {var_type}"
        ))),
    }
}

pub fn set_context_var(
    vm: &mut LingoVm,
    id_ref: &DatumRef,
    cast_id_ref: Option<&DatumRef>,
    var_type: u32,
    value_ref: &DatumRef,
    put_type: PutType,
    ctx: &BytecodeHandlerContext,
) -> Result<(), ScriptError> {
    let variable_multiplier = get_current_variable_multiplier(vm, ctx);

    match var_type {
        0x1 | 0x2 => {
            let name_id = vm.get_datum(id_ref).int_value()? as u16;
            let name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            vm.globals.insert(name, value_ref.clone());
            Ok(())
        }
        0x3 => {
            let name_id = vm.get_datum(id_ref).int_value()? as u16;
            let name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            let receiver = vm.scopes[ctx.scope_ref].receiver;
            match receiver {
                Some(instance_id) => script_set_prop(vm, instance_id, &name, value_ref, false),
                None => Ok(()),
            }
        }
        0x4 => {
            let arg_index =
                (vm.get_datum(id_ref).int_value()? / variable_multiplier as i32) as usize;
            let scope = &mut vm.scopes[ctx.scope_ref];
            if arg_index < scope.args.len() {
                scope.args[arg_index] = value_ref.clone();
            }
            Ok(())
        }
        0x5 => {
            let local_index =
                (vm.get_datum(id_ref).int_value()? / variable_multiplier as i32) as usize;
            let name_id = *ctx
                .handler
                .local_name_ids
                .get(local_index)
                .ok_or_else(|| ScriptError::new(format!("Invalid local index {local_index}")))?;
            let local_name = get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
            vm.scopes[ctx.scope_ref]
                .locals
                .insert(local_name, value_ref.clone());
            Ok(())
        }
        0x6 => {
            let new_value = vm.get_datum(value_ref).string_value()?;
            let id_datum = vm.get_datum(id_ref).clone();
            let cast_id_datum = cast_id_ref.map(|r| vm.get_datum(r).clone());

            let member_ref = vm
                .movie
                .cast_manager
                .find_member_ref_by_identifiers(&id_datum, cast_id_datum.as_ref())?
                .ok_or_else(|| ScriptError::new("Field member not found".to_string()))?;

            let member = vm
                .movie
                .cast_manager
                .find_mut_member_by_ref(&member_ref)
                .ok_or_else(|| ScriptError::new("Field member not found".to_string()))?;
            match &mut member.member_type {
                CastMemberType::Field(field) => {
                    apply_put(&mut field.text, new_value, put_type);
                    Ok(())
                }
                CastMemberType::Text(text) => {
                    apply_put(&mut text.text, new_value, put_type);
                    Ok(())
                }
                _ => Err(ScriptError::new(
                    "Cast member exists but is not a field".to_string(),
                )),
            }
        }
        _ => Err(ScriptError::new(format!(
            "Invalid context var type: {var_type}"
        ))),
    }
}

fn apply_put(target: &mut String, value: String, put_type: PutType) {
    match put_type {
        PutType::Into => *target = value,
        PutType::Before => {
            let mut combined = value;
            combined.push_str(target);
            *target = combined;
        }
        PutType::After => target.push_str(&value),
    }
}
