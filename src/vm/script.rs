use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;

use crate::director::{
    chunks::handler::HandlerDef, chunks::script::ScriptChunk, enums::ScriptType,
    file::get_variable_multiplier, lingo::datum::Datum, lingo::script::ScriptContext,
};

use super::{
    bytecode::handler_manager::BytecodeHandlerContext, cast_lib::CastMemberRef,
    datum_ref::DatumRef, LingoVm, ScriptError,
};

pub type ScriptInstanceId = usize;
pub type ScriptHandlerRef = (CastMemberRef, String);

/// A compiled script bound to its cast member. Handler lookup is
/// case-insensitive; `handlers` is keyed by lowercased name.
pub struct Script {
    pub member_ref: CastMemberRef,
    pub name: String,
    pub chunk: ScriptChunk,
    pub script_type: ScriptType,
    pub handlers: HashMap<String, Rc<HandlerDef>>,
    pub handler_names: Vec<String>,
}

impl Script {
    pub fn get_own_handler(&self, name: &str) -> Option<&Rc<HandlerDef>> {
        self.handlers.get(&name.to_lowercase())
    }

    pub fn get_own_handler_ref(&self, name: &str) -> Option<ScriptHandlerRef> {
        self.get_own_handler(name)
            .map(|_| (self.member_ref.clone(), name.to_owned()))
    }

    pub fn get_own_handler_ref_at(&self, index: usize) -> Option<ScriptHandlerRef> {
        self.handler_names
            .get(index)
            .map(|name| (self.member_ref.clone(), name.clone()))
    }
}

/// A heap object created from a script. The defining script reference is
/// always populated at construction; method dispatch never needs a
/// secondary id-based lookup.
pub struct ScriptInstance {
    pub instance_id: ScriptInstanceId,
    pub script: CastMemberRef,
    pub ancestor: Option<ScriptInstanceId>,
    pub properties: HashMap<String, DatumRef>,
}

impl ScriptInstance {
    pub fn new(
        instance_id: ScriptInstanceId,
        script_ref: CastMemberRef,
        script_def: &Script,
        lctx: &ScriptContext,
    ) -> ScriptInstance {
        let mut properties = HashMap::new();
        for name_id in script_def.chunk.property_name_ids.iter() {
            if let Some(name) = lctx.resolve_name(*name_id) {
                properties.insert(name.clone(), DatumRef::Void);
            }
        }
        ScriptInstance {
            instance_id,
            script: script_ref,
            ancestor: None,
            properties,
        }
    }
}

/// Reads a property off an instance, walking the ancestor chain with the
/// configured depth bound.
pub fn script_get_prop_opt(
    vm: &mut LingoVm,
    instance_id: ScriptInstanceId,
    prop_name: &str,
) -> Option<DatumRef> {
    let limit = vm.config.ancestor_limit;
    let mut current = Some(instance_id);
    let mut depth = 0;
    while let Some(id) = current {
        depth += 1;
        if depth > limit {
            return Some(DatumRef::Void);
        }
        let (ancestor, value) = {
            let instance = vm.allocator.get_script_instance_opt(id)?;
            (instance.ancestor, instance.properties.get(prop_name).cloned())
        };
        if prop_name == "ancestor" {
            return Some(match ancestor {
                Some(ancestor_id) => vm.alloc_datum(Datum::ScriptInstance(ancestor_id)),
                None => DatumRef::Void,
            });
        }
        if let Some(value) = value {
            return Some(value);
        }
        current = ancestor;
    }
    None
}

pub fn script_get_prop(
    vm: &mut LingoVm,
    instance_id: ScriptInstanceId,
    prop_name: &str,
) -> Result<DatumRef, ScriptError> {
    if let Some(prop) = script_get_prop_opt(vm, instance_id, prop_name) {
        Ok(prop)
    } else {
        let instance = vm.allocator.get_script_instance(instance_id);
        let valid_props = instance.properties.keys().collect_vec();
        Err(ScriptError::new(format!(
            "No property {} on script instance {}. Valid properties are: {}",
            prop_name,
            instance_id,
            valid_props.iter().join(", ")
        )))
    }
}

/// Writes a property: the owning instance wins, then the nearest ancestor
/// that declares it; otherwise (unless `required`) the property is created
/// on the instance itself.
pub fn script_set_prop(
    vm: &mut LingoVm,
    instance_id: ScriptInstanceId,
    prop_name: &str,
    value_ref: &DatumRef,
    required: bool,
) -> Result<(), ScriptError> {
    if prop_name == "ancestor" {
        let ancestor_id = vm.get_datum(value_ref).to_script_instance_id()?;
        let instance = vm.allocator.get_script_instance_mut(instance_id);
        instance.ancestor = Some(ancestor_id);
        return Ok(());
    }

    let limit = vm.config.ancestor_limit;
    let mut current = Some(instance_id);
    let mut depth = 0;
    while let Some(id) = current {
        depth += 1;
        if depth > limit {
            break;
        }
        let instance = vm.allocator.get_script_instance_mut(id);
        if let Some(slot) = instance.properties.get_mut(prop_name) {
            *slot = value_ref.clone();
            return Ok(());
        }
        current = instance.ancestor;
    }

    if required {
        Err(ScriptError::new(format!(
            "No property {prop_name} on script instance {instance_id}"
        )))
    } else {
        let instance = vm.allocator.get_script_instance_mut(instance_id);
        instance
            .properties
            .insert(prop_name.to_owned(), value_ref.clone());
        Ok(())
    }
}

pub fn get_lctx_for_script<'a>(vm: &'a LingoVm, script: &Script) -> Option<&'a ScriptContext> {
    vm.movie
        .cast_manager
        .get_cast_or_null(script.member_ref.cast_lib as u32)
        .and_then(|cast| cast.lctx.as_ref())
}

/// Resolves an opcode's name-id operand through the current script's name
/// table.
pub fn get_name<'a>(
    vm: &'a LingoVm,
    ctx: &BytecodeHandlerContext,
    name_id: u16,
) -> Option<&'a String> {
    let lctx = get_lctx_for_script(vm, &ctx.script)?;
    lctx.resolve_name(name_id)
}

pub fn get_current_variable_multiplier(vm: &LingoVm, ctx: &BytecodeHandlerContext) -> u32 {
    let cast = vm
        .movie
        .cast_manager
        .get_cast_or_null(ctx.script.member_ref.cast_lib as u32);
    match cast {
        Some(cast) => get_variable_multiplier(cast.capital_x, cast.dir_version),
        None => 1,
    }
}
