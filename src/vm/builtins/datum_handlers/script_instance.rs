use crate::{
    director::lingo::datum::{datum_bool, Datum, ListKind},
    vm::{
        builtins::types::TypeUtils,
        datum_ref::DatumRef,
        script::{
            script_get_prop, script_get_prop_opt, script_set_prop, ScriptHandlerRef,
            ScriptInstanceId,
        },
        LingoVm, ScriptError,
    },
};

pub struct ScriptInstanceDatumHandlers {}

/// Director system events that are silently ignored when a behavior does
/// not implement them.
const IGNORABLE_EVENTS: &[&str] = &[
    "exitFrame",
    "enterFrame",
    "prepareFrame",
    "idle",
    "stepFrame",
    "mouseDown",
    "mouseUp",
    "mouseEnter",
    "mouseLeave",
    "mouseWithin",
    "keyDown",
    "keyUp",
    "beginSprite",
    "endSprite",
    "prepareMovie",
    "startMovie",
    "stopMovie",
    "activate",
    "deactivate",
];

/// Walks the ancestor chain looking for a Lingo-defined handler, bounded
/// by the configured traversal limit.
pub fn get_script_instance_handler(
    vm: &LingoVm,
    name: &str,
    instance_id: ScriptInstanceId,
) -> Option<ScriptHandlerRef> {
    let limit = vm.config.ancestor_limit;
    let mut current = Some(instance_id);
    let mut depth = 0;
    while let Some(id) = current {
        depth += 1;
        if depth > limit {
            return None;
        }
        let instance = vm.allocator.get_script_instance_opt(id)?;
        if let Some(script) = vm.movie.cast_manager.get_script_by_ref(&instance.script) {
            if let Some(handler_ref) = script.get_own_handler_ref(name) {
                return Some(handler_ref);
            }
        }
        current = instance.ancestor;
    }
    None
}

/// Director supports `customFunc(target, ...)` invocations where the first
/// argument is a script or script instance defining the handler.
pub fn get_handler_from_first_arg(
    vm: &LingoVm,
    args: &[DatumRef],
    handler_name: &str,
) -> Option<(Option<ScriptInstanceId>, ScriptHandlerRef)> {
    let first_arg = args.first()?;
    match vm.get_datum(first_arg) {
        Datum::ScriptRef(script_ref) => {
            let script = vm.movie.cast_manager.get_script_by_ref(script_ref)?;
            script
                .get_own_handler_ref(handler_name)
                .map(|handler_ref| (None, handler_ref))
        }
        Datum::ScriptInstance(instance_id) => {
            get_script_instance_handler(vm, handler_name, *instance_id)
                .map(|handler_ref| (Some(*instance_id), handler_ref))
        }
        _ => None,
    }
}

impl ScriptInstanceDatumHandlers {
    /// `OBJ_CALL` on a script instance: built-in property/meta methods
    /// first, then the Lingo-defined handler along the ancestor chain
    /// (invoked with the original receiver), then the property of that
    /// name, then `Void`.
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let instance_id = vm.get_datum(datum).to_script_instance_id()?;

        match handler_name {
            "setAt" | "setaProp" => return Self::set_a_prop(vm, instance_id, args),
            "setProp" => return Self::set_prop(vm, instance_id, args),
            "getAt" | "getaProp" => return Self::get_a_prop(vm, instance_id, args),
            "getProp" | "getPropRef" => return Self::get_sub_prop(vm, instance_id, args),
            "addProp" => return Self::set_a_prop(vm, instance_id, args),
            "deleteProp" => return Self::delete_prop(vm, instance_id, args),
            "count" => return Self::count(vm, instance_id, args),
            "ilk" => return Ok(vm.alloc_datum(Datum::Symbol("instance".to_string()))),
            "addAt" => return Self::add_at(vm, instance_id, args),
            "handler" => return Self::handler(vm, instance_id, args),
            "handlers" => return Self::handlers(vm, instance_id, args),
            _ => {}
        }

        if let Some(handler_ref) = get_script_instance_handler(vm, handler_name, instance_id) {
            let scope = vm.call_script_handler(Some(instance_id), handler_ref, args)?;
            vm.propagate_passed(&scope);
            return Ok(scope.return_value);
        }

        if IGNORABLE_EVENTS
            .iter()
            .any(|event| event.eq_ignore_ascii_case(handler_name))
        {
            return Ok(DatumRef::Void);
        }
        if handler_name == "getPropertyDescriptionList" {
            return Ok(vm.alloc_datum(Datum::PropList(vec![], false)));
        }

        // no handler anywhere in the chain: fall back to the property
        Ok(script_get_prop_opt(vm, instance_id, handler_name).unwrap_or(DatumRef::Void))
    }

    fn first_key(vm: &LingoVm, args: &[DatumRef]) -> Result<String, ScriptError> {
        vm.get_datum(args.first().ok_or_else(|| {
            ScriptError::new("Missing property name".to_string())
        })?)
        .string_value()
    }

    fn set_a_prop(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key = Self::first_key(vm, args)?;
        let value_ref = args
            .get(1)
            .ok_or_else(|| ScriptError::new("Missing value".to_string()))?;
        if key == "ancestor" {
            Self::assign_ancestor(vm, instance_id, value_ref)?;
        } else {
            script_set_prop(vm, instance_id, &key, value_ref, false)?;
        }
        Ok(DatumRef::Void)
    }

    /// Assigning to `ancestor` accepts an instance, a class-name list to
    /// instantiate and link, or `Void` (a no-op).
    fn assign_ancestor(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        value_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let value = vm.get_datum(value_ref).clone();
        match value {
            Datum::Void => Ok(()),
            Datum::ScriptInstance(ancestor_id) => {
                let instance = vm.allocator.get_script_instance_mut(instance_id);
                instance.ancestor = Some(ancestor_id);
                Ok(())
            }
            Datum::List(_, class_names, _) => {
                Self::link_ancestor_chain(vm, instance_id, &class_names)
            }
            other => Err(ScriptError::new(format!(
                "Cannot set ancestor to {}",
                other.type_str()
            ))),
        }
    }

    /// Instantiates each named class and links them head-first into the
    /// target's ancestor slot.
    fn link_ancestor_chain(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        class_names: &[DatumRef],
    ) -> Result<(), ScriptError> {
        let mut previous = instance_id;
        for class_ref in class_names {
            let class_name = vm.get_datum(class_ref).string_value()?;
            let script_ref = vm
                .movie
                .cast_manager
                .find_member_ref_by_name(&class_name)
                .ok_or_else(|| {
                    ScriptError::new(format!("Ancestor script not found: {class_name}"))
                })?;
            let instance_datum = super::script::new_script_instance(vm, &script_ref, &[])?;
            let ancestor_id = vm.get_datum(&instance_datum).to_script_instance_id()?;
            let instance = vm.allocator.get_script_instance_mut(previous);
            instance.ancestor = Some(ancestor_id);
            previous = ancestor_id;
        }
        Ok(())
    }

    /// `addAt(1, classList)` is the historical spelling for ancestor-chain
    /// construction; any other position is a plain property write.
    fn add_at(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing position for addAt".to_string())
            })?)
            .int_value()?;
        let value_ref = args
            .get(1)
            .ok_or_else(|| ScriptError::new("Missing value for addAt".to_string()))?;
        if position == 1 {
            let value = vm.get_datum(value_ref).clone();
            if let Datum::List(ListKind::List, class_names, _) = value {
                Self::link_ancestor_chain(vm, instance_id, &class_names)?;
                return Ok(DatumRef::Void);
            }
        }
        Err(ScriptError::new(
            "Cannot addAt on script instance".to_string(),
        ))
    }

    fn get_a_prop(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key = Self::first_key(vm, args)?;
        Ok(script_get_prop_opt(vm, instance_id, &key).unwrap_or(DatumRef::Void))
    }

    /// 2-arg form reads a property; 3-arg form indexes into a list-valued
    /// property.
    fn get_sub_prop(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key = Self::first_key(vm, args)?;
        let prop_ref = script_get_prop(vm, instance_id, &key)?;
        match args.get(1) {
            None => Ok(prop_ref),
            Some(index_ref) => TypeUtils::get_sub_prop(vm, &prop_ref, index_ref),
        }
    }

    fn set_prop(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        match args.len() {
            2 => Self::set_a_prop(vm, instance_id, args),
            3 => {
                let key = Self::first_key(vm, args)?;
                let index_ref = &args[1];
                let value_ref = &args[2];
                let prop_ref = script_get_prop(vm, instance_id, &key)?;
                TypeUtils::set_sub_prop(vm, &prop_ref, index_ref, value_ref)?;
                Ok(DatumRef::Void)
            }
            n => Err(ScriptError::new(format!(
                "Invalid number of arguments for setProp: {n}"
            ))),
        }
    }

    fn delete_prop(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key = Self::first_key(vm, args)?;
        let instance = vm.allocator.get_script_instance_mut(instance_id);
        let removed = instance.properties.remove(&key).is_some();
        Ok(vm.alloc_datum(datum_bool(removed)))
    }

    fn count(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key = Self::first_key(vm, args)?;
        let prop_ref = script_get_prop(vm, instance_id, &key)?;
        let count = match vm.get_datum(&prop_ref) {
            Datum::List(_, items, _) => items.len(),
            Datum::PropList(pairs, _) => pairs.len(),
            _ => {
                return Err(ScriptError::new(
                    "Cannot count non-list property".to_string(),
                ))
            }
        };
        Ok(vm.alloc_datum(Datum::Int(count as i32)))
    }

    fn handler(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let name = Self::first_key(vm, args)?;
        let found = get_script_instance_handler(vm, &name, instance_id).is_some();
        Ok(vm.alloc_datum(datum_bool(found)))
    }

    fn handlers(
        vm: &mut LingoVm,
        instance_id: ScriptInstanceId,
        _args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let handler_names = {
            let instance = vm.allocator.get_script_instance(instance_id);
            vm.movie
                .cast_manager
                .get_script_by_ref(&instance.script)
                .map(|script| script.handler_names.clone())
                .unwrap_or_default()
        };
        let name_refs = handler_names
            .iter()
            .map(|name| vm.alloc_datum(Datum::Symbol(name.clone())))
            .collect();
        Ok(vm.alloc_datum(Datum::List(ListKind::List, name_refs, false)))
    }
}

/// The Lingo `super`-call: resolves the *currently executing* script within
/// `me`'s chain, then dispatches the handler on the next ancestor with the
/// original receiver preserved — nested calls therefore advance one link
/// per call.
pub fn call_ancestor(
    vm: &mut LingoVm,
    handler_name: &str,
    me_ref: &DatumRef,
    args: &[DatumRef],
) -> Result<DatumRef, ScriptError> {
    let me_id = vm.get_datum(me_ref).to_script_instance_id()?;
    let current_script = vm.scopes[vm.current_scope_ref()].script_ref.clone();

    // locate the executing script inside the chain
    let limit = vm.config.ancestor_limit;
    let mut current = Some(me_id);
    let mut depth = 0;
    let mut start_from = None;
    while let Some(id) = current {
        depth += 1;
        if depth > limit {
            break;
        }
        let instance = match vm.allocator.get_script_instance_opt(id) {
            Some(instance) => instance,
            None => break,
        };
        if instance.script == current_script {
            start_from = instance.ancestor;
            break;
        }
        current = instance.ancestor;
    }

    let start_from = match start_from {
        Some(id) => id,
        None => return Ok(DatumRef::Void),
    };

    match get_script_instance_handler(vm, handler_name, start_from) {
        Some(handler_ref) => {
            let scope = vm.call_script_handler(Some(me_id), handler_ref, args)?;
            Ok(scope.return_value)
        }
        None => Ok(DatumRef::Void),
    }
}
