use crate::{
    director::lingo::datum::Datum,
    vm::{
        cast_lib::CastMemberRef,
        datum_ref::DatumRef,
        script::ScriptInstance,
        LingoVm, ScriptError,
    },
};

pub struct ScriptDatumHandlers {}

/// Builds a `ScriptInstance` from a script reference: declared properties
/// initialised to `Void`, the defining script recorded, then the script's
/// `new` handler (when present) invoked with `me` bound to the fresh
/// instance.
pub fn new_script_instance(
    vm: &mut LingoVm,
    script_member_ref: &CastMemberRef,
    args: &[DatumRef],
) -> Result<DatumRef, ScriptError> {
    let (instance, handler_ref) = {
        let script = vm
            .movie
            .cast_manager
            .get_script_by_ref(script_member_ref)
            .ok_or_else(|| {
                ScriptError::new(format!(
                    "Script not found: {}:{}",
                    script_member_ref.cast_lib, script_member_ref.cast_member
                ))
            })?;
        let lctx = vm
            .movie
            .cast_manager
            .get_cast_or_null(script_member_ref.cast_lib as u32)
            .and_then(|cast| cast.lctx.as_ref())
            .ok_or_else(|| ScriptError::new("Script has no name context".to_string()))?;
        let instance = ScriptInstance::new(0, script_member_ref.clone(), script, lctx);
        (instance, script.get_own_handler_ref("new"))
    };

    let instance_id = vm.allocator.alloc_script_instance(instance)?;
    vm.allocator.get_script_instance_mut(instance_id).instance_id = instance_id;

    if let Some(handler_ref) = handler_ref {
        let scope = vm.call_script_handler(Some(instance_id), handler_ref, args)?;
        if scope.return_value.is_void_ref() {
            Ok(vm.alloc_datum(Datum::ScriptInstance(instance_id)))
        } else {
            Ok(scope.return_value)
        }
    } else {
        Ok(vm.alloc_datum(Datum::ScriptInstance(instance_id)))
    }
}

impl ScriptDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let script_member_ref = match vm.get_datum(datum) {
            Datum::ScriptRef(member_ref) => member_ref.clone(),
            other => {
                return Err(ScriptError::new(format!(
                    "Expected script, got {}",
                    other.type_str()
                )))
            }
        };

        if handler_name.eq_ignore_ascii_case("new") {
            return new_script_instance(vm, &script_member_ref, args);
        }

        // static handler invocation on the script itself
        let handler_ref = {
            let script = vm
                .movie
                .cast_manager
                .get_script_by_ref(&script_member_ref)
                .ok_or_else(|| ScriptError::new("Script not found".to_string()))?;
            script.get_own_handler_ref(handler_name)
        };
        match handler_ref {
            Some(handler_ref) => {
                let scope = vm.call_script_handler(None, handler_ref, args)?;
                vm.propagate_passed(&scope);
                Ok(scope.return_value)
            }
            None => Err(ScriptError::new(format!(
                "No handler {handler_name} for script datum"
            ))),
        }
    }
}
