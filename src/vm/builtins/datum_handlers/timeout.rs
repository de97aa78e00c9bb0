use crate::{
    director::lingo::datum::Datum,
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct TimeoutDatumHandlers {}

impl TimeoutDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let name = match vm.get_datum(datum) {
            Datum::TimeoutRef(name) => name.clone(),
            other => {
                return Err(ScriptError::new(format!(
                    "Expected timeout, got {}",
                    other.type_str()
                )))
            }
        };
        match handler_name {
            "new" => Self::new_timeout(vm, &name, args),
            "forget" => {
                if let Some(provider) = vm.providers.timeout.as_mut() {
                    provider.forget_timeout(&name);
                }
                Ok(DatumRef::Void)
            }
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for timeout datum"
            ))),
        }
    }

    /// `timeout("name").new(period, #handler, target)`
    fn new_timeout(
        vm: &mut LingoVm,
        name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let period = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing period for timeout new".to_string())
            })?)
            .int_value()?;
        let handler = args
            .get(1)
            .map(|r| vm.get_datum(r).clone())
            .unwrap_or(Datum::Void);
        let target = args
            .get(2)
            .map(|r| vm.get_datum(r).clone())
            .unwrap_or(Datum::Void);
        if let Some(provider) = vm.providers.timeout.as_mut() {
            provider.create_timeout(name, period, handler, target);
        }
        Ok(vm.alloc_datum(Datum::TimeoutRef(name.to_string())))
    }

    pub fn get_prop(
        vm: &mut LingoVm,
        name: &str,
        prop_name: &str,
    ) -> Result<DatumRef, ScriptError> {
        match prop_name {
            "name" => Ok(vm.alloc_datum(Datum::String(name.to_string()))),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("timeout".to_string()))),
            _ => {
                let datum = match vm.providers.timeout.as_mut() {
                    Some(provider) => provider
                        .get_timeout_prop(name, prop_name)
                        .unwrap_or(Datum::Void),
                    None => Datum::Void,
                };
                Ok(vm.alloc_datum(datum))
            }
        }
    }
}
