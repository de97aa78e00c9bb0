use crate::{
    director::lingo::datum::Datum,
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct IntDatumHandlers {}

impl IntDatumHandlers {
    pub fn get_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
    ) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).int_value()?;
        match prop_name {
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("integer".to_string()))),
            "integer" => Ok(vm.alloc_datum(Datum::Int(value))),
            "float" => Ok(vm.alloc_datum(Datum::Float(value as f64))),
            "string" => Ok(vm.alloc_datum(Datum::String(value.to_string()))),
            "abs" => Ok(vm.alloc_datum(Datum::Int(value.abs()))),
            _ => Err(ScriptError::new(format!(
                "Invalid integer property {prop_name}"
            ))),
        }
    }
}
