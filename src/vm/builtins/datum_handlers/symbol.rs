use crate::{
    director::lingo::datum::Datum,
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct SymbolDatumHandlers {}

impl SymbolDatumHandlers {
    pub fn get_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
    ) -> Result<DatumRef, ScriptError> {
        match prop_name {
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("symbol".to_string()))),
            "length" => {
                let name = vm.get_datum(datum).symbol_value()?;
                Ok(vm.alloc_datum(Datum::Int(name.chars().count() as i32)))
            }
            _ => Err(ScriptError::new(format!(
                "Invalid symbol property {prop_name}"
            ))),
        }
    }
}
