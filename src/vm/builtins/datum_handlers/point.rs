use crate::{
    director::lingo::datum::Datum,
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct PointDatumHandlers {}

impl PointDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        match handler_name {
            "getAt" => Self::get_at(vm, datum, args),
            "setAt" => Self::set_at(vm, datum, args),
            "duplicate" => Ok(vm.duplicate_datum(datum)),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("point".to_string()))),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for point datum"
            ))),
        }
    }

    pub fn get_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
    ) -> Result<Datum, ScriptError> {
        let (x, y) = vm.get_datum(datum).to_point()?;
        match prop_name {
            "locH" => Ok(Datum::Int(x)),
            "locV" => Ok(Datum::Int(y)),
            "ilk" => Ok(Datum::Symbol("point".to_string())),
            _ => Err(ScriptError::new(format!(
                "Invalid point property {prop_name}"
            ))),
        }
    }

    pub fn set_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
        value_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let value = vm.get_datum(value_ref).int_value()?;
        let point = vm.get_datum_mut(datum).to_point_mut()?;
        match prop_name {
            "locH" => {
                point.0 = value;
                Ok(())
            }
            "locV" => {
                point.1 = value;
                Ok(())
            }
            _ => Err(ScriptError::new(format!(
                "Invalid point property {prop_name}"
            ))),
        }
    }

    fn get_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let index = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for getAt".to_string())
            })?)
            .int_value()?;
        let (x, y) = vm.get_datum(datum).to_point()?;
        let value = match index {
            1 => x,
            2 => y,
            _ => {
                return Err(ScriptError::new(format!(
                    "Point index {index} out of bounds"
                )))
            }
        };
        Ok(vm.alloc_datum(Datum::Int(value)))
    }

    fn set_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let index = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for setAt".to_string())
            })?)
            .int_value()?;
        let value = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing argument for setAt".to_string())
            })?)
            .int_value()?;
        let point = vm.get_datum_mut(datum).to_point_mut()?;
        match index {
            1 => point.0 = value,
            2 => point.1 = value,
            _ => {
                return Err(ScriptError::new(format!(
                    "Point index {index} out of bounds"
                )))
            }
        }
        Ok(DatumRef::Void)
    }
}
