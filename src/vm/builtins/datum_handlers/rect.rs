use crate::{
    director::lingo::datum::Datum,
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct RectDatumHandlers {}

impl RectDatumHandlers {
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
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("rect".to_string()))),
            "inside" => Self::inside(vm, datum, args),
            "intersect" => Self::intersect(vm, datum, args),
            "union" => Self::union(vm, datum, args),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for rect datum"
            ))),
        }
    }

    pub fn get_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        prop_name: &str,
    ) -> Result<Datum, ScriptError> {
        let (left, top, right, bottom) = vm.get_datum(datum).to_rect()?;
        match prop_name {
            "left" => Ok(Datum::Int(left)),
            "top" => Ok(Datum::Int(top)),
            "right" => Ok(Datum::Int(right)),
            "bottom" => Ok(Datum::Int(bottom)),
            "width" => Ok(Datum::Int(right - left)),
            "height" => Ok(Datum::Int(bottom - top)),
            "ilk" => Ok(Datum::Symbol("rect".to_string())),
            _ => Err(ScriptError::new(format!(
                "Invalid rect property {prop_name}"
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
        let rect = vm.get_datum_mut(datum).to_rect_mut()?;
        match prop_name {
            "left" => rect.0 = value,
            "top" => rect.1 = value,
            "right" => rect.2 = value,
            "bottom" => rect.3 = value,
            _ => {
                return Err(ScriptError::new(format!(
                    "Invalid rect property {prop_name}"
                )))
            }
        }
        Ok(())
    }

    fn get_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let index = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for getAt".to_string())
            })?)
            .int_value()?;
        let (left, top, right, bottom) = vm.get_datum(datum).to_rect()?;
        let value = match index {
            1 => left,
            2 => top,
            3 => right,
            4 => bottom,
            _ => {
                return Err(ScriptError::new(format!(
                    "Rect index {index} out of bounds (must be 1-4)"
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
        let rect = vm.get_datum_mut(datum).to_rect_mut()?;
        match index {
            1 => rect.0 = value,
            2 => rect.1 = value,
            3 => rect.2 = value,
            4 => rect.3 = value,
            _ => {
                return Err(ScriptError::new(format!(
                    "Rect index {index} out of bounds (must be 1-4)"
                )))
            }
        }
        Ok(DatumRef::Void)
    }

    fn inside(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let (x, y) = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for inside".to_string())
            })?)
            .to_point()?;
        let (left, top, right, bottom) = vm.get_datum(datum).to_rect()?;
        let inside = x >= left && x < right && y >= top && y < bottom;
        Ok(vm.alloc_datum(crate::director::lingo::datum::datum_bool(inside)))
    }

    fn intersect(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let other = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for intersect".to_string())
            })?)
            .to_rect()?;
        let (left, top, right, bottom) = vm.get_datum(datum).to_rect()?;
        let result = (
            left.max(other.0),
            top.max(other.1),
            right.min(other.2),
            bottom.min(other.3),
        );
        let result = if result.0 >= result.2 || result.1 >= result.3 {
            (0, 0, 0, 0)
        } else {
            result
        };
        Ok(vm.alloc_datum(Datum::Rect(result)))
    }

    fn union(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let other = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for union".to_string())
            })?)
            .to_rect()?;
        let (left, top, right, bottom) = vm.get_datum(datum).to_rect()?;
        let result = (
            left.min(other.0),
            top.min(other.1),
            right.max(other.2),
            bottom.max(other.3),
        );
        Ok(vm.alloc_datum(Datum::Rect(result)))
    }
}
