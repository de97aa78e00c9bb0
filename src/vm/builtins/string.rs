use crate::{
    director::lingo::datum::{Datum, ListKind},
    vm::{datum_formatting::format_concrete_datum, datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct StringHandlers {}

impl StringHandlers {
    fn first(args: &[DatumRef]) -> Result<&DatumRef, ScriptError> {
        args.first()
            .ok_or_else(|| ScriptError::new("Missing argument".to_string()))
    }

    pub fn string(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).clone();
        let result = match &value {
            Datum::String(s) => s.clone(),
            Datum::Int(n) => n.to_string(),
            Datum::Float(f) => crate::vm::datum_formatting::format_float(*f, vm.float_precision),
            Datum::Symbol(s) => s.clone(),
            Datum::Void => String::new(),
            other => format_concrete_datum(other, vm),
        };
        Ok(vm.alloc_datum(Datum::String(result)))
    }

    pub fn length(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).string_value()?;
        Ok(vm.alloc_datum(Datum::Int(value.chars().count() as i32)))
    }

    /// `chars(string, first, last)` — 1-indexed inclusive range.
    pub fn chars(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).string_value()?;
        let first = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing first for chars".to_string())
            })?)
            .int_value()?;
        let last = vm
            .get_datum(args.get(2).ok_or_else(|| {
                ScriptError::new("Missing last for chars".to_string())
            })?)
            .int_value()?;
        let count = value.chars().count() as i32;
        if count == 0 {
            return Ok(vm.alloc_datum(Datum::String(String::new())));
        }
        let first = first.clamp(1, count);
        let last = last.clamp(first, count);
        let result: String = value
            .chars()
            .skip((first - 1) as usize)
            .take((last - first + 1) as usize)
            .collect();
        Ok(vm.alloc_datum(Datum::String(result)))
    }

    pub fn char_to_num(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).string_value()?;
        let code = value.chars().next().map(|c| c as i32).unwrap_or(0);
        Ok(vm.alloc_datum(Datum::Int(code)))
    }

    pub fn num_to_char(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let code = vm.get_datum(Self::first(args)?).int_value()?;
        let result = char::from_u32(code as u32)
            .map(|c| c.to_string())
            .unwrap_or_default();
        Ok(vm.alloc_datum(Datum::String(result)))
    }

    /// 1-indexed, case-insensitive substring position; 0 when not found.
    pub fn offset(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let needle = vm.get_datum(Self::first(args)?).string_value()?.to_lowercase();
        let haystack = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing string for offset".to_string())
            })?)
            .string_value()?
            .to_lowercase();
        let position = haystack
            .find(&needle)
            .map(|byte_pos| haystack[..byte_pos].chars().count() as i32 + 1)
            .unwrap_or(0);
        Ok(vm.alloc_datum(Datum::Int(position)))
    }

    pub fn space(vm: &mut LingoVm, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Ok(vm.alloc_datum(Datum::String(" ".to_string())))
    }

    /// `stringToList("a,b,c")`-style splitting on the item delimiter.
    pub fn split_items(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).string_value()?;
        let delimiter = vm.movie.item_delimiter;
        let item_refs = value
            .split(delimiter)
            .map(|item| vm.alloc_datum(Datum::String(item.to_string())))
            .collect::<Vec<_>>();
        Ok(vm.alloc_datum(Datum::List(ListKind::List, item_refs, false)))
    }
}
