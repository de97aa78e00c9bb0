use crate::{
    director::lingo::datum::{
        datum_bool, Datum, StringChunkExpr, StringChunkSource, StringChunkType,
    },
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

use super::string_chunk::StringChunkUtils;

pub struct StringDatumHandlers {}
pub struct StringDatumUtils {}

impl StringDatumUtils {
    pub fn get_built_in_prop(value: &str, prop_name: &str) -> Result<Datum, ScriptError> {
        match prop_name {
            "length" => Ok(Datum::Int(value.chars().count() as i32)),
            "ilk" => Ok(Datum::Symbol("string".to_owned())),
            "integer" => Ok(Datum::Int(value.trim().parse().unwrap_or(0))),
            "float" => Ok(Datum::Float(value.trim().parse().unwrap_or(0.0))),
            _ => Err(ScriptError::new(format!(
                "Invalid string property {prop_name}"
            ))),
        }
    }
}

impl StringDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        match handler_name {
            "length" => Self::length(vm, datum, args),
            "count" => Self::count(vm, datum, args),
            "char" => Self::chunk(vm, datum, args, StringChunkType::Char),
            "word" => Self::chunk(vm, datum, args, StringChunkType::Word),
            "item" => Self::chunk(vm, datum, args, StringChunkType::Item),
            "line" => Self::chunk(vm, datum, args, StringChunkType::Line),
            "getProp" | "getPropRef" => Self::get_prop_ref(vm, datum, args),
            "contains" => Self::contains(vm, datum, args),
            "offset" => Self::offset(vm, datum, args),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("string".to_string()))),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for string datum"
            ))),
        }
    }

    fn length(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).string_value()?;
        Ok(vm.alloc_datum(Datum::Int(value.chars().count() as i32)))
    }

    /// `count(str, #word)` style chunk counting.
    fn count(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).string_value()?;
        let chunk_name = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for count".to_string())
            })?)
            .string_value()?;
        let chunk_type = StringChunkType::from_name(&chunk_name)
            .ok_or_else(|| ScriptError::new(format!("Invalid chunk type {chunk_name}")))?;
        let chunks =
            StringChunkUtils::resolve_chunk_list(&value, chunk_type, vm.movie.item_delimiter)?;
        Ok(vm.alloc_datum(Datum::Int(chunks.len() as i32)))
    }

    fn chunk(
        vm: &mut LingoVm,
        datum: &DatumRef,
        args: &[DatumRef],
        chunk_type: StringChunkType,
    ) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).string_value()?;
        let start = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing chunk index".to_string())
            })?)
            .int_value()?;
        let end = match args.get(1) {
            Some(end_ref) => vm.get_datum(end_ref).int_value()?,
            None => 0,
        };
        let expr = StringChunkExpr {
            chunk_type,
            start,
            end,
            item_delimiter: vm.movie.item_delimiter,
        };
        let resolved = StringChunkUtils::resolve_chunk_expr_string(&value, &expr)?;
        Ok(vm.alloc_datum(Datum::StringChunk(
            StringChunkSource::Datum(datum.clone()),
            expr,
            resolved,
        )))
    }

    fn get_prop_ref(
        vm: &mut LingoVm,
        datum: &DatumRef,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let prop_name = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for getProp".to_string())
            })?)
            .string_value()?;
        match StringChunkType::from_name(&prop_name) {
            Some(chunk_type) => Self::chunk(vm, datum, &args[1..], chunk_type),
            None => {
                let value = vm.get_datum(datum).string_value()?;
                let result = StringDatumUtils::get_built_in_prop(&value, &prop_name)?;
                Ok(vm.alloc_datum(result))
            }
        }
    }

    fn contains(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).string_value()?.to_lowercase();
        let needle = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for contains".to_string())
            })?)
            .string_value()?
            .to_lowercase();
        Ok(vm.alloc_datum(datum_bool(value.contains(&needle))))
    }

    /// 1-indexed, case-insensitive; 0 when not found.
    fn offset(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(datum).string_value()?.to_lowercase();
        let needle = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for offset".to_string())
            })?)
            .string_value()?
            .to_lowercase();
        let position = value.find(&needle).map(|byte_pos| {
            value[..byte_pos].chars().count() as i32 + 1
        });
        Ok(vm.alloc_datum(Datum::Int(position.unwrap_or(0))))
    }
}
