use crate::{
    director::lingo::datum::{
        datum_bool, Datum, StringChunkExpr, StringChunkSource, StringChunkType,
    },
    vm::{
        builtins::datum_handlers::string_chunk::StringChunkUtils,
        context_vars::{get_context_var, read_context_var_args, set_context_var},
        datum_formatting::format_concrete_datum,
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub enum PutType {
    Into,
    After,
    Before,
}

impl PutType {
    fn from_obj(val: u8) -> Result<PutType, ScriptError> {
        match val {
            0x01 => Ok(PutType::Into),
            0x02 => Ok(PutType::After),
            0x03 => Ok(PutType::Before),
            _ => Err(ScriptError::new(format!("Invalid put type {val}"))),
        }
    }
}

pub struct StringBytecodeHandler {}

impl StringBytecodeHandler {
    fn concat_value(datum: &Datum, vm: &LingoVm) -> Result<String, ScriptError> {
        match datum {
            Datum::String(s) => Ok(s.clone()),
            Datum::StringChunk(..) => datum.string_value(),
            Datum::Int(i) => Ok(i.to_string()),
            Datum::Float(f) => Ok(f.to_string()),
            Datum::Symbol(s) => Ok(s.to_string()),
            Datum::Void => Ok(String::new()),
            _ => Ok(format_concrete_datum(datum, vm)),
        }
    }

    fn pop_two(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<(Datum, Datum), ScriptError> {
        let scope = &mut vm.scopes[ctx.scope_ref];
        let right = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow".to_string()))?;
        let left = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow".to_string()))?;
        Ok((vm.get_datum(&left).clone(), vm.get_datum(&right).clone()))
    }

    pub fn join_str(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_two(vm, ctx)?;
        let joined = format!(
            "{}{}",
            Self::concat_value(&left, vm)?,
            Self::concat_value(&right, vm)?
        );
        let result_ref = vm.alloc_datum(Datum::String(joined));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn join_pad_str(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_two(vm, ctx)?;
        let joined = format!(
            "{} {}",
            Self::concat_value(&left, vm)?,
            Self::concat_value(&right, vm)?
        );
        let result_ref = vm.alloc_datum(Datum::String(joined));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    /// Case-insensitive substring test; against a list, true when any
    /// string element contains the needle.
    pub fn contains_str(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (search_in, search_str) = Self::pop_two(vm, ctx)?;
        let needle = search_str.string_value()?.to_lowercase();

        let contains = if search_in.is_list() {
            let mut found = false;
            let items = search_in.to_list()?.clone();
            for item_ref in items {
                let item = vm.get_datum(&item_ref);
                if item.is_string() && item.string_value()?.to_lowercase().contains(&needle) {
                    found = true;
                    break;
                }
            }
            found
        } else if search_in.is_string() {
            search_in.string_value()?.to_lowercase().contains(&needle)
        } else {
            false
        };

        let result_ref = vm.alloc_datum(datum_bool(contains));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    /// Case-insensitive prefix test.
    pub fn contains_0str(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (search_in, search_str) = Self::pop_two(vm, ctx)?;
        let result = if search_in.is_void() {
            false
        } else {
            let needle = search_str.string_value()?.to_lowercase();
            search_in
                .string_value()?
                .to_lowercase()
                .starts_with(&needle)
        };
        let result_ref = vm.alloc_datum(datum_bool(result));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    /// Pops the eight chunk bounds (first/last of line, item, word, char)
    /// and builds the chunk expression; zero bound pairs are skipped.
    fn read_chunk_ref(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<StringChunkExpr, ScriptError> {
        let mut pop_int = |vm: &mut LingoVm| -> Result<i32, ScriptError> {
            let value_ref = vm.scopes[ctx.scope_ref]
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in getchunk".to_string()))?;
            vm.get_datum(&value_ref).int_value()
        };
        let last_line = pop_int(vm)?;
        let first_line = pop_int(vm)?;
        let last_item = pop_int(vm)?;
        let first_item = pop_int(vm)?;
        let last_word = pop_int(vm)?;
        let first_word = pop_int(vm)?;
        let last_char = pop_int(vm)?;
        let first_char = pop_int(vm)?;

        let item_delimiter = vm.movie.item_delimiter;
        if first_line != 0 || last_line != 0 {
            Ok(StringChunkExpr {
                chunk_type: StringChunkType::Line,
                start: first_line,
                end: last_line,
                item_delimiter,
            })
        } else if first_item != 0 || last_item != 0 {
            Ok(StringChunkExpr {
                chunk_type: StringChunkType::Item,
                start: first_item,
                end: last_item,
                item_delimiter,
            })
        } else if first_word != 0 || last_word != 0 {
            Ok(StringChunkExpr {
                chunk_type: StringChunkType::Word,
                start: first_word,
                end: last_word,
                item_delimiter,
            })
        } else if first_char != 0 || last_char != 0 {
            Ok(StringChunkExpr {
                chunk_type: StringChunkType::Char,
                start: first_char,
                end: last_char,
                item_delimiter,
            })
        } else {
            Err(ScriptError::new("getChunk: invalid chunk range".to_string()))
        }
    }

    pub fn get_chunk(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let string_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in getchunk".to_string()))?;
        let chunk_expr = Self::read_chunk_ref(vm, ctx)?;
        let string_value = vm.get_datum(&string_ref).string_value()?;
        let resolved = StringChunkUtils::resolve_chunk_expr_string(&string_value, &chunk_expr)?;

        let result_ref = vm.alloc_datum(Datum::String(resolved));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn put(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj = vm.current_bytecode(ctx).obj;
        let put_type = PutType::from_obj(((obj >> 4) & 0xF) as u8)?;
        let var_type = (obj & 0xF) as u32;
        let (id_ref, cast_id_ref) = read_context_var_args(vm, var_type, ctx.scope_ref);
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in put".to_string()))?;

        match put_type {
            PutType::Into => {
                set_context_var(
                    vm,
                    &id_ref,
                    cast_id_ref.as_ref(),
                    var_type,
                    &value_ref,
                    PutType::Into,
                    ctx,
                )?;
            }
            PutType::Before => {
                let current_ref =
                    get_context_var(vm, &id_ref, cast_id_ref.as_ref(), var_type, ctx)?;
                let current = vm.get_datum(&current_ref).string_value()?;
                let value = vm.get_datum(&value_ref).string_value()?;
                let new_string = vm.alloc_datum(Datum::String(format!("{value}{current}")));
                set_context_var(
                    vm,
                    &id_ref,
                    cast_id_ref.as_ref(),
                    var_type,
                    &new_string,
                    PutType::Into,
                    ctx,
                )?;
            }
            PutType::After => {
                let current_ref =
                    get_context_var(vm, &id_ref, cast_id_ref.as_ref(), var_type, ctx)?;
                let current = vm.get_datum(&current_ref).string_value()?;
                let value = vm.get_datum(&value_ref).string_value()?;
                let new_string = vm.alloc_datum(Datum::String(format!("{current}{value}")));
                set_context_var(
                    vm,
                    &id_ref,
                    cast_id_ref.as_ref(),
                    var_type,
                    &new_string,
                    PutType::Into,
                    ctx,
                )?;
            }
        }
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn put_chunk(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj = vm.current_bytecode(ctx).obj;
        let put_type = PutType::from_obj(((obj >> 4) & 0xF) as u8)?;
        let var_type = (obj & 0xF) as u32;
        let (id_ref, cast_id_ref) = read_context_var_args(vm, var_type, ctx.scope_ref);
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in putchunk".to_string()))?;
        let chunk_expr = Self::read_chunk_ref(vm, ctx)?;

        let current_ref = get_context_var(vm, &id_ref, cast_id_ref.as_ref(), var_type, ctx)?;
        let current = vm.get_datum(&current_ref).string_value()?;
        let replacement = vm.get_datum(&value_ref).string_value()?;
        let selected = StringChunkUtils::resolve_chunk_expr_string(&current, &chunk_expr)?;
        let spliced = match put_type {
            PutType::Into => replacement,
            PutType::Before => format!("{replacement}{selected}"),
            PutType::After => format!("{selected}{replacement}"),
        };
        let source = StringChunkSource::Datum(current_ref.clone());
        StringChunkUtils::put(vm, &source, &chunk_expr, &spliced)?;
        let new_value = vm.get_datum(&current_ref).clone();
        let new_ref = vm.alloc_datum(new_value);
        set_context_var(
            vm,
            &id_ref,
            cast_id_ref.as_ref(),
            var_type,
            &new_ref,
            PutType::Into,
            ctx,
        )?;
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn delete_chunk(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj = vm.current_bytecode(ctx).obj;
        let var_type = (obj & 0xF) as u32;
        let (id_ref, cast_id_ref) = read_context_var_args(vm, var_type, ctx.scope_ref);
        let string_ref = get_context_var(vm, &id_ref, cast_id_ref.as_ref(), var_type, ctx)?;
        let chunk_expr = Self::read_chunk_ref(vm, ctx)?;

        StringChunkUtils::delete(vm, &StringChunkSource::Datum(string_ref.clone()), &chunk_expr)?;
        let new_value = vm.get_datum(&string_ref).clone();
        let new_ref = vm.alloc_datum(new_value);
        set_context_var(
            vm,
            &id_ref,
            cast_id_ref.as_ref(),
            var_type,
            &new_ref,
            PutType::Into,
            ctx,
        )?;
        Ok(HandlerExecutionResult::Advance)
    }

    /// `PUSH_CHUNK_VAR_REF`: pushes the current value of a context
    /// variable for a following chunk operation.
    pub fn push_chunk_var_ref(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj = vm.current_bytecode(ctx).obj;
        let var_type = (obj & 0xF) as u32;
        let (id_ref, cast_id_ref) = read_context_var_args(vm, var_type, ctx.scope_ref);
        let value_ref = get_context_var(vm, &id_ref, cast_id_ref.as_ref(), var_type, ctx)?;
        vm.scopes[ctx.scope_ref].stack.push(value_ref);
        Ok(HandlerExecutionResult::Advance)
    }
}
