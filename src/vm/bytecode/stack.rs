use crate::{
    director::lingo::datum::{Datum, ListKind},
    vm::{
        builtins::datum_handlers::script::new_script_instance,
        datum_ref::DatumRef,
        script::{get_current_variable_multiplier, get_name},
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub struct StackBytecodeHandler {}

impl StackBytecodeHandler {
    pub fn push_int(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let value = vm.current_bytecode(ctx).obj as i32;
        let datum_ref = vm.alloc_datum(Datum::Int(value));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_f32(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let bits = vm.current_bytecode(ctx).obj as u32;
        let value = f32::from_bits(bits) as f64;
        let datum_ref = vm.alloc_datum(Datum::Float(value));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_zero(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let datum_ref = vm.alloc_datum(Datum::Int(0));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_cons(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let literal_id =
            vm.current_bytecode(ctx).obj as u32 / get_current_variable_multiplier(vm, ctx);
        let literal = ctx
            .script
            .chunk
            .literals
            .get(literal_id as usize)
            .cloned()
            .ok_or_else(|| {
                ScriptError::new(format!("Literal index {literal_id} out of range"))
            })?;
        let datum_ref = vm.alloc_datum(literal);
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_symb(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let symbol_name = get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let datum_ref = vm.alloc_datum(Datum::Symbol(symbol_name));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_arglist(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        Self::push_arglist_of_kind(vm, ctx, ListKind::ArgList)
    }

    pub fn push_arglist_no_ret(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        Self::push_arglist_of_kind(vm, ctx, ListKind::ArgListNoRet)
    }

    fn push_arglist_of_kind(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
        kind: ListKind,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let count = vm.current_bytecode(ctx).obj as usize;
        let scope = &mut vm.scopes[ctx.scope_ref];
        if scope.stack.len() < count {
            return Err(ScriptError::new(
                "Not enough items in stack to create arglist".to_string(),
            ));
        }
        let items = scope.pop_n(count);
        let datum_ref = vm.alloc_datum(Datum::List(kind, items, false));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_list(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let arg_list_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in pushlist".to_string()))?;
        let items = vm.get_datum(&arg_list_ref).to_list()?.clone();
        let datum_ref = vm.alloc_datum(Datum::List(ListKind::List, items, false));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn push_prop_list(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let arg_list_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in pushproplist".to_string()))?;
        let arg_list = vm.get_datum(&arg_list_ref).to_list()?;
        if arg_list.len() % 2 != 0 {
            return Err(ScriptError::new("argList length must be even".to_string()));
        }
        let entries = arg_list
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect::<Vec<(DatumRef, DatumRef)>>();
        let datum_ref = vm.alloc_datum(Datum::PropList(entries, false));
        vm.scopes[ctx.scope_ref].stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn peek(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let offset = vm.current_bytecode(ctx).obj as usize;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let stack_index = scope
            .stack
            .len()
            .checked_sub(1 + offset)
            .ok_or_else(|| ScriptError::new("Stack underflow in peek".to_string()))?;
        let datum_ref = scope.stack[stack_index].clone();
        scope.stack.push(datum_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn pop(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let count = vm.current_bytecode(ctx).obj as usize;
        let scope = &mut vm.scopes[ctx.scope_ref];
        let count = count.min(scope.stack.len());
        scope.pop_n(count);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn swap(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let scope = &mut vm.scopes[ctx.scope_ref];
        let a = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in swap".to_string()))?;
        let b = scope
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in swap".to_string()))?;
        scope.stack.push(a);
        scope.stack.push(b);
        Ok(HandlerExecutionResult::Advance)
    }

    /// `NEW_OBJ`: the arg list's first element names a script; the rest are
    /// passed to its `new` handler.
    pub fn new_obj(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let obj_type = {
            let name_id = vm.current_bytecode(ctx).obj as u16;
            get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?
        };
        if obj_type != "script" {
            return Err(ScriptError::new(format!(
                "Cannot create new instance of non-script: {obj_type}"
            )));
        }
        let arg_list_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow in newobj".to_string()))?;
        let arg_list = vm.get_datum(&arg_list_ref).to_list()?.clone();
        let script_name = vm
            .get_datum(arg_list.first().ok_or_else(|| {
                ScriptError::new("newobj needs a script name".to_string())
            })?)
            .string_value()?;
        let extra_args = arg_list[1..].to_vec();

        let script_ref = vm
            .movie
            .cast_manager
            .find_member_ref_by_name(&script_name)
            .ok_or_else(|| ScriptError::new(format!("Script not found: {script_name}")))?;
        let result = new_script_instance(vm, &script_ref, &extra_args)?;
        vm.scopes[ctx.scope_ref].stack.push(result);
        Ok(HandlerExecutionResult::Advance)
    }
}
