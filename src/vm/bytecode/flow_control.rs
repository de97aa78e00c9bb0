use crate::{
    director::lingo::datum::{Datum, ListKind},
    vm::{
        builtins::datum_handlers::{call_datum_handler, script_instance::get_handler_from_first_arg},
        compare::datum_is_zero,
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub struct FlowControlBytecodeHandler {}

impl FlowControlBytecodeHandler {
    pub fn ret(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let scope = &mut vm.scopes[ctx.scope_ref];
        // a value left on the operand stack is the handler's result
        if let Some(top) = scope.stack.pop() {
            if scope.return_value.is_void_ref() {
                scope.return_value = top;
            }
        }
        scope.stack.clear();
        Ok(HandlerExecutionResult::Stop)
    }

    fn pop_arg_list(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<(Vec<crate::vm::datum_ref::DatumRef>, bool), ScriptError> {
        let arg_list_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Call without arg list".to_string()))?;
        let arg_list_datum = vm.get_datum(&arg_list_ref);
        match arg_list_datum {
            Datum::List(kind, items, _) => {
                let is_no_ret = matches!(kind, ListKind::ArgListNoRet);
                Ok((items.clone(), is_no_ret))
            }
            _ => Err(ScriptError::new(
                "Call was not passed an arg list".to_string(),
            )),
        }
    }

    pub fn ext_call(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let name_id = vm.current_bytecode(ctx).obj as u16;
        let name = crate::vm::script::get_name(vm, ctx, name_id)
            .cloned()
            .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?;
        let (args, is_no_ret) = Self::pop_arg_list(vm, ctx)?;

        let (result, return_value) = vm.ext_call(&name, &args, ctx.scope_ref);
        if !is_no_ret {
            vm.scopes[ctx.scope_ref].stack.push(return_value);
        }
        match result {
            HandlerExecutionResult::Error(err) => Err(err),
            other => Ok(other),
        }
    }

    pub fn local_call(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (args, is_no_ret) = Self::pop_arg_list(vm, ctx)?;
        let vector_pos = vm.current_bytecode(ctx).obj as usize;
        let mut handler_ref = ctx
            .script
            .get_own_handler_ref_at(vector_pos)
            .ok_or_else(|| {
                ScriptError::new(format!("No local handler at position {vector_pos}"))
            })?;

        // a script or instance in the first argument that defines a handler
        // of this name takes the call instead
        let receiver;
        if let Some((first_arg_receiver, first_arg_handler)) =
            get_handler_from_first_arg(vm, &args, &handler_ref.1)
        {
            receiver = first_arg_receiver;
            handler_ref = first_arg_handler;
        } else {
            receiver = vm.scopes[ctx.scope_ref].receiver;
        }

        let scope = vm.call_script_handler_raw_args(receiver, handler_ref, &args, true)?;
        vm.propagate_passed(&scope);
        if !is_no_ret {
            vm.scopes[ctx.scope_ref].stack.push(scope.return_value);
        }
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn obj_call(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (arg_list, is_no_ret) = Self::pop_arg_list(vm, ctx)?;
        let handler_name = {
            let name_id = vm.current_bytecode(ctx).obj as u16;
            crate::vm::script::get_name(vm, ctx, name_id)
                .cloned()
                .ok_or_else(|| ScriptError::new(format!("Unknown name id {name_id}")))?
        };
        let obj_ref = arg_list
            .first()
            .cloned()
            .ok_or_else(|| ScriptError::new("objcall without target".to_string()))?;
        let args = arg_list[1..].to_vec();

        let result = call_datum_handler(vm, &obj_ref, &handler_name, &args)?;
        vm.last_handler_result = result.clone();
        if !is_no_ret {
            vm.scopes[ctx.scope_ref].stack.push(result);
        }
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn jmp(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (position, offset) = {
            let bytecode = vm.current_bytecode(ctx);
            (bytecode.pos as i32, bytecode.obj as i32)
        };
        let dest_pos = (position + offset) as usize;
        let new_index = *ctx
            .handler
            .bytecode_index_map
            .get(&dest_pos)
            .ok_or_else(|| ScriptError::new(format!("Invalid jump target {dest_pos}")))?;
        vm.scopes[ctx.scope_ref].bytecode_index = new_index;
        Ok(HandlerExecutionResult::Jump)
    }

    pub fn jmp_if_zero(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let value_ref = {
            let scope = &mut vm.scopes[ctx.scope_ref];
            let index = scope.bytecode_index;
            scope.loop_return_indices.push(index);
            scope
                .stack
                .pop()
                .ok_or_else(|| ScriptError::new("Stack underflow in jmpifz".to_string()))?
        };
        let is_zero = datum_is_zero(vm.get_datum(&value_ref))?;
        if is_zero {
            let (position, offset) = {
                let bytecode = vm.current_bytecode(ctx);
                (bytecode.pos as i32, bytecode.obj as i32)
            };
            let dest_pos = (position + offset) as usize;
            let new_index = *ctx
                .handler
                .bytecode_index_map
                .get(&dest_pos)
                .ok_or_else(|| ScriptError::new(format!("Invalid jump target {dest_pos}")))?;
            vm.scopes[ctx.scope_ref].bytecode_index = new_index;
            Ok(HandlerExecutionResult::Jump)
        } else {
            Ok(HandlerExecutionResult::Advance)
        }
    }

    pub fn end_repeat(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (position, offset) = {
            let bytecode = vm.current_bytecode(ctx);
            (bytecode.pos, bytecode.obj as usize)
        };
        let return_pos = position - offset;
        let new_index = *ctx
            .handler
            .bytecode_index_map
            .get(&return_pos)
            .ok_or_else(|| ScriptError::new(format!("Invalid repeat target {return_pos}")))?;
        let scope = &mut vm.scopes[ctx.scope_ref];
        scope.loop_return_indices.pop();
        scope.bytecode_index = new_index;
        Ok(HandlerExecutionResult::Jump)
    }
}
