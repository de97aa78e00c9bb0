use crate::{
    director::lingo::datum::{datum_bool, Datum},
    vm::{
        compare::{datum_equals, datum_greater_than, datum_less_than},
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub struct CompareBytecodeHandler {}

impl CompareBytecodeHandler {
    fn pop_operands(
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

    fn push_bool(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
        value: bool,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let result_ref = vm.alloc_datum(datum_bool(value));
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn gt(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = datum_greater_than(&left, &right)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn lt(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = datum_less_than(&left, &right)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn gt_eq(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = datum_greater_than(&left, &right)?
            || datum_equals(&left, &right, &vm.allocator)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn lt_eq(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result =
            datum_less_than(&left, &right)? || datum_equals(&left, &right, &vm.allocator)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn eq(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = datum_equals(&left, &right, &vm.allocator)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn nt_eq(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = !datum_equals(&left, &right, &vm.allocator)?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn and(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = left.bool_value()? && right.bool_value()?;
        Self::push_bool(vm, ctx, result)
    }

    pub fn or(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = left.bool_value()? || right.bool_value()?;
        Self::push_bool(vm, ctx, result)
    }

    /// `sprite ... intersects/within ...`: pixel-level sprite intersection
    /// belongs to the rasterising host; without one both tests read false.
    pub fn sprite_intersects(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let _ = Self::pop_operands(vm, ctx)?;
        Self::push_bool(vm, ctx, false)
    }

    pub fn not(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow".to_string()))?;
        let value = vm.get_datum(&value_ref);
        let is_falsy = match value {
            Datum::Void => true,
            Datum::Int(n) => *n == 0,
            Datum::Float(n) => *n == 0.0,
            _ => false,
        };
        Self::push_bool(vm, ctx, is_falsy)
    }
}
