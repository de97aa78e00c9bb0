use crate::{
    director::lingo::datum::Datum,
    vm::{
        datum_operations::{add_datums, divide_datums, multiply_datums, subtract_datums},
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

use super::handler_manager::BytecodeHandlerContext;

pub struct ArithmeticsBytecodeHandler {}

impl ArithmeticsBytecodeHandler {
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

    fn push_result(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
        result: Datum,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let result_ref = vm.alloc_datum(result);
        vm.scopes[ctx.scope_ref].stack.push(result_ref);
        Ok(HandlerExecutionResult::Advance)
    }

    pub fn add(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = add_datums(left, right, vm)?;
        Self::push_result(vm, ctx, result)
    }

    pub fn sub(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = subtract_datums(left, right, vm)?;
        Self::push_result(vm, ctx, result)
    }

    pub fn mul(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = multiply_datums(left, right, vm)?;
        Self::push_result(vm, ctx, result)
    }

    pub fn div(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        let result = divide_datums(left, right, vm)?;
        Self::push_result(vm, ctx, result)
    }

    pub fn mod_handler(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let (left, right) = Self::pop_operands(vm, ctx)?;
        if right.is_number() && right.float_value()? == 0.0 {
            return Err(ScriptError::new("Modulo by zero".to_string()));
        }
        let result = match (&left, &right) {
            (Datum::Int(a), Datum::Int(b)) => Datum::Int(a % b),
            (Datum::Int(a), Datum::Float(b)) => Datum::Float((*a as f64) % b),
            (Datum::Float(a), Datum::Int(b)) => Datum::Float(a % (*b as f64)),
            (Datum::Float(a), Datum::Float(b)) => Datum::Float(a % b),
            _ => {
                return Err(ScriptError::new(format!(
                    "Modulo only works with ints and floats (given {} and {})",
                    left.type_str(),
                    right.type_str()
                )))
            }
        };
        Self::push_result(vm, ctx, result)
    }

    pub fn inv(
        vm: &mut LingoVm,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        let value_ref = vm.scopes[ctx.scope_ref]
            .stack
            .pop()
            .ok_or_else(|| ScriptError::new("Stack underflow".to_string()))?;
        let value = vm.get_datum(&value_ref).clone();
        let result = match value {
            Datum::Int(n) => Datum::Int(-n),
            Datum::Float(n) => Datum::Float(-n),
            Datum::Point((x, y)) => Datum::Point((-x, -y)),
            Datum::Rect((l, t, r, b)) => Datum::Rect((-l, -t, -r, -b)),
            other => {
                return Err(ScriptError::new(format!(
                    "Cannot negate non-numeric value: {}",
                    other.type_str()
                )))
            }
        };
        Self::push_result(vm, ctx, result)
    }
}
