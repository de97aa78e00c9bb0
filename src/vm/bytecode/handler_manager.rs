use std::rc::Rc;

use crate::{
    director::{
        chunks::handler::HandlerDef,
        lingo::{constants::get_opcode_name, opcode::OpCode},
    },
    vm::{
        bytecode::{
            arithmetics::ArithmeticsBytecodeHandler, compare::CompareBytecodeHandler,
            flow_control::FlowControlBytecodeHandler, get_set::GetSetBytecodeHandler,
            stack::StackBytecodeHandler, string::StringBytecodeHandler,
        },
        scope::ScopeRef,
        script::Script,
        HandlerExecutionResult, LingoVm, ScriptError,
    },
};

/// Everything an opcode handler needs to find its operands: which scope it
/// runs in, and shared handles to the executing script and handler.
#[derive(Clone)]
pub struct BytecodeHandlerContext {
    pub scope_ref: ScopeRef,
    pub script: Rc<Script>,
    pub handler: Rc<HandlerDef>,
}

/// Dispatches the instruction under the scope's cursor to its opcode
/// handler.
pub fn execute_bytecode(
    vm: &mut LingoVm,
    ctx: &BytecodeHandlerContext,
) -> Result<HandlerExecutionResult, ScriptError> {
    let opcode = vm.current_bytecode(ctx).opcode;
    match opcode {
        OpCode::Ret => FlowControlBytecodeHandler::ret(vm, ctx),
        OpCode::RetFactory => FlowControlBytecodeHandler::ret(vm, ctx),
        OpCode::PushZero => StackBytecodeHandler::push_zero(vm, ctx),
        OpCode::PushInt8 | OpCode::PushInt16 | OpCode::PushInt32 => {
            StackBytecodeHandler::push_int(vm, ctx)
        }
        OpCode::PushFloat32 => StackBytecodeHandler::push_f32(vm, ctx),
        OpCode::PushCons => StackBytecodeHandler::push_cons(vm, ctx),
        OpCode::PushSymb => StackBytecodeHandler::push_symb(vm, ctx),
        OpCode::PushArgList => StackBytecodeHandler::push_arglist(vm, ctx),
        OpCode::PushArgListNoRet => StackBytecodeHandler::push_arglist_no_ret(vm, ctx),
        OpCode::PushList => StackBytecodeHandler::push_list(vm, ctx),
        OpCode::PushPropList => StackBytecodeHandler::push_prop_list(vm, ctx),
        OpCode::PushChunkVarRef => StringBytecodeHandler::push_chunk_var_ref(vm, ctx),
        OpCode::Peek => StackBytecodeHandler::peek(vm, ctx),
        OpCode::Pop => StackBytecodeHandler::pop(vm, ctx),
        OpCode::Swap => StackBytecodeHandler::swap(vm, ctx),
        OpCode::NewObj => StackBytecodeHandler::new_obj(vm, ctx),

        OpCode::Add => ArithmeticsBytecodeHandler::add(vm, ctx),
        OpCode::Sub => ArithmeticsBytecodeHandler::sub(vm, ctx),
        OpCode::Mul => ArithmeticsBytecodeHandler::mul(vm, ctx),
        OpCode::Div => ArithmeticsBytecodeHandler::div(vm, ctx),
        OpCode::Mod => ArithmeticsBytecodeHandler::mod_handler(vm, ctx),
        OpCode::Inv => ArithmeticsBytecodeHandler::inv(vm, ctx),

        OpCode::Lt => CompareBytecodeHandler::lt(vm, ctx),
        OpCode::LtEq => CompareBytecodeHandler::lt_eq(vm, ctx),
        OpCode::Gt => CompareBytecodeHandler::gt(vm, ctx),
        OpCode::GtEq => CompareBytecodeHandler::gt_eq(vm, ctx),
        OpCode::Eq => CompareBytecodeHandler::eq(vm, ctx),
        OpCode::NtEq => CompareBytecodeHandler::nt_eq(vm, ctx),
        OpCode::And => CompareBytecodeHandler::and(vm, ctx),
        OpCode::Or => CompareBytecodeHandler::or(vm, ctx),
        OpCode::Not => CompareBytecodeHandler::not(vm, ctx),
        OpCode::OntoSpr | OpCode::IntoSpr => CompareBytecodeHandler::sprite_intersects(vm, ctx),

        OpCode::JoinStr => StringBytecodeHandler::join_str(vm, ctx),
        OpCode::JoinPadStr => StringBytecodeHandler::join_pad_str(vm, ctx),
        OpCode::ContainsStr => StringBytecodeHandler::contains_str(vm, ctx),
        OpCode::Contains0Str => StringBytecodeHandler::contains_0str(vm, ctx),
        OpCode::GetChunk => StringBytecodeHandler::get_chunk(vm, ctx),
        OpCode::Put => StringBytecodeHandler::put(vm, ctx),
        OpCode::PutChunk => StringBytecodeHandler::put_chunk(vm, ctx),
        OpCode::DeleteChunk => StringBytecodeHandler::delete_chunk(vm, ctx),

        OpCode::Jmp => FlowControlBytecodeHandler::jmp(vm, ctx),
        OpCode::JmpIfZ => FlowControlBytecodeHandler::jmp_if_zero(vm, ctx),
        OpCode::EndRepeat => FlowControlBytecodeHandler::end_repeat(vm, ctx),
        OpCode::LocalCall => FlowControlBytecodeHandler::local_call(vm, ctx),
        OpCode::ExtCall => FlowControlBytecodeHandler::ext_call(vm, ctx),
        OpCode::ObjCall => FlowControlBytecodeHandler::obj_call(vm, ctx),

        OpCode::GetGlobal | OpCode::GetGlobal2 => GetSetBytecodeHandler::get_global(vm, ctx),
        OpCode::SetGlobal | OpCode::SetGlobal2 => GetSetBytecodeHandler::set_global(vm, ctx),
        OpCode::GetLocal => GetSetBytecodeHandler::get_local(vm, ctx),
        OpCode::SetLocal => GetSetBytecodeHandler::set_local(vm, ctx),
        OpCode::GetParam => GetSetBytecodeHandler::get_param(vm, ctx),
        OpCode::SetParam => GetSetBytecodeHandler::set_param(vm, ctx),
        OpCode::GetProp => GetSetBytecodeHandler::get_prop(vm, ctx),
        OpCode::SetProp => GetSetBytecodeHandler::set_prop(vm, ctx),
        OpCode::GetObjProp => GetSetBytecodeHandler::get_obj_prop(vm, ctx),
        OpCode::SetObjProp => GetSetBytecodeHandler::set_obj_prop(vm, ctx),
        OpCode::GetMovieProp => GetSetBytecodeHandler::get_movie_prop(vm, ctx),
        OpCode::SetMovieProp => GetSetBytecodeHandler::set_movie_prop(vm, ctx),
        OpCode::GetChainedProp => GetSetBytecodeHandler::get_chained_prop(vm, ctx),
        OpCode::GetTopLevelProp => GetSetBytecodeHandler::get_top_level_prop(vm, ctx),
        OpCode::TheBuiltin => GetSetBytecodeHandler::the_built_in(vm, ctx),
        OpCode::Get => GetSetBytecodeHandler::get(vm, ctx),
        OpCode::Set => GetSetBytecodeHandler::set(vm, ctx),
        OpCode::GetField => GetSetBytecodeHandler::get_field(vm, ctx),

        _ => {
            let prim = num::ToPrimitive::to_u16(&opcode).unwrap_or(0);
            let name = get_opcode_name(&opcode);
            Err(ScriptError::new(format!(
                "No handler for opcode {name} ({prim:#04x})"
            )))
        }
    }
}
