use fxhash::FxHashMap;

use super::{
    cast_lib::{CastMemberRef, INVALID_CAST_MEMBER_REF},
    datum_ref::DatumRef,
    script::ScriptInstanceId,
};

pub type ScopeRef = usize;

/// One handler activation record.
pub struct Scope {
    pub scope_ref: ScopeRef,
    pub script_ref: CastMemberRef,
    pub receiver: Option<ScriptInstanceId>,
    pub handler_name: String,
    pub args: Vec<DatumRef>,
    pub bytecode_index: usize,
    pub locals: FxHashMap<String, DatumRef>,
    /// Exit targets of compiled repeat loops, pushed by conditional jumps.
    pub loop_return_indices: Vec<usize>,
    pub return_value: DatumRef,
    pub stack: Vec<DatumRef>,
    pub passed: bool,
    pub returned: bool,
    pub error: bool,
}

#[derive(Debug)]
pub struct ScopeResult {
    pub return_value: DatumRef,
    pub passed: bool,
}

impl Scope {
    pub fn new(scope_ref: ScopeRef) -> Scope {
        Scope {
            scope_ref,
            script_ref: INVALID_CAST_MEMBER_REF,
            receiver: None,
            handler_name: String::new(),
            args: vec![],
            bytecode_index: 0,
            locals: FxHashMap::default(),
            loop_return_indices: vec![],
            return_value: DatumRef::Void,
            stack: vec![],
            passed: false,
            returned: false,
            error: false,
        }
    }

    pub fn reset(&mut self) {
        self.script_ref = INVALID_CAST_MEMBER_REF;
        self.receiver = None;
        self.handler_name.clear();
        self.args.clear();
        self.bytecode_index = 0;
        self.locals.clear();
        self.loop_return_indices.clear();
        self.return_value = DatumRef::Void;
        self.stack.clear();
        self.passed = false;
        self.returned = false;
        self.error = false;
    }

    pub fn pop_n(&mut self, n: usize) -> Vec<DatumRef> {
        let result = self.stack[self.stack.len() - n..].to_vec();
        for _ in 0..n {
            self.stack.pop();
        }
        result
    }
}
