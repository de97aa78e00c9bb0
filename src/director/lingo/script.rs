use std::collections::HashMap;

use crate::director::chunks::script::ScriptChunk;

/// One `Lctx`/`LctX` section: the scripts it indexes plus the shared name
/// table from the `Lnam` it points at. Scripts are keyed by their 1-based
/// position in the context's section map, which is what `script_id` in a
/// `CASt` chunk refers to.
#[derive(Clone)]
pub struct ScriptContext {
    pub names: Vec<String>,
    pub scripts: HashMap<u32, ScriptChunk>,
    pub capital_x: bool,
}

impl ScriptContext {
    pub fn resolve_name(&self, id: u16) -> Option<&String> {
        self.names.get(id as usize)
    }
}
