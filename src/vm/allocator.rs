use fxhash::FxHashMap;

use crate::director::lingo::datum::Datum;

use super::{
    datum_ref::{DatumId, DatumRef},
    script::{ScriptInstance, ScriptInstanceId},
    ScriptError,
};

const MAX_DATUM_ID: DatumId = 0xFFFFFF;
const MAX_SCRIPT_INSTANCE_ID: ScriptInstanceId = 0xFFFFFF;

/// Arena for datums and script instances. Stable integer ids break the
/// reference cycles a `ScriptInstance.ancestor` chain would otherwise form,
/// and make the ancestor walk a bounded loop over indices.
///
/// Storage is reclaimed wholesale by `reset()` between movie runs; datums
/// are never freed individually.
pub struct DatumAllocator {
    datums: FxHashMap<DatumId, Datum>,
    datum_id_counter: DatumId,
    script_instances: FxHashMap<ScriptInstanceId, ScriptInstance>,
    script_instance_counter: ScriptInstanceId,
    void_datum: Datum,
}

impl DatumAllocator {
    pub fn new() -> Self {
        DatumAllocator {
            datums: FxHashMap::default(),
            datum_id_counter: 1,
            script_instances: FxHashMap::default(),
            script_instance_counter: 1,
            void_datum: Datum::Void,
        }
    }

    pub fn alloc_datum(&mut self, datum: Datum) -> Result<DatumRef, ScriptError> {
        if datum.is_void() {
            return Ok(DatumRef::Void);
        }
        if self.datum_id_counter >= MAX_DATUM_ID {
            return Err(ScriptError::new("Datum limit reached".to_string()));
        }
        let id = self.datum_id_counter;
        self.datum_id_counter += 1;
        self.datums.insert(id, datum);
        Ok(DatumRef::from_id(id))
    }

    pub fn get_datum(&self, id: &DatumRef) -> &Datum {
        match id {
            DatumRef::Ref(id) => self.datums.get(id).unwrap_or(&Datum::Void),
            DatumRef::Void => &Datum::Void,
        }
    }

    pub fn get_datum_mut(&mut self, id: &DatumRef) -> &mut Datum {
        match id {
            DatumRef::Ref(id) => self.datums.get_mut(id).unwrap_or(&mut self.void_datum),
            DatumRef::Void => &mut self.void_datum,
        }
    }

    pub fn datum_count(&self) -> usize {
        self.datums.len()
    }

    pub fn alloc_script_instance(
        &mut self,
        script_instance: ScriptInstance,
    ) -> Result<ScriptInstanceId, ScriptError> {
        if self.script_instance_counter >= MAX_SCRIPT_INSTANCE_ID {
            return Err(ScriptError::new(
                "Script instance limit reached".to_string(),
            ));
        }
        let id = self.script_instance_counter;
        self.script_instance_counter += 1;
        self.script_instances.insert(id, script_instance);
        Ok(id)
    }

    pub fn get_script_instance(&self, id: ScriptInstanceId) -> &ScriptInstance {
        self.script_instances.get(&id).unwrap()
    }

    pub fn get_script_instance_opt(&self, id: ScriptInstanceId) -> Option<&ScriptInstance> {
        self.script_instances.get(&id)
    }

    pub fn get_script_instance_mut(&mut self, id: ScriptInstanceId) -> &mut ScriptInstance {
        self.script_instances.get_mut(&id).unwrap()
    }

    pub fn script_instance_count(&self) -> usize {
        self.script_instances.len()
    }

    pub fn reset(&mut self) {
        self.datums.clear();
        self.datum_id_counter = 1;
        self.script_instances.clear();
        self.script_instance_counter = 1;
    }
}

impl Default for DatumAllocator {
    fn default() -> Self {
        Self::new()
    }
}
