use crate::{
    director::lingo::datum::{datum_bool, Datum},
    vm::{datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct NetHandlers {}

/// Network builtins forward to the Network provider. Without one, polls
/// complete immediately with empty results — the degraded contract that
/// keeps netLingo-heavy movies running offline.
impl NetHandlers {
    fn first(args: &[DatumRef]) -> Result<&DatumRef, ScriptError> {
        args.first()
            .ok_or_else(|| ScriptError::new("Missing argument".to_string()))
    }

    fn task_id(vm: &LingoVm, args: &[DatumRef]) -> Result<Option<u32>, ScriptError> {
        match args.first() {
            Some(arg) => Ok(Some(vm.get_datum(arg).int_value()? as u32)),
            None => Ok(None),
        }
    }

    pub fn preload_net_thing(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let url = vm.get_datum(Self::first(args)?).string_value()?;
        let task_id = match vm.providers.net.as_mut() {
            Some(provider) => provider.preload_net_thing(&url),
            None => 0,
        };
        Ok(vm.alloc_datum(Datum::Int(task_id as i32)))
    }

    pub fn get_net_text(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Self::preload_net_thing(vm, args)
    }

    pub fn post_net_text(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let url = vm.get_datum(Self::first(args)?).string_value()?;
        let body = match args.get(1) {
            Some(body_ref) => vm.get_datum(body_ref).string_value()?,
            None => String::new(),
        };
        let task_id = match vm.providers.net.as_mut() {
            Some(provider) => provider.post_net_text(&url, &body),
            None => 0,
        };
        Ok(vm.alloc_datum(Datum::Int(task_id as i32)))
    }

    pub fn net_done(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let task_id = Self::task_id(vm, args)?;
        let done = match (vm.providers.net.as_mut(), task_id) {
            (Some(provider), Some(task_id)) => provider.net_done(task_id),
            _ => true,
        };
        // integrate any external casts the finished task was carrying
        vm.poll_external_casts();
        Ok(vm.alloc_datum(datum_bool(done)))
    }

    pub fn net_error(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let task_id = Self::task_id(vm, args)?;
        let error = match (vm.providers.net.as_mut(), task_id) {
            (Some(provider), Some(task_id)) => provider.net_error(task_id),
            _ => None,
        };
        // "OK" means the task finished without error
        Ok(vm.alloc_datum(Datum::String(error.unwrap_or_else(|| "OK".to_string()))))
    }

    pub fn net_text_result(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let task_id = Self::task_id(vm, args)?;
        let text = match (vm.providers.net.as_mut(), task_id) {
            (Some(provider), Some(task_id)) => provider.net_text_result(task_id),
            _ => None,
        };
        Ok(vm.alloc_datum(Datum::String(text.unwrap_or_default())))
    }

    pub fn get_stream_status(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let task_id = Self::task_id(vm, args)?;
        let status = match (vm.providers.net.as_mut(), task_id) {
            (Some(provider), Some(task_id)) => provider.get_stream_status(task_id),
            _ => None,
        };
        match status {
            Some(status) => Ok(vm.alloc_datum(status)),
            None => {
                // an empty status prop list mirrors a finished task
                Ok(vm.alloc_datum(Datum::PropList(vec![], false)))
            }
        }
    }
}
