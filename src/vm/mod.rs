pub mod allocator;
pub mod bitmap;
pub mod builtins;
pub mod bytecode;
pub mod cast_lib;
pub mod cast_manager;
pub mod cast_member;
pub mod compare;
pub mod config;
pub mod context_vars;
pub mod datum_formatting;
pub mod datum_operations;
pub mod datum_ref;
pub mod eval;
pub mod movie;
pub mod providers;
pub mod scope;
pub mod script;

use fxhash::FxHashMap;
use log::{error, warn};

use crate::director::{
    chunks::handler::Bytecode,
    enums::ScriptType,
    file::DirectorFile,
    lingo::{
        constants::{get_anim2_prop_name, get_anim_prop_name},
        datum::{datum_bool, Datum, ListKind},
    },
};

use self::{
    allocator::DatumAllocator,
    bitmap::BitmapManager,
    builtins::datum_handlers::script_instance::get_handler_from_first_arg,
    bytecode::handler_manager::{execute_bytecode, BytecodeHandlerContext},
    cast_lib::CastLoadState,
    cast_manager::CastPreloadReason,
    config::VmConfig,
    datum_ref::DatumRef,
    movie::Movie,
    providers::Providers,
    scope::{Scope, ScopeRef, ScopeResult},
    script::{ScriptHandlerRef, ScriptInstanceId},
};

#[derive(Debug, PartialEq, Eq)]
pub enum ScriptErrorCode {
    HandlerNotFound,
    StepLimit,
    Generic,
}

/// A Lingo-level fault. Never crosses into the host as a panic: faults are
/// captured at handler boundaries and surface as `Void` results plus the
/// VM error latch.
#[derive(Debug)]
pub struct ScriptError {
    pub code: ScriptErrorCode,
    pub message: String,
}

impl ScriptError {
    pub fn new(message: String) -> ScriptError {
        Self::new_code(ScriptErrorCode::Generic, message)
    }

    pub fn new_code(code: ScriptErrorCode, message: String) -> ScriptError {
        ScriptError { code, message }
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// What an opcode handler tells the dispatch loop to do next. Jump means
/// the handler already wrote `bytecode_index`.
pub enum HandlerExecutionResult {
    Advance,
    Stop,
    Jump,
    Error(ScriptError),
}

/// The Lingo virtual machine: datum arena, globals, scope stack, cast
/// model, and host providers. Single-threaded and cooperative; the host
/// drives it by dispatching events and polling tasks between ticks.
pub struct LingoVm {
    pub movie: Movie,
    pub globals: FxHashMap<String, DatumRef>,
    pub scopes: Vec<Scope>,
    pub scope_count: usize,
    pub allocator: DatumAllocator,
    pub bitmap_manager: BitmapManager,
    pub providers: Providers,
    pub config: VmConfig,
    pub step_count: u64,
    pub halted: bool,
    pub error_state: Option<String>,
    pub last_handler_result: DatumRef,
    pub float_precision: u8,
    pub start_time: chrono::DateTime<chrono::Local>,
}

impl LingoVm {
    pub fn new() -> LingoVm {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> LingoVm {
        let float_precision = config.float_precision;
        let mut vm = LingoVm {
            movie: Movie::empty(),
            globals: FxHashMap::default(),
            scopes: Vec::new(),
            scope_count: 0,
            allocator: DatumAllocator::new(),
            bitmap_manager: BitmapManager::new(),
            providers: Providers::none(),
            config,
            step_count: 0,
            halted: false,
            error_state: None,
            last_handler_result: DatumRef::Void,
            float_precision,
            start_time: chrono::Local::now(),
        };

        let actor_list = vm.alloc_datum(Datum::List(ListKind::List, vec![], false));
        vm.globals.insert("actorList".to_string(), actor_list);
        vm.globals.insert("VOID".to_string(), DatumRef::Void);
        vm
    }

    pub fn load_movie(&mut self, dir: &DirectorFile) {
        self.movie.load_from_file(dir, &mut self.bitmap_manager);
    }

    pub fn reset(&mut self) {
        self.scopes.clear();
        self.scope_count = 0;
        self.globals.clear();
        self.allocator.reset();
        self.bitmap_manager.reset();
        self.step_count = 0;
        self.halted = false;
        self.error_state = None;
        self.last_handler_result = DatumRef::Void;
        self.movie.current_frame = 1;
        let actor_list = self.alloc_datum(Datum::List(ListKind::List, vec![], false));
        self.globals.insert("actorList".to_string(), actor_list);
        self.globals.insert("VOID".to_string(), DatumRef::Void);
    }

    pub fn alloc_datum(&mut self, datum: Datum) -> DatumRef {
        match self.allocator.alloc_datum(datum) {
            Ok(datum_ref) => datum_ref,
            Err(err) => {
                error!("datum allocation failed: {}", err.message);
                DatumRef::Void
            }
        }
    }

    pub fn get_datum(&self, id: &DatumRef) -> &Datum {
        self.allocator.get_datum(id)
    }

    pub fn get_datum_mut(&mut self, id: &DatumRef) -> &mut Datum {
        self.allocator.get_datum_mut(id)
    }

    pub fn get_global(&self, name: &str) -> Option<&Datum> {
        self.globals.get(name).map(|datum_ref| self.get_datum(datum_ref))
    }

    pub fn push_scope(&mut self) -> Result<ScopeRef, ScriptError> {
        if self.scope_count >= self.config.max_call_depth {
            return Err(ScriptError::new("Stack overflow".to_string()));
        }
        let scope_ref = self.scope_count;
        if scope_ref == self.scopes.len() {
            self.scopes.push(Scope::new(scope_ref));
        } else {
            self.scopes[scope_ref].reset();
        }
        self.scope_count += 1;
        Ok(scope_ref)
    }

    pub fn pop_scope(&mut self) {
        self.scope_count -= 1;
    }

    pub fn current_scope_ref(&self) -> ScopeRef {
        self.scope_count - 1
    }

    /// Reads the instruction the cursor of `ctx`'s scope points at. The
    /// returned reference borrows the context, not the VM.
    pub fn current_bytecode<'a>(&self, ctx: &'a BytecodeHandlerContext) -> &'a Bytecode {
        let index = self.scopes[ctx.scope_ref].bytecode_index;
        &ctx.handler.bytecode_array[index]
    }

    /// Entry point for host events (`exitFrame`, `mouseUp`, ...). Clears
    /// the error latch and the step budget, then invokes the handler;
    /// faults are logged and latch the VM instead of propagating.
    pub fn dispatch_event(&mut self, handler_name: &str, args: &[DatumRef]) -> DatumRef {
        self.error_state = None;
        self.step_count = 0;
        self.halted = false;
        match self.call_global_handler(handler_name, args) {
            Ok(result) => result,
            // a movie without this event handler is not an error
            Err(err) if err.code == ScriptErrorCode::HandlerNotFound => DatumRef::Void,
            Err(err) => {
                self.on_script_error(handler_name, &err);
                DatumRef::Void
            }
        }
    }

    fn on_script_error(&mut self, handler_name: &str, err: &ScriptError) {
        warn!("script error in handler {handler_name}: {}", err.message);
        self.error_state = Some(format!("{handler_name}: {}", err.message));
        // unwind anything the failing dispatch left behind
        self.scope_count = 0;
    }

    /// Sends `stepFrame` to every member of the `actorList` global, in
    /// snapshot order.
    pub fn step_actors(&mut self) {
        let actor_refs = {
            let actor_list_ref = self
                .globals
                .get("actorList")
                .cloned()
                .unwrap_or(DatumRef::Void);
            match self.get_datum(&actor_list_ref) {
                Datum::List(_, items, _) => items.clone(),
                _ => vec![],
            }
        };
        for actor_ref in actor_refs {
            let result = builtins::datum_handlers::call_datum_handler(
                self,
                &actor_ref,
                "stepFrame",
                &[],
            );
            if let Err(err) = result {
                self.on_script_error("stepFrame", &err);
                return;
            }
        }
    }

    /// Looks up a handler by name the way `EXT_CALL` does: a receiver in
    /// the first argument wins, then movie scripts, then script references
    /// held in globals, then the built-in registry.
    pub fn call_global_handler(
        &mut self,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        // "new" always goes through the built-in constructor
        if !handler_name.eq_ignore_ascii_case("new") {
            if let Some((receiver, handler_ref)) = get_handler_from_first_arg(self, args, handler_name)
            {
                let scope = self.call_script_handler_raw_args(receiver, handler_ref, args, true)?;
                self.propagate_passed(&scope);
                return Ok(scope.return_value);
            }

            if let Some((receiver, handler_ref)) = self.find_global_script_handler(handler_name) {
                let scope = self.call_script_handler_raw_args(receiver, handler_ref, args, true)?;
                self.propagate_passed(&scope);
                return Ok(scope.return_value);
            }
        }

        builtins::call_builtin(self, handler_name, args)
    }

    fn find_global_script_handler(
        &self,
        handler_name: &str,
    ) -> Option<(Option<ScriptInstanceId>, ScriptHandlerRef)> {
        for script in self.movie.cast_manager.get_movie_scripts() {
            if let Some(handler_ref) = script.get_own_handler_ref(handler_name) {
                return Some((None, handler_ref));
            }
        }
        // a global may hold a script reference whose handlers are callable
        // without naming the script
        for global_ref in self.globals.values() {
            if let Datum::ScriptRef(script_ref) = self.get_datum(global_ref) {
                if let Some(script) = self.movie.cast_manager.get_script_by_ref(script_ref) {
                    if let Some(handler_ref) = script.get_own_handler_ref(handler_name) {
                        return Some((None, handler_ref));
                    }
                }
            }
        }
        None
    }

    pub fn propagate_passed(&mut self, scope: &ScopeResult) {
        if scope.passed && self.scope_count > 0 {
            let scope_ref = self.current_scope_ref();
            self.scopes[scope_ref].passed = true;
        }
    }

    pub fn call_script_handler(
        &mut self,
        receiver: Option<ScriptInstanceId>,
        handler_ref: ScriptHandlerRef,
        arg_list: &[DatumRef],
    ) -> Result<ScopeResult, ScriptError> {
        self.call_script_handler_raw_args(receiver, handler_ref, arg_list, false)
    }

    /// The handler call protocol: allocate a scope, seed it, then run the
    /// fetch-advance loop until return, error or instruction-list end.
    pub fn call_script_handler_raw_args(
        &mut self,
        receiver: Option<ScriptInstanceId>,
        handler_ref: ScriptHandlerRef,
        arg_list: &[DatumRef],
        use_raw_arg_list: bool,
    ) -> Result<ScopeResult, ScriptError> {
        let (script_member_ref, handler_name) = handler_ref;

        let script = self
            .movie
            .cast_manager
            .get_script_by_ref(&script_member_ref)
            .cloned()
            .ok_or_else(|| {
                ScriptError::new(format!(
                    "Script not found for member {}:{}",
                    script_member_ref.cast_lib, script_member_ref.cast_member
                ))
            })?;
        let handler = script.get_own_handler(&handler_name).cloned().ok_or_else(|| {
            ScriptError::new_code(
                ScriptErrorCode::HandlerNotFound,
                format!("Handler {handler_name} not found for script {}", script.name),
            )
        })?;

        // method calls get `me` as their implicit first argument
        let receiver_arg = if let Some(instance_id) = receiver {
            Some(Datum::ScriptInstance(instance_id))
        } else if script.script_type != ScriptType::Movie {
            Some(Datum::ScriptRef(script_member_ref.clone()))
        } else {
            None
        };

        let scope_ref = self.push_scope()?;
        {
            let scope = &mut self.scopes[scope_ref];
            scope.script_ref = script_member_ref;
            scope.receiver = receiver;
            scope.handler_name = handler_name;
        }
        if let Some(receiver_arg) = receiver_arg {
            if !use_raw_arg_list {
                let arg_ref = self.alloc_datum(receiver_arg);
                self.scopes[scope_ref].args.push(arg_ref);
            }
        }
        self.scopes[scope_ref].args.extend_from_slice(arg_list);

        let ctx = BytecodeHandlerContext {
            scope_ref,
            script,
            handler,
        };

        loop {
            if self.halted {
                break;
            }
            {
                let scope = &self.scopes[scope_ref];
                if scope.bytecode_index >= ctx.handler.bytecode_array.len() || scope.returned {
                    break;
                }
            }

            self.step_count += 1;
            if self.step_count > self.config.step_limit {
                self.pop_scope();
                return Err(ScriptError::new_code(
                    ScriptErrorCode::StepLimit,
                    "Step limit exceeded".to_string(),
                ));
            }

            match execute_bytecode(self, &ctx) {
                Ok(HandlerExecutionResult::Advance) => {
                    self.scopes[scope_ref].bytecode_index += 1;
                }
                Ok(HandlerExecutionResult::Jump) => {}
                Ok(HandlerExecutionResult::Stop) => {
                    self.scopes[scope_ref].returned = true;
                    break;
                }
                Ok(HandlerExecutionResult::Error(err)) | Err(err) => {
                    self.scopes[scope_ref].error = true;
                    self.pop_scope();
                    return Err(err);
                }
            }
        }

        let result = {
            let scope = &mut self.scopes[scope_ref];
            scope.stack.clear();
            ScopeResult {
                return_value: scope.return_value.clone(),
                passed: scope.passed,
            }
        };
        self.last_handler_result = result.return_value.clone();
        self.pop_scope();
        Ok(result)
    }

    /// `EXT_CALL` entry: the `return` pseudo-handler short-circuits, an
    /// unresolved name degrades to `Void` with a diagnostic.
    pub fn ext_call(
        &mut self,
        name: &str,
        args: &[DatumRef],
        scope_ref: ScopeRef,
    ) -> (HandlerExecutionResult, DatumRef) {
        if name.eq_ignore_ascii_case("return") {
            let return_value = args.first().cloned().unwrap_or(DatumRef::Void);
            self.scopes[scope_ref].return_value = return_value.clone();
            return (HandlerExecutionResult::Stop, return_value);
        }
        match self.call_global_handler(name, args) {
            Ok(result) => {
                self.last_handler_result = result.clone();
                self.scopes[scope_ref].return_value = result.clone();
                (HandlerExecutionResult::Advance, result)
            }
            Err(err) if err.code == ScriptErrorCode::HandlerNotFound => {
                warn!("Unknown handler {name}");
                (HandlerExecutionResult::Advance, DatumRef::Void)
            }
            Err(err) => (HandlerExecutionResult::Error(err), DatumRef::Void),
        }
    }

    /// Movie properties answered by the VM itself (clock, focus state),
    /// falling through to the host provider and then the movie record.
    pub fn get_movie_prop(&mut self, prop: &str) -> Result<DatumRef, ScriptError> {
        let now = chrono::Local::now();
        match prop {
            "milliSeconds" => {
                let elapsed = now.signed_duration_since(self.start_time).num_milliseconds();
                Ok(self.alloc_datum(Datum::Int(elapsed as i32)))
            }
            "ticks" | "timer" => {
                let elapsed = now.signed_duration_since(self.start_time).num_milliseconds();
                Ok(self.alloc_datum(Datum::Int((elapsed * 60 / 1000) as i32)))
            }
            "time" | "short time" => {
                Ok(self.alloc_datum(Datum::String(now.format("%H:%M %p").to_string())))
            }
            "abbr time" | "long time" => {
                Ok(self.alloc_datum(Datum::String(now.format("%H:%M:%S %p").to_string())))
            }
            "date" | "short date" => {
                Ok(self.alloc_datum(Datum::String(now.format("%m/%d/%y").to_string())))
            }
            "abbr date" => Ok(self.alloc_datum(Datum::String(now.format("%d-%b-%y").to_string()))),
            "long date" => {
                Ok(self.alloc_datum(Datum::String(now.format("%A, %B %d, %Y").to_string())))
            }
            "floatPrecision" => Ok(self.alloc_datum(Datum::Int(self.float_precision as i32))),
            "result" => Ok(self.last_handler_result.clone()),
            "actorList" => Ok(self
                .globals
                .get("actorList")
                .cloned()
                .unwrap_or(DatumRef::Void)),
            _ => {
                if let Some(provider) = self.providers.movie.as_mut() {
                    if let Some(datum) = provider.get_movie_prop(prop) {
                        return Ok(self.alloc_datum(datum));
                    }
                }
                match self.movie.get_prop(prop) {
                    Ok(datum) => Ok(self.alloc_datum(datum)),
                    Err(_) => {
                        warn!("unknown movie property {prop}");
                        Ok(DatumRef::Void)
                    }
                }
            }
        }
    }

    pub fn set_movie_prop(&mut self, prop: &str, value: Datum) -> Result<(), ScriptError> {
        match prop {
            "floatPrecision" => {
                self.float_precision = value.int_value()? as u8;
                Ok(())
            }
            "actorList" => match value {
                Datum::List(kind, items, sorted) => {
                    let new_list = self.alloc_datum(Datum::List(kind, items, sorted));
                    self.globals.insert("actorList".to_string(), new_list);
                    Ok(())
                }
                _ => Err(ScriptError::new("actorList must be a list".to_string())),
            },
            _ => {
                if self.movie.set_prop(prop, value.clone()).is_ok() {
                    return Ok(());
                }
                if let Some(provider) = self.providers.movie.as_mut() {
                    provider.set_movie_prop(prop, value);
                }
                Ok(())
            }
        }
    }

    pub fn get_anim_prop(&mut self, prop_id: u16) -> Result<Datum, ScriptError> {
        let prop_name = get_anim_prop_name(prop_id)
            .ok_or_else(|| ScriptError::new(format!("Unknown anim prop id {prop_id}")))?;
        match prop_name {
            "colorDepth" => Ok(Datum::Int(32)),
            "timer" => {
                let elapsed = chrono::Local::now()
                    .signed_duration_since(self.start_time)
                    .num_milliseconds();
                Ok(Datum::Int((elapsed * 60 / 1000) as i32))
            }
            "netPresent" => Ok(datum_bool(true)),
            "exitLock" => Ok(datum_bool(self.movie.exit_lock)),
            "stageColor" => Ok(Datum::Int(0)),
            _ => {
                if let Some(provider) = self.providers.movie.as_mut() {
                    if let Some(datum) = provider.get_movie_prop(prop_name) {
                        return Ok(datum);
                    }
                }
                Ok(Datum::Void)
            }
        }
    }

    pub fn get_anim2_prop(&mut self, prop_id: u16) -> Result<Datum, ScriptError> {
        let prop_name = get_anim2_prop_name(prop_id)
            .ok_or_else(|| ScriptError::new(format!("Unknown anim2 prop id {prop_id}")))?;
        match prop_name {
            "number of castLibs" => {
                Ok(Datum::Int(self.movie.cast_manager.casts.len() as i32))
            }
            "number of castMembers" => Ok(Datum::Int(
                self.movie
                    .cast_manager
                    .casts
                    .iter()
                    .map(|cast_lib| cast_lib.members.len() as i32)
                    .sum(),
            )),
            _ => Ok(Datum::Void),
        }
    }

    /// Deep-copies lists, prop lists and images; everything else copies by
    /// value.
    pub fn duplicate_datum(&mut self, datum_ref: &DatumRef) -> DatumRef {
        let datum = self.get_datum(datum_ref).clone();
        let new_datum = match datum {
            Datum::PropList(pairs, sorted) => {
                let mut new_pairs = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let new_key = self.duplicate_datum(&key);
                    let new_value = self.duplicate_datum(&value);
                    new_pairs.push((new_key, new_value));
                }
                Datum::PropList(new_pairs, sorted)
            }
            Datum::List(kind, items, sorted) => {
                let mut new_items = Vec::with_capacity(items.len());
                for item in items {
                    new_items.push(self.duplicate_datum(&item));
                }
                Datum::List(kind, new_items, sorted)
            }
            Datum::Image(bitmap_ref) => {
                let duplicate = self.bitmap_manager.get_bitmap(bitmap_ref).cloned();
                match duplicate {
                    Some(bitmap) => Datum::Image(self.bitmap_manager.add_bitmap(bitmap)),
                    None => Datum::Void,
                }
            }
            other => other,
        };
        self.alloc_datum(new_datum)
    }

    /// Kicks off host fetches for external casts whose preload mode fires
    /// for `reason`, and integrates any fetches that have completed.
    pub fn preload_casts(&mut self, reason: CastPreloadReason) {
        let cast_count = self.movie.cast_manager.casts.len();
        for index in 0..cast_count {
            let (should_fetch, file_name) = {
                let cast = &self.movie.cast_manager.casts[index];
                let mode_matches = match reason {
                    CastPreloadReason::MovieLoaded => {
                        cast.preload_mode == cast_lib::PreloadMode::BeforeFrameOne
                    }
                    CastPreloadReason::AfterFrameOne => {
                        cast.preload_mode == cast_lib::PreloadMode::AfterFrameOne
                    }
                    CastPreloadReason::MemberAccess => true,
                };
                (
                    cast.is_external() && cast.state == CastLoadState::None && mode_matches,
                    cast.file_name.clone(),
                )
            };
            if should_fetch {
                if let Some(net) = self.providers.net.as_mut() {
                    let task_id = net.preload_net_thing(&file_name);
                    self.movie.cast_manager.casts[index].state = CastLoadState::Loading(task_id);
                }
            }
        }
        self.poll_external_casts();
    }

    /// Integrates external casts whose fetch tasks have completed. Safe to
    /// call every tick; loads nothing twice.
    pub fn poll_external_casts(&mut self) {
        let cast_count = self.movie.cast_manager.casts.len();
        for index in 0..cast_count {
            let task_id = match self.movie.cast_manager.casts[index].state {
                CastLoadState::Loading(task_id) => task_id,
                _ => continue,
            };
            let bytes = match self.providers.net.as_mut() {
                Some(net) => {
                    if !net.net_done(task_id) {
                        continue;
                    }
                    net.net_byte_result(task_id)
                }
                _ => continue,
            };
            let cast = &mut self.movie.cast_manager.casts[index];
            match bytes {
                Some(bytes) => {
                    let file_name = cast.file_name.clone();
                    match crate::director::file::read_director_file_bytes(&bytes, &file_name) {
                        Ok(cast_file) => {
                            cast.load_from_dir_file(&cast_file, &mut self.bitmap_manager);
                        }
                        Err(err) => {
                            warn!("could not parse external cast {file_name}: {err}");
                            cast.state = CastLoadState::Loaded;
                        }
                    }
                }
                None => {
                    warn!("fetching external cast {} failed", cast.file_name);
                    cast.state = CastLoadState::Loaded;
                }
            }
        }
    }
}

impl Default for LingoVm {
    fn default() -> Self {
        Self::new()
    }
}
