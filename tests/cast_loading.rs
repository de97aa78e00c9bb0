mod common;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use common::{
    build_afterburner, build_cast_assoc, build_cast_list, build_config, build_field_cast_member,
    build_key_table,
};
use shockvm::director::file::read_director_file_bytes;
use shockvm::director::lingo::datum::Datum;
use shockvm::vm::cast_lib::{cast_file_candidates, CastLoadState};
use shockvm::vm::providers::{NetTaskId, NetworkProvider};
use shockvm::vm::LingoVm;

/// A network provider that serves canned bytes for every URL and records
/// the fetches it saw.
struct CannedNet {
    responses: HashMap<String, Vec<u8>>,
    fetched: Rc<RefCell<Vec<String>>>,
    tasks: HashMap<NetTaskId, String>,
    next_task: NetTaskId,
}

impl CannedNet {
    fn new(responses: HashMap<String, Vec<u8>>, fetched: Rc<RefCell<Vec<String>>>) -> CannedNet {
        CannedNet {
            responses,
            fetched,
            tasks: HashMap::new(),
            next_task: 1,
        }
    }
}

impl NetworkProvider for CannedNet {
    fn preload_net_thing(&mut self, url: &str) -> NetTaskId {
        let task_id = self.next_task;
        self.next_task += 1;
        self.fetched.borrow_mut().push(url.to_string());
        self.tasks.insert(task_id, url.to_string());
        task_id
    }

    fn post_net_text(&mut self, url: &str, _body: &str) -> NetTaskId {
        self.preload_net_thing(url)
    }

    fn net_done(&mut self, _task_id: NetTaskId) -> bool {
        true
    }

    fn net_text_result(&mut self, task_id: NetTaskId) -> Option<String> {
        self.net_byte_result(task_id)
            .map(|bytes| bytes.iter().map(|&b| b as char).collect())
    }

    fn net_byte_result(&mut self, task_id: NetTaskId) -> Option<Vec<u8>> {
        let url = self.tasks.get(&task_id)?;
        self.responses.get(url).cloned()
    }

    fn net_error(&mut self, _task_id: NetTaskId) -> Option<String> {
        None
    }

    fn get_stream_status(&mut self, _task_id: NetTaskId) -> Option<Datum> {
        None
    }
}

fn external_cast_bytes() -> Vec<u8> {
    build_afterburner(&[
        (3, "KEY*", build_key_table(&[])),
        (4, "DRCF", build_config()),
        (5, "CAS*", build_cast_assoc(&[6])),
        (6, "CASt", build_field_cast_member("hello")),
    ])
}

fn movie_with_external_cast() -> Vec<u8> {
    // the MCsL names a cast whose id no CAS* in this movie covers
    build_afterburner(&[
        (3, "KEY*", build_key_table(&[])),
        (4, "DRCF", build_config()),
        (5, "MCsL", build_cast_list("sprites", "assets:casts:sprites.cst", 2, 1025)),
    ])
}

#[test]
fn external_path_normalisation() {
    assert_eq!(
        cast_file_candidates("assets:casts:sprites.cst"),
        vec!["sprites.cct", "sprites.cst", "sprites.cxt"]
    );
    assert_eq!(
        cast_file_candidates("plain.cxt"),
        vec!["plain.cct", "plain.cst", "plain.cxt"]
    );
}

/// A DCR declaring one external cast starts in NONE; after the host
/// supplies bytes the library is LOADED and members are addressable by
/// name.
#[test]
fn external_cast_lifecycle() {
    let movie = read_director_file_bytes(&movie_with_external_cast(), "movie.dcr").unwrap();
    assert_eq!(movie.cast_entries.len(), 1);

    let mut vm = LingoVm::new();
    vm.load_movie(&movie);

    {
        let cast = &vm.movie.cast_manager.casts[0];
        assert!(cast.is_external());
        assert_eq!(cast.state, CastLoadState::None);
        assert_eq!(
            cast.preload_mode,
            shockvm::vm::cast_lib::PreloadMode::BeforeFrameOne
        );
    }

    // member lookups before the load degrade to Void
    let member_ref = vm.movie.cast_manager.find_member_ref_by_name("hello");
    assert!(member_ref.is_none());

    let fetched = Rc::new(RefCell::new(Vec::new()));
    let mut responses = HashMap::new();
    responses.insert("sprites.cct".to_string(), external_cast_bytes());
    vm.providers.net = Some(Box::new(CannedNet::new(responses, fetched.clone())));

    vm.preload_casts(shockvm::vm::cast_manager::CastPreloadReason::MovieLoaded);

    {
        let cast = &vm.movie.cast_manager.casts[0];
        assert_eq!(cast.state, CastLoadState::Loaded);
    }
    assert_eq!(fetched.borrow().as_slice(), &["sprites.cct".to_string()]);

    // now addressable through the member builtin
    let name = vm.alloc_datum(Datum::String("hello".to_string()));
    let member = shockvm::vm::builtins::call_builtin(&mut vm, "member", &[name]).unwrap();
    match vm.get_datum(&member) {
        Datum::CastMember(member_ref) => {
            assert_eq!(member_ref.cast_lib, 1);
            assert_eq!(member_ref.cast_member, 1);
        }
        other => panic!("expected a cast member, got {}", other.type_str()),
    }
}

#[test]
fn when_needed_casts_wait_for_member_access() {
    let movie_bytes = build_afterburner(&[
        (3, "KEY*", build_key_table(&[])),
        (4, "DRCF", build_config()),
        // preload settings 0: when needed
        (5, "MCsL", build_cast_list("lazy", "lazy.cst", 0, 1025)),
    ]);
    let movie = read_director_file_bytes(&movie_bytes, "movie.dcr").unwrap();

    let mut vm = LingoVm::new();
    vm.load_movie(&movie);

    let fetched = Rc::new(RefCell::new(Vec::new()));
    let mut responses = HashMap::new();
    responses.insert("lazy.cct".to_string(), external_cast_bytes());
    vm.providers.net = Some(Box::new(CannedNet::new(responses, fetched.clone())));

    // a movie-loaded sweep leaves when-needed casts untouched
    vm.preload_casts(shockvm::vm::cast_manager::CastPreloadReason::MovieLoaded);
    assert_eq!(vm.movie.cast_manager.casts[0].state, CastLoadState::None);
    assert!(fetched.borrow().is_empty());

    // first member access triggers the fetch
    let name = vm.alloc_datum(Datum::String("hello".to_string()));
    let _ = shockvm::vm::builtins::call_builtin(&mut vm, "member", &[name]).unwrap();
    assert_eq!(vm.movie.cast_manager.casts[0].state, CastLoadState::Loaded);
}
