mod common;

use common::{bc, script_ref, vm_with_scripts, ScriptSpec};
use shockvm::director::enums::ScriptType;
use shockvm::director::lingo::datum::{Datum, ListKind};
use shockvm::director::lingo::opcode::OpCode;
use shockvm::vm::builtins::datum_handlers::call_datum_handler;
use shockvm::vm::builtins::datum_handlers::script::new_script_instance;
use shockvm::vm::datum_ref::DatumRef;

fn prop_list_fixture(vm: &mut shockvm::vm::LingoVm) -> DatumRef {
    let key_foo = vm.alloc_datum(Datum::String("foo".to_string()));
    let value_foo = vm.alloc_datum(Datum::Int(1));
    let key_bar = vm.alloc_datum(Datum::String("bar".to_string()));
    let value_bar = vm.alloc_datum(Datum::Int(2));
    vm.alloc_datum(Datum::PropList(
        vec![(key_foo, value_foo), (key_bar, value_bar)],
        false,
    ))
}

#[test]
fn prop_list_get_at_by_symbol_key() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let plist = prop_list_fixture(&mut vm);

    let key = vm.alloc_datum(Datum::Symbol("bar".to_string()));
    let result = call_datum_handler(&mut vm, &plist, "getAt", &[key]).unwrap();
    match vm.get_datum(&result) {
        Datum::Int(2) => {}
        other => panic!("expected Int(2), got {}", other.type_str()),
    }
}

#[test]
fn prop_list_find_pos() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let plist = prop_list_fixture(&mut vm);

    let key = vm.alloc_datum(Datum::Symbol("bar".to_string()));
    let result = call_datum_handler(&mut vm, &plist, "findPos", &[key]).unwrap();
    match vm.get_datum(&result) {
        Datum::Int(2) => {}
        other => panic!("expected Int(2), got {}", other.type_str()),
    }

    let missing = vm.alloc_datum(Datum::Symbol("baz".to_string()));
    let result = call_datum_handler(&mut vm, &plist, "findPos", &[missing]).unwrap();
    assert!(matches!(result, DatumRef::Void));
}

#[test]
fn list_set_at_pads_with_void() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let list = vm.alloc_datum(Datum::List(ListKind::List, vec![], false));

    let index = vm.alloc_datum(Datum::Int(3));
    let value = vm.alloc_datum(Datum::Int(99));
    call_datum_handler(&mut vm, &list, "setAt", &[index, value]).unwrap();

    let items = vm.get_datum(&list).to_list().unwrap().clone();
    assert_eq!(items.len(), 3);
    assert!(matches!(vm.get_datum(&items[0]), Datum::Void));
    assert!(matches!(vm.get_datum(&items[1]), Datum::Void));
    assert!(matches!(vm.get_datum(&items[2]), Datum::Int(99)));
}

/// Script `A` defines `dump`; an instance of `B` whose ancestor is an `A`
/// instance dispatches `dump` to `A`'s handler with `me` still bound to
/// the `B` instance.
#[test]
fn ancestor_dispatch_preserves_receiver() {
    // handler "dump" returns its first arg (me)
    let dump = vec![bc(OpCode::GetParam, 0, 0), bc(OpCode::Ret, 0, 1)];
    let mut vm = vm_with_scripts(
        vec!["dump"],
        vec![
            ScriptSpec {
                slot: 1,
                name: "A",
                script_type: ScriptType::Parent,
                handlers: vec![(0, dump)],
                literals: vec![],
                property_name_ids: vec![],
            },
            ScriptSpec {
                slot: 2,
                name: "B",
                script_type: ScriptType::Parent,
                handlers: vec![],
                literals: vec![],
                property_name_ids: vec![],
            },
        ],
    );

    let a_instance = new_script_instance(&mut vm, &script_ref(1), &[]).unwrap();
    let b_instance = new_script_instance(&mut vm, &script_ref(2), &[]).unwrap();
    let b_id = vm.get_datum(&b_instance).to_script_instance_id().unwrap();

    let ancestor_key = vm.alloc_datum(Datum::String("ancestor".to_string()));
    call_datum_handler(&mut vm, &b_instance, "setaProp", &[ancestor_key, a_instance]).unwrap();

    let result = call_datum_handler(&mut vm, &b_instance, "dump", &[]).unwrap();
    let receiver_id = vm.get_datum(&result).to_script_instance_id().unwrap();
    assert_eq!(receiver_id, b_id, "me must stay bound to the B instance");
}

#[test]
fn ancestor_property_reads_walk_the_chain() {
    let mut vm = vm_with_scripts(
        vec!["health"],
        vec![
            ScriptSpec {
                slot: 1,
                name: "A",
                script_type: ScriptType::Parent,
                handlers: vec![],
                literals: vec![],
                property_name_ids: vec![0],
            },
            ScriptSpec {
                slot: 2,
                name: "B",
                script_type: ScriptType::Parent,
                handlers: vec![],
                literals: vec![],
                property_name_ids: vec![],
            },
        ],
    );

    let a_instance = new_script_instance(&mut vm, &script_ref(1), &[]).unwrap();
    let a_id = vm.get_datum(&a_instance).to_script_instance_id().unwrap();
    let value = vm.alloc_datum(Datum::Int(77));
    shockvm::vm::script::script_set_prop(&mut vm, a_id, "health", &value, false).unwrap();

    let b_instance = new_script_instance(&mut vm, &script_ref(2), &[]).unwrap();
    let b_id = vm.get_datum(&b_instance).to_script_instance_id().unwrap();
    let ancestor_key = vm.alloc_datum(Datum::String("ancestor".to_string()));
    call_datum_handler(&mut vm, &b_instance, "setaProp", &[ancestor_key, a_instance]).unwrap();

    let read = shockvm::vm::script::script_get_prop(&mut vm, b_id, "health").unwrap();
    match vm.get_datum(&read) {
        Datum::Int(77) => {}
        other => panic!("expected Int(77), got {}", other.type_str()),
    }
}

/// Self-referential ancestor chains are bounded; lookups come back Void
/// instead of hanging.
#[test]
fn ancestor_cycles_are_bounded() {
    let mut vm = vm_with_scripts(
        vec![],
        vec![ScriptSpec {
            slot: 1,
            name: "A",
            script_type: ScriptType::Parent,
            handlers: vec![],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );

    let instance = new_script_instance(&mut vm, &script_ref(1), &[]).unwrap();
    let instance_id = vm.get_datum(&instance).to_script_instance_id().unwrap();
    // point the instance at itself
    vm.allocator.get_script_instance_mut(instance_id).ancestor = Some(instance_id);

    let result =
        shockvm::vm::script::script_get_prop_opt(&mut vm, instance_id, "missing").unwrap();
    assert!(matches!(result, DatumRef::Void));

    let dispatched = call_datum_handler(&mut vm, &instance, "noSuchMethod", &[]).unwrap();
    assert!(matches!(dispatched, DatumRef::Void));
}

#[test]
fn string_chunk_methods() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let string = vm.alloc_datum(Datum::String("madam in eden im adam".to_string()));

    let index = vm.alloc_datum(Datum::Int(2));
    let word = call_datum_handler(&mut vm, &string, "word", &[index]).unwrap();
    assert_eq!(vm.get_datum(&word).string_value().unwrap(), "in");

    let start = vm.alloc_datum(Datum::Int(1));
    let end = vm.alloc_datum(Datum::Int(5));
    let chars = call_datum_handler(&mut vm, &string, "char", &[start, end]).unwrap();
    assert_eq!(vm.get_datum(&chars).string_value().unwrap(), "madam");
}
