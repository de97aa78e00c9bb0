mod common;

use common::{bc, script_ref, vm_with_scripts, ScriptSpec};
use shockvm::director::enums::ScriptType;
use shockvm::director::lingo::datum::Datum;
use shockvm::director::lingo::opcode::OpCode;
use shockvm::vm::datum_ref::DatumRef;
use shockvm::vm::ScriptErrorCode;

#[test]
fn add_two_ints_returns_seven() {
    let mut vm = vm_with_scripts(
        vec!["test"],
        vec![ScriptSpec {
            slot: 1,
            name: "arith",
            script_type: ScriptType::Movie,
            handlers: vec![(
                0,
                vec![
                    bc(OpCode::PushInt8, 3, 0),
                    bc(OpCode::PushInt8, 4, 1),
                    bc(OpCode::Add, 0, 2),
                    bc(OpCode::Ret, 0, 3),
                ],
            )],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );

    let result = vm
        .call_script_handler(None, (script_ref(1), "test".to_string()), &[])
        .unwrap();
    match vm.get_datum(&result.return_value) {
        Datum::Int(7) => {}
        other => panic!("expected Int(7), got {}", other.type_str()),
    }
}

#[test]
fn division_by_zero_is_a_script_error() {
    let mut vm = vm_with_scripts(
        vec!["crash"],
        vec![ScriptSpec {
            slot: 1,
            name: "arith",
            script_type: ScriptType::Movie,
            handlers: vec![(
                0,
                vec![
                    bc(OpCode::PushInt8, 1, 0),
                    bc(OpCode::PushInt8, 0, 1),
                    bc(OpCode::Div, 0, 2),
                    bc(OpCode::Ret, 0, 3),
                ],
            )],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );

    let err = vm
        .call_script_handler(None, (script_ref(1), "crash".to_string()), &[])
        .unwrap_err();
    assert!(err.message.contains("Division by zero"));

    // dispatched as a host event, the fault latches the VM and yields Void
    let result = vm.dispatch_event("crash", &[]);
    assert!(matches!(result, DatumRef::Void));
    assert!(vm.error_state.is_some());

    // the next external event clears the latch
    vm.dispatch_event("noSuchHandler", &[]);
    assert!(vm.error_state.is_none());
}

#[test]
fn float_promotion_in_arithmetic() {
    let mut vm = vm_with_scripts(
        vec!["test"],
        vec![ScriptSpec {
            slot: 1,
            name: "arith",
            script_type: ScriptType::Movie,
            handlers: vec![(
                0,
                vec![
                    bc(OpCode::PushInt8, 3, 0),
                    bc(OpCode::PushFloat32, 0.5f32.to_bits() as i64, 1),
                    bc(OpCode::Add, 0, 2),
                    bc(OpCode::Ret, 0, 3),
                ],
            )],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );

    let result = vm
        .call_script_handler(None, (script_ref(1), "test".to_string()), &[])
        .unwrap();
    match vm.get_datum(&result.return_value) {
        Datum::Float(value) => assert!((value - 3.5).abs() < 1e-9),
        other => panic!("expected Float(3.5), got {}", other.type_str()),
    }
}

#[test]
fn push_cons_reads_the_literal_table() {
    let mut vm = vm_with_scripts(
        vec!["test"],
        vec![ScriptSpec {
            slot: 1,
            name: "lits",
            script_type: ScriptType::Movie,
            handlers: vec![(
                0,
                vec![bc(OpCode::PushCons, 0, 0), bc(OpCode::Ret, 0, 1)],
            )],
            literals: vec![Datum::String("backstage".to_string())],
            property_name_ids: vec![],
        }],
    );

    let result = vm
        .call_script_handler(None, (script_ref(1), "test".to_string()), &[])
        .unwrap();
    assert_eq!(
        vm.get_datum(&result.return_value).string_value().unwrap(),
        "backstage"
    );
}

/// `repeat with i = 2 to the paramCount` must terminate without growing
/// the operand stack across iterations: the inline arg-list marker of
/// `THE_BUILTIN` has to be consumed on every evaluation.
#[test]
fn param_count_loop_terminates() {
    let mut vm = vm_with_scripts(
        vec!["paramCount", "i", "loopy"],
        vec![ScriptSpec {
            slot: 1,
            name: "loops",
            script_type: ScriptType::Movie,
            handlers: vec![(
                2,
                vec![
                    bc(OpCode::PushInt8, 0, 0),
                    bc(OpCode::SetLocal, 0, 1),
                    bc(OpCode::GetLocal, 0, 2),
                    bc(OpCode::PushArgList, 0, 3),
                    bc(OpCode::TheBuiltin, 0, 4),
                    bc(OpCode::Lt, 0, 5),
                    bc(OpCode::JmpIfZ, 6, 6),
                    bc(OpCode::GetLocal, 0, 7),
                    bc(OpCode::PushInt8, 1, 8),
                    bc(OpCode::Add, 0, 9),
                    bc(OpCode::SetLocal, 0, 10),
                    bc(OpCode::EndRepeat, 9, 11),
                    bc(OpCode::Ret, 0, 12),
                ],
            )],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );
    // locals table: name id 1 ("i")
    {
        let cast = &mut vm.movie.cast_manager.casts[0];
        let script = std::rc::Rc::get_mut(cast.scripts.get_mut(&1).unwrap()).unwrap();
        let handler = std::rc::Rc::get_mut(script.handlers.get_mut("loopy").unwrap()).unwrap();
        handler.local_name_ids = vec![1];
    }

    let args = vec![
        vm.alloc_datum(Datum::Int(10)),
        vm.alloc_datum(Datum::Int(20)),
        vm.alloc_datum(Datum::Int(30)),
    ];
    let result = vm
        .call_script_handler(None, (script_ref(1), "loopy".to_string()), &args)
        .unwrap();
    // the loop ran 3 times and exited; nothing leaked into the result
    assert!(matches!(result.return_value, DatumRef::Void));
    assert!(vm.error_state.is_none());
}

/// The legacy encoding of `THE_BUILTIN` without an arg-list marker must
/// not eat a live operand.
#[test]
fn the_builtin_marker_handling() {
    let spec = |with_marker: bool| {
        let mut instructions = vec![bc(OpCode::PushInt8, 42, 0)];
        let mut pos = 1;
        if with_marker {
            instructions.push(bc(OpCode::PushArgList, 0, pos));
            pos += 1;
        }
        instructions.push(bc(OpCode::TheBuiltin, 0, pos));
        instructions.push(bc(OpCode::Pop, 1, pos + 1));
        instructions.push(bc(OpCode::Ret, 0, pos + 2));
        instructions
    };

    for with_marker in [true, false] {
        let mut vm = vm_with_scripts(
            vec!["paramCount", "test"],
            vec![ScriptSpec {
                slot: 1,
                name: "markers",
                script_type: ScriptType::Movie,
                handlers: vec![(1, spec(with_marker))],
                literals: vec![],
                property_name_ids: vec![],
            }],
        );
        let result = vm
            .call_script_handler(None, (script_ref(1), "test".to_string()), &[])
            .unwrap();
        match vm.get_datum(&result.return_value) {
            Datum::Int(42) => {}
            other => panic!(
                "marker={with_marker}: expected Int(42), got {}",
                other.type_str()
            ),
        }
    }
}

#[test]
fn unknown_handler_degrades_to_void() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let err = vm.call_global_handler("definitelyNotAHandler", &[]).unwrap_err();
    assert_eq!(err.code, ScriptErrorCode::HandlerNotFound);

    let result = vm.dispatch_event("definitelyNotAHandler", &[]);
    assert!(matches!(result, DatumRef::Void));
    assert!(vm.error_state.is_none());
}

#[test]
fn step_limit_stops_runaway_loops() {
    let mut config = shockvm::vm::config::VmConfig::default();
    config.step_limit = 1_000;
    let mut vm = vm_with_scripts(
        vec!["spin"],
        vec![ScriptSpec {
            slot: 1,
            name: "spin",
            script_type: ScriptType::Movie,
            handlers: vec![(
                0,
                vec![
                    // jump to self forever
                    bc(OpCode::Jmp, 0, 0),
                    bc(OpCode::Ret, 0, 1),
                ],
            )],
            literals: vec![],
            property_name_ids: vec![],
        }],
    );
    vm.config = config;

    let err = vm
        .call_script_handler(None, (script_ref(1), "spin".to_string()), &[])
        .unwrap_err();
    assert_eq!(err.code, ScriptErrorCode::StepLimit);
}
