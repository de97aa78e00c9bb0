mod common;

use common::vm_with_scripts;
use shockvm::director::lingo::datum::Datum;
use shockvm::vm::datum_ref::DatumRef;
use shockvm::vm::eval::eval_lingo_value;

#[test]
fn parses_integers_and_floats() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "42").unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(42)));

    let result = eval_lingo_value(&mut vm, "-7").unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(-7)));

    let result = eval_lingo_value(&mut vm, "3.25").unwrap();
    match vm.get_datum(&result) {
        Datum::Float(value) => assert!((value - 3.25).abs() < 1e-9),
        other => panic!("expected Float, got {}", other.type_str()),
    }
}

#[test]
fn parses_strings_and_symbols() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "\"hello\"").unwrap();
    assert_eq!(vm.get_datum(&result).string_value().unwrap(), "hello");

    let result = eval_lingo_value(&mut vm, "#banana").unwrap();
    assert_eq!(vm.get_datum(&result).symbol_value().unwrap(), "banana");
}

/// The partial-parse contract: the initial valid portion wins.
#[test]
fn partial_parse_returns_the_valid_prefix() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "3 5").unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(3)));

    let result = eval_lingo_value(&mut vm, "12 monkeys").unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(12)));
}

#[test]
fn unbound_identifier_is_void() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let result = eval_lingo_value(&mut vm, "penny").unwrap();
    assert!(matches!(result, DatumRef::Void));
}

#[test]
fn parses_lists_with_nesting() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "[1, 2, 3]").unwrap();
    let items = vm.get_datum(&result).to_list().unwrap().clone();
    assert_eq!(items.len(), 3);
    assert!(matches!(vm.get_datum(&items[2]), Datum::Int(3)));

    let result = eval_lingo_value(&mut vm, "[]").unwrap();
    assert!(vm.get_datum(&result).to_list().unwrap().is_empty());
}

/// `value("[#a:1, #b:[2,3]]")` yields a property list with a nested list.
#[test]
fn parses_nested_prop_lists() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "[#a:1, #b:[2,3]]").unwrap();
    let pairs = vm.get_datum(&result).to_map().unwrap().clone();
    assert_eq!(pairs.len(), 2);

    assert_eq!(vm.get_datum(&pairs[0].0).symbol_value().unwrap(), "a");
    assert!(matches!(vm.get_datum(&pairs[0].1), Datum::Int(1)));

    assert_eq!(vm.get_datum(&pairs[1].0).symbol_value().unwrap(), "b");
    let nested = vm.get_datum(&pairs[1].1).to_list().unwrap().clone();
    assert_eq!(nested.len(), 2);
    assert!(matches!(vm.get_datum(&nested[0]), Datum::Int(2)));
    assert!(matches!(vm.get_datum(&nested[1]), Datum::Int(3)));
}

#[test]
fn parses_empty_prop_list() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let result = eval_lingo_value(&mut vm, "[:]").unwrap();
    assert!(vm.get_datum(&result).to_map().unwrap().is_empty());
}

#[test]
fn parses_geometry_constructors() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let result = eval_lingo_value(&mut vm, "point(10, 20)").unwrap();
    assert_eq!(vm.get_datum(&result).to_point().unwrap(), (10, 20));

    let result = eval_lingo_value(&mut vm, "rect(1, 2, 3, 4)").unwrap();
    assert_eq!(vm.get_datum(&result).to_rect().unwrap(), (1, 2, 3, 4));
}

#[test]
fn whole_string_failure_is_void() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let result = eval_lingo_value(&mut vm, ",,,").unwrap();
    assert!(matches!(result, DatumRef::Void));
}

/// `value(string(x))` round-trips simple literals.
#[test]
fn round_trips_simple_literals() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    for input in ["17", "-3", "2.5", "#sym", "\"plain\""] {
        let first = eval_lingo_value(&mut vm, input).unwrap();
        let formatted = shockvm::vm::datum_formatting::format_datum(&first, &vm);
        let second = eval_lingo_value(&mut vm, &formatted).unwrap();
        let left = vm.get_datum(&first).clone();
        let right = vm.get_datum(&second).clone();
        assert!(
            shockvm::vm::compare::datum_equals(&left, &right, &vm.allocator).unwrap(),
            "round trip failed for {input}: {formatted}"
        );
    }
}
