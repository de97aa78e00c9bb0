mod common;

use common::vm_with_scripts;
use shockvm::director::lingo::datum::{ColorRef, Datum, ListKind};
use shockvm::vm::builtins::call_builtin;
use shockvm::vm::builtins::types::TypeUtils;
use shockvm::vm::compare::{datum_equals, datum_less_than};
use shockvm::vm::datum_formatting::format_float;

#[test]
fn void_equals_numeric_zero() {
    let vm = vm_with_scripts(vec![], vec![]);
    assert!(datum_equals(&Datum::Void, &Datum::Int(0), &vm.allocator).unwrap());
    assert!(datum_equals(&Datum::Int(0), &Datum::Void, &vm.allocator).unwrap());
    assert!(!datum_equals(&Datum::Void, &Datum::Int(1), &vm.allocator).unwrap());
}

#[test]
fn cross_type_numeric_equality() {
    let vm = vm_with_scripts(vec![], vec![]);
    assert!(datum_equals(&Datum::Int(3), &Datum::Float(3.0), &vm.allocator).unwrap());
    assert!(!datum_equals(&Datum::Int(3), &Datum::Float(3.5), &vm.allocator).unwrap());
}

#[test]
fn string_and_symbol_equality_is_case_insensitive() {
    let vm = vm_with_scripts(vec![], vec![]);
    assert!(datum_equals(
        &Datum::String("Hello".to_string()),
        &Datum::String("hello".to_string()),
        &vm.allocator
    )
    .unwrap());
    assert!(datum_equals(
        &Datum::Symbol("Foo".to_string()),
        &Datum::String("foo".to_string()),
        &vm.allocator
    )
    .unwrap());
    assert!(datum_equals(
        &Datum::Symbol("a".to_string()),
        &Datum::Symbol("A".to_string()),
        &vm.allocator
    )
    .unwrap());
}

#[test]
fn numeric_string_comparisons() {
    let vm = vm_with_scripts(vec![], vec![]);
    assert!(datum_equals(
        &Datum::Int(5),
        &Datum::String("5".to_string()),
        &vm.allocator
    )
    .unwrap());
    assert!(datum_less_than(&Datum::Int(3), &Datum::String("10".to_string())).unwrap());
}

/// `integer("abc")` and `float("abc")` are identity on non-numeric
/// strings — the observable Lingo contract.
#[test]
fn integer_and_float_identity_on_bad_strings() {
    let mut vm = vm_with_scripts(vec![], vec![]);

    let input = vm.alloc_datum(Datum::String("abc".to_string()));
    let result = call_builtin(&mut vm, "integer", &[input.clone()]).unwrap();
    assert_eq!(result, input);
    assert_eq!(vm.get_datum(&result).string_value().unwrap(), "abc");

    let result = call_builtin(&mut vm, "float", &[input.clone()]).unwrap();
    assert_eq!(result, input);

    // numeric strings convert normally
    let numeric = vm.alloc_datum(Datum::String("41.9".to_string()));
    let result = call_builtin(&mut vm, "integer", &[numeric]).unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(41)));
}

/// `ilk(d)` returns a symbol and `ilk(d, ilk(d))` holds for every
/// variant.
#[test]
fn ilk_is_reflexive() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let samples = vec![
        Datum::Void,
        Datum::Int(1),
        Datum::Float(1.5),
        Datum::String("x".to_string()),
        Datum::Symbol("x".to_string()),
        Datum::List(ListKind::List, vec![], false),
        Datum::PropList(vec![], false),
        Datum::Point((1, 2)),
        Datum::Rect((1, 2, 3, 4)),
        Datum::Color(ColorRef::Rgb(1, 2, 3)),
    ];
    for sample in samples {
        let datum_ref = vm.alloc_datum(sample.clone());
        let ilk = call_builtin(&mut vm, "ilk", &[datum_ref.clone()]).unwrap();
        let ilk_name = match vm.get_datum(&ilk) {
            Datum::Symbol(name) => name.clone(),
            other => panic!("ilk of {} is not a symbol", other.type_str()),
        };
        let query = vm.alloc_datum(Datum::Symbol(ilk_name.clone()));
        let verdict = call_builtin(&mut vm, "ilk", &[datum_ref, query]).unwrap();
        match vm.get_datum(&verdict) {
            Datum::Int(1) => {}
            _ => panic!("ilk({}, #{ilk_name}) was not true", sample.type_str()),
        }
    }
}

#[test]
fn listp_accepts_both_list_flavours() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let list = vm.alloc_datum(Datum::List(ListKind::List, vec![], false));
    let plist = vm.alloc_datum(Datum::PropList(vec![], false));
    let number = vm.alloc_datum(Datum::Int(3));

    for (datum_ref, expected) in [(list, 1), (plist, 1), (number, 0)] {
        let result = call_builtin(&mut vm, "listp", &[datum_ref]).unwrap();
        match vm.get_datum(&result) {
            Datum::Int(value) => assert_eq!(*value, expected),
            other => panic!("listp returned {}", other.type_str()),
        }
    }
}

#[test]
fn point_arithmetic_is_component_wise() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let result = shockvm::vm::datum_operations::add_datums(
        Datum::Point((1, 2)),
        Datum::Point((10, 20)),
        &mut vm,
    )
    .unwrap();
    assert!(matches!(result, Datum::Point((11, 22))));

    let two = vm.alloc_datum(Datum::Int(3));
    let four = vm.alloc_datum(Datum::Int(4));
    let list = vm.alloc_datum(Datum::List(ListKind::List, vec![two, four], false));
    let list_datum = vm.get_datum(&list).clone();
    let result =
        shockvm::vm::datum_operations::add_datums(Datum::Point((1, 1)), list_datum, &mut vm)
            .unwrap();
    assert!(matches!(result, Datum::Point((4, 5))));
}

#[test]
fn random_stays_in_range() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let max = vm.alloc_datum(Datum::Int(6));
    for _ in 0..200 {
        let result = call_builtin(&mut vm, "random", &[max.clone()]).unwrap();
        match vm.get_datum(&result) {
            Datum::Int(value) => assert!((1..=6).contains(value)),
            other => panic!("random returned {}", other.type_str()),
        }
    }
}

#[test]
fn float_formatting_respects_precision() {
    assert_eq!(format_float(3.5, 4), "3.5");
    assert_eq!(format_float(3.0, 4), "3.0");
    assert_eq!(format_float(0.125, 4), "0.125");
}

#[test]
fn sub_prop_indexing() {
    let mut vm = vm_with_scripts(vec![], vec![]);
    let rect = vm.alloc_datum(Datum::Rect((5, 6, 7, 8)));
    let index = vm.alloc_datum(Datum::Int(3));
    let result = TypeUtils::get_sub_prop(&mut vm, &rect, &index).unwrap();
    assert!(matches!(vm.get_datum(&result), Datum::Int(7)));
}
