use std::cmp::min;

use crate::director::lingo::datum::{Datum, ListKind};

use super::{LingoVm, ScriptError};

/// Arithmetic promotes to float when either operand is float. Points and
/// rects combine component-wise with each other or with 2-/4-element lists.
pub fn add_datums(left: Datum, right: Datum, vm: &mut LingoVm) -> Result<Datum, ScriptError> {
    match (&left, &right) {
        (Datum::Void, some) => Ok(some.clone()),
        (some, Datum::Void) => Ok(some.clone()),
        (Datum::Int(a), Datum::Int(b)) => Ok(Datum::Int(a.wrapping_add(*b))),
        (Datum::Float(a), Datum::Float(b)) => Ok(Datum::Float(a + b)),
        (Datum::Float(a), Datum::Int(b)) => Ok(Datum::Float(a + (*b as f64))),
        (Datum::Int(a), Datum::Float(b)) => Ok(Datum::Float((*a as f64) + b)),
        (a, b) if a.is_string() && b.is_number() => {
            let parsed = a.float_value()?;
            match b {
                Datum::Int(b) if parsed.fract() == 0.0 => Ok(Datum::Int(parsed as i32 + b)),
                _ => Ok(Datum::Float(parsed + b.float_value()?)),
            }
        }
        (a, b) if a.is_number() && b.is_string() => {
            let parsed = b.float_value()?;
            match a {
                Datum::Int(a) if parsed.fract() == 0.0 => Ok(Datum::Int(a + parsed as i32)),
                _ => Ok(Datum::Float(a.float_value()? + parsed)),
            }
        }
        (Datum::Rect(a), Datum::Rect(b)) => Ok(Datum::Rect((
            a.0.wrapping_add(b.0),
            a.1.wrapping_add(b.1),
            a.2.wrapping_add(b.2),
            a.3.wrapping_add(b.3),
        ))),
        (Datum::Rect(a), Datum::List(_, items, _)) if items.len() == 4 => {
            let b = int_components(vm, items)?;
            Ok(Datum::Rect((a.0 + b[0], a.1 + b[1], a.2 + b[2], a.3 + b[3])))
        }
        (Datum::Point(a), Datum::Point(b)) => {
            Ok(Datum::Point((a.0.wrapping_add(b.0), a.1.wrapping_add(b.1))))
        }
        (Datum::Point(a), Datum::List(_, items, _)) if items.len() == 2 => {
            let b = int_components(vm, items)?;
            Ok(Datum::Point((a.0 + b[0], a.1 + b[1])))
        }
        (Datum::Point(a), Datum::Int(b)) => Ok(Datum::Point((a.0 + *b, a.1 + *b))),
        (Datum::List(_, list_a, _), Datum::List(_, list_b, _)) => {
            let count = min(list_a.len(), list_b.len());
            let mut result = Vec::with_capacity(count);
            for i in 0..count {
                let a = vm.get_datum(&list_a[i].clone()).clone();
                let b = vm.get_datum(&list_b[i].clone()).clone();
                let item = add_datums(a, b, vm)?;
                result.push(vm.alloc_datum(item));
            }
            Ok(Datum::List(ListKind::List, result, false))
        }
        (Datum::List(_, list, _), Datum::Int(n)) => {
            map_numeric_list(vm, list.clone(), |item| match item {
                Datum::Int(v) => Ok(Datum::Int(v + n)),
                Datum::Float(v) => Ok(Datum::Float(v + *n as f64)),
                other => Err(ScriptError::new(format!(
                    "Invalid list element for add: {}",
                    other.type_str()
                ))),
            })
        }
        _ => Err(ScriptError::new(format!(
            "Invalid operands for add: {}, {}",
            left.type_str(),
            right.type_str()
        ))),
    }
}

pub fn subtract_datums(left: Datum, right: Datum, vm: &mut LingoVm) -> Result<Datum, ScriptError> {
    match (&left, &right) {
        (Datum::Int(a), Datum::Int(b)) => Ok(Datum::Int(a.wrapping_sub(*b))),
        (Datum::Float(a), Datum::Float(b)) => Ok(Datum::Float(a - b)),
        (Datum::Float(a), Datum::Int(b)) => Ok(Datum::Float(a - (*b as f64))),
        (Datum::Int(a), Datum::Float(b)) => Ok(Datum::Float((*a as f64) - b)),
        (left, Datum::Void) => Ok(left.clone()),
        (Datum::Rect(a), Datum::Rect(b)) => Ok(Datum::Rect((
            a.0.wrapping_sub(b.0),
            a.1.wrapping_sub(b.1),
            a.2.wrapping_sub(b.2),
            a.3.wrapping_sub(b.3),
        ))),
        (Datum::Rect(a), Datum::List(_, items, _)) if items.len() == 4 => {
            let b = int_components(vm, items)?;
            Ok(Datum::Rect((a.0 - b[0], a.1 - b[1], a.2 - b[2], a.3 - b[3])))
        }
        (Datum::Point(a), Datum::Point(b)) => {
            Ok(Datum::Point((a.0.wrapping_sub(b.0), a.1.wrapping_sub(b.1))))
        }
        (Datum::Point(a), Datum::List(_, items, _)) if items.len() == 2 => {
            let b = int_components(vm, items)?;
            Ok(Datum::Point((a.0 - b[0], a.1 - b[1])))
        }
        (Datum::Point(a), Datum::Int(b)) => Ok(Datum::Point((a.0 - *b, a.1 - *b))),
        (Datum::List(_, list_a, _), Datum::List(_, list_b, _)) => {
            let count = min(list_a.len(), list_b.len());
            let mut result = Vec::with_capacity(count);
            for i in 0..count {
                let a = vm.get_datum(&list_a[i].clone()).clone();
                let b = vm.get_datum(&list_b[i].clone()).clone();
                let item = subtract_datums(a, b, vm)?;
                result.push(vm.alloc_datum(item));
            }
            Ok(Datum::List(ListKind::List, result, false))
        }
        _ => Err(ScriptError::new(format!(
            "Invalid operands for subtract: {}, {}",
            left.type_str(),
            right.type_str()
        ))),
    }
}

pub fn multiply_datums(left: Datum, right: Datum, vm: &mut LingoVm) -> Result<Datum, ScriptError> {
    match (&left, &right) {
        (Datum::Int(a), Datum::Int(b)) => Ok(Datum::Int(a.wrapping_mul(*b))),
        (Datum::Float(a), Datum::Float(b)) => Ok(Datum::Float(a * b)),
        (Datum::Float(a), Datum::Int(b)) => Ok(Datum::Float(a * (*b as f64))),
        (Datum::Int(a), Datum::Float(b)) => Ok(Datum::Float((*a as f64) * b)),
        (Datum::Void, _) | (_, Datum::Void) => Ok(Datum::Int(0)),
        (Datum::Point(a), Datum::Int(b)) | (Datum::Int(b), Datum::Point(a)) => {
            Ok(Datum::Point((a.0.wrapping_mul(*b), a.1.wrapping_mul(*b))))
        }
        (Datum::Point(a), Datum::Float(b)) | (Datum::Float(b), Datum::Point(a)) => Ok(
            Datum::Point(((a.0 as f64 * b) as i32, (a.1 as f64 * b) as i32)),
        ),
        (Datum::List(_, list, _), other) if other.is_number() => {
            let factor = other.float_value()?;
            map_numeric_list(vm, list.clone(), |item| match item {
                Datum::Int(v) => Ok(Datum::Int((*v as f64 * factor) as i32)),
                Datum::Float(v) => Ok(Datum::Float(v * factor)),
                other => Err(ScriptError::new(format!(
                    "Invalid list element for multiply: {}",
                    other.type_str()
                ))),
            })
        }
        _ => Err(ScriptError::new(format!(
            "Invalid operands for multiply: {}, {}",
            left.type_str(),
            right.type_str()
        ))),
    }
}

/// Integer / integer stays integral (truncating); anything else divides as
/// float. Dividing by zero is a script error, never a silent NaN.
pub fn divide_datums(left: Datum, right: Datum, _vm: &mut LingoVm) -> Result<Datum, ScriptError> {
    if right.is_number() && right.float_value()? == 0.0 {
        return Err(ScriptError::new("Division by zero".to_string()));
    }
    match (&left, &right) {
        (Datum::Int(a), Datum::Int(b)) => Ok(Datum::Int(a.wrapping_div(*b))),
        (Datum::Float(a), Datum::Float(b)) => Ok(Datum::Float(a / b)),
        (Datum::Float(a), Datum::Int(b)) => Ok(Datum::Float(a / (*b as f64))),
        (Datum::Int(a), Datum::Float(b)) => Ok(Datum::Float((*a as f64) / b)),
        (Datum::Point(a), Datum::Int(b)) => Ok(Datum::Point((a.0 / *b, a.1 / *b))),
        _ => Err(ScriptError::new(format!(
            "Invalid operands for divide: {}, {}",
            left.type_str(),
            right.type_str()
        ))),
    }
}

fn int_components(
    vm: &LingoVm,
    items: &[super::datum_ref::DatumRef],
) -> Result<Vec<i32>, ScriptError> {
    items
        .iter()
        .map(|item| vm.get_datum(item).int_value())
        .collect()
}

fn map_numeric_list<F>(
    vm: &mut LingoVm,
    list: Vec<super::datum_ref::DatumRef>,
    f: F,
) -> Result<Datum, ScriptError>
where
    F: Fn(&Datum) -> Result<Datum, ScriptError>,
{
    let mut result_refs = Vec::with_capacity(list.len());
    for item_ref in list {
        let item = vm.get_datum(&item_ref).clone();
        let mapped = f(&item)?;
        result_refs.push(vm.alloc_datum(mapped));
    }
    Ok(Datum::List(ListKind::List, result_refs, false))
}
