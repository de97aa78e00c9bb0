use log::debug;

use crate::director::lingo::datum::{parse_leading_number, Datum};

use super::{allocator::DatumAllocator, cast_manager::get_cast_slot_number, datum_ref::DatumRef, ScriptError};

/// Lingo equality. Cross-type numerics compare by value, strings and
/// symbols compare case-insensitively, and `Void = 0` holds.
pub fn datum_equals(
    left: &Datum,
    right: &Datum,
    allocator: &DatumAllocator,
) -> Result<bool, ScriptError> {
    match (left, right) {
        (Datum::Int(left), Datum::Int(right)) => Ok(*left == *right),
        (Datum::Int(left), Datum::Float(right)) => Ok((*left as f64) == *right),
        (Datum::Float(left), Datum::Int(right)) => Ok(*left == (*right as f64)),
        (Datum::Float(left), Datum::Float(right)) => Ok(*left == *right),
        (Datum::Int(left), Datum::Void) | (Datum::Void, Datum::Int(left)) => Ok(*left == 0),
        (Datum::Float(left), Datum::Void) | (Datum::Void, Datum::Float(left)) => Ok(*left == 0.0),
        (Datum::Void, Datum::Void) => Ok(true),
        (Datum::Int(left), Datum::String(right)) | (Datum::String(right), Datum::Int(left)) => {
            Ok(parse_leading_number(right).map(|n| n == *left as f64).unwrap_or(false))
        }
        (Datum::Float(left), Datum::String(right)) | (Datum::String(right), Datum::Float(left)) => {
            Ok(parse_leading_number(right).map(|n| n == *left).unwrap_or(false))
        }
        (left, right) if left.is_string() && right.is_string() => {
            let left = left.string_value()?;
            let right = right.string_value()?;
            Ok(left.eq_ignore_ascii_case(&right))
        }
        (Datum::Symbol(left), Datum::Symbol(right)) => Ok(left.eq_ignore_ascii_case(right)),
        (Datum::Symbol(sym), other) | (other, Datum::Symbol(sym)) if other.is_string() => {
            Ok(sym.eq_ignore_ascii_case(&other.string_value()?))
        }
        (Datum::ScriptInstance(left), Datum::ScriptInstance(right)) => Ok(left == right),
        (Datum::SpriteRef(left), Datum::SpriteRef(right)) => Ok(left == right),
        (Datum::TimeoutRef(left), Datum::TimeoutRef(right)) => Ok(left == right),
        (Datum::Color(left), Datum::Color(right)) => Ok(left == right),
        (Datum::Point(left), Datum::Point(right)) => Ok(left == right),
        (Datum::Rect(left), Datum::Rect(right)) => Ok(left == right),
        (Datum::CastMember(left), Datum::CastMember(right)) => Ok(get_cast_slot_number(
            left.cast_lib as u32,
            left.cast_member as u32,
        ) == get_cast_slot_number(
            right.cast_lib as u32,
            right.cast_member as u32,
        )),
        (Datum::CastMember(member_ref), Datum::Void)
        | (Datum::Void, Datum::CastMember(member_ref)) => Ok(!member_ref.is_valid()),
        (Datum::List(_, left, _), Datum::List(_, right, _)) => {
            if left.len() != right.len() {
                return Ok(false);
            }
            for (left_item, right_item) in left.iter().zip(right.iter()) {
                let left_item = allocator.get_datum(left_item);
                let right_item = allocator.get_datum(right_item);
                if !datum_equals(left_item, right_item, allocator)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

pub fn datum_greater_than(left: &Datum, right: &Datum) -> Result<bool, ScriptError> {
    match (left, right) {
        (Datum::Int(left), Datum::Int(right)) => Ok(*left > *right),
        (Datum::Int(left), Datum::Float(right)) => Ok((*left as f64) > *right),
        (Datum::Float(left), Datum::Int(right)) => Ok(*left > (*right as f64)),
        (Datum::Float(left), Datum::Float(right)) => Ok(*left > *right),
        (Datum::Int(_), Datum::Void) | (Datum::Void, Datum::Int(_)) => Ok(false),
        (Datum::Int(left), Datum::String(right)) => {
            match parse_leading_number(right) {
                Some(num) => Ok((*left as f64) > num),
                None => Ok(right.is_empty()),
            }
        }
        (left, right) if left.is_string() && right.is_string() => {
            let left = left.string_value()?.to_lowercase();
            let right = right.string_value()?.to_lowercase();
            Ok(left > right)
        }
        (Datum::Point(left), Datum::Point(right)) => Ok(left.0 > right.0 && left.1 > right.1),
        _ => {
            debug!(
                "datum_greater_than not supported for types: {} and {}",
                left.type_str(),
                right.type_str()
            );
            Ok(false)
        }
    }
}

pub fn datum_less_than(left: &Datum, right: &Datum) -> Result<bool, ScriptError> {
    match (left, right) {
        (Datum::Int(left), Datum::Int(right)) => Ok(*left < *right),
        (Datum::Int(left), Datum::Float(right)) => Ok((*left as f64) < *right),
        (Datum::Float(left), Datum::Int(right)) => Ok(*left < (*right as f64)),
        (Datum::Float(left), Datum::Float(right)) => Ok(*left < *right),
        (Datum::Int(_), Datum::Void) | (Datum::Void, Datum::Int(_)) => Ok(false),
        (Datum::Int(left), Datum::String(right)) => {
            match parse_leading_number(right) {
                Some(num) => Ok((*left as f64) < num),
                None => Ok(!right.is_empty()),
            }
        }
        (left, right) if left.is_string() && right.is_string() => {
            let left = left.string_value()?.to_lowercase();
            let right = right.string_value()?.to_lowercase();
            Ok(left < right)
        }
        (Datum::Point(left), Datum::Point(right)) => Ok(left.0 < right.0 && left.1 < right.1),
        _ => {
            debug!(
                "datum_less_than not supported for types: {} and {}",
                left.type_str(),
                right.type_str()
            );
            Ok(false)
        }
    }
}

pub fn datum_is_zero(datum: &Datum) -> Result<bool, ScriptError> {
    Ok(match datum {
        Datum::Int(value) => *value == 0,
        Datum::Float(value) => *value == 0.0,
        Datum::Void => true,
        Datum::String(s) => s.is_empty(),
        Datum::StringChunk(_, _, s) => s.is_empty(),
        _ => false,
    })
}

pub fn sort_datums(
    datums: &[DatumRef],
    allocator: &DatumAllocator,
) -> Result<Vec<DatumRef>, ScriptError> {
    let mut sorted_list = datums.to_vec();
    sorted_list.sort_by(|a, b| {
        let left = allocator.get_datum(a);
        let right = allocator.get_datum(b);

        if datum_equals(left, right, allocator).unwrap_or(false) {
            std::cmp::Ordering::Equal
        } else if datum_less_than(left, right).unwrap_or(false) {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });
    Ok(sorted_list)
}
