use itertools::Itertools;

use crate::director::lingo::datum::{ColorRef, Datum, ListKind};

use super::{datum_ref::DatumRef, LingoVm};

/// Formats a datum the way `put` displays it in the message window.
pub fn format_datum(datum_ref: &DatumRef, vm: &LingoVm) -> String {
    format_concrete_datum(vm.get_datum(datum_ref), vm)
}

pub fn format_concrete_datum(datum: &Datum, vm: &LingoVm) -> String {
    match datum {
        Datum::Void => "<Void>".to_string(),
        Datum::Int(n) => n.to_string(),
        Datum::Float(n) => format_float(*n, vm.float_precision),
        Datum::String(s) => format!("\"{s}\""),
        Datum::StringChunk(_, _, s) => format!("\"{s}\""),
        Datum::Symbol(s) => format!("#{s}"),
        Datum::List(kind, items, _) => {
            let formatted = items
                .iter()
                .map(|item| format_datum(item, vm))
                .join(", ");
            match kind {
                ListKind::List => format!("[{formatted}]"),
                ListKind::ArgList => format!("argList({formatted})"),
                ListKind::ArgListNoRet => format!("argListNoRet({formatted})"),
            }
        }
        Datum::PropList(pairs, _) => {
            if pairs.is_empty() {
                "[:]".to_string()
            } else {
                let formatted = pairs
                    .iter()
                    .map(|(key, value)| {
                        format!("{}: {}", format_datum(key, vm), format_datum(value, vm))
                    })
                    .join(", ");
                format!("[{formatted}]")
            }
        }
        Datum::Point((x, y)) => format!("point({x}, {y})"),
        Datum::Rect((l, t, r, b)) => format!("rect({l}, {t}, {r}, {b})"),
        Datum::Color(ColorRef::Rgb(r, g, b)) => format!("rgb( {r}, {g}, {b} )"),
        Datum::Color(ColorRef::PaletteIndex(i)) => format!("paletteIndex( {i} )"),
        Datum::CastLib(n) => format!("(castLib {n})"),
        Datum::CastMember(member_ref) => format!(
            "(member {} of castLib {})",
            member_ref.cast_member, member_ref.cast_lib
        ),
        Datum::ScriptRef(member_ref) => format!(
            "(script {} of castLib {})",
            member_ref.cast_member, member_ref.cast_lib
        ),
        Datum::ScriptInstance(id) => {
            let script_name = vm
                .allocator
                .get_script_instance_opt(*id)
                .and_then(|instance| vm.movie.cast_manager.get_script_by_ref(&instance.script))
                .map(|script| script.name.clone())
                .unwrap_or_default();
            format!("<offspring \"{script_name}\" {id}>")
        }
        Datum::SpriteRef(n) => format!("(sprite {n})"),
        Datum::Xtra(name) => format!("<Xtra \"{name}\">"),
        Datum::XtraInstance(name, id) => format!("<Xtra child \"{name}\" {id}>"),
        Datum::TimeoutRef(name) => format!("timeout(\"{name}\")"),
        Datum::Image(id) => format!("<image {id}>"),
    }
}

/// Director trims trailing zeroes down to `the floatPrecision` digits.
pub fn format_float(value: f64, precision: u8) -> String {
    if value.fract() == 0.0 && precision == 0 {
        return format!("{value:.0}");
    }
    let formatted = format!("{value:.prec$}", prec = precision as usize);
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0');
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.contains('.') {
            trimmed.to_string()
        } else {
            format!("{trimmed}.0")
        }
    } else {
        formatted
    }
}
