use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use crate::director::lingo::datum::{ColorRef, Datum, ListKind};

use super::{datum_ref::DatumRef, LingoVm, ScriptError};

#[derive(Parser)]
#[grammar = "lingo.pest"]
pub struct LingoParser;

/// Evaluates a Lingo literal expression the way the `value()` builtin
/// does: the longest valid prefix wins, whole-string failures yield `Void`.
///
/// `value("3 5")` is `3`, `value("penny")` is `Void` (an unbound
/// identifier), `value("[#a: 1]")` is a property list.
pub fn eval_lingo_value(vm: &mut LingoVm, input: &str) -> Result<DatumRef, ScriptError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DatumRef::Void);
    }
    match LingoParser::parse(Rule::value_expr, trimmed) {
        Ok(mut pairs) => {
            let value_pair = pairs
                .next()
                .ok_or_else(|| ScriptError::new("Empty parse result".to_string()))?;
            let literal_pair = value_pair
                .into_inner()
                .next()
                .ok_or_else(|| ScriptError::new("Empty literal".to_string()))?;
            eval_literal_pair(vm, literal_pair)
        }
        Err(_) => Ok(DatumRef::Void),
    }
}

fn eval_literal_pair(vm: &mut LingoVm, pair: Pair<Rule>) -> Result<DatumRef, ScriptError> {
    match pair.as_rule() {
        Rule::number_int => {
            let value = pair
                .as_str()
                .parse::<i32>()
                .map_err(|e| ScriptError::new(format!("Invalid integer: {e}")))?;
            Ok(vm.alloc_datum(Datum::Int(value)))
        }
        Rule::number_float => {
            let value = pair
                .as_str()
                .parse::<f64>()
                .map_err(|e| ScriptError::new(format!("Invalid float: {e}")))?;
            Ok(vm.alloc_datum(Datum::Float(value)))
        }
        Rule::string_lit => {
            let inner = pair
                .into_inner()
                .next()
                .map(|p| p.as_str().to_owned())
                .unwrap_or_default();
            Ok(vm.alloc_datum(Datum::String(inner)))
        }
        Rule::symbol_lit => {
            let name = pair
                .into_inner()
                .next()
                .map(|p| p.as_str().to_owned())
                .unwrap_or_default();
            Ok(vm.alloc_datum(Datum::Symbol(name)))
        }
        Rule::bool_true => Ok(vm.alloc_datum(Datum::Int(1))),
        Rule::bool_false => Ok(vm.alloc_datum(Datum::Int(0))),
        Rule::void_lit => Ok(DatumRef::Void),
        Rule::identifier => {
            // an identifier evaluates to the global of that name, Void
            // when unbound
            let name = pair.as_str();
            Ok(vm.globals.get(name).cloned().unwrap_or(DatumRef::Void))
        }
        Rule::empty_list => Ok(vm.alloc_datum(Datum::List(ListKind::List, vec![], false))),
        Rule::multi_list => {
            let mut items = Vec::new();
            for item_pair in pair.into_inner() {
                items.push(eval_literal_pair(vm, item_pair)?);
            }
            Ok(vm.alloc_datum(Datum::List(ListKind::List, items, false)))
        }
        Rule::empty_prop_list => Ok(vm.alloc_datum(Datum::PropList(vec![], false))),
        Rule::multi_prop_list => {
            let mut pairs = Vec::new();
            for pair_rule in pair.into_inner() {
                let mut inner = pair_rule.into_inner();
                let key_pair = inner
                    .next()
                    .ok_or_else(|| ScriptError::new("Missing prop list key".to_string()))?;
                let value_pair = inner
                    .next()
                    .ok_or_else(|| ScriptError::new("Missing prop list value".to_string()))?;
                // bare identifiers as keys read as symbols
                let key_ref = if key_pair.as_rule() == Rule::identifier {
                    vm.alloc_datum(Datum::Symbol(key_pair.as_str().to_owned()))
                } else {
                    eval_literal_pair(vm, key_pair)?
                };
                let value_ref = eval_literal_pair(vm, value_pair)?;
                pairs.push((key_ref, value_ref));
            }
            Ok(vm.alloc_datum(Datum::PropList(pairs, false)))
        }
        Rule::point_lit => {
            let components = number_components(pair)?;
            Ok(vm.alloc_datum(Datum::Point((components[0] as i32, components[1] as i32))))
        }
        Rule::rect_lit => {
            let components = number_components(pair)?;
            Ok(vm.alloc_datum(Datum::Rect((
                components[0] as i32,
                components[1] as i32,
                components[2] as i32,
                components[3] as i32,
            ))))
        }
        Rule::rgb_lit => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| ScriptError::new("Empty rgb literal".to_string()))?;
            let color = match inner.as_rule() {
                Rule::string_lit => {
                    let hex = inner
                        .into_inner()
                        .next()
                        .map(|p| p.as_str().to_owned())
                        .unwrap_or_default();
                    ColorRef::from_hex(&hex)
                }
                Rule::rgb_components => {
                    let values: Vec<u8> = inner
                        .into_inner()
                        .map(|p| p.as_str().parse::<i32>().unwrap_or(0).clamp(0, 255) as u8)
                        .collect();
                    ColorRef::Rgb(values[0], values[1], values[2])
                }
                _ => ColorRef::Rgb(0, 0, 0),
            };
            Ok(vm.alloc_datum(Datum::Color(color)))
        }
        other => Err(ScriptError::new(format!(
            "Invalid literal rule {other:?}"
        ))),
    }
}

fn number_components(pair: Pair<Rule>) -> Result<Vec<f64>, ScriptError> {
    pair.into_inner()
        .map(|p| {
            p.as_str()
                .parse::<f64>()
                .map_err(|e| ScriptError::new(format!("Invalid number: {e}")))
        })
        .collect()
}
