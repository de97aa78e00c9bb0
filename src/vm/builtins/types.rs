use rand::Rng;

use crate::{
    director::lingo::datum::{datum_bool, ColorRef, Datum, ListKind},
    vm::{
        bitmap::Bitmap,
        builtins::datum_handlers::{call_datum_handler, prop_list::PropListUtils, script_instance},
        datum_ref::DatumRef,
        eval::eval_lingo_value,
        LingoVm, ScriptError,
    },
};

pub struct TypeHandlers {}
pub struct TypeUtils {}

impl TypeUtils {
    pub fn get_datum_ilks(datum: &Datum) -> Result<Vec<&'static str>, ScriptError> {
        match datum {
            Datum::List(..) => Ok(vec!["list", "linearlist"]),
            Datum::Int(..) => Ok(vec!["integer"]),
            Datum::Float(..) => Ok(vec!["float"]),
            Datum::String(..) | Datum::StringChunk(..) => Ok(vec!["string"]),
            Datum::Symbol(..) => Ok(vec!["symbol"]),
            Datum::Void => Ok(vec!["void"]),
            Datum::PropList(..) => Ok(vec!["proplist", "list"]),
            Datum::ScriptInstance(..) => Ok(vec!["instance", "object"]),
            Datum::ScriptRef(..) => Ok(vec!["script"]),
            Datum::CastMember(member_ref) => Ok(vec![if member_ref.is_valid() {
                "member"
            } else {
                "void"
            }]),
            Datum::CastLib(..) => Ok(vec!["castlib"]),
            Datum::Color(..) => Ok(vec!["color"]),
            Datum::TimeoutRef(..) => Ok(vec!["timeout"]),
            Datum::Image(..) => Ok(vec!["image"]),
            Datum::Rect(..) => Ok(vec!["rect"]),
            Datum::Point(..) => Ok(vec!["point"]),
            Datum::SpriteRef(..) => Ok(vec!["sprite"]),
            Datum::Xtra(..) => Ok(vec!["xtra"]),
            Datum::XtraInstance(..) => Ok(vec!["instance", "xtra"]),
        }
    }

    pub fn get_datum_ilk(datum: &Datum) -> Result<&'static str, ScriptError> {
        Ok(Self::get_datum_ilks(datum)?[0])
    }

    pub fn is_datum_ilk(datum: &Datum, ilk: &str) -> Result<bool, ScriptError> {
        Ok(Self::get_datum_ilks(datum)?
            .iter()
            .any(|x| x.eq_ignore_ascii_case(ilk)))
    }

    /// Nested indexing into a compound datum by key or position.
    pub fn get_sub_prop(
        vm: &mut LingoVm,
        datum_ref: &DatumRef,
        prop_key_ref: &DatumRef,
    ) -> Result<DatumRef, ScriptError> {
        let datum = vm.get_datum(datum_ref).clone();
        let prop_key = vm.get_datum(prop_key_ref).clone();
        match datum {
            Datum::PropList(pairs, ..) => PropListUtils::get_prop(vm, &pairs, prop_key_ref, false),
            Datum::List(_, items, _) => {
                let position = prop_key.int_value()?;
                let index = position - 1;
                if index < 0 || index >= items.len() as i32 {
                    return Err(ScriptError::new(format!("Index out of bounds: {position}")));
                }
                Ok(items[index as usize].clone())
            }
            Datum::Rect((left, top, right, bottom)) => {
                let value = match prop_key.int_value()? {
                    1 => left,
                    2 => top,
                    3 => right,
                    4 => bottom,
                    index => {
                        return Err(ScriptError::new(format!(
                            "Rect index {index} out of bounds (must be 1-4)"
                        )))
                    }
                };
                Ok(vm.alloc_datum(Datum::Int(value)))
            }
            Datum::Point((x, y)) => {
                let value = match prop_key.int_value()? {
                    1 => x,
                    2 => y,
                    index => {
                        return Err(ScriptError::new(format!(
                            "Point index {index} out of bounds (must be 1-2)"
                        )))
                    }
                };
                Ok(vm.alloc_datum(Datum::Int(value)))
            }
            Datum::ScriptInstance(instance_id) => {
                let key = prop_key.string_value()?;
                Ok(
                    crate::vm::script::script_get_prop_opt(vm, instance_id, &key)
                        .unwrap_or(DatumRef::Void),
                )
            }
            other => Err(ScriptError::new(format!(
                "Cannot get sub-prop from prop of type {}",
                other.type_str()
            ))),
        }
    }

    pub fn set_sub_prop(
        vm: &mut LingoVm,
        datum_ref: &DatumRef,
        prop_key_ref: &DatumRef,
        value_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let kind = vm.get_datum(datum_ref).kind();
        match kind {
            crate::director::lingo::datum::DatumKind::PropList => {
                PropListUtils::set_prop(vm, datum_ref, prop_key_ref, value_ref, false)
            }
            crate::director::lingo::datum::DatumKind::List => {
                let position = vm.get_datum(prop_key_ref).int_value()?;
                let index = position - 1;
                if index < 0 {
                    return Err(ScriptError::new(format!("Index out of bounds: {position}")));
                }
                let (items, _) = vm.get_datum_mut(datum_ref).to_list_mut()?;
                if (index as usize) < items.len() {
                    items[index as usize] = value_ref.clone();
                } else {
                    items.resize(index as usize + 1, DatumRef::Void);
                    items[index as usize] = value_ref.clone();
                }
                Ok(())
            }
            other => Err(ScriptError::new(format!(
                "Cannot set sub-prop on prop of type {other:?}"
            ))),
        }
    }
}

impl TypeHandlers {
    fn first(args: &[DatumRef]) -> Result<&DatumRef, ScriptError> {
        args.first()
            .ok_or_else(|| ScriptError::new("Missing argument".to_string()))
    }

    pub fn abs(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).clone();
        let result = match value {
            Datum::Int(n) => Datum::Int(n.abs()),
            Datum::Float(n) => Datum::Float(n.abs()),
            other => {
                return Err(ScriptError::new(format!(
                    "Cannot take abs of {}",
                    other.type_str()
                )))
            }
        };
        Ok(vm.alloc_datum(result))
    }

    pub fn sqrt(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).clone();
        let result = match value {
            // sqrt of an int rounds like Director's integer sqrt
            Datum::Int(n) => Datum::Int((n.max(0) as f64).sqrt().round() as i32),
            other => Datum::Float(other.float_value()?.sqrt()),
        };
        Ok(vm.alloc_datum(result))
    }

    pub fn sin(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let degrees = vm.get_datum(Self::first(args)?).float_value()?;
        Ok(vm.alloc_datum(Datum::Float(degrees.to_radians().sin())))
    }

    pub fn cos(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let degrees = vm.get_datum(Self::first(args)?).float_value()?;
        Ok(vm.alloc_datum(Datum::Float(degrees.to_radians().cos())))
    }

    pub fn tan(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let degrees = vm.get_datum(Self::first(args)?).float_value()?;
        Ok(vm.alloc_datum(Datum::Float(degrees.to_radians().tan())))
    }

    pub fn atan(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).float_value()?;
        Ok(vm.alloc_datum(Datum::Float(value.atan())))
    }

    pub fn power(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let base = vm.get_datum(Self::first(args)?).float_value()?;
        let exponent = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing exponent for power".to_string())
            })?)
            .float_value()?;
        Ok(vm.alloc_datum(Datum::Float(base.powf(exponent))))
    }

    /// Uniform over 1..=max.
    pub fn random(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let max = vm.get_datum(Self::first(args)?).int_value()?;
        if max < 1 {
            return Err(ScriptError::new(
                "random: max must be at least 1".to_string(),
            ));
        }
        let value = rand::rng().random_range(1..=max);
        Ok(vm.alloc_datum(Datum::Int(value)))
    }

    pub fn min(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Self::extremum(vm, args, false)
    }

    pub fn max(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Self::extremum(vm, args, true)
    }

    fn extremum(
        vm: &mut LingoVm,
        args: &[DatumRef],
        want_max: bool,
    ) -> Result<DatumRef, ScriptError> {
        use crate::vm::compare::{datum_greater_than, datum_less_than};
        // a single list argument compares its elements
        let candidates: Vec<DatumRef> = if args.len() == 1 && vm.get_datum(&args[0]).is_list() {
            vm.get_datum(&args[0]).to_list()?.clone()
        } else {
            args.to_vec()
        };
        let mut best: Option<DatumRef> = None;
        for candidate in candidates {
            let replace = match &best {
                None => true,
                Some(best_ref) => {
                    let candidate_datum = vm.get_datum(&candidate);
                    let best_datum = vm.get_datum(best_ref);
                    if want_max {
                        datum_greater_than(candidate_datum, best_datum)?
                    } else {
                        datum_less_than(candidate_datum, best_datum)?
                    }
                }
            };
            if replace {
                best = Some(candidate);
            }
        }
        Ok(best.unwrap_or(DatumRef::Void))
    }

    pub fn pi(vm: &mut LingoVm, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Ok(vm.alloc_datum(Datum::Float(std::f64::consts::PI)))
    }

    /// `integer(v)` — non-numeric strings come back unchanged.
    pub fn integer(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value_ref = Self::first(args)?;
        let value = vm.get_datum(value_ref).clone();
        let result = match &value {
            Datum::Int(n) => Datum::Int(*n),
            Datum::Float(f) => Datum::Int(f.round() as i32),
            Datum::Void => Datum::Void,
            datum if datum.is_string() => {
                let s = datum.string_value()?;
                match s.trim().parse::<f64>() {
                    Ok(parsed) => Datum::Int(parsed.trunc() as i32),
                    Err(_) => return Ok(value_ref.clone()),
                }
            }
            other => {
                return Err(ScriptError::new(format!(
                    "Cannot convert {} to integer",
                    other.type_str()
                )))
            }
        };
        Ok(vm.alloc_datum(result))
    }

    /// `float(v)` — same identity-on-failure contract as `integer`.
    pub fn float(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value_ref = Self::first(args)?;
        let value = vm.get_datum(value_ref).clone();
        let result = match &value {
            Datum::Float(f) => Datum::Float(*f),
            Datum::Int(n) => Datum::Float(*n as f64),
            Datum::Void => Datum::Void,
            datum if datum.is_string() => {
                let s = datum.string_value()?;
                match s.trim().parse::<f64>() {
                    Ok(parsed) => Datum::Float(parsed),
                    Err(_) => return Ok(value_ref.clone()),
                }
            }
            other => {
                return Err(ScriptError::new(format!(
                    "Cannot convert {} to float",
                    other.type_str()
                )))
            }
        };
        Ok(vm.alloc_datum(result))
    }

    pub fn bit_and(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let a = vm.get_datum(Self::first(args)?).int_value()?;
        let b = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing argument for bitAnd".to_string())
            })?)
            .int_value()?;
        Ok(vm.alloc_datum(Datum::Int(a & b)))
    }

    pub fn bit_or(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let a = vm.get_datum(Self::first(args)?).int_value()?;
        let b = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing argument for bitOr".to_string())
            })?)
            .int_value()?;
        Ok(vm.alloc_datum(Datum::Int(a | b)))
    }

    pub fn bit_xor(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let a = vm.get_datum(Self::first(args)?).int_value()?;
        let b = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing argument for bitXor".to_string())
            })?)
            .int_value()?;
        Ok(vm.alloc_datum(Datum::Int(a ^ b)))
    }

    pub fn ilk(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let obj = vm.get_datum(Self::first(args)?).clone();
        let result = match args.get(1) {
            Some(query_ref) => {
                let query = vm.get_datum(query_ref).string_value()?;
                datum_bool(TypeUtils::is_datum_ilk(&obj, &query)?)
            }
            None => Datum::Symbol(TypeUtils::get_datum_ilk(&obj)?.to_string()),
        };
        Ok(vm.alloc_datum(result))
    }

    pub fn objectp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_object = !matches!(
            vm.get_datum(Self::first(args)?),
            Datum::Void | Datum::Int(_) | Datum::Float(_) | Datum::Symbol(_) | Datum::String(_)
        );
        Ok(vm.alloc_datum(datum_bool(is_object)))
    }

    pub fn voidp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_void = vm.get_datum(Self::first(args)?).is_void();
        Ok(vm.alloc_datum(datum_bool(is_void)))
    }

    pub fn listp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_list = matches!(
            vm.get_datum(Self::first(args)?),
            Datum::List(..) | Datum::PropList(..)
        );
        Ok(vm.alloc_datum(datum_bool(is_list)))
    }

    pub fn stringp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_string = vm.get_datum(Self::first(args)?).is_string();
        Ok(vm.alloc_datum(datum_bool(is_string)))
    }

    pub fn integerp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_int = vm.get_datum(Self::first(args)?).is_int();
        Ok(vm.alloc_datum(datum_bool(is_int)))
    }

    pub fn floatp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_float = matches!(vm.get_datum(Self::first(args)?), Datum::Float(_));
        Ok(vm.alloc_datum(datum_bool(is_float)))
    }

    pub fn symbolp(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let is_symbol = vm.get_datum(Self::first(args)?).is_symbol();
        Ok(vm.alloc_datum(datum_bool(is_symbol)))
    }

    pub fn symbol(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value = vm.get_datum(Self::first(args)?).clone();
        let result = match &value {
            Datum::Symbol(_) => value,
            datum if datum.is_string() => {
                let s = datum.string_value()?;
                if s.starts_with('#') {
                    Datum::Symbol("#".to_string())
                } else {
                    Datum::Symbol(s)
                }
            }
            other => {
                return Err(ScriptError::new(format!(
                    "Cannot convert {} to symbol",
                    other.type_str()
                )))
            }
        };
        Ok(vm.alloc_datum(result))
    }

    /// `value(expr)` — non-strings pass through; strings evaluate their
    /// longest valid literal prefix.
    pub fn value(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value_ref = Self::first(args)?;
        let value = vm.get_datum(value_ref).clone();
        match value {
            Datum::String(s) => eval_lingo_value(vm, &s),
            Datum::StringChunk(_, _, s) => eval_lingo_value(vm, &s),
            _ => Ok(value_ref.clone()),
        }
    }

    pub fn call_ancestor(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let handler_name = vm.get_datum(Self::first(args)?).string_value()?;
        let me_ref = args
            .get(1)
            .ok_or_else(|| ScriptError::new("callAncestor needs a receiver".to_string()))?;
        let rest = &args[2..];
        script_instance::call_ancestor(vm, &handler_name, me_ref, rest)
    }

    pub fn list(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        Ok(vm.alloc_datum(Datum::List(ListKind::List, args.to_vec(), false)))
    }

    /// Global list/proplist functions are sugar over method dispatch on
    /// the first argument.
    pub fn dispatch_to_first_arg(
        vm: &mut LingoVm,
        name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let name_lower = name.to_lowercase();
        let canonical = match name_lower.as_str() {
            "getat" => "getAt",
            "setat" => "setAt",
            "addat" => "addAt",
            "deleteat" => "deleteAt",
            "getone" => "getOne",
            "getlast" => "getLast",
            "deleteone" => "deleteOne",
            "getprop" => "getProp",
            "setprop" => "setProp",
            "addprop" => "addProp",
            "deleteprop" => "deleteProp",
            "getaprop" => "getaProp",
            "setaprop" => "setaProp",
            "getpropat" => "getPropAt",
            "findpos" => "findPos",
            "getpos" => "getPos",
            other => match other {
                "count" => "count",
                "append" => "append",
                "add" => "add",
                "sort" => "sort",
                "duplicate" => "duplicate",
                _ => other,
            },
        };
        let target = Self::first(args)?.clone();
        call_datum_handler(vm, &target, canonical, &args[1..])
    }

    pub fn point(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let x = vm.get_datum(Self::first(args)?).int_value()?;
        let y = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing y for point".to_string())
            })?)
            .int_value()?;
        Ok(vm.alloc_datum(Datum::Point((x, y))))
    }

    pub fn rect(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let first_is_number = vm.get_datum(Self::first(args)?).is_number();
        let rect = if args.len() == 4 && first_is_number {
            (
                vm.get_datum(&args[0]).int_value()?,
                vm.get_datum(&args[1]).int_value()?,
                vm.get_datum(&args[2]).int_value()?,
                vm.get_datum(&args[3]).int_value()?,
            )
        } else if args.len() == 2 {
            let left_top = vm.get_datum(&args[0]).to_point()?;
            let right_bottom = vm.get_datum(&args[1]).to_point()?;
            (left_top.0, left_top.1, right_bottom.0, right_bottom.1)
        } else {
            return Err(ScriptError::new(
                "Invalid arguments for rect".to_string(),
            ));
        };
        Ok(vm.alloc_datum(Datum::Rect(rect)))
    }

    pub fn rgb(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let color = if args.len() == 1 {
            let hex = vm.get_datum(&args[0]).string_value()?;
            ColorRef::from_hex(&hex)
        } else {
            let r = vm.get_datum(Self::first(args)?).int_value()? as u8;
            let g = vm
                .get_datum(args.get(1).ok_or_else(|| {
                    ScriptError::new("Missing green for rgb".to_string())
                })?)
                .int_value()? as u8;
            let b = vm
                .get_datum(args.get(2).ok_or_else(|| {
                    ScriptError::new("Missing blue for rgb".to_string())
                })?)
                .int_value()? as u8;
            ColorRef::Rgb(r, g, b)
        };
        Ok(vm.alloc_datum(Datum::Color(color)))
    }

    pub fn palette_index(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let index = vm.get_datum(Self::first(args)?).int_value()? as u8;
        Ok(vm.alloc_datum(Datum::Color(ColorRef::PaletteIndex(index))))
    }

    pub fn image(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let width = vm.get_datum(Self::first(args)?).int_value()?.max(0) as u16;
        let height = vm
            .get_datum(args.get(1).ok_or_else(|| {
                ScriptError::new("Missing height for image".to_string())
            })?)
            .int_value()?
            .max(0) as u16;
        let depth = match args.get(2) {
            Some(depth_ref) => vm.get_datum(depth_ref).int_value()? as u8,
            None => 32,
        };
        let bitmap = Bitmap::new(width, height, depth);
        let bitmap_ref = vm.bitmap_manager.add_bitmap(bitmap);
        Ok(vm.alloc_datum(Datum::Image(bitmap_ref)))
    }

    /// `new(target, args...)` dispatches on the target's variant: script
    /// reference, xtra, or an existing instance's script.
    pub fn new(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let target_ref = Self::first(args)?.clone();
        let rest = &args[1..];
        let target = vm.get_datum(&target_ref).clone();
        match target {
            Datum::ScriptRef(script_ref) => {
                super::datum_handlers::script::new_script_instance(vm, &script_ref, rest)
            }
            Datum::CastMember(member_ref) => {
                super::datum_handlers::script::new_script_instance(vm, &member_ref, rest)
            }
            Datum::Xtra(name) => {
                let concrete_args: Vec<Datum> =
                    rest.iter().map(|r| vm.get_datum(r).clone()).collect();
                match vm.providers.xtra.as_mut() {
                    Some(provider) => {
                        let instance_id = provider.create_instance(&name, &concrete_args);
                        Ok(vm.alloc_datum(Datum::XtraInstance(name, instance_id)))
                    }
                    None => Ok(DatumRef::Void),
                }
            }
            Datum::ScriptInstance(instance_id) => {
                let script_ref = vm.allocator.get_script_instance(instance_id).script.clone();
                super::datum_handlers::script::new_script_instance(vm, &script_ref, rest)
            }
            Datum::TimeoutRef(_) => {
                super::datum_handlers::timeout::TimeoutDatumHandlers::call(
                    vm,
                    &target_ref,
                    "new",
                    rest,
                )
            }
            other => Err(ScriptError::new(format!(
                "Cannot call new on {}",
                other.type_str()
            ))),
        }
    }

    pub fn timeout(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let name = vm.get_datum(Self::first(args)?).string_value()?;
        Ok(vm.alloc_datum(Datum::TimeoutRef(name)))
    }

    pub fn xtra(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let name = vm.get_datum(Self::first(args)?).string_value()?;
        Ok(vm.alloc_datum(Datum::Xtra(name)))
    }
}
