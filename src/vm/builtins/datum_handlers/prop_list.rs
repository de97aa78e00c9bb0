use crate::{
    director::lingo::datum::{datum_bool, Datum, PropListPair},
    vm::{
        compare::{datum_equals, datum_less_than},
        datum_ref::DatumRef,
        LingoVm, ScriptError,
    },
};

pub struct PropListDatumHandlers {}
pub struct PropListUtils {}

impl PropListUtils {
    /// Key lookup uses exact equality first; string and symbol keys are
    /// interchangeable.
    fn key_matches(
        left: &Datum,
        right: &Datum,
        vm: &LingoVm,
    ) -> Result<bool, ScriptError> {
        let result = match (left, right) {
            (Datum::String(l), Datum::String(r)) => l == r,
            (Datum::String(l), Datum::Symbol(r)) | (Datum::Symbol(l), Datum::String(r)) => {
                l.eq_ignore_ascii_case(r)
            }
            (Datum::Symbol(l), Datum::Symbol(r)) => l.eq_ignore_ascii_case(r),
            _ => datum_equals(left, right, &vm.allocator)?,
        };
        Ok(result)
    }

    pub fn get_key_index(
        vm: &LingoVm,
        pairs: &[PropListPair],
        key: &Datum,
    ) -> Result<i32, ScriptError> {
        for (i, (key_ref, _)) in pairs.iter().enumerate() {
            let candidate = vm.get_datum(key_ref);
            if Self::key_matches(candidate, key, vm)? {
                return Ok(i as i32);
            }
        }
        Ok(-1)
    }

    /// Lookup falling back to the case-insensitive string/symbol match,
    /// then to the built-in pseudo properties.
    pub fn get_prop_or_built_in(
        vm: &mut LingoVm,
        pairs: &[PropListPair],
        key: &str,
    ) -> Result<DatumRef, ScriptError> {
        let index = Self::get_key_index(vm, pairs, &Datum::String(key.to_owned()))?;
        if index >= 0 {
            return Ok(pairs[index as usize].1.clone());
        }
        let index = Self::get_key_index(vm, pairs, &Datum::Symbol(key.to_owned()))?;
        if index >= 0 {
            return Ok(pairs[index as usize].1.clone());
        }
        let built_in = Self::get_built_in_prop(pairs, key)?;
        Ok(vm.alloc_datum(built_in))
    }

    pub fn get_built_in_prop(
        pairs: &[PropListPair],
        prop: &str,
    ) -> Result<Datum, ScriptError> {
        match prop {
            "count" => Ok(Datum::Int(pairs.len() as i32)),
            "ilk" => Ok(Datum::Symbol("propList".to_owned())),
            _ => Err(ScriptError::new(format!(
                "Invalid prop list property {prop}"
            ))),
        }
    }

    /// Key lookup, then positional fallback for integer keys.
    pub fn get_prop(
        vm: &LingoVm,
        pairs: &[PropListPair],
        key_ref: &DatumRef,
        is_required: bool,
    ) -> Result<DatumRef, ScriptError> {
        let key = vm.get_datum(key_ref);
        let index = Self::get_key_index(vm, pairs, key)?;
        if index >= 0 {
            return Ok(pairs[index as usize].1.clone());
        }

        if let Datum::Int(position) = key {
            let index = *position - 1;
            if index >= 0 && index < pairs.len() as i32 {
                return Ok(pairs[index as usize].1.clone());
            }
            return Err(ScriptError::new(format!("Index out of range: {position}")));
        }
        if is_required {
            return Err(ScriptError::new(format!(
                "Prop not found: {}",
                key.type_str()
            )));
        }
        Ok(DatumRef::Void)
    }

    /// Replaces the value under an existing key, or inserts keeping the
    /// sort order when the list was sorted.
    pub fn set_prop(
        vm: &mut LingoVm,
        prop_list_ref: &DatumRef,
        key_ref: &DatumRef,
        value_ref: &DatumRef,
        fail_if_missing: bool,
    ) -> Result<(), ScriptError> {
        let key = vm.get_datum(key_ref).clone();
        let (pairs, is_sorted) = {
            let (pairs, sorted) = vm.get_datum(prop_list_ref).to_map_tuple()?;
            (pairs.clone(), sorted)
        };
        let key_index = Self::get_key_index(vm, &pairs, &key)?;
        if fail_if_missing && key_index < 0 {
            return Err(ScriptError::new(format!("Prop not found: {}", key.type_str())));
        }
        let insert_index = if is_sorted {
            Self::find_index_to_add(vm, &pairs, key_ref)?
        } else {
            pairs.len()
        };
        let (pairs, _) = vm.get_datum_mut(prop_list_ref).to_map_mut()?;
        if key_index >= 0 {
            pairs[key_index as usize].1 = value_ref.clone();
        } else {
            pairs.insert(insert_index, (key_ref.clone(), value_ref.clone()));
        }
        Ok(())
    }

    fn find_index_to_add(
        vm: &LingoVm,
        pairs: &[PropListPair],
        key_ref: &DatumRef,
    ) -> Result<usize, ScriptError> {
        let key = vm.get_datum(key_ref);
        let mut low = 0usize;
        let mut high = pairs.len();
        while low < high {
            let mid = (low + high) / 2;
            let mid_key = vm.get_datum(&pairs[mid].0);
            if datum_less_than(mid_key, key)? {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        Ok(low)
    }
}

impl PropListDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        match handler_name {
            "count" => Self::count(vm, datum, args),
            "getAt" => Self::get_at(vm, datum, args),
            "setAt" => Self::set_at(vm, datum, args),
            "getProp" | "getPropRef" => Self::get_required_prop(vm, datum, args),
            "getaProp" => Self::get_a_prop(vm, datum, args),
            "setProp" => Self::set_prop(vm, datum, args),
            "setaProp" => Self::set_a_prop(vm, datum, args),
            "addProp" => Self::add_prop(vm, datum, args),
            "deleteProp" => Self::delete_prop(vm, datum, args),
            "getPropAt" => Self::get_prop_at(vm, datum, args),
            "deleteAt" => Self::delete_at(vm, datum, args),
            "findPos" => Self::find_pos(vm, datum, args),
            "sort" => Self::sort(vm, datum, args),
            "duplicate" => Ok(vm.duplicate_datum(datum)),
            "getOne" => Self::get_one(vm, datum, args),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("propList".to_string()))),
            "getLast" => Self::get_last(vm, datum, args),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for prop list datum"
            ))),
        }
    }

    fn pairs(vm: &LingoVm, datum: &DatumRef) -> Result<Vec<PropListPair>, ScriptError> {
        Ok(vm.get_datum(datum).to_map()?.clone())
    }

    fn count(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let count = Self::pairs(vm, datum)?.len();
        Ok(vm.alloc_datum(Datum::Int(count as i32)))
    }

    /// `getAt` treats integer keys as positions first.
    fn get_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("getAt"))?;
        let pairs = Self::pairs(vm, datum)?;
        let key = vm.get_datum(key_ref).clone();
        if let Datum::Int(position) = key {
            let index = position - 1;
            if index >= 0 && index < pairs.len() as i32 {
                return Ok(pairs[index as usize].1.clone());
            }
            return Err(ScriptError::new(format!("Index out of range: {position}")));
        }
        PropListUtils::get_prop(vm, &pairs, key_ref, false)
    }

    fn set_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("setAt"))?;
        let value_ref = args.get(1).ok_or_else(|| missing_arg("setAt"))?;
        let key = vm.get_datum(key_ref).clone();
        if let Datum::Int(position) = key {
            let index = position - 1;
            let (pairs, _) = vm.get_datum_mut(datum).to_map_mut()?;
            if index >= 0 && index < pairs.len() as i32 {
                pairs[index as usize].1 = value_ref.clone();
                return Ok(DatumRef::Void);
            }
            return Err(ScriptError::new(format!("Index out of range: {position}")));
        }
        PropListUtils::set_prop(vm, datum, key_ref, value_ref, false)?;
        Ok(DatumRef::Void)
    }

    fn get_required_prop(
        vm: &mut LingoVm,
        datum: &DatumRef,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("getProp"))?;
        let pairs = Self::pairs(vm, datum)?;
        PropListUtils::get_prop(vm, &pairs, key_ref, true)
    }

    fn get_a_prop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("getaProp"))?;
        let pairs = Self::pairs(vm, datum)?;
        PropListUtils::get_prop(vm, &pairs, key_ref, false)
    }

    /// `setProp` with 3 args performs nested indexing into a list-valued
    /// property; with 2 args it requires the property to exist.
    fn set_prop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        if args.len() == 3 {
            let key_ref = &args[0];
            let index_ref = &args[1];
            let value_ref = &args[2];

            let pairs = Self::pairs(vm, datum)?;
            let list_ref = PropListUtils::get_prop(vm, &pairs, key_ref, true)?;
            let index = vm.get_datum(index_ref).int_value()?;
            let adjusted = if index <= 0 { 0 } else { (index - 1) as usize };
            let (items, _) = vm.get_datum_mut(&list_ref).to_list_mut()?;
            if adjusted < items.len() {
                items[adjusted] = value_ref.clone();
                Ok(DatumRef::Void)
            } else {
                Err(ScriptError::new(format!("Index out of bounds: {index}")))
            }
        } else if args.len() == 2 {
            PropListUtils::set_prop(vm, datum, &args[0], &args[1], true)?;
            Ok(DatumRef::Void)
        } else {
            Err(ScriptError::new(format!(
                "Invalid number of arguments for setProp: {}",
                args.len()
            )))
        }
    }

    fn set_a_prop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("setaProp"))?;
        let value_ref = args.get(1).ok_or_else(|| missing_arg("setaProp"))?;
        PropListUtils::set_prop(vm, datum, key_ref, value_ref, false)?;
        Ok(DatumRef::Void)
    }

    fn add_prop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("addProp"))?;
        let value_ref = args.get(1).ok_or_else(|| missing_arg("addProp"))?;
        PropListUtils::set_prop(vm, datum, key_ref, value_ref, false)?;
        Ok(DatumRef::Void)
    }

    fn delete_prop(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("deleteProp"))?;
        let key = vm.get_datum(key_ref).clone();
        let pairs = Self::pairs(vm, datum)?;
        let index = PropListUtils::get_key_index(vm, &pairs, &key)?;
        if index >= 0 {
            let (pairs, _) = vm.get_datum_mut(datum).to_map_mut()?;
            pairs.remove(index as usize);
            Ok(vm.alloc_datum(datum_bool(true)))
        } else {
            Ok(vm.alloc_datum(datum_bool(false)))
        }
    }

    fn get_prop_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("getPropAt"))?)
            .int_value()?;
        let pairs = Self::pairs(vm, datum)?;
        let index = position - 1;
        if index < 0 || index >= pairs.len() as i32 {
            return Err(ScriptError::new(format!("Index out of range: {position}")));
        }
        Ok(pairs[index as usize].0.clone())
    }

    fn delete_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("deleteAt"))?)
            .int_value()?;
        let (pairs, _) = vm.get_datum_mut(datum).to_map_mut()?;
        let index = position - 1;
        if index < 0 || index >= pairs.len() as i32 {
            return Err(ScriptError::new(format!("Index out of range: {position}")));
        }
        pairs.remove(index as usize);
        Ok(DatumRef::Void)
    }

    /// 1-based position of a key, `Void` when not present.
    fn find_pos(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let key_ref = args.first().ok_or_else(|| missing_arg("findPos"))?;
        let key = vm.get_datum(key_ref).clone();
        let pairs = Self::pairs(vm, datum)?;
        let index = PropListUtils::get_key_index(vm, &pairs, &key)?;
        if index >= 0 {
            Ok(vm.alloc_datum(Datum::Int(index + 1)))
        } else {
            Ok(DatumRef::Void)
        }
    }

    fn sort(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let pairs = Self::pairs(vm, datum)?;
        let mut sorted_pairs = pairs;
        sorted_pairs.sort_by(|a, b| {
            let left = vm.get_datum(&a.0);
            let right = vm.get_datum(&b.0);
            if datum_equals(left, right, &vm.allocator).unwrap_or(false) {
                std::cmp::Ordering::Equal
            } else if datum_less_than(left, right).unwrap_or(false) {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });
        let (pairs, sorted) = vm.get_datum_mut(datum).to_map_mut()?;
        *pairs = sorted_pairs;
        *sorted = true;
        Ok(DatumRef::Void)
    }

    fn get_one(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let needle_ref = args.first().ok_or_else(|| missing_arg("getOne"))?;
        let needle = vm.get_datum(needle_ref).clone();
        let pairs = Self::pairs(vm, datum)?;
        for (key_ref, value_ref) in pairs {
            let value = vm.get_datum(&value_ref);
            if datum_equals(value, &needle, &vm.allocator)? {
                return Ok(key_ref);
            }
        }
        Ok(vm.alloc_datum(Datum::Int(0)))
    }

    fn get_last(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let pairs = Self::pairs(vm, datum)?;
        Ok(pairs.last().map(|(_, value)| value.clone()).unwrap_or(DatumRef::Void))
    }
}

fn missing_arg(handler: &str) -> ScriptError {
    ScriptError::new(format!("Missing argument for {handler}"))
}
