use crate::{
    director::lingo::datum::{datum_bool, Datum},
    vm::{
        compare::{datum_equals, datum_greater_than, datum_less_than, sort_datums},
        datum_ref::DatumRef,
        LingoVm, ScriptError,
    },
};

pub struct ListDatumHandlers {}
pub struct ListDatumUtils {}

impl ListDatumUtils {
    pub fn get_prop(
        vm: &LingoVm,
        list: &[DatumRef],
        prop_name: &str,
    ) -> Result<Datum, ScriptError> {
        match prop_name {
            "count" => Ok(Datum::Int(list.len() as i32)),
            "ilk" => Ok(Datum::Symbol("list".to_string())),
            "last" => match list.last() {
                Some(item) => Ok(vm.get_datum(item).clone()),
                None => Ok(Datum::Void),
            },
            _ => Err(ScriptError::new(format!(
                "Invalid list property {prop_name}"
            ))),
        }
    }
}

impl ListDatumHandlers {
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
            "addAt" => Self::add_at(vm, datum, args),
            "deleteAt" => Self::delete_at(vm, datum, args),
            "add" | "append" => Self::append(vm, datum, args),
            "getOne" | "getPos" | "findPos" => Self::get_one(vm, datum, args),
            "getLast" => Self::get_last(vm, datum, args),
            "deleteOne" => Self::delete_one(vm, datum, args),
            "sort" => Self::sort(vm, datum, args),
            "duplicate" => Ok(vm.duplicate_datum(datum)),
            "max" => Self::max(vm, datum, args),
            "min" => Self::min(vm, datum, args),
            "getaProp" | "getProp" => Self::get_at(vm, datum, args),
            "ilk" => Ok(vm.alloc_datum(Datum::Symbol("list".to_string()))),
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for list datum"
            ))),
        }
    }

    fn list_items(vm: &LingoVm, datum: &DatumRef) -> Result<Vec<DatumRef>, ScriptError> {
        Ok(vm.get_datum(datum).to_list()?.clone())
    }

    fn count(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let count = Self::list_items(vm, datum)?.len();
        Ok(vm.alloc_datum(Datum::Int(count as i32)))
    }

    fn get_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("getAt"))?)
            .int_value()?;
        let items = Self::list_items(vm, datum)?;
        let index = position - 1;
        if index < 0 || index >= items.len() as i32 {
            return Err(ScriptError::new(format!(
                "List index {position} out of bounds (list has {} items)",
                items.len()
            )));
        }
        Ok(items[index as usize].clone())
    }

    /// `setAt` pads the list with `Void` when the index runs past the end.
    fn set_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("setAt"))?)
            .int_value()?;
        let value_ref = args.get(1).ok_or_else(|| missing_arg("setAt"))?.clone();
        if position < 1 {
            return Err(ScriptError::new(format!("Invalid list index {position}")));
        }
        let index = (position - 1) as usize;
        let (items, _) = vm.get_datum_mut(datum).to_list_mut()?;
        if index >= items.len() {
            items.resize(index + 1, DatumRef::Void);
        }
        items[index] = value_ref;
        Ok(DatumRef::Void)
    }

    fn add_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("addAt"))?)
            .int_value()?;
        let value_ref = args.get(1).ok_or_else(|| missing_arg("addAt"))?.clone();
        let (items, sorted) = vm.get_datum_mut(datum).to_list_mut()?;
        let index = ((position - 1).max(0) as usize).min(items.len());
        items.insert(index, value_ref);
        *sorted = false;
        Ok(DatumRef::Void)
    }

    fn delete_at(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let position = vm
            .get_datum(args.first().ok_or_else(|| missing_arg("deleteAt"))?)
            .int_value()?;
        let (items, _) = vm.get_datum_mut(datum).to_list_mut()?;
        let index = position - 1;
        if index < 0 || index >= items.len() as i32 {
            return Err(ScriptError::new(format!(
                "List index {position} out of bounds"
            )));
        }
        items.remove(index as usize);
        Ok(DatumRef::Void)
    }

    fn append(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let value_ref = args.first().ok_or_else(|| missing_arg("append"))?.clone();
        let (items, sorted) = vm.get_datum_mut(datum).to_list_mut()?;
        items.push(value_ref);
        *sorted = false;
        Ok(DatumRef::Void)
    }

    /// 1-based position of the first equal element, 0 when absent.
    fn get_one(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let needle_ref = args.first().ok_or_else(|| missing_arg("getOne"))?;
        let needle = vm.get_datum(needle_ref).clone();
        let items = Self::list_items(vm, datum)?;
        let mut position = 0;
        for (index, item_ref) in items.iter().enumerate() {
            let item = vm.get_datum(item_ref);
            if datum_equals(item, &needle, &vm.allocator)? {
                position = index as i32 + 1;
                break;
            }
        }
        Ok(vm.alloc_datum(Datum::Int(position)))
    }

    fn get_last(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let items = Self::list_items(vm, datum)?;
        Ok(items.last().cloned().unwrap_or(DatumRef::Void))
    }

    fn delete_one(vm: &mut LingoVm, datum: &DatumRef, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let needle_ref = args.first().ok_or_else(|| missing_arg("deleteOne"))?;
        let needle = vm.get_datum(needle_ref).clone();
        let items = Self::list_items(vm, datum)?;
        let mut found_index = None;
        for (index, item_ref) in items.iter().enumerate() {
            let item = vm.get_datum(item_ref);
            if datum_equals(item, &needle, &vm.allocator)? {
                found_index = Some(index);
                break;
            }
        }
        if let Some(index) = found_index {
            let (items, _) = vm.get_datum_mut(datum).to_list_mut()?;
            items.remove(index);
            Ok(vm.alloc_datum(datum_bool(true)))
        } else {
            Ok(vm.alloc_datum(datum_bool(false)))
        }
    }

    fn sort(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let items = Self::list_items(vm, datum)?;
        let sorted_items = sort_datums(&items, &vm.allocator)?;
        let (items, sorted) = vm.get_datum_mut(datum).to_list_mut()?;
        *items = sorted_items;
        *sorted = true;
        Ok(DatumRef::Void)
    }

    fn max(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let items = Self::list_items(vm, datum)?;
        let mut best: Option<DatumRef> = None;
        for item_ref in items {
            let replace = match &best {
                None => true,
                Some(best_ref) => {
                    datum_greater_than(vm.get_datum(&item_ref), vm.get_datum(best_ref))?
                }
            };
            if replace {
                best = Some(item_ref);
            }
        }
        Ok(best.unwrap_or(DatumRef::Void))
    }

    fn min(vm: &mut LingoVm, datum: &DatumRef, _args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let items = Self::list_items(vm, datum)?;
        let mut best: Option<DatumRef> = None;
        for item_ref in items {
            let replace = match &best {
                None => true,
                Some(best_ref) => {
                    datum_less_than(vm.get_datum(&item_ref), vm.get_datum(best_ref))?
                }
            };
            if replace {
                best = Some(item_ref);
            }
        }
        Ok(best.unwrap_or(DatumRef::Void))
    }
}

fn missing_arg(handler: &str) -> ScriptError {
    ScriptError::new(format!("Missing argument for {handler}"))
}
