use crate::{
    director::lingo::datum::Datum,
    vm::{cast_manager::CastPreloadReason, datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct CastLibDatumHandlers {}

impl CastLibDatumHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        let cast_num = match vm.get_datum(datum) {
            Datum::CastLib(num) => *num,
            other => {
                return Err(ScriptError::new(format!(
                    "Expected castLib, got {}",
                    other.type_str()
                )))
            }
        };
        match handler_name {
            "preload" | "preLoad" => {
                vm.preload_casts(CastPreloadReason::MemberAccess);
                Ok(DatumRef::Void)
            }
            "member" => Self::member(vm, cast_num, args),
            "getProp" => {
                let prop_name = vm
                    .get_datum(args.first().ok_or_else(|| {
                        ScriptError::new("Missing argument for getProp".to_string())
                    })?)
                    .string_value()?;
                let prop = vm.movie.cast_manager.get_cast(cast_num)?.get_prop(&prop_name)?;
                Ok(vm.alloc_datum(prop))
            }
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for castLib datum"
            ))),
        }
    }

    fn member(vm: &mut LingoVm, cast_num: u32, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let identifier = vm
            .get_datum(args.first().ok_or_else(|| {
                ScriptError::new("Missing argument for member".to_string())
            })?)
            .clone();
        let cast_datum = Datum::Int(cast_num as i32);
        let member_ref = vm
            .movie
            .cast_manager
            .find_member_ref_by_identifiers(&identifier, Some(&cast_datum))?;
        match member_ref {
            Some(member_ref) => Ok(vm.alloc_datum(Datum::CastMember(member_ref))),
            None => Ok(DatumRef::Void),
        }
    }
}
