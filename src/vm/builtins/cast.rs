use crate::{
    director::lingo::datum::Datum,
    vm::{
        cast_manager::{member_ref_from_slot_number, CastPreloadReason},
        datum_ref::DatumRef,
        LingoVm, ScriptError,
    },
};

pub struct CastHandlers {}

impl CastHandlers {
    fn first(args: &[DatumRef]) -> Result<&DatumRef, ScriptError> {
        args.first()
            .ok_or_else(|| ScriptError::new("Missing argument".to_string()))
    }

    pub fn cast_lib(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let identifier = vm.get_datum(Self::first(args)?).clone();
        let cast = if identifier.is_string() {
            vm.movie
                .cast_manager
                .get_cast_by_name(&identifier.string_value()?)
        } else {
            vm.movie
                .cast_manager
                .get_cast_or_null(identifier.int_value()? as u32)
        };
        match cast {
            Some(cast) => {
                let number = cast.number;
                Ok(vm.alloc_datum(Datum::CastLib(number)))
            }
            None => Ok(DatumRef::Void),
        }
    }

    /// `member(n)` with `n > 65535` decodes an encoded slot number; a small
    /// number searches every library, falling back to cast 1. A string
    /// searches by member name. When the identifier lands in an external
    /// library still in `NONE`, the fetch is kicked off and `Void` comes
    /// back until the load completes.
    pub fn member(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let identifier = vm.get_datum(Self::first(args)?).clone();
        let cast_identifier = args.get(1).map(|r| vm.get_datum(r).clone());

        // touching members is a when-needed preload trigger
        vm.preload_casts(CastPreloadReason::MemberAccess);

        if let Ok(number) = identifier.int_value() {
            if identifier.is_number() && number > 0xFFFF {
                let member_ref = member_ref_from_slot_number(number as u32);
                return Ok(vm.alloc_datum(Datum::CastMember(member_ref)));
            }
        }

        let member_ref = vm
            .movie
            .cast_manager
            .find_member_ref_by_identifiers(&identifier, cast_identifier.as_ref())?;
        match member_ref {
            Some(member_ref) => Ok(vm.alloc_datum(Datum::CastMember(member_ref))),
            None => {
                // fall back to cast 1 for numeric lookups
                if identifier.is_number() {
                    let member_ref = crate::vm::cast_lib::cast_member_ref(1, identifier.int_value()?);
                    Ok(vm.alloc_datum(Datum::CastMember(member_ref)))
                } else {
                    Ok(DatumRef::Void)
                }
            }
        }
    }

    pub fn field(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let identifier = vm.get_datum(Self::first(args)?).clone();
        let text = vm
            .movie
            .cast_manager
            .get_field_value_by_identifiers(&identifier, None)?;
        Ok(vm.alloc_datum(Datum::String(text)))
    }

    /// `preloadCasts(mode)` — #movieLoaded blocks until every
    /// before-frame-one library is integrated (bounded by the host's
    /// synchronous poll contract).
    pub fn preload_casts(vm: &mut LingoVm, args: &[DatumRef]) -> Result<DatumRef, ScriptError> {
        let mode = args
            .first()
            .map(|r| vm.get_datum(r).string_value())
            .transpose()?
            .unwrap_or_else(|| "movieLoaded".to_string());
        let reason = match mode.as_str() {
            "afterFrameOne" => CastPreloadReason::AfterFrameOne,
            "memberAccess" => CastPreloadReason::MemberAccess,
            _ => CastPreloadReason::MovieLoaded,
        };
        vm.preload_casts(reason);
        Ok(DatumRef::Void)
    }
}
