pub mod cast;
pub mod datum_handlers;
pub mod movie;
pub mod net;
pub mod string;
pub mod types;

use log::debug;

use self::{
    cast::CastHandlers, movie::MovieHandlers, net::NetHandlers, string::StringHandlers,
    types::TypeHandlers,
};

use super::{datum_ref::DatumRef, LingoVm, ScriptError, ScriptErrorCode};

/// The global Lingo function registry. Lookup is case-insensitive; an
/// unknown name reports `HandlerNotFound` so `EXT_CALL` can degrade to
/// `Void`.
pub fn call_builtin(
    vm: &mut LingoVm,
    name: &str,
    args: &[DatumRef],
) -> Result<DatumRef, ScriptError> {
    match name.to_lowercase().as_str() {
        // math
        "abs" => TypeHandlers::abs(vm, args),
        "sqrt" => TypeHandlers::sqrt(vm, args),
        "sin" => TypeHandlers::sin(vm, args),
        "cos" => TypeHandlers::cos(vm, args),
        "tan" => TypeHandlers::tan(vm, args),
        "atan" => TypeHandlers::atan(vm, args),
        "power" => TypeHandlers::power(vm, args),
        "random" => TypeHandlers::random(vm, args),
        "min" => TypeHandlers::min(vm, args),
        "max" => TypeHandlers::max(vm, args),
        "pi" => TypeHandlers::pi(vm, args),
        "integer" => TypeHandlers::integer(vm, args),
        "float" => TypeHandlers::float(vm, args),
        "bitand" => TypeHandlers::bit_and(vm, args),
        "bitor" => TypeHandlers::bit_or(vm, args),
        "bitxor" => TypeHandlers::bit_xor(vm, args),

        // type predicates and conversions
        "ilk" => TypeHandlers::ilk(vm, args),
        "objectp" => TypeHandlers::objectp(vm, args),
        "voidp" => TypeHandlers::voidp(vm, args),
        "listp" => TypeHandlers::listp(vm, args),
        "stringp" => TypeHandlers::stringp(vm, args),
        "integerp" => TypeHandlers::integerp(vm, args),
        "floatp" => TypeHandlers::floatp(vm, args),
        "symbolp" => TypeHandlers::symbolp(vm, args),
        "symbol" => TypeHandlers::symbol(vm, args),
        "value" => TypeHandlers::value(vm, args),
        "void" => Ok(DatumRef::Void),
        "script" => MovieHandlers::script(vm, args),
        "callancestor" => TypeHandlers::call_ancestor(vm, args),

        // lists and prop lists
        "list" => TypeHandlers::list(vm, args),
        "count" | "getat" | "setat" | "addat" | "deleteat" | "append" | "add" | "getone"
        | "getlast" | "deleteone" | "sort" | "getprop" | "setprop" | "addprop" | "deleteprop"
        | "getaprop" | "setaprop" | "getpropat" | "findpos" | "getpos" | "duplicate" => {
            TypeHandlers::dispatch_to_first_arg(vm, name, args)
        }

        // strings
        "string" => StringHandlers::string(vm, args),
        "length" => StringHandlers::length(vm, args),
        "chars" => StringHandlers::chars(vm, args),
        "chartonum" => StringHandlers::char_to_num(vm, args),
        "numtochar" => StringHandlers::num_to_char(vm, args),
        "offset" => StringHandlers::offset(vm, args),
        "space" => StringHandlers::space(vm, args),

        // constructors
        "point" => TypeHandlers::point(vm, args),
        "rect" => TypeHandlers::rect(vm, args),
        "rgb" | "color" => TypeHandlers::rgb(vm, args),
        "paletteindex" => TypeHandlers::palette_index(vm, args),
        "image" => TypeHandlers::image(vm, args),
        "new" => TypeHandlers::new(vm, args),
        "timeout" => TypeHandlers::timeout(vm, args),
        "xtra" => TypeHandlers::xtra(vm, args),

        // control flow
        "halt" | "abort" => MovieHandlers::halt(vm, args),
        "nothing" => Ok(DatumRef::Void),
        "param" => MovieHandlers::param(vm, args),
        "go" => MovieHandlers::go(vm, args),
        "pass" => MovieHandlers::pass(vm, args),
        "stopevent" => MovieHandlers::pass(vm, args),
        "put" => MovieHandlers::put(vm, args),
        "updatestage" => Ok(DatumRef::Void),
        "cursor" => Ok(DatumRef::Void),

        // cast
        "castlib" => CastHandlers::cast_lib(vm, args),
        "member" => CastHandlers::member(vm, args),
        "field" => CastHandlers::field(vm, args),
        "preloadcasts" => CastHandlers::preload_casts(vm, args),

        // windows / tempo
        "movetofront" | "movetoback" => Ok(DatumRef::Void),
        "puppettempo" => MovieHandlers::puppet_tempo(vm, args),
        "puppetsprite" => MovieHandlers::puppet_sprite(vm, args),
        "sprite" => MovieHandlers::sprite(vm, args),

        // network
        "preloadnetthing" => NetHandlers::preload_net_thing(vm, args),
        "getnettext" => NetHandlers::get_net_text(vm, args),
        "postnettext" => NetHandlers::post_net_text(vm, args),
        "netdone" => NetHandlers::net_done(vm, args),
        "neterror" => NetHandlers::net_error(vm, args),
        "nettextresult" => NetHandlers::net_text_result(vm, args),
        "getstreamstatus" => NetHandlers::get_stream_status(vm, args),
        "gotonetpage" => Ok(DatumRef::Void),

        // embed params
        "externalparamvalue" => MovieHandlers::external_param_value(vm, args),
        "externalparamname" => MovieHandlers::external_param_name(vm, args),
        "externalparamcount" => MovieHandlers::external_param_count(vm, args),

        // prefs are host storage; absent host means silent no-op
        "getpref" => Ok(DatumRef::Void),
        "setpref" => Ok(DatumRef::Void),

        _ => {
            debug!("no built-in handler: {name}");
            Err(ScriptError::new_code(
                ScriptErrorCode::HandlerNotFound,
                format!("No built-in handler: {name}"),
            ))
        }
    }
}
