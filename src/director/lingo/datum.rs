use num_derive::FromPrimitive;

use crate::vm::{
    bitmap::BitmapRef, cast_lib::CastMemberRef, datum_ref::DatumRef, script::ScriptInstanceId,
    ScriptError,
};

/// Discriminant of [`Datum`], used where only the kind matters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatumKind {
    Void,
    Int,
    Float,
    String,
    StringChunk,
    Symbol,
    List,
    ArgList,
    ArgListNoRet,
    PropList,
    Point,
    Rect,
    Color,
    CastLibRef,
    CastMemberRef,
    ScriptRef,
    ScriptInstance,
    SpriteRef,
    XtraRef,
    XtraInstance,
    TimeoutRef,
    Image,
}

/// Which flavour of linear list a `Datum::List` is. Arg lists are the
/// internal argument-passing markers consumed by the call opcodes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ListKind {
    List,
    ArgList,
    ArgListNoRet,
}

#[derive(Clone, Copy, FromPrimitive)]
pub enum StringChunkType {
    Item = 1,
    Word = 2,
    Char = 3,
    Line = 4,
}

impl StringChunkType {
    pub fn from_prop_id(n: i32) -> Option<StringChunkType> {
        num::FromPrimitive::from_i32(n)
    }

    pub fn from_name(s: &str) -> Option<StringChunkType> {
        match s {
            "item" => Some(StringChunkType::Item),
            "word" => Some(StringChunkType::Word),
            "char" => Some(StringChunkType::Char),
            "line" => Some(StringChunkType::Line),
            _ => None,
        }
    }
}

/// A `char 2 to 5 of ...` style sub-range. Bounds are 1-indexed; `end == 0`
/// means "same as start".
#[derive(Clone)]
pub struct StringChunkExpr {
    pub chunk_type: StringChunkType,
    pub start: i32,
    pub end: i32,
    pub item_delimiter: char,
}

/// Where a string chunk was taken from, so mutation writes through.
#[derive(Clone)]
pub enum StringChunkSource {
    Datum(DatumRef),
    Member(CastMemberRef),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ColorRef {
    Rgb(u8, u8, u8),
    PaletteIndex(u8),
}

impl ColorRef {
    pub fn from_hex(hex: &str) -> ColorRef {
        let hex = hex.trim_start_matches('#');
        let parse = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        if hex.len() >= 6 {
            ColorRef::Rgb(parse(&hex[0..2]), parse(&hex[2..4]), parse(&hex[4..6]))
        } else {
            ColorRef::Rgb(0, 0, 0)
        }
    }
}

pub type PropListPair = (DatumRef, DatumRef);
pub type TimeoutName = String;
pub type XtraInstanceId = u32;

/// The universal Lingo runtime value.
///
/// Lists and property lists hold arena references so that Lingo's
/// reference semantics (mutation in place, shared views) fall out naturally.
/// The trailing bool on both is the sorted flag maintained by `sort`.
#[derive(Clone)]
pub enum Datum {
    Void,
    Int(i32),
    Float(f64),
    String(String),
    StringChunk(StringChunkSource, StringChunkExpr, String),
    Symbol(String),
    List(ListKind, Vec<DatumRef>, bool),
    PropList(Vec<PropListPair>, bool),
    Point((i32, i32)),
    Rect((i32, i32, i32, i32)),
    Color(ColorRef),
    CastLib(u32),
    CastMember(CastMemberRef),
    ScriptRef(CastMemberRef),
    ScriptInstance(ScriptInstanceId),
    SpriteRef(i16),
    Xtra(String),
    XtraInstance(String, XtraInstanceId),
    TimeoutRef(TimeoutName),
    Image(BitmapRef),
}

impl Datum {
    pub fn kind(&self) -> DatumKind {
        match self {
            Datum::Void => DatumKind::Void,
            Datum::Int(_) => DatumKind::Int,
            Datum::Float(_) => DatumKind::Float,
            Datum::String(_) => DatumKind::String,
            Datum::StringChunk(..) => DatumKind::StringChunk,
            Datum::Symbol(_) => DatumKind::Symbol,
            Datum::List(ListKind::List, ..) => DatumKind::List,
            Datum::List(ListKind::ArgList, ..) => DatumKind::ArgList,
            Datum::List(ListKind::ArgListNoRet, ..) => DatumKind::ArgListNoRet,
            Datum::PropList(..) => DatumKind::PropList,
            Datum::Point(_) => DatumKind::Point,
            Datum::Rect(_) => DatumKind::Rect,
            Datum::Color(_) => DatumKind::Color,
            Datum::CastLib(_) => DatumKind::CastLibRef,
            Datum::CastMember(_) => DatumKind::CastMemberRef,
            Datum::ScriptRef(_) => DatumKind::ScriptRef,
            Datum::ScriptInstance(_) => DatumKind::ScriptInstance,
            Datum::SpriteRef(_) => DatumKind::SpriteRef,
            Datum::Xtra(_) => DatumKind::XtraRef,
            Datum::XtraInstance(..) => DatumKind::XtraInstance,
            Datum::TimeoutRef(_) => DatumKind::TimeoutRef,
            Datum::Image(_) => DatumKind::Image,
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self.kind() {
            DatumKind::Void => "void",
            DatumKind::Int => "int",
            DatumKind::Float => "float",
            DatumKind::String => "string",
            DatumKind::StringChunk => "string_chunk",
            DatumKind::Symbol => "symbol",
            DatumKind::List => "list",
            DatumKind::ArgList => "arg_list",
            DatumKind::ArgListNoRet => "arg_list_no_ret",
            DatumKind::PropList => "prop_list",
            DatumKind::Point => "point",
            DatumKind::Rect => "rect",
            DatumKind::Color => "color",
            DatumKind::CastLibRef => "cast_lib",
            DatumKind::CastMemberRef => "cast_member",
            DatumKind::ScriptRef => "script_ref",
            DatumKind::ScriptInstance => "script_instance",
            DatumKind::SpriteRef => "sprite_ref",
            DatumKind::XtraRef => "xtra",
            DatumKind::XtraInstance => "xtra_instance",
            DatumKind::TimeoutRef => "timeout",
            DatumKind::Image => "image",
        }
    }

    pub fn string_value(&self) -> Result<String, ScriptError> {
        match self {
            Datum::String(s) => Ok(s.clone()),
            Datum::StringChunk(_, _, value) => Ok(value.clone()),
            Datum::Int(n) => Ok(n.to_string()),
            Datum::Float(n) => Ok(n.to_string()),
            Datum::Symbol(s) => Ok(s.clone()),
            Datum::Void => Ok("".to_string()),
            _ => Err(ScriptError::new(format!(
                "Cannot convert datum of type {} to string",
                self.type_str()
            ))),
        }
    }

    pub fn symbol_value(&self) -> Result<String, ScriptError> {
        match self {
            Datum::Symbol(s) => Ok(s.clone()),
            _ => Err(ScriptError::new(format!(
                "Cannot convert datum of type {} to symbol",
                self.type_str()
            ))),
        }
    }

    pub fn int_value(&self) -> Result<i32, ScriptError> {
        match self {
            Datum::Int(n) => Ok(*n),
            Datum::Float(n) => Ok(*n as i32),
            Datum::String(s) => Ok(parse_leading_number(s).map(|f| f as i32).unwrap_or(0)),
            Datum::StringChunk(_, _, s) => {
                Ok(parse_leading_number(s).map(|f| f as i32).unwrap_or(0))
            }
            Datum::SpriteRef(n) => Ok(*n as i32),
            Datum::CastMember(member_ref) => Ok(member_ref.cast_member),
            Datum::Symbol(_) => Ok(0),
            Datum::Void => Ok(0),
            _ => Err(ScriptError::new(format!(
                "Cannot convert datum of type {} to int",
                self.type_str()
            ))),
        }
    }

    pub fn float_value(&self) -> Result<f64, ScriptError> {
        match self {
            Datum::Float(n) => Ok(*n),
            Datum::Int(n) => Ok(*n as f64),
            Datum::String(s) => Ok(parse_leading_number(s).unwrap_or(0.0)),
            Datum::StringChunk(_, _, s) => Ok(parse_leading_number(s).unwrap_or(0.0)),
            Datum::SpriteRef(n) => Ok(*n as f64),
            Datum::Void => Ok(0.0),
            _ => Err(ScriptError::new(format!(
                "Cannot convert datum of type {} to float",
                self.type_str()
            ))),
        }
    }

    /// Lingo truthiness. Strings and symbols are not coerced: a non-empty
    /// string used in a condition is an authoring error that Director
    /// forgives as true, and symbols always count as true.
    pub fn bool_value(&self) -> Result<bool, ScriptError> {
        match self {
            Datum::Int(n) => Ok(*n != 0),
            Datum::Float(n) => Ok(*n != 0.0),
            Datum::Symbol(..) => Ok(true),
            Datum::String(s) => Ok(!s.is_empty()),
            Datum::StringChunk(_, _, s) => Ok(!s.is_empty()),
            Datum::Void => Ok(false),
            _ => Err(ScriptError::new(format!(
                "Cannot convert datum of type {} to bool",
                self.type_str()
            ))),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Datum::Int(_) | Datum::Float(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Datum::Int(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Datum::String(_) | Datum::StringChunk(..))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Datum::Symbol(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Datum::List(..))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Datum::Void)
    }

    pub fn to_list(&self) -> Result<&Vec<DatumRef>, ScriptError> {
        match self {
            Datum::List(_, items, _) => Ok(items),
            _ => Err(ScriptError::new(format!(
                "Expected list, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_list_tuple(&self) -> Result<(ListKind, &Vec<DatumRef>, bool), ScriptError> {
        match self {
            Datum::List(kind, items, sorted) => Ok((*kind, items, *sorted)),
            _ => Err(ScriptError::new(format!(
                "Expected list, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_list_mut(&mut self) -> Result<(&mut Vec<DatumRef>, &mut bool), ScriptError> {
        match self {
            Datum::List(_, items, sorted) => Ok((items, sorted)),
            _ => Err(ScriptError::new("Expected list".to_string())),
        }
    }

    pub fn to_map(&self) -> Result<&Vec<PropListPair>, ScriptError> {
        match self {
            Datum::PropList(items, ..) => Ok(items),
            _ => Err(ScriptError::new(format!(
                "Expected prop list, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_map_tuple(&self) -> Result<(&Vec<PropListPair>, bool), ScriptError> {
        match self {
            Datum::PropList(items, sorted) => Ok((items, *sorted)),
            _ => Err(ScriptError::new(format!(
                "Expected prop list, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_map_mut(&mut self) -> Result<(&mut Vec<PropListPair>, &mut bool), ScriptError> {
        match self {
            Datum::PropList(items, sorted) => Ok((items, sorted)),
            _ => Err(ScriptError::new("Expected prop list".to_string())),
        }
    }

    pub fn to_point(&self) -> Result<(i32, i32), ScriptError> {
        match self {
            Datum::Point(p) => Ok(*p),
            _ => Err(ScriptError::new(format!(
                "Expected point, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_point_mut(&mut self) -> Result<&mut (i32, i32), ScriptError> {
        match self {
            Datum::Point(p) => Ok(p),
            _ => Err(ScriptError::new("Expected point".to_string())),
        }
    }

    pub fn to_rect(&self) -> Result<(i32, i32, i32, i32), ScriptError> {
        match self {
            Datum::Rect(r) => Ok(*r),
            _ => Err(ScriptError::new(format!(
                "Expected rect, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_rect_mut(&mut self) -> Result<&mut (i32, i32, i32, i32), ScriptError> {
        match self {
            Datum::Rect(r) => Ok(r),
            _ => Err(ScriptError::new("Expected rect".to_string())),
        }
    }

    pub fn to_color(&self) -> Result<ColorRef, ScriptError> {
        match self {
            Datum::Color(c) => Ok(*c),
            _ => Err(ScriptError::new(format!(
                "Expected color, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_member_ref(&self) -> Result<CastMemberRef, ScriptError> {
        match self {
            Datum::CastMember(member_ref) => Ok(member_ref.clone()),
            _ => Err(ScriptError::new(format!(
                "Expected cast member ref, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_script_instance_id(&self) -> Result<ScriptInstanceId, ScriptError> {
        match self {
            Datum::ScriptInstance(id) => Ok(*id),
            _ => Err(ScriptError::new(format!(
                "Expected script instance, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_bitmap_ref(&self) -> Result<BitmapRef, ScriptError> {
        match self {
            Datum::Image(bitmap_ref) => Ok(*bitmap_ref),
            _ => Err(ScriptError::new(format!(
                "Expected image, got {}",
                self.type_str()
            ))),
        }
    }

    pub fn to_string_mut(&mut self) -> Result<&mut String, ScriptError> {
        match self {
            Datum::String(s) => Ok(s),
            _ => Err(ScriptError::new("Expected string".to_string())),
        }
    }

    pub fn to_xtra_instance(&self) -> Result<(&String, XtraInstanceId), ScriptError> {
        match self {
            Datum::XtraInstance(name, id) => Ok((name, *id)),
            _ => Err(ScriptError::new(format!(
                "Expected xtra instance, got {}",
                self.type_str()
            ))),
        }
    }
}

/// Parses the leading decimal number of a string, Lingo-style: optional
/// sign, digits, optional fraction. Returns `None` when the string does not
/// start with a number.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

pub fn datum_bool(val: bool) -> Datum {
    if val {
        DATUM_TRUE
    } else {
        DATUM_FALSE
    }
}

pub const DATUM_TRUE: Datum = Datum::Int(1);
pub const DATUM_FALSE: Datum = Datum::Int(0);
