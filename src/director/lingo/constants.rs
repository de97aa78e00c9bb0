use std::collections::HashMap;

use lazy_static::lazy_static;

use super::opcode::OpCode;

lazy_static! {
  pub static ref OPCODE_NAMES: HashMap<OpCode, &'static str> = HashMap::from([
    // single-byte
    (OpCode::Ret, "ret"),
    (OpCode::RetFactory, "retfactory"),
    (OpCode::PushZero, "pushzero"),
    (OpCode::Mul, "mul"),
    (OpCode::Add, "add"),
    (OpCode::Sub, "sub"),
    (OpCode::Div, "div"),
    (OpCode::Mod, "mod"),
    (OpCode::Inv, "inv"),
    (OpCode::JoinStr, "joinstr"),
    (OpCode::JoinPadStr, "joinpadstr"),
    (OpCode::Lt, "lt"),
    (OpCode::LtEq, "lteq"),
    (OpCode::NtEq, "nteq"),
    (OpCode::Eq, "eq"),
    (OpCode::Gt, "gt"),
    (OpCode::GtEq, "gteq"),
    (OpCode::And, "and"),
    (OpCode::Or, "or"),
    (OpCode::Not, "not"),
    (OpCode::ContainsStr, "containsstr"),
    (OpCode::Contains0Str, "contains0str"),
    (OpCode::GetChunk, "getchunk"),
    (OpCode::HiliteChunk, "hilitechunk"),
    (OpCode::OntoSpr, "ontospr"),
    (OpCode::IntoSpr, "intospr"),
    (OpCode::GetField, "getfield"),
    (OpCode::StartTell, "starttell"),
    (OpCode::EndTell, "endtell"),
    (OpCode::PushList, "pushlist"),
    (OpCode::PushPropList, "pushproplist"),
    (OpCode::Swap, "swap"),

    // multi-byte
    (OpCode::PushInt8, "pushint8"),
    (OpCode::PushArgListNoRet, "pusharglistnoret"),
    (OpCode::PushArgList, "pusharglist"),
    (OpCode::PushCons, "pushcons"),
    (OpCode::PushSymb, "pushsymb"),
    (OpCode::PushVarRef, "pushvarref"),
    (OpCode::GetGlobal2, "getglobal2"),
    (OpCode::GetGlobal, "getglobal"),
    (OpCode::GetProp, "getprop"),
    (OpCode::GetParam, "getparam"),
    (OpCode::GetLocal, "getlocal"),
    (OpCode::SetGlobal2, "setglobal2"),
    (OpCode::SetGlobal, "setglobal"),
    (OpCode::SetProp, "setprop"),
    (OpCode::SetParam, "setparam"),
    (OpCode::SetLocal, "setlocal"),
    (OpCode::Jmp, "jmp"),
    (OpCode::EndRepeat, "endrepeat"),
    (OpCode::JmpIfZ, "jmpifz"),
    (OpCode::LocalCall, "localcall"),
    (OpCode::ExtCall, "extcall"),
    (OpCode::ObjCallV4, "objcallv4"),
    (OpCode::Put, "put"),
    (OpCode::PutChunk, "putchunk"),
    (OpCode::DeleteChunk, "deletechunk"),
    (OpCode::Get, "get"),
    (OpCode::Set, "set"),
    (OpCode::GetMovieProp, "getmovieprop"),
    (OpCode::SetMovieProp, "setmovieprop"),
    (OpCode::GetObjProp, "getobjprop"),
    (OpCode::SetObjProp, "setobjprop"),
    (OpCode::TellCall, "tellcall"),
    (OpCode::Peek, "peek"),
    (OpCode::Pop, "pop"),
    (OpCode::TheBuiltin, "thebuiltin"),
    (OpCode::ObjCall, "objcall"),
    (OpCode::PushChunkVarRef, "pushchunkvarref"),
    (OpCode::PushInt16, "pushint16"),
    (OpCode::PushInt32, "pushint32"),
    (OpCode::GetChainedProp, "getchainedprop"),
    (OpCode::PushFloat32, "pushfloat32"),
    (OpCode::GetTopLevelProp, "gettoplevelprop"),
    (OpCode::NewObj, "newobj"),
  ]);

  /// `kOpGet`/`kOpSet` property type 0x00: movie properties by id.
  /// Ids 0x0c..=0x0f are "the last item/word/char/line of" and pop a string
  /// instead; they are handled inline by the opcode.
  pub static ref MOVIE_PROP_NAMES: HashMap<u16, &'static str> = HashMap::from([
    (0x00, "floatPrecision"),
    (0x01, "mouseDownScript"),
    (0x02, "mouseUpScript"),
    (0x03, "keyDownScript"),
    (0x04, "keyUpScript"),
    (0x05, "timeoutScript"),
    (0x06, "short time"),
    (0x07, "abbr time"),
    (0x08, "long time"),
    (0x09, "short date"),
    (0x0a, "abbr date"),
    (0x0b, "long date"),
  ]);

  /// Property type 0x06: sprite properties by id.
  pub static ref SPRITE_PROP_NAMES: HashMap<u16, &'static str> = HashMap::from([
    (0x01, "type"),
    (0x02, "backColor"),
    (0x03, "bottom"),
    (0x04, "castNum"),
    (0x05, "constraint"),
    (0x06, "cursor"),
    (0x07, "foreColor"),
    (0x08, "height"),
    (0x09, "immediate"),
    (0x0a, "ink"),
    (0x0b, "left"),
    (0x0c, "lineSize"),
    (0x0d, "locH"),
    (0x0e, "locV"),
    (0x0f, "movieRate"),
    (0x10, "movieTime"),
    (0x11, "pattern"),
    (0x12, "puppet"),
    (0x13, "right"),
    (0x14, "startTime"),
    (0x15, "stopTime"),
    (0x16, "stretch"),
    (0x17, "top"),
    (0x18, "trails"),
    (0x19, "visible"),
    (0x1a, "volume"),
    (0x1b, "width"),
    (0x1c, "blend"),
    (0x1d, "scriptNum"),
    (0x1e, "moveableSprite"),
    (0x1f, "editableText"),
    (0x20, "scoreColor"),
    (0x21, "loc"),
    (0x22, "rect"),
    (0x23, "memberNum"),
    (0x24, "castLibNum"),
    (0x25, "member"),
    (0x26, "scriptInstanceList"),
    (0x27, "currentTime"),
    (0x28, "mostRecentCuePoint"),
    (0x29, "tweened"),
    (0x2a, "name"),
  ]);

  /// Property type 0x07: movie-wide "animation" state.
  pub static ref ANIM_PROP_NAMES: HashMap<u16, &'static str> = HashMap::from([
    (0x01, "beepOn"),
    (0x02, "buttonStyle"),
    (0x03, "centerStage"),
    (0x04, "checkBoxAccess"),
    (0x05, "checkboxType"),
    (0x06, "colorDepth"),
    (0x07, "colorQD"),
    (0x08, "exitLock"),
    (0x09, "fixStageSize"),
    (0x0a, "fullColorPermit"),
    (0x0b, "imageDirect"),
    (0x0c, "doubleClick"),
    (0x0d, "key"),
    (0x0e, "lastClick"),
    (0x0f, "lastEvent"),
    (0x10, "keyCode"),
    (0x11, "lastKey"),
    (0x12, "lastRoll"),
    (0x13, "timeoutLapsed"),
    (0x14, "multiSound"),
    (0x15, "pauseState"),
    (0x16, "quickTimePresent"),
    (0x17, "selEnd"),
    (0x18, "selStart"),
    (0x19, "soundEnabled"),
    (0x1a, "soundLevel"),
    (0x1b, "stageColor"),
    (0x1d, "switchColorDepth"),
    (0x1e, "timeoutKeyDown"),
    (0x1f, "timeoutLength"),
    (0x20, "timeoutMouse"),
    (0x21, "timeoutPlay"),
    (0x22, "timer"),
    (0x23, "preLoadRAM"),
    (0x24, "videoForWindowsPresent"),
    (0x25, "netPresent"),
    (0x26, "safePlayer"),
    (0x27, "soundKeepDevice"),
    (0x28, "soundMixMedia"),
  ]);

  /// Property type 0x08: counts over movie-wide collections.
  pub static ref ANIM2_PROP_NAMES: HashMap<u16, &'static str> = HashMap::from([
    (0x01, "perFrameHook"),
    (0x02, "number of castMembers"),
    (0x03, "number of menus"),
    (0x04, "number of castLibs"),
    (0x05, "number of xtras"),
  ]);
}

pub fn get_opcode_name(opcode: &OpCode) -> &'static str {
    OPCODE_NAMES.get(opcode).copied().unwrap_or("unknown")
}

pub fn get_movie_prop_name(prop_id: u16) -> Option<&'static str> {
    MOVIE_PROP_NAMES.get(&prop_id).copied()
}

pub fn get_sprite_prop_name(prop_id: u16) -> Option<&'static str> {
    SPRITE_PROP_NAMES.get(&prop_id).copied()
}

pub fn get_anim_prop_name(prop_id: u16) -> Option<&'static str> {
    ANIM_PROP_NAMES.get(&prop_id).copied()
}

pub fn get_anim2_prop_name(prop_id: u16) -> Option<&'static str> {
    ANIM2_PROP_NAMES.get(&prop_id).copied()
}
