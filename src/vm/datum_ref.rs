use std::fmt::Display;

pub type DatumId = usize;

/// A stable handle into the VM's datum arena. `Void` is its own variant so
/// the ubiquitous undefined value never allocates.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum DatumRef {
    Void,
    Ref(DatumId),
}

pub const VOID_DATUM_REF: DatumRef = DatumRef::Void;

impl DatumRef {
    pub fn from_id(id: DatumId) -> DatumRef {
        if id != 0 {
            DatumRef::Ref(id)
        } else {
            DatumRef::Void
        }
    }

    pub fn id(&self) -> DatumId {
        match self {
            DatumRef::Void => 0,
            DatumRef::Ref(id) => *id,
        }
    }

    pub fn is_void_ref(&self) -> bool {
        matches!(self, DatumRef::Void)
    }
}

impl core::fmt::Debug for DatumRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatumRef::Void => write!(f, "DatumRef(Void)"),
            DatumRef::Ref(id) => write!(f, "DatumRef({})", id),
        }
    }
}

impl Display for DatumRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatumRef::Void => write!(f, "DatumRef(Void)"),
            DatumRef::Ref(id) => write!(f, "DatumRef({})", id),
        }
    }
}
