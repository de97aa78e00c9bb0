use crate::director::lingo::datum::Datum;

/// Host hooks the VM is parameterised on. Every provider may be absent;
/// lookups through a missing provider yield `Void` and mutations become
/// no-ops, so an incomplete host still runs movies.
pub struct Providers {
    pub movie: Option<Box<dyn MoviePropertyProvider>>,
    pub sprite: Option<Box<dyn SpritePropertyProvider>>,
    pub timeout: Option<Box<dyn TimeoutProvider>>,
    pub net: Option<Box<dyn NetworkProvider>>,
    pub params: Option<Box<dyn ExternalParamProvider>>,
    pub xtra: Option<Box<dyn XtraProvider>>,
}

impl Providers {
    pub fn none() -> Providers {
        Providers {
            movie: None,
            sprite: None,
            timeout: None,
            net: None,
            params: None,
            xtra: None,
        }
    }
}

/// Movie-level properties and navigation owned by the host player.
pub trait MoviePropertyProvider {
    fn get_movie_prop(&mut self, name: &str) -> Option<Datum>;
    fn set_movie_prop(&mut self, name: &str, value: Datum);
    fn item_delimiter(&self) -> Option<char> {
        None
    }
    fn set_item_delimiter(&mut self, _delimiter: char) {}
    fn go_to_frame(&mut self, frame: u32);
    fn go_to_label(&mut self, label: &str);
}

pub trait SpritePropertyProvider {
    fn get_sprite_prop(&mut self, channel: i16, name: &str) -> Option<Datum>;
    fn set_sprite_prop(&mut self, channel: i16, name: &str, value: Datum);
}

pub trait TimeoutProvider {
    fn create_timeout(&mut self, name: &str, period_ms: i32, handler: Datum, target: Datum);
    fn forget_timeout(&mut self, name: &str);
    fn get_timeout_prop(&mut self, name: &str, prop: &str) -> Option<Datum>;
    fn set_timeout_prop(&mut self, name: &str, prop: &str, value: Datum);
}

pub type NetTaskId = u32;

/// Network fetches, modelled as host tasks polled by integer id. The
/// provider owns any real concurrency; results must be visible to a
/// subsequent poll from the VM thread.
pub trait NetworkProvider {
    fn preload_net_thing(&mut self, url: &str) -> NetTaskId;
    fn post_net_text(&mut self, url: &str, body: &str) -> NetTaskId;
    fn net_done(&mut self, task_id: NetTaskId) -> bool;
    fn net_text_result(&mut self, task_id: NetTaskId) -> Option<String>;
    fn net_byte_result(&mut self, task_id: NetTaskId) -> Option<Vec<u8>>;
    fn net_error(&mut self, task_id: NetTaskId) -> Option<String>;
    fn get_stream_status(&mut self, task_id: NetTaskId) -> Option<Datum>;
    /// Asked to locate an external cast file; candidates are tried in
    /// order (`.cct`, `.cst`, `.cxt`).
    fn resolve_cast_path(&mut self, candidates: &[String]) -> Option<String> {
        candidates.first().cloned()
    }
}

/// Parameters passed by the embedding page/projector.
pub trait ExternalParamProvider {
    fn get_param_value(&mut self, name: &str) -> Option<String>;
    fn get_param_name(&mut self, index: usize) -> Option<String>;
    fn param_count(&mut self) -> usize;
}

/// The abstract Xtra surface; the concrete Xtras ecosystem stays outside
/// the core.
pub trait XtraProvider {
    fn is_registered(&mut self, name: &str) -> bool;
    fn create_instance(&mut self, name: &str, args: &[Datum]) -> u32;
    fn call_instance_handler(
        &mut self,
        name: &str,
        instance_id: u32,
        handler: &str,
        args: &[Datum],
    ) -> Option<Datum>;
}
