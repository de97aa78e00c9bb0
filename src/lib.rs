//! Runtime core for Macromedia/Adobe Director movies.
//!
//! Two halves:
//!
//! - [`director`] decodes the container formats — uncompressed RIFX
//!   (`.dir`/`.dxr`/`.cst`/`.cxt`) and Afterburner (`.dcr`/`.cct`) — down to
//!   typed chunks, cast libraries and compiled Lingo scripts.
//! - [`vm`] executes the compiled Lingo bytecode: a stack VM over a tagged
//!   [`Datum`](director::lingo::datum::Datum) value domain, with method
//!   dispatch across script instances and an ancestor chain.
//!
//! Everything a movie touches outside the VM (stage, sprites, timeouts,
//! network, embed params) is reached through the traits in
//! [`vm::providers`]; a missing provider degrades to `VOID` rather than
//! failing, matching Director's permissive behaviour.

pub mod director;
pub mod io;
pub mod vm;
