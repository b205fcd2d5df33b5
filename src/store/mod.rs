//! Hero storage module
//!
//! Holds the hero record type and the in-memory, mutex-guarded store that
//! every request handler shares through `AppState`.

mod hero;
mod memory;

pub use hero::Hero;
pub use memory::HeroStore;
