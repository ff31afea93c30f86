//! Domain types shared by the game-server lifecycle crates.
//!
//! Nothing here performs I/O: these are the shapes exchanged with the fleet control plane, the DNS directory, the retry queue and HTTP callers.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;
