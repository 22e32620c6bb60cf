//! System Definitions.
//!
//! Contém os códigos de erro compartilhados entre o driver e quem o registra.

pub mod error;

pub use error::Errno;
