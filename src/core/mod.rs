//! Core Module
//!
//! Lógica central independente de arquitetura: logging, tempo, energia e
//! topologia SMP.

pub mod logging;
pub mod power;
pub mod smp;
pub mod time;
