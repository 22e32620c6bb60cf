//! Implementação ARM64 da HAL.

pub mod cpu;
pub mod readex;

pub use cpu::Arm64Cpu as Cpu;
