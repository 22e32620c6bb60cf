//! Implementação portátil da HAL (sem monitor exclusivo).

pub mod cpu;
pub mod readex;

pub use cpu::GenericCpu as Cpu;
