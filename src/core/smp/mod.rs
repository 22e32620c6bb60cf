/// Arquivo: core/smp/mod.rs
///
/// Propósito: Módulo de Multiprocessamento Simétrico (SMP).
///
/// Módulos contidos:
/// - `topology`: IDs lógicos de CPU e máscaras de CPUs possíveis.
pub mod topology;

pub use topology::{CpuId, CpuMask, MAX_CPUS};
