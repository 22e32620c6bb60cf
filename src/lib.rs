// (FASE2) src/lib.rs
//! Forge PollIdle.
//!
//! Driver cpuidle por polling para o Forge: a CPU ociosa espera em `WFE`
//! (monitor armado sobre as flags da thread) até o scheduler pedir
//! reschedule ou até estourar o orçamento de polling, e então cai para `WFI`.
//! Inclui também o detector de stall de timers usado em diagnóstico.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (tabela de drivers por CPU, lista de timers)
extern crate alloc;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (WFE/WFI, load exclusivo)
pub mod drivers; // Serial, driver cpuidle, timertest

// --- Módulos Centrais ---
pub mod core; // Logging, tempo, energia, SMP
pub mod sched; // Flags de thread (NEED_RESCHED/POLLING)
pub mod sys; // Errno

pub use crate::core::power::cpuidle::{CpuIdleDevice, CpuIdleDriver, IdlePlatform, IdleState};
pub use crate::drivers::cpuidle::{PollIdleConfig, PollIdleRegistration};
pub use crate::sys::Errno;
