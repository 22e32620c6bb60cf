//! # Driver Layer
//!
//! Drivers do Forge PollIdle.
//!
//! ## Drivers Implementados
//!
//! | Driver    | Arquivo      | Função |
//! |-----------|--------------|--------|
//! | Serial    | `serial.rs`  | Sink dos logs (PL011 MMIO) |
//! | CpuIdle   | `cpuidle/`   | Estados WFE (polling) e WFI por CPU |
//! | TimerTest | `timertest/` | Detector de stall de timers |
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          Loop de idle do scheduler          │
//! └─────────────────────────────────────────────┘
//!                      ↓ enter_state
//! ┌─────────────────────────────────────────────┐
//! │  cpuidle: WFE (armado em NEED_RESCHED)      │
//! │           WFI (arch_cpu_idle)               │
//! └─────────────────────────────────────────────┘
//!                      ↓ IdlePlatform
//! ┌─────────────────────────────────────────────┐
//! │  arch: LDAXR / WFE / WFI / DAIF             │
//! └─────────────────────────────────────────────┘
//! ```

pub mod cpuidle; // WFE/WFI polling idle
pub mod serial; // PL011 - Logs
pub mod timertest; // Stall detector de timers
