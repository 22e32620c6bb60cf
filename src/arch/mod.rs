//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a **única** ponte entre o driver (lógica agnóstica) e o
//! hardware real. WFE/WFI, controle de IRQ e o load exclusivo que arma o
//! monitor passam por aqui.
//!
//! ## 🏗️ Arquitetura e Fluxo
//! 1. O driver importa `crate::arch::Cpu`.
//! 2. `Cpu` é um *type alias* para a implementação concreta
//!    (`aarch64::cpu::Arm64Cpu` ou `generic::cpu::GenericCpu`).
//! 3. `read_once_ex` escolhe o load exclusivo pela largura do tipo e cai para
//!    leitura volátil quando a largura não é suportada.
//!
//! ## Plataformas
//! - `aarch64`: LDAXR + WFE (monitor exclusivo real).
//! - `generic`: load atômico Acquire + `spin_loop` (fallback portátil; também
//!   é o que roda nos testes do host, inclusive em hosts ARM64, onde DAIF
//!   não é acessível em EL0).

pub mod readex;
pub mod traits;

// Seleção de Arquitetura: aarch64 bare-metal (EL1)
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub mod aarch64;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub use aarch64 as platform;

// Host e demais arquiteturas: fallback portátil
#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub mod generic;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub use generic as platform;

// Re-exports globais
pub use platform::Cpu;
pub use readex::{has_exclusive_width, read_once_ex};
pub use traits::*;
