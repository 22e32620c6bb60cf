//! # ARM Polling Idle Driver
//!
//! Driver cpuidle com dois estados por CPU:
//!
//! | Índice | Nome | Entrada |
//! |--------|------|---------|
//! | 0      | WFE  | Polling com monitor armado sobre as flags da thread |
//! | 1      | WFI  | `arch_cpu_idle` |
//!
//! O estado WFE acorda assim que outra CPU escreve NEED_RESCHED (a escrita
//! limpa o monitor exclusivo) e desiste depois de `poll_limit` us. A
//! residência do WFI é o próprio `poll_limit`, então o governor só escolhe
//! WFI quando espera dormir mais do que o orçamento de polling.

pub mod driver;
pub mod params;
pub mod platform;
pub mod poll;

#[cfg(test)]
pub(crate) mod sim;


pub use driver::{build_driver, init_cpu, PollIdleRegistration, DRIVER_NAME, STATE_WFE, STATE_WFI};
pub use params::{PollIdleConfig, DEFAULT_POLL_LIMIT_US};
pub use platform::ArchPlatform;
pub use poll::{enter_wfe_poll, enter_wfi};
