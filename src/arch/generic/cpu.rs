//! CPU portátil: sem WFE/WFI reais.
//!
//! `wait_for_event` e `wait_for_interrupt` viram `spin_loop`, então o loop de
//! polling continua correto (retorno espúrio é permitido), só não economiza
//! energia. O estado de IRQ é emulado para manter o contrato do driver.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::arch::traits::cpu::CpuOps;

static IRQ_ENABLED: AtomicBool = AtomicBool::new(false);

pub struct GenericCpu;

impl CpuOps for GenericCpu {
    #[inline]
    fn wait_for_event() {
        core::hint::spin_loop();
    }

    #[inline]
    fn wait_for_interrupt() {
        core::hint::spin_loop();
    }

    fn disable_interrupts() {
        IRQ_ENABLED.store(false, Ordering::Relaxed);
    }

    fn enable_interrupts() {
        IRQ_ENABLED.store(true, Ordering::Relaxed);
    }

    fn are_interrupts_enabled() -> bool {
        IRQ_ENABLED.load(Ordering::Relaxed)
    }
}
