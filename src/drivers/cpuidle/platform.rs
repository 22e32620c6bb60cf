//! `IdlePlatform` sobre o hardware real.
//!
//! Liga os callbacks de idle à HAL (`crate::arch::Cpu`) e a uma
//! `ClockSource` (em ARM64, `ArchCounterClock`).

use crate::arch::{Cpu, CpuOps};
use crate::core::power::cpuidle::IdlePlatform;
use crate::core::time::clock::ClockSource;
use crate::sched::ThreadInfo;

/// Plataforma da CPU corrente.
pub struct ArchPlatform<'a, C: ClockSource> {
    clock: &'a C,
    idle_thread: &'a ThreadInfo,
}

impl<'a, C: ClockSource> ArchPlatform<'a, C> {
    /// `idle_thread` é a thread idle desta CPU (a que o scheduler marca com
    /// NEED_RESCHED).
    pub const fn new(clock: &'a C, idle_thread: &'a ThreadInfo) -> Self {
        Self { clock, idle_thread }
    }
}

impl<C: ClockSource> IdlePlatform for ArchPlatform<'_, C> {
    #[inline]
    fn local_clock(&self) -> u64 {
        self.clock.now_ns()
    }

    #[inline]
    fn local_irq_enable(&self) {
        Cpu::enable_interrupts();
    }

    #[inline]
    fn local_irq_disable(&self) {
        Cpu::disable_interrupts();
    }

    #[inline]
    fn wait_for_event(&self) {
        Cpu::wait_for_event();
    }

    fn cpu_idle(&self) {
        Cpu::idle();
    }

    #[inline]
    fn current_thread(&self) -> &ThreadInfo {
        self.idle_thread
    }
}
