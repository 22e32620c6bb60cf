//! Implementação ARM64 das operações de CPU (HAL).
//!
//! Usa Assembly inline para WFE/WFI e para o controle de IRQ via DAIF.
//!
//! # Segurança
//! Assume execução em EL1 (kernel).

use core::arch::asm;

use crate::arch::traits::cpu::CpuOps;

/// DAIF.I: IRQs mascaradas
const DAIF_I: u64 = 1 << 7;

pub struct Arm64Cpu;

impl Arm64Cpu {
    /// Lê o contador virtual genérico (CNTVCT_EL0).
    #[inline]
    pub fn read_counter() -> u64 {
        let cnt: u64;
        // ISB impede que a leitura seja especulada antes de instruções anteriores.
        unsafe {
            asm!("isb", "mrs {}, cntvct_el0", out(reg) cnt, options(nomem, nostack, preserves_flags));
        }
        cnt
    }

    /// Frequência do contador genérico em Hz (CNTFRQ_EL0).
    #[inline]
    pub fn counter_frequency() -> u64 {
        let freq: u64;
        unsafe {
            asm!("mrs {}, cntfrq_el0", out(reg) freq, options(nomem, nostack, preserves_flags));
        }
        freq
    }
}

impl CpuOps for Arm64Cpu {
    #[inline]
    fn wait_for_event() {
        // Sem `nomem`: funciona como barreira de compilador, igual ao
        // `asm volatile("wfe" ::: "memory")` do Linux.
        unsafe {
            asm!("wfe", options(nostack, preserves_flags));
        }
    }

    #[inline]
    fn wait_for_interrupt() {
        // cpu_do_idle: DSB antes do WFI garante que stores pendentes drenaram.
        unsafe {
            asm!("dsb sy", "wfi", options(nostack, preserves_flags));
        }
    }

    #[inline]
    fn disable_interrupts() {
        unsafe {
            asm!("msr daifset, #2", options(nostack, preserves_flags));
        }
    }

    #[inline]
    fn enable_interrupts() {
        unsafe {
            asm!("msr daifclr, #2", options(nostack, preserves_flags));
        }
    }

    fn are_interrupts_enabled() -> bool {
        let daif: u64;
        unsafe {
            asm!("mrs {}, daif", out(reg) daif, options(nomem, nostack, preserves_flags));
        }
        daif & DAIF_I == 0
    }
}
