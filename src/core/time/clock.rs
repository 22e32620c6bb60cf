/// Arquivo: core/time/clock.rs
///
/// Propósito: Relógio monotônico local (`local_clock`).
/// Usado pelo loop de polling para medir o tempo gasto em WFE.
///
/// Detalhes de Implementação:
/// - Unidade: nanosegundos, u64, nunca retrocede dentro de uma CPU.
/// - Em ARM64 a fonte é o contador genérico (CNTVCT_EL0 / CNTFRQ_EL0).
/// - Outras plataformas fornecem sua própria `ClockSource`.

pub const NSEC_PER_USEC: u64 = 1_000;
pub const NSEC_PER_MSEC: u64 = 1_000_000;
pub const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Duração de um tick do scheduler em ns.
pub const TICK_NSEC: u64 = NSEC_PER_SEC / super::jiffies::HZ;

/// Fonte de tempo monotônico por CPU.
pub trait ClockSource {
    /// Tempo atual em nanosegundos.
    fn now_ns(&self) -> u64;
}

/// Converte ticks de um contador de frequência `freq_hz` para ns sem overflow
/// intermediário.
pub const fn cycles_to_ns(cycles: u64, freq_hz: u64) -> u64 {
    if freq_hz == 0 {
        return 0;
    }
    ((cycles as u128 * NSEC_PER_SEC as u128) / freq_hz as u128) as u64
}

/// Contador genérico ARM como `local_clock`.
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub struct ArchCounterClock {
    freq_hz: u64,
}

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
impl ArchCounterClock {
    pub fn new() -> Self {
        Self {
            freq_hz: crate::arch::Cpu::counter_frequency(),
        }
    }
}

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
impl Default for ArchCounterClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
impl ClockSource for ArchCounterClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        cycles_to_ns(crate::arch::Cpu::read_counter(), self.freq_hz)
    }
}
