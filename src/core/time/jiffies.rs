//! Arquivo: core/time/jiffies.rs
//!
//! Propósito: Jiffies (Contador de ticks do sistema).
//! Usado pelos timers de baixa resolução (detector de stall).
//!
//! Detalhes de Implementação:
//! - Usa AtomicU64 para ser thread-safe e lock-free.
//! - Incrementado pelo timer interrupt handler.

use core::sync::atomic::{AtomicU64, Ordering};

/// Ticks desde o boot.
pub(crate) static JIFFIES: AtomicU64 = AtomicU64::new(0);

/// Frequência do Tick (Ticks por segundo)
pub const HZ: u64 = 100;

/// Retorna o número atual de jiffies.
#[inline]
pub fn get_jiffies() -> u64 {
    JIFFIES.load(Ordering::Relaxed)
}

/// Incrementa o contador de jiffies e retorna o novo valor.
/// Deve ser chamado APENAS pelo handler de interrupção do timer.
#[inline]
pub fn inc_jiffies() -> u64 {
    JIFFIES.fetch_add(1, Ordering::Relaxed) + 1
}

/// Converte milisegundos para jiffies, arredondando para cima.
///
/// Um timer de 5 ms com HZ=100 precisa esperar 1 tick, nunca 0.
/// Satura em vez de estourar para intervalos absurdos.
#[inline]
pub const fn msecs_to_jiffies(millis: u64) -> u64 {
    millis.saturating_mul(HZ).div_ceil(1000)
}

/// Converte jiffies para milisegundos.
#[inline]
pub const fn jiffies_to_msecs(jiffies: u64) -> u64 {
    jiffies.saturating_mul(1000 / HZ)
}

/// `a` é estritamente depois de `b`, tolerando wrap-around.
#[inline]
pub const fn time_after(a: u64, b: u64) -> bool {
    (b.wrapping_sub(a) as i64) < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_delays_round_up_to_one_tick() {
        assert_eq!(msecs_to_jiffies(0), 0);
        assert_eq!(msecs_to_jiffies(5), 1);
        assert_eq!(msecs_to_jiffies(10), 1);
        assert_eq!(msecs_to_jiffies(11), 2);
        assert_eq!(msecs_to_jiffies(2000), 200);
        assert_eq!(jiffies_to_msecs(200), 2000);
    }

    #[test]
    fn huge_intervals_saturate_instead_of_overflowing() {
        assert_eq!(msecs_to_jiffies(u64::MAX), u64::MAX.div_ceil(1000));
        assert_eq!(msecs_to_jiffies(u64::MAX / 10), u64::MAX.div_ceil(1000));
        assert_eq!(msecs_to_jiffies(u64::MAX / 100), (u64::MAX / 100 * 100).div_ceil(1000));
        assert_eq!(jiffies_to_msecs(u64::MAX), u64::MAX);
    }

    #[test]
    fn time_after_survives_wraparound() {
        assert!(time_after(5, 3));
        assert!(!time_after(3, 3));
        assert!(time_after(2, u64::MAX - 1));
    }
}
