//! Flags de thread usadas pelo caminho de idle.
//!
//! `ThreadInfo::flags` é a palavra que o loop de polling monitora com load
//! exclusivo: qualquer escrita nela (ex.: `set_nr_and_not_polling` vindo de
//! outra CPU) limpa o monitor e acorda o WFE.

use core::sync::atomic::{fence, AtomicU64, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Bits de `ThreadInfo::flags` (mesma numeração do arm64).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ThreadFlags: u64 {
        /// O scheduler quer a CPU de volta.
        const NEED_RESCHED   = 1 << 1;
        /// A thread idle está em polling: não precisa de IPI para acordar.
        const POLLING_NRFLAG = 1 << 16;
    }
}

/// Estado por thread visível a outras CPUs.
#[derive(Debug, Default)]
pub struct ThreadInfo {
    flags: AtomicU64,
}

impl ThreadInfo {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU64::new(0),
        }
    }

    /// Leitura simples (`READ_ONCE`).
    #[inline]
    pub fn flags(&self) -> ThreadFlags {
        ThreadFlags::from_bits_retain(self.flags.load(Ordering::Relaxed))
    }

    /// Leitura com load exclusivo: arma o monitor para o próximo WFE.
    #[inline]
    pub fn flags_armed(&self) -> ThreadFlags {
        // SAFETY: `as_ptr` aponta para um u64 alinhado e vivo; toda escrita
        // concorrente é atômica de 64 bits.
        let bits = unsafe { crate::arch::read_once_ex(self.flags.as_ptr()) };
        ThreadFlags::from_bits_retain(bits)
    }

    #[inline]
    pub fn need_resched(&self) -> bool {
        self.flags().contains(ThreadFlags::NEED_RESCHED)
    }

    #[inline]
    pub fn is_polling(&self) -> bool {
        self.flags().contains(ThreadFlags::POLLING_NRFLAG)
    }

    /// Publica POLLING e testa NEED_RESCHED depois da publicação.
    ///
    /// O teste DEPOIS do fence fecha a janela em que a CPU remota setou
    /// NEED_RESCHED, viu POLLING ainda limpo e decidiu mandar IPI.
    #[inline]
    pub fn set_polling_and_test(&self) -> bool {
        self.flags
            .fetch_or(ThreadFlags::POLLING_NRFLAG.bits(), Ordering::SeqCst);
        fence(Ordering::SeqCst);
        self.need_resched()
    }

    /// Limpa POLLING (a partir daqui, quem setar NEED_RESCHED manda IPI).
    #[inline]
    pub fn clr_polling(&self) {
        self.flags
            .fetch_and(!ThreadFlags::POLLING_NRFLAG.bits(), Ordering::SeqCst);
        fence(Ordering::SeqCst);
    }

    /// Limpa POLLING e testa NEED_RESCHED depois da limpeza.
    ///
    /// `true` significa que um pedido chegou enquanto POLLING ainda estava
    /// visível: a CPU remota não mandou IPI, então dormir em WFI aqui perderia
    /// o wakeup.
    #[inline]
    pub fn clr_polling_and_test(&self) -> bool {
        self.clr_polling();
        self.need_resched()
    }

    /// Lado remoto: seta NEED_RESCHED e retorna `true` se a IPI é necessária
    /// (a thread não estava em polling).
    #[inline]
    pub fn set_nr_and_not_polling(&self) -> bool {
        let old = self
            .flags
            .fetch_or(ThreadFlags::NEED_RESCHED.bits(), Ordering::SeqCst);
        !ThreadFlags::from_bits_retain(old).contains(ThreadFlags::POLLING_NRFLAG)
    }

    /// Consumido pelo scheduler ao trocar de tarefa.
    #[inline]
    pub fn clear_need_resched(&self) {
        self.flags
            .fetch_and(!ThreadFlags::NEED_RESCHED.bits(), Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test;
