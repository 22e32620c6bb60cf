//! `READ_ONCE` exclusivo: lê um valor e arma o monitor para o próximo WFE.
//!
//! A largura do load é escolhida pelo tamanho de `T`:
//!
//! | size_of::<T>() | aarch64   | generic            |
//! |----------------|-----------|--------------------|
//! | 1              | LDAXRB    | AtomicU8 Acquire   |
//! | 2              | LDAXRH    | AtomicU16 Acquire  |
//! | 4              | LDAXR (w) | AtomicU32 Acquire  |
//! | 8              | LDAXR (x) | AtomicU64 Acquire  |
//! | outro          | leitura volátil simples            |
//!
//! ## Modo degradado
//! Larguras não suportadas (ou endereço desalinhado para a LARGURA do load,
//! não só para `T`: um `[u8; 4]` em endereço ímpar usaria LDAXR de 32 bits
//! desalinhado) caem para uma leitura
//! volátil NÃO exclusiva: o valor é lido, mas o monitor não é armado. Um
//! `wait_for_event` seguinte pode então dormir até o próximo evento
//! independente (event stream do timer, IRQ) mesmo que o valor já tenha
//! mudado. A precisão de wake diminui; nada falha.

use core::mem::{size_of, transmute_copy, MaybeUninit};
use core::ptr::NonNull;

use volatile::VolatilePtr;

use super::platform::readex::{load_ex16, load_ex32, load_ex64, load_ex8};

/// Indica se `T` tem largura suportada pelo load exclusivo.
pub const fn has_exclusive_width<T>() -> bool {
    matches!(size_of::<T>(), 1 | 2 | 4 | 8)
}

/// `src` pode ir para o load exclusivo: largura suportada e endereço
/// alinhado ao tamanho do load.
#[inline(always)]
pub fn can_load_exclusive<T>(src: *const T) -> bool {
    has_exclusive_width::<T>() && (src as usize) % size_of::<T>() == 0
}

/// Lê `*src` com load exclusivo (Acquire) e arma o monitor.
///
/// # Safety
/// `src` deve ser não-nulo e válido para leitura de um `T` inicializado.
/// Escritas concorrentes só são permitidas se forem atômicas e da mesma
/// largura (ex.: `src` vem de `AtomicU64::as_ptr`).
#[inline(always)]
pub unsafe fn read_once_ex<T: Copy>(src: *const T) -> T {
    if !can_load_exclusive(src) {
        return read_once_degraded(src);
    }

    match size_of::<T>() {
        1 => transmute_copy(&load_ex8(src.cast())),
        2 => transmute_copy(&load_ex16(src.cast())),
        4 => transmute_copy(&load_ex32(src.cast())),
        8 => transmute_copy(&load_ex64(src.cast())),
        _ => read_once_degraded(src),
    }
}

/// Leitura volátil não exclusiva (monitor NÃO armado).
///
/// Endereço desalinhado é lido byte a byte (ainda volátil).
#[inline(never)]
unsafe fn read_once_degraded<T: Copy>(src: *const T) -> T {
    if src.is_aligned() {
        return VolatilePtr::new_read_only(NonNull::new_unchecked(src.cast_mut())).read();
    }

    let mut out = MaybeUninit::<T>::uninit();
    let dst = out.as_mut_ptr().cast::<u8>();
    let src = src.cast::<u8>();
    for i in 0..size_of::<T>() {
        let byte = VolatilePtr::new_read_only(NonNull::new_unchecked(src.add(i).cast_mut())).read();
        dst.add(i).write(byte);
    }
    out.assume_init()
}
