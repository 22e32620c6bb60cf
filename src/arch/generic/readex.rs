//! Fallback portátil do load exclusivo.
//!
//! Sem monitor exclusivo, o "armar" não existe: a leitura é um load atômico
//! Acquire e quem acorda o loop é o `spin_loop` do `wait_for_event`, que
//! retorna imediatamente. O contrato de ordenação é o mesmo do LDAXR.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};

/// # Safety
/// `src` deve ser válido para leitura e alinhado.
#[inline(always)]
pub unsafe fn load_ex8(src: *const u8) -> u8 {
    AtomicU8::from_ptr(src.cast_mut()).load(Ordering::Acquire)
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 2 bytes.
#[inline(always)]
pub unsafe fn load_ex16(src: *const u16) -> u16 {
    AtomicU16::from_ptr(src.cast_mut()).load(Ordering::Acquire)
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 4 bytes.
#[inline(always)]
pub unsafe fn load_ex32(src: *const u32) -> u32 {
    AtomicU32::from_ptr(src.cast_mut()).load(Ordering::Acquire)
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 8 bytes.
#[inline(always)]
pub unsafe fn load_ex64(src: *const u64) -> u64 {
    AtomicU64::from_ptr(src.cast_mut()).load(Ordering::Acquire)
}
