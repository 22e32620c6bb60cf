//! Loads exclusivos com semântica Acquire (LDAXR*).
//!
//! Além de ler o valor, o LDAXR marca o endereço no monitor exclusivo local.
//! Qualquer escrita posterior de outro agente na mesma granule limpa o monitor
//! e gera o evento que acorda um WFE pendente.

use core::arch::asm;

/// # Safety
/// `src` deve ser válido para leitura e alinhado.
#[inline(always)]
pub unsafe fn load_ex8(src: *const u8) -> u8 {
    let val: u32;
    asm!("ldaxrb {val:w}, [{src}]", val = out(reg) val, src = in(reg) src, options(nostack, preserves_flags));
    val as u8
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 2 bytes.
#[inline(always)]
pub unsafe fn load_ex16(src: *const u16) -> u16 {
    let val: u32;
    asm!("ldaxrh {val:w}, [{src}]", val = out(reg) val, src = in(reg) src, options(nostack, preserves_flags));
    val as u16
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 4 bytes.
#[inline(always)]
pub unsafe fn load_ex32(src: *const u32) -> u32 {
    let val: u32;
    asm!("ldaxr {val:w}, [{src}]", val = out(reg) val, src = in(reg) src, options(nostack, preserves_flags));
    val
}

/// # Safety
/// `src` deve ser válido para leitura e alinhado em 8 bytes.
#[inline(always)]
pub unsafe fn load_ex64(src: *const u64) -> u64 {
    let val: u64;
    asm!("ldaxr {val}, [{src}]", val = out(reg) val, src = in(reg) src, options(nostack, preserves_flags));
    val
}
