// =============================================================================
// SERIAL SINK - ZERO OVERHEAD
// =============================================================================
//
// Saída serial usada pelo logging do kernel.
//
// ARQUITETURA:
// - SEM core::fmt - Apenas strings literais e valores imediatos
// - SEM alocação
// - O backend é registrado uma vez no boot (`init`). Antes disso, todo
//   byte é descartado silenciosamente.
//
// BACKENDS:
// - Pl011: UART ARM PrimeCell (MMIO via `volatile`)
// - Capture: buffer em memória, apenas em testes
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string literal
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_dec(v)      : Envia usize em decimal
// - emit_nl()        : Envia newline (\r\n)
//
// NOTA IMPORTANTE:
// O sink NÃO garante exclusão mútua entre CPUs por linha de log. Em ambiente
// SMP, os logs podem se intercalar. Isso é aceitável para debugging.
//
// =============================================================================

use core::ptr::NonNull;

use spin::RwLock;
use volatile::VolatilePtr;

/// Destino dos bytes de log.
pub trait SerialPort: Sync {
    fn write_byte(&self, byte: u8);
}

static PORT: RwLock<Option<&'static dyn SerialPort>> = RwLock::new(None);

/// Registra o backend serial. Chamadas posteriores substituem o anterior.
pub fn init(port: &'static dyn SerialPort) {
    *PORT.write() = Some(port);
}

// =============================================================================
// PL011 (ARM PrimeCell UART)
// =============================================================================

/// Data Register
const UART_DR: usize = 0x00;
/// Flag Register
const UART_FR: usize = 0x18;
/// FR: Transmit FIFO full
const FR_TXFF: u32 = 1 << 5;

/// UART PL011 mapeada em MMIO.
pub struct Pl011 {
    base: NonNull<u32>,
}

// SAFETY: os registradores são acessados apenas via leituras/escritas voláteis
// de 32 bits; o hardware serializa o FIFO.
unsafe impl Sync for Pl011 {}
unsafe impl Send for Pl011 {}

impl Pl011 {
    /// # Safety
    /// `base` deve apontar para o bloco MMIO de uma PL011 já mapeado e
    /// válido durante toda a vida do kernel.
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    fn reg(&self, offset: usize) -> VolatilePtr<'_, u32> {
        // SAFETY: offset dentro do bloco de registradores (ver `new`).
        unsafe { VolatilePtr::new(self.base.byte_add(offset)) }
    }
}

impl SerialPort for Pl011 {
    fn write_byte(&self, byte: u8) {
        // Espera espaço no FIFO de transmissão
        while self.reg(UART_FR).read() & FR_TXFF != 0 {
            core::hint::spin_loop();
        }
        self.reg(UART_DR).write(byte as u32);
    }
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para o backend atual.
#[inline]
pub fn emit(byte: u8) {
    if let Some(port) = *PORT.read() {
        port.write_byte(byte);
    }
}

/// Envia string literal.
pub fn emit_str(s: &str) {
    if let Some(port) = *PORT.read() {
        for byte in s.bytes() {
            port.write_byte(byte);
        }
    }
}

/// Envia newline (\r\n).
pub fn emit_nl() {
    emit_str("\r\n");
}

/// Envia u64 em hexadecimal, formato fixo `0x` + 16 dígitos.
pub fn emit_hex(value: u64) {
    emit(b'0');
    emit(b'x');
    for shift in (0..16).rev() {
        emit(nibble_to_ascii(((value >> (shift * 4)) & 0xF) as u8));
    }
}

/// Envia usize em decimal.
#[inline(never)]
pub fn emit_dec(mut value: usize) {
    // Buffer para dígitos (max 20 para u64)
    let mut buf: [u8; 20] = [0; 20];
    let mut pos = 20;

    if value == 0 {
        emit(b'0');
        return;
    }

    while value > 0 {
        pos -= 1;
        buf[pos] = b'0' + (value % 10) as u8;
        value /= 10;
    }

    while pos < 20 {
        emit(buf[pos]);
        pos += 1;
    }
}

// =============================================================================
// FUNÇÕES AUXILIARES
// =============================================================================

/// Converte nibble (0-15) para caractere ASCII ('0'-'9', 'A'-'F').
#[inline(always)]
const fn nibble_to_ascii(n: u8) -> u8 {
    if n < 10 {
        b'0' + n
    } else {
        b'A' + (n - 10)
    }
}

// =============================================================================
// BACKEND DE CAPTURA (TESTES)
// =============================================================================


#[cfg(test)]
mod tests {
    use super::capture;

    #[test]
    fn hex_is_fixed_width_uppercase() {
        capture::install();
        super::emit_str("(Serial) marker=");
        super::emit_hex(0xBEEF);
        assert!(capture::contains("(Serial) marker=0x000000000000BEEF"));
    }

    #[test]
    fn dec_prints_zero_and_multi_digit_values() {
        capture::install();
        super::emit_str("(Serial) dec=");
        super::emit_dec(0);
        super::emit_str("/");
        super::emit_dec(4096);
        assert!(capture::contains("(Serial) dec=0/4096"));
    }
}
