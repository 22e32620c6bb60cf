//! # Standard Error Codes (Errno)
//!
//! Define os códigos de erro retornados pelos caminhos de setup do driver
//! (registro por CPU, parsing de parâmetros, tabela de timers).
//! Baseado no padrão POSIX/Linux, valores negativos no retorno estilo C.
//!
//! O caminho quente (entrada em idle) NÃO tem tipo de erro: ele sempre
//! devolve o índice do estado usado.

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Success = 0,
    EPERM = 1,   // Operation not permitted
    ENOENT = 2,  // No such file or directory
    EIO = 5,     // I/O error
    EAGAIN = 11, // Try again
    ENOMEM = 12, // Out of memory
    EBUSY = 16,  // Device or resource busy
    EEXIST = 17, // File exists
    ENODEV = 19, // No such device
    EINVAL = 22, // Invalid argument
    ERANGE = 34, // Math result not representable
}

impl Errno {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Nome curto para logs (o logging do kernel não usa core::fmt).
    pub fn name(self) -> &'static str {
        match self {
            Errno::Success => "OK",
            Errno::EPERM => "EPERM",
            Errno::ENOENT => "ENOENT",
            Errno::EIO => "EIO",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EBUSY => "EBUSY",
            Errno::EEXIST => "EEXIST",
            Errno::ENODEV => "ENODEV",
            Errno::EINVAL => "EINVAL",
            Errno::ERANGE => "ERANGE",
        }
    }
}
