/// Arquivo: drivers/cpuidle/params.rs
///
/// Propósito: Parâmetros do driver de polling.
/// O orçamento de polling é lido uma vez (linha de comando do kernel ou
/// parâmetro de módulo) e fica imutável depois do registro.
///
/// Detalhes de Implementação:
/// - Formato `chave=valor` separado por espaços.
/// - Aceita `poll_limit=N` e a forma qualificada
///   `cpuidle_arm_polling.poll_limit=N` (N em microssegundos).
/// - Chaves desconhecidas são ignoradas; valor inválido é `EINVAL`.
use crate::core::time::clock::NSEC_PER_USEC;
use crate::sys::Errno;

/// Orçamento padrão de polling (us).
pub const DEFAULT_POLL_LIMIT_US: u32 = 100;

const PARAM_KEY: &str = "poll_limit";
const PARAM_PREFIX: &str = "cpuidle_arm_polling.";

/// Configuração do driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIdleConfig {
    /// Tempo máximo em WFE antes de desistir (us)
    pub poll_limit_us: u32,
}

impl Default for PollIdleConfig {
    fn default() -> Self {
        Self {
            poll_limit_us: DEFAULT_POLL_LIMIT_US,
        }
    }
}

impl PollIdleConfig {
    pub const fn new(poll_limit_us: u32) -> Self {
        Self { poll_limit_us }
    }

    pub const fn poll_limit_ns(&self) -> u64 {
        self.poll_limit_us as u64 * NSEC_PER_USEC
    }

    /// Lê a configuração de uma linha de comando. A última ocorrência vence.
    pub fn parse(cmdline: &str) -> Result<Self, Errno> {
        let mut config = Self::default();

        for arg in cmdline.split_whitespace() {
            let (key, value) = match arg.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (arg, None),
            };

            let key = key.strip_prefix(PARAM_PREFIX).unwrap_or(key);
            if key != PARAM_KEY {
                continue;
            }

            let value = value.ok_or(Errno::EINVAL)?;
            config.poll_limit_us = value.parse::<u32>().map_err(|_| Errno::EINVAL)?;
        }

        Ok(config)
    }
}
