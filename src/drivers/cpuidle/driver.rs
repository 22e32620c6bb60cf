/// Arquivo: drivers/cpuidle/driver.rs
///
/// Propósito: Registro do driver `arm_poll_idle` em cada CPU.
///
/// Detalhes de Implementação:
/// - Um template com dois estados (WFE e WFI) é duplicado por CPU; a cópia
///   recebe a CPU e o orçamento de polling como residência do WFI.
/// - O registro percorre as CPUs possíveis em ordem. Na primeira falha, as
///   CPUs já registradas são removidas na ordem inversa e o erro volta
///   para quem chamou.
use alloc::vec::Vec;

use super::params::{PollIdleConfig, DEFAULT_POLL_LIMIT_US};
use super::poll::{enter_wfe_poll, enter_wfi};
use crate::core::power::cpuidle::{CpuIdleDriver, CpuIdleRegistry, IdleState, IdleStateFlags};
use crate::core::smp::topology::{CpuId, CpuMask};
use crate::sys::Errno;

pub const DRIVER_NAME: &str = "arm_poll_idle";

/// Índice do estado WFE (polling).
pub const STATE_WFE: usize = 0;
/// Índice do estado WFI.
pub const STATE_WFI: usize = 1;

const TEMPLATE_STATES: [IdleState; 2] = [
    IdleState {
        name: "WFE",
        desc: "ARM WFE",
        exit_latency_us: 0,
        target_residency_us: 0,
        power_usage: u32::MAX,
        flags: IdleStateFlags::POLLING,
        enter: enter_wfe_poll,
    },
    IdleState {
        name: "WFI",
        desc: "ARM WFI",
        exit_latency_us: DEFAULT_POLL_LIMIT_US,
        target_residency_us: DEFAULT_POLL_LIMIT_US,
        power_usage: u32::MAX,
        flags: IdleStateFlags::empty(),
        enter: enter_wfi,
    },
];

/// Duplica o template para uma CPU.
pub fn build_driver(cpu: CpuId, config: &PollIdleConfig) -> Result<CpuIdleDriver, Errno> {
    let mut states = Vec::new();
    states
        .try_reserve_exact(TEMPLATE_STATES.len())
        .map_err(|_| Errno::ENOMEM)?;
    states.extend_from_slice(&TEMPLATE_STATES);

    states[STATE_WFI].exit_latency_us = config.poll_limit_us;
    states[STATE_WFI].target_residency_us = config.poll_limit_us;

    Ok(CpuIdleDriver {
        name: DRIVER_NAME,
        cpu: Some(cpu),
        states,
    })
}

/// Registra o driver em uma CPU.
pub fn init_cpu(
    cpu: CpuId,
    config: &PollIdleConfig,
    registry: &dyn CpuIdleRegistry,
) -> Result<(), Errno> {
    let drv = build_driver(cpu, config)?;

    if let Err(err) = registry.register(drv) {
        crate::kerror!("(CpuIdle) Falha ao registrar driver cpu=", cpu);
        crate::klog!("(CpuIdle)   errno=", err.as_i32());
        crate::klog!(" ");
        crate::klog!(err.name());
        crate::knl!();
        return Err(err);
    }

    crate::kinfo!("(CpuIdle) Driver registrado cpu=", cpu);
    Ok(())
}

/// CPUs com o driver registrado, na ordem de registro.
#[derive(Debug)]
pub struct PollIdleRegistration {
    registered: Vec<CpuId>,
}

impl PollIdleRegistration {
    /// Registra o driver em todas as CPUs possíveis.
    pub fn init(
        possible: CpuMask,
        config: &PollIdleConfig,
        registry: &dyn CpuIdleRegistry,
    ) -> Result<Self, Errno> {
        let mut registered = Vec::new();
        registered
            .try_reserve_exact(possible.weight() as usize)
            .map_err(|_| Errno::ENOMEM)?;

        crate::kdebug!("(CpuIdle) poll_limit us=", config.poll_limit_us);

        for cpu in possible.iter() {
            if let Err(err) = init_cpu(cpu, config, registry) {
                crate::kinfo!("(CpuIdle) de-register all");
                Self::unwind(&mut registered, registry);
                return Err(err);
            }
            registered.push(cpu);
        }

        crate::kok!("(CpuIdle) arm_poll_idle ativo");
        Ok(Self { registered })
    }

    /// CPUs atendidas, em ordem de registro.
    pub fn cpus(&self) -> &[CpuId] {
        &self.registered
    }

    /// Remove o driver de todas as CPUs (ordem inversa).
    pub fn teardown(mut self, registry: &dyn CpuIdleRegistry) {
        Self::unwind(&mut self.registered, registry);
    }

    fn unwind(registered: &mut Vec<CpuId>, registry: &dyn CpuIdleRegistry) {
        while let Some(cpu) = registered.pop() {
            if registry.unregister(cpu).is_none() {
                crate::kwarn!("(CpuIdle) CPU sem driver na remoção cpu=", cpu);
            }
        }
    }
}

#[cfg(test)]
mod test;
