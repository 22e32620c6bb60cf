/// Arquivo: core/power/cpuidle.rs
///
/// Propósito: Modelo mínimo do subsistema cpuidle.
/// Quando não há tarefas para rodar, o loop de idle escolhe um estado
/// (governor), chama o callback `enter` do estado e contabiliza o resultado.
///
/// Detalhes de Implementação:
/// - Estado 0 é sempre o de polling (`IdleStateFlags::POLLING`).
/// - Estados mais profundos vêm depois, em ordem crescente de residência.
/// - O hardware (relógio, WFE, WFI, IRQ) chega aos callbacks via
///   `IdlePlatform`, injetado por quem chama `enter_state`.

use alloc::vec::Vec;

use bitflags::bitflags;
use spin::Mutex;

use crate::core::smp::topology::{CpuId, MAX_CPUS};
use crate::core::time::clock::{NSEC_PER_USEC, TICK_NSEC};
use crate::sched::{ThreadFlags, ThreadInfo};
use crate::sys::Errno;

/// Máximo de estados por driver.
pub const CPUIDLE_STATE_MAX: usize = 10;

bitflags! {
    /// Flags de um estado de idle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct IdleStateFlags: u32 {
        /// Estado de polling: a CPU fica acordada esperando NEED_RESCHED.
        const POLLING = 1 << 0;
    }
}

/// Tudo que um callback de idle precisa da CPU corrente.
///
/// Implementado pela arquitetura em produção (`drivers::cpuidle::ArchPlatform`)
/// e por uma plataforma simulada nos testes.
pub trait IdlePlatform {
    /// `local_clock()`: tempo monotônico em ns.
    fn local_clock(&self) -> u64;

    /// Habilita IRQs locais.
    fn local_irq_enable(&self);

    /// Desabilita IRQs locais.
    fn local_irq_disable(&self);

    /// WFE: pode retornar espuriamente.
    fn wait_for_event(&self);

    /// `arch_cpu_idle()`: dorme até interrupção, retorna com IRQs habilitadas.
    fn cpu_idle(&self);

    /// Thread idle da CPU corrente.
    fn current_thread(&self) -> &ThreadInfo;

    /// Load exclusivo das flags da thread (arma o monitor).
    fn load_flags_armed(&self, thread: &ThreadInfo) -> ThreadFlags {
        thread.flags_armed()
    }
}

/// Callback de entrada: `(dev, drv, idx, platform) -> índice usado`.
pub type EnterFn = fn(&mut CpuIdleDevice, &CpuIdleDriver, usize, &dyn IdlePlatform) -> usize;

/// Informações sobre um estado de idle
#[derive(Clone, Copy)]
pub struct IdleState {
    pub name: &'static str,
    pub desc: &'static str,
    /// Tempo para sair do estado (us)
    pub exit_latency_us: u32,
    /// Tempo mínimo no estado para compensar a entrada (us)
    pub target_residency_us: u32,
    /// Consumo relativo
    pub power_usage: u32,
    pub flags: IdleStateFlags,
    pub enter: EnterFn,
}

impl IdleState {
    pub const fn exit_latency_ns(&self) -> u64 {
        self.exit_latency_us as u64 * NSEC_PER_USEC
    }

    pub const fn target_residency_ns(&self) -> u64 {
        self.target_residency_us as u64 * NSEC_PER_USEC
    }

    pub const fn is_polling(&self) -> bool {
        self.flags.contains(IdleStateFlags::POLLING)
    }
}

impl core::fmt::Debug for IdleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdleState")
            .field("name", &self.name)
            .field("exit_latency_us", &self.exit_latency_us)
            .field("target_residency_us", &self.target_residency_us)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Driver cpuidle: tabela de estados, associada a uma CPU.
#[derive(Debug, Clone)]
pub struct CpuIdleDriver {
    pub name: &'static str,
    /// CPU atendida (`cpumask_of(cpu)`); `None` = ainda não atribuído.
    pub cpu: Option<CpuId>,
    pub states: Vec<IdleState>,
}

impl CpuIdleDriver {
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// Contadores de um estado para uma CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateUsage {
    /// Entradas no estado
    pub usage: u64,
    /// Tempo total no estado (ns)
    pub time_ns: u64,
    /// Saídas do polling por estouro do orçamento
    pub poll_limit_hits: u64,
    /// Estado desabilitado para esta CPU
    pub disable: bool,
}

/// Estado por CPU do cpuidle.
#[derive(Debug, Clone)]
pub struct CpuIdleDevice {
    pub cpu: CpuId,
    /// A última entrada em polling saiu por estouro do orçamento.
    pub poll_time_limit: bool,
    /// Cache do orçamento de polling (ns); 0 = recalcular.
    pub poll_limit_ns: u64,
    pub last_state_idx: Option<usize>,
    pub last_residency_ns: u64,
    pub states_usage: Vec<StateUsage>,
}

impl CpuIdleDevice {
    pub fn new(cpu: CpuId, state_count: usize) -> Result<Self, Errno> {
        let mut states_usage = Vec::new();
        states_usage
            .try_reserve_exact(state_count)
            .map_err(|_| Errno::ENOMEM)?;
        states_usage.resize(state_count, StateUsage::default());

        Ok(Self {
            cpu,
            poll_time_limit: false,
            poll_limit_ns: 0,
            last_state_idx: None,
            last_residency_ns: 0,
            states_usage,
        })
    }

    /// Desabilita/habilita um estado para esta CPU; invalida o cache do
    /// orçamento de polling.
    pub fn set_state_disabled(&mut self, idx: usize, disable: bool) -> Result<(), Errno> {
        let usage = self.states_usage.get_mut(idx).ok_or(Errno::EINVAL)?;
        usage.disable = disable;
        self.poll_limit_ns = 0;
        Ok(())
    }
}

/// Orçamento de polling em ns (`cpuidle_poll_time`).
///
/// É a residência alvo do primeiro estado mais profundo habilitado, limitada
/// a um tick. O valor fica em cache no device.
pub fn poll_time(drv: &CpuIdleDriver, dev: &mut CpuIdleDevice) -> u64 {
    if dev.poll_limit_ns != 0 {
        return dev.poll_limit_ns;
    }

    let mut limit_ns = TICK_NSEC;
    for (i, state) in drv.states.iter().enumerate().skip(1) {
        if dev.states_usage.get(i).is_some_and(|u| u.disable) {
            continue;
        }
        limit_ns = limit_ns.min(state.target_residency_ns());
        break;
    }

    dev.poll_limit_ns = limit_ns;
    limit_ns
}

/// Governor mínimo: o estado habilitado mais profundo cuja residência cabe em
/// `predicted_ns`. Cai para o estado 0 quando nada mais profundo serve.
pub fn select_state(drv: &CpuIdleDriver, dev: &CpuIdleDevice, predicted_ns: u64) -> usize {
    let mut idx = 0;

    for (i, state) in drv.states.iter().enumerate().skip(1) {
        if dev.states_usage.get(i).is_some_and(|u| u.disable) {
            continue;
        }
        if state.target_residency_ns() > predicted_ns {
            break;
        }
        idx = i;
    }

    idx
}

/// Entra no estado `idx` e contabiliza (`cpuidle_enter_state`).
///
/// Desabilita as IRQs antes do callback; o callback é responsável por
/// habilitá-las. Retorna o índice efetivamente usado.
pub fn enter_state(
    drv: &CpuIdleDriver,
    dev: &mut CpuIdleDevice,
    idx: usize,
    platform: &dyn IdlePlatform,
) -> Result<usize, Errno> {
    let state = drv.states.get(idx).ok_or(Errno::EINVAL)?;
    if dev.states_usage.get(idx).is_some_and(|u| u.disable) {
        return Err(Errno::EPERM);
    }

    platform.local_irq_disable();
    let time_start = platform.local_clock();
    let entered = (state.enter)(dev, drv, idx, platform);
    let time_end = platform.local_clock();

    let residency = time_end.saturating_sub(time_start);
    dev.last_state_idx = Some(entered);
    dev.last_residency_ns = residency;

    if let Some(usage) = dev.states_usage.get_mut(entered) {
        usage.usage += 1;
        usage.time_ns = usage.time_ns.saturating_add(residency);
        if dev.poll_time_limit && drv.states.get(entered).is_some_and(IdleState::is_polling) {
            usage.poll_limit_hits += 1;
        }
    }

    Ok(entered)
}

// =============================================================================
// REGISTRO POR CPU
// =============================================================================

/// Registro de drivers cpuidle (`cpuidle_register` / `cpuidle_unregister`).
pub trait CpuIdleRegistry {
    /// Registra o driver para `drv.cpu` e cria o device correspondente.
    fn register(&self, drv: CpuIdleDriver) -> Result<(), Errno>;

    /// Remove o driver da CPU, devolvendo-o.
    fn unregister(&self, cpu: CpuId) -> Option<CpuIdleDriver>;
}

struct Registered {
    drv: CpuIdleDriver,
    dev: CpuIdleDevice,
}

/// Tabela com um driver + device por CPU.
///
/// Cada CPU tem seu próprio lock: a entrada em idle de uma CPU nunca
/// disputa com outra.
pub struct CpuIdleTable {
    slots: Vec<Mutex<Option<Registered>>>,
}

impl CpuIdleTable {
    pub fn new(nr_cpus: usize) -> Result<Self, Errno> {
        if nr_cpus == 0 || nr_cpus > MAX_CPUS {
            return Err(Errno::EINVAL);
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(nr_cpus).map_err(|_| Errno::ENOMEM)?;
        slots.extend((0..nr_cpus).map(|_| Mutex::new(None)));
        Ok(Self { slots })
    }

    pub fn nr_cpus(&self) -> usize {
        self.slots.len()
    }

    /// Quantas CPUs têm driver registrado.
    pub fn registered(&self) -> usize {
        self.slots.iter().filter(|s| s.lock().is_some()).count()
    }

    pub fn is_registered(&self, cpu: CpuId) -> bool {
        self.slot(cpu).is_some_and(|s| s.lock().is_some())
    }

    /// Acesso ao driver e device de uma CPU.
    pub fn with_device<R>(
        &self,
        cpu: CpuId,
        f: impl FnOnce(&CpuIdleDriver, &mut CpuIdleDevice) -> R,
    ) -> Option<R> {
        let mut guard = self.slot(cpu)?.lock();
        let entry = guard.as_mut()?;
        Some(f(&entry.drv, &mut entry.dev))
    }

    /// Um ciclo de idle: governor + entrada + contabilização.
    pub fn enter_idle(
        &self,
        cpu: CpuId,
        predicted_ns: u64,
        platform: &dyn IdlePlatform,
    ) -> Result<usize, Errno> {
        let mut guard = self.slot(cpu).ok_or(Errno::EINVAL)?.lock();
        let entry = guard.as_mut().ok_or(Errno::ENODEV)?;
        let idx = select_state(&entry.drv, &entry.dev, predicted_ns);
        enter_state(&entry.drv, &mut entry.dev, idx, platform)
    }

    fn slot(&self, cpu: CpuId) -> Option<&Mutex<Option<Registered>>> {
        self.slots.get(cpu as usize)
    }
}

impl CpuIdleRegistry for CpuIdleTable {
    fn register(&self, drv: CpuIdleDriver) -> Result<(), Errno> {
        let cpu = drv.cpu.ok_or(Errno::EINVAL)?;
        let count = drv.state_count();
        if count == 0 || count > CPUIDLE_STATE_MAX {
            return Err(Errno::EINVAL);
        }

        let mut guard = self.slot(cpu).ok_or(Errno::EINVAL)?.lock();
        if guard.is_some() {
            return Err(Errno::EBUSY);
        }

        let dev = CpuIdleDevice::new(cpu, count)?;
        *guard = Some(Registered { drv, dev });
        Ok(())
    }

    fn unregister(&self, cpu: CpuId) -> Option<CpuIdleDriver> {
        self.slot(cpu)?.lock().take().map(|r| r.drv)
    }
}
