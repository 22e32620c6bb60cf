//! Plataforma simulada para testes do caminho de idle.
//!
//! - Relógio virtual: só anda quando a CPU "espera" (`wait_for_event`
//!   avança `wfe_step_ns`, `cpu_idle` avança `halt_step_ns`).
//! - NEED_RESCHED pode ser agendado para um instante virtual, para antes do
//!   primeiro load armado, ou setado à mão antes da entrada.
//! - Contadores de WFE, halts, habilitações de IRQ e loads armados.

use core::cell::Cell;

use crate::core::power::cpuidle::IdlePlatform;
use crate::sched::{ThreadFlags, ThreadInfo};

pub(crate) struct SimPlatform {
    thread: ThreadInfo,
    now: Cell<u64>,
    wfe_step_ns: u64,
    halt_step_ns: u64,
    resched_at: Cell<Option<u64>>,
    resched_before_first_load: Cell<bool>,
    irq_enabled: Cell<bool>,
    pub wfe_calls: Cell<u32>,
    pub halts: Cell<u32>,
    pub irq_enables: Cell<u32>,
    pub armed_loads: Cell<u32>,
    /// Pedidos remotos que precisariam de IPI (thread fora de polling).
    pub ipi_requests: Cell<u32>,
}

impl SimPlatform {
    pub fn new(wfe_step_ns: u64) -> Self {
        Self {
            thread: ThreadInfo::new(),
            now: Cell::new(0),
            wfe_step_ns,
            halt_step_ns: wfe_step_ns,
            resched_at: Cell::new(None),
            resched_before_first_load: Cell::new(false),
            irq_enabled: Cell::new(false),
            wfe_calls: Cell::new(0),
            halts: Cell::new(0),
            irq_enables: Cell::new(0),
            armed_loads: Cell::new(0),
            ipi_requests: Cell::new(0),
        }
    }

    /// Seta NEED_RESCHED quando o relógio virtual alcançar `at_ns`.
    pub fn resched_at(&self, at_ns: u64) {
        self.resched_at.set(Some(at_ns));
    }

    /// Seta NEED_RESCHED entre a publicação de POLLING e o primeiro load.
    pub fn resched_before_first_load(&self) {
        self.resched_before_first_load.set(true);
    }

    /// Pedido remoto imediato; retorna se um IPI seria necessário.
    pub fn resched_now(&self) -> bool {
        let ipi = self.thread.set_nr_and_not_polling();
        if ipi {
            self.ipi_requests.set(self.ipi_requests.get() + 1);
        }
        ipi
    }

    pub fn thread(&self) -> &ThreadInfo {
        &self.thread
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn irq_enabled(&self) -> bool {
        self.irq_enabled.get()
    }

    fn advance(&self, ns: u64) {
        let now = self.now.get() + ns;
        self.now.set(now);
        if self.resched_at.get().is_some_and(|at| now >= at) {
            self.resched_at.set(None);
            self.resched_now();
        }
    }
}

impl IdlePlatform for SimPlatform {
    fn local_clock(&self) -> u64 {
        self.now.get()
    }

    fn local_irq_enable(&self) {
        self.irq_enables.set(self.irq_enables.get() + 1);
        self.irq_enabled.set(true);
    }

    fn local_irq_disable(&self) {
        self.irq_enabled.set(false);
    }

    fn wait_for_event(&self) {
        self.wfe_calls.set(self.wfe_calls.get() + 1);
        self.advance(self.wfe_step_ns);
    }

    fn cpu_idle(&self) {
        self.halts.set(self.halts.get() + 1);
        self.advance(self.halt_step_ns);
        self.irq_enabled.set(true);
    }

    fn current_thread(&self) -> &ThreadInfo {
        &self.thread
    }

    fn load_flags_armed(&self, thread: &ThreadInfo) -> ThreadFlags {
        let loads = self.armed_loads.get() + 1;
        self.armed_loads.set(loads);
        if loads == 1 && self.resched_before_first_load.get() {
            self.resched_now();
        }
        thread.flags_armed()
    }
}
