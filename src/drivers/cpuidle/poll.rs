//! Callbacks de entrada dos estados WFE e WFI.
//!
//! Ambos são chamados com IRQs desabilitadas e retornam com IRQs habilitadas.
//!
//! ## WFE (estado 0)
//! ```text
//! start = local_clock()
//! poll_time_limit = false
//! local_irq_enable()
//! set_polling_and_test()  -> já tem NEED_RESCHED? sai
//! loop {
//!     flags = load exclusivo (arma o monitor)
//!     NEED_RESCHED?        -> sai
//!     wfe                   (escrita em flags acorda)
//!     elapsed >= limite?   -> poll_time_limit = true, sai
//! }
//! clr_polling()
//! ```
//! O tempo só é conferido depois de um WFE: mesmo com orçamento zero existe
//! pelo menos uma espera.
//!
//! ## WFI (estado 1)
//! Limpa POLLING e testa NEED_RESCHED. Se o pedido chegou, retorna sem
//! dormir; senão `arch_cpu_idle`.
//!
//! Nada aqui loga: o custo da UART apareceria como latência de saída.

use crate::core::power::cpuidle::{poll_time, CpuIdleDevice, CpuIdleDriver, IdlePlatform};
use crate::sched::ThreadFlags;

/// Entrada do estado WFE (polling armado em NEED_RESCHED).
pub fn enter_wfe_poll(
    dev: &mut CpuIdleDevice,
    drv: &CpuIdleDriver,
    index: usize,
    platform: &dyn IdlePlatform,
) -> usize {
    let time_start = platform.local_clock();
    let thread = platform.current_thread();

    dev.poll_time_limit = false;
    platform.local_irq_enable();

    if !thread.set_polling_and_test() {
        let limit = poll_time(drv, dev);

        loop {
            let flags = platform.load_flags_armed(thread);
            if flags.contains(ThreadFlags::NEED_RESCHED) {
                break;
            }

            platform.wait_for_event();

            if platform.local_clock().saturating_sub(time_start) >= limit {
                dev.poll_time_limit = true;
                break;
            }
        }
    }

    thread.clr_polling();
    index
}

/// Entrada do estado WFI.
pub fn enter_wfi(
    _dev: &mut CpuIdleDevice,
    _drv: &CpuIdleDriver,
    index: usize,
    platform: &dyn IdlePlatform,
) -> usize {
    if platform.current_thread().clr_polling_and_test() {
        platform.local_irq_enable();
    } else {
        platform.cpu_idle();
    }
    index
}
