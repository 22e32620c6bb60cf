//! # Sinalização de Reschedule
//!
//! A parte do scheduler que o driver de idle enxerga: a palavra de flags da
//! thread corrente (`NEED_RESCHED` / `POLLING_NRFLAG`) e o protocolo de
//! pedido de reschedule entre CPUs.
//!
//! ## 🏗️ Protocolo (lado remoto x lado idle)
//! ```text
//! CPU remota                         CPU ociosa
//! ----------                         ----------
//! old = fetch_or(NEED_RESCHED)       fetch_or(POLLING) ; fence
//! if !(old & POLLING): send IPI      if NEED_RESCHED: sai
//!                                    loop { LDAXR flags ; WFE }
//! ```
//! Os dois lados usam RMW SeqCst + fence, então pelo menos um enxerga o
//! outro: ou a CPU remota vê POLLING e a escrita em `flags` acorda o WFE,
//! ou a CPU ociosa vê NEED_RESCHED antes de esperar, ou a IPI é enviada.

pub mod thread_info;

pub use thread_info::{ThreadFlags, ThreadInfo};

/// Pede reschedule para `thread` (`resched_curr`).
///
/// `send_ipi` só é chamado quando a thread alvo NÃO está em polling; se ela
/// está, a própria escrita em `flags` acorda o monitor do WFE.
/// Retorna `true` se a IPI foi enviada.
pub fn resched_thread<F: FnOnce()>(thread: &ThreadInfo, send_ipi: F) -> bool {
    if thread.set_nr_and_not_polling() {
        send_ipi();
        true
    } else {
        false
    }
}
