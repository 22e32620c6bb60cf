//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura deve implementar para o
//! caminho de idle.

pub trait CpuOps {
    /// Espera por evento (WFE) de baixo consumo.
    ///
    /// Pode retornar a qualquer momento (event stream do timer, SEV de outra
    /// CPU, escrita na linha monitorada). O chamador SEMPRE revalida a condição.
    fn wait_for_event();

    /// Para a execução da CPU até a próxima interrupção (WFI/HLT).
    fn wait_for_interrupt();

    /// Desabilita interrupções locais.
    fn disable_interrupts();

    /// Habilita interrupções locais.
    fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;

    /// Idle de arquitetura: dorme até interrupção e retorna com IRQs habilitadas.
    fn idle() {
        Self::wait_for_interrupt();
        Self::enable_interrupts();
    }
}
