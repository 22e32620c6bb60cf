/// Arquivo: core/power/mod.rs
///
/// Propósito: Gerenciamento de energia da CPU.
///
/// Módulos contidos:
/// - `cpuidle`: estados de ociosidade, governor mínimo e tabela por CPU.
pub mod cpuidle;
