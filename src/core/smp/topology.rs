/// Arquivo: core/smp/topology.rs
///
/// Propósito: Identificação das CPUs do sistema.
/// O driver cpuidle é registrado uma vez por CPU "possível"; a máscara
/// vem de quem carrega o driver (ACPI MADT / Device Tree no boot).
///
/// Detalhes de Implementação:
/// - `CpuMask` é um bitmap de 64 bits (limite de `MAX_CPUS`).
/// - Iteração sempre em ordem crescente de ID; o rollback do registro
///   depende disso para desfazer na ordem inversa.

/// Identificador lógico de CPU (0 a N-1)
pub type CpuId = u32;

/// Número máximo de CPUs suportadas.
pub const MAX_CPUS: usize = 64;

/// Conjunto de CPUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuMask(u64);

impl CpuMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Máscara com as CPUs `0..count` (satura em `MAX_CPUS`).
    pub const fn first(count: usize) -> Self {
        if count >= MAX_CPUS {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// Máscara de uma única CPU (`cpumask_of`).
    pub const fn of(cpu: CpuId) -> Self {
        if (cpu as usize) < MAX_CPUS {
            Self(1u64 << cpu)
        } else {
            Self(0)
        }
    }

    pub fn set(&mut self, cpu: CpuId) {
        *self = Self(self.0 | Self::of(cpu).0);
    }

    pub fn clear(&mut self, cpu: CpuId) {
        *self = Self(self.0 & !Self::of(cpu).0);
    }

    pub const fn contains(&self, cpu: CpuId) -> bool {
        (cpu as usize) < MAX_CPUS && self.0 & (1u64 << cpu) != 0
    }

    pub const fn weight(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Itera os IDs presentes em ordem crescente.
    pub fn iter(&self) -> CpuMaskIter {
        CpuMaskIter { bits: self.0 }
    }
}

pub struct CpuMaskIter {
    bits: u64,
}

impl Iterator for CpuMaskIter {
    type Item = CpuId;

    fn next(&mut self) -> Option<CpuId> {
        if self.bits == 0 {
            return None;
        }
        let cpu = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::{CpuMask, MAX_CPUS};
    use alloc::vec::Vec;

    #[test]
    fn iteration_is_ascending_and_skips_holes() {
        let mut mask = CpuMask::first(4);
        mask.clear(1);
        mask.set(9);
        let cpus: Vec<_> = mask.iter().collect();
        assert_eq!(cpus, [0, 2, 3, 9]);
        assert_eq!(mask.weight(), 4);
    }

    #[test]
    fn out_of_range_cpus_are_ignored() {
        assert!(CpuMask::of(MAX_CPUS as u32).is_empty());
        assert_eq!(CpuMask::first(MAX_CPUS + 10).weight(), MAX_CPUS as u32);
        assert!(!CpuMask::first(2).contains(200));
    }
}
