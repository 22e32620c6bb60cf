//! Testes de registro por CPU e rollback.

use spin::Mutex;
use std::vec::Vec;

use super::{build_driver, init_cpu, PollIdleRegistration, DRIVER_NAME, STATE_WFE, STATE_WFI};
use crate::core::power::cpuidle::{CpuIdleDriver, CpuIdleRegistry, CpuIdleTable};
use crate::core::smp::topology::{CpuId, CpuMask};
use crate::drivers::cpuidle::PollIdleConfig;
use crate::drivers::serial::capture;
use crate::sys::Errno;

/// Registro que falha numa CPU escolhida e anota a ordem das remoções.
struct FlakyRegistry {
    inner: CpuIdleTable,
    fail_on: CpuId,
    fail_with: Errno,
    removed: Mutex<Vec<CpuId>>,
}

impl FlakyRegistry {
    fn new(nr_cpus: usize, fail_on: CpuId, fail_with: Errno) -> Self {
        Self {
            inner: CpuIdleTable::new(nr_cpus).unwrap(),
            fail_on,
            fail_with,
            removed: Mutex::new(Vec::new()),
        }
    }
}

impl CpuIdleRegistry for FlakyRegistry {
    fn register(&self, drv: CpuIdleDriver) -> Result<(), Errno> {
        if drv.cpu == Some(self.fail_on) {
            return Err(self.fail_with);
        }
        self.inner.register(drv)
    }

    fn unregister(&self, cpu: CpuId) -> Option<CpuIdleDriver> {
        self.removed.lock().push(cpu);
        self.inner.unregister(cpu)
    }
}

#[test]
fn template_copy_takes_cpu_and_budget() {
    let drv = build_driver(3, &PollIdleConfig::new(40)).unwrap();

    assert_eq!(drv.name, DRIVER_NAME);
    assert_eq!(drv.cpu, Some(3));
    assert_eq!(drv.state_count(), 2);
    assert_eq!(drv.states[STATE_WFE].name, "WFE");
    assert!(drv.states[STATE_WFE].is_polling());
    assert_eq!(drv.states[STATE_WFE].target_residency_us, 0);
    assert_eq!(drv.states[STATE_WFI].name, "WFI");
    assert_eq!(drv.states[STATE_WFI].desc, "ARM WFI");
    assert!(!drv.states[STATE_WFI].is_polling());
    assert_eq!(drv.states[STATE_WFI].exit_latency_us, 40);
    assert_eq!(drv.states[STATE_WFI].target_residency_us, 40);
}

#[test]
fn every_possible_cpu_gets_its_own_driver() {
    let table = CpuIdleTable::new(4).unwrap();
    let reg = PollIdleRegistration::init(CpuMask::first(4), &PollIdleConfig::default(), &table)
        .unwrap();

    assert_eq!(reg.cpus(), &[0, 1, 2, 3]);
    assert_eq!(table.registered(), 4);
    for cpu in 0..4 {
        let (owner, budget) = table
            .with_device(cpu, |drv, dev| {
                assert_eq!(dev.cpu, cpu);
                (drv.cpu, drv.states[STATE_WFI].target_residency_us)
            })
            .unwrap();
        assert_eq!(owner, Some(cpu));
        assert_eq!(budget, 100);
    }
}

#[test]
fn failure_unwinds_registered_cpus_in_reverse() {
    capture::install();
    let registry = FlakyRegistry::new(4, 2, Errno::ENODEV);

    let err = PollIdleRegistration::init(CpuMask::first(4), &PollIdleConfig::default(), &registry)
        .unwrap_err();

    assert_eq!(err, Errno::ENODEV);
    assert_eq!(*registry.removed.lock(), [1, 0]);
    assert_eq!(registry.inner.registered(), 0);
    assert!(capture::contains("de-register all"));
}

#[test]
fn failure_on_first_cpu_unregisters_nothing() {
    let registry = FlakyRegistry::new(2, 0, Errno::ENOMEM);

    let err = PollIdleRegistration::init(CpuMask::first(2), &PollIdleConfig::default(), &registry)
        .unwrap_err();

    assert_eq!(err, Errno::ENOMEM);
    assert!(registry.removed.lock().is_empty());
}

#[test]
fn cpu_beyond_table_is_rejected_and_unwound() {
    let table = CpuIdleTable::new(2).unwrap();

    let err = PollIdleRegistration::init(CpuMask::first(3), &PollIdleConfig::default(), &table)
        .unwrap_err();

    assert_eq!(err, Errno::EINVAL);
    assert_eq!(table.registered(), 0);
}

#[test]
fn second_registration_is_busy_and_keeps_the_first() {
    let table = CpuIdleTable::new(2).unwrap();
    let _first =
        PollIdleRegistration::init(CpuMask::first(2), &PollIdleConfig::default(), &table).unwrap();

    let err = PollIdleRegistration::init(CpuMask::first(2), &PollIdleConfig::new(7), &table)
        .unwrap_err();

    assert_eq!(err, Errno::EBUSY);
    assert_eq!(table.registered(), 2);
    let budget = table
        .with_device(1, |drv, _| drv.states[STATE_WFI].target_residency_us)
        .unwrap();
    assert_eq!(budget, 100);
}

#[test]
fn teardown_removes_in_reverse_order() {
    let registry = FlakyRegistry::new(4, 63, Errno::EIO);
    let mut mask = CpuMask::empty();
    mask.set(0);
    mask.set(2);
    mask.set(3);

    let reg = PollIdleRegistration::init(mask, &PollIdleConfig::default(), &registry).unwrap();
    assert_eq!(reg.cpus(), &[0, 2, 3]);

    reg.teardown(&registry);
    assert_eq!(*registry.removed.lock(), [3, 2, 0]);
    assert_eq!(registry.inner.registered(), 0);
}

#[test]
fn init_cpu_logs_the_registered_cpu() {
    capture::install();
    let table = CpuIdleTable::new(8).unwrap();

    init_cpu(5, &PollIdleConfig::default(), &table).unwrap();

    assert!(table.is_registered(5));
    assert!(capture::contains("(CpuIdle) Driver registrado cpu=0x0000000000000005"));
}

#[test]
fn failed_registration_logs_errno_name() {
    capture::install();
    let table = CpuIdleTable::new(2).unwrap();
    init_cpu(1, &PollIdleConfig::default(), &table).unwrap();

    assert_eq!(init_cpu(1, &PollIdleConfig::default(), &table), Err(Errno::EBUSY));
    assert!(capture::contains("(CpuIdle) Falha ao registrar driver cpu=0x0000000000000001"));
    assert!(capture::contains("errno=0x0000000000000010 EBUSY\r\n"));
}
