//! # Timer Stall Detector
//!
//! Diagnóstico de timers: arma `TEST_TIMER_CNT` timers periódicos (o timer
//! `i` se rearma a cada `5 + i % 100` ms) e um timer de checagem a cada
//! `CHECK_TIMER_RATE_MS`. Na checagem, todo timer cujo contador de chamadas
//! não mudou desde a checagem anterior é reportado como "Stalled".
//!
//! Útil para pegar ticks perdidos quando a CPU passa muito tempo em idle
//! (WFE/WFI) sem atender o timer.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use spin::Mutex;

use crate::core::time::jiffies::msecs_to_jiffies;
use crate::core::time::timer::{Timer, TimerId, TimerList};
use crate::sys::Errno;

/// Número de timers de teste.
pub const TEST_TIMER_CNT: usize = 1000;
/// Intervalo da checagem (ms).
pub const CHECK_TIMER_RATE_MS: u64 = 2000;

/// Configuração do detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTestConfig {
    pub timer_count: usize,
    pub check_rate_ms: u64,
}

impl Default for TimerTestConfig {
    fn default() -> Self {
        Self {
            timer_count: TEST_TIMER_CNT,
            check_rate_ms: CHECK_TIMER_RATE_MS,
        }
    }
}

/// Período do timer `i` em ms.
pub const fn test_period_ms(i: usize) -> u64 {
    5 + (i % 100) as u64
}

/// Contadores compartilhados entre os callbacks.
pub struct StallDetector {
    calls: Vec<AtomicU64>,
    calls_old: Mutex<Vec<u64>>,
    checks: AtomicU64,
    last_stalled: Mutex<Vec<usize>>,
}

impl StallDetector {
    pub fn new(timer_count: usize) -> Result<Self, Errno> {
        let mut calls = Vec::new();
        calls.try_reserve_exact(timer_count).map_err(|_| Errno::ENOMEM)?;
        calls.extend((0..timer_count).map(|_| AtomicU64::new(0)));

        let mut calls_old = Vec::new();
        calls_old.try_reserve_exact(timer_count).map_err(|_| Errno::ENOMEM)?;
        calls_old.resize(timer_count, 0);

        Ok(Self {
            calls,
            calls_old: Mutex::new(calls_old),
            checks: AtomicU64::new(0),
            last_stalled: Mutex::new(Vec::new()),
        })
    }

    /// Conta uma chamada do timer `i`.
    pub fn record(&self, i: usize) {
        if let Some(calls) = self.calls.get(i) {
            calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn calls(&self, i: usize) -> u64 {
        self.calls.get(i).map_or(0, |c| c.load(Ordering::Relaxed))
    }

    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    /// Timers reportados na última checagem.
    pub fn last_stalled(&self) -> Vec<usize> {
        self.last_stalled.lock().clone()
    }

    /// Checagem: reporta quem não andou e tira um novo snapshot.
    pub fn check(&self) -> usize {
        crate::kdebug!("(TimerTest) Check timer.");

        let mut snapshot = self.calls_old.lock();
        let mut stalled = self.last_stalled.lock();
        stalled.clear();

        for (i, (calls, old)) in self.calls.iter().zip(snapshot.iter_mut()).enumerate() {
            let now = calls.load(Ordering::Relaxed);
            if now == *old {
                crate::kwarn!("(TimerTest) Stalled: ", i);
                crate::klog!("(TimerTest)   period ms=", test_period_ms(i));
                crate::knl!();
                // Sem memória: fica só o log.
                if stalled.try_reserve(1).is_ok() {
                    stalled.push(i);
                }
            }
            *old = now;
        }

        self.checks.fetch_add(1, Ordering::Relaxed);
        stalled.len()
    }
}

/// Timers armados por `TimerTest::init`.
pub struct TimerTest {
    detector: Arc<StallDetector>,
    check_timer: TimerId,
    test_timers: Vec<TimerId>,
}

impl TimerTest {
    /// Arma os timers de teste e o de checagem a partir do jiffy `now`.
    ///
    /// Se faltar memória no meio, os timers já armados são cancelados.
    pub fn init(list: &mut TimerList, now: u64, config: TimerTestConfig) -> Result<Self, Errno> {
        let detector = Arc::new(StallDetector::new(config.timer_count)?);

        let mut test_timers = Vec::new();
        test_timers
            .try_reserve_exact(config.timer_count)
            .map_err(|_| Errno::ENOMEM)?;

        for i in 0..config.timer_count {
            let det = detector.clone();
            let period = msecs_to_jiffies(test_period_ms(i));
            let timer = Timer::new(now.saturating_add(period), move |now| {
                det.record(i);
                Some(now.saturating_add(period))
            });

            match list.add(timer) {
                Ok(id) => test_timers.push(id),
                Err(err) => {
                    crate::kerror!("(TimerTest) Falha ao armar timer i=", i);
                    for id in test_timers.drain(..) {
                        list.cancel(id);
                    }
                    return Err(err);
                }
            }
        }

        let det = detector.clone();
        let rate = msecs_to_jiffies(config.check_rate_ms);
        let check = Timer::new(now.saturating_add(rate), move |now| {
            det.check();
            Some(now.saturating_add(rate))
        });
        let check_timer = match list.add(check) {
            Ok(id) => id,
            Err(err) => {
                for id in test_timers.drain(..) {
                    list.cancel(id);
                }
                return Err(err);
            }
        };

        crate::kinfo!("(TimerTest) Timers armados=", config.timer_count);
        Ok(Self {
            detector,
            check_timer,
            test_timers,
        })
    }

    pub fn detector(&self) -> &StallDetector {
        &self.detector
    }

    /// ID do timer de teste `i`.
    pub fn timer_id(&self, i: usize) -> Option<TimerId> {
        self.test_timers.get(i).copied()
    }

    pub fn check_timer_id(&self) -> TimerId {
        self.check_timer
    }

    /// Cancela o timer de checagem e depois todos os de teste.
    /// Retorna quantos ainda estavam pendentes.
    pub fn exit(self, list: &mut TimerList) -> usize {
        let mut cancelled = usize::from(list.cancel(self.check_timer));
        for id in self.test_timers {
            cancelled += usize::from(list.cancel(id));
        }
        crate::kinfo!("(TimerTest) Timers cancelados=", cancelled);
        cancelled
    }
}
