/// Arquivo: core/time/timer.rs
///
/// Propósito: Timers de baixa resolução baseados em jiffies.
/// Permite agendar callbacks para serem executados após um certo intervalo.
///
/// Detalhes de Implementação:
/// - `TimerList` guarda os timers em slots reutilizáveis; `TimerId` carrega a
///   geração do slot, então um ID antigo nunca cancela um timer novo.
/// - O callback recebe o jiffy atual e devolve `Some(expira)` para se rearmar
///   (equivalente a chamar `mod_timer` de dentro do callback) ou `None` para
///   encerrar.
/// - `run_expired` visita cada slot uma única vez: um timer rearmado para um
///   instante já passado só dispara na próxima rodada.
use alloc::boxed::Box;
use alloc::vec::Vec;

use super::jiffies::{inc_jiffies, time_after};
use crate::sys::Errno;

/// Callback de expiração: `now` -> próxima expiração (rearm) ou fim.
pub type TimerFn = Box<dyn FnMut(u64) -> Option<u64> + Send>;

/// Um timer genérico
pub struct Timer {
    /// Momento de expiração (em jiffies absolutos)
    pub expires: u64,
    /// Callback a ser executado
    callback: TimerFn,
}

impl Timer {
    /// Cria um novo timer
    pub fn new<F>(expires: u64, callback: F) -> Self
    where
        F: FnMut(u64) -> Option<u64> + Send + 'static,
    {
        Self {
            expires,
            callback: Box::new(callback),
        }
    }

    /// Verifica se o timer expirou dado o tick atual
    pub fn is_expired(&self, current_tick: u64) -> bool {
        !time_after(self.expires, current_tick)
    }

    /// Executa o callback do timer
    pub fn run(&mut self, current_tick: u64) -> Option<u64> {
        (self.callback)(current_tick)
    }
}

/// Handle de um timer registrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    timer: Option<Timer>,
}

/// Lista de timers ativos.
#[derive(Default)]
pub struct TimerList {
    slots: Vec<Slot>,
    active: usize,
}

impl TimerList {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            active: 0,
        }
    }

    /// Arma um timer (`setup_timer` + `mod_timer`).
    pub fn add(&mut self, timer: Timer) -> Result<TimerId, Errno> {
        if let Some(index) = self.slots.iter().position(|s| s.timer.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.timer = Some(timer);
            self.active += 1;
            return Ok(TimerId {
                index: index as u32,
                generation: slot.generation,
            });
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| Errno::ENOMEM)?;
        self.slots.try_reserve(1).map_err(|_| Errno::ENOMEM)?;
        self.slots.push(Slot {
            generation: 0,
            timer: Some(timer),
        });
        self.active += 1;
        Ok(TimerId {
            index,
            generation: 0,
        })
    }

    fn slot_mut(&mut self, id: TimerId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation && s.timer.is_some())
    }

    /// Muda a expiração de um timer pendente. Retorna `false` se não existe.
    pub fn modify(&mut self, id: TimerId, expires: u64) -> bool {
        match self.slot_mut(id).and_then(|s| s.timer.as_mut()) {
            Some(timer) => {
                timer.expires = expires;
                true
            }
            None => false,
        }
    }

    /// Remove o timer (`del_timer_sync`). Retorna `true` se estava pendente.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.timer = None;
                self.active -= 1;
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|s| s.generation == id.generation && s.timer.is_some())
    }

    /// Expiração atual de um timer pendente.
    pub fn expires(&self, id: TimerId) -> Option<u64> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.timer.as_ref())
            .map(|t| t.expires)
    }

    /// Número de timers pendentes.
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Executa todos os timers expirados em `now`. Retorna quantos dispararam.
    pub fn run_expired(&mut self, now: u64) -> usize {
        let mut fired = 0;

        for slot in self.slots.iter_mut() {
            let Some(timer) = slot.timer.as_mut() else {
                continue;
            };
            if !timer.is_expired(now) {
                continue;
            }

            fired += 1;
            match timer.run(now) {
                Some(next) => timer.expires = next,
                None => {
                    slot.timer = None;
                    self.active -= 1;
                }
            }
        }

        fired
    }
}

/// Tick do timer: avança os jiffies e roda o que expirou.
pub fn timer_tick(list: &mut TimerList) -> usize {
    list.run_expired(inc_jiffies())
}

#[cfg(test)]
mod tests {
    use super::{timer_tick, Timer, TimerList};
    use crate::core::time::jiffies::get_jiffies;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn one_shot_timer_fires_once_and_leaves_the_list() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let mut list = TimerList::new();
        let id = list
            .add(Timer::new(3, move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
                None
            }))
            .unwrap();

        assert_eq!(list.run_expired(2), 0);
        assert_eq!(list.run_expired(3), 1);
        assert_eq!(list.run_expired(4), 0);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert!(!list.is_pending(id));
        assert!(list.is_empty());
    }

    #[test]
    fn periodic_timer_rearms_from_its_callback() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let mut list = TimerList::new();
        let id = list
            .add(Timer::new(1, move |now| {
                counter.fetch_add(1, Ordering::Relaxed);
                Some(now + 2)
            }))
            .unwrap();

        for now in 1..=10 {
            list.run_expired(now);
        }
        // 1, 3, 5, 7, 9
        assert_eq!(hits.load(Ordering::Relaxed), 5);
        assert_eq!(list.expires(id), Some(11));
    }

    #[test]
    fn stale_id_cannot_cancel_a_reused_slot() {
        let mut list = TimerList::new();
        let old = list.add(Timer::new(1, |_| None)).unwrap();
        assert!(list.cancel(old));
        assert!(!list.cancel(old));

        let new = list.add(Timer::new(5, |_| None)).unwrap();
        assert_ne!(old, new);
        assert!(!list.cancel(old));
        assert!(!list.modify(old, 9));
        assert!(list.is_pending(new));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn tick_advances_jiffies_and_runs_due_timers() {
        let mut list = TimerList::new();
        let before = get_jiffies();
        // Outros testes também podem avançar o contador global.
        list.add(Timer::new(before, |_| None)).unwrap();

        assert_eq!(timer_tick(&mut list), 1);
        assert!(get_jiffies() > before);
        assert!(list.is_empty());
    }
}
