//! 线程安全的对决会话：每次状态转换都在同一把锁内完成，并向订阅者广播事件。
//!
//! [`DuelSession`] 持有 [`DuelState`] 与 [`DuelEngine`]。被拒绝的操作以
//! [`DuelEvent::Error`] 事件上报，所有事件按顺序发送给仍在监听的订阅者。

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::DuelConfig;
use crate::game::{
    Card, DuelEngine, DuelError, DuelEvent, DuelState, DuelStatistics, Side, TacticalChoice,
};

struct Inner {
    state: DuelState,
    engine: DuelEngine,
}

pub struct DuelSession {
    inner: Mutex<Inner>,
    subscribers: Mutex<Vec<Sender<DuelEvent>>>,
}

impl DuelSession {
    pub fn new(config: &DuelConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: DuelState::new(config.human_name.clone(), config.automated_name.clone()),
                engine: DuelEngine::from_config(config),
            }),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 订阅此后产生的全部事件。
    pub fn subscribe(&self) -> Receiver<DuelEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn publish(&self, events: &[DuelEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|subscriber| {
            events
                .iter()
                .all(|event| subscriber.send(event.clone()).is_ok())
        });
    }

    fn settle(
        &self,
        inner: &mut Inner,
        operation: &'static str,
        result: Result<Vec<DuelEvent>, DuelError>,
    ) -> Vec<DuelEvent> {
        let events = match result {
            Ok(events) => events,
            Err(error) => {
                tracing::warn!(operation, error = %error, "duel operation rejected");
                let event = DuelEvent::error(error);
                inner.state.record_event(event.clone());
                vec![event]
            }
        };
        self.publish(&events);
        events
    }

    pub fn commence(&self, human_deck: Vec<Card>, automated_deck: Vec<Card>) -> Vec<DuelEvent> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let result = inner
            .engine
            .commence(&mut inner.state, human_deck, automated_deck);
        self.settle(inner, "commence", result)
    }

    pub fn submit_choice(&self, side: Side, choice: Option<TacticalChoice>) -> Vec<DuelEvent> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let result = inner.engine.submit_choice(&mut inner.state, side, choice);
        self.settle(inner, "submit_choice", result)
    }

    pub fn resolve_round(&self) -> Vec<DuelEvent> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let result = inner.engine.resolve_round(&mut inner.state);
        self.settle(inner, "resolve_round", result)
    }

    pub fn snapshot(&self) -> DuelState {
        self.lock().state.clone()
    }

    pub fn statistics(&self) -> DuelStatistics {
        self.lock().state.statistics()
    }
}

impl Default for DuelSession {
    fn default() -> Self {
        Self::new(&DuelConfig::default())
    }
}
