use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use colony_projector::{
    ColonyConsequences, ColonyEvent, ConsequenceContext, ConsequenceHandler, IngesterError,
    IngesterProvider, Repo,
};

/// Records every event it is handed, then applies the default consequences.
#[derive(Clone, Debug, Default)]
pub struct SpyConsequenceHandler {
    calls: Arc<AtomicUsize>,
    events: Arc<Mutex<Vec<ColonyEvent>>>,
}

impl SpyConsequenceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<ColonyEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl<R: Repo, P: IngesterProvider> ConsequenceHandler<R, P> for SpyConsequenceHandler {
    async fn handle_event<'a>(
        &self,
        context: ConsequenceContext<'a, R, P>,
    ) -> Result<(), IngesterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(context.event.clone());

        ConsequenceHandler::<R, P>::handle_event(&ColonyConsequences, context).await
    }
}
