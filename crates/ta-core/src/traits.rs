/// Reçoit le signal de progression des rendus volumineux.
///
/// Purement consultatif : le rendu se termine de la même façon qu'un
/// observateur soit branché ou non.
///
/// # Example
/// ```
/// use ta_core::traits::ProgressSink;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Counter(AtomicUsize);
/// impl ProgressSink for Counter {
///     fn started(&self, total_cells: usize) { self.0.store(total_cells, Ordering::Relaxed); }
///     fn finished(&self) {}
/// }
/// ```
pub trait ProgressSink: Send + Sync {
    /// Appelé avant la première cellule.
    fn started(&self, total_cells: usize);

    /// Appelé après la dernière cellule.
    fn finished(&self);
}

/// Sink that forwards progress to the `log` facade.
///
/// # Example
/// ```
/// use ta_core::traits::{LogProgress, ProgressSink};
/// LogProgress.started(2000);
/// LogProgress.finished();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn started(&self, total_cells: usize) {
        log::info!("Génération en cours ({total_cells} cellules)...");
    }

    fn finished(&self) {
        log::info!("Génération terminée.");
    }
}
