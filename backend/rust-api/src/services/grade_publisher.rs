use tokio::sync::broadcast;

use crate::metrics::{GRADES_PUBLISHED_TOTAL, GRADE_VALUE};
use crate::models::grade::GradeEvent;

const CHANNEL_CAPACITY: usize = 256;

/// Host event bus for finalized grades.
pub trait GradePublisher: Send + Sync {
    fn publish(&self, event: GradeEvent);
}

/// Fans grade events out to every live subscriber (the SSE streams).
pub struct BroadcastGradePublisher {
    sender: broadcast::Sender<GradeEvent>,
}

impl Default for BroadcastGradePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastGradePublisher {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GradeEvent> {
        self.sender.subscribe()
    }
}

impl GradePublisher for BroadcastGradePublisher {
    fn publish(&self, event: GradeEvent) {
        GRADES_PUBLISHED_TOTAL.inc();
        GRADE_VALUE.observe(event.value);

        tracing::info!(
            "Grade published: problem={}, student={}, value={}, max_value={}",
            event.problem_id,
            event.student_id,
            event.value,
            event.max_value
        );

        // No subscribers is fine, the grade is already stored with the state.
        if self.sender.send(event).is_err() {
            tracing::debug!("No grade stream subscribers");
        }
    }
}
