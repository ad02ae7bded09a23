use crate::error::Stage;
use crate::logging::{log_debug, log_error_to_file, log_info, log_warn};

/// Events emitted while a snapshot is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotProgress {
    StageStarted {
        organization: String,
        stage: Stage,
    },
    PageFetched {
        organization: String,
        edge: &'static str,
        items: usize,
    },
    StageFinished {
        organization: String,
        stage: Stage,
        items: usize,
    },
    Reconciled {
        organization: String,
        entries: usize,
        dropped: usize,
        duplicates: usize,
    },
    StageFailed {
        organization: String,
        stage: Stage,
        error: String,
    },
}

pub type ProgressCallback<'a> = dyn Fn(SnapshotProgress) + Send + Sync + 'a;

pub fn emit(callback: Option<&ProgressCallback<'_>>, event: SnapshotProgress) {
    if let Some(callback) = callback {
        callback(event);
    }
}

/// Route progress events to the log file.
///
/// Stage failures are written to the file only; the run summary shows them.
pub fn log_progress(event: SnapshotProgress) {
    match event {
        SnapshotProgress::StageStarted {
            organization,
            stage,
        } => log_debug(&format!("[{}] fetching {}", organization, stage)),
        SnapshotProgress::PageFetched {
            organization,
            edge,
            items,
        } => log_debug(&format!("[{}] {} page: {} items", organization, edge, items)),
        SnapshotProgress::StageFinished {
            organization,
            stage,
            items,
        } => log_info(&format!("[{}] {}: {}", organization, stage, items)),
        SnapshotProgress::Reconciled {
            organization,
            entries,
            dropped,
            duplicates,
        } => {
            log_info(&format!(
                "[{}] {} repositories with access grants",
                organization, entries
            ));
            if dropped > 0 {
                log_debug(&format!(
                    "[{}] dropped {} grants for repositories outside the repository list",
                    organization, dropped
                ));
            }
            if duplicates > 0 {
                log_warn(&format!(
                    "[{}] collapsed {} duplicate grants",
                    organization, duplicates
                ));
            }
        }
        SnapshotProgress::StageFailed {
            organization,
            stage,
            error,
        } => log_error_to_file(&format!("[{}] {} failed: {}", organization, stage, error)),
    }
}
