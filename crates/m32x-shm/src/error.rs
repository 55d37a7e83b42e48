use m32x_sched::SchedulerError;
use thiserror::Error;

use crate::{BootImageError, ConfigError};

#[derive(Debug, Error)]
pub enum ShmError {
    #[error("invalid SHM configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    BootImage(#[from] BootImageError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
