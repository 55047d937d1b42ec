pub mod error;
pub mod fields;
pub mod resume;
pub mod synthesize;
pub mod task;
pub mod validate;

pub use error::TaskError;
pub use fields::{FieldSet, DANS_BAG_ID, DANS_DATAVERSE_PID, DANS_DATAVERSE_PID_VERSION, DANS_NBN};
pub use resume::{WorkflowResumer, RESUME_MAX_ATTEMPTS, RESUME_RETRY_DELAY_MS};
pub use synthesize::{MetadataSynthesizer, Synthesis};
pub use task::{TaskContext, TaskState, VaultMetadataTask, FAILURE_MESSAGE};
pub use validate::validate_bag_metadata;
