use crate::dataverse::{FieldList, MetadataField};

pub const DANS_DATAVERSE_PID: &str = "dansDataversePid";
pub const DANS_DATAVERSE_PID_VERSION: &str = "dansDataversePidVersion";
pub const DANS_BAG_ID: &str = "dansBagId";
pub const DANS_NBN: &str = "dansNbn";

/// The four vault fields written for a dataset version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    pub dataverse_pid: String,
    pub dataverse_pid_version: String,
    pub bag_id: String,
    pub nbn: String,
}

impl FieldSet {
    /// Fields in write order, paired with their type names.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (DANS_DATAVERSE_PID, self.dataverse_pid.as_str()),
            (DANS_DATAVERSE_PID_VERSION, self.dataverse_pid_version.as_str()),
            (DANS_BAG_ID, self.bag_id.as_str()),
            (DANS_NBN, self.nbn.as_str()),
        ]
    }

    pub fn to_field_list(&self) -> FieldList {
        FieldList {
            fields: self
                .entries()
                .iter()
                .map(|(name, value)| MetadataField::primitive(name, value))
                .collect(),
        }
    }
}
