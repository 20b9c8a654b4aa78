use serde::Deserialize;

use super::DataSet;

/// Per-share NAS backup statistics as exported by the collection scripts.
/// Values stay as the exported text; empty when the column is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NasVmcInfo {
    pub file_proxy: String,
    #[serde(rename = "FileShareID")]
    pub file_share_id: String,
    pub file_share_type: String,
    pub total_files_count: String,
    #[serde(rename = "ProxyIDs")]
    pub proxy_ids: String,
    pub avg_folders_count_per_inc: String,
    #[serde(rename = "BackupIOControlLevel")]
    pub backup_io_control_level: String,
    pub total_folders_count: String,
    pub avg_increment_size: String,
    pub cache_repository: String,
    pub avg_files_count_per_inc: String,
    pub backup_mode: String,
    pub total_share_size: String,
}

impl DataSet for NasVmcInfo {
    const SUFFIX: &'static str = "_NasVmcInfo";
}
