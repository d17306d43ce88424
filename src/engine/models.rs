use serde::{Deserialize, Serialize};

/// One published file of the pack as listed by the registry.
///
/// Every field is mandatory; a listing entry missing any of them is rejected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct Release {
    pub id: u64,
    pub date_created: String,
    pub date_modified: String,
    pub display_name: String,
    pub file_length: u64,
    pub file_name: String,
    pub status: i64,
    pub game_versions: Vec<String>,
    pub game_version_type_ids: Vec<i64>,
    pub release_type: i64,
    pub total_downloads: u64,
    pub user: serde_json::Value,
    pub additional_files_count: u64,
    pub has_server_pack: bool,
    pub additional_server_pack_files_count: u64,
    pub is_early_access_content: bool,
}

/// Envelope around every registry listing.
#[derive(Clone, Debug, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
}

#[cfg(test)]
pub(crate) fn sample_release(display_name: &str, additional: u64, server_pack: bool) -> Release {
    Release {
        id: 4_242,
        date_created: "2023-10-01T12:00:00Z".into(),
        date_modified: "2023-10-01T12:00:00Z".into(),
        display_name: display_name.into(),
        file_length: 1_024,
        file_name: "Pack-1.0.zip".into(),
        status: 4,
        game_versions: vec!["1.20.1".into()],
        game_version_type_ids: vec![75_125],
        release_type: 1,
        total_downloads: 10,
        user: serde_json::json!({ "username": "packdev" }),
        additional_files_count: additional,
        has_server_pack: server_pack,
        additional_server_pack_files_count: additional,
        is_early_access_content: false,
    }
}
