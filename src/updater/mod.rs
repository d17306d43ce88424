use crate::engine::models::Release;

const VERSION_DELIMITER: char = '-';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    UpdateAvailable,
    UpToDate,
    NoServerFiles,
    UnknownNeedsInput,
}

/// Version tag of a release: the last `-` separated segment of its display name.
///
/// A name without the delimiter is returned whole.
pub fn parse_version(release: &Release) -> String {
    version_from_display_name(&release.display_name)
}

fn version_from_display_name(display_name: &str) -> String {
    display_name
        .rsplit(VERSION_DELIMITER)
        .next()
        .unwrap_or(display_name)
        .trim()
        .to_owned()
}

/// Server files are only obtainable when the release has additional files and
/// one of them is flagged as a server pack.
pub fn has_server_files(release: &Release) -> bool {
    release.additional_files_count > 0 && release.has_server_pack
}

/// Classify the latest release against the locally recorded version.
///
/// Versions are compared as opaque strings: "different" is all that is checked,
/// never "newer". Equality wins over missing server files.
pub fn decide(current_version: Option<&str>, latest: &Release) -> Decision {
    let Some(current) = current_version else {
        return Decision::UnknownNeedsInput;
    };

    if current == parse_version(latest) {
        Decision::UpToDate
    } else if !has_server_files(latest) {
        Decision::NoServerFiles
    } else {
        Decision::UpdateAvailable
    }
}
