//! Object key layout and public URL parsing.

use stockroom_core::entity_kind::EntityKind;
use stockroom_core::types::DbId;

/// Object key for a freshly uploaded entity image:
/// `{kind}/{id}-{unix_millis}-{filename}`.
pub fn object_path(kind: EntityKind, id: DbId, unix_millis: i64, filename: &str) -> String {
    format!("{kind}/{id}-{unix_millis}-{filename}")
}

/// Percent-encode each `/`-separated segment of an object key for use in
/// a URL path.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of `path` in `bucket`.
pub fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{base_url}/storage/v1/object/public/{bucket}/{}",
        encode_path(path)
    )
}

/// Reverse of [`public_url`]: the decoded object path after
/// `/object/public/{bucket}/`, or `None` when the URL has no such segment,
/// nothing follows it, or it does not decode to UTF-8.
pub fn path_from_public_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/object/public/{bucket}/");
    let start = url.find(&marker)? + marker.len();
    let path = urlencoding::decode(&url[start..]).ok()?;
    (!path.is_empty()).then(|| path.into_owned())
}
