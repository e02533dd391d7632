//! JSDoc synthesis.

use extdts_features::{AllowSet, FeatureDiff, Since};

use crate::overrides::Tag;

/// Everything that goes into one doc comment.
#[derive(Debug, Default)]
pub struct Doc<'a> {
    pub description: Option<&'a str>,
    /// `(rendered parameter name, description)`.
    pub params: Vec<(String, &'a str)>,
    pub returns: Option<&'a str>,
    pub deprecated: Option<&'a str>,
    pub tags: Vec<Tag>,
}

impl Doc<'_> {
    /// Comment lines without indentation; empty when there is nothing to say.
    pub fn lines(&self) -> Vec<String> {
        let mut body: Vec<String> = Vec::new();
        if let Some(description) = self.description.map(str::trim).filter(|d| !d.is_empty()) {
            body.extend(description.lines().map(|line| escape(line.trim_end())));
        }

        let mut tags: Vec<String> = Vec::new();
        for (name, description) in &self.params {
            tags.push(format!("@param {name} {}", escape(description.trim())));
        }
        if let Some(returns) = self.returns.map(str::trim).filter(|d| !d.is_empty()) {
            tags.push(format!("@returns {}", escape(returns)));
        }
        if let Some(deprecated) = self.deprecated {
            let deprecated = deprecated.trim();
            tags.push(if deprecated.is_empty() {
                "@deprecated".to_string()
            } else {
                format!("@deprecated {}", escape(deprecated))
            });
        }
        for tag in &self.tags {
            let text = tag.to_string();
            if !tags.contains(&text) {
                tags.push(text);
            }
        }

        if !body.is_empty() && !tags.is_empty() {
            body.push(String::new());
        }
        body.extend(tags);

        match body.as_slice() {
            [] => Vec::new(),
            [only] => vec![format!("/** {only} */")],
            _ => {
                let mut lines = Vec::with_capacity(body.len() + 2);
                lines.push("/**".to_string());
                for line in body {
                    if line.is_empty() {
                        lines.push(" *".to_string());
                    } else {
                        lines.push(format!(" * {line}"));
                    }
                }
                lines.push(" */".to_string());
                lines
            }
        }
    }
}

/// Keep descriptions from closing the comment early.
fn escape(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Tags for every field present in a sparse feature diff.
pub fn feature_tags(diff: &FeatureDiff) -> Vec<Tag> {
    let mut tags = Vec::new();
    if let Some(tag) = diff.channel.and_then(|c| c.doc_tag()) {
        tags.push(Tag::flag(tag));
    }
    for permission in diff.permissions.iter().flatten() {
        tags.push(Tag::with_value("chrome-permission", permission.as_str()));
    }
    for key in diff.manifest_keys.iter().flatten() {
        tags.push(Tag::with_value("chrome-manifest", key.as_str()));
    }
    if let Some(min) = diff.min_manifest_version {
        tags.push(Tag::with_value("chrome-min-manifest", format!("MV{min}")));
    }
    if let Some(max) = diff.max_manifest_version {
        tags.push(Tag::with_value("chrome-max-manifest", format!("MV{max}")));
    }
    if let Some(AllowSet::Only(platforms)) = &diff.platforms {
        for platform in platforms {
            tags.push(Tag::with_value("chrome-platform", platform.as_str()));
        }
    }
    if let Some(location) = &diff.location {
        tags.push(Tag::with_value("chrome-install-location", location.as_str()));
    }
    if diff.disallow_for_service_workers == Some(true) {
        tags.push(Tag::flag("chrome-disallow-service-workers"));
    }
    match diff.since {
        Some(Since::Version(version)) => {
            tags.push(Tag::with_value("since", format!("Chrome {version}")));
        }
        Some(Since::Pending) => tags.push(Tag::with_value("since", "Pending")),
        None => {}
    }
    if let Some(version) = diff.deprecated_since_version {
        tags.push(Tag::with_value("chrome-deprecated-since", format!("Chrome {version}")));
    }
    tags
}
