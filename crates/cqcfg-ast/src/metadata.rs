//! Marker comment metadata
//!
//! Metadata lines have the exact form `// <marker>: <label>: <value>`, e.g.
//!
//! ```text
//! // cqp: 名称: 插件名称
//! // cqp: 版本: 1.0.0:1
//! // cqp: 作者: 插件作者姓名
//! // cqp: 简介: 您插件的简介
//! ```
//!
//! Lines with an unknown label or without the `: ` separator are skipped, since
//! ordinary comments may happen to start with the marker. A version value that
//! does not follow `<major>.<minor>.<patch>:<sequence>` is an error.

use cqcfg_manifest::{Metadata, PluginVersion};
use smallvec::SmallVec;
use tracing::debug;

use crate::errors::MetadataError;

/// Metadata field a marker label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Version,
    Author,
    Description,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "名称" | "name" => Some(Field::Name),
            "版本" | "version" => Some(Field::Version),
            "作者" | "author" => Some(Field::Author),
            "简介" | "description" => Some(Field::Description),
            _ => None,
        }
    }
}

/// Parses marker comment lines into [`Metadata`]
pub struct MetadataExtractor {
    prefix: String,
}

impl MetadataExtractor {
    /// `prefix` is the full line prefix, e.g. `// cqp: `
    pub fn new(prefix: impl Into<String>) -> Self {
        MetadataExtractor {
            prefix: prefix.into(),
        }
    }

    /// Whether `line` starts with the marker prefix
    pub fn is_marker(&self, line: &str) -> bool {
        line.starts_with(&self.prefix)
    }

    /// Fold marker lines into metadata, later lines overriding earlier ones
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Result<Metadata, MetadataError> {
        let mut metadata = Metadata::default();
        for line in lines {
            self.apply_line(line.as_ref(), &mut metadata)?;
        }
        Ok(metadata)
    }

    fn apply_line(&self, line: &str, metadata: &mut Metadata) -> Result<(), MetadataError> {
        let Some(rest) = line.strip_prefix(&self.prefix) else {
            return Ok(());
        };
        let Some((label, value)) = rest.split_once(": ") else {
            debug!("Skipping marker without label separator: {}", line);
            return Ok(());
        };
        let Some(field) = Field::from_label(label) else {
            debug!("Skipping marker with unknown label '{}'", label);
            return Ok(());
        };

        let value = value.trim_end();
        match field {
            Field::Name => metadata.name = value.to_string(),
            Field::Author => metadata.author = value.to_string(),
            Field::Description => metadata.description = value.to_string(),
            Field::Version => {
                metadata.version =
                    parse_version(value).map_err(|reason| MetadataError::InvalidVersion {
                        line: line.to_string(),
                        reason,
                    })?;
            }
        }
        Ok(())
    }
}

/// Parse `<major>.<minor>.<patch>:<sequence>`
pub fn parse_version(value: &str) -> Result<PluginVersion, String> {
    let (semver, sequence) = value
        .trim()
        .split_once(':')
        .ok_or_else(|| "missing ':' before sequence number".to_string())?;

    let parts: SmallVec<[&str; 3]> = semver.split('.').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected <major>.<minor>.<patch>, found '{}'",
            semver
        ));
    }

    let component = |name: &str, raw: &str| -> Result<u32, String> {
        raw.parse::<u32>()
            .map_err(|_| format!("{} version '{}' is not a number", name, raw))
    };

    Ok(PluginVersion {
        major: component("major", parts[0])?,
        minor: component("minor", parts[1])?,
        patch: component("patch", parts[2])?,
        sequence: sequence
            .parse::<u64>()
            .map_err(|_| format!("sequence number '{}' is not a number", sequence))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new("// cqp: ")
    }

    #[test]
    fn test_parse_template_markers() -> Result<(), MetadataError> {
        let lines = [
            "// cqp: 名称: 插件名称",
            "// cqp: 版本: 1.0.0:1",
            "// cqp: 作者: 插件作者姓名",
            "// cqp: 简介: 您插件的简介",
        ];
        let metadata = extractor().extract(&lines)?;
        assert_eq!(metadata.name, "插件名称");
        assert_eq!(metadata.author, "插件作者姓名");
        assert_eq!(metadata.description, "您插件的简介");
        assert_eq!(
            metadata.version,
            PluginVersion {
                major: 1,
                minor: 0,
                patch: 0,
                sequence: 1,
            }
        );
        Ok(())
    }

    #[test]
    fn test_english_labels() -> Result<(), MetadataError> {
        let lines = ["// cqp: name: Demo", "// cqp: version: 1.2.3:4"];
        let metadata = extractor().extract(&lines)?;
        assert_eq!(metadata.name, "Demo");
        assert_eq!(metadata.version.to_string(), "1.2.3:4");
        Ok(())
    }

    #[test]
    fn test_missing_fields_stay_default() -> Result<(), MetadataError> {
        let metadata = extractor().extract(&["// cqp: 作者: someone"])?;
        assert_eq!(metadata.author, "someone");
        assert_eq!(metadata.name, "");
        assert_eq!(metadata.version, PluginVersion::default());
        Ok(())
    }

    #[test]
    fn test_lenient_lines_are_ignored() -> Result<(), MetadataError> {
        let lines = [
            "// cqp: 版权: 2020",
            "// cqp: no separator here",
            "//cqp: 名称: wrong spacing",
            "// cqp:  名称: double space",
            "// ordinary comment",
            "/* cqp: 名称: block */",
        ];
        let metadata = extractor().extract(&lines)?;
        assert_eq!(metadata, Metadata::default());
        Ok(())
    }

    #[test]
    fn test_last_line_wins() -> Result<(), MetadataError> {
        let lines = ["// cqp: 名称: first", "// cqp: 名称: second"];
        assert_eq!(extractor().extract(&lines)?.name, "second");
        Ok(())
    }

    #[test]
    fn test_malformed_version_names_line() {
        for bad in [
            "// cqp: 版本: 1.0.0",
            "// cqp: 版本: 1.0:3",
            "// cqp: 版本: 1.x.0:3",
            "// cqp: 版本: 1.0.0:seven",
            "// cqp: 版本: 1.0.0.1:2",
        ] {
            let result = extractor().extract(&[bad]);
            match result {
                Err(MetadataError::InvalidVersion { line, .. }) => assert_eq!(line, bad),
                Ok(metadata) => panic!("accepted malformed version {:?}: {:?}", bad, metadata),
            }
        }
    }

    #[test]
    fn test_parse_version_reasons() {
        assert_eq!(
            parse_version("1.0.0"),
            Err("missing ':' before sequence number".to_string())
        );
        assert_eq!(
            parse_version("1.b.0:1"),
            Err("minor version 'b' is not a number".to_string())
        );
        assert_eq!(
            parse_version(" 2.10.7:120 ").map(|v| v.to_string()),
            Ok("2.10.7:120".to_string())
        );
    }

    #[test]
    fn test_is_marker() {
        let extractor = extractor();
        assert!(extractor.is_marker("// cqp: 名称: x"));
        assert!(!extractor.is_marker("//go:generate cqcfg -c ."));
    }
}
