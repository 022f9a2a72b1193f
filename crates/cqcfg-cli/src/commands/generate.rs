//! Scan a package and write (or check) its manifest

use cqcfg_ast::SourceScanner;
use cqcfg_logger as logger;
use cqcfg_manifest::{write_to_path, Manifest};
use std::path::PathBuf;
use std::time::Instant;

use crate::context::RunContext;
use crate::errors::CliError;
use crate::revision::RevisionCounter;

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Manifest written to the path
    Written(PathBuf),
    /// `--check` found the manifest at the path up to date
    Current(PathBuf),
}

/// Run the scan -> synthesize -> write pipeline for one package
///
/// Nothing is written unless every earlier stage succeeded.
pub fn handle_generate(
    ctx: &RunContext,
    counter: &dyn RevisionCounter,
) -> Result<Outcome, CliError> {
    let start = Instant::now();

    logger::spinner_start(&format!("Scanning {}", ctx.target_dir.display()));
    let scan = match SourceScanner::new(&ctx.config).scan_tree(&ctx.target_dir) {
        Ok(scan) => scan,
        Err(e) => {
            logger::spinner_error(&format!("Scan of {} failed", ctx.target_dir.display()));
            return Err(e.into());
        }
    };
    logger::spinner_stop();

    let revisions = if ctx.count_commits {
        let count = counter.count(&ctx.target_dir)?;
        logger::debug(&format!("Repository has {} commit(s)", count));
        Some(count)
    } else {
        None
    };

    let manifest = Manifest::synthesize(&scan, revisions)?;
    let path = ctx.manifest_path();

    if ctx.check {
        if !manifest.is_current_at(&path)? {
            return Err(CliError::Stale(path));
        }
        logger::debug(&format!("{} is up to date", path.display()));
        return Ok(Outcome::Current(path));
    }

    write_to_path(&manifest, &path)?;
    logger::step(&format!(
        "Generated {} in {:.2?}",
        path.display(),
        start.elapsed()
    ));
    Ok(Outcome::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::FixedRevisionCount;
    use cqcfg_config::ScanConfig;
    use cqcfg_manifest::read_from_path;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const PLUGIN: &str = r#"package main

import "github.com/Tnze/CoolQ-Golang-SDK/cqp"

//go:generate cqcfg -c .
// cqp: 名称: Demo
// cqp: 版本: 1.2.3:4
// cqp: 作者: Tnze
// cqp: 简介: demo plugin
func main() { cqp.Main() }

func init() {
	cqp.AppID = "demo.app"
	cqp.PrivateMsg = onPrivateMsg
}

func onPrivateMsg(subType, msgID int32, fromQQ int64, msg string, font int32) int32 {
	cqp.SendPrivateMsg(fromQQ, msg)
	return 0
}
"#;

    fn context(target: &Path, output: &Path, count_commits: bool, check: bool) -> RunContext {
        RunContext {
            target_dir: target.to_path_buf(),
            output_dir: output.to_path_buf(),
            config: ScanConfig::default(),
            count_commits,
            check,
        }
    }

    fn plugin_dir(source: &str) -> Option<TempDir> {
        let dir = TempDir::new().ok()?;
        fs::write(dir.path().join("main.go"), source).ok()?;
        Some(dir)
    }

    #[test]
    fn test_generate_writes_manifest() -> Result<(), CliError> {
        let (Some(src), Ok(out)) = (plugin_dir(PLUGIN), TempDir::new()) else {
            return Ok(());
        };
        let ctx = context(src.path(), out.path(), false, false);

        let outcome = handle_generate(&ctx, &FixedRevisionCount(0))?;
        let path = out.path().join("app.json");
        assert_eq!(outcome, Outcome::Written(path.clone()));

        let manifest = read_from_path(&path)?;
        assert_eq!(manifest.name, "Demo");
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(manifest.version_id, 4);
        assert_eq!(manifest.appid, "demo.app");
        assert_eq!(manifest.event.len(), 1);
        assert_eq!(manifest.event[0].name.as_ref(), "PrivateMsg");
        assert_eq!(manifest.event[0].function.as_ref(), "onPrivateMsg");
        let auth: Vec<&str> = manifest.auth.iter().map(|a| a.as_ref()).collect();
        assert_eq!(auth, vec!["Main", "SendPrivateMsg"]);
        Ok(())
    }

    #[test]
    fn test_revision_count_is_added() -> Result<(), CliError> {
        let (Some(src), Ok(out)) = (plugin_dir(PLUGIN), TempDir::new()) else {
            return Ok(());
        };
        let ctx = context(src.path(), out.path(), true, false);
        handle_generate(&ctx, &FixedRevisionCount(37))?;

        let manifest = read_from_path(&out.path().join("app.json"))?;
        assert_eq!(manifest.version_id, 41);
        Ok(())
    }

    #[test]
    fn test_counter_ignored_without_flag() -> Result<(), CliError> {
        let (Some(src), Ok(out)) = (plugin_dir(PLUGIN), TempDir::new()) else {
            return Ok(());
        };
        let ctx = context(src.path(), out.path(), false, false);
        handle_generate(&ctx, &FixedRevisionCount(37))?;

        let manifest = read_from_path(&out.path().join("app.json"))?;
        assert_eq!(manifest.version_id, 4);
        Ok(())
    }

    #[test]
    fn test_bad_version_writes_nothing() {
        let source = PLUGIN.replace("1.2.3:4", "1.2:4");
        let (Some(src), Ok(out)) = (plugin_dir(&source), TempDir::new()) else {
            return;
        };
        let ctx = context(src.path(), out.path(), false, false);

        let result = handle_generate(&ctx, &FixedRevisionCount(0));
        assert!(matches!(result, Err(CliError::Scan(_))));
        assert!(!out.path().join("app.json").exists());
    }

    #[test]
    fn test_check_detects_drift() -> Result<(), CliError> {
        let (Some(src), Ok(out)) = (plugin_dir(PLUGIN), TempDir::new()) else {
            return Ok(());
        };
        let path = out.path().join("app.json");

        let check = context(src.path(), out.path(), false, true);
        assert!(matches!(
            handle_generate(&check, &FixedRevisionCount(0)),
            Err(CliError::Stale(_))
        ));
        assert!(!path.exists());

        handle_generate(
            &context(src.path(), out.path(), false, false),
            &FixedRevisionCount(0),
        )?;
        assert_eq!(
            handle_generate(&check, &FixedRevisionCount(0))?,
            Outcome::Current(path.clone())
        );

        assert!(fs::write(
            src.path().join("main.go"),
            PLUGIN.replace("demo plugin", "changed")
        )
        .is_ok());
        assert!(matches!(
            handle_generate(&check, &FixedRevisionCount(0)),
            Err(CliError::Stale(_))
        ));
        Ok(())
    }
}
