use std::path::{Path, PathBuf};

use crate::error::{DeployerError, Result};
use crate::ini;
use crate::models::{Descriptor, CONTROL_SECTION, SERVICE_SECTION};

pub const DESCRIPTOR_SUFFIX: &str = ".ini";

/// List the descriptor files directly inside `input_dir`, sorted by name so
/// processing and routing order do not depend on the filesystem.
pub async fn discover(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(input_dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_descriptor = entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.ends_with(DESCRIPTOR_SUFFIX));
        if is_descriptor && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

pub async fn load(path: &Path) -> Result<Descriptor> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DeployerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut document = ini::parse(&content).map_err(|e| DeployerError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let service = document.take_section(SERVICE_SECTION).unwrap_or_default();
    let control = document.take_section(CONTROL_SECTION).unwrap_or_default();
    for ignored in document.section_names() {
        tracing::debug!(path = %path.display(), section = ignored, "ignoring_section");
    }

    Ok(Descriptor::new(path.to_path_buf(), service, control))
}

/// Write the generated vassal config under the descriptor's own file name.
/// An existing file is overwritten.
pub async fn write(descriptor: &Descriptor, output_dir: &Path) -> Result<PathBuf> {
    let file_name = descriptor.path().file_name().ok_or_else(|| {
        DeployerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("descriptor path has no file name: {}", descriptor.path().display()),
        ))
    })?;
    let target = output_dir.join(file_name);
    let content = descriptor.render_service_config(&descriptor.service_overrides()?);

    tracing::info!(path = %target.display(), "writing_vassal_config");
    tokio::fs::write(&target, content).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FIXTURE: &str = r#"
[uwsgi]
home=/opt/app3
socket=127.0.0.1:3030
module=some_package.some_module:APP
master=1

[vassaldeployer]
app_url=/app3
requirements= pkg1==0.1.2,pkg2==1.2.3, pkg3==3.4.5
"#;

    #[tokio::test]
    async fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["vassal3.ini", "vassal1.ini", "notes.txt", "vassal2.ini"] {
            fs::write(dir.path().join(name), "womp").unwrap();
        }
        fs::create_dir(dir.path().join("nested.ini")).unwrap();

        let found = discover(dir.path()).await.unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["vassal1.ini", "vassal2.ini", "vassal3.ini"]);
    }

    #[tokio::test]
    async fn discover_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, DeployerError::Io(_)));
    }

    #[tokio::test]
    async fn load_splits_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app3.ini");
        fs::write(&path, FIXTURE).unwrap();

        let d = load(&path).await.unwrap();
        assert_eq!(d.path(), path.as_path());
        assert_eq!(d.port().unwrap(), 3030);
        assert_eq!(d.target_url().unwrap(), "/app3");
        assert_eq!(d.dependency_specs().len(), 3);
        assert!(!d.service_settings().contains_key("app_url"));
    }

    #[tokio::test]
    async fn load_malformed_or_unreadable_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ini");
        fs::write(&path, "womp").unwrap();
        assert!(matches!(
            load(&path).await,
            Err(DeployerError::Parse { .. })
        ));
        assert!(matches!(
            load(&dir.path().join("missing.ini")).await,
            Err(DeployerError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn write_injects_virtualenv_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app3.ini");
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(&input, FIXTURE).unwrap();
        fs::write(out.join("app3.ini"), "stale").unwrap();

        let d = load(&input).await.unwrap();
        let written = write(&d, &out).await.unwrap();
        assert_eq!(written, out.join("app3.ini"));

        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("[uwsgi]\n"));
        assert!(content.contains("virtualenv=/opt/app3/venv\n"));
        assert!(!content.contains("vassaldeployer"));
        assert!(!content.contains("stale"));
    }

    #[tokio::test]
    async fn rendering_is_stable_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app3.ini");
        let first_out = dir.path().join("first");
        let second_out = dir.path().join("second");
        fs::create_dir(&first_out).unwrap();
        fs::create_dir(&second_out).unwrap();
        fs::write(&input, FIXTURE).unwrap();

        let original = load(&input).await.unwrap();
        let first = write(&original, &first_out).await.unwrap();
        let reloaded = load(&first).await.unwrap();
        let second = write(&reloaded, &second_out).await.unwrap();

        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            fs::read_to_string(&second).unwrap()
        );
    }
}
