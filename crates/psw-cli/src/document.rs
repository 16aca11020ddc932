//! Project documents on disk
//!
//! A document is the camelCase JSON form of one `Project`.

use std::fs;
use std::path::Path;

use psw_core::error::PswError;
use psw_core::result::PswResult;
use psw_models::Project;
use tracing::debug;

pub fn load_project(path: &Path) -> PswResult<Project> {
    if !path.exists() {
        return Err(PswError::not_found("ProjectDocument", "path", path.display().to_string()));
    }
    let data = fs::read_to_string(path)
        .map_err(|e| PswError::Import(format!("{}: {}", path.display(), e)))?;
    let project: Project = serde_json::from_str(&data)
        .map_err(|e| PswError::Import(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), project_id = %project.id, "Loaded project document");
    Ok(project)
}

pub fn save_project(path: &Path, project: &Project) -> PswResult<()> {
    let data = serde_json::to_string_pretty(project)
        .map_err(|e| PswError::Serialization(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PswError::Export(e.to_string()))?;
    }
    fs::write(path, data).map_err(|e| PswError::Export(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), project_id = %project.id, "Saved project document");
    Ok(())
}
