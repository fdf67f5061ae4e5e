use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{AppEntry, Configuration, OPEN_PREFIX};

const BUNDLE_SUFFIX: &str = ".app";
const AUTO_FAVORITE_MIN_APPS: usize = 3;
const AUTO_FAVORITE_COUNT: usize = 2;

pub fn default_applications_dir() -> PathBuf {
    PathBuf::from("/Applications")
}

#[derive(Debug)]
pub enum Bootstrap {
    Created(Configuration),
    Existing,
}

/// Builds a fresh configuration from the bundles directly inside `apps_dir`.
pub fn scan_applications(apps_dir: &Path) -> StoreResult<Configuration> {
    let entries = fs::read_dir(apps_dir).map_err(|err| StoreError::io(apps_dir, err))?;

    let mut apps = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| StoreError::io(apps_dir, err))?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let Some(name) = file_name.strip_suffix(BUNDLE_SUFFIX) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        apps.push(AppEntry::new(
            name,
            format!("{OPEN_PREFIX}{}", entry.path().display()),
        ));
    }
    apps.sort_by(|a, b| a.name.cmp(&b.name));

    if apps.len() >= AUTO_FAVORITE_MIN_APPS {
        for app in apps.iter_mut().take(AUTO_FAVORITE_COUNT) {
            app.favorite = true;
        }
    }
    Ok(Configuration::new(apps))
}

/// Writes a scanned configuration unless one already exists at `config_path`.
pub fn bootstrap(config_path: &Path, apps_dir: &Path) -> StoreResult<Bootstrap> {
    if config_path.exists() {
        debug!(path = %config_path.display(), "configuration already present, bootstrap skipped");
        return Ok(Bootstrap::Existing);
    }
    let config = scan_applications(apps_dir)?;
    config.save(config_path)?;
    info!(
        path = %config_path.display(),
        apps = config.apps.len(),
        source = %apps_dir.display(),
        "configuration generated"
    );
    Ok(Bootstrap::Created(config))
}

/// Explicit icon first, then the `.icns` shipped inside an opened bundle.
pub fn resolve_icon(app: &AppEntry) -> Option<PathBuf> {
    if !app.icon.trim().is_empty() {
        return Some(PathBuf::from(app.icon.trim()));
    }
    let resources = app.open_target()?.join("Contents").join("Resources");
    let preferred = resources.join("AppIcon.icns");
    if preferred.is_file() {
        return Some(preferred);
    }

    let mut icons: Vec<PathBuf> = fs::read_dir(&resources)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("icns"))
                .unwrap_or(false)
        })
        .collect();
    icons.sort();
    icons.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::scratch_dir;

    fn fake_apps(dir: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir_all(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn scan_picks_bundles_only() {
        let dir = scratch_dir("scan");
        fake_apps(&dir, &["Safari.app", "Utilities", "Visual Studio Code.app"]);
        fs::write(dir.join("README.txt"), "x").unwrap();

        let config = scan_applications(&dir).unwrap();
        let names: Vec<_> = config.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Safari", "Visual Studio Code"]);

        let code = config.find("Visual Studio Code").unwrap();
        assert_eq!(
            code.command,
            format!("open {}", dir.join("Visual Studio Code.app").display())
        );
        assert!(config.favorites().is_empty());
    }

    #[test]
    fn scan_auto_favorites_first_two_of_three() {
        let dir = scratch_dir("autofav");
        fake_apps(&dir, &["Arc.app", "Zoom.app", "Notion.app"]);

        let config = scan_applications(&dir).unwrap();
        let favs: Vec<_> = config.favorites().iter().map(|a| a.name.clone()).collect();
        assert_eq!(favs, ["Arc", "Notion"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn scan_keeps_non_utf8_bundles() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = scratch_dir("lossy");
        let bundle = dir.join(OsStr::from_bytes(b"Caf\xe9.app"));
        fs::create_dir_all(&bundle).unwrap();

        let config = scan_applications(&dir).unwrap();
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps[0].name, "Caf\u{FFFD}");
        assert_eq!(
            config.apps[0].command,
            format!("open {}", bundle.display())
        );
    }

    #[test]
    fn scan_missing_directory_is_an_error() {
        let dir = scratch_dir("nodir");
        assert!(scan_applications(&dir.join("absent")).is_err());
    }

    #[test]
    fn bootstrap_never_overwrites() {
        let dir = scratch_dir("bootstrap");
        let apps_dir = dir.join("Applications");
        fake_apps(&apps_dir, &["A.app", "B.app", "C.app"]);
        let config_path = dir.join("PiMenu").join("config.json");

        let created = bootstrap(&config_path, &apps_dir).unwrap();
        assert!(matches!(created, Bootstrap::Created(ref c) if c.apps.len() == 3));

        let mut edited = Configuration::load(&config_path).unwrap();
        edited.set_favorite("C", true).unwrap();
        edited.save(&config_path).unwrap();

        fake_apps(&apps_dir, &["D.app"]);
        assert!(matches!(
            bootstrap(&config_path, &apps_dir).unwrap(),
            Bootstrap::Existing
        ));
        assert_eq!(Configuration::load(&config_path).unwrap(), edited);
    }

    #[test]
    fn resolve_icon_prefers_explicit_then_bundle() {
        let dir = scratch_dir("icon");
        let bundle = dir.join("Foo.app");
        let resources = bundle.join("Contents").join("Resources");
        fs::create_dir_all(&resources).unwrap();
        fs::write(resources.join("foo.icns"), "").unwrap();

        let mut app = AppEntry::new("Foo", format!("open {}", bundle.display()));
        assert_eq!(resolve_icon(&app), Some(resources.join("foo.icns")));

        fs::write(resources.join("AppIcon.icns"), "").unwrap();
        assert_eq!(resolve_icon(&app), Some(resources.join("AppIcon.icns")));

        app.icon = "/tmp/custom.png".into();
        assert_eq!(resolve_icon(&app), Some(PathBuf::from("/tmp/custom.png")));

        assert_eq!(resolve_icon(&AppEntry::new("ls", "ls -la")), None);
    }
}
